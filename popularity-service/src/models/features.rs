use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::{ValidationError, ValidationErrors};

/// One of the audio features the popularity model is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Danceability,
    Energy,
    Loudness,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Valence,
    Tempo,
    DurationMs,
    Key,
    Mode,
    TimeSignature,
}

/// Declared wire type of a feature. Integer features are widened to `f64`
/// before inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Float,
    Integer,
}

impl Feature {
    pub const ALL: [Feature; 13] = [
        Feature::Danceability,
        Feature::Energy,
        Feature::Loudness,
        Feature::Speechiness,
        Feature::Acousticness,
        Feature::Instrumentalness,
        Feature::Liveness,
        Feature::Valence,
        Feature::Tempo,
        Feature::DurationMs,
        Feature::Key,
        Feature::Mode,
        Feature::TimeSignature,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Danceability => "danceability",
            Feature::Energy => "energy",
            Feature::Loudness => "loudness",
            Feature::Speechiness => "speechiness",
            Feature::Acousticness => "acousticness",
            Feature::Instrumentalness => "instrumentalness",
            Feature::Liveness => "liveness",
            Feature::Valence => "valence",
            Feature::Tempo => "tempo",
            Feature::DurationMs => "duration_ms",
            Feature::Key => "key",
            Feature::Mode => "mode",
            Feature::TimeSignature => "time_signature",
        }
    }

    pub fn kind(self) -> FeatureKind {
        match self {
            Feature::Key | Feature::Mode | Feature::TimeSignature => FeatureKind::Integer,
            _ => FeatureKind::Float,
        }
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|feature| feature.name() == name)
    }
}

/// Audio features of a single song, as accepted by `GET /predict/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SongFeatures {
    /// Danceability level (between 0 and 1)
    pub danceability: f64,
    /// Energy level of the song (between 0 and 1)
    pub energy: f64,
    /// Overall loudness in decibels (typically -60 to 0)
    pub loudness: f64,
    /// Presence of spoken words (between 0 and 1)
    pub speechiness: f64,
    /// Confidence that the song is acoustic (between 0 and 1)
    pub acousticness: f64,
    /// Probability that the song has no vocals (between 0 and 1)
    pub instrumentalness: f64,
    /// Presence of a live audience (between 0 and 1)
    pub liveness: f64,
    /// Musical positiveness (between 0 and 1)
    pub valence: f64,
    /// Tempo in beats per minute
    pub tempo: f64,
    /// Duration of the song in milliseconds
    pub duration_ms: f64,
    /// Musical key (0 = C, 1 = C#/Db, ..., 11 = B)
    pub key: i64,
    /// Modality: 1 major, 0 minor
    pub mode: i64,
    /// Estimated meter (e.g. 4 for 4/4)
    pub time_signature: i64,
}

impl SongFeatures {
    /// Parse query-string pairs into typed features.
    ///
    /// Every missing or unparseable feature is reported, not only the first
    /// one. Unknown names are ignored and the first occurrence of a repeated
    /// name wins.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self, ValidationErrors>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw: HashMap<Feature, String> = HashMap::new();
        for (name, value) in pairs {
            if let Some(feature) = Feature::from_name(name.as_ref()) {
                raw.entry(feature)
                    .or_insert_with(|| value.as_ref().to_string());
            }
        }

        let mut errors = ValidationErrors::new();

        let danceability = take::<f64>(&raw, Feature::Danceability, &mut errors);
        let energy = take::<f64>(&raw, Feature::Energy, &mut errors);
        let loudness = take::<f64>(&raw, Feature::Loudness, &mut errors);
        let speechiness = take::<f64>(&raw, Feature::Speechiness, &mut errors);
        let acousticness = take::<f64>(&raw, Feature::Acousticness, &mut errors);
        let instrumentalness = take::<f64>(&raw, Feature::Instrumentalness, &mut errors);
        let liveness = take::<f64>(&raw, Feature::Liveness, &mut errors);
        let valence = take::<f64>(&raw, Feature::Valence, &mut errors);
        let tempo = take::<f64>(&raw, Feature::Tempo, &mut errors);
        let duration_ms = take::<f64>(&raw, Feature::DurationMs, &mut errors);
        let key = take::<i64>(&raw, Feature::Key, &mut errors);
        let mode = take::<i64>(&raw, Feature::Mode, &mut errors);
        let time_signature = take::<i64>(&raw, Feature::TimeSignature, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(SongFeatures {
            danceability: danceability.unwrap_or_default(),
            energy: energy.unwrap_or_default(),
            loudness: loudness.unwrap_or_default(),
            speechiness: speechiness.unwrap_or_default(),
            acousticness: acousticness.unwrap_or_default(),
            instrumentalness: instrumentalness.unwrap_or_default(),
            liveness: liveness.unwrap_or_default(),
            valence: valence.unwrap_or_default(),
            tempo: tempo.unwrap_or_default(),
            duration_ms: duration_ms.unwrap_or_default(),
            key: key.unwrap_or_default(),
            mode: mode.unwrap_or_default(),
            time_signature: time_signature.unwrap_or_default(),
        })
    }

    /// Value of `feature` widened to `f64`.
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Danceability => self.danceability,
            Feature::Energy => self.energy,
            Feature::Loudness => self.loudness,
            Feature::Speechiness => self.speechiness,
            Feature::Acousticness => self.acousticness,
            Feature::Instrumentalness => self.instrumentalness,
            Feature::Liveness => self.liveness,
            Feature::Valence => self.valence,
            Feature::Tempo => self.tempo,
            Feature::DurationMs => self.duration_ms,
            Feature::Key => self.key as f64,
            Feature::Mode => self.mode as f64,
            Feature::TimeSignature => self.time_signature as f64,
        }
    }
}

fn take<T: FromStr>(
    raw: &HashMap<Feature, String>,
    feature: Feature,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let expected = match feature.kind() {
        FeatureKind::Float => "float",
        FeatureKind::Integer => "integer",
    };

    let Some(value) = raw.get(&feature) else {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Owned(format!(
            "Missing required parameter '{}' ({})",
            feature.name(),
            expected
        )));
        errors.add(feature.name(), error);
        return None;
    };

    match value.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            let mut error = ValidationError::new("invalid_type");
            error.message = Some(Cow::Owned(format!(
                "Parameter '{}' must be a valid {}",
                feature.name(),
                expected
            )));
            error.add_param(Cow::Borrowed("expected"), &expected);
            error.add_param(Cow::Borrowed("value"), value);
            errors.add(feature.name(), error);
            None
        }
    }
}
