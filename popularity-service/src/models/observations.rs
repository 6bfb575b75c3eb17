use super::SongFeatures;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A reference song as echoed by `GET /predict/observaciones`.
///
/// Mirrors [`SongFeatures`] except that the duration is kept as the whole
/// number of milliseconds it was recorded with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ObservedSong {
    pub danceability: f64,
    pub energy: f64,
    pub loudness: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub tempo: f64,
    pub duration_ms: i64,
    pub key: i64,
    pub mode: i64,
    pub time_signature: i64,
}

impl ObservedSong {
    /// The song as model input.
    pub fn features(&self) -> SongFeatures {
        SongFeatures {
            danceability: self.danceability,
            energy: self.energy,
            loudness: self.loudness,
            speechiness: self.speechiness,
            acousticness: self.acousticness,
            instrumentalness: self.instrumentalness,
            liveness: self.liveness,
            valence: self.valence,
            tempo: self.tempo,
            duration_ms: self.duration_ms as f64,
            key: self.key,
            mode: self.mode,
            time_signature: self.time_signature,
        }
    }
}

/// A song with its known popularity, used to show the model at work.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledObservation {
    pub song: ObservedSong,
    pub popularity: i64,
}

pub fn reference_observations() -> [LabeledObservation; 2] {
    [
        LabeledObservation {
            song: ObservedSong {
                danceability: 0.305,
                energy: 0.849,
                loudness: -10.795,
                speechiness: 0.0549,
                acousticness: 0.000058,
                instrumentalness: 0.0567,
                liveness: 0.464,
                valence: 0.32,
                tempo: 141.793,
                duration_ms: 211533,
                key: 9,
                mode: 1,
                time_signature: 4,
            },
            popularity: 22,
        },
        LabeledObservation {
            song: ObservedSong {
                danceability: 0.55,
                energy: 0.509,
                loudness: -9.661,
                speechiness: 0.0362,
                acousticness: 0.777,
                instrumentalness: 0.202,
                liveness: 0.115,
                valence: 0.544,
                tempo: 90.459,
                duration_ms: 216506,
                key: 1,
                mode: 1,
                time_signature: 3,
            },
            popularity: 37,
        },
    ]
}
