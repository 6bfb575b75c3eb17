//! Startup artifacts: the column order the model was trained with.

use crate::models::{Feature, SongFeatures};
use crate::services::predictor::Predictor;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode artifact {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("column order is empty")]
    EmptyColumnOrder,

    #[error("column order references unknown feature '{0}'")]
    UnknownColumn(String),

    #[error("column order lists '{0}' more than once")]
    DuplicateColumn(String),

    #[error("malformed model: {0}")]
    MalformedModel(String),

    #[error("model expects {model} features but the column order lists {columns}")]
    WidthMismatch { model: usize, columns: usize },

    #[error("model feature {position} is '{model}' but the column order has '{column}'")]
    NameMismatch {
        position: usize,
        model: String,
        column: String,
    },
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Validated column order: which feature goes to which model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    columns: Vec<Feature>,
}

impl ColumnLayout {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, ArtifactError> {
        if names.is_empty() {
            return Err(ArtifactError::EmptyColumnOrder);
        }

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let feature = Feature::from_name(name)
                .ok_or_else(|| ArtifactError::UnknownColumn(name.to_string()))?;
            if !seen.insert(feature) {
                return Err(ArtifactError::DuplicateColumn(name.to_string()));
            }
            columns.push(feature);
        }

        if columns.len() < Feature::ALL.len() {
            tracing::warn!(
                columns = columns.len(),
                "Column order selects a subset of the song features"
            );
        }

        Ok(Self { columns })
    }

    /// Load the column order artifact, a JSON array of feature names.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let names: Vec<String> = read_json(path)?;
        Self::new(&names)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|feature| feature.name()).collect()
    }

    /// Gather the features into model input order.
    pub fn arrange(&self, features: &SongFeatures) -> Vec<f64> {
        self.columns
            .iter()
            .map(|&feature| features.value(feature))
            .collect()
    }

    /// Fail unless `predictor` was trained on exactly these columns.
    pub fn check_predictor(&self, predictor: &dyn Predictor) -> Result<(), ArtifactError> {
        let model = predictor.n_features();
        if model != self.columns.len() {
            return Err(ArtifactError::WidthMismatch {
                model,
                columns: self.columns.len(),
            });
        }

        if let Some(model_names) = predictor.feature_names() {
            for (position, (model_name, feature)) in
                model_names.iter().zip(&self.columns).enumerate()
            {
                if model_name != feature.name() {
                    return Err(ArtifactError::NameMismatch {
                        position,
                        model: model_name.clone(),
                        column: feature.name().to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
