use config::Value;
use serde::Deserialize;
use service_core::config::{self as core_config, layered_settings};
use service_core::error::AppError;
use std::path::PathBuf;

pub const DEFAULT_PORT: i64 = 5000;
pub const DEFAULT_MODEL_PATH: &str = "artifacts/spotify_catboost_model.json";
pub const DEFAULT_COLUMNS_PATH: &str = "artifacts/spotify_columns.json";

#[derive(Debug, Clone)]
pub struct PopularityConfig {
    pub common: core_config::Config,
    pub artifacts: ArtifactConfig,
    pub docs: DocsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// Oblivious-tree ensemble exported as CatBoost JSON.
    pub model_path: PathBuf,
    /// JSON array with the feature names in the order the model expects.
    pub columns_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocsConfig {
    /// Serve Swagger UI under /docs. The OpenAPI document is always served.
    pub enabled: bool,
}

impl PopularityConfig {
    pub fn load() -> Result<Self, AppError> {
        let settings = layered_settings(&[
            ("port", Value::from(DEFAULT_PORT)),
            ("artifacts.model_path", Value::from(DEFAULT_MODEL_PATH)),
            ("artifacts.columns_path", Value::from(DEFAULT_COLUMNS_PATH)),
            ("docs.enabled", Value::from(true)),
        ])?;

        Ok(PopularityConfig {
            common: core_config::Config::from_settings(&settings)?,
            artifacts: settings.get("artifacts")?,
            docs: settings.get("docs")?,
        })
    }
}
