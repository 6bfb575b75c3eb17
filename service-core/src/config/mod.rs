use crate::error::AppError;
use config::{Config as Cfg, File, Value};
use serde::Deserialize;

/// Settings shared by every HTTP service in the workspace.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector endpoint. Trace export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Self::from_settings(&layered_settings(&[])?)
    }

    pub fn from_settings(settings: &Cfg) -> Result<Self, AppError> {
        Ok(settings.clone().try_deserialize()?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Resolve the layered settings: service defaults, then an optional
/// `configuration.*` file, then `APP__*` environment variables.
pub fn layered_settings(defaults: &[(&str, Value)]) -> Result<Cfg, AppError> {
    dotenvy::dotenv().ok();

    let mut builder = Cfg::builder();
    for (key, value) in defaults {
        builder = builder.set_default(*key, value.clone())?;
    }

    let settings = builder
        .add_source(File::with_name("configuration").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;

    Ok(settings)
}
