#![allow(dead_code)]

use popularity_service::config::{ArtifactConfig, DocsConfig, PopularityConfig};
use popularity_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const FIXTURE_MODEL: &str = include_str!("../fixtures/spotify_catboost_model.json");
pub const FIXTURE_COLUMNS: &str = include_str!("../fixtures/spotify_columns.json");

/// Fixture model outputs for the two reference observations.
pub const EXPECTED_PREDICTION_1: f64 = 22.25;
pub const EXPECTED_PREDICTION_2: f64 = 37.3;

pub const OBSERVATION_1: [(&str, &str); 13] = [
    ("danceability", "0.305"),
    ("energy", "0.849"),
    ("loudness", "-10.795"),
    ("speechiness", "0.0549"),
    ("acousticness", "0.000058"),
    ("instrumentalness", "0.0567"),
    ("liveness", "0.464"),
    ("valence", "0.32"),
    ("tempo", "141.793"),
    ("duration_ms", "211533"),
    ("key", "9"),
    ("mode", "1"),
    ("time_signature", "4"),
];

pub const OBSERVATION_2: [(&str, &str); 13] = [
    ("danceability", "0.55"),
    ("energy", "0.509"),
    ("loudness", "-9.661"),
    ("speechiness", "0.0362"),
    ("acousticness", "0.777"),
    ("instrumentalness", "0.202"),
    ("liveness", "0.115"),
    ("valence", "0.544"),
    ("tempo", "90.459"),
    ("duration_ms", "216506"),
    ("key", "1"),
    ("mode", "1"),
    ("time_signature", "3"),
];

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub artifact_dir: PathBuf,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(FIXTURE_MODEL, FIXTURE_COLUMNS).await
    }

    pub async fn spawn_with(model_json: &str, columns_json: &str) -> Self {
        let artifact_dir = write_artifacts(model_json, columns_json);
        let config = test_config(&artifact_dir);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            artifact_dir,
        }
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.address, path))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub fn cleanup(&self) {
        std::fs::remove_dir_all(&self.artifact_dir).ok();
    }
}

/// Write artifacts to a fresh directory under `target/`.
pub fn write_artifacts(model_json: &str, columns_json: &str) -> PathBuf {
    let dir = PathBuf::from(format!("target/test-artifacts-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("Failed to create artifact dir");
    std::fs::write(dir.join("model.json"), model_json).expect("Failed to write model");
    std::fs::write(dir.join("columns.json"), columns_json).expect("Failed to write columns");
    dir
}

pub fn test_config(artifact_dir: &Path) -> PopularityConfig {
    PopularityConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "info".to_string(),
            otlp_endpoint: None,
        },
        artifacts: ArtifactConfig {
            model_path: artifact_dir.join("model.json"),
            columns_path: artifact_dir.join("columns.json"),
        },
        docs: DocsConfig { enabled: true },
    }
}

pub fn without(query: &[(&'static str, &'static str)], name: &str) -> Vec<(&'static str, &'static str)> {
    query.iter().copied().filter(|(key, _)| *key != name).collect()
}
