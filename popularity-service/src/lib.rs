pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::PopularityService;
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Spotify Popularity Prediction",
        version = "1.0",
        description = "Predicts the popularity of a song on Spotify from its audio features."
    ),
    paths(
        handlers::predict::predict_popularity,
        handlers::predict::reference_observations,
        handlers::health::health_check,
    ),
    components(schemas(
        models::SongFeatures,
        models::PredictionResponse,
        models::ObservationsResponse,
        models::ObservedSong,
    )),
    tags(
        (name = "Prediction", description = "Song popularity prediction"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub popularity: Arc<PopularityService>,
}

impl AppState {
    pub fn new(popularity: PopularityService) -> Self {
        Self {
            popularity: Arc::new(popularity),
        }
    }
}
