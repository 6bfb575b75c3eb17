use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

use crate::models::{ObservationsResponse, PredictionResponse, SongFeatures};
use crate::services::record_prediction;
use crate::AppState;

/// Predict the popularity of a song from its audio features.
#[utoipa::path(
    get,
    path = "/predict/",
    params(SongFeatures),
    responses(
        (status = 200, description = "Predicted popularity", body = PredictionResponse),
        (status = 400, description = "Malformed query string"),
        (status = 422, description = "Missing or non-numeric feature"),
        (status = 500, description = "Model failure")
    ),
    tag = "Prediction"
)]
#[tracing::instrument(skip_all)]
pub async fn predict_popularity(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PredictionResponse>, AppError> {
    let features = SongFeatures::from_query_pairs(pairs)?;

    let popularity = state
        .popularity
        .predict(&features)
        .map_err(anyhow::Error::new)?;
    record_prediction("predict", 1);

    Ok(Json(PredictionResponse { popularity }))
}

/// Predict two reference songs whose real popularity is known.
#[utoipa::path(
    get,
    path = "/predict/observaciones",
    responses(
        (status = 200, description = "Reference observations with predictions and errors", body = ObservationsResponse),
        (status = 500, description = "Model failure")
    ),
    tag = "Prediction"
)]
#[tracing::instrument(skip_all)]
pub async fn reference_observations(
    State(state): State<AppState>,
) -> Result<Json<ObservationsResponse>, AppError> {
    let response = state
        .popularity
        .predict_reference_observations()
        .map_err(anyhow::Error::new)?;
    record_prediction("observaciones", 2);

    Ok(Json(response))
}
