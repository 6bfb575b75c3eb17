use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

/// Liveness probe. Artifacts are loaded before the listener is bound, so a
/// responding server always has its model.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy")),
    tag = "Observability"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let layout = state.popularity.layout();

    Json(json!({
        "status": "ok",
        "service": "popularity-service",
        "version": env!("CARGO_PKG_VERSION"),
        "model": {
            "features": layout.len(),
            "columns": layout.names(),
        }
    }))
}

/// Readiness probe.
pub async fn readiness_check() -> impl IntoResponse {
    StatusCode::OK
}
