use super::ObservedSong;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictionResponse {
    /// Predicted popularity score
    #[serde(rename = "Prediccion_popularidad")]
    pub popularity: f64,
}

/// Predictions for the two reference observations next to their known
/// popularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ObservationsResponse {
    #[serde(rename = "Observacion_1")]
    pub observation_1: ObservedSong,
    #[serde(rename = "Prediccion_1")]
    pub prediction_1: f64,
    #[serde(rename = "Popularidad_real_1")]
    pub actual_popularity_1: i64,
    #[serde(rename = "Error_absoluto_1")]
    pub absolute_error_1: f64,
    #[serde(rename = "Observacion_2")]
    pub observation_2: ObservedSong,
    #[serde(rename = "Prediccion_2")]
    pub prediction_2: f64,
    #[serde(rename = "Popularidad_real_2")]
    pub actual_popularity_2: i64,
    #[serde(rename = "Error_absoluto_2")]
    pub absolute_error_2: f64,
}

/// `|prediction - actual|` rounded to two decimals, ties to even.
pub fn absolute_error(prediction: f64, actual: i64) -> f64 {
    ((prediction - actual as f64).abs() * 100.0).round_ties_even() / 100.0
}
