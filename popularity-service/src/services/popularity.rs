use crate::config::ArtifactConfig;
use crate::models::{
    absolute_error, reference_observations, ObservationsResponse, SongFeatures,
};
use crate::services::artifacts::{ArtifactError, ColumnLayout};
use crate::services::catboost::ObliviousEnsemble;
use crate::services::predictor::{Predictor, PredictorError};
use std::sync::Arc;

/// Serves popularity predictions from a model and the column order it was
/// trained with. Both are fixed for the lifetime of the service.
#[derive(Clone)]
pub struct PopularityService {
    predictor: Arc<dyn Predictor>,
    layout: ColumnLayout,
}

impl PopularityService {
    /// Pair a predictor with its column layout, failing if they disagree.
    pub fn new(predictor: Arc<dyn Predictor>, layout: ColumnLayout) -> Result<Self, ArtifactError> {
        layout.check_predictor(predictor.as_ref())?;
        Ok(Self { predictor, layout })
    }

    pub fn from_artifacts(artifacts: &ArtifactConfig) -> Result<Self, ArtifactError> {
        let layout = ColumnLayout::load(&artifacts.columns_path)?;
        tracing::info!(
            path = %artifacts.columns_path.display(),
            columns = layout.len(),
            "Loaded column order"
        );

        let model = ObliviousEnsemble::load(&artifacts.model_path)?;
        tracing::info!(
            path = %artifacts.model_path.display(),
            trees = model.tree_count(),
            features = model.n_features(),
            "Loaded popularity model"
        );

        Self::new(Arc::new(model), layout)
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn predict(&self, features: &SongFeatures) -> Result<f64, PredictorError> {
        self.predictor.predict_one(self.layout.arrange(features))
    }

    /// Predict both reference observations in one batch.
    pub fn predict_reference_observations(&self) -> Result<ObservationsResponse, PredictorError> {
        let [first, second] = reference_observations();
        let rows = vec![
            self.layout.arrange(&first.song.features()),
            self.layout.arrange(&second.song.features()),
        ];

        let predictions = self.predictor.predict_batch(&rows)?;
        let [prediction_1, prediction_2] = predictions[..] else {
            return Err(PredictorError::OutputCount {
                expected: rows.len(),
                actual: predictions.len(),
            });
        };

        Ok(ObservationsResponse {
            observation_1: first.song,
            prediction_1,
            actual_popularity_1: first.popularity,
            absolute_error_1: absolute_error(prediction_1, first.popularity),
            observation_2: second.song,
            prediction_2,
            actual_popularity_2: second.popularity,
            absolute_error_2: absolute_error(prediction_2, second.popularity),
        })
    }
}
