pub mod artifacts;
pub mod catboost;
pub mod metrics;
pub mod popularity;
pub mod predictor;

pub use artifacts::{ArtifactError, ColumnLayout};
pub use catboost::ObliviousEnsemble;
pub use self::metrics::{get_metrics, init_metrics, record_prediction};
pub use popularity::PopularityService;
pub use predictor::{Predictor, PredictorError};
