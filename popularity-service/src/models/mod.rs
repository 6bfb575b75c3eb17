pub mod features;
pub mod observations;
pub mod prediction;

pub use features::{Feature, FeatureKind, SongFeatures};
pub use observations::{reference_observations, LabeledObservation, ObservedSong};
pub use prediction::{absolute_error, ObservationsResponse, PredictionResponse};
