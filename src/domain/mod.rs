//! Domain layer: Core types and logic.
//!
//! Pure Rust types with no I/O. All types are serializable and
//! implement strict validation.

pub mod advice;
mod artifact;
mod dataset;
mod diagnosis;
pub mod histogram;
mod model;
mod patient;
mod scaler;

pub use advice::{suggestions_for, SuggestionBlock, SuggestionKind};
pub use artifact::{TrainedArtifacts, TrainingMetrics};
pub use dataset::{stratified_folds, Dataset};
pub use diagnosis::{Prediction, RiskAssessment, RiskLabel};
pub use histogram::{Histogram, HistogramError};
pub use model::{sigmoid, ParameterError, RiskModel, TrainingError};
pub use patient::{
    index, FeatureVector, InputValidationError, PatientFeatures, FEATURE_COUNT, FEATURE_NAMES,
    LABEL_COLUMN,
};
pub use scaler::FeatureScaler;
