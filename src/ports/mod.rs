//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (optimizer library,
//! filesystem, tabular data source).

mod dataset;
mod storage;
mod trainer;

pub use dataset::DatasetSource;
pub use storage::ArtifactStore;
pub use trainer::{FitOutcome, ModelTrainer};
