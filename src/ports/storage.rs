//! Storage port: Trait for persisting trained artifacts.
//!
//! This trait abstracts the artifact backend (JSON files) from the application logic.

use crate::domain::TrainedArtifacts;

/// Trait for local artifact storage.
///
/// A store holds at most one artifact set: the scaler and model of a
/// single training run, bound together so they can never be mixed.
pub trait ArtifactStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist an artifact set, replacing any previous one.
    ///
    /// # Errors
    /// Returns error if writing fails.
    fn save(&self, artifacts: &TrainedArtifacts) -> Result<(), Self::Error>;

    /// Load and verify the stored artifact set.
    ///
    /// # Errors
    /// Returns error if the set is missing, corrupt or inconsistent.
    fn load(&self) -> Result<TrainedArtifacts, Self::Error>;

    /// Check if an artifact set appears to be present (not verified).
    fn exists(&self) -> bool;
}
