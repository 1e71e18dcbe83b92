//! Dataset port: Trait for reading labelled training data.

use crate::domain::Dataset;

/// Source of labelled rows for training and plotting.
pub trait DatasetSource {
    /// Error type for load operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every row.
    ///
    /// # Errors
    /// Returns error if the source is missing or malformed.
    fn load(&self) -> Result<Dataset, Self::Error>;
}
