//! Trainer port: Trait for fitting the risk model.
//!
//! This trait abstracts the optimizer library (linfa) from the application logic.

use crate::domain::{RiskModel, TrainingError};

/// A fitted model together with optimizer diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub model: RiskModel,

    /// Whether the final gradient met the tolerance
    pub converged: bool,

    /// Infinity norm of the mean objective gradient at the returned parameters
    pub gradient_norm: f64,
}

/// Trait for fitting a binary logistic model on standardized rows.
///
/// Implementations must be deterministic: identical inputs yield identical
/// parameters.
pub trait ModelTrainer: Send + Sync {
    /// Fit on standardized rows with labels in {0, 1}.
    ///
    /// The returned model scores class 1.
    ///
    /// # Errors
    /// Returns `TrainingError::SingleClass` if only one label is present,
    /// `TrainingError::Optimizer` if the optimizer fails outright.
    fn fit(&self, rows: &[Vec<f64>], labels: &[u8]) -> Result<FitOutcome, TrainingError>;
}
