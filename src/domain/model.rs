//! Linear risk model.
//!
//! Stores the class-1 (low risk) logit: `p_low = sigmoid(w · x + b)`.
//! Fitting is delegated to a [`crate::ports::ModelTrainer`]; this type only
//! holds the frozen parameters and evaluates them.

use serde::{Deserialize, Serialize};

use super::{InputValidationError, Prediction};

/// Errors raised while fitting the scaler or the model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainingError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Row {row} has {got} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Feature and label counts differ ({rows} rows, {labels} labels)")]
    LabelCountMismatch { rows: usize, labels: usize },

    #[error("Training data must contain both classes")]
    SingleClass,

    #[error("Not enough samples: need at least {needed}, got {got}")]
    TooFewSamples { needed: usize, got: usize },

    #[error("Optimizer failed: {0}")]
    Optimizer(String),
}

/// Stored scaler or model parameters that cannot be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("no parameters")]
    Empty,

    #[error("parameter lengths differ ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("parameters must be finite")]
    NonFinite,

    #[error("deviations must be non-negative")]
    NegativeDeviation,
}

/// Numerically stable logistic function.
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Frozen logistic-regression parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskModel {
    weights: Vec<f64>,
    bias: f64,
}

impl RiskModel {
    /// Build a model from weights and bias.
    ///
    /// # Errors
    /// Returns error if there are no weights or any parameter is non-finite.
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self, ParameterError> {
        if weights.is_empty() {
            return Err(ParameterError::Empty);
        }
        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ParameterError::NonFinite);
        }
        Ok(Self { weights, bias })
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn check_len(&self, x: &[f64]) -> Result<(), InputValidationError> {
        if x.len() != self.weights.len() {
            return Err(InputValidationError::WrongLength {
                expected: self.weights.len(),
                got: x.len(),
            });
        }
        Ok(())
    }

    /// Linear score `w · x + b`.
    ///
    /// # Errors
    /// Returns error on length mismatch.
    pub fn decision_function(&self, x: &[f64]) -> Result<f64, InputValidationError> {
        self.check_len(x)?;
        Ok(self.weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + self.bias)
    }

    /// Class probabilities `(p0, p1)` for a standardized vector.
    ///
    /// # Errors
    /// Returns error on length mismatch.
    pub fn predict_proba(&self, x: &[f64]) -> Result<(f64, f64), InputValidationError> {
        let p1 = sigmoid(self.decision_function(x)?);
        Ok((1.0 - p1, p1))
    }

    /// Predicted class for a standardized vector: 1 iff `p1 >= 0.5`.
    ///
    /// # Errors
    /// Returns error on length mismatch.
    pub fn predict(&self, x: &[f64]) -> Result<u8, InputValidationError> {
        let (_, p1) = self.predict_proba(x)?;
        Ok(u8::from(p1 >= 0.5))
    }

    /// Label and both probabilities in one call.
    ///
    /// # Errors
    /// Returns error on length mismatch.
    pub fn prediction(&self, x: &[f64]) -> Result<Prediction, InputValidationError> {
        let (_, p1) = self.predict_proba(x)?;
        Ok(Prediction::from_p_low(p1))
    }

    /// Fraction of rows whose predicted class equals the true label.
    ///
    /// # Errors
    /// Returns error on length mismatch of any row, if rows and labels differ
    /// in count, or if there are no rows.
    pub fn evaluate<R: AsRef<[f64]>>(
        &self,
        rows: &[R],
        labels: &[u8],
    ) -> Result<f64, InputValidationError> {
        if rows.len() != labels.len() {
            return Err(InputValidationError::WrongLength {
                expected: rows.len(),
                got: labels.len(),
            });
        }
        if rows.is_empty() {
            return Err(InputValidationError::NoSamples);
        }

        let mut correct = 0usize;
        for (row, label) in rows.iter().zip(labels) {
            if self.predict(row.as_ref())? == *label {
                correct += 1;
            }
        }
        Ok(correct as f64 / rows.len() as f64)
    }
}
