//! Output of one training run.

use serde::{Deserialize, Serialize};

use super::{FeatureScaler, InputValidationError, PatientFeatures, Prediction, RiskModel};

/// Metrics reported by a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrainingMetrics {
    /// Per-fold cross-validation accuracy on the training split
    pub cv_scores: Vec<f64>,
    /// Mean of `cv_scores`
    pub cv_mean: f64,
    /// Accuracy on the held-out test split
    pub test_accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
    /// Whether the optimizer met its gradient tolerance on the final fit
    pub converged: bool,
}

/// Scaler and model of one training run, always used together.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedArtifacts {
    /// Identifier shared by every file of the run
    pub run_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub scaler: FeatureScaler,
    pub model: RiskModel,
    pub metrics: TrainingMetrics,
}

impl TrainedArtifacts {
    /// Create artifacts for a fresh run with a random identifier.
    #[must_use]
    pub fn new(scaler: FeatureScaler, model: RiskModel, metrics: TrainingMetrics) -> Self {
        Self {
            run_id: run_id(),
            created_at: chrono::Utc::now(),
            scaler,
            model,
            metrics,
        }
    }

    /// Scale raw features and predict.
    ///
    /// # Errors
    /// Returns error if the scaler or model width differs from the feature count.
    pub fn predict(&self, features: &PatientFeatures) -> Result<Prediction, InputValidationError> {
        let scaled = self.scaler.transform(&features.to_array())?;
        self.model.prediction(&scaled)
    }
}

/// Generate a random UUID v4 string for a training run.
fn run_id() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_format() {
        let a = run_id();
        let b = run_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
        assert_eq!(a.as_bytes()[14], b'4');
    }

    #[test]
    fn test_predict_goes_through_scaler() {
        let rows: Vec<Vec<f64>> = (0..4)
            .map(|i| (0..13).map(|j| (i * 13 + j) as f64).collect())
            .collect();
        let scaler = FeatureScaler::fit(&rows).unwrap();
        let mut weights = vec![0.0; 13];
        weights[0] = 2.0;
        let model = RiskModel::new(weights, 0.0).unwrap();
        let artifacts = TrainedArtifacts::new(scaler, model, TrainingMetrics::default());

        // Row mean for feature 0 is 19.5, so a value above it scales positive.
        let above = PatientFeatures {
            age: 30.0,
            ..Default::default()
        };
        assert!(artifacts.predict(&above).unwrap().p_low > 0.5);

        let below = PatientFeatures {
            age: 10.0,
            ..Default::default()
        };
        assert!(artifacts.predict(&below).unwrap().p_low < 0.5);
    }
}
