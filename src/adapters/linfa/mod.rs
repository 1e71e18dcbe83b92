//! Linfa adapter: Implementation of ModelTrainer using linfa-logistic.
//!
//! Fits an L2-regularized logistic regression with L-BFGS (argmin, via
//! linfa-logistic). The optimizer starts from zero parameters, so fitting is
//! deterministic for identical inputs.
//!
//! # Label orientation
//!
//! linfa picks its own positive class. The fitted parameters are re-oriented
//! so the stored model always scores class 1 (low risk).
//!
//! # Convergence
//!
//! The library returns its last iterate when the iteration budget runs out.
//! After fitting we evaluate the gradient of the regularized objective at
//! the returned parameters; if it exceeds the tolerance the fit is reported
//! as not converged and a warning is logged. The parameters are still used.

use linfa::prelude::*;
use linfa::Dataset as LinfaDataset;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Array2};

use crate::domain::{sigmoid, RiskModel, TrainingError};
use crate::ports::{FitOutcome, ModelTrainer};

/// Default L2 penalty strength.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Default iteration budget for L-BFGS.
pub const DEFAULT_MAX_ITERATIONS: u64 = 100;

/// Mean-gradient infinity norm below which a fit counts as converged.
const CONVERGENCE_TOLERANCE: f64 = 1e-4;

/// Logistic-regression trainer backed by linfa.
#[derive(Debug, Clone)]
pub struct LinfaTrainer {
    alpha: f64,
    max_iterations: u64,
}

impl LinfaTrainer {
    /// Create a trainer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Set the L2 penalty strength.
    #[must_use]
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the iteration budget.
    #[must_use]
    pub fn max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn to_matrix(rows: &[Vec<f64>]) -> Result<Array2<f64>, TrainingError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(TrainingError::EmptyTrainingSet);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(TrainingError::RaggedRow {
                row,
                expected: width,
                got: r.len(),
            });
        }

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Array2::from_shape_vec((rows.len(), width), flat)
            .map_err(|e| TrainingError::Optimizer(format!("Invalid feature matrix: {e}")))
    }

    /// Infinity norm of the gradient of the regularized objective divided by `n`.
    ///
    /// Objective: `sum(logloss) + alpha/2 * ||w||^2` (intercept not penalized).
    fn mean_gradient_norm(
        &self,
        x: &Array2<f64>,
        y: &[u8],
        weights: &Array1<f64>,
        bias: f64,
    ) -> f64 {
        let n = x.nrows() as f64;
        let residual: Array1<f64> = x
            .rows()
            .into_iter()
            .zip(y)
            .map(|(row, &label)| sigmoid(row.dot(weights) + bias) - f64::from(label))
            .collect();

        let grad_w = x.t().dot(&residual) + weights * self.alpha;
        let grad_b = residual.sum();

        grad_w
            .iter()
            .chain(std::iter::once(&grad_b))
            .fold(0.0_f64, |acc, g| acc.max(g.abs()))
            / n
    }
}

impl Default for LinfaTrainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelTrainer for LinfaTrainer {
    fn fit(&self, rows: &[Vec<f64>], labels: &[u8]) -> Result<FitOutcome, TrainingError> {
        if rows.len() != labels.len() {
            return Err(TrainingError::LabelCountMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        let ones = labels.iter().filter(|l| **l == 1).count();
        if ones == 0 || ones == labels.len() {
            return Err(TrainingError::SingleClass);
        }

        let x = Self::to_matrix(rows)?;
        let targets: Array1<usize> = labels.iter().map(|&l| usize::from(l)).collect();
        let dataset = LinfaDataset::new(x.clone(), targets);

        tracing::debug!(
            "Fitting logistic regression on {} rows x {} features (alpha={}, max_iter={})",
            x.nrows(),
            x.ncols(),
            self.alpha,
            self.max_iterations
        );

        let fitted = LogisticRegression::default()
            .alpha(self.alpha)
            .max_iterations(self.max_iterations)
            .fit(&dataset)
            .map_err(|e| TrainingError::Optimizer(e.to_string()))?;

        // Re-orient so the stored logit scores class 1.
        let (weights, bias) = if fitted.labels().pos.class == 1 {
            (fitted.params().to_owned(), fitted.intercept())
        } else {
            (fitted.params().mapv(|w| -w), -fitted.intercept())
        };

        let gradient_norm = self.mean_gradient_norm(&x, labels, &weights, bias);
        let converged = gradient_norm <= CONVERGENCE_TOLERANCE;
        if !converged {
            tracing::warn!(
                "Optimizer did not converge within {} iterations (gradient norm {:.2e}); using last iterate",
                self.max_iterations,
                gradient_norm
            );
        }

        let model = RiskModel::new(weights.to_vec(), bias)
            .map_err(|e| TrainingError::Optimizer(e.to_string()))?;

        Ok(FitOutcome {
            model,
            converged,
            gradient_norm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Two noisy clusters: class 1 centred at +1, class 0 at -1, in every feature.
    fn clusters(n: usize, width: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<u8>) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut rows = Vec::with_capacity(n);
        let mut labels = Vec::with_capacity(n);
        for i in 0..n {
            let label = (i % 2) as u8;
            let centre = if label == 1 { 1.0 } else { -1.0 };
            rows.push(
                (0..width)
                    .map(|_| centre + rng.gen_range(-1.5..1.5))
                    .collect(),
            );
            labels.push(label);
        }
        (rows, labels)
    }

    #[test]
    fn test_fit_scores_class_one() {
        let (rows, labels) = clusters(200, 3, 1);
        let outcome = LinfaTrainer::new().fit(&rows, &labels).expect("fit");

        assert!(outcome.model.weights().iter().all(|w| *w > 0.0));
        let acc = outcome.model.evaluate(&rows, &labels).unwrap();
        assert!(acc > 0.85, "accuracy {acc}");

        let (_, p1) = outcome.model.predict_proba(&[2.0, 2.0, 2.0]).unwrap();
        assert!(p1 > 0.9);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (rows, labels) = clusters(120, 13, 7);
        let a = LinfaTrainer::new().fit(&rows, &labels).expect("fit");
        let b = LinfaTrainer::new().fit(&rows, &labels).expect("fit");
        assert_eq!(a.model, b.model);
    }

    #[test]
    fn test_single_class_rejected() {
        let rows = vec![vec![1.0], vec![2.0]];
        assert_eq!(
            LinfaTrainer::new().fit(&rows, &[1, 1]),
            Err(TrainingError::SingleClass)
        );
    }

    #[test]
    fn test_label_count_mismatch() {
        let rows = vec![vec![1.0], vec![2.0]];
        assert!(matches!(
            LinfaTrainer::new().fit(&rows, &[1]),
            Err(TrainingError::LabelCountMismatch { .. })
        ));
    }

    #[test]
    fn test_tiny_budget_still_returns_model() {
        let (rows, labels) = clusters(100, 4, 3);
        let outcome = LinfaTrainer::new()
            .max_iterations(1)
            .fit(&rows, &labels)
            .expect("fit");
        assert_eq!(outcome.model.n_features(), 4);
        assert!(outcome.gradient_norm.is_finite());
    }
}
