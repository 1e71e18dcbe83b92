//! Per-feature standardization.
//!
//! The scaler is fitted once on the training partition and then frozen:
//! test and inference vectors are transformed with the training statistics.

use serde::{Deserialize, Serialize};

use super::{InputValidationError, ParameterError, TrainingError};

/// Frozen mean / standard deviation per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl FeatureScaler {
    /// Fit on training rows.
    ///
    /// The standard deviation is the population deviation (divisor `n`).
    /// A feature whose variance is within rounding noise of zero is stored
    /// with a deviation of exactly 0.
    ///
    /// # Errors
    /// Returns error if there are no rows or the rows differ in length.
    pub fn fit<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, TrainingError> {
        let first = rows.first().ok_or(TrainingError::EmptyTrainingSet)?;
        let width = first.as_ref().len();
        if width == 0 {
            return Err(TrainingError::EmptyTrainingSet);
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; width];
        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(TrainingError::RaggedRow {
                    row: row_idx,
                    expected: width,
                    got: row.len(),
                });
            }
            for (m, x) in means.iter_mut().zip(row) {
                *m += x;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut stds = vec![0.0; width];
        for row in rows {
            for ((s, x), m) in stds.iter_mut().zip(row.as_ref()).zip(&means) {
                let d = x - m;
                *s += d * d;
            }
        }
        for (s, m) in stds.iter_mut().zip(&means) {
            let var = *s / n;
            *s = if is_constant(var, *m, n) { 0.0 } else { var.sqrt() };
        }

        let constant = stds.iter().filter(|s| **s == 0.0).count();
        if constant > 0 {
            tracing::warn!(
                "{} feature(s) have zero variance in the training data; they will transform to 0",
                constant
            );
        }

        Ok(Self { means, stds })
    }

    /// Rebuild a scaler from stored statistics.
    ///
    /// # Errors
    /// Returns error if the vectors differ in length, are empty, contain
    /// non-finite values or negative deviations.
    pub fn from_parts(means: Vec<f64>, stds: Vec<f64>) -> Result<Self, ParameterError> {
        if means.is_empty() {
            return Err(ParameterError::Empty);
        }
        if means.len() != stds.len() {
            return Err(ParameterError::LengthMismatch {
                left: means.len(),
                right: stds.len(),
            });
        }
        if means.iter().chain(&stds).any(|v| !v.is_finite()) {
            return Err(ParameterError::NonFinite);
        }
        if stds.iter().any(|s| *s < 0.0) {
            return Err(ParameterError::NegativeDeviation);
        }
        Ok(Self { means, stds })
    }

    /// Number of features the scaler was fitted on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    #[must_use]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    #[must_use]
    pub fn stds(&self) -> &[f64] {
        &self.stds
    }

    /// Standardize one vector.
    ///
    /// A zero-variance feature transforms to exactly 0.
    ///
    /// # Errors
    /// Returns error if the vector length does not match the fitted width.
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>, InputValidationError> {
        if x.len() != self.means.len() {
            return Err(InputValidationError::WrongLength {
                expected: self.means.len(),
                got: x.len(),
            });
        }

        Ok(x.iter()
            .zip(&self.means)
            .zip(&self.stds)
            .map(|((x, m), s)| if *s == 0.0 { 0.0 } else { (x - m) / s })
            .collect())
    }

    /// Standardize many rows.
    ///
    /// # Errors
    /// Returns the first length mismatch.
    pub fn transform_batch<R: AsRef<[f64]>>(
        &self,
        rows: &[R],
    ) -> Result<Vec<Vec<f64>>, InputValidationError> {
        rows.iter().map(|r| self.transform(r.as_ref())).collect()
    }
}

/// Variance below the accumulated rounding error of the two-pass estimate.
fn is_constant(var: f64, mean: f64, n: f64) -> bool {
    let eps = f64::EPSILON;
    var <= n * eps * var + (n * mean * eps).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_stats(rows: &[Vec<f64>], j: usize) -> (f64, f64) {
        let n = rows.len() as f64;
        let mean = rows.iter().map(|r| r[j]).sum::<f64>() / n;
        let var = rows.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / n;
        (mean, var.sqrt())
    }

    #[test]
    fn test_transformed_training_data_is_standardized() {
        let rows = vec![
            vec![63.0, 145.0, 233.0],
            vec![37.0, 130.0, 250.0],
            vec![41.0, 130.0, 204.0],
            vec![56.0, 120.0, 236.0],
            vec![57.0, 120.0, 354.0],
            vec![57.0, 140.0, 192.0],
        ];
        let scaler = FeatureScaler::fit(&rows).expect("fit");
        let out = scaler.transform_batch(&rows).expect("transform");

        for j in 0..3 {
            let (mean, std) = column_stats(&out, j);
            assert!(mean.abs() < 1e-9, "feature {j} mean {mean}");
            assert!((std - 1.0).abs() < 1e-9, "feature {j} std {std}");
        }
    }

    #[test]
    fn test_constant_column_transforms_to_zero() {
        let rows: Vec<Vec<f64>> = (0..5)
            .map(|i| vec![40.0 + i as f64, 200.0])
            .collect();
        let scaler = FeatureScaler::fit(&rows).expect("fit");
        assert_eq!(scaler.stds()[1], 0.0);

        let out = scaler.transform(&[45.0, 260.0]).expect("transform");
        assert_eq!(out[1], 0.0);
        assert!(out[0].is_finite());
    }

    #[test]
    fn test_fractional_constant_columns_transform_to_zero() {
        let rows: Vec<Vec<f64>> = (0..7)
            .map(|i| vec![1.0 + i as f64, 0.1, 2.3])
            .collect();
        let scaler = FeatureScaler::fit(&rows).expect("fit");
        assert_eq!(scaler.stds()[1], 0.0);
        assert_eq!(scaler.stds()[2], 0.0);
        assert!(scaler.stds()[0] > 0.0);

        for row in scaler.transform_batch(&rows).expect("transform") {
            assert_eq!(&row[1..], &[0.0, 0.0]);
        }
        let out = scaler.transform(&[4.0, 2.0, 0.0]).expect("transform");
        assert_eq!(&out[1..], &[0.0, 0.0]);
    }

    #[test]
    fn test_fit_rejects_empty_and_ragged() {
        let empty: Vec<Vec<f64>> = Vec::new();
        assert!(matches!(
            FeatureScaler::fit(&empty),
            Err(TrainingError::EmptyTrainingSet)
        ));

        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            FeatureScaler::fit(&ragged),
            Err(TrainingError::RaggedRow { row: 1, .. })
        ));
    }

    #[test]
    fn test_transform_rejects_wrong_length() {
        let scaler = FeatureScaler::fit(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("fit");
        assert_eq!(
            scaler.transform(&[1.0, 2.0, 3.0]),
            Err(InputValidationError::WrongLength {
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn test_serde_roundtrip_is_bit_exact() {
        let rows = vec![
            vec![0.1, 1.0 / 3.0, 123_456.789],
            vec![0.7, 2.0 / 7.0, 1e-9],
            vec![0.3, 5.0 / 11.0, -42.42],
        ];
        let scaler = FeatureScaler::fit(&rows).expect("fit");
        let json = serde_json::to_string(&scaler).expect("serialize");
        let back: FeatureScaler = serde_json::from_str(&json).expect("deserialize");

        for (a, b) in scaler.means().iter().zip(back.means()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        for (a, b) in scaler.stds().iter().zip(back.stds()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_from_parts_validation() {
        assert!(FeatureScaler::from_parts(vec![0.0], vec![1.0]).is_ok());
        assert_eq!(
            FeatureScaler::from_parts(vec![0.0, 1.0], vec![1.0]),
            Err(ParameterError::LengthMismatch { left: 2, right: 1 })
        );
        assert_eq!(
            FeatureScaler::from_parts(Vec::new(), Vec::new()),
            Err(ParameterError::Empty)
        );
        assert_eq!(
            FeatureScaler::from_parts(vec![f64::NAN], vec![1.0]),
            Err(ParameterError::NonFinite)
        );
        assert_eq!(
            FeatureScaler::from_parts(vec![0.0], vec![-1.0]),
            Err(ParameterError::NegativeDeviation)
        );
    }
}
