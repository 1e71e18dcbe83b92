//! In-memory labelled dataset and seeded partitioning.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{FeatureVector, TrainingError, FEATURE_NAMES};

/// Rows of raw features with their binary outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<FeatureVector>,
    pub labels: Vec<u8>,
}

impl Dataset {
    /// Create a dataset from rows and labels.
    ///
    /// # Errors
    /// Returns error if the counts differ.
    pub fn new(rows: Vec<FeatureVector>, labels: Vec<u8>) -> Result<Self, TrainingError> {
        if rows.len() != labels.len() {
            return Err(TrainingError::LabelCountMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        Ok(Self { rows, labels })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count of samples with label 0 and label 1.
    #[must_use]
    pub fn class_counts(&self) -> (usize, usize) {
        let ones = self.labels.iter().filter(|l| **l == 1).count();
        (self.labels.len() - ones, ones)
    }

    /// Values of one feature column, looked up by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = FEATURE_NAMES.iter().position(|n| *n == name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }

    fn subset(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().map(|&i| self.rows[i]).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Shuffle with a seeded RNG and split off `ceil(n * test_fraction)` rows for testing.
    ///
    /// Both partitions always keep at least one row.
    ///
    /// # Errors
    /// Returns error if there are fewer than two rows.
    pub fn train_test_split(
        &self,
        test_fraction: f64,
        seed: u64,
    ) -> Result<(Self, Self), TrainingError> {
        let n = self.len();
        if n < 2 {
            return Err(TrainingError::TooFewSamples { needed: 2, got: n });
        }

        let n_test = ((n as f64) * test_fraction).ceil() as usize;
        let n_test = n_test.clamp(1, n - 1);

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (test_idx, train_idx) = indices.split_at(n_test);
        Ok((self.subset(train_idx), self.subset(test_idx)))
    }
}

/// Stratified k-fold assignment without shuffling.
///
/// Samples of each class are dealt into folds in order, contiguous within the
/// class, so every fold keeps roughly the overall class balance.
/// Returns `(train_indices, validation_indices)` per fold.
///
/// # Errors
/// Returns error if `k < 2`, if no class has at least `k` members, or if
/// any validation fold would be empty.
pub fn stratified_folds(
    labels: &[u8],
    k: usize,
) -> Result<Vec<(Vec<usize>, Vec<usize>)>, TrainingError> {
    if k < 2 || labels.len() < k {
        return Err(TrainingError::TooFewSamples {
            needed: k.max(2),
            got: labels.len(),
        });
    }

    let ones = labels.iter().filter(|l| **l == 1).count();
    let largest = ones.max(labels.len() - ones);
    if largest < k {
        return Err(TrainingError::TooFewSamples {
            needed: k,
            got: largest,
        });
    }

    let mut fold_of = vec![0usize; labels.len()];
    for class in [0u8, 1u8] {
        let members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == class)
            .map(|(i, _)| i)
            .collect();
        let m = members.len();
        for (j, &i) in members.iter().enumerate() {
            fold_of[i] = j * k / m.max(1);
        }
    }

    let folds: Vec<(Vec<usize>, Vec<usize>)> = (0..k)
        .map(|fold| {
            let (val, train): (Vec<usize>, Vec<usize>) =
                (0..labels.len()).partition(|&i| fold_of[i] == fold);
            (train, val)
        })
        .collect();

    if let Some(empty) = folds.iter().position(|(_, val)| val.is_empty()) {
        tracing::warn!("Validation fold {} of {} would be empty", empty + 1, k);
        return Err(TrainingError::TooFewSamples {
            needed: k,
            got: labels.len(),
        });
    }

    Ok(folds)
}
