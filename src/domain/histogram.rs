//! Equal-width histogram of one feature column.

use serde::{Deserialize, Serialize};

/// Default bucket count for feature distributions.
pub const DEFAULT_BINS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HistogramError {
    #[error("bin count must be positive")]
    NoBins,

    #[error("no finite values to bucket")]
    NoValues,
}

/// Bucket counts over `[min, max]`.
///
/// Bucket `i` covers `[min + i*w, min + (i+1)*w)`; the last bucket also
/// includes `max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bucket the finite values of `values` into `bins` equal-width buckets.
    ///
    /// # Errors
    /// Returns error if `bins` is 0 or there are no finite values.
    pub fn from_values(values: &[f64], bins: usize) -> Result<Self, HistogramError> {
        if bins == 0 {
            return Err(HistogramError::NoBins);
        }
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Err(HistogramError::NoValues);
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut counts = vec![0u64; bins];

        let width = (max - min) / bins as f64;
        for v in finite {
            let idx = if width > 0.0 {
                (((v - min) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[idx] += 1;
        }

        Ok(Self { min, max, counts })
    }

    /// Width of one bucket (0 when all values are equal).
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Lower and upper edge of bucket `i`.
    #[must_use]
    pub fn bin_edges(&self, i: usize) -> (f64, f64) {
        let w = self.bin_width();
        (self.min + w * i as f64, self.min + w * (i + 1) as f64)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Plain-text table, one line per bucket.
    #[must_use]
    pub fn render_table(&self, bar_width: usize) -> String {
        let peak = self.max_count().max(1);
        let mut out = String::new();
        for (i, count) in self.counts.iter().enumerate() {
            let (lo, hi) = self.bin_edges(i);
            let len = (*count as usize * bar_width) / peak as usize;
            out.push_str(&format!(
                "{lo:>8.1} - {hi:>8.1} | {count:>4} {}\n",
                "#".repeat(len)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_len() {
        let values: Vec<f64> = (0..303).map(|i| 126.0 + (i * 7 % 438) as f64).collect();
        let h = Histogram::from_values(&values, DEFAULT_BINS).unwrap();
        assert_eq!(h.counts.len(), 20);
        assert_eq!(h.total(), 303);
    }

    #[test]
    fn test_max_goes_to_last_bucket() {
        let h = Histogram::from_values(&[0.0, 5.0, 10.0], 2).unwrap();
        assert_eq!(h.counts, vec![1, 2]);
        assert_eq!(h.bin_edges(1), (5.0, 10.0));
    }

    #[test]
    fn test_constant_values() {
        let h = Histogram::from_values(&[200.0; 5], 20).unwrap();
        assert_eq!(h.counts[0], 5);
        assert_eq!(h.total(), 5);
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            Histogram::from_values(&[], 20),
            Err(HistogramError::NoValues)
        );
        assert_eq!(
            Histogram::from_values(&[f64::NAN], 20),
            Err(HistogramError::NoValues)
        );
        assert_eq!(Histogram::from_values(&[1.0], 0), Err(HistogramError::NoBins));
    }

    #[test]
    fn test_render_table() {
        let h = Histogram::from_values(&[0.0, 1.0, 1.0], 2).unwrap();
        let table = h.render_table(10);
        assert_eq!(table.lines().count(), 2);
        assert!(table.lines().nth(1).unwrap().ends_with("##########"));
    }
}
