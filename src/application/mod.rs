//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod analytics;
mod inference;
mod training;

pub use analytics::{column_histogram, AnalyticsService};
pub use inference::InferenceService;
pub use training::{cross_validate, format_summary, TrainingService};

#[cfg(test)]
pub(crate) mod fixtures {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::domain::{index, Dataset, FEATURE_COUNT};

    /// Synthetic clinical rows whose outcome follows max heart rate and ST depression.
    pub fn synthetic_dataset(n: usize, seed: u64) -> Dataset {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut rows = Vec::with_capacity(n);
        let mut labels = Vec::with_capacity(n);

        for i in 0..n {
            let label = (i % 2) as u8;
            let healthy = label == 1;
            let mut row = [0.0; FEATURE_COUNT];
            row[index::AGE] = rng.gen_range(29.0..77.0_f64).round();
            row[index::SEX] = f64::from(rng.gen_range(0..2u8));
            row[index::CHEST_PAIN] = f64::from(rng.gen_range(0..4u8));
            row[index::RESTING_BP] = rng.gen_range(94.0..200.0_f64).round();
            row[index::CHOLESTEROL] = rng.gen_range(126.0..564.0_f64).round();
            row[index::FASTING_BLOOD_SUGAR] = f64::from(rng.gen_range(0..2u8));
            row[index::REST_ECG] = f64::from(rng.gen_range(0..3u8));
            row[index::MAX_HEART_RATE] = if healthy {
                rng.gen_range(140.0..202.0_f64)
            } else {
                rng.gen_range(71.0..160.0_f64)
            }
            .round();
            row[index::EXERCISE_ANGINA] = f64::from(u8::from(!healthy && rng.gen_bool(0.6)));
            row[index::OLD_PEAK] = if healthy {
                rng.gen_range(0.0..1.5_f64)
            } else {
                rng.gen_range(0.5..6.2_f64)
            };
            row[index::SLOPE] = f64::from(rng.gen_range(0..3u8));
            row[index::CA_COUNT] = f64::from(rng.gen_range(0..5u8));
            row[index::THAL] = f64::from(rng.gen_range(0..4u8));
            rows.push(row);
            labels.push(label);
        }

        Dataset { rows, labels }
    }
}
