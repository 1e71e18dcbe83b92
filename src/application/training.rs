//! Training service: Builds and persists a scaler/model pair.
//!
//! Pipeline:
//! - Seeded train/test split
//! - Scaler fitted on the training partition only
//! - Stratified k-fold cross-validation on the scaled training rows (reported, not used)
//! - Final fit on the full scaled training partition
//! - Test accuracy, then persistence through the artifact store

use std::sync::Arc;

use crate::config::TrainingConfig;
use crate::domain::{stratified_folds, Dataset, FeatureScaler, TrainedArtifacts, TrainingMetrics};
use crate::ports::{ArtifactStore, DatasetSource, ModelTrainer};
use crate::CardioriskError;

/// Stratified k-fold accuracy of `trainer` on already-scaled rows.
///
/// # Errors
/// Returns error if there are too few rows for `k` folds or a fold fails to fit.
pub fn cross_validate<T: ModelTrainer + ?Sized>(
    trainer: &T,
    rows: &[Vec<f64>],
    labels: &[u8],
    k: usize,
) -> Result<Vec<f64>, CardioriskError> {
    let folds = stratified_folds(labels, k)?;
    let mut scores = Vec::with_capacity(k);

    for (fold, (train_idx, val_idx)) in folds.iter().enumerate() {
        let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows[i].clone()).collect();
        let train_labels: Vec<u8> = train_idx.iter().map(|&i| labels[i]).collect();
        let val_rows: Vec<&[f64]> = val_idx.iter().map(|&i| rows[i].as_slice()).collect();
        let val_labels: Vec<u8> = val_idx.iter().map(|&i| labels[i]).collect();

        let outcome = trainer.fit(&train_rows, &train_labels)?;
        let score = outcome.model.evaluate(&val_rows, &val_labels)?;
        tracing::debug!("Fold {}/{}: accuracy {:.4}", fold + 1, k, score);
        scores.push(score);
    }

    Ok(scores)
}

/// Console summary of a training run.
#[must_use]
pub fn format_summary(metrics: &TrainingMetrics) -> String {
    let scores: Vec<String> = metrics.cv_scores.iter().map(|s| format!("{s:.2}")).collect();
    format!(
        "Cross-validation scores: [{}]\nMean cross-validation accuracy: {:.2}\nTest accuracy: {:.2}",
        scores.join(", "),
        metrics.cv_mean,
        metrics.test_accuracy
    )
}

/// Service for training the risk model.
pub struct TrainingService<T, S>
where
    T: ModelTrainer,
    S: ArtifactStore,
{
    trainer: Arc<T>,
    store: Arc<S>,
    config: TrainingConfig,
}

impl<T, S> TrainingService<T, S>
where
    T: ModelTrainer,
    S: ArtifactStore,
    S::Error: Into<CardioriskError>,
{
    /// Create a new training service.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid.
    pub fn new(
        trainer: Arc<T>,
        store: Arc<S>,
        config: TrainingConfig,
    ) -> Result<Self, CardioriskError> {
        config.validate()?;
        Ok(Self {
            trainer,
            store,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Fit scaler and model on `dataset` without persisting them.
    ///
    /// # Errors
    /// Returns error if the dataset is too small, has a single class, or the
    /// optimizer fails.
    pub fn train(&self, dataset: &Dataset) -> Result<TrainedArtifacts, CardioriskError> {
        let (train, test) = dataset.train_test_split(self.config.test_fraction, self.config.seed)?;
        tracing::info!(
            "Split {} rows into {} train / {} test (seed {})",
            dataset.len(),
            train.len(),
            test.len(),
            self.config.seed
        );

        let scaler = FeatureScaler::fit(&train.rows)?;
        let train_x = scaler.transform_batch(&train.rows)?;
        let test_x = scaler.transform_batch(&test.rows)?;

        let cv_scores = cross_validate(
            self.trainer.as_ref(),
            &train_x,
            &train.labels,
            self.config.cv_folds,
        )?;
        let cv_mean = cv_scores.iter().sum::<f64>() / cv_scores.len() as f64;

        let outcome = self.trainer.fit(&train_x, &train.labels)?;
        let test_accuracy = outcome.model.evaluate(&test_x, &test.labels)?;

        let metrics = TrainingMetrics {
            cv_scores,
            cv_mean,
            test_accuracy,
            n_train: train.len(),
            n_test: test.len(),
            converged: outcome.converged,
        };
        tracing::info!(
            "Training complete: cv_mean={:.4}, test_accuracy={:.4}, converged={}",
            metrics.cv_mean,
            metrics.test_accuracy,
            metrics.converged
        );

        Ok(TrainedArtifacts::new(scaler, outcome.model, metrics))
    }

    /// Fit on `dataset` and persist the artifact set.
    ///
    /// # Errors
    /// Returns error if training or saving fails.
    pub fn train_and_save(&self, dataset: &Dataset) -> Result<TrainedArtifacts, CardioriskError> {
        let artifacts = self.train(dataset)?;
        self.store
            .save(&artifacts)
            .map_err(Into::<CardioriskError>::into)?;
        Ok(artifacts)
    }

    /// Load a dataset from `source`, then train and persist.
    ///
    /// # Errors
    /// Returns error if loading, training or saving fails.
    pub fn run<D>(&self, source: &D) -> Result<TrainedArtifacts, CardioriskError>
    where
        D: DatasetSource,
        D::Error: Into<CardioriskError>,
    {
        let dataset = source.load().map_err(Into::<CardioriskError>::into)?;
        self.train_and_save(&dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::json::JsonArtifactStore;
    use crate::adapters::linfa::LinfaTrainer;
    use crate::application::fixtures::synthetic_dataset;
    use crate::domain::TrainingError;
    use tempfile::tempdir;

    fn service(dir: &std::path::Path) -> TrainingService<LinfaTrainer, JsonArtifactStore> {
        TrainingService::new(
            Arc::new(LinfaTrainer::new()),
            Arc::new(JsonArtifactStore::new(dir)),
            TrainingConfig::default(),
        )
        .expect("valid config")
    }

    #[test]
    fn test_train_reports_metrics() {
        let dir = tempdir().unwrap();
        let artifacts = service(dir.path()).train(&synthetic_dataset(303, 1)).unwrap();

        assert_eq!(artifacts.metrics.n_test, 61);
        assert_eq!(artifacts.metrics.n_train, 242);
        assert_eq!(artifacts.metrics.cv_scores.len(), 5);
        assert!(artifacts.metrics.cv_scores.iter().all(|s| (0.0..=1.0).contains(s)));
        assert!(artifacts.metrics.test_accuracy > 0.7);
    }

    #[test]
    fn test_training_is_reproducible() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        let data = synthetic_dataset(200, 9);

        let a = svc.train(&data).unwrap();
        let b = svc.train(&data).unwrap();
        assert_eq!(a.model, b.model);
        assert_eq!(a.scaler, b.scaler);
        assert_eq!(a.metrics, b.metrics);
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_train_and_save_persists() {
        let dir = tempdir().unwrap();
        let svc = service(dir.path());
        let artifacts = svc.train_and_save(&synthetic_dataset(120, 3)).unwrap();

        let loaded = JsonArtifactStore::new(dir.path()).load().unwrap();
        assert_eq!(loaded, artifacts);
    }

    #[test]
    fn test_single_class_dataset_fails() {
        let dir = tempdir().unwrap();
        let mut data = synthetic_dataset(50, 2);
        data.labels.iter_mut().for_each(|l| *l = 1);

        assert!(matches!(
            service(dir.path()).train(&data),
            Err(CardioriskError::Training(TrainingError::SingleClass))
        ));
    }

    #[test]
    fn test_cross_validate_refuses_sparse_classes() {
        let rows: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64; 13]).collect();
        let labels = [0u8, 0, 1, 1, 1];

        assert!(matches!(
            cross_validate(&LinfaTrainer::new(), &rows, &labels, 5),
            Err(CardioriskError::Training(TrainingError::TooFewSamples { .. }))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempdir().unwrap();
        let config = TrainingConfig {
            cv_folds: 0,
            ..Default::default()
        };
        assert!(TrainingService::new(
            Arc::new(LinfaTrainer::new()),
            Arc::new(JsonArtifactStore::new(dir.path())),
            config,
        )
        .is_err());
    }

    #[test]
    fn test_format_summary() {
        let metrics = TrainingMetrics {
            cv_scores: vec![0.8, 0.8571, 0.9, 0.75, 0.8333],
            cv_mean: 0.828,
            test_accuracy: 0.8524,
            ..Default::default()
        };
        assert_eq!(
            format_summary(&metrics),
            "Cross-validation scores: [0.80, 0.86, 0.90, 0.75, 0.83]\n\
             Mean cross-validation accuracy: 0.83\n\
             Test accuracy: 0.85"
        );
    }
}
