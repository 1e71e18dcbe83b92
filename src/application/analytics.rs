//! Analytics service: Feature distributions over the training data.

use std::sync::Arc;

use crate::adapters::DatasetError;
use crate::domain::{Dataset, Histogram, HistogramError};
use crate::ports::DatasetSource;
use crate::CardioriskError;

/// Service for dataset statistics shown next to the form.
pub struct AnalyticsService<D>
where
    D: DatasetSource,
{
    source: Arc<D>,
}

impl<D> AnalyticsService<D>
where
    D: DatasetSource,
    D::Error: Into<CardioriskError>,
{
    /// Create a new analytics service.
    pub fn new(source: Arc<D>) -> Self {
        Self { source }
    }

    /// Load the dataset and bucket one feature column.
    ///
    /// # Errors
    /// Returns error if the dataset cannot be loaded, the column is unknown
    /// or `bins` is 0.
    pub fn histogram(&self, column: &str, bins: usize) -> Result<Histogram, CardioriskError> {
        let dataset = self.source.load().map_err(Into::<CardioriskError>::into)?;
        column_histogram(&dataset, column, bins)
    }
}

/// Bucket one named feature column of `dataset`.
///
/// # Errors
/// Returns error if the column is unknown, the dataset is empty or `bins` is 0.
pub fn column_histogram(
    dataset: &Dataset,
    column: &str,
    bins: usize,
) -> Result<Histogram, CardioriskError> {
    if bins == 0 {
        return Err(CardioriskError::Config("bin count must be positive".into()));
    }
    let values = dataset
        .column(column)
        .ok_or_else(|| DatasetError::MissingColumn(column.to_string()))?;
    let histogram = Histogram::from_values(&values, bins).map_err(|e| match e {
        HistogramError::NoBins => CardioriskError::Config(e.to_string()),
        HistogramError::NoValues => DatasetError::Empty.into(),
    })?;

    tracing::info!(
        "Built {}-bucket histogram of '{}' over [{:.1}, {:.1}]",
        bins,
        column,
        histogram.min,
        histogram.max
    );
    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::delimited::DelimitedDataset;
    use crate::application::fixtures::synthetic_dataset;
    use crate::domain::histogram::DEFAULT_BINS;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cholesterol_histogram() {
        let data = synthetic_dataset(303, 5);
        let h = column_histogram(&data, "chol", DEFAULT_BINS).unwrap();
        assert_eq!(h.counts.len(), 20);
        assert_eq!(h.total(), 303);
    }

    #[test]
    fn test_unknown_column() {
        let data = synthetic_dataset(10, 5);
        assert!(matches!(
            column_histogram(&data, "output", 20),
            Err(CardioriskError::Dataset(DatasetError::MissingColumn(_)))
        ));
        assert!(matches!(
            column_histogram(&data, "chol", 0),
            Err(CardioriskError::Config(_))
        ));
        assert!(matches!(
            column_histogram(&Dataset::default(), "chol", 20),
            Err(CardioriskError::Dataset(DatasetError::Empty))
        ));
    }

    #[test]
    fn test_service_reads_source() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "age,sex,cp,trtbps,chol,fbs,restecg,thalachh,exng,oldpeak,slp,caa,thall,output"
        )
        .unwrap();
        for chol in [200, 250, 300] {
            writeln!(file, "50,1,0,130,{chol},0,1,150,0,1.0,1,0,2,1").unwrap();
        }

        let service = AnalyticsService::new(Arc::new(DelimitedDataset::new(file.path())));
        let h = service.histogram("chol", 2).unwrap();
        assert_eq!(h.counts, vec![1, 2]);
    }
}
