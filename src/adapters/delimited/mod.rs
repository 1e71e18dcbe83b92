//! Delimited-text dataset adapter: Implementation of DatasetSource.
//!
//! Reads a header row and locates the 13 feature columns plus the outcome
//! column by name, so column order in the file is free and extra columns
//! are ignored. Every malformed row is reported with its 1-based line number.

use std::path::{Path, PathBuf};

use crate::domain::{Dataset, FeatureVector, FEATURE_COUNT, FEATURE_NAMES, LABEL_COLUMN};
use crate::ports::DatasetSource;

/// Errors raised while reading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset has no header row")]
    MissingHeader,

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Line {line}: expected {expected} fields, got {got}")]
    FieldCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("Line {line}, column '{column}': cannot parse '{value}' as a finite number")]
    BadValue {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Line {line}: label must be 0 or 1, got '{value}'")]
    BadLabel { line: usize, value: String },

    #[error("Dataset contains no data rows")]
    Empty,
}

/// Comma-separated (or other single-character delimited) dataset on disk.
#[derive(Debug, Clone)]
pub struct DelimitedDataset {
    path: PathBuf,
    delimiter: char,
}

impl DelimitedDataset {
    /// Create a comma-separated dataset reader.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: ',',
        }
    }

    /// Use a different field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse dataset text.
    ///
    /// # Errors
    /// Returns the first structural or value error encountered.
    pub fn parse(content: &str, delimiter: char) -> Result<Dataset, DatasetError> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (_, header) = lines.next().ok_or(DatasetError::MissingHeader)?;
        let columns: Vec<&str> = header.split(delimiter).map(str::trim).collect();

        let locate = |name: &str| {
            columns
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        let mut feature_idx = [0usize; FEATURE_COUNT];
        for (slot, name) in feature_idx.iter_mut().zip(FEATURE_NAMES) {
            *slot = locate(name)?;
        }
        let label_idx = locate(LABEL_COLUMN)?;

        let mut rows = Vec::new();
        let mut labels = Vec::new();

        for (line, text) in lines {
            let fields: Vec<&str> = text.split(delimiter).map(str::trim).collect();
            if fields.len() != columns.len() {
                return Err(DatasetError::FieldCount {
                    line,
                    expected: columns.len(),
                    got: fields.len(),
                });
            }

            let mut row: FeatureVector = [0.0; FEATURE_COUNT];
            for (i, &col) in feature_idx.iter().enumerate() {
                row[i] = parse_finite(fields[col]).ok_or_else(|| DatasetError::BadValue {
                    line,
                    column: FEATURE_NAMES[i].to_string(),
                    value: fields[col].to_string(),
                })?;
            }

            let raw_label = fields[label_idx];
            let label = match parse_finite(raw_label) {
                Some(v) if v == 0.0 => 0u8,
                Some(v) if v == 1.0 => 1u8,
                _ => {
                    return Err(DatasetError::BadLabel {
                        line,
                        value: raw_label.to_string(),
                    })
                }
            };

            rows.push(row);
            labels.push(label);
        }

        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }

        Ok(Dataset { rows, labels })
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl DatasetSource for DelimitedDataset {
    type Error = DatasetError;

    fn load(&self) -> Result<Dataset, DatasetError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| DatasetError::Io {
            path: self.path.clone(),
            source,
        })?;
        let dataset = Self::parse(&content, self.delimiter)?;

        let (high, low) = dataset.class_counts();
        tracing::info!(
            "Loaded {} rows from {:?} (class 0: {}, class 1: {})",
            dataset.len(),
            self.path,
            high,
            low
        );
        Ok(dataset)
    }
}
