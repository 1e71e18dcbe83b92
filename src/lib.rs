//! # cardiorisk
//!
//! Heart-attack risk classification on tabular clinical data.
//!
//! This crate provides:
//! - A training pipeline (standard scaling + L2 logistic regression)
//! - A verified artifact set binding the scaler and model of one training run
//! - Rule-based health suggestions derived from raw clinical values
//! - Terminal UI for local-only use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (features, scaler, model, histogram, suggestions)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (CSV dataset, linfa trainer, JSON artifacts)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{PatientFeatures, Prediction, RiskAssessment, RiskLabel};

/// Result type for cardiorisk operations
pub type Result<T> = std::result::Result<T, CardioriskError>;

/// Main error type for cardiorisk
#[derive(Debug, thiserror::Error)]
pub enum CardioriskError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] adapters::DatasetError),

    #[error("Artifact load failed: {0}")]
    ArtifactLoad(#[from] adapters::ArtifactError),

    #[error("Invalid input: {0}")]
    InputValidation(#[from] domain::InputValidationError),

    #[error("Training failed: {0}")]
    Training(#[from] domain::TrainingError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
