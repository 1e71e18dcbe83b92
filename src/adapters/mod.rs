//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `delimited`: CSV-style dataset files
//! - `linfa`: linfa-logistic for model fitting
//! - `json`: JSON artifact set with SHA-256 manifest

pub mod delimited;
pub mod json;
pub mod linfa;

// Re-export adapter errors for lib.rs
pub use delimited::DatasetError;
pub use json::ArtifactError;
