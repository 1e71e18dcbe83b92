//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface for:
//! - Dashboard with artifact status and training metrics
//! - Patient data input
//! - Prediction result with suggestions and probability chart
//! - Cholesterol distribution histogram

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
