//! Runtime configuration.
//!
//! Defaults live here; the binary overrides them from CLI flags, which in
//! turn fall back to `CARDIORISK_*` environment variables.

use std::path::PathBuf;

use crate::CardioriskError;

/// Default dataset location.
pub const DEFAULT_DATASET: &str = "data/heart.csv";

/// Default artifact directory.
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

/// Default log file used when logging to a file.
pub const DEFAULT_LOG_FILE: &str = "cardiorisk.log";

/// Training hyperparameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Seed for the train/test shuffle
    pub seed: u64,
    /// Fraction of rows held out for testing, in (0, 1)
    pub test_fraction: f64,
    /// Number of cross-validation folds
    pub cv_folds: usize,
    /// L2 penalty strength
    pub alpha: f64,
    /// L-BFGS iteration budget
    pub max_iterations: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.2,
            cv_folds: 5,
            alpha: 1.0,
            max_iterations: 100,
        }
    }
}

impl TrainingConfig {
    /// Check that every parameter is in range.
    ///
    /// # Errors
    /// Returns `CardioriskError::Config` naming the first invalid parameter.
    pub fn validate(&self) -> Result<(), CardioriskError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(CardioriskError::Config(format!(
                "test fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.cv_folds < 2 {
            return Err(CardioriskError::Config(format!(
                "cross-validation needs at least 2 folds, got {}",
                self.cv_folds
            )));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(CardioriskError::Config(format!(
                "alpha must be a non-negative number, got {}",
                self.alpha
            )));
        }
        if self.max_iterations == 0 {
            return Err(CardioriskError::Config(
                "max iterations must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when the command owns the terminal, stderr otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Parse `auto`, `file` or `stdout`; anything else is `Auto`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Read `CARDIORISK_LOG_MODE`.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("CARDIORISK_LOG_MODE")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    /// Decide whether to log to a file.
    ///
    /// `interactive` is true for commands that draw on the alternate screen.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Log file path from `CARDIORISK_LOG_FILE`, or the default.
#[must_use]
pub fn log_file() -> PathBuf {
    std::env::var("CARDIORISK_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrainingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, 42);
        assert_eq!(config.cv_folds, 5);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let bad_fraction = TrainingConfig {
            test_fraction: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_fraction.validate(),
            Err(CardioriskError::Config(_))
        ));

        let bad_folds = TrainingConfig {
            cv_folds: 1,
            ..Default::default()
        };
        assert!(bad_folds.validate().is_err());

        let bad_alpha = TrainingConfig {
            alpha: f64::NAN,
            ..Default::default()
        };
        assert!(bad_alpha.validate().is_err());
    }

    #[test]
    fn test_log_mode() {
        assert_eq!(LogMode::parse("FILE"), LogMode::File);
        assert_eq!(LogMode::parse("stdout"), LogMode::Stdout);
        assert_eq!(LogMode::parse("whatever"), LogMode::Auto);

        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
