//! cardiorisk: Heart-attack risk prediction
//!
//! Main entry point for the command line and terminal application.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiorisk::adapters::delimited::DelimitedDataset;
use cardiorisk::adapters::json::JsonArtifactStore;
use cardiorisk::adapters::linfa::LinfaTrainer;
use cardiorisk::application::{format_summary, AnalyticsService, InferenceService, TrainingService};
use cardiorisk::config::{self, LogMode, TrainingConfig};
use cardiorisk::domain::histogram::DEFAULT_BINS;
use cardiorisk::tui::App;

#[derive(Parser)]
#[command(name = "cardiorisk", version, about = "Heart-attack risk prediction")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Train the scaler and model, then write the artifact set
    Train {
        /// Labelled dataset (CSV with header)
        #[arg(long, env = "CARDIORISK_DATASET", default_value = config::DEFAULT_DATASET)]
        dataset: PathBuf,

        /// Artifact directory
        #[arg(long, env = "CARDIORISK_ARTIFACT_DIR", default_value = config::DEFAULT_ARTIFACT_DIR)]
        artifacts: PathBuf,

        /// Seed for the train/test shuffle
        #[arg(long, env = "CARDIORISK_SEED", default_value_t = 42)]
        seed: u64,

        /// Fraction of rows held out for testing
        #[arg(long, env = "CARDIORISK_TEST_FRACTION", default_value_t = 0.2)]
        test_fraction: f64,

        /// Cross-validation folds
        #[arg(long, env = "CARDIORISK_FOLDS", default_value_t = 5)]
        folds: usize,

        /// L2 penalty strength
        #[arg(long, env = "CARDIORISK_ALPHA", default_value_t = 1.0)]
        alpha: f64,

        /// Optimizer iteration budget
        #[arg(long, env = "CARDIORISK_MAX_ITER", default_value_t = 100)]
        max_iterations: u64,
    },

    /// Predict risk for one patient
    Predict {
        /// 13 comma-separated values in dataset column order
        #[arg(long, required = true, value_delimiter = ',', num_args = 1.., allow_hyphen_values = true)]
        values: Vec<String>,

        /// Artifact directory
        #[arg(long, env = "CARDIORISK_ARTIFACT_DIR", default_value = config::DEFAULT_ARTIFACT_DIR)]
        artifacts: PathBuf,
    },

    /// Print a histogram of one dataset column
    Histogram {
        #[arg(long, env = "CARDIORISK_DATASET", default_value = config::DEFAULT_DATASET)]
        dataset: PathBuf,

        #[arg(long, default_value = "chol")]
        column: String,

        #[arg(long, default_value_t = DEFAULT_BINS)]
        bins: usize,
    },

    /// Interactive terminal form (default)
    Tui {
        #[arg(long, env = "CARDIORISK_ARTIFACT_DIR", default_value = config::DEFAULT_ARTIFACT_DIR)]
        artifacts: PathBuf,

        #[arg(long, env = "CARDIORISK_DATASET", default_value = config::DEFAULT_DATASET)]
        dataset: PathBuf,
    },
}

/// Initialize logging.
///
/// Writing logs to the terminal corrupts the TUI (alternate screen), so
/// interactive mode logs to a file by default; CLI commands log to stderr.
fn init_logging(interactive: bool) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let (writer, guard) = if LogMode::from_env().use_file(interactive) {
        let log_file = config::log_file();
        if let Some(parent) = log_file.parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stderr())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| Command::Tui {
        artifacts: std::env::var_os("CARDIORISK_ARTIFACT_DIR")
            .map_or_else(|| PathBuf::from(config::DEFAULT_ARTIFACT_DIR), PathBuf::from),
        dataset: std::env::var_os("CARDIORISK_DATASET")
            .map_or_else(|| PathBuf::from(config::DEFAULT_DATASET), PathBuf::from),
    });

    let interactive = matches!(command, Command::Tui { .. });
    let _guard = init_logging(interactive)?;
    tracing::info!("Starting cardiorisk...");

    match command {
        Command::Train {
            dataset,
            artifacts,
            seed,
            test_fraction,
            folds,
            alpha,
            max_iterations,
        } => {
            let config = TrainingConfig {
                seed,
                test_fraction,
                cv_folds: folds,
                alpha,
                max_iterations,
            };
            train(&dataset, &artifacts, config)?;
        }
        Command::Predict { values, artifacts } => predict(&values, &artifacts)?,
        Command::Histogram {
            dataset,
            column,
            bins,
        } => histogram(&dataset, &column, bins)?,
        Command::Tui { artifacts, dataset } => {
            let mut app = App::new(&artifacts, &dataset)?;
            app.run()?;
        }
    }

    tracing::info!("cardiorisk shutdown complete.");
    Ok(())
}

fn train(dataset: &Path, artifacts: &Path, config: TrainingConfig) -> Result<()> {
    let trainer = LinfaTrainer::new()
        .alpha(config.alpha)
        .max_iterations(config.max_iterations);
    let service = TrainingService::new(
        Arc::new(trainer),
        Arc::new(JsonArtifactStore::new(artifacts)),
        config,
    )?;

    let trained = service
        .run(&DelimitedDataset::new(dataset))
        .with_context(|| format!("Training on {} failed", dataset.display()))?;

    println!("{}", format_summary(&trained.metrics));
    println!(
        "Saved artifact set {} to {}",
        trained.run_id,
        artifacts.display()
    );
    Ok(())
}

fn predict(values: &[String], artifacts: &Path) -> Result<()> {
    let service = InferenceService::load(&JsonArtifactStore::new(artifacts))
        .with_context(|| format!("Failed to load artifacts from {}", artifacts.display()))?;
    let assessment = service.assess_fields(values)?;
    println!("{}", assessment.report());
    Ok(())
}

fn histogram(dataset: &Path, column: &str, bins: usize) -> Result<()> {
    let service = AnalyticsService::new(Arc::new(DelimitedDataset::new(dataset)));
    let histogram = service.histogram(column, bins)?;
    println!("{column} distribution ({} values)", histogram.total());
    print!("{}", histogram.render_table(40));
    Ok(())
}
