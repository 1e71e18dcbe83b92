//! JSON adapter: Implementation of ArtifactStore.
//!
//! An artifact set is a directory holding three files:
//! - `scaler.json`: per-feature means and standard deviations
//! - `model.json`: logistic weights and bias
//! - `manifest.json`: run id, metrics and the SHA-256 of both files
//!
//! The manifest is written last. Loading refuses any directory where the
//! manifest is missing, a bound file was modified, or the files belong to
//! different training runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{
    FeatureScaler, ParameterError, RiskModel, TrainedArtifacts, TrainingMetrics, FEATURE_COUNT,
    FEATURE_NAMES,
};
use crate::ports::ArtifactStore;

pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "model.json";
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

/// Errors raised while saving or loading an artifact set.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("No artifact set found in {}", dir.display())]
    NotFound { dir: PathBuf },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {file}: {source}")]
    Malformed {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported manifest version: {0}")]
    UnsupportedVersion(u32),

    #[error("Manifest does not bind {0}")]
    Unbound(&'static str),

    #[error("Digest mismatch for {0}")]
    DigestMismatch(&'static str),

    #[error("Run id mismatch: manifest {manifest}, {file} {found}")]
    RunIdMismatch {
        file: &'static str,
        manifest: String,
        found: String,
    },

    #[error("{0} lists unexpected feature names")]
    FeatureNames(&'static str),

    #[error("Invalid parameters in {file}: {source}")]
    InvalidParameters {
        file: &'static str,
        #[source]
        source: ParameterError,
    },

    #[error("{file} has {got} features, expected {expected}")]
    FeatureCount {
        file: &'static str,
        expected: usize,
        got: usize,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct ScalerFile {
    run_id: String,
    feature_names: Vec<String>,
    means: Vec<f64>,
    stds: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelFile {
    run_id: String,
    feature_names: Vec<String>,
    weights: Vec<f64>,
    bias: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    version: u32,
    run_id: String,
    created_at: DateTime<Utc>,
    feature_names: Vec<String>,
    metrics: TrainingMetrics,
    files: BTreeMap<String, String>,
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes).iter().map(|b| format!("{b:02x}")).collect()
}

fn to_json<T: Serialize>(file: &'static str, value: &T) -> Result<Vec<u8>, ArtifactError> {
    serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Malformed { file, source })
}

fn schema_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect()
}

/// Artifact store rooted at one directory.
#[derive(Debug, Clone)]
pub struct JsonArtifactStore {
    dir: PathBuf,
}

impl JsonArtifactStore {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), ArtifactError> {
        let path = self.dir.join(name);
        fs::write(&path, bytes).map_err(|source| ArtifactError::Io { path, source })
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, ArtifactError> {
        let path = self.dir.join(name);
        fs::read(&path).map_err(|source| ArtifactError::Io { path, source })
    }

    /// Read a file bound by the manifest and check its digest.
    fn read_bound(&self, manifest: &Manifest, name: &'static str) -> Result<Vec<u8>, ArtifactError> {
        let expected = manifest.files.get(name).ok_or(ArtifactError::Unbound(name))?;
        let bytes = self.read(name)?;
        if !sha256_hex(&bytes).eq_ignore_ascii_case(expected) {
            return Err(ArtifactError::DigestMismatch(name));
        }
        Ok(bytes)
    }
}

fn check_run_id(manifest: &Manifest, file: &'static str, found: &str) -> Result<(), ArtifactError> {
    if manifest.run_id != found {
        return Err(ArtifactError::RunIdMismatch {
            file,
            manifest: manifest.run_id.clone(),
            found: found.to_string(),
        });
    }
    Ok(())
}

impl ArtifactStore for JsonArtifactStore {
    type Error = ArtifactError;

    fn save(&self, artifacts: &TrainedArtifacts) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let scaler = ScalerFile {
            run_id: artifacts.run_id.clone(),
            feature_names: schema_names(),
            means: artifacts.scaler.means().to_vec(),
            stds: artifacts.scaler.stds().to_vec(),
        };
        let model = ModelFile {
            run_id: artifacts.run_id.clone(),
            feature_names: schema_names(),
            weights: artifacts.model.weights().to_vec(),
            bias: artifacts.model.bias(),
        };

        let scaler_bytes = to_json(SCALER_FILE, &scaler)?;
        let model_bytes = to_json(MODEL_FILE, &model)?;

        // Remove any previous manifest first so a half-written set never verifies.
        let manifest_path = self.dir.join(MANIFEST_FILE);
        if manifest_path.exists() {
            fs::remove_file(&manifest_path).map_err(|source| ArtifactError::Io {
                path: manifest_path.clone(),
                source,
            })?;
        }

        self.write(SCALER_FILE, &scaler_bytes)?;
        self.write(MODEL_FILE, &model_bytes)?;

        let mut files = BTreeMap::new();
        files.insert(SCALER_FILE.to_string(), sha256_hex(&scaler_bytes));
        files.insert(MODEL_FILE.to_string(), sha256_hex(&model_bytes));

        let manifest = Manifest {
            version: MANIFEST_VERSION,
            run_id: artifacts.run_id.clone(),
            created_at: artifacts.created_at,
            feature_names: schema_names(),
            metrics: artifacts.metrics.clone(),
            files,
        };
        let manifest_bytes = to_json(MANIFEST_FILE, &manifest)?;
        self.write(MANIFEST_FILE, &manifest_bytes)?;

        tracing::info!(
            "Saved artifact set {} to {:?}",
            artifacts.run_id,
            self.dir
        );
        Ok(())
    }

    fn load(&self) -> Result<TrainedArtifacts, ArtifactError> {
        if !self.exists() {
            return Err(ArtifactError::NotFound {
                dir: self.dir.clone(),
            });
        }

        let manifest: Manifest = serde_json::from_slice(&self.read(MANIFEST_FILE)?)
            .map_err(|source| ArtifactError::Malformed {
                file: MANIFEST_FILE,
                source,
            })?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ArtifactError::UnsupportedVersion(manifest.version));
        }
        if manifest.feature_names != schema_names() {
            return Err(ArtifactError::FeatureNames(MANIFEST_FILE));
        }

        let scaler_file: ScalerFile = serde_json::from_slice(&self.read_bound(&manifest, SCALER_FILE)?)
            .map_err(|source| ArtifactError::Malformed {
                file: SCALER_FILE,
                source,
            })?;
        let model_file: ModelFile = serde_json::from_slice(&self.read_bound(&manifest, MODEL_FILE)?)
            .map_err(|source| ArtifactError::Malformed {
                file: MODEL_FILE,
                source,
            })?;

        check_run_id(&manifest, SCALER_FILE, &scaler_file.run_id)?;
        check_run_id(&manifest, MODEL_FILE, &model_file.run_id)?;
        if scaler_file.feature_names != manifest.feature_names {
            return Err(ArtifactError::FeatureNames(SCALER_FILE));
        }
        if model_file.feature_names != manifest.feature_names {
            return Err(ArtifactError::FeatureNames(MODEL_FILE));
        }

        let scaler = FeatureScaler::from_parts(scaler_file.means, scaler_file.stds)
            .map_err(|source| ArtifactError::InvalidParameters {
                file: SCALER_FILE,
                source,
            })?;
        let model = RiskModel::new(model_file.weights, model_file.bias).map_err(|source| {
            ArtifactError::InvalidParameters {
                file: MODEL_FILE,
                source,
            }
        })?;

        if scaler.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::FeatureCount {
                file: SCALER_FILE,
                expected: FEATURE_COUNT,
                got: scaler.n_features(),
            });
        }
        if model.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::FeatureCount {
                file: MODEL_FILE,
                expected: FEATURE_COUNT,
                got: model.n_features(),
            });
        }

        tracing::info!("Loaded artifact set {} from {:?}", manifest.run_id, self.dir);

        Ok(TrainedArtifacts {
            run_id: manifest.run_id,
            created_at: manifest.created_at,
            scaler,
            model,
            metrics: manifest.metrics,
        })
    }

    fn exists(&self) -> bool {
        self.dir.join(MANIFEST_FILE).is_file()
    }
}
