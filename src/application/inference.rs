//! Inference service: Scores one patient against a verified artifact set.
//!
//! The artifact set is loaded and verified once at construction; every call
//! after that is a pure, synchronous computation. Raw values are validated
//! into typed features before anything reaches the scaler.

use crate::domain::{suggestions_for, PatientFeatures, RiskAssessment, TrainedArtifacts};
use crate::ports::ArtifactStore;
use crate::CardioriskError;

/// Service for running risk inference.
#[derive(Debug, Clone)]
pub struct InferenceService {
    artifacts: TrainedArtifacts,
}

impl InferenceService {
    /// Wrap an already verified artifact set.
    #[must_use]
    pub fn new(artifacts: TrainedArtifacts) -> Self {
        Self { artifacts }
    }

    /// Load and verify the artifact set from `store`.
    ///
    /// # Errors
    /// Returns error if the set is missing, corrupt or mismatched.
    pub fn load<S>(store: &S) -> Result<Self, CardioriskError>
    where
        S: ArtifactStore,
        S::Error: Into<CardioriskError>,
    {
        tracing::info!("Initializing inference service...");
        let artifacts = store.load().map_err(Into::<CardioriskError>::into)?;
        Ok(Self::new(artifacts))
    }

    #[must_use]
    pub fn artifacts(&self) -> &TrainedArtifacts {
        &self.artifacts
    }

    /// Assess typed features.
    ///
    /// # Errors
    /// Returns error if the stored parameters do not match the feature count.
    pub fn assess_features(
        &self,
        features: &PatientFeatures,
    ) -> Result<RiskAssessment, CardioriskError> {
        let prediction = self.artifacts.predict(features)?;
        tracing::info!(
            "Inference complete: prediction={}, confidence={:.2}%",
            prediction.label,
            prediction.confidence() * 100.0
        );

        Ok(RiskAssessment {
            prediction,
            suggestions: suggestions_for(features),
        })
    }

    /// Assess a raw vector of 13 values in model order.
    ///
    /// # Errors
    /// Returns `InputValidation` if the length is not 13 or any value is non-finite.
    pub fn assess(&self, raw: &[f64]) -> Result<RiskAssessment, CardioriskError> {
        let features = PatientFeatures::from_slice(raw)?;
        self.assess_features(&features)
    }

    /// Assess 13 text fields, as typed into a form.
    ///
    /// # Errors
    /// Returns `InputValidation` naming the first missing or non-numeric field.
    pub fn assess_fields<S: AsRef<str>>(
        &self,
        fields: &[S],
    ) -> Result<RiskAssessment, CardioriskError> {
        let features = PatientFeatures::parse_fields(fields)?;
        self.assess_features(&features)
    }
}
