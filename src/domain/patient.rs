//! Patient feature types for heart-attack risk prediction.
//!
//! Thirteen clinical features in the fixed order used by the training data
//! (`heart.csv` column names).

use serde::{Deserialize, Serialize};

/// Number of clinical features per sample.
pub const FEATURE_COUNT: usize = 13;

/// Feature column names, in model order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trtbps", "chol", "fbs", "restecg", "thalachh", "exng", "oldpeak", "slp",
    "caa", "thall",
];

/// Outcome column name (0 = high risk, 1 = low risk).
pub const LABEL_COLUMN: &str = "output";

/// Index of each feature inside a feature vector.
pub mod index {
    pub const AGE: usize = 0;
    pub const SEX: usize = 1;
    pub const CHEST_PAIN: usize = 2;
    pub const RESTING_BP: usize = 3;
    pub const CHOLESTEROL: usize = 4;
    pub const FASTING_BLOOD_SUGAR: usize = 5;
    pub const REST_ECG: usize = 6;
    pub const MAX_HEART_RATE: usize = 7;
    pub const EXERCISE_ANGINA: usize = 8;
    pub const OLD_PEAK: usize = 9;
    pub const SLOPE: usize = 10;
    pub const CA_COUNT: usize = 11;
    pub const THAL: usize = 12;
}

/// A raw (unscaled) feature vector in model order.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Raw input rejected before it reaches the model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputValidationError {
    #[error("Expected {expected} features, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("{field}: value is missing")]
    Missing { field: &'static str },

    #[error("{field}: '{value}' is not a number")]
    NotNumeric { field: &'static str, value: String },

    #[error("{field}: value must be finite")]
    NonFinite { field: &'static str },

    #[error("No samples to score")]
    NoSamples,
}

/// Clinical features for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PatientFeatures {
    /// Age in years
    pub age: f64,
    /// 1 = male, 0 = female
    pub sex: f64,
    /// Chest pain type (0-3)
    pub chest_pain: f64,
    /// Resting blood pressure in mm Hg
    pub resting_bp: f64,
    /// Serum cholesterol in mg/dL
    pub cholesterol: f64,
    /// 1 if fasting blood sugar > 120 mg/dL, else 0
    pub fasting_blood_sugar: f64,
    /// Resting ECG result (0-2)
    pub rest_ecg: f64,
    /// Maximum heart rate achieved
    pub max_heart_rate: f64,
    /// Exercise induced angina: 1 = yes, 0 = no
    pub exercise_angina: f64,
    /// ST depression induced by exercise relative to rest
    pub old_peak: f64,
    /// Slope of the peak exercise ST segment (0-2)
    pub slope: f64,
    /// Number of major vessels (0-3)
    pub ca_count: f64,
    /// Thalassemia category
    pub thal: f64,
}

impl PatientFeatures {
    /// Convert to a vector in model order.
    #[must_use]
    pub fn to_array(&self) -> FeatureVector {
        [
            self.age,
            self.sex,
            self.chest_pain,
            self.resting_bp,
            self.cholesterol,
            self.fasting_blood_sugar,
            self.rest_ecg,
            self.max_heart_rate,
            self.exercise_angina,
            self.old_peak,
            self.slope,
            self.ca_count,
            self.thal,
        ]
    }

    /// Create features from a slice in model order.
    ///
    /// # Errors
    /// Returns error if the slice length is not 13 or a value is NaN/infinite.
    pub fn from_slice(v: &[f64]) -> Result<Self, InputValidationError> {
        if v.len() != FEATURE_COUNT {
            return Err(InputValidationError::WrongLength {
                expected: FEATURE_COUNT,
                got: v.len(),
            });
        }
        if let Some(i) = v.iter().position(|x| !x.is_finite()) {
            return Err(InputValidationError::NonFinite {
                field: FEATURE_NAMES[i],
            });
        }

        let mut arr = [0.0; FEATURE_COUNT];
        arr.copy_from_slice(v);
        Ok(Self::from(arr))
    }

    /// Parse textual field values (form entries, CLI arguments) in model order.
    ///
    /// # Errors
    /// Returns the first field that is absent, blank, non-numeric or non-finite,
    /// or a length error if the field count is not 13.
    pub fn parse_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, InputValidationError> {
        if fields.len() != FEATURE_COUNT {
            return Err(InputValidationError::WrongLength {
                expected: FEATURE_COUNT,
                got: fields.len(),
            });
        }

        let mut values = [0.0; FEATURE_COUNT];
        for (i, raw) in fields.iter().enumerate() {
            let field = FEATURE_NAMES[i];
            let text = raw.as_ref().trim();
            if text.is_empty() {
                return Err(InputValidationError::Missing { field });
            }
            values[i] = text
                .parse::<f64>()
                .map_err(|_| InputValidationError::NotNumeric {
                    field,
                    value: text.to_string(),
                })?;
        }

        Self::from_slice(&values)
    }
}

impl From<FeatureVector> for PatientFeatures {
    fn from(v: FeatureVector) -> Self {
        Self {
            age: v[index::AGE],
            sex: v[index::SEX],
            chest_pain: v[index::CHEST_PAIN],
            resting_bp: v[index::RESTING_BP],
            cholesterol: v[index::CHOLESTEROL],
            fasting_blood_sugar: v[index::FASTING_BLOOD_SUGAR],
            rest_ecg: v[index::REST_ECG],
            max_heart_rate: v[index::MAX_HEART_RATE],
            exercise_angina: v[index::EXERCISE_ANGINA],
            old_peak: v[index::OLD_PEAK],
            slope: v[index::SLOPE],
            ca_count: v[index::CA_COUNT],
            thal: v[index::THAL],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<f64> {
        vec![
            63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0,
        ]
    }

    #[test]
    fn test_features_to_array_preserves_order() {
        let features = PatientFeatures::from_slice(&sample()).expect("Should parse");
        let arr = features.to_array();
        assert_eq!(arr.len(), FEATURE_COUNT);
        assert!((arr[index::RESTING_BP] - 145.0).abs() < f64::EPSILON);
        assert!((arr[index::OLD_PEAK] - 2.3).abs() < f64::EPSILON);
        assert_eq!(PatientFeatures::from(arr), features);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let mut short = sample();
        short.pop();
        assert_eq!(
            PatientFeatures::from_slice(&short),
            Err(InputValidationError::WrongLength {
                expected: 13,
                got: 12
            })
        );

        let mut long = sample();
        long.push(1.0);
        assert!(matches!(
            PatientFeatures::from_slice(&long),
            Err(InputValidationError::WrongLength { got: 14, .. })
        ));
    }

    #[test]
    fn test_non_finite_is_rejected() {
        let mut v = sample();
        v[index::CHOLESTEROL] = f64::NAN;
        assert_eq!(
            PatientFeatures::from_slice(&v),
            Err(InputValidationError::NonFinite { field: "chol" })
        );
    }

    #[test]
    fn test_parse_fields() {
        let fields = [
            "63", "1", "3", "145", "233", "1", "0", "150", "0", " 2.3 ", "0", "0", "1",
        ];
        let features = PatientFeatures::parse_fields(&fields).expect("Should parse");
        assert!((features.old_peak - 2.3).abs() < f64::EPSILON);

        let mut bad = fields;
        bad[4] = "abc";
        assert!(matches!(
            PatientFeatures::parse_fields(&bad),
            Err(InputValidationError::NotNumeric { field: "chol", .. })
        ));

        bad[4] = "";
        assert_eq!(
            PatientFeatures::parse_fields(&bad),
            Err(InputValidationError::Missing { field: "chol" })
        );
    }
}
