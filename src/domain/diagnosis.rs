//! Prediction result types.
//!
//! Represents the output of the risk classifier and the report shown to the user.

use serde::{Deserialize, Serialize};

use super::advice::SuggestionBlock;

/// Class label as trained.
///
/// The outcome column encodes 0 as high risk and 1 as low risk; the
/// polarity is kept exactly as in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    /// Class 0
    High,
    /// Class 1
    Low,
}

impl RiskLabel {
    /// Map a trained class value to a label.
    #[must_use]
    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            0 => Some(Self::High),
            1 => Some(Self::Low),
            _ => None,
        }
    }

    /// The trained class value.
    #[must_use]
    pub fn class(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Low => 1,
        }
    }

    /// Get a human-readable headline.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            Self::High => "High Risk of Heart Attack",
            Self::Low => "Low Risk of Heart Attack",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High Risk"),
            Self::Low => write!(f, "Low Risk"),
        }
    }
}

/// Result of the model prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class
    pub label: RiskLabel,

    /// Probability of class 0 (high risk)
    pub p_high: f64,

    /// Probability of class 1 (low risk)
    pub p_low: f64,
}

impl Prediction {
    /// Create a prediction from the class-1 probability.
    ///
    /// The label is class 1 when `p_low >= 0.5`.
    #[must_use]
    pub fn from_p_low(p_low: f64) -> Self {
        let p_low = p_low.clamp(0.0, 1.0);
        let label = if p_low >= 0.5 {
            RiskLabel::Low
        } else {
            RiskLabel::High
        };

        Self {
            label,
            p_high: 1.0 - p_low,
            p_low,
        }
    }

    /// Probability of the predicted class.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self.label {
            RiskLabel::High => self.p_high,
            RiskLabel::Low => self.p_low,
        }
    }
}

/// A prediction together with the suggestions derived from the raw inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub prediction: Prediction,
    pub suggestions: Vec<SuggestionBlock>,
}

impl RiskAssessment {
    /// Suggestion text without the headline or probabilities.
    #[must_use]
    pub fn suggestions_text(&self) -> String {
        let mut out = String::new();
        for (i, block) in self.suggestions.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&block.render());
        }
        out
    }

    /// Full plain-text report: headline, suggestions and probabilities.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = format!(
            "{}\n\n{}",
            self.prediction.label.headline(),
            self.suggestions_text()
        );
        if self.prediction.label == RiskLabel::Low {
            out.push_str("\nKeep up the good work!");
        }
        out.push_str(&format!(
            "\n\nPrediction Probability: High Risk: {:.2}, Low Risk: {:.2}",
            self.prediction.p_high, self.prediction.p_low
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::advice::suggestions_for;
    use crate::domain::PatientFeatures;

    #[test]
    fn test_label_from_probability() {
        assert_eq!(Prediction::from_p_low(0.1).label, RiskLabel::High);
        assert_eq!(Prediction::from_p_low(0.5).label, RiskLabel::Low);
        assert_eq!(Prediction::from_p_low(0.9).label, RiskLabel::Low);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        for p in [0.0, 0.123, 0.5, 0.999_999, 1.0] {
            let pred = Prediction::from_p_low(p);
            assert!((pred.p_high + pred.p_low - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_class_mapping() {
        assert_eq!(RiskLabel::from_class(0), Some(RiskLabel::High));
        assert_eq!(RiskLabel::from_class(1), Some(RiskLabel::Low));
        assert_eq!(RiskLabel::from_class(2), None);
        assert_eq!(RiskLabel::Low.class(), 1);
    }

    #[test]
    fn test_report_layout() {
        let assessment = RiskAssessment {
            prediction: Prediction::from_p_low(0.8),
            suggestions: suggestions_for(&PatientFeatures::default()),
        };
        let report = assessment.report();

        assert!(report.starts_with("Low Risk of Heart Attack\n\nGeneral Suggestions:"));
        assert!(report.contains("Keep up the good work!"));
        assert!(report.ends_with("High Risk: 0.20, Low Risk: 0.80"));

        assert!(report.contains("- Get regular checkups\n\nKeep up the good work!\n\nPrediction"));

        let high = RiskAssessment {
            prediction: Prediction::from_p_low(0.3),
            suggestions: suggestions_for(&PatientFeatures::default()),
        };
        let report = high.report();
        assert!(!report.contains("Keep up"));
        assert!(report.contains("- Get regular checkups\n\n\nPrediction Probability"));
    }

    #[test]
    fn test_report_lists_every_triggered_suggestion() {
        let features = PatientFeatures {
            resting_bp: 150.0,
            cholesterol: 250.0,
            fasting_blood_sugar: 1.0,
            exercise_angina: 1.0,
            old_peak: 3.0,
            ..Default::default()
        };
        let expected = [
            "- Consider reducing salt intake to lower blood pressure.",
            "- Monitor your blood pressure regularly.",
            "- Follow a low-cholesterol diet with more fruits and vegetables.",
            "- Avoid saturated fats and trans fats.",
            "- Maintain a healthy weight and consider regular exercise.",
            "- Monitor blood sugar levels.",
            "- Avoid high-intensity exercise; consider moderate-intensity activities.",
            "- Discuss exercise plans with your doctor.",
            "- Manage stress levels through activities like yoga or meditation.",
        ];

        for p_low in [0.2, 0.9] {
            let report = RiskAssessment {
                prediction: Prediction::from_p_low(p_low),
                suggestions: suggestions_for(&features),
            }
            .report();
            for line in expected {
                assert!(report.contains(line), "missing {line:?} at p_low={p_low}");
            }
        }
    }
}
