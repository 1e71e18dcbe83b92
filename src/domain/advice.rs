//! Lifestyle suggestions derived from raw (unscaled) clinical values.
//!
//! Suggestions are informational only and never feed back into the model.

use serde::{Deserialize, Serialize};

use super::PatientFeatures;

/// Resting blood pressure above this (mm Hg) triggers the blood pressure block.
pub const HIGH_RESTING_BP: f64 = 140.0;

/// Cholesterol above this (mg/dL) triggers the cholesterol block.
pub const HIGH_CHOLESTEROL: f64 = 200.0;

/// ST depression above this triggers the stress block.
pub const HIGH_OLD_PEAK: f64 = 2.0;

/// Which rule produced a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionKind {
    General,
    BloodPressure,
    Cholesterol,
    BloodSugar,
    ExerciseAngina,
    StDepression,
}

/// A fixed group of suggestion lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionBlock {
    pub kind: SuggestionKind,
    pub lines: Vec<String>,
}

impl SuggestionBlock {
    fn new(kind: SuggestionKind, lines: &[&str]) -> Self {
        Self {
            kind,
            lines: lines.iter().map(|l| (*l).to_string()).collect(),
        }
    }

    /// Render as bulleted text; the general block carries its heading.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.kind == SuggestionKind::General {
            out.push_str("General Suggestions:\n");
        }
        for line in &self.lines {
            out.push_str("- ");
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Build the suggestion list for a patient, in display order.
#[must_use]
pub fn suggestions_for(features: &PatientFeatures) -> Vec<SuggestionBlock> {
    let mut blocks = vec![SuggestionBlock::new(
        SuggestionKind::General,
        &[
            "Maintain a balanced diet",
            "Engage in regular physical activity",
            "Get regular checkups",
        ],
    )];

    if features.resting_bp > HIGH_RESTING_BP {
        blocks.push(SuggestionBlock::new(
            SuggestionKind::BloodPressure,
            &[
                "Consider reducing salt intake to lower blood pressure.",
                "Monitor your blood pressure regularly.",
            ],
        ));
    }
    if features.cholesterol > HIGH_CHOLESTEROL {
        blocks.push(SuggestionBlock::new(
            SuggestionKind::Cholesterol,
            &[
                "Follow a low-cholesterol diet with more fruits and vegetables.",
                "Avoid saturated fats and trans fats.",
            ],
        ));
    }
    if features.fasting_blood_sugar == 1.0 {
        blocks.push(SuggestionBlock::new(
            SuggestionKind::BloodSugar,
            &[
                "Maintain a healthy weight and consider regular exercise.",
                "Monitor blood sugar levels.",
            ],
        ));
    }
    if features.exercise_angina == 1.0 {
        blocks.push(SuggestionBlock::new(
            SuggestionKind::ExerciseAngina,
            &[
                "Avoid high-intensity exercise; consider moderate-intensity activities.",
                "Discuss exercise plans with your doctor.",
            ],
        ));
    }
    if features.old_peak > HIGH_OLD_PEAK {
        blocks.push(SuggestionBlock::new(
            SuggestionKind::StDepression,
            &["Manage stress levels through activities like yoga or meditation."],
        ));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(blocks: &[SuggestionBlock]) -> Vec<SuggestionKind> {
        blocks.iter().map(|b| b.kind).collect()
    }

    #[test]
    fn test_all_rules_fire() {
        let features = PatientFeatures {
            resting_bp: 150.0,
            cholesterol: 250.0,
            fasting_blood_sugar: 1.0,
            exercise_angina: 1.0,
            old_peak: 3.0,
            ..Default::default()
        };

        let blocks = suggestions_for(&features);
        assert_eq!(
            kinds(&blocks),
            vec![
                SuggestionKind::General,
                SuggestionKind::BloodPressure,
                SuggestionKind::Cholesterol,
                SuggestionKind::BloodSugar,
                SuggestionKind::ExerciseAngina,
                SuggestionKind::StDepression,
            ]
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        let features = PatientFeatures {
            resting_bp: 140.0,
            cholesterol: 200.0,
            fasting_blood_sugar: 0.0,
            exercise_angina: 0.0,
            old_peak: 2.0,
            ..Default::default()
        };

        assert_eq!(kinds(&suggestions_for(&features)), vec![SuggestionKind::General]);
    }

    #[test]
    fn test_render_general_block() {
        let blocks = suggestions_for(&PatientFeatures::default());
        assert_eq!(
            blocks[0].render(),
            "General Suggestions:\n- Maintain a balanced diet\n- Engage in regular physical activity\n- Get regular checkups\n"
        );
    }
}
