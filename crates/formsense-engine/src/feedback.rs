//! Human-readable feedback, warnings, and tips.

use serde::{Deserialize, Serialize};

use crate::exercise::PhaseDefinition;
use crate::phase::MovementPhase;
use crate::scoring::PhaseScore;

/// Maximum tips surfaced when form quality is poor or dangerous, so a
/// struggling user is not overwhelmed
pub const POOR_FORM_TIP_LIMIT: usize = 2;

/// Qualitative form tier derived from the smoothed score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormQuality {
    Excellent,
    Good,
    Acceptable,
    Poor,
    Dangerous,
}

impl FormQuality {
    /// Band a [0, 1] score into a quality tier
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            FormQuality::Excellent
        } else if score >= 0.8 {
            FormQuality::Good
        } else if score >= 0.7 {
            FormQuality::Acceptable
        } else if score >= 0.5 {
            FormQuality::Poor
        } else {
            FormQuality::Dangerous
        }
    }

    /// Nominal 0-100 display score for consumers that only have the tier
    pub fn display_score(&self) -> u8 {
        match self {
            FormQuality::Excellent => 95,
            FormQuality::Good => 85,
            FormQuality::Acceptable => 70,
            FormQuality::Poor => 50,
            FormQuality::Dangerous => 20,
        }
    }

    fn remark(&self) -> &'static str {
        match self {
            FormQuality::Excellent => "Excellent form!",
            FormQuality::Good => "Good form, keep it up.",
            FormQuality::Acceptable => "Acceptable, tighten it up.",
            FormQuality::Poor => "Form is slipping, slow down.",
            FormQuality::Dangerous => "Stop and reset — this form is unsafe.",
        }
    }
}

/// Baseline instruction for phases without an exercise definition
pub fn default_instruction(phase: MovementPhase) -> &'static str {
    match phase {
        MovementPhase::Starting => "Set your starting position.",
        MovementPhase::Descent => "Control the descent. Keep form tight.",
        MovementPhase::Bottom => "Hold the bottom position.",
        MovementPhase::Ascent => "Drive back up.",
        MovementPhase::Rest => "Take your time, start when ready.",
    }
}

/// Feedback lines for the current frame: the phase instruction followed
/// by a quality remark
pub fn build_feedback(
    phase: MovementPhase,
    definition: Option<&PhaseDefinition>,
    quality: FormQuality,
) -> Vec<String> {
    let instruction = definition
        .map(|d| d.instruction.as_str())
        .unwrap_or_else(|| default_instruction(phase));

    vec![instruction.to_string(), quality.remark().to_string()]
}

/// Safety warnings for every critically failing criterion
pub fn build_warnings(score: &PhaseScore) -> Vec<String> {
    score
        .critical_failures
        .iter()
        .map(|description| format!("⚠️ {description} — This is critical for safety!"))
        .collect()
}

/// Tips from the active phase definition, truncated when quality is low
pub fn build_tips(definition: Option<&PhaseDefinition>, quality: FormQuality) -> Vec<String> {
    let Some(definition) = definition else {
        return Vec::new();
    };

    let limit = match quality {
        FormQuality::Poor | FormQuality::Dangerous => POOR_FORM_TIP_LIMIT,
        _ => definition.tips.len(),
    };

    definition.tips.iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::PhaseScore;

    fn phase_with_tips(tips: &[&str]) -> PhaseDefinition {
        PhaseDefinition {
            phase: MovementPhase::Descent,
            instruction: "Control the descent.".to_string(),
            criteria: Vec::new(),
            tips: tips.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_quality_bands() {
        assert_eq!(FormQuality::from_score(0.95), FormQuality::Excellent);
        assert_eq!(FormQuality::from_score(0.9), FormQuality::Excellent);
        assert_eq!(FormQuality::from_score(0.85), FormQuality::Good);
        assert_eq!(FormQuality::from_score(0.75), FormQuality::Acceptable);
        assert_eq!(FormQuality::from_score(0.6), FormQuality::Poor);
        assert_eq!(FormQuality::from_score(0.2), FormQuality::Dangerous);
    }

    #[test]
    fn test_display_scores() {
        assert_eq!(FormQuality::Excellent.display_score(), 95);
        assert_eq!(FormQuality::Dangerous.display_score(), 20);
    }

    #[test]
    fn test_feedback_leads_with_instruction() {
        let definition = phase_with_tips(&[]);
        let feedback = build_feedback(
            MovementPhase::Descent,
            Some(&definition),
            FormQuality::Good,
        );
        assert_eq!(feedback[0], "Control the descent.");
        assert_eq!(feedback.len(), 2);
    }

    #[test]
    fn test_feedback_falls_back_without_definition() {
        let feedback = build_feedback(MovementPhase::Rest, None, FormQuality::Acceptable);
        assert_eq!(feedback[0], default_instruction(MovementPhase::Rest));
    }

    #[test]
    fn test_warnings_carry_criterion_description() {
        let mut score = PhaseScore::empty();
        score
            .critical_failures
            .push("Knees aligned with toes".to_string());

        let warnings = build_warnings(&score);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("⚠️"));
        assert!(warnings[0].contains("Knees aligned with toes"));
        assert!(warnings[0].contains("critical for safety"));
    }

    #[test]
    fn test_tips_truncated_on_poor_form() {
        let definition = phase_with_tips(&["one", "two", "three"]);
        assert_eq!(build_tips(Some(&definition), FormQuality::Good).len(), 3);
        assert_eq!(
            build_tips(Some(&definition), FormQuality::Poor).len(),
            POOR_FORM_TIP_LIMIT
        );
        assert_eq!(
            build_tips(Some(&definition), FormQuality::Dangerous).len(),
            POOR_FORM_TIP_LIMIT
        );
    }

    #[test]
    fn test_no_definition_means_no_tips() {
        assert!(build_tips(None, FormQuality::Excellent).is_empty());
    }
}
