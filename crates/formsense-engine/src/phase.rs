//! Movement phase classification from joint geometry.
//!
//! The classifier is a Mealy machine: the next phase depends on both the
//! measured knee-flexion angle and the previous phase, which disambiguates
//! descent from ascent in the mid-angle band where geometry alone is
//! ambiguous. Missing joints always classify as `Rest` — the engine never
//! guesses a phase it cannot measure.

use formsense_core::{flexion_angle_deg, Joint, JointMap};
use serde::{Deserialize, Serialize};

use crate::exercise::PhaseThresholds;

/// Stage of a repetition's movement cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPhase {
    #[serde(rename = "starting_position")]
    Starting,
    Descent,
    Bottom,
    Ascent,
    Rest,
}

impl MovementPhase {
    /// Friendly key matching exercise-definition phase names
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementPhase::Starting => "starting_position",
            MovementPhase::Descent => "descent",
            MovementPhase::Bottom => "bottom",
            MovementPhase::Ascent => "ascent",
            MovementPhase::Rest => "rest",
        }
    }
}

/// Knee-flexion angle averaged across the sides whose hip and knee both
/// resolved. `None` when neither side is measurable.
pub fn knee_flexion_angle(joints: &JointMap) -> Option<f64> {
    let sides = [
        (Joint::LeftHip, Joint::LeftKnee),
        (Joint::RightHip, Joint::RightKnee),
    ];

    let mut sum = 0.0;
    let mut count = 0;
    for (hip, knee) in sides {
        if let (Some(hip_pos), Some(knee_pos)) = (joints.get(&hip), joints.get(&knee)) {
            sum += flexion_angle_deg(hip_pos, knee_pos);
            count += 1;
        }
    }

    if count > 0 {
        Some(sum / count as f64)
    } else {
        None
    }
}

/// Classify the current movement phase from joint geometry and the
/// previous phase, using per-exercise angle thresholds.
pub fn classify_phase(
    joints: &JointMap,
    thresholds: &PhaseThresholds,
    previous: MovementPhase,
) -> MovementPhase {
    let Some(angle) = knee_flexion_angle(joints) else {
        return MovementPhase::Rest;
    };

    if angle > thresholds.upper_deg {
        MovementPhase::Starting
    } else if angle <= thresholds.mid_deg {
        MovementPhase::Bottom
    } else {
        // Mid band: direction comes from where we were
        match previous {
            MovementPhase::Starting | MovementPhase::Descent => MovementPhase::Descent,
            MovementPhase::Bottom | MovementPhase::Ascent => MovementPhase::Ascent,
            MovementPhase::Rest => MovementPhase::Rest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsense_core::JointPosition;

    fn squat_thresholds() -> PhaseThresholds {
        PhaseThresholds {
            upper_deg: 120.0,
            mid_deg: 90.0,
        }
    }

    /// Hips placed so the flexion angle at each knee equals `theta_deg`
    fn legs_at(theta_deg: f64) -> JointMap {
        let theta = theta_deg.to_radians();
        let mut joints = JointMap::new();
        for (hip, knee, x) in [
            (Joint::LeftHip, Joint::LeftKnee, -0.2),
            (Joint::RightHip, Joint::RightKnee, 0.2),
        ] {
            let knee_pos = JointPosition::new(x, 1.0, 0.0);
            let hip_pos = JointPosition::new(
                x + 0.5 * theta.sin(),
                1.0 - 0.5 * theta.cos(),
                0.0,
            );
            joints.insert(knee, knee_pos);
            joints.insert(hip, hip_pos);
        }
        joints
    }

    #[test]
    fn test_extended_legs_are_starting() {
        let joints = legs_at(180.0);
        let phase = classify_phase(&joints, &squat_thresholds(), MovementPhase::Rest);
        assert_eq!(phase, MovementPhase::Starting);
    }

    #[test]
    fn test_deep_flexion_is_bottom() {
        let joints = legs_at(80.0);
        let phase = classify_phase(&joints, &squat_thresholds(), MovementPhase::Descent);
        assert_eq!(phase, MovementPhase::Bottom);
    }

    #[test]
    fn test_mid_band_direction_from_previous_phase() {
        let joints = legs_at(105.0);
        let down = classify_phase(&joints, &squat_thresholds(), MovementPhase::Starting);
        assert_eq!(down, MovementPhase::Descent);

        let up = classify_phase(&joints, &squat_thresholds(), MovementPhase::Bottom);
        assert_eq!(up, MovementPhase::Ascent);
    }

    #[test]
    fn test_mid_band_from_rest_stays_rest() {
        let joints = legs_at(105.0);
        let phase = classify_phase(&joints, &squat_thresholds(), MovementPhase::Rest);
        assert_eq!(phase, MovementPhase::Rest);
    }

    #[test]
    fn test_missing_joints_classify_as_rest() {
        let joints = JointMap::new();
        let phase = classify_phase(&joints, &squat_thresholds(), MovementPhase::Descent);
        assert_eq!(phase, MovementPhase::Rest);
    }

    #[test]
    fn test_single_side_is_enough() {
        let mut joints = legs_at(180.0);
        joints.remove(&Joint::RightHip);
        joints.remove(&Joint::RightKnee);
        let phase = classify_phase(&joints, &squat_thresholds(), MovementPhase::Rest);
        assert_eq!(phase, MovementPhase::Starting);
    }

    #[test]
    fn test_deadlift_uses_wider_band() {
        let thresholds = PhaseThresholds {
            upper_deg: 140.0,
            mid_deg: 110.0,
        };
        // 130 degrees is upright for a squat but a hinge for a deadlift
        let joints = legs_at(130.0);
        assert_eq!(
            classify_phase(&joints, &squat_thresholds(), MovementPhase::Rest),
            MovementPhase::Starting
        );
        assert_eq!(
            classify_phase(&joints, &thresholds, MovementPhase::Starting),
            MovementPhase::Descent
        );
    }
}
