//! Biomechanical criterion evaluation.
//!
//! Each criterion carries a [`CriterionKind`] resolved from its configured
//! name at registry-load time, so per-frame evaluation dispatches on an enum
//! instead of re-comparing strings, and misspelled criterion names surface
//! when the registry is built rather than silently at evaluation time.

use formsense_core::{horizontal_offset, joint_angle_deg, vertical_reference, Joint, JointMap};
use serde::{Deserialize, Serialize};

use crate::exercise::FormCriterion;

/// Score for a criterion whose required joints were not detected.
/// Cannot verify means treated as failing — this is a safety feature.
pub const MISSING_JOINT_SCORE: f64 = 0.0;

/// Neutral score for criteria the engine does not recognize
pub const UNKNOWN_CRITERION_SCORE: f64 = 0.5;

/// Default score for declared-but-unimplemented criteria
pub const STUB_CRITERION_SCORE: f64 = 0.8;

/// Geometric evaluator selected for a criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    /// Lateral knee-over-ankle tracking
    KneeAlignment,
    /// Angle at the hip between shoulder and knee
    HipHinge,
    /// Trunk angle against vertical, measured at the hip midpoint
    BackAngle,
    /// Knee-flexion depth at the bottom of the movement
    Depth,
    // TODO: hip_drive needs per-frame velocity from the pose source before
    // it can score concentric power; until then it reports the stub score.
    HipDrive,
    // TODO: smooth_motion needs the previous frame's joints to measure
    // jitter; until then it reports the stub score.
    SmoothMotion,
    /// Criterion name the engine does not recognize; scores neutrally
    #[serde(other)]
    Unknown,
}

impl CriterionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionKind::KneeAlignment => "knee_alignment",
            CriterionKind::HipHinge => "hip_hinge",
            CriterionKind::BackAngle => "back_angle",
            CriterionKind::Depth => "depth",
            CriterionKind::HipDrive => "hip_drive",
            CriterionKind::SmoothMotion => "smooth_motion",
            CriterionKind::Unknown => "unknown",
        }
    }

    /// Whether this kind is a declared-but-unimplemented stub
    pub fn is_stub(&self) -> bool {
        matches!(self, CriterionKind::HipDrive | CriterionKind::SmoothMotion)
    }

    /// Scores applied when an angle lands outside the acceptable band,
    /// as (below-minimum, above-maximum). The dangerous direction of
    /// deviation is penalized harder: a rounded back (angle collapsing
    /// below minimum) is worse than over-extension.
    fn out_of_band_scores(&self) -> (f64, f64) {
        match self {
            CriterionKind::BackAngle => (0.2, 0.5),
            CriterionKind::HipHinge => (0.3, 0.5),
            CriterionKind::Depth => (0.5, 0.4),
            _ => (0.4, 0.4),
        }
    }
}

/// Evaluate one criterion against the current joints, in [0, 1]
pub fn evaluate_criterion(criterion: &FormCriterion, joints: &JointMap) -> f64 {
    match criterion.kind {
        CriterionKind::KneeAlignment => knee_alignment_score(joints),
        CriterionKind::HipHinge => hip_hinge_score(criterion, joints),
        CriterionKind::BackAngle => back_angle_score(criterion, joints),
        CriterionKind::Depth => depth_score(criterion, joints),
        CriterionKind::HipDrive | CriterionKind::SmoothMotion => STUB_CRITERION_SCORE,
        CriterionKind::Unknown => UNKNOWN_CRITERION_SCORE,
    }
}

/// Banded score for a lateral alignment offset
fn alignment_band_score(offset: f64) -> f64 {
    if offset < 0.05 {
        1.0
    } else if offset < 0.10 {
        0.8
    } else if offset < 0.15 {
        0.6
    } else {
        0.2
    }
}

/// Knee-over-ankle tracking, averaged across the sides that resolved
fn knee_alignment_score(joints: &JointMap) -> f64 {
    let sides = [
        (Joint::LeftKnee, Joint::LeftAnkle),
        (Joint::RightKnee, Joint::RightAnkle),
    ];

    let mut sum = 0.0;
    let mut count = 0;
    for (knee, ankle) in sides {
        if let (Some(knee_pos), Some(ankle_pos)) = (joints.get(&knee), joints.get(&ankle)) {
            sum += alignment_band_score(horizontal_offset(knee_pos, ankle_pos));
            count += 1;
        }
    }

    if count > 0 {
        sum / count as f64
    } else {
        MISSING_JOINT_SCORE
    }
}

/// Score an angle against the criterion's ideal range, widening by the
/// criterion's tolerance for the acceptable band
fn banded_angle_score(criterion: &FormCriterion, angle: f64) -> f64 {
    if angle >= criterion.ideal_min && angle <= criterion.ideal_max {
        return 1.0;
    }
    let acceptable_min = criterion.ideal_min - criterion.tolerance;
    let acceptable_max = criterion.ideal_max + criterion.tolerance;
    if angle >= acceptable_min && angle <= acceptable_max {
        return 0.8;
    }
    let (below, above) = criterion.kind.out_of_band_scores();
    if angle < acceptable_min {
        below
    } else {
        above
    }
}

/// Hip hinge: angle at the hip between the shoulder and the knee,
/// averaged across sides
fn hip_hinge_score(criterion: &FormCriterion, joints: &JointMap) -> f64 {
    let sides = [
        (Joint::LeftShoulder, Joint::LeftHip, Joint::LeftKnee),
        (Joint::RightShoulder, Joint::RightHip, Joint::RightKnee),
    ];

    let mut sum = 0.0;
    let mut count = 0;
    for (shoulder, hip, knee) in sides {
        if let (Some(s), Some(h), Some(k)) =
            (joints.get(&shoulder), joints.get(&hip), joints.get(&knee))
        {
            sum += joint_angle_deg(s, h, k);
            count += 1;
        }
    }

    if count == 0 {
        return MISSING_JOINT_SCORE;
    }
    banded_angle_score(criterion, sum / count as f64)
}

/// Back angle: trunk line (hip midpoint to shoulder midpoint) against a
/// vertical reference below the hips. 180 degrees is fully upright.
fn back_angle_score(criterion: &FormCriterion, joints: &JointMap) -> f64 {
    let (Some(ls), Some(rs), Some(lh), Some(rh)) = (
        joints.get(&Joint::LeftShoulder),
        joints.get(&Joint::RightShoulder),
        joints.get(&Joint::LeftHip),
        joints.get(&Joint::RightHip),
    ) else {
        return MISSING_JOINT_SCORE;
    };

    let shoulder_mid = ls.midpoint(rs);
    let hip_mid = lh.midpoint(rh);
    let reference = vertical_reference(&hip_mid, formsense_core::VERTICAL_REFERENCE_DROP);
    let angle = joint_angle_deg(&shoulder_mid, &hip_mid, &reference);
    banded_angle_score(criterion, angle)
}

/// Depth: knee-flexion angle scored against the criterion's target range
fn depth_score(criterion: &FormCriterion, joints: &JointMap) -> f64 {
    match crate::phase::knee_flexion_angle(joints) {
        Some(angle) => banded_angle_score(criterion, angle),
        None => MISSING_JOINT_SCORE,
    }
}
