//! Geometric utilities for joint-angle and alignment computations.

use nalgebra::Vector3;

use crate::types::JointPosition;

/// Drop below a joint used to synthesize a vertical reference point
pub const VERTICAL_REFERENCE_DROP: f64 = 0.1;

/// Calculate the angle between two vectors in radians.
/// The dot-product ratio is clamped to [-1, 1] before `acos` so that
/// floating-point overshoot on near-collinear vectors cannot yield NaN.
pub fn angle_between(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let dot = v1.dot(v2);
    let norms = v1.norm() * v2.norm();
    if norms < 1e-10 {
        0.0
    } else {
        (dot / norms).clamp(-1.0, 1.0).acos()
    }
}

/// Angle in degrees at `pivot` between the rays toward `a` and `b`
pub fn joint_angle_deg(a: &JointPosition, pivot: &JointPosition, b: &JointPosition) -> f64 {
    let v1 = pivot.vector_to(a);
    let v2 = pivot.vector_to(b);
    angle_between(&v1, &v2).to_degrees()
}

/// Synthetic reference point straight below a joint, used as the second
/// ray when measuring flexion against vertical
pub fn vertical_reference(p: &JointPosition, drop: f64) -> JointPosition {
    JointPosition::new(p.x, p.y - drop, p.z)
}

/// Flexion angle in degrees at `pivot` between `toward` and a vertical
/// reference below the pivot. 180 degrees is a fully extended (vertical)
/// segment, smaller angles mean deeper flexion.
pub fn flexion_angle_deg(toward: &JointPosition, pivot: &JointPosition) -> f64 {
    let reference = vertical_reference(pivot, VERTICAL_REFERENCE_DROP);
    joint_angle_deg(toward, pivot, &reference)
}

/// Horizontal (lateral) offset between two joints, used for alignment
/// checks such as knee-over-ankle tracking
pub fn horizontal_offset(a: &JointPosition, b: &JointPosition) -> f64 {
    (a.x - b.x).abs()
}
