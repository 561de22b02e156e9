//! Fundamental types for the FormSense system.

use chrono::{DateTime, Utc};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Identifier for one workout session (one analyzer lifetime)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }

    /// Elapsed seconds since an earlier timestamp
    pub fn seconds_since(&self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0) as f64 / 1_000_000_000.0
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.0)
    }
}

/// Anatomical landmarks reported by the pose detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Joint {
    Root = 0,
    Spine = 1,
    Neck = 2,
    LeftShoulder = 3,
    RightShoulder = 4,
    LeftElbow = 5,
    RightElbow = 6,
    LeftWrist = 7,
    RightWrist = 8,
    LeftHip = 9,
    RightHip = 10,
    LeftKnee = 11,
    RightKnee = 12,
    LeftAnkle = 13,
    RightAnkle = 14,
}

impl Joint {
    pub const COUNT: usize = 15;

    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::Root),
            1 => Some(Self::Spine),
            2 => Some(Self::Neck),
            3 => Some(Self::LeftShoulder),
            4 => Some(Self::RightShoulder),
            5 => Some(Self::LeftElbow),
            6 => Some(Self::RightElbow),
            7 => Some(Self::LeftWrist),
            8 => Some(Self::RightWrist),
            9 => Some(Self::LeftHip),
            10 => Some(Self::RightHip),
            11 => Some(Self::LeftKnee),
            12 => Some(Self::RightKnee),
            13 => Some(Self::LeftAnkle),
            14 => Some(Self::RightAnkle),
            _ => None,
        }
    }

    /// Left/right joint pairs for side-averaged measurements
    pub fn side_pairs() -> &'static [(Joint, Joint)] {
        &[
            (Joint::LeftShoulder, Joint::RightShoulder),
            (Joint::LeftElbow, Joint::RightElbow),
            (Joint::LeftWrist, Joint::RightWrist),
            (Joint::LeftHip, Joint::RightHip),
            (Joint::LeftKnee, Joint::RightKnee),
            (Joint::LeftAnkle, Joint::RightAnkle),
        ]
    }

    /// Skeleton connectivity for downstream visualization
    pub fn skeleton_pairs() -> &'static [(Joint, Joint)] {
        &[
            (Joint::LeftAnkle, Joint::LeftKnee),
            (Joint::LeftKnee, Joint::LeftHip),
            (Joint::RightAnkle, Joint::RightKnee),
            (Joint::RightKnee, Joint::RightHip),
            (Joint::LeftHip, Joint::Root),
            (Joint::RightHip, Joint::Root),
            (Joint::Root, Joint::Spine),
            (Joint::Spine, Joint::Neck),
            (Joint::LeftShoulder, Joint::Neck),
            (Joint::RightShoulder, Joint::Neck),
            (Joint::LeftShoulder, Joint::LeftElbow),
            (Joint::RightShoulder, Joint::RightElbow),
            (Joint::LeftElbow, Joint::LeftWrist),
            (Joint::RightElbow, Joint::RightWrist),
        ]
    }
}

/// 3D joint position in the pose detector's normalized coordinate space.
/// The y axis points up; x is the lateral axis used for alignment checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl JointPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn to_nalgebra(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn from_nalgebra(p: Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }

    /// Vector from this position to another
    pub fn vector_to(&self, other: &Self) -> Vector3<f64> {
        Vector3::new(other.x - self.x, other.y - self.y, other.z - self.z)
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }
}

/// Per-frame mapping from detected joints to positions. Joints the
/// detector did not resolve are absent, never inserted as sentinels.
pub type JointMap = HashMap<Joint, JointPosition>;

/// Joint detection with the detector's confidence estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointDetection {
    pub joint: Joint,
    pub position: JointPosition,
    pub confidence: f32,
}

impl JointDetection {
    pub fn new(joint: Joint, position: JointPosition, confidence: f32) -> Self {
        Self {
            joint,
            position,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_roundtrip() {
        for i in 0..Joint::COUNT as u8 {
            let joint = Joint::from_index(i).unwrap();
            assert_eq!(joint as u8, i);
        }
        assert!(Joint::from_index(Joint::COUNT as u8).is_none());
    }

    #[test]
    fn test_position_distance() {
        let p1 = JointPosition::new(0.0, 0.0, 0.0);
        let p2 = JointPosition::new(3.0, 4.0, 0.0);
        assert!((p1.distance_to(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_midpoint() {
        let p1 = JointPosition::new(0.0, 1.0, 0.0);
        let p2 = JointPosition::new(2.0, 3.0, 0.0);
        let mid = p1.midpoint(&p2);
        assert!((mid.x - 1.0).abs() < 1e-10);
        assert!((mid.y - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_timestamp_elapsed() {
        let t0 = Timestamp::from_nanos(1_000_000_000);
        let t1 = Timestamp::from_nanos(2_500_000_000);
        assert!((t1.seconds_since(t0) - 1.5).abs() < 1e-10);
    }
}
