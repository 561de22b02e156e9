//! Joint extraction from a pose observation.
//!
//! The upstream pose detector is a fallible collaborator: a frame can be
//! unreadable, and any subset of joints can be missing. Extraction absorbs
//! query failures into an empty joint map so that one bad frame can never
//! interrupt a live session.

use formsense_core::{JointDetection, JointMap, Result, SessionId, Timestamp};
use serde::{Deserialize, Serialize};

/// Default confidence when the detector does not report one
pub const DEFAULT_CONFIDENCE: f32 = 1.0;

/// A queryable pose observation supplied by the upstream detector
pub trait PoseObservation {
    /// Resolve the named joints of this observation. Implementations may
    /// fail wholesale (unreadable frame) or omit any subset of joints.
    fn resolve_joints(&self) -> Result<JointMap>;

    fn timestamp(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Map an observation to named joint positions. A failed query degrades
/// to an empty map; the failure reason is logged, never propagated.
pub fn extract_joints(observation: &impl PoseObservation) -> JointMap {
    match observation.resolve_joints() {
        Ok(joints) => joints,
        Err(e) => {
            tracing::debug!(error = %e, "pose query failed, degrading to empty joint map");
            JointMap::new()
        }
    }
}

/// Plain in-memory pose frame, the simplest observation implementation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointFrame {
    pub timestamp: Timestamp,
    pub session_id: Option<SessionId>,
    pub detections: Vec<JointDetection>,
}

impl JointFrame {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            session_id: None,
            detections: Vec::new(),
        }
    }

    pub fn with_detections(timestamp: Timestamp, detections: Vec<JointDetection>) -> Self {
        Self {
            timestamp,
            session_id: None,
            detections,
        }
    }

    pub fn push(&mut self, detection: JointDetection) {
        self.detections.push(detection);
    }
}

impl PoseObservation for JointFrame {
    fn resolve_joints(&self) -> Result<JointMap> {
        Ok(self
            .detections
            .iter()
            .map(|d| (d.joint, d.position))
            .collect())
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
