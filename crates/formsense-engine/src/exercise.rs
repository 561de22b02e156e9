//! Exercise definitions and the static exercise registry.
//!
//! Definitions are immutable for the lifetime of a session. The registry is
//! keyed by lowercase exercise name and can be built from the shipped
//! defaults or deserialized from a configuration file.

use formsense_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::criteria::CriterionKind;
use crate::phase::MovementPhase;

/// Broad grouping used by consumers for filtering and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    LowerBody,
    UpperBody,
    FullBody,
    Core,
}

/// Knee-flexion angle bands driving the phase classifier.
/// Hinge-dominant lifts use a shallower (larger-angle) band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    /// Above this angle the lifter is in the starting position
    pub upper_deg: f64,
    /// At or below this angle the lifter is at the bottom
    pub mid_deg: f64,
}

/// One biomechanical check with its target range and safety weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormCriterion {
    pub kind: CriterionKind,
    /// Human-readable description, surfaced verbatim in safety warnings
    pub description: String,
    /// Ideal angle range in degrees (unused by alignment and stub kinds)
    #[serde(default)]
    pub ideal_min: f64,
    #[serde(default)]
    pub ideal_max: f64,
    /// Widening applied to the ideal range for the acceptable band
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Safety weight in [0, 1]; criteria at or above 0.9 can veto a rep
    pub importance: f64,
}

fn default_tolerance() -> f64 {
    10.0
}

/// One movement phase with its criteria and coaching copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    pub phase: MovementPhase,
    /// Baseline instruction shown while this phase is active
    pub instruction: String,
    pub criteria: Vec<FormCriterion>,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Complete definition of one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    pub name: String,
    pub category: ExerciseCategory,
    pub description: String,
    pub thresholds: PhaseThresholds,
    pub phases: Vec<PhaseDefinition>,
}

impl ExerciseDefinition {
    pub fn phase(&self, phase: MovementPhase) -> Option<&PhaseDefinition> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}

/// Static, read-only table of exercises keyed by lowercase name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRegistry {
    exercises: HashMap<String, ExerciseDefinition>,
}

impl ExerciseRegistry {
    pub fn new() -> Self {
        Self {
            exercises: HashMap::new(),
        }
    }

    /// Registry with the shipped exercise definitions
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(squat_definition());
        registry.insert(deadlift_definition());
        registry
    }

    /// Load a registry from a configuration file, honoring
    /// `FORMSENSE_`-prefixed environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("FORMSENSE"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let file: RegistryFile = settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;

        let mut registry = Self::new();
        for exercise in file.exercises {
            registry.insert(exercise);
        }
        registry.validate()?;
        Ok(registry)
    }

    pub fn insert(&mut self, exercise: ExerciseDefinition) {
        self.exercises.insert(exercise.name.to_lowercase(), exercise);
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<&ExerciseDefinition> {
        self.exercises.get(&name.to_lowercase())
    }

    pub fn names(&self) -> Vec<&str> {
        self.exercises.values().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Check weights and thresholds; unknown criterion names are allowed
    /// but warned, so configuration typos surface at load time
    pub fn validate(&self) -> Result<()> {
        for exercise in self.exercises.values() {
            if exercise.thresholds.upper_deg <= exercise.thresholds.mid_deg {
                return Err(Error::InvalidDefinition(format!(
                    "{}: upper threshold must exceed mid threshold",
                    exercise.name
                )));
            }
            for phase in &exercise.phases {
                for criterion in &phase.criteria {
                    if !(0.0..=1.0).contains(&criterion.importance) {
                        return Err(Error::ImportanceOutOfRange {
                            criterion: criterion.kind.as_str().to_string(),
                            value: criterion.importance,
                        });
                    }
                    if criterion.kind == CriterionKind::Unknown {
                        tracing::warn!(
                            exercise = %exercise.name,
                            phase = %phase.phase.as_str(),
                            description = %criterion.description,
                            "unrecognized criterion will score neutrally"
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for ExerciseRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    exercises: Vec<ExerciseDefinition>,
}

fn criterion(
    kind: CriterionKind,
    description: &str,
    ideal: (f64, f64),
    importance: f64,
) -> FormCriterion {
    FormCriterion {
        kind,
        description: description.to_string(),
        ideal_min: ideal.0,
        ideal_max: ideal.1,
        tolerance: default_tolerance(),
        importance,
    }
}

fn squat_definition() -> ExerciseDefinition {
    ExerciseDefinition {
        name: "Squat".to_string(),
        category: ExerciseCategory::LowerBody,
        description: "Bodyweight squat with upright trunk and knees tracking the toes"
            .to_string(),
        thresholds: PhaseThresholds {
            upper_deg: 120.0,
            mid_deg: 90.0,
        },
        phases: vec![
            PhaseDefinition {
                phase: MovementPhase::Starting,
                instruction: "Stand tall, feet shoulder-width apart.".to_string(),
                criteria: vec![
                    criterion(
                        CriterionKind::BackAngle,
                        "Back straight and upright",
                        (160.0, 180.0),
                        0.9,
                    ),
                    criterion(
                        CriterionKind::KneeAlignment,
                        "Knees aligned with toes",
                        (0.0, 0.0),
                        0.95,
                    ),
                ],
                tips: vec![
                    "Brace your core before you move.".to_string(),
                    "Keep your weight over mid-foot.".to_string(),
                ],
            },
            PhaseDefinition {
                phase: MovementPhase::Descent,
                instruction: "Control the descent. Keep form tight.".to_string(),
                criteria: vec![
                    criterion(
                        CriterionKind::KneeAlignment,
                        "Knees aligned with toes",
                        (0.0, 0.0),
                        0.95,
                    ),
                    criterion(
                        CriterionKind::BackAngle,
                        "Back neutral, chest up",
                        (140.0, 180.0),
                        0.9,
                    ),
                    criterion(
                        CriterionKind::HipHinge,
                        "Hips travel back and down together",
                        (80.0, 150.0),
                        0.7,
                    ),
                    criterion(
                        CriterionKind::SmoothMotion,
                        "Descend under control",
                        (0.0, 0.0),
                        0.4,
                    ),
                ],
                tips: vec![
                    "Sit back into your hips.".to_string(),
                    "Keep your heels down.".to_string(),
                    "Breathe in on the way down.".to_string(),
                ],
            },
            PhaseDefinition {
                phase: MovementPhase::Bottom,
                instruction: "Hit depth, stay braced.".to_string(),
                criteria: vec![
                    criterion(
                        CriterionKind::Depth,
                        "Thighs at or below parallel",
                        (60.0, 95.0),
                        0.8,
                    ),
                    criterion(
                        CriterionKind::KneeAlignment,
                        "Knees aligned with toes",
                        (0.0, 0.0),
                        0.95,
                    ),
                    criterion(
                        CriterionKind::BackAngle,
                        "Back neutral at the bottom",
                        (130.0, 175.0),
                        0.9,
                    ),
                ],
                tips: vec![
                    "Don't bounce out of the hole.".to_string(),
                    "Keep your knees pushed out.".to_string(),
                ],
            },
            PhaseDefinition {
                phase: MovementPhase::Ascent,
                instruction: "Drive up through your heels.".to_string(),
                criteria: vec![
                    criterion(
                        CriterionKind::KneeAlignment,
                        "Knees aligned with toes",
                        (0.0, 0.0),
                        0.95,
                    ),
                    criterion(
                        CriterionKind::BackAngle,
                        "Chest rises with the hips",
                        (140.0, 180.0),
                        0.9,
                    ),
                    criterion(
                        CriterionKind::HipDrive,
                        "Drive the hips through at the top",
                        (0.0, 0.0),
                        0.5,
                    ),
                ],
                tips: vec![
                    "Exhale as you drive up.".to_string(),
                    "Squeeze your glutes at the top.".to_string(),
                ],
            },
        ],
    }
}

fn deadlift_definition() -> ExerciseDefinition {
    ExerciseDefinition {
        name: "Deadlift".to_string(),
        category: ExerciseCategory::FullBody,
        description: "Hip-hinge pull with a neutral spine and vertical bar path".to_string(),
        thresholds: PhaseThresholds {
            upper_deg: 140.0,
            mid_deg: 110.0,
        },
        phases: vec![
            PhaseDefinition {
                phase: MovementPhase::Starting,
                instruction: "Set your hinge, shoulders over the bar.".to_string(),
                criteria: vec![
                    criterion(
                        CriterionKind::BackAngle,
                        "Spine neutral before the pull",
                        (150.0, 180.0),
                        0.95,
                    ),
                    criterion(
                        CriterionKind::HipHinge,
                        "Hips set between knees and shoulders",
                        (90.0, 150.0),
                        0.8,
                    ),
                ],
                tips: vec![
                    "Pull the slack out of the bar.".to_string(),
                    "Lock your lats before lifting.".to_string(),
                ],
            },
            PhaseDefinition {
                phase: MovementPhase::Descent,
                instruction: "Hinge back, bar close to your legs.".to_string(),
                criteria: vec![
                    criterion(
                        CriterionKind::BackAngle,
                        "Spine stays neutral through the hinge",
                        (130.0, 180.0),
                        0.95,
                    ),
                    criterion(
                        CriterionKind::HipHinge,
                        "Hinge from the hips, not the knees",
                        (70.0, 140.0),
                        0.8,
                    ),
                    criterion(
                        CriterionKind::KneeAlignment,
                        "Shins vertical, knees over ankles",
                        (0.0, 0.0),
                        0.7,
                    ),
                ],
                tips: vec![
                    "Push your hips back first.".to_string(),
                    "Keep the bar dragging along your thighs.".to_string(),
                ],
            },
            PhaseDefinition {
                phase: MovementPhase::Bottom,
                instruction: "Stay tight at the bottom.".to_string(),
                criteria: vec![
                    criterion(
                        CriterionKind::BackAngle,
                        "No rounding at the bottom",
                        (125.0, 175.0),
                        0.95,
                    ),
                    criterion(
                        CriterionKind::Depth,
                        "Hinge depth without collapsing",
                        (85.0, 115.0),
                        0.6,
                    ),
                ],
                tips: vec![
                    "Chest up, hips down.".to_string(),
                    "Don't let the bar drift forward.".to_string(),
                ],
            },
            PhaseDefinition {
                phase: MovementPhase::Ascent,
                instruction: "Stand up hard, hips and shoulders together.".to_string(),
                criteria: vec![
                    criterion(
                        CriterionKind::BackAngle,
                        "Spine neutral while standing up",
                        (135.0, 180.0),
                        0.95,
                    ),
                    criterion(
                        CriterionKind::HipDrive,
                        "Hips finish the lockout",
                        (0.0, 0.0),
                        0.5,
                    ),
                ],
                tips: vec![
                    "Push the floor away.".to_string(),
                    "Finish tall without leaning back.".to_string(),
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_registry_contains_defaults() {
        let registry = ExerciseRegistry::builtin();
        assert!(registry.get("squat").is_some());
        assert!(registry.get("deadlift").is_some());
        assert!(registry.get("bench press").is_none());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ExerciseRegistry::builtin();
        assert!(registry.get("SQUAT").is_some());
        assert!(registry.get("Squat").is_some());
        assert!(registry.get("DeAdLiFt").is_some());
    }

    #[test]
    fn test_builtin_registry_validates() {
        let registry = ExerciseRegistry::builtin();
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_every_active_phase_is_defined() {
        let registry = ExerciseRegistry::builtin();
        for name in ["squat", "deadlift"] {
            let exercise = registry.get(name).unwrap();
            for phase in [
                MovementPhase::Starting,
                MovementPhase::Descent,
                MovementPhase::Bottom,
                MovementPhase::Ascent,
            ] {
                assert!(exercise.phase(phase).is_some(), "{name} missing {phase:?}");
            }
        }
    }

    #[test]
    fn test_importance_out_of_range_rejected() {
        let mut registry = ExerciseRegistry::new();
        let mut exercise = squat_definition();
        exercise.phases[0].criteria[0].importance = 1.4;
        registry.insert(exercise);
        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut registry = ExerciseRegistry::new();
        let mut exercise = squat_definition();
        exercise.thresholds = PhaseThresholds {
            upper_deg: 90.0,
            mid_deg: 120.0,
        };
        registry.insert(exercise);
        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_registry_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        let registry = ExerciseRegistry::builtin();
        let json = serde_json::json!({
            "exercises": [registry.get("squat").unwrap()]
        });
        file.write_all(json.to_string().as_bytes()).unwrap();
        file.flush().unwrap();

        let loaded = ExerciseRegistry::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.get("squat").is_some());
    }
}
