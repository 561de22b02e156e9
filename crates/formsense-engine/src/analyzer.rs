//! The form analyzer: per-frame orchestration and session state.
//!
//! One `FormAnalyzer` instance belongs to one workout screen session and
//! is driven from a single thread; `&mut self` on [`FormAnalyzer::analyze`]
//! makes exclusive access a compile-time property, so no internal locking
//! is needed. Every call is a bounded synchronous computation that absorbs
//! all degradation locally — a bad frame yields a zero-score analysis,
//! never a panic or an error.

use formsense_core::{SessionId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::criteria::evaluate_criterion;
use crate::exercise::{ExerciseDefinition, ExerciseRegistry};
use crate::extractor::{extract_joints, PoseObservation};
use crate::feedback::{build_feedback, build_tips, build_warnings, FormQuality};
use crate::phase::{classify_phase, MovementPhase};
use crate::reps::RepTracker;
use crate::scoring::{aggregate, PhaseScore, ScoreBuffer};

/// Per-observation analysis result handed to the feedback consumer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormAnalysis {
    pub session_id: SessionId,
    pub timestamp: Timestamp,
    /// Active exercise name, if one is set and known
    pub exercise: Option<String>,
    pub phase: MovementPhase,
    /// Smoothed overall score in [0, 1] (rolling-window mean)
    pub overall_score: f64,
    /// Raw per-criterion scores for the active phase, keyed by kind
    pub criterion_scores: HashMap<String, f64>,
    pub quality: FormQuality,
    pub feedback: Vec<String>,
    pub warnings: Vec<String>,
    pub tips: Vec<String>,
    /// Cumulative good reps this session; monotonically non-decreasing
    pub rep_count: u32,
    /// True exactly on the frame that completed a good rep
    pub rep_completed: bool,
}

/// Mutable per-session state owned by the analyzer
#[derive(Debug)]
struct SessionState {
    id: SessionId,
    exercise: Option<Arc<ExerciseDefinition>>,
    last_phase: MovementPhase,
    phase_started_at: Timestamp,
    last_rep_at: Option<Timestamp>,
    reps: RepTracker,
    scores: ScoreBuffer,
}

impl SessionState {
    fn new(exercise: Option<Arc<ExerciseDefinition>>) -> Self {
        Self {
            id: SessionId::new(),
            exercise,
            last_phase: MovementPhase::Rest,
            phase_started_at: Timestamp::now(),
            last_rep_at: None,
            reps: RepTracker::new(),
            scores: ScoreBuffer::default(),
        }
    }
}

/// Deterministic form-scoring and rep-tracking engine
pub struct FormAnalyzer {
    registry: ExerciseRegistry,
    session: SessionState,
}

impl FormAnalyzer {
    /// Analyzer over the built-in exercise registry
    pub fn new() -> Self {
        Self::with_registry(ExerciseRegistry::builtin())
    }

    pub fn with_registry(registry: ExerciseRegistry) -> Self {
        Self {
            registry,
            session: SessionState::new(None),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session.id
    }

    /// Name of the active exercise, if any
    pub fn exercise(&self) -> Option<&str> {
        self.session.exercise.as_ref().map(|e| e.name.as_str())
    }

    pub fn rep_count(&self) -> u32 {
        self.session.reps.good_reps()
    }

    /// Select the exercise to analyze against, resetting all session
    /// state (rep counter, buffers, timestamps). An unknown name leaves
    /// the analyzer exercise-less and returns false; subsequent analyze
    /// calls produce the neutral analysis rather than failing.
    pub fn set_exercise(&mut self, name: &str) -> bool {
        match self.registry.get(name) {
            Some(definition) => {
                tracing::debug!(exercise = %definition.name, "starting analyzer session");
                self.session = SessionState::new(Some(Arc::new(definition.clone())));
                true
            }
            None => {
                tracing::warn!(exercise = %name, "exercise not found in registry");
                self.session = SessionState::new(None);
                false
            }
        }
    }

    /// Score one pose observation. Synchronous, infallible: missing
    /// joints, unreadable frames, and configuration mismatches all
    /// degrade to a valid low-score analysis.
    pub fn analyze(&mut self, observation: &impl PoseObservation) -> FormAnalysis {
        let timestamp = observation.timestamp();

        let Some(exercise) = self.session.exercise.clone() else {
            return self.neutral_analysis(timestamp);
        };

        let joints = extract_joints(observation);

        let phase = classify_phase(&joints, &exercise.thresholds, self.session.last_phase);
        if phase != self.session.last_phase {
            tracing::debug!(
                from = self.session.last_phase.as_str(),
                to = phase.as_str(),
                dwell_secs = timestamp.seconds_since(self.session.phase_started_at),
                "phase transition"
            );
            self.session.reps.push_phase(phase);
            self.session.phase_started_at = timestamp;
            self.session.last_phase = phase;
        }

        let phase_definition = exercise.phase(phase);
        let score = match phase_definition {
            Some(definition) => {
                let results: Vec<_> = definition
                    .criteria
                    .iter()
                    .map(|c| (c, evaluate_criterion(c, &joints)))
                    .collect();
                aggregate(&results)
            }
            None => PhaseScore::empty(),
        };

        self.session.scores.push(score.overall);
        let smoothed = self.session.scores.mean();

        let rep_completed = self.session.reps.try_complete(phase, score.is_good_rep);
        if rep_completed {
            let cadence = self
                .session
                .last_rep_at
                .map(|t| timestamp.seconds_since(t));
            tracing::info!(
                exercise = %exercise.name,
                rep = self.session.reps.good_reps(),
                seconds_since_last = ?cadence,
                "good rep completed"
            );
            self.session.last_rep_at = Some(timestamp);
        }

        let quality = FormQuality::from_score(smoothed);
        let warnings = build_warnings(&score);

        FormAnalysis {
            session_id: self.session.id,
            timestamp,
            exercise: Some(exercise.name.clone()),
            phase,
            overall_score: smoothed,
            criterion_scores: score.criterion_scores,
            quality,
            feedback: build_feedback(phase, phase_definition, quality),
            warnings,
            tips: build_tips(phase_definition, quality),
            rep_count: self.session.reps.good_reps(),
            rep_completed,
        }
    }

    /// Valid but uninformative analysis for frames with no active
    /// exercise (unknown name or none selected)
    fn neutral_analysis(&self, timestamp: Timestamp) -> FormAnalysis {
        FormAnalysis {
            session_id: self.session.id,
            timestamp,
            exercise: None,
            phase: MovementPhase::Rest,
            overall_score: 0.0,
            criterion_scores: HashMap::new(),
            quality: FormQuality::from_score(0.0),
            feedback: vec!["No exercise selected — keep practicing!".to_string()],
            warnings: Vec::new(),
            tips: Vec::new(),
            rep_count: 0,
            rep_completed: false,
        }
    }
}

impl Default for FormAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
