//! Repetition counting over the classified phase sequence.
//!
//! A rep is credited only when the phase history ends with the exact
//! sequence starting → descent → bottom → ascent and the ascent frame
//! itself shows good form. Any deviation (an interposed rest, a skipped
//! phase) breaks the match, and a counted rep clears the history so the
//! next one must re-establish the full cycle.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::phase::MovementPhase;

/// Capacity of the bounded phase-history buffer
pub const PHASE_HISTORY_CAPACITY: usize = 10;

/// The phase cycle that constitutes one full repetition
pub const REP_SEQUENCE: [MovementPhase; 4] = [
    MovementPhase::Starting,
    MovementPhase::Descent,
    MovementPhase::Bottom,
    MovementPhase::Ascent,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepTracker {
    history: VecDeque<MovementPhase>,
    capacity: usize,
    good_reps: u32,
}

impl RepTracker {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(PHASE_HISTORY_CAPACITY),
            capacity: PHASE_HISTORY_CAPACITY,
            good_reps: 0,
        }
    }

    /// Cumulative good-rep count; never decreases within a session
    pub fn good_reps(&self) -> u32 {
        self.good_reps
    }

    /// Record a phase transition. Call only when the phase changed.
    pub fn push_phase(&mut self, phase: MovementPhase) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(phase);
    }

    /// Credit a rep if the current frame completes the full cycle with
    /// good form. Returns true exactly on the completing frame.
    pub fn try_complete(&mut self, phase: MovementPhase, is_good_rep: bool) -> bool {
        if phase != MovementPhase::Ascent || !is_good_rep {
            return false;
        }
        if !self.tail_matches_sequence() {
            return false;
        }

        self.good_reps += 1;
        self.history.clear();
        true
    }

    fn tail_matches_sequence(&self) -> bool {
        if self.history.len() < REP_SEQUENCE.len() {
            return false;
        }
        self.history
            .iter()
            .rev()
            .zip(REP_SEQUENCE.iter().rev())
            .all(|(a, b)| a == b)
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.good_reps = 0;
    }
}

impl Default for RepTracker {
    fn default() -> Self {
        Self::new()
    }
}
