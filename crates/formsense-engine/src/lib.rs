//! # FormSense-Engine
//!
//! Deterministic exercise form-scoring and repetition-tracking engine.
//! Consumes a stream of 3D body-joint observations and, per frame,
//! classifies the movement phase, scores biomechanical criteria against
//! per-exercise rules, tracks good-quality repetitions, and emits
//! structured feedback.
//!
//! ## Pipeline
//!
//! Each observation flows through the same stages:
//!
//! 1. **Joint extraction** — fallible pose query degraded to an empty map
//! 2. **Phase classification** — Mealy machine over knee-flexion geometry
//! 3. **Criterion evaluation** — enum-dispatched geometric checks
//! 4. **Score aggregation** — importance-weighted mean with a critical
//!    failure veto and rolling-window smoothing
//! 5. **Rep tracking** — exact phase-sequence matching with history reset
//! 6. **Feedback generation** — instructions, safety warnings, and tips
//!
//! The engine is synchronous and single-threaded by design; it never
//! errors at the `analyze` boundary and never blocks.

pub mod analyzer;
pub mod criteria;
pub mod exercise;
pub mod extractor;
pub mod feedback;
pub mod phase;
pub mod reps;
pub mod scoring;

pub use analyzer::*;
pub use criteria::*;
pub use exercise::*;
pub use extractor::*;
pub use feedback::*;
pub use phase::*;
pub use reps::*;
pub use scoring::*;
