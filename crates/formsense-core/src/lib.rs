//! # FormSense-Core
//!
//! Core types and utilities for the FormSense exercise form-analysis
//! engine: anatomical joint identifiers, 3D joint positions, session
//! bookkeeping types, and the geometric primitives (joint angles,
//! alignment offsets) the analysis crates build on.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
