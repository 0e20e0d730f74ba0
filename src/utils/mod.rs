//! Utility helpers including the id arena, planar math, logging, and frame profiling.

pub mod arena;
pub mod logging;
pub mod math;
pub mod profiling;

pub use arena::{Arena, ArenaId, ConstraintId, JointId};
pub use math::*;
