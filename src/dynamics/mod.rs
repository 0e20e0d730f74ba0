//! Per-frame dynamics: motor drive and distance-constraint relaxation.

pub mod motor;
pub mod solver;

pub use motor::{angle_about_anchor, resolve_anchor, MotorDriver};
pub use solver::{ConstraintSolver, SolverStepMetrics};
