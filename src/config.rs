//! Configuration constants and per-session tunables for the linkage engine.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Constraint relaxation passes performed per frame.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 16;

/// Relaxation passes used to settle the linkage after IK or a four-bar update.
pub const DEFAULT_SETTLE_ITERATIONS: u32 = 8;

/// Lower and upper bound of the reduced pass used while dragging a joint.
pub const DRAG_ITERATIONS_MIN: u32 = 2;
pub const DRAG_ITERATIONS_MAX: u32 = 8;

/// End-effector tolerance used by the per-frame IK pass.
pub const DEFAULT_IK_TOLERANCE: f64 = 0.5;

/// FABRIK iterations spent inside a single frame.
pub const DEFAULT_IK_FRAME_ITERATIONS: u32 = 10;

/// FABRIK iterations spent when a new target is placed.
pub const DEFAULT_IK_PLACEMENT_ITERATIONS: u32 = 30;

/// Samples kept in the trace history before the oldest is dropped.
pub const DEFAULT_TRACE_CAPACITY: usize = 3000;

/// Fraction along the traced link that is sampled.
pub const DEFAULT_TRACE_FRACTION: f64 = 0.5;

/// Largest time delta (seconds) a single frame may advance.
pub const DEFAULT_MAX_FRAME_DT: f64 = 0.05;

/// Delta used for the first frame after playback starts.
pub const DEFAULT_FIRST_FRAME_DT: f64 = 0.016;

/// Delta used by a manual single step.
pub const DEFAULT_STEP_DT: f64 = 0.033;

/// Motor speed in degrees per second.
pub const DEFAULT_MOTOR_SPEED_DEG: f64 = 90.0;

/// Attempts made to nudge a four-bar into satisfying the Grashof condition.
pub const DEFAULT_GRASHOF_ATTEMPTS: u32 = 20;

/// Relative change applied to crank and ground on every Grashof attempt.
pub const DEFAULT_GRASHOF_NUDGE: f64 = 0.03;

/// Slack allowed when comparing `s + l` with `p + q`.
pub const GRASHOF_EPSILON: f64 = 1e-9;

/// Wall-clock budget of a frame in milliseconds (60 Hz).
pub const DEFAULT_FRAME_BUDGET_MS: f64 = 16.0;

/// Tunables for one simulation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub solver_iterations: u32,
    pub settle_iterations: u32,
    pub ik_tolerance: f64,
    pub ik_frame_iterations: u32,
    pub ik_placement_iterations: u32,
    pub trace_enabled: bool,
    pub trace_capacity: usize,
    pub trace_fraction: f64,
    /// Index of the link whose point is sampled into the trace.
    pub trace_constraint: usize,
    pub max_frame_dt: f64,
    pub motor_speed_deg: f64,
    pub grashof_attempts: u32,
    pub grashof_nudge: f64,
    /// Where the first ground joint of a synthesized four-bar is placed.
    pub four_bar_origin: DVec2,
    pub frame_budget_ms: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            solver_iterations: DEFAULT_SOLVER_ITERATIONS,
            settle_iterations: DEFAULT_SETTLE_ITERATIONS,
            ik_tolerance: DEFAULT_IK_TOLERANCE,
            ik_frame_iterations: DEFAULT_IK_FRAME_ITERATIONS,
            ik_placement_iterations: DEFAULT_IK_PLACEMENT_ITERATIONS,
            trace_enabled: true,
            trace_capacity: DEFAULT_TRACE_CAPACITY,
            trace_fraction: DEFAULT_TRACE_FRACTION,
            trace_constraint: 0,
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
            motor_speed_deg: DEFAULT_MOTOR_SPEED_DEG,
            grashof_attempts: DEFAULT_GRASHOF_ATTEMPTS,
            grashof_nudge: DEFAULT_GRASHOF_NUDGE,
            four_bar_origin: DVec2::ZERO,
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }
}

impl SimulationConfig {
    /// Reduced iteration count used while a joint is being dragged.
    pub fn drag_iterations(&self) -> u32 {
        (self.solver_iterations / 2).clamp(DRAG_ITERATIONS_MIN, DRAG_ITERATIONS_MAX)
    }
}
