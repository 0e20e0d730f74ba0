use log::warn;
use std::time::Duration;

/// Emits a warning when a frame took longer than its budget.
///
/// Returns whether the budget was exceeded.
pub fn warn_if_frame_budget_exceeded(duration: Duration, budget_ms: f64) -> bool {
    let elapsed_ms = duration.as_secs_f64() * 1000.0;
    if elapsed_ms > budget_ms {
        warn!("Frame exceeded budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms");
        return true;
    }
    false
}
