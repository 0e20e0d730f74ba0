//! Forward-And-Backward Reaching Inverse Kinematics (FABRIK) for planar chains.
//!
//! Segment lengths are measured from the joints' current positions at the
//! start of every solve, not taken from the link rest lengths.

use glam::DVec2;
use log::trace;

use crate::{
    core::joint::Joint,
    error::{LinkageError, Result},
    utils::{
        arena::{Arena, JointId},
        math::place_at_distance,
    },
};

/// Tolerance and iteration budget for one solve.
#[derive(Debug, Clone, Copy)]
pub struct FabrikConfig {
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for FabrikConfig {
    fn default() -> Self {
        Self {
            tolerance: crate::config::DEFAULT_IK_TOLERANCE,
            max_iterations: crate::config::DEFAULT_IK_FRAME_ITERATIONS,
        }
    }
}

/// Result of an IK solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IkReport {
    /// Whether the end-effector ended within tolerance of the target.
    pub reached: bool,
    /// Reaching iterations performed (zero for a stretched chain).
    pub iterations: u32,
    /// Final distance between end-effector and target.
    pub error: f64,
    /// The target lay beyond the chain's total length.
    pub stretched: bool,
}

#[derive(Debug, Clone)]
pub struct FabrikSolver {
    config: FabrikConfig,
}

impl FabrikSolver {
    pub const fn new(config: FabrikConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FabrikConfig::default())
    }

    pub fn config(&self) -> FabrikConfig {
        self.config
    }

    /// Pulls the chain's last joint toward `target`, writing back only free joints.
    pub fn solve(
        &self,
        joints: &mut Arena<JointId, Joint>,
        chain: &[JointId],
        target: DVec2,
    ) -> Result<IkReport> {
        if chain.len() < 2 {
            return Err(LinkageError::ChainTooShort(chain.len()));
        }

        let mut positions = Vec::with_capacity(chain.len());
        for &id in chain {
            let joint = joints.get(id).ok_or(LinkageError::UnknownJoint(id))?;
            positions.push(joint.position);
        }

        let report = self.solve_positions(&mut positions, target)?;

        for (&id, position) in chain.iter().zip(positions) {
            if let Some(joint) = joints.get_mut(id) {
                if !joint.locked {
                    joint.position = position;
                }
            }
        }

        trace!(
            "fabrik: {} joints, {} iterations, error {:.4}",
            chain.len(),
            report.iterations,
            report.error
        );
        Ok(report)
    }

    /// FABRIK on a bare list of points. Fewer than two points is rejected
    /// and leaves the slice untouched.
    pub fn solve_positions(&self, positions: &mut [DVec2], target: DVec2) -> Result<IkReport> {
        let n = positions.len();
        if n < 2 {
            return Err(LinkageError::ChainTooShort(n));
        }
        let segments: Vec<f64> = positions
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .collect();
        let total_length: f64 = segments.iter().sum();

        if positions[0].distance(target) > total_length {
            for i in 0..n - 1 {
                if let Some(next) = place_at_distance(positions[i], target, segments[i]) {
                    positions[i + 1] = next;
                }
            }
            let error = positions[n - 1].distance(target);
            return Ok(IkReport {
                reached: error <= self.config.tolerance,
                iterations: 0,
                error,
                stretched: true,
            });
        }

        let base = positions[0];
        let mut error = positions[n - 1].distance(target);
        let mut iterations = 0;
        while error > self.config.tolerance && iterations < self.config.max_iterations {
            positions[n - 1] = target;
            for i in (0..n - 1).rev() {
                if let Some(moved) = place_at_distance(positions[i + 1], positions[i], segments[i]) {
                    positions[i] = moved;
                }
            }

            positions[0] = base;
            for i in 0..n - 1 {
                if let Some(moved) = place_at_distance(positions[i], positions[i + 1], segments[i]) {
                    positions[i + 1] = moved;
                }
            }

            error = positions[n - 1].distance(target);
            iterations += 1;
        }

        Ok(IkReport {
            reached: error <= self.config.tolerance,
            iterations,
            error,
            stretched: false,
        })
    }
}
