use glam::DVec2;

use crate::{
    core::{constraints::Constraint, joint::Joint},
    utils::arena::{Arena, ConstraintId, JointId},
};

/// Figures gathered during one relaxation call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolverStepMetrics {
    pub iterations: u32,
    pub corrections: usize,
    pub degenerate_skips: usize,
    /// Largest `|live - rest|` seen during the final pass, before correction.
    pub max_error: f64,
}

/// Gauss-Seidel position relaxation over rigid distance links.
///
/// Each pass walks the links in declaration order and moves the free
/// endpoint(s) so that the link recovers its rest length. Fixing one link
/// disturbs its neighbours, so the result is only approximate and improves
/// with more passes; infeasible linkages settle at a compromise.
#[derive(Debug, Clone)]
pub struct ConstraintSolver {
    pub iterations: u32,
}

impl ConstraintSolver {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn solve(
        &self,
        joints: &mut Arena<JointId, Joint>,
        constraints: &Arena<ConstraintId, Constraint>,
    ) -> SolverStepMetrics {
        Self::relax(joints, constraints, self.iterations)
    }

    /// Runs `iterations` passes. Only joint positions are touched.
    pub fn relax(
        joints: &mut Arena<JointId, Joint>,
        constraints: &Arena<ConstraintId, Constraint>,
        iterations: u32,
    ) -> SolverStepMetrics {
        let mut metrics = SolverStepMetrics::default();
        if constraints.is_empty() {
            return metrics;
        }

        for _ in 0..iterations {
            metrics.max_error = 0.0;
            for constraint in constraints.values() {
                let Some((joint_a, joint_b)) =
                    joints.get2_mut(constraint.joint_a, constraint.joint_b)
                else {
                    continue;
                };
                match Self::resolve_link(joint_a, joint_b, constraint.rest_length()) {
                    LinkOutcome::Corrected(error) => {
                        metrics.corrections += 1;
                        metrics.max_error = metrics.max_error.max(error.abs());
                    }
                    LinkOutcome::Degenerate => metrics.degenerate_skips += 1,
                    LinkOutcome::Grounded => {}
                }
            }
            metrics.iterations += 1;
        }

        metrics
    }

    fn resolve_link(joint_a: &mut Joint, joint_b: &mut Joint, rest: f64) -> LinkOutcome {
        let d: DVec2 = joint_b.position - joint_a.position;
        let len = d.length();
        if len == 0.0 {
            return LinkOutcome::Degenerate;
        }
        let delta = (len - rest) / len;

        match (joint_a.locked, joint_b.locked) {
            (true, true) => return LinkOutcome::Grounded,
            (true, false) => joint_b.position -= d * delta,
            (false, true) => joint_a.position += d * delta,
            (false, false) => {
                let half = d * (0.5 * delta);
                joint_a.position += half;
                joint_b.position -= half;
            }
        }

        LinkOutcome::Corrected(len - rest)
    }
}

enum LinkOutcome {
    Corrected(f64),
    Degenerate,
    Grounded,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pair(a: DVec2, b: DVec2, rest: f64) -> (Arena<JointId, Joint>, Arena<ConstraintId, Constraint>) {
        let mut joints = Arena::new();
        let ja = joints.insert(Joint::new(a));
        let jb = joints.insert(Joint::new(b));
        let mut links = Arena::new();
        links.insert(Constraint::new(ja, jb, rest));
        (joints, links)
    }

    #[test]
    fn free_pair_splits_the_correction() {
        let (mut joints, links) = pair(DVec2::ZERO, DVec2::new(4.0, 0.0), 2.0);
        ConstraintSolver::relax(&mut joints, &links, 1);
        assert_relative_eq!(joints.get(JointId(0)).unwrap().position.x, 1.0);
        assert_relative_eq!(joints.get(JointId(1)).unwrap().position.x, 3.0);
    }

    #[test]
    fn coincident_joints_are_skipped() {
        let (mut joints, links) = pair(DVec2::ONE, DVec2::ONE, 2.0);
        let metrics = ConstraintSolver::relax(&mut joints, &links, 3);
        assert_eq!(metrics.degenerate_skips, 3);
        assert_eq!(joints.get(JointId(0)).unwrap().position, DVec2::ONE);
    }
}
