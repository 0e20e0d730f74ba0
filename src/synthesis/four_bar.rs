//! Closed-form placement of a crank-rocker four-bar from four link lengths.
//!
//! Joint naming follows the loop A → B → C → D → A:
//! `A` and `D` are the ground pivots, `AB` is the crank, `BC` the coupler
//! and `CD` the rocker.

use glam::DVec2;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    config::{
        DEFAULT_GRASHOF_ATTEMPTS, DEFAULT_GRASHOF_NUDGE, DEFAULT_MOTOR_SPEED_DEG, GRASHOF_EPSILON,
    },
    core::{
        constraints::Constraint,
        joint::{Joint, Motor, MotorAnchor},
    },
    dynamics::solver::ConstraintSolver,
    error::{LinkageError, Result},
    utils::{
        arena::{Arena, ConstraintId, JointId},
        math::{angle_from, circle_intersection},
    },
};

/// Target link lengths, in loop order ground → crank → coupler → rocker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourBarLengths {
    pub ground: f64,
    pub crank: f64,
    pub coupler: f64,
    pub rocker: f64,
}

impl FourBarLengths {
    pub fn new(ground: f64, crank: f64, coupler: f64, rocker: f64) -> Self {
        Self {
            ground,
            crank,
            coupler,
            rocker,
        }
    }

    /// Lengths in ascending order.
    pub fn sorted(&self) -> [f64; 4] {
        let mut lengths = [self.ground, self.crank, self.coupler, self.rocker];
        lengths.sort_by(f64::total_cmp);
        lengths
    }

    /// Shortest plus longest does not exceed the sum of the other two.
    pub fn is_grashof(&self) -> bool {
        let [s, p, q, l] = self.sorted();
        s + l <= p + q + GRASHOF_EPSILON
    }

    /// Rest lengths of the links A-B, B-C, C-D, D-A.
    fn loop_order(&self) -> [f64; 4] {
        [self.crank, self.coupler, self.rocker, self.ground]
    }
}

/// Outcome of the Grashof nudging loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrashofReport {
    pub satisfied: bool,
    /// Nudges applied before the loop stopped.
    pub attempts: u32,
}

/// Caller choices for a synthesis run.
#[derive(Debug, Clone, Copy)]
pub struct FourBarOptions {
    pub enforce_grashof: bool,
    pub crank_speed_deg: f64,
    /// Position of ground pivot A.
    pub origin: DVec2,
}

impl Default for FourBarOptions {
    fn default() -> Self {
        Self {
            enforce_grashof: true,
            crank_speed_deg: DEFAULT_MOTOR_SPEED_DEG,
            origin: DVec2::ZERO,
        }
    }
}

/// Positions of the four joints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourBarPose {
    pub a: DVec2,
    pub b: DVec2,
    pub c: DVec2,
    pub d: DVec2,
}

/// Ids of a four-bar laid out in the model.
#[derive(Debug, Clone, PartialEq)]
pub struct FourBar {
    /// A, B, C, D.
    pub joints: [JointId; 4],
    /// A-B, B-C, C-D, D-A.
    pub constraints: [ConstraintId; 4],
    /// Lengths actually used, after any Grashof nudging.
    pub lengths: FourBarLengths,
    pub grashof: GrashofReport,
}

impl FourBar {
    /// Recognises a four-bar in the first four joints and links of a model.
    pub fn recognize(
        joints: &Arena<JointId, Joint>,
        constraints: &Arena<ConstraintId, Constraint>,
    ) -> Option<Self> {
        if joints.len() < 4 || constraints.len() < 4 {
            return None;
        }
        let ids = [JointId(0), JointId(1), JointId(2), JointId(3)];
        let links = [ConstraintId(0), ConstraintId(1), ConstraintId(2), ConstraintId(3)];
        let mut rest = [0.0; 4];
        for (i, link) in links.iter().enumerate() {
            let constraint = constraints.get(*link)?;
            if !constraint.connects(ids[i], ids[(i + 1) % 4]) {
                return None;
            }
            rest[i] = constraint.rest_length();
        }
        let lengths = FourBarLengths::new(rest[3], rest[0], rest[1], rest[2]);
        Some(Self {
            joints: ids,
            constraints: links,
            lengths,
            grashof: GrashofReport {
                satisfied: lengths.is_grashof(),
                attempts: 0,
            },
        })
    }

    /// Whether the recorded ids still describe the A-B-C-D loop.
    pub fn is_intact(
        &self,
        joints: &Arena<JointId, Joint>,
        constraints: &Arena<ConstraintId, Constraint>,
    ) -> bool {
        self.joints.iter().all(|id| joints.contains(*id))
            && self.constraints.iter().enumerate().all(|(i, id)| {
                constraints
                    .get(*id)
                    .map(|c| c.connects(self.joints[i], self.joints[(i + 1) % 4]))
                    .unwrap_or(false)
            })
    }
}

#[derive(Debug, Clone)]
pub struct FourBarSynthesizer {
    pub max_attempts: u32,
    pub nudge: f64,
}

impl Default for FourBarSynthesizer {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_GRASHOF_ATTEMPTS,
            nudge: DEFAULT_GRASHOF_NUDGE,
        }
    }
}

impl FourBarSynthesizer {
    pub fn new(max_attempts: u32, nudge: f64) -> Self {
        Self {
            max_attempts,
            nudge,
        }
    }

    /// Shrinks the crank and grows the ground until Grashof holds or the
    /// attempt budget runs out. Giving up is not an error.
    pub fn nudge_to_grashof(&self, lengths: FourBarLengths) -> (FourBarLengths, GrashofReport) {
        let mut nudged = lengths;
        let mut attempts = 0;
        while !nudged.is_grashof() && attempts < self.max_attempts {
            nudged.crank *= 1.0 - self.nudge;
            nudged.ground *= 1.0 + self.nudge;
            attempts += 1;
        }

        let satisfied = nudged.is_grashof();
        if !satisfied {
            warn!("four-bar still violates Grashof after {attempts} nudges: {nudged:?}");
        }
        (nudged, GrashofReport { satisfied, attempts })
    }

    /// Lays out the loop with ground and crank along +X from `a`, elbow-up.
    pub fn pose(a: DVec2, lengths: &FourBarLengths) -> FourBarPose {
        Self::pose_along(a, DVec2::X, lengths)
    }

    /// Same as [`Self::pose`] with the ground link along the unit `axis`.
    pub fn pose_along(a: DVec2, axis: DVec2, lengths: &FourBarLengths) -> FourBarPose {
        let d = a + axis * lengths.ground;
        let b = a + axis * lengths.crank;
        let c = circle_intersection(b, lengths.coupler, d, lengths.rocker);
        FourBarPose { a, b, c, d }
    }

    /// Appends the four joints and links of a new mechanism to the model.
    pub fn build(
        &self,
        joints: &mut Arena<JointId, Joint>,
        constraints: &mut Arena<ConstraintId, Constraint>,
        lengths: FourBarLengths,
        options: FourBarOptions,
    ) -> FourBar {
        let (lengths, grashof) = if options.enforce_grashof {
            self.nudge_to_grashof(lengths)
        } else {
            (
                lengths,
                GrashofReport {
                    satisfied: lengths.is_grashof(),
                    attempts: 0,
                },
            )
        };

        let pose = Self::pose(options.origin, &lengths);
        let a = joints.insert(Joint::grounded(pose.a));
        let b = joints.insert(Joint::new(pose.b));
        let c = joints.insert(Joint::new(pose.c));
        let d = joints.insert(Joint::grounded(pose.d));
        let ids = [a, b, c, d];

        let rest = lengths.loop_order();
        let links = [0, 1, 2, 3]
            .map(|i| constraints.insert(Constraint::new(ids[i], ids[(i + 1) % 4], rest[i])));

        if let Some(crank) = joints.get_mut(b) {
            let mut motor = Motor::new(options.crank_speed_deg);
            motor.anchor = MotorAnchor::Joint(a);
            motor.angle = angle_from(pose.a, pose.b);
            crank.motor = Some(motor);
        }

        debug!(
            "four-bar synthesized: {lengths:?}, grashof {} after {} nudges",
            grashof.satisfied, grashof.attempts
        );

        FourBar {
            joints: ids,
            constraints: links,
            lengths,
            grashof,
        }
    }

    /// Re-lays an existing four-bar for new lengths from the live ground
    /// pivots, then settles the linkage.
    ///
    /// Pivot A stays put and D slides along the current A→D axis to the new
    /// ground length. The crank restarts along that axis and its motor angle
    /// is re-seeded to match.
    pub fn update(
        &self,
        joints: &mut Arena<JointId, Joint>,
        constraints: &mut Arena<ConstraintId, Constraint>,
        four_bar: &mut FourBar,
        lengths: FourBarLengths,
        crank_speed_deg: Option<f64>,
        settle_iterations: u32,
    ) -> Result<()> {
        if !four_bar.is_intact(joints, constraints) {
            return Err(LinkageError::NotAFourBar);
        }
        let [a, b, c, d] = four_bar.joints;
        let origin = joints.get(a).ok_or(LinkageError::UnknownJoint(a))?.position;
        let far = joints.get(d).ok_or(LinkageError::UnknownJoint(d))?.position;
        let axis = (far - origin).try_normalize().unwrap_or(DVec2::X);
        let pose = Self::pose_along(origin, axis, &lengths);

        for (id, position) in [(b, pose.b), (c, pose.c), (d, pose.d)] {
            if let Some(joint) = joints.get_mut(id) {
                joint.position = position;
            }
        }
        if let Some(motor) = joints.get_mut(b).and_then(|joint| joint.motor.as_mut()) {
            if motor.anchor == MotorAnchor::Joint(a) {
                motor.angle = angle_from(pose.a, pose.b);
            }
        }
        for (id, rest) in four_bar.constraints.iter().zip(lengths.loop_order()) {
            if let Some(constraint) = constraints.get_mut(*id) {
                constraint.set_rest_length(rest);
            }
        }
        if let Some(speed) = crank_speed_deg {
            for (_, joint) in joints.iter_mut() {
                if let Some(motor) = joint.motor.as_mut() {
                    motor.set_speed_deg(speed);
                }
            }
        }

        ConstraintSolver::relax(joints, constraints, settle_iterations);

        four_bar.lengths = lengths;
        four_bar.grashof = GrashofReport {
            satisfied: lengths.is_grashof(),
            attempts: 0,
        };
        debug!("four-bar updated: {lengths:?}");
        Ok(())
    }
}
