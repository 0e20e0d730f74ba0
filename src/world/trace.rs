use std::collections::VecDeque;

use glam::DVec2;

use crate::{
    config::{DEFAULT_TRACE_CAPACITY, DEFAULT_TRACE_FRACTION},
    core::{constraints::Constraint, joint::Joint},
    utils::{
        arena::{Arena, ConstraintId, JointId},
        math::lerp_clamped,
    },
};

/// Bounded history of a point riding on one link, sampled once per frame.
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    pub enabled: bool,
    constraint: ConstraintId,
    fraction: f64,
    capacity: usize,
    samples: VecDeque<DVec2>,
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new(ConstraintId(0), DEFAULT_TRACE_FRACTION, DEFAULT_TRACE_CAPACITY)
    }
}

impl TraceRecorder {
    pub fn new(constraint: ConstraintId, fraction: f64, capacity: usize) -> Self {
        Self {
            enabled: true,
            constraint,
            fraction: fraction.clamp(0.0, 1.0),
            capacity,
            samples: VecDeque::with_capacity(capacity.min(DEFAULT_TRACE_CAPACITY)),
        }
    }

    pub fn constraint(&self) -> ConstraintId {
        self.constraint
    }

    pub fn set_constraint(&mut self, constraint: ConstraintId) {
        self.constraint = constraint;
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn set_fraction(&mut self, fraction: f64) {
        self.fraction = fraction.clamp(0.0, 1.0);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Point at the configured fraction along the traced link, if it exists.
    pub fn point_on_link(
        &self,
        joints: &Arena<JointId, Joint>,
        constraints: &Arena<ConstraintId, Constraint>,
    ) -> Option<DVec2> {
        let constraint = constraints.get(self.constraint)?;
        let a = joints.get(constraint.joint_a)?;
        let b = joints.get(constraint.joint_b)?;
        Some(lerp_clamped(a.position, b.position, self.fraction))
    }

    /// Appends the current point, dropping the oldest sample past capacity.
    pub fn sample(
        &mut self,
        joints: &Arena<JointId, Joint>,
        constraints: &Arena<ConstraintId, Constraint>,
    ) -> Option<DVec2> {
        if !self.enabled {
            return None;
        }
        let point = self.point_on_link(joints, constraints)?;
        self.samples.push_back(point);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        Some(point)
    }

    pub fn samples(&self) -> &VecDeque<DVec2> {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
