use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::utils::arena::JointId;

/// What a motorized joint orbits around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotorAnchor {
    /// The world origin `(0, 0)`.
    #[default]
    World,
    /// The live position of another joint.
    Joint(JointId),
}

impl MotorAnchor {
    pub fn from_index(index: Option<usize>) -> Self {
        match index {
            Some(index) => Self::Joint(JointId(index)),
            None => Self::World,
        }
    }

    pub fn to_index(self) -> Option<usize> {
        match self {
            Self::World => None,
            Self::Joint(id) => Some(id.0),
        }
    }
}

/// Rotary drive attached to a joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motor {
    /// Cumulative angle in radians, never wrapped.
    pub angle: f64,
    /// Signed speed in revolutions per second.
    pub revolutions_per_second: f64,
    pub anchor: MotorAnchor,
}

impl Motor {
    pub fn new(speed_deg_per_sec: f64) -> Self {
        Self {
            angle: 0.0,
            revolutions_per_second: speed_deg_per_sec / 360.0,
            anchor: MotorAnchor::World,
        }
    }

    pub fn set_speed_deg(&mut self, speed_deg_per_sec: f64) {
        self.revolutions_per_second = speed_deg_per_sec / 360.0;
    }

    /// Angular velocity in radians per second.
    pub fn angular_velocity(&self) -> f64 {
        self.revolutions_per_second * std::f64::consts::TAU
    }
}

/// A pin joint of the linkage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub position: DVec2,
    /// Ground joints are never moved by the solver, IK or drags.
    pub locked: bool,
    pub motor: Option<Motor>,
}

impl Joint {
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            locked: false,
            motor: None,
        }
    }

    pub fn grounded(position: DVec2) -> Self {
        Self {
            locked: true,
            ..Self::new(position)
        }
    }

    pub fn is_motor(&self) -> bool {
        self.motor.is_some()
    }

    /// Moves the joint unless it is locked.
    pub fn translate(&mut self, delta: DVec2) {
        if !self.locked {
            self.position += delta;
        }
    }
}
