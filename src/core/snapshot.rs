//! Persisted shape of a linkage.
//!
//! Writing and reading files is left to the caller; this is only the record
//! layout the engine can be rebuilt from.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{
    constraints::Constraint,
    joint::{Joint, Motor, MotorAnchor},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointRecord {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub is_motor: bool,
    #[serde(default)]
    pub motor_rps: f64,
    #[serde(default)]
    pub motor_anchor: Option<usize>,
}

impl JointRecord {
    pub fn from_joint(joint: &Joint) -> Self {
        let (is_motor, motor_rps, motor_anchor) = match joint.motor {
            Some(motor) => (true, motor.revolutions_per_second, motor.anchor.to_index()),
            None => (false, 0.0, None),
        };
        Self {
            x: joint.position.x,
            y: joint.position.y,
            locked: joint.locked,
            is_motor,
            motor_rps,
            motor_anchor,
        }
    }

    /// Rebuilds the joint. The motor angle is left at zero for the caller to
    /// derive from geometry once every joint is known.
    pub fn to_joint(&self) -> Joint {
        let motor = self.is_motor.then(|| Motor {
            angle: 0.0,
            revolutions_per_second: self.motor_rps,
            anchor: MotorAnchor::from_index(self.motor_anchor),
        });
        Joint {
            position: DVec2::new(self.x, self.y),
            locked: self.locked,
            motor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintRecord {
    pub a: usize,
    pub b: usize,
    /// Missing rest lengths are taken from the current joint distance.
    #[serde(default)]
    pub rest: Option<f64>,
}

impl ConstraintRecord {
    pub fn from_constraint(constraint: &Constraint) -> Self {
        Self {
            a: constraint.joint_a.0,
            b: constraint.joint_b.0,
            rest: Some(constraint.rest_length()),
        }
    }
}

/// Whole-model record, keyed `points` / `links` as in the save file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkageSnapshot {
    #[serde(rename = "points", alias = "joints")]
    pub joints: Vec<JointRecord>,
    #[serde(rename = "links", alias = "constraints")]
    pub constraints: Vec<ConstraintRecord>,
}
