use serde::{Deserialize, Serialize};

use crate::utils::arena::JointId;

/// Rigid link holding two joints at a fixed distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub joint_a: JointId,
    pub joint_b: JointId,
    rest_length: f64,
}

impl Constraint {
    pub fn new(joint_a: JointId, joint_b: JointId, rest_length: f64) -> Self {
        Self {
            joint_a,
            joint_b,
            rest_length: rest_length.max(0.0),
        }
    }

    pub fn joints(&self) -> (JointId, JointId) {
        (self.joint_a, self.joint_b)
    }

    pub fn rest_length(&self) -> f64 {
        self.rest_length
    }

    /// Overwrites the target distance; negative values clamp to zero.
    pub fn set_rest_length(&mut self, rest_length: f64) {
        self.rest_length = rest_length.max(0.0);
    }

    /// Whether this link joins `a` and `b`, in either order.
    pub fn connects(&self, a: JointId, b: JointId) -> bool {
        (self.joint_a == a && self.joint_b == b) || (self.joint_a == b && self.joint_b == a)
    }

    /// The joint on the other end, if `joint` is one of the endpoints.
    pub fn other(&self, joint: JointId) -> Option<JointId> {
        if self.joint_a == joint {
            Some(self.joint_b)
        } else if self.joint_b == joint {
            Some(self.joint_a)
        } else {
            None
        }
    }
}
