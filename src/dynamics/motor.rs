use glam::DVec2;
use log::debug;

use crate::{
    core::joint::{Joint, MotorAnchor},
    utils::{
        arena::{Arena, JointId},
        math::{angle_from, polar},
    },
};

/// Advances every motorized joint around its anchor.
///
/// The orbit radius is re-read from the joint's current distance to the
/// anchor on every call, so corrections made by the constraint solver in
/// earlier frames carry over into the orbit. Must run before the solver in
/// a frame so the solver can absorb the link stretch the motor introduces.
#[derive(Debug, Clone, Default)]
pub struct MotorDriver;

impl MotorDriver {
    pub fn new() -> Self {
        Self
    }

    /// Returns how many motors were advanced.
    pub fn apply(&self, joints: &mut Arena<JointId, Joint>, dt: f64) -> usize {
        let mut driven = 0;
        for index in 0..joints.len() {
            let id = JointId(index);
            let Some(motor) = joints.get(id).and_then(|joint| joint.motor) else {
                continue;
            };
            let anchor = resolve_anchor(joints, id, motor.anchor);

            let Some(joint) = joints.get_mut(id) else {
                continue;
            };
            let mut radius = joint.position.distance(anchor);
            if radius == 0.0 {
                radius = 1.0;
            }
            let angle = motor.angle + motor.angular_velocity() * dt;
            joint.position = polar(anchor, radius, angle);
            if let Some(motor) = joint.motor.as_mut() {
                motor.angle = angle;
            }
            driven += 1;
        }
        driven
    }
}

/// Live position of a motor anchor; unresolved joint anchors fall back to the origin.
pub fn resolve_anchor(joints: &Arena<JointId, Joint>, motor: JointId, anchor: MotorAnchor) -> DVec2 {
    match anchor {
        MotorAnchor::World => DVec2::ZERO,
        MotorAnchor::Joint(id) => match joints.get(id) {
            Some(joint) => joint.position,
            None => {
                debug!("{motor} has dangling motor anchor {id}, using world origin");
                DVec2::ZERO
            }
        },
    }
}

/// Angle of the joint as seen from its anchor, for seeding a motor.
pub fn angle_about_anchor(joints: &Arena<JointId, Joint>, motor: JointId, anchor: MotorAnchor) -> f64 {
    let center = resolve_anchor(joints, motor, anchor);
    joints
        .get(motor)
        .map(|joint| angle_from(center, joint.position))
        .unwrap_or(0.0)
}
