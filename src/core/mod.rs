//! Core data of a linkage: joints, rigid links and their persisted shape.

pub mod constraints;
pub mod joint;
pub mod snapshot;

pub use constraints::Constraint;
pub use joint::{Joint, Motor, MotorAnchor};
pub use snapshot::{ConstraintRecord, JointRecord, LinkageSnapshot};
