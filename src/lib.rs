//! Linkage Engine – planar linkage kinematics for Rust.
//!
//! The crate models a mechanism as pin joints joined by rigid links and
//! steps it frame by frame: motors orbit their anchors, a position-based
//! solver restores link lengths, FABRIK pulls a chain toward a target and a
//! trace records a point riding on one link. A closed-form synthesizer lays
//! out crank-rocker four-bars from four link lengths.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod kinematics;
pub mod synthesis;
pub mod utils;
pub mod world;

pub use glam::DVec2;

pub use config::SimulationConfig;
pub use core::{
    constraints::Constraint,
    joint::{Joint, Motor, MotorAnchor},
    snapshot::{ConstraintRecord, JointRecord, LinkageSnapshot},
};
pub use dynamics::{
    motor::MotorDriver,
    solver::{ConstraintSolver, SolverStepMetrics},
};
pub use error::{LinkageError, Result};
pub use kinematics::{
    chain::{find_chain, KinematicChain},
    ik::{FabrikConfig, FabrikSolver, IkReport},
};
pub use synthesis::four_bar::{
    FourBar, FourBarLengths, FourBarOptions, FourBarSynthesizer, GrashofReport,
};
pub use utils::arena::{Arena, ConstraintId, JointId};
pub use world::{FrameClock, LinkageWorld, TraceRecorder};
