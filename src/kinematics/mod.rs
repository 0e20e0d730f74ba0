//! Chain discovery over the link graph and FABRIK inverse kinematics.

pub mod chain;
pub mod ik;

pub use chain::{find_chain, ChainPathFinder, KinematicChain};
pub use ik::{FabrikConfig, FabrikSolver, IkReport};
