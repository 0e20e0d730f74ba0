//! Error types for the linkage engine.
//!
//! Only configuration mistakes are reported here. Numeric degeneracies
//! (zero-length links, unreachable targets, circles that miss) are handled
//! by fallback policies inside the solvers and never surface as errors.

use std::fmt;

use crate::utils::arena::{ConstraintId, JointId};

/// Main error type for the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkageError {
    /// The referenced joint does not exist.
    UnknownJoint(JointId),
    /// The referenced link does not exist.
    UnknownConstraint(ConstraintId),
    /// A link was requested between a joint and itself.
    SelfLink(JointId),
    /// A link between this unordered pair already exists.
    DuplicateLink(JointId, JointId),
    /// The two joints are not connected through any chain of links.
    NoPath(JointId, JointId),
    /// An IK chain needs at least two joints.
    ChainTooShort(usize),
    /// IK was started without a chain.
    IkChainNotSet,
    /// IK was asked to run without a target.
    IkTargetNotSet,
    /// The model does not hold a synthesized four-bar.
    NotAFourBar,
    /// A persisted model could not be rehydrated.
    InvalidSnapshot(String),
}

impl fmt::Display for LinkageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnknownJoint(id) => write!(f, "Unknown joint: {id}"),
            Self::UnknownConstraint(id) => write!(f, "Unknown link: {id}"),
            Self::SelfLink(id) => write!(f, "Cannot link {id} to itself"),
            Self::DuplicateLink(a, b) => write!(f, "Link between {a} and {b} already exists"),
            Self::NoPath(a, b) => write!(f, "No chain of links connects {a} and {b}"),
            Self::ChainTooShort(len) => {
                write!(f, "IK chain needs at least two joints, got {len}")
            }
            Self::IkChainNotSet => write!(f, "No IK chain has been set"),
            Self::IkTargetNotSet => write!(f, "No IK target has been placed"),
            Self::NotAFourBar => write!(f, "Model is not a synthesized four-bar"),
            Self::InvalidSnapshot(msg) => write!(f, "Invalid snapshot: {msg}"),
        }
    }
}

impl std::error::Error for LinkageError {}

/// Convenient Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, LinkageError>;
