//! Error types for graph construction and sketch configuration.
//!
//! Growth and relaxation have no error paths; a probe that misses is a
//! normal outcome and is reported as a value, not an error.

use std::fmt;

use crate::graph::NodeId;

/// Structural problems with a node/link set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// A link endpoint does not index into the node list.
    UnknownNode { node: NodeId, len: usize },
    /// A link from a node to itself.
    SelfLink { node: NodeId },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node, len } => {
                write!(f, "link endpoint {} out of range (graph has {len} nodes)", node.0)
            }
            Self::SelfLink { node } => write!(f, "link from node {} to itself", node.0),
        }
    }
}

impl std::error::Error for GraphError {}

/// Rejected tuning constants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { reason } => write!(f, "invalid sketch config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}
