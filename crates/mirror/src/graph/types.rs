//! Node and link records.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::vec2::V2;

/// Stable index into the node list. Nodes are never removed, so an id stays
/// valid for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Node position plus the anchor flag. Fixed points never move under
/// relaxation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub fixed: bool,
}

impl Point {
    #[inline]
    pub fn free(x: f64, y: f64) -> Self {
        Self { x, y, fixed: false }
    }
    #[inline]
    pub fn anchored(x: f64, y: f64) -> Self {
        Self { x, y, fixed: true }
    }
    #[inline]
    pub fn at(pos: V2, fixed: bool) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            fixed,
        }
    }
    #[inline]
    pub fn pos(&self) -> V2 {
        V2::new(self.x, self.y)
    }
}

/// Undirected edge between two nodes.
///
/// Equality and hashing ignore endpoint order: `Link(a, b) == Link(b, a)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Link(pub NodeId, pub NodeId);

impl Link {
    #[inline]
    pub fn new(a: NodeId, b: NodeId) -> Self {
        Self(a, b)
    }
    #[inline]
    pub fn touches(&self, n: NodeId) -> bool {
        self.0 == n || self.1 == n
    }
    /// The endpoint opposite `n`, if `n` is an endpoint.
    #[inline]
    pub fn other(&self, n: NodeId) -> Option<NodeId> {
        if self.0 == n {
            Some(self.1)
        } else if self.1 == n {
            Some(self.0)
        } else {
            None
        }
    }
    /// True when the two links have at least one endpoint in common.
    #[inline]
    pub fn shares_endpoint(&self, other: &Link) -> bool {
        self.touches(other.0) || self.touches(other.1)
    }
    #[inline]
    fn ordered(&self) -> (NodeId, NodeId) {
        if self.0 <= self.1 {
            (self.0, self.1)
        } else {
            (self.1, self.0)
        }
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}
