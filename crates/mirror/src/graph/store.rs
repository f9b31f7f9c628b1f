//! Mutable node list and link list.
//!
//! Invariants:
//! - Every link endpoint indexes into `nodes`; no link joins a node to itself.
//! - `nodes` only grows. Links are removed by value, never by position.

use crate::error::GraphError;
use crate::vec2::{Segment, V2};

use super::types::{Link, NodeId, Point};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<Point>,
    links: Vec<Link>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw lists, rejecting links that break the endpoint invariant.
    pub fn from_parts(nodes: Vec<Point>, links: Vec<Link>) -> Result<Self, GraphError> {
        let g = Self { nodes, links };
        g.validate()?;
        Ok(g)
    }

    /// Build from lists known to satisfy the endpoint invariant.
    pub(crate) fn from_trusted(nodes: Vec<Point>, links: Vec<Link>) -> Self {
        let g = Self { nodes, links };
        debug_assert!(g.validate().is_ok());
        g
    }

    #[inline]
    pub fn nodes(&self) -> &[Point] {
        &self.nodes
    }
    #[inline]
    pub fn links(&self) -> &[Link] {
        &self.links
    }
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    #[inline]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Point> {
        self.nodes.get(id.0)
    }
    #[inline]
    pub fn contains_link(&self, link: &Link) -> bool {
        self.links.contains(link)
    }

    /// Append a node and return its stable id.
    pub fn add_node(&mut self, p: Point) -> NodeId {
        self.nodes.push(p);
        NodeId(self.nodes.len() - 1)
    }

    pub fn add_link(&mut self, a: NodeId, b: NodeId) -> Result<Link, GraphError> {
        let link = Link::new(a, b);
        self.check_link(&link)?;
        self.links.push(link);
        Ok(link)
    }

    /// Drop every occurrence of `link`. Returns whether anything was removed;
    /// removing an absent link is a no-op.
    pub fn remove_link(&mut self, link: &Link) -> bool {
        let before = self.links.len();
        self.links.retain(|l| l != link);
        self.links.len() != before
    }

    /// Nodes joined to `n` by a link, in link order (repeats if links repeat).
    pub fn neighbors_of(&self, n: NodeId) -> Vec<NodeId> {
        self.links.iter().filter_map(|l| l.other(n)).collect()
    }

    /// Neighbour lists for every node, built in one pass over the links.
    pub fn adjacency(&self) -> Vec<Vec<NodeId>> {
        let mut adj = vec![Vec::new(); self.nodes.len()];
        for l in &self.links {
            adj[l.0 .0].push(l.1);
            adj[l.1 .0].push(l.0);
        }
        adj
    }

    /// The link as a segment between its endpoint positions.
    ///
    /// Panics if an endpoint is out of range; `Graph` never holds such links.
    pub fn segment(&self, link: &Link) -> Segment {
        Segment::new(self.nodes[link.0 .0].pos(), self.nodes[link.1 .0].pos())
    }

    /// Remove `link` and reconnect both of its endpoints through a new free
    /// node at `at`. Returns the new node, or `None` if `link` is absent.
    ///
    /// Every stored copy of `link` is removed and exactly two links are added,
    /// so a doubled link becomes a single path through the new node.
    pub fn split_link(&mut self, link: &Link, at: V2) -> Option<NodeId> {
        if !self.remove_link(link) {
            return None;
        }
        let mid = self.add_node(Point::at(at, false));
        self.links.push(Link::new(link.0, mid));
        self.links.push(Link::new(link.1, mid));
        Some(mid)
    }

    /// Append a link between two nodes the caller has just created or looked up.
    pub(crate) fn connect(&mut self, a: NodeId, b: NodeId) -> Link {
        let link = Link::new(a, b);
        debug_assert!(self.check_link(&link).is_ok());
        self.links.push(link);
        link
    }

    /// Move a free node. Fixed nodes are left untouched; returns whether the
    /// node moved.
    pub(crate) fn set_position(&mut self, n: NodeId, pos: V2) -> bool {
        match self.nodes.get_mut(n.0) {
            Some(p) if !p.fixed => {
                p.x = pos.x;
                p.y = pos.y;
                true
            }
            _ => false,
        }
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        self.links.iter().try_for_each(|l| self.check_link(l))
    }

    fn check_link(&self, link: &Link) -> Result<(), GraphError> {
        let len = self.nodes.len();
        for node in [link.0, link.1] {
            if node.0 >= len {
                return Err(GraphError::UnknownNode { node, len });
            }
        }
        if link.0 == link.1 {
            return Err(GraphError::SelfLink { node: link.0 });
        }
        Ok(())
    }
}
