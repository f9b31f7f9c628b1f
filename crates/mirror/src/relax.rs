//! Relaxation pass over free nodes.
//!
//! Model
//! - For each free node, take the neighbours farther away than
//!   `threshold`, sum the unit vectors toward them, and move the node by
//!   `scale` times that sum. Near neighbours exert nothing, so a node stops
//!   once every link is short or the pulls cancel.
//! - Offsets are computed from the positions at the start of the pass and
//!   written afterwards, so node order does not matter.
//!
//! Code cross-refs: `vec2::{normalize, vector_to}`, `Graph::set_position`

use crate::error::ConfigError;
use crate::graph::{Graph, NodeId};
use crate::vec2::{normalize, vector_to, V2};

/// Direction of the per-neighbour unit vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pull {
    /// Toward each far neighbour. Settles as links shorten below the threshold.
    #[default]
    TowardNeighbors,
    /// Away from each far neighbour. Spreads the layout; does not settle on
    /// its own.
    AwayFromNeighbors,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelaxCfg {
    /// Neighbours at or within this distance are ignored. Must be > 0, which
    /// also keeps coincident neighbours out of `normalize`.
    pub threshold: f64,
    /// Step length per unit of summed direction.
    pub scale: f64,
    pub pull: Pull,
}

impl Default for RelaxCfg {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            scale: 0.001,
            pull: Pull::TowardNeighbors,
        }
    }
}

impl RelaxCfg {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(ConfigError::invalid("relax threshold must be finite and > 0"));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::invalid("relax scale must be finite and > 0"));
        }
        Ok(())
    }
}

/// Summary of one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RelaxStats {
    /// Nodes that actually changed position.
    pub moved: usize,
    pub max_shift: f64,
    pub total_shift: f64,
}

/// Neighbours of `node` farther away than `threshold`.
pub fn far_neighbors(graph: &Graph, node: NodeId, threshold: f64) -> Vec<NodeId> {
    let Some(p) = graph.node(node) else {
        return Vec::new();
    };
    let pos = p.pos();
    graph
        .neighbors_of(node)
        .into_iter()
        .filter(|n| {
            graph
                .node(*n)
                .is_some_and(|q| (q.pos() - pos).norm() > threshold)
        })
        .collect()
}

/// Unscaled displacement for `node`: zero for fixed or isolated nodes.
pub fn relax_offset(graph: &Graph, node: NodeId, cfg: &RelaxCfg) -> V2 {
    match graph.node(node) {
        Some(p) if !p.fixed => offset_from(graph, p.pos(), &graph.neighbors_of(node), cfg),
        _ => V2::zeros(),
    }
}

fn offset_from(graph: &Graph, pos: V2, neighbors: &[NodeId], cfg: &RelaxCfg) -> V2 {
    neighbors
        .iter()
        .filter_map(|n| graph.node(*n))
        .map(|q| q.pos())
        .filter(|q| (q - pos).norm() > cfg.threshold)
        .filter_map(|q| match cfg.pull {
            Pull::TowardNeighbors => normalize(vector_to(q, pos)),
            Pull::AwayFromNeighbors => normalize(vector_to(pos, q)),
        })
        .fold(V2::zeros(), |acc, u| acc + u)
}

/// One relaxation pass. Fixed nodes are never written.
pub fn relax_step(graph: &mut Graph, cfg: &RelaxCfg) -> RelaxStats {
    let adjacency = graph.adjacency();
    let moves: Vec<(NodeId, V2)> = graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.fixed)
        .filter_map(|(i, p)| {
            let off = offset_from(graph, p.pos(), &adjacency[i], cfg);
            if off == V2::zeros() {
                return None;
            }
            Some((NodeId(i), p.pos() + off * cfg.scale))
        })
        .collect();

    let mut stats = RelaxStats::default();
    for (n, target) in moves {
        let Some(old) = graph.node(n).map(|p| p.pos()) else {
            continue;
        };
        if graph.set_position(n, target) {
            let shift = (target - old).norm();
            stats.moved += 1;
            stats.total_shift += shift;
            stats.max_shift = stats.max_shift.max(shift);
        }
    }
    stats
}
