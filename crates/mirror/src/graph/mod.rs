//! Graph store: stable-index nodes, undirected links, and seed layouts.
//!
//! Purpose
//! - Own the only mutable state of a run. Growth adds nodes and swaps links,
//!   relaxation moves free nodes, the frame driver appends pointer nodes.
//!
//! Code cross-refs: `grow::grow_along`, `relax::relax_step`, `snapshot::Snapshot`

mod seed;
mod store;
mod types;

pub use seed::{diamond, initialize, outline, Seed, CORNER};
pub use store::Graph;
pub use types::{Link, NodeId, Point};
