//! Planar line-graph growth and relaxation for the "Mirror" sketches.
//!
//! A run owns one `Graph` of nodes and links. Each frame a random probe
//! segment may split links where it crosses them (`grow`), then every free
//! node is nudged toward its far neighbours (`relax`). The frame loop,
//! canvas and input wiring live outside this crate; `sketch` is the seam
//! they call into.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Every stochastic operation takes the RNG explicitly; seed a `StdRng`
//!   to replay a run.

pub mod error;
pub mod graph;
pub mod grow;
pub mod random;
pub mod relax;
pub mod sketch;
pub mod snapshot;
pub mod vec2;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{ConfigError, GraphError};
pub use vec2::V2;

/// Common exports for drivers and experiments.
pub mod prelude {
    pub use crate::error::{ConfigError, GraphError};
    pub use crate::graph::{diamond, initialize, Graph, Link, NodeId, Point, Seed};
    pub use crate::grow::{grow_along, grow_step, Adjacency, GrowCfg, Growth, Hit};
    pub use crate::relax::{relax_step, Pull, RelaxCfg, RelaxStats};
    pub use crate::sketch::{Command, Domain, FrameReport, Mode, Sketch, SketchCfg, Viewport};
    pub use crate::snapshot::Snapshot;
    pub use crate::vec2::{Rect2, Segment, V2};
}
