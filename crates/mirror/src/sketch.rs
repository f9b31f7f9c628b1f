//! Frame-step core that an animation driver calls once per tick.
//!
//! Purpose
//! - Own the graph, the RNG and the tuning constants of one run.
//! - Turn input events into queued `Command`s; `step` drains the queue before
//!   growing and relaxing, so the graph has a single writer.
//!
//! The driver keeps the canvas, the event loop and the pixel size. It maps
//! pointer positions with `Viewport` and renders `graph()` after each step.
//!
//! Code cross-refs: `grow::grow_step`, `relax::relax_step`, `snapshot::Snapshot`

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::graph::{Graph, NodeId, Point, Seed};
use crate::grow::{adjacent_hits, find_hits, grow_step, GrowCfg, Growth, Hit};
use crate::random::seeded;
use crate::relax::{relax_step, RelaxCfg, RelaxStats};
use crate::snapshot::Snapshot;
use crate::vec2::{Rect2, Segment, V2};

/// Logical square `[-half_extent, half_extent]²` the graph lives in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub half_extent: f64,
}

impl Default for Domain {
    fn default() -> Self {
        Self { half_extent: 2.0 }
    }
}

impl Domain {
    pub fn rect(&self) -> Rect2 {
        Rect2::centered_square(self.half_extent)
    }
}

/// Pixel surface of the driver; maps between pixels and the domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub domain: Domain,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            domain: Domain::default(),
        }
    }

    pub fn to_screen(&self, p: V2) -> V2 {
        let h = self.domain.half_extent;
        V2::new(
            map_range(p.x, -h, h, 0.0, self.width),
            map_range(p.y, -h, h, 0.0, self.height),
        )
    }

    pub fn to_domain(&self, x: f64, y: f64) -> V2 {
        let h = self.domain.half_extent;
        V2::new(
            map_range(x, 0.0, self.width, -h, h),
            map_range(y, 0.0, self.height, -h, h),
        )
    }
}

/// Linear map from `[in_min, in_max]` onto `[out_min, out_max]`, clamped.
fn map_range(v: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    if (in_max - in_min).abs() < f64::EPSILON {
        return out_min;
    }
    let t = ((v - in_min) / (in_max - in_min)).clamp(0.0, 1.0);
    out_min + t * (out_max - out_min)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SketchCfg {
    /// Upper bound on the node count; growth and pointer nodes stop there.
    pub max_nodes: usize,
    /// Grow on frames where `frame % grow_every == 0`.
    pub grow_every: u64,
    pub relax: RelaxCfg,
    pub grow: GrowCfg,
    pub domain: Domain,
}

impl Default for SketchCfg {
    fn default() -> Self {
        Self {
            max_nodes: 1000,
            // 30 fps, eight growth attempts per second.
            grow_every: 3,
            relax: RelaxCfg::default(),
            grow: GrowCfg::default(),
            domain: Domain::default(),
        }
    }
}

impl SketchCfg {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grow_every == 0 {
            return Err(ConfigError::invalid("grow_every must be >= 1"));
        }
        if self.max_nodes == 0 {
            return Err(ConfigError::invalid("max_nodes must be >= 1"));
        }
        let h = self.domain.half_extent;
        if !(h.is_finite() && h > 0.0) {
            return Err(ConfigError::invalid("domain half extent must be finite and > 0"));
        }
        self.relax.validate()
    }
}

/// What pointer input does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Pointer adds a fixed node linked to the previous pointer node.
    #[default]
    Draw,
    /// Pointer places the endpoints of a probe line.
    Probe,
}

impl Mode {
    pub fn next(self) -> Self {
        match self {
            Mode::Draw => Mode::Probe,
            Mode::Probe => Mode::Draw,
        }
    }
}

/// Input intent, applied at the start of the next `step`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Pointer released at a domain position. Positions outside the domain
    /// square are dropped.
    AddNodeAt(V2),
    AdvanceMode,
    TogglePause,
    /// Emit a snapshot in the next frame report.
    Dump,
}

impl Command {
    /// Keyboard bindings: Enter cycles the mode, space dumps, `p` pauses.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Command::AdvanceMode),
            " " => Some(Command::Dump),
            "p" | "P" => Some(Command::TogglePause),
            _ => None,
        }
    }
}

/// Result of one `step`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// `None` when no growth was attempted this frame.
    pub growth: Option<Growth>,
    /// `None` while paused.
    pub relax: Option<RelaxStats>,
    pub dumps: Vec<Snapshot>,
}

/// Crossings along the user-placed probe line, without touching the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbePreview {
    pub candidate: Segment,
    pub hits: Vec<Hit>,
    pub primary: Option<Hit>,
    pub adjacent: Vec<Hit>,
}

pub struct Sketch<R = StdRng> {
    cfg: SketchCfg,
    graph: Graph,
    rng: R,
    queue: VecDeque<Command>,
    last_touched: NodeId,
    mode: Mode,
    probe: Vec<V2>,
    frame: u64,
    paused: bool,
}

impl Sketch<StdRng> {
    /// Run built from a seed layout and a replayable RNG seed.
    pub fn seeded(cfg: SketchCfg, layout: Seed, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = seeded(seed);
        let graph = layout.build(&mut rng);
        let mut sketch = Self::new(cfg, graph, rng)?;
        if let Some(line) = layout.probe_line() {
            sketch.probe = vec![line.start, line.end];
        }
        Ok(sketch)
    }
}

impl<R: Rng> Sketch<R> {
    pub fn new(cfg: SketchCfg, graph: Graph, rng: R) -> Result<Self, ConfigError> {
        cfg.validate()?;
        if graph.node_count() > cfg.max_nodes {
            return Err(ConfigError::invalid(format!(
                "seed has {} nodes, above max_nodes {}",
                graph.node_count(),
                cfg.max_nodes
            )));
        }
        Ok(Self {
            cfg,
            graph,
            rng,
            queue: VecDeque::new(),
            last_touched: NodeId(0),
            mode: Mode::default(),
            probe: Vec::new(),
            frame: 0,
            paused: false,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
    pub fn cfg(&self) -> &SketchCfg {
        &self.cfg
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn frame(&self) -> u64 {
        self.frame
    }
    pub fn is_paused(&self) -> bool {
        self.paused
    }
    pub fn probe_line(&self) -> &[V2] {
        &self.probe
    }
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn enqueue(&mut self, cmd: Command) {
        self.queue.push_back(cmd);
    }

    /// Queue a pointer release given in pixels.
    pub fn pointer_released(&mut self, view: &Viewport, x: f64, y: f64) {
        self.enqueue(Command::AddNodeAt(view.to_domain(x, y)));
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.graph).with_candidate_line(&self.probe)
    }

    /// Drain input, grow on cadence, relax. Paused runs only drain input.
    pub fn step(&mut self) -> FrameReport {
        let mut dumps = Vec::new();
        while let Some(cmd) = self.queue.pop_front() {
            self.apply(cmd, &mut dumps);
        }
        let frame = self.frame;
        if self.paused {
            return FrameReport {
                frame,
                growth: None,
                relax: None,
                dumps,
            };
        }
        let growth = (frame % self.cfg.grow_every == 0
            && self.graph.node_count() + 2 <= self.cfg.max_nodes)
            .then(|| grow_step(&mut self.graph, &mut self.rng, &self.cfg.grow));
        let relax = relax_step(&mut self.graph, &self.cfg.relax);
        self.frame += 1;
        FrameReport {
            frame,
            growth,
            relax: Some(relax),
            dumps,
        }
    }

    /// Hits along the probe line with a randomly picked primary and its
    /// adjacent hits. `None` until two probe points are placed.
    pub fn probe_preview(&mut self) -> Option<ProbePreview> {
        let &[a, b] = self.probe.as_slice() else {
            return None;
        };
        let candidate = Segment::new(a, b);
        let hits = find_hits(&self.graph, &candidate);
        let primary = hits.choose(&mut self.rng).copied();
        let adjacent = primary
            .map(|p| {
                adjacent_hits(&hits, &p.link, self.cfg.grow.adjacency)
                    .into_iter()
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        Some(ProbePreview {
            candidate,
            hits,
            primary,
            adjacent,
        })
    }

    fn apply(&mut self, cmd: Command, dumps: &mut Vec<Snapshot>) {
        match cmd {
            Command::AddNodeAt(pos) if !self.cfg.domain.rect().contains(pos) => {
                warn!(x = pos.x, y = pos.y, "pointer outside domain, ignored");
            }
            Command::AddNodeAt(pos) => match self.mode {
                Mode::Draw => self.add_pointer_node(pos),
                Mode::Probe => {
                    self.probe.push(pos);
                    if self.probe.len() > 2 {
                        self.probe.remove(0);
                    }
                }
            },
            Command::AdvanceMode => {
                self.mode = self.mode.next();
                debug!(mode = ?self.mode, "mode");
            }
            Command::TogglePause => self.paused = !self.paused,
            Command::Dump => dumps.push(self.snapshot()),
        }
    }

    fn add_pointer_node(&mut self, pos: V2) {
        if self.graph.node_count() >= self.cfg.max_nodes {
            warn!(max_nodes = self.cfg.max_nodes, "node cap reached, pointer ignored");
            return;
        }
        let prev = self.last_touched;
        let had_prev = self.graph.node(prev).is_some();
        let node = self.graph.add_node(Point::at(pos, true));
        if had_prev {
            self.graph.connect(prev, node);
        }
        self.last_touched = node;
        debug!(node = node.0, from = prev.0, linked = had_prev, "pointer node");
    }
}
