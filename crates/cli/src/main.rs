use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use mirror::graph::{Graph, Seed};
use mirror::grow::{adjacent_hits, find_hits, Adjacency, GrowCfg, Hit};
use mirror::random::seeded;
use mirror::relax::{relax_step, Pull, RelaxCfg, RelaxStats};
use mirror::sketch::{Sketch, SketchCfg, Viewport};
use mirror::snapshot::Snapshot;
use mirror::vec2::{Segment, V2};
use rand::seq::SliceRandom;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod render;

#[derive(Parser)]
#[command(name = "mirror")]
#[command(about = "Headless driver for the line-graph growth sketch")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run the sketch for a number of frames and write the final graph
    Run(RunArgs),
    /// Relax a saved snapshot without growth
    Relax {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long, default_value_t = 1000)]
        iterations: u32,
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        relax: RelaxArgs,
    },
    /// List where a probe segment crosses a saved graph
    Probe {
        #[arg(long)]
        snapshot: PathBuf,
        /// Probe start as `x,y`; defaults to the snapshot's candidate line
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Option<V2>,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Option<V2>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        loose: bool,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args)]
struct RunArgs {
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 600)]
    frames: u64,
    #[arg(long, value_enum, default_value_t = Layout::Diamond)]
    layout: Layout,
    /// Snapshot JSON path
    #[arg(long)]
    out: PathBuf,
    /// Optional SVG rendering of the final frame
    #[arg(long)]
    svg: Option<PathBuf>,
    #[arg(long, default_value_t = 2048)]
    size: u32,
    /// Draw node dots in the SVG
    #[arg(long)]
    dots: bool,
    #[arg(long, default_value_t = 1000)]
    max_nodes: usize,
    #[arg(long, default_value_t = 3)]
    grow_every: u64,
    /// Accept loosely adjacent links when pairing hits
    #[arg(long)]
    loose: bool,
    #[arg(long, default_value_t = 100)]
    log_every: u64,
    #[command(flatten)]
    relax: RelaxArgs,
}

#[derive(Args, Clone, Copy)]
struct RelaxArgs {
    #[arg(long, default_value_t = 0.75)]
    threshold: f64,
    #[arg(long, default_value_t = 0.001)]
    scale: f64,
    #[arg(long, value_enum, default_value_t = PullArg::Toward)]
    pull: PullArg,
}

impl RelaxArgs {
    fn cfg(&self) -> RelaxCfg {
        RelaxCfg {
            threshold: self.threshold,
            scale: self.scale,
            pull: match self.pull {
                PullArg::Toward => Pull::TowardNeighbors,
                PullArg::Away => Pull::AwayFromNeighbors,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Layout {
    Diamond,
    Single,
    Outline,
}

impl From<Layout> for Seed {
    fn from(l: Layout) -> Self {
        match l {
            Layout::Diamond => Seed::Diamond,
            Layout::Single => Seed::Single,
            Layout::Outline => Seed::Outline,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PullArg {
    Toward,
    Away,
}

fn adjacency(loose: bool) -> Adjacency {
    if loose {
        Adjacency::Loose
    } else {
        Adjacency::SharedEndpoint
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run(args) => run(&args),
        Action::Relax {
            snapshot,
            iterations,
            out,
            relax: relax_args,
        } => relax(&snapshot, iterations, out.as_deref(), relax_args.cfg()),
        Action::Probe {
            snapshot,
            from,
            to,
            seed,
            loose,
        } => probe(&snapshot, from, to, seed, loose),
        Action::Report => report(),
    }
}

fn run(args: &RunArgs) -> Result<()> {
    let cfg = SketchCfg {
        max_nodes: args.max_nodes,
        grow_every: args.grow_every,
        relax: args.relax.cfg(),
        grow: GrowCfg {
            adjacency: adjacency(args.loose),
        },
        ..SketchCfg::default()
    };
    let mut sketch = Sketch::seeded(cfg, args.layout.into(), args.seed)?;
    tracing::info!(
        seed = args.seed,
        frames = args.frames,
        layout = ?args.layout,
        nodes = sketch.graph().node_count(),
        "run"
    );
    let mut grown = 0usize;
    for _ in 0..args.frames {
        let report = sketch.step();
        grown += report.growth.map_or(0, |g| g.added_nodes());
        if args.log_every > 0 && report.frame % args.log_every == 0 {
            tracing::info!(
                frame = report.frame,
                nodes = sketch.graph().node_count(),
                links = sketch.graph().link_count(),
                max_shift = report.relax.map_or(0.0, |r| r.max_shift),
                "frame"
            );
        }
    }

    write_snapshot(&args.out, &sketch.snapshot())?;
    let mut payload = provenance::Payload::new(json!({
        "seed": args.seed,
        "frames": args.frames,
        "layout": format!("{:?}", args.layout),
        "max_nodes": args.max_nodes,
        "grow_every": args.grow_every,
        "loose": args.loose,
        "threshold": args.relax.threshold,
        "scale": args.relax.scale,
        "pull": format!("{:?}", args.relax.pull),
    }));
    if let Some(svg_path) = &args.svg {
        let size = f64::from(args.size);
        let view = Viewport::new(size, size);
        let style = render::Style {
            dots: args.dots,
            ..render::Style::default()
        };
        write_file(svg_path, render::to_svg(sketch.graph(), &view, style).as_bytes())?;
        payload = payload.with_output(svg_path);
    }
    provenance::write_sidecar(&args.out, payload)?;
    tracing::info!(
        nodes = sketch.graph().node_count(),
        links = sketch.graph().link_count(),
        grown,
        out = %args.out.display(),
        "done"
    );
    Ok(())
}

fn relax(snapshot: &Path, iterations: u32, out: Option<&Path>, cfg: RelaxCfg) -> Result<()> {
    cfg.validate()?;
    let mut graph = load_graph(snapshot)?;
    let mut last = RelaxStats::default();
    for i in 0..iterations {
        last = relax_step(&mut graph, &cfg);
        if i % 100 == 0 {
            tracing::info!(
                iteration = i,
                moved = last.moved,
                max_shift = last.max_shift,
                total_shift = last.total_shift,
                "relax"
            );
        }
    }
    tracing::info!(
        iterations,
        max_shift = last.max_shift,
        total_shift = last.total_shift,
        "relaxed"
    );
    if let Some(out) = out {
        write_snapshot(out, &Snapshot::of(&graph))?;
        provenance::write_sidecar(
            out,
            provenance::Payload::new(json!({
                "from": snapshot.to_string_lossy(),
                "iterations": iterations,
                "threshold": cfg.threshold,
                "scale": cfg.scale,
            })),
        )?;
    }
    Ok(())
}

fn probe(snapshot: &Path, from: Option<V2>, to: Option<V2>, seed: u64, loose: bool) -> Result<()> {
    let snap = read_snapshot(snapshot)?;
    let candidate = match (from, to) {
        (Some(a), Some(b)) => Segment::new(a, b),
        (None, None) => match snap.candidate() {
            Some(c) => c,
            None => bail!("snapshot has no candidate line; pass --from and --to"),
        },
        _ => bail!("--from and --to go together"),
    };
    let graph = snap.into_graph()?;
    let doc = probe_report(&graph, &candidate, seed, adjacency(loose));
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn probe_report(graph: &Graph, candidate: &Segment, seed: u64, adjacency: Adjacency) -> serde_json::Value {
    let hits = find_hits(graph, candidate);
    let primary = hits.choose(&mut seeded(seed)).copied();
    let adjacent: Vec<serde_json::Value> = primary
        .map(|p| {
            adjacent_hits(&hits, &p.link, adjacency)
                .into_iter()
                .map(hit_json)
                .collect()
        })
        .unwrap_or_default();
    json!({
        "candidate": [[candidate.start.x, candidate.start.y], [candidate.end.x, candidate.end.y]],
        "hits": hits.iter().map(hit_json).collect::<Vec<_>>(),
        "primary": primary.as_ref().map(hit_json),
        "adjacent": adjacent,
    })
}

fn hit_json(h: &Hit) -> serde_json::Value {
    json!({
        "point": [h.point.x, h.point.y],
        "link": [h.link.0 .0, h.link.1 .0],
        "p": h.p,
    })
}

fn report() -> Result<()> {
    let obj = provenance::block(json!({}));
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn parse_point(s: &str) -> Result<V2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok(V2::new(x, y))
}

fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Snapshot::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_graph(path: &Path) -> Result<Graph> {
    Ok(read_snapshot(path)?.into_graph()?)
}

fn write_snapshot(path: &Path, snap: &Snapshot) -> Result<()> {
    write_file(path, snap.to_json()?.as_bytes())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}
