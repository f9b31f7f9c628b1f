//! Starting configurations.
//!
//! - `Diamond`: four free nodes on the axes inside four fixed corners, wired
//!   into a planar subdivision (diamond cycle, corner spokes, outer square).
//! - `Single`: one fixed node at a Gaussian point and no links.
//! - `Outline`: a fixed open polyline with a preset probe line, used to study
//!   neighbour picking.

use rand::Rng;

use crate::random::gaussian_point;
use crate::vec2::{Segment, V2};

use super::store::Graph;
use super::types::{Link, NodeId, Point};

/// Corner anchors sit on this square, matching the default domain.
pub const CORNER: f64 = 2.0;

/// Which starting configuration to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Seed {
    #[default]
    Diamond,
    Single,
    Outline,
}

impl Seed {
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Graph {
        match self {
            Seed::Diamond => initialize(rng),
            Seed::Single => {
                let mut g = Graph::new();
                g.add_node(Point::at(gaussian_point(rng), true));
                g
            }
            Seed::Outline => outline(),
        }
    }

    /// Probe line that ships with the seed, if any.
    pub fn probe_line(&self) -> Option<Segment> {
        match self {
            Seed::Outline => Some(Segment::new(
                V2::new(-1.3480345158197506, 0.8954937679769897),
                V2::new(1.6011505273250242, 0.05177372962607851),
            )),
            _ => None,
        }
    }
}

/// Diamond seed with interior radii drawn uniformly from [0, 1).
pub fn initialize<R: Rng + ?Sized>(rng: &mut R) -> Graph {
    let radii = [rng.gen(), rng.gen(), rng.gen(), rng.gen()];
    diamond(radii)
}

/// Diamond seed with explicit interior radii (top, left, bottom, right).
///
/// Node layout: 0..4 free interior, 4 = (-2,-2), 5 = (2,2), 6 = (-2,2),
/// 7 = (2,-2).
pub fn diamond(radii: [f64; 4]) -> Graph {
    let [top, left, bottom, right] = radii;
    let nodes = vec![
        Point::free(0.0, top),
        Point::free(-left, 0.0),
        Point::free(0.0, -bottom),
        Point::free(right, 0.0),
        Point::anchored(-CORNER, -CORNER),
        Point::anchored(CORNER, CORNER),
        Point::anchored(-CORNER, CORNER),
        Point::anchored(CORNER, -CORNER),
    ];
    let links = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (1, 4),
        (3, 5),
        (2, 7),
        (0, 6),
        (4, 6),
        (6, 5),
        (5, 7),
        (7, 4),
    ]
    .into_iter()
    .map(|(a, b)| Link::new(NodeId(a), NodeId(b)))
    .collect();
    Graph::from_trusted(nodes, links)
}

/// Fixed 14-point open polyline.
pub fn outline() -> Graph {
    const PTS: [(f64, f64); 14] = [
        (-1.2030155887743323, -0.3708818619689974),
        (0.1323106423777567, -1.3595397890699905),
        (1.2023010546500479, -1.0373921380632791),
        (1.2943432406519655, 0.41227229146692235),
        (1.0757430488974111, 1.1255992329817834),
        (0.10162991371045083, 1.3173537871524448),
        (-0.8034515819750718, 1.1102588686481303),
        (-1.1831255992329819, 0.6040268456375837),
        (-1.351869606903164, 0.18600191754554185),
        (-0.772770853307766, -0.3547459252157239),
        (0.3700862895493766, -0.6001917545541706),
        (0.8916586768935764, 0.0057526366251199335),
        (0.6615532118887826, 0.6653883029721954),
        (0.05944391179290509, 0.30105465004793874),
    ];
    let nodes = PTS.iter().map(|&(x, y)| Point::anchored(x, y)).collect();
    let links = (1..PTS.len())
        .map(|k| Link::new(NodeId(k - 1), NodeId(k)))
        .collect();
    Graph::from_trusted(nodes, links)
}
