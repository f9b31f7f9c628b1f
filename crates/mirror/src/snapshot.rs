//! JSON dump of a run's graph for inspection.
//!
//! Shape: `{"nodes": [{"x", "y", "fixed"}], "links": [[i, j]], "candidate_line": [[x, y]]}`.
//! This is a debugging aid; there is no schema version.

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::{Graph, Link, Point};
use crate::vec2::{Segment, V2};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<Point>,
    pub links: Vec<Link>,
    #[serde(default)]
    pub candidate_line: Vec<[f64; 2]>,
}

impl Snapshot {
    pub fn of(graph: &Graph) -> Self {
        Self {
            nodes: graph.nodes().to_vec(),
            links: graph.links().to_vec(),
            candidate_line: Vec::new(),
        }
    }

    pub fn with_candidate_line(mut self, points: &[V2]) -> Self {
        self.candidate_line = points.iter().map(|p| [p.x, p.y]).collect();
        self
    }

    /// Probe segment through the last two candidate points, if present.
    pub fn candidate(&self) -> Option<Segment> {
        match self.candidate_line.as_slice() {
            [.., a, b] => Some(Segment::new(V2::new(a[0], a[1]), V2::new(b[0], b[1]))),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Rebuild the graph, checking every link endpoint.
    pub fn into_graph(self) -> Result<Graph, GraphError> {
        Graph::from_parts(self.nodes, self.links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{diamond, NodeId};
    use nalgebra::vector;

    #[test]
    fn json_shape_is_plain_records() {
        let mut g = Graph::new();
        let a = g.add_node(Point::free(0.5, -1.0));
        let b = g.add_node(Point::anchored(2.0, 2.0));
        g.add_link(a, b).unwrap();
        let json = Snapshot::of(&g).to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["nodes"][0]["x"], 0.5);
        assert_eq!(v["nodes"][1]["fixed"], true);
        assert_eq!(v["links"][0], serde_json::json!([0, 1]));
        assert_eq!(v["candidate_line"], serde_json::json!([]));
    }

    #[test]
    fn restores_graph_and_candidate() {
        let g = diamond([0.2, 0.4, 0.6, 0.8]);
        let snap = Snapshot::of(&g).with_candidate_line(&[vector![-1.0, 0.0], vector![1.0, 0.1]]);
        let back = Snapshot::from_json(&snap.to_json().unwrap()).unwrap();
        let seg = back.candidate().unwrap();
        assert_eq!(seg.end, vector![1.0, 0.1]);
        assert_eq!(back.into_graph().unwrap(), g);
    }

    #[test]
    fn missing_fixed_flag_defaults_to_free() {
        let snap = Snapshot::from_json(r#"{"nodes":[{"x":0,"y":1},{"x":1,"y":0}],"links":[[1,0]]}"#)
            .unwrap();
        assert!(!snap.nodes[0].fixed);
        assert!(snap.candidate().is_none());
        let g = snap.into_graph().unwrap();
        assert_eq!(g.neighbors_of(NodeId(0)), vec![NodeId(1)]);
    }

    #[test]
    fn rejects_dangling_links() {
        let snap = Snapshot::from_json(r#"{"nodes":[{"x":0,"y":1}],"links":[[0,4]]}"#).unwrap();
        assert_eq!(
            snap.into_graph(),
            Err(GraphError::UnknownNode {
                node: NodeId(4),
                len: 1
            })
        );
    }
}
