//! SVG output for a graph: white page, black links, optional node dots.

use mirror::graph::Graph;
use mirror::sketch::Viewport;

/// Drawing options; widths are in pixels of a 2048 px canvas and scale with
/// the viewport.
#[derive(Clone, Copy, Debug)]
pub struct Style {
    pub line_width: f64,
    pub dot_radius: f64,
    pub dots: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            line_width: 5.0,
            dot_radius: 10.0,
            dots: false,
        }
    }
}

struct Svg {
    width: f64,
    height: f64,
    content: String,
}

impl Svg {
    fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            content: String::new(),
        }
    }

    fn rect(&mut self, fill: &str) {
        self.content.push_str(&format!(
            r#"<rect x="0" y="0" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            self.width, self.height, fill
        ));
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, stroke_width: f64) {
        self.content.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}" stroke-linecap="round"/>"#,
            x1, y1, x2, y2, stroke, stroke_width
        ));
    }

    fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) {
        self.content.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
            cx, cy, r, fill
        ));
    }

    fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{}</svg>"#,
            self.content,
            w = self.width,
            h = self.height,
        )
    }
}

pub fn to_svg(graph: &Graph, view: &Viewport, style: Style) -> String {
    let k = view.width.min(view.height) / 2048.0;
    let mut svg = Svg::new(view.width, view.height);
    svg.rect("white");
    for link in graph.links() {
        let seg = graph.segment(link);
        let a = view.to_screen(seg.start);
        let b = view.to_screen(seg.end);
        svg.line(a.x, a.y, b.x, b.y, "black", style.line_width * k);
    }
    if style.dots {
        for p in graph.nodes() {
            let c = view.to_screen(p.pos());
            let fill = if p.fixed { "red" } else { "black" };
            svg.circle(c.x, c.y, style.dot_radius * k, fill);
        }
    }
    svg.finish()
}
