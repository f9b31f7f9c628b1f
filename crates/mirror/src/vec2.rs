//! 2D vector helpers over `nalgebra::Vector2<f64>`.
//!
//! The free functions mirror the notation used by the growth and relaxation
//! steps (`lerp`, `cross`, `vector_to`, ...). They are stateless.
//!
//! Code cross-refs: `grow::find_hits` (segment tests), `relax::relax_offset`
//! (unit vectors).

use nalgebra::Vector2;

/// Point or direction in the logical domain.
pub type V2 = Vector2<f64>;

/// `|cross(sa, sb)|` at or below this is treated as parallel.
pub const PARALLEL_EPS: f64 = 1e-12;

#[inline]
pub fn add(a: V2, b: V2) -> V2 {
    a + b
}

#[inline]
pub fn sub(a: V2, b: V2) -> V2 {
    a - b
}

#[inline]
pub fn scale(s: f64, v: V2) -> V2 {
    v * s
}

/// z-component of the 3D cross product: `a.x * b.y - b.x * a.y`.
#[inline]
pub fn cross(a: V2, b: V2) -> f64 {
    a.x * b.y - b.x * a.y
}

/// `a + t (b - a)`; `t` outside [0, 1] extrapolates.
#[inline]
pub fn lerp(a: V2, b: V2, t: f64) -> V2 {
    a + (b - a) * t
}

#[inline]
pub fn distance_squared(a: V2, b: V2) -> f64 {
    (b - a).norm_squared()
}

#[inline]
pub fn magnitude(v: V2) -> f64 {
    v.norm()
}

/// `from - to`: points from `to` toward `from`.
#[inline]
pub fn vector_to(from: V2, to: V2) -> V2 {
    from - to
}

/// Unit vector along `v`; `None` for zero or non-finite length.
#[inline]
pub fn normalize(v: V2) -> Option<V2> {
    let m = v.norm();
    if !m.is_finite() || m <= 0.0 {
        return None;
    }
    Some(v / m)
}

/// Ordered pair of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: V2,
    pub end: V2,
}

impl Segment {
    #[inline]
    pub fn new(start: V2, end: V2) -> Self {
        Self { start, end }
    }
    #[inline]
    pub fn direction(&self) -> V2 {
        self.end - self.start
    }
    #[inline]
    pub fn point_at(&self, t: f64) -> V2 {
        lerp(self.start, self.end, t)
    }
}

/// Axis-aligned rectangle `[min.x, max.x] × [min.y, max.y]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect2 {
    pub min: V2,
    pub max: V2,
}

impl Rect2 {
    /// Square `[-h, h]²` centred on the origin.
    pub fn centered_square(half_extent: f64) -> Self {
        Self {
            min: V2::new(-half_extent, -half_extent),
            max: V2::new(half_extent, half_extent),
        }
    }
    #[inline]
    pub fn contains(&self, p: V2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Parameters of a segment/segment crossing.
///
/// `p` runs along the first segment, `q` along the second. Both are reported
/// even when the crossing lies outside either segment so callers can still
/// interpolate with `p`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
    pub intersect: bool,
    pub p: f64,
    pub q: f64,
}

/// Crossing of segments `a` and `b`, or `None` when they are parallel or
/// degenerate.
///
/// `intersect` holds iff both parameters lie in `[0, 1]`, i.e. the segments
/// themselves cross and not only their supporting lines.
pub fn segment_intersection(a: &Segment, b: &Segment) -> Option<Crossing> {
    let sa = a.direction();
    let sb = b.direction();
    let u = cross(sa, sb);
    if !(u.abs() > PARALLEL_EPS) {
        return None;
    }
    let ba = a.start - b.start;
    let q = cross(sa, ba) / u;
    let p = cross(sb, ba) / u;
    Some(Crossing {
        intersect: (0.0..=1.0).contains(&p) && (0.0..=1.0).contains(&q),
        p,
        q,
    })
}

/// Points where the infinite line through `seg` meets the boundary of `rect`,
/// ordered along `seg.direction()`. Corner hits are reported once.
///
/// Returns an empty list for a degenerate segment or a line that misses the
/// rectangle.
pub fn extend(seg: &Segment, rect: &Rect2) -> Vec<V2> {
    const EDGE_EPS: f64 = 1e-12;
    let d = seg.direction();
    let o = seg.start;
    let mut hits: Vec<(f64, V2)> = Vec::with_capacity(4);
    if d.x.abs() > PARALLEL_EPS {
        for x in [rect.min.x, rect.max.x] {
            let t = (x - o.x) / d.x;
            let y = o.y + t * d.y;
            if y >= rect.min.y - EDGE_EPS && y <= rect.max.y + EDGE_EPS {
                hits.push((t, V2::new(x, y.clamp(rect.min.y, rect.max.y))));
            }
        }
    }
    if d.y.abs() > PARALLEL_EPS {
        for y in [rect.min.y, rect.max.y] {
            let t = (y - o.y) / d.y;
            let x = o.x + t * d.x;
            if x >= rect.min.x - EDGE_EPS && x <= rect.max.x + EDGE_EPS {
                hits.push((t, V2::new(x.clamp(rect.min.x, rect.max.x), y)));
            }
        }
    }
    hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    hits.dedup_by(|a, b| (a.1 - b.1).norm() < 1e-9);
    hits.into_iter().map(|(_, p)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;
    use proptest::prelude::*;

    fn seg(a: [f64; 2], b: [f64; 2]) -> Segment {
        Segment::new(V2::new(a[0], a[1]), V2::new(b[0], b[1]))
    }

    #[test]
    fn crossing_diagonals_meet_at_midpoint() {
        let a = seg([0.0, 0.0], [1.0, 1.0]);
        let b = seg([0.0, 1.0], [1.0, 0.0]);
        let c = segment_intersection(&a, &b).expect("not parallel");
        assert!(c.intersect);
        assert!((c.p - 0.5).abs() < 1e-12);
        assert!((c.q - 0.5).abs() < 1e-12);
        let m = a.point_at(c.p);
        assert!((m - vector![0.5, 0.5]).norm() < 1e-12);
    }

    #[test]
    fn parallel_segments_never_intersect() {
        let a = seg([0.0, 0.0], [1.0, 0.0]);
        let b = seg([0.0, 1.0], [1.0, 1.0]);
        assert!(segment_intersection(&a, &b).is_none());
        // Collinear and overlapping is still "parallel".
        let c = seg([0.5, 0.0], [2.0, 0.0]);
        assert!(segment_intersection(&a, &c).is_none());
        // Zero-length segment.
        let d = seg([0.3, 0.3], [0.3, 0.3]);
        assert!(segment_intersection(&a, &d).is_none());
    }

    #[test]
    fn line_crossing_outside_segment_reports_parameters() {
        // Lines cross at (2, 0), beyond the end of `a`.
        let a = seg([0.0, 0.0], [1.0, 0.0]);
        let b = seg([2.0, -1.0], [2.0, 1.0]);
        let c = segment_intersection(&a, &b).unwrap();
        assert!(!c.intersect);
        assert!((c.p - 2.0).abs() < 1e-12);
        assert!((c.q - 0.5).abs() < 1e-12);
    }

    #[test]
    fn endpoint_touch_counts_as_intersection() {
        let a = seg([0.0, 0.0], [1.0, 0.0]);
        let b = seg([1.0, 0.0], [1.0, 1.0]);
        let c = segment_intersection(&a, &b).unwrap();
        assert!(c.intersect);
        assert!((c.p - 1.0).abs() < 1e-12);
        assert!(c.q.abs() < 1e-12);
    }

    #[test]
    fn vector_helpers() {
        let a = vector![1.0, 2.0];
        let b = vector![4.0, 6.0];
        assert_eq!(add(a, b), vector![5.0, 8.0]);
        assert_eq!(sub(b, a), vector![3.0, 4.0]);
        assert_eq!(scale(2.0, a), vector![2.0, 4.0]);
        assert!((distance_squared(a, b) - 25.0).abs() < 1e-12);
        assert!((magnitude(sub(b, a)) - 5.0).abs() < 1e-12);
        assert_eq!(vector_to(b, a), vector![3.0, 4.0]);
        assert_eq!(lerp(a, b, 0.5), vector![2.5, 4.0]);
        assert!((cross(vector![1.0, 0.0], vector![0.0, 1.0]) - 1.0).abs() < 1e-12);
        let n = normalize(vector![3.0, 4.0]).unwrap();
        assert!((n - vector![0.6, 0.8]).norm() < 1e-12);
        assert!(normalize(V2::zeros()).is_none());
        assert!(normalize(vector![f64::NAN, 1.0]).is_none());
    }

    #[test]
    fn extend_diagonal_hits_opposite_corners() {
        let rect = Rect2::centered_square(2.0);
        let pts = extend(&seg([0.0, 0.0], [0.5, 0.5]), &rect);
        assert_eq!(pts.len(), 2);
        assert!((pts[0] - vector![-2.0, -2.0]).norm() < 1e-9);
        assert!((pts[1] - vector![2.0, 2.0]).norm() < 1e-9);
    }

    #[test]
    fn extend_orders_along_direction() {
        let rect = Rect2::centered_square(2.0);
        // Right-to-left horizontal line.
        let pts = extend(&seg([1.0, 0.5], [0.0, 0.5]), &rect);
        assert_eq!(pts.len(), 2);
        assert!((pts[0] - vector![2.0, 0.5]).norm() < 1e-12);
        assert!((pts[1] - vector![-2.0, 0.5]).norm() < 1e-12);
        // Vertical line.
        let pts = extend(&seg([0.25, -0.1], [0.25, 0.1]), &rect);
        assert_eq!(pts.len(), 2);
        assert!((pts[0] - vector![0.25, -2.0]).norm() < 1e-12);
        assert!((pts[1] - vector![0.25, 2.0]).norm() < 1e-12);
    }

    #[test]
    fn extend_misses_and_degenerate() {
        let rect = Rect2::centered_square(1.0);
        assert!(extend(&seg([5.0, 0.0], [5.0, 1.0]), &rect).is_empty());
        assert!(extend(&seg([0.0, 0.0], [0.0, 0.0]), &rect).is_empty());
    }

    proptest! {
        #[test]
        fn intersection_is_symmetric_up_to_role_swap(
            ax in -3.0f64..3.0, ay in -3.0f64..3.0, bx in -3.0f64..3.0, by in -3.0f64..3.0,
            cx in -3.0f64..3.0, cy in -3.0f64..3.0, dx in -3.0f64..3.0, dy in -3.0f64..3.0,
        ) {
            let a = seg([ax, ay], [bx, by]);
            let b = seg([cx, cy], [dx, dy]);
            let ab = segment_intersection(&a, &b);
            let ba = segment_intersection(&b, &a);
            prop_assert_eq!(ab.is_some(), ba.is_some());
            if let (Some(ab), Some(ba)) = (ab, ba) {
                let tol = 1e-9 * (1.0 + ab.p.abs().max(ab.q.abs()));
                prop_assert!((ab.p - ba.q).abs() <= tol);
                prop_assert!((ab.q - ba.p).abs() <= tol);
                // Both parametrisations land on the same point.
                if ab.intersect && cross(a.direction(), b.direction()).abs() > 1e-3 {
                    prop_assert!((a.point_at(ab.p) - b.point_at(ab.q)).norm() < 1e-6);
                }
            }
        }
    }
}
