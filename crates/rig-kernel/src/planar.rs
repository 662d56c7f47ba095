//! Planar cross-section regions bounded by line and arc edges.
//!
//! A region is a set of closed loops interpreted with the even-odd rule:
//! the largest loop is the outer boundary (counter-clockwise), loops inside
//! it are holes (clockwise). All prism solids carry one of these as their
//! cross-section, so splitting a solid in-plane reduces to clipping a region
//! against a half-plane.

use std::collections::hash_map::DefaultHasher;
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};

/// Geometric coincidence tolerance for cross-section math, in millimetres.
pub const MODEL_EPS: f64 = 1e-6;

/// Angular coincidence tolerance, in radians.
const ANGLE_EPS: f64 = 1e-7;

pub type P2 = [f64; 2];

fn sub(a: P2, b: P2) -> P2 {
    [a[0] - b[0], a[1] - b[1]]
}

fn dot(a: P2, b: P2) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

fn dist(a: P2, b: P2) -> f64 {
    let d = sub(a, b);
    dot(d, d).sqrt()
}

fn on_circle(center: P2, radius: f64, angle: f64) -> P2 {
    [
        center[0] + radius * angle.cos(),
        center[1] + radius * angle.sin(),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanarEdge {
    /// Straight edge from `a` to `b`.
    Seg { a: P2, b: P2 },
    /// Circular arc, counter-clockwise when `end > start`.
    Arc {
        center: P2,
        radius: f64,
        start: f64,
        end: f64,
    },
}

impl PlanarEdge {
    pub fn start(&self) -> P2 {
        match self {
            PlanarEdge::Seg { a, .. } => *a,
            PlanarEdge::Arc {
                center,
                radius,
                start,
                ..
            } => on_circle(*center, *radius, *start),
        }
    }

    pub fn end(&self) -> P2 {
        match self {
            PlanarEdge::Seg { b, .. } => *b,
            PlanarEdge::Arc {
                center,
                radius,
                end,
                ..
            } => on_circle(*center, *radius, *end),
        }
    }

    /// Point at the parametric middle of the edge.
    pub fn midpoint(&self) -> P2 {
        match self {
            PlanarEdge::Seg { a, b } => [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5],
            PlanarEdge::Arc {
                center,
                radius,
                start,
                end,
            } => on_circle(*center, *radius, (start + end) * 0.5),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            PlanarEdge::Seg { a, b } => dist(*a, *b),
            PlanarEdge::Arc {
                radius, start, end, ..
            } => radius * (end - start).abs(),
        }
    }

    /// Parametric span: length for segments, subtended angle for arcs.
    pub fn span(&self) -> f64 {
        match self {
            PlanarEdge::Seg { a, b } => dist(*a, *b),
            PlanarEdge::Arc { start, end, .. } => (end - start).abs(),
        }
    }

    pub fn translated(&self, offset: P2) -> PlanarEdge {
        match self {
            PlanarEdge::Seg { a, b } => PlanarEdge::Seg {
                a: [a[0] + offset[0], a[1] + offset[1]],
                b: [b[0] + offset[0], b[1] + offset[1]],
            },
            PlanarEdge::Arc {
                center,
                radius,
                start,
                end,
            } => PlanarEdge::Arc {
                center: [center[0] + offset[0], center[1] + offset[1]],
                radius: *radius,
                start: *start,
                end: *end,
            },
        }
    }

    pub fn reversed(&self) -> PlanarEdge {
        match self {
            PlanarEdge::Seg { a, b } => PlanarEdge::Seg { a: *b, b: *a },
            PlanarEdge::Arc {
                center,
                radius,
                start,
                end,
            } => PlanarEdge::Arc {
                center: *center,
                radius: *radius,
                start: *end,
                end: *start,
            },
        }
    }

    /// Contribution of this edge to `∮ (x dy − y dx) / 2` around a loop.
    fn green_area_term(&self) -> f64 {
        match self {
            PlanarEdge::Seg { a, b } => 0.5 * (a[0] * b[1] - b[0] * a[1]),
            PlanarEdge::Arc {
                center,
                radius,
                start,
                end,
            } => {
                let (c, r) = (center, radius);
                let delta = end - start;
                0.5 * (r * r * delta
                    + r * (c[0] * (end.sin() - start.sin()) + c[1] * (start.cos() - end.cos())))
            }
        }
    }

    pub(crate) fn quantized(&self, grid: f64) -> Vec<i64> {
        let q = |x: f64| (x / grid).round() as i64;
        match self {
            PlanarEdge::Seg { a, b } => {
                let mut pts = [[q(a[0]), q(a[1])], [q(b[0]), q(b[1])]];
                pts.sort();
                vec![0, pts[0][0], pts[0][1], pts[1][0], pts[1][1], 0]
            }
            PlanarEdge::Arc {
                center,
                radius,
                start,
                end,
            } => {
                let m = on_circle(*center, *radius, (start + end) * 0.5);
                let qa = |x: f64| (x / 1e-6).round() as i64;
                vec![
                    1,
                    q(center[0]),
                    q(center[1]),
                    q(*radius),
                    qa((end - start).abs()),
                    q(m[0]),
                    q(m[1]),
                ]
            }
        }
    }
}

fn loop_signed_area(edges: &[PlanarEdge]) -> f64 {
    edges.iter().map(|e| e.green_area_term()).sum()
}

/// Closed planar region, possibly with holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub loops: Vec<Vec<PlanarEdge>>,
}

/// Outcome of clipping a region against a half-plane.
#[derive(Debug, Clone)]
pub enum ClipOutcome {
    /// The cutting line misses the region; it lies on the negative side.
    AllNegative,
    /// The cutting line misses the region; it lies on the positive side.
    AllPositive,
    Split { negative: Region, positive: Region },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClipError {
    /// A boundary edge lies on the cutting line itself.
    EdgeOnCutter,
    /// Boundary crossings do not pair up; the region is inconsistent.
    UnpairedCrossings(usize),
    /// A fragment boundary could not be closed into loops.
    OpenChain,
}

impl std::fmt::Display for ClipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipError::EdgeOnCutter => write!(f, "boundary edge lies on the cutting line"),
            ClipError::UnpairedCrossings(n) => {
                write!(f, "odd number of boundary crossings ({n})")
            }
            ClipError::OpenChain => write!(f, "fragment boundary does not close"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Negative,
    Positive,
}

impl Region {
    /// Builds a region from raw loops, orienting the largest loop
    /// counter-clockwise and the rest clockwise. Loops are assumed to nest at
    /// most one level (holes inside a single outer boundary).
    pub fn from_loops(mut loops: Vec<Vec<PlanarEdge>>) -> Region {
        loops.sort_by(|a, b| {
            loop_signed_area(b)
                .abs()
                .partial_cmp(&loop_signed_area(a).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (i, lp) in loops.iter_mut().enumerate() {
            let area = loop_signed_area(lp);
            let want_ccw = i == 0;
            if (area > 0.0) != want_ccw {
                lp.reverse();
                for e in lp.iter_mut() {
                    *e = e.reversed();
                }
            }
        }
        Region { loops }
    }

    pub fn area(&self) -> f64 {
        self.loops.iter().map(|l| loop_signed_area(l)).sum()
    }

    /// Area centroid, via an arc-sampled polygonal approximation. Accurate to
    /// well under the modeling tolerance for the arc counts involved.
    pub fn centroid(&self) -> P2 {
        let mut area2 = 0.0; // twice the signed area
        let mut sx = 0.0;
        let mut sy = 0.0;
        for lp in &self.loops {
            let pts = sample_loop(lp);
            let n = pts.len();
            for i in 0..n {
                let p = pts[i];
                let q = pts[(i + 1) % n];
                let w = p[0] * q[1] - q[0] * p[1];
                area2 += w;
                sx += (p[0] + q[0]) * w;
                sy += (p[1] + q[1]) * w;
            }
        }
        if area2.abs() < 1e-12 {
            return [0.0, 0.0];
        }
        [sx / (3.0 * area2), sy / (3.0 * area2)]
    }

    pub fn translated(&self, offset: P2) -> Region {
        Region {
            loops: self
                .loops
                .iter()
                .map(|l| l.iter().map(|e| e.translated(offset)).collect())
                .collect(),
        }
    }

    /// Order-independent hash of the boundary, with coordinates snapped to
    /// `grid`. Two regions with coincident boundaries hash equal.
    pub fn fingerprint(&self, grid: f64) -> u64 {
        let mut records: Vec<Vec<i64>> = self
            .loops
            .iter()
            .flat_map(|l| l.iter().map(|e| e.quantized(grid)))
            .collect();
        records.sort();
        let mut hasher = DefaultHasher::new();
        records.hash(&mut hasher);
        hasher.finish()
    }

    /// Clips the region against the line through `origin` with normal
    /// `normal` (unit length). Fragments keep exact arc geometry; bridge
    /// segments along the cut close each fragment.
    pub fn clip(&self, origin: P2, normal: P2, tol: f64) -> Result<ClipOutcome, ClipError> {
        let tangent = [-normal[1], normal[0]];
        let side_of = |p: P2| dot(sub(p, origin), normal);

        let mut neg_edges: Vec<PlanarEdge> = Vec::new();
        let mut pos_edges: Vec<PlanarEdge> = Vec::new();
        let mut crossings: Vec<(f64, P2)> = Vec::new();

        for lp in &self.loops {
            // Subdivide every edge at its interior intersections with the line.
            let mut subs: Vec<PlanarEdge> = Vec::new();
            for edge in lp {
                split_edge_at_line(edge, origin, normal, tol, &mut subs);
            }
            // Classify each sub-edge by the side of its midpoint.
            let mut sides: Vec<Side> = Vec::with_capacity(subs.len());
            for e in &subs {
                let s = side_of(e.midpoint());
                if s.abs() <= tol {
                    return Err(ClipError::EdgeOnCutter);
                }
                sides.push(if s < 0.0 { Side::Negative } else { Side::Positive });
            }
            // A junction on the line where the side flips is a true crossing.
            let n = subs.len();
            for i in 0..n {
                let j = (i + 1) % n;
                let p = subs[i].end();
                if side_of(p).abs() <= tol && sides[i] != sides[j] {
                    crossings.push((dot(sub(p, origin), tangent), p));
                }
            }
            for (e, s) in subs.into_iter().zip(sides) {
                match s {
                    Side::Negative => neg_edges.push(e),
                    Side::Positive => pos_edges.push(e),
                }
            }
        }

        if crossings.is_empty() {
            return Ok(if pos_edges.is_empty() {
                ClipOutcome::AllNegative
            } else if neg_edges.is_empty() {
                ClipOutcome::AllPositive
            } else {
                // Disconnected loops straddling the line without touching it
                // cannot come from a valid region.
                return Err(ClipError::UnpairedCrossings(0));
            });
        }

        crossings.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        crossings.dedup_by(|a, b| (a.0 - b.0).abs() <= tol);
        if crossings.len() % 2 != 0 {
            return Err(ClipError::UnpairedCrossings(crossings.len()));
        }
        // Consecutive crossing pairs bound the intervals where the line runs
        // through material; those intervals become bridge edges on both sides.
        let bridges: Vec<(P2, P2)> = crossings
            .chunks(2)
            .map(|pair| (pair[0].1, pair[1].1))
            .collect();

        let negative = stitch_loops(neg_edges, &bridges)?;
        let positive = stitch_loops(pos_edges, &bridges)?;
        Ok(ClipOutcome::Split {
            negative: Region { loops: negative },
            positive: Region { loops: positive },
        })
    }
}

/// Splits one edge at every interior intersection with the cut line and
/// appends the pieces in parametric order.
fn split_edge_at_line(edge: &PlanarEdge, origin: P2, normal: P2, tol: f64, out: &mut Vec<PlanarEdge>) {
    match edge {
        PlanarEdge::Seg { a, b } => {
            let sa = dot(sub(*a, origin), normal);
            let sb = dot(sub(*b, origin), normal);
            if sa.abs() > tol && sb.abs() > tol && sa * sb < 0.0 {
                let t = sa / (sa - sb);
                let p = [a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])];
                out.push(PlanarEdge::Seg { a: *a, b: p });
                out.push(PlanarEdge::Seg { a: p, b: *b });
            } else {
                out.push(edge.clone());
            }
        }
        PlanarEdge::Arc {
            center,
            radius,
            start,
            end,
        } => {
            let d0 = dot(sub(*center, origin), normal);
            if radius.abs() - d0.abs() <= tol {
                // Line misses or only grazes the circle.
                out.push(edge.clone());
                return;
            }
            let phi = normal[1].atan2(normal[0]);
            let base = (-d0 / radius).clamp(-1.0, 1.0).acos();
            let lo = start.min(*end);
            let hi = start.max(*end);
            let mut cuts: Vec<f64> = Vec::new();
            for cand in [phi + base, phi - base] {
                // Bring every 2π-period image of the candidate into range.
                let k0 = ((lo - cand) / (2.0 * PI)).floor() as i64 - 1;
                let k1 = ((hi - cand) / (2.0 * PI)).ceil() as i64 + 1;
                for k in k0..=k1 {
                    let theta = cand + 2.0 * PI * k as f64;
                    if theta > lo + ANGLE_EPS && theta < hi - ANGLE_EPS {
                        cuts.push(theta);
                    }
                }
            }
            if cuts.is_empty() {
                out.push(edge.clone());
                return;
            }
            cuts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            cuts.dedup_by(|a, b| (*a - *b).abs() <= ANGLE_EPS);
            if *end < *start {
                cuts.reverse();
            }
            let mut prev = *start;
            for theta in cuts {
                out.push(PlanarEdge::Arc {
                    center: *center,
                    radius: *radius,
                    start: prev,
                    end: theta,
                });
                prev = theta;
            }
            out.push(PlanarEdge::Arc {
                center: *center,
                radius: *radius,
                start: prev,
                end: *end,
            });
        }
    }
}

/// Chains one side's sub-edges and the bridge segments into closed loops.
/// Sub-edges keep their orientation; bridges orient to fit the chain.
fn stitch_loops(
    side_edges: Vec<PlanarEdge>,
    bridges: &[(P2, P2)],
) -> Result<Vec<Vec<PlanarEdge>>, ClipError> {
    let mut edges: Vec<Option<PlanarEdge>> = side_edges.into_iter().map(Some).collect();
    let mut bridge_used = vec![false; bridges.len()];
    let mut loops: Vec<Vec<PlanarEdge>> = Vec::new();

    loop {
        let seed = match edges.iter_mut().find_map(|slot| slot.take()) {
            Some(e) => e,
            None => break,
        };
        let chain_start = seed.start();
        let mut chain_end = seed.end();
        let mut chain = vec![seed];

        while dist(chain_end, chain_start) > MODEL_EPS {
            let next_side = edges.iter_mut().find_map(|slot| {
                if slot
                    .as_ref()
                    .is_some_and(|e| dist(e.start(), chain_end) <= MODEL_EPS)
                {
                    slot.take()
                } else {
                    None
                }
            });
            if let Some(e) = next_side {
                chain_end = e.end();
                chain.push(e);
                continue;
            }
            let bridge = bridges.iter().enumerate().find(|(i, (p, q))| {
                !bridge_used[*i]
                    && (dist(*p, chain_end) <= MODEL_EPS || dist(*q, chain_end) <= MODEL_EPS)
            });
            match bridge {
                Some((i, (p, q))) => {
                    bridge_used[i] = true;
                    let (a, b) = if dist(*p, chain_end) <= MODEL_EPS {
                        (*p, *q)
                    } else {
                        (*q, *p)
                    };
                    chain_end = b;
                    chain.push(PlanarEdge::Seg { a, b });
                }
                None => return Err(ClipError::OpenChain),
            }
        }
        loops.push(chain);
    }
    Ok(loops)
}

/// Sample points along a loop for centroid estimation. Arcs get a vertex
/// roughly every 2° of sweep.
fn sample_loop(edges: &[PlanarEdge]) -> Vec<P2> {
    let mut pts = Vec::new();
    for e in edges {
        match e {
            PlanarEdge::Seg { a, .. } => pts.push(*a),
            PlanarEdge::Arc {
                center,
                radius,
                start,
                end,
            } => {
                let steps = (((end - start).abs() / (2.0 * PI) * 180.0).ceil() as usize).max(2);
                for i in 0..steps {
                    let t = *start + (end - start) * i as f64 / steps as f64;
                    pts.push(on_circle(*center, *radius, t));
                }
            }
        }
    }
    pts
}

/// Convenience constructors used by the kernel and its tests.
impl Region {
    /// Counter-clockwise circle of `radius` about `center`.
    pub fn disk(center: P2, radius: f64) -> Region {
        Region {
            loops: vec![vec![PlanarEdge::Arc {
                center,
                radius,
                start: 0.0,
                end: 2.0 * PI,
            }]],
        }
    }

    /// Circle of `outer` with a concentric hole of `inner`.
    pub fn annulus(center: P2, inner: f64, outer: f64) -> Region {
        Region {
            loops: vec![
                vec![PlanarEdge::Arc {
                    center,
                    radius: outer,
                    start: 0.0,
                    end: 2.0 * PI,
                }],
                vec![PlanarEdge::Arc {
                    center,
                    radius: inner,
                    start: 2.0 * PI,
                    end: 0.0,
                }],
            ],
        }
    }

    /// Simple polygon from vertices in order.
    pub fn polygon(vertices: &[P2]) -> Region {
        let n = vertices.len();
        let edges = (0..n)
            .map(|i| PlanarEdge::Seg {
                a: vertices[i],
                b: vertices[(i + 1) % n],
            })
            .collect();
        Region::from_loops(vec![edges])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(half: f64) -> Region {
        Region::polygon(&[[-half, -half], [half, -half], [half, half], [-half, half]])
    }

    #[test]
    fn areas_of_basic_regions() {
        assert!((square(1.0).area() - 4.0).abs() < 1e-12);
        assert!((Region::disk([0.0, 0.0], 2.0).area() - 4.0 * PI).abs() < 1e-9);
        let ann = Region::annulus([0.0, 0.0], 1.0, 2.0);
        assert!((ann.area() - 3.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn from_loops_orients_outer_ccw_and_holes_cw() {
        // Outer given clockwise, hole counter-clockwise; both get flipped.
        let outer = vec![
            PlanarEdge::Seg { a: [-2.0, -2.0], b: [-2.0, 2.0] },
            PlanarEdge::Seg { a: [-2.0, 2.0], b: [2.0, 2.0] },
            PlanarEdge::Seg { a: [2.0, 2.0], b: [2.0, -2.0] },
            PlanarEdge::Seg { a: [2.0, -2.0], b: [-2.0, -2.0] },
        ];
        let hole = vec![
            PlanarEdge::Seg { a: [-1.0, -1.0], b: [1.0, -1.0] },
            PlanarEdge::Seg { a: [1.0, -1.0], b: [1.0, 1.0] },
            PlanarEdge::Seg { a: [1.0, 1.0], b: [-1.0, 1.0] },
            PlanarEdge::Seg { a: [-1.0, 1.0], b: [-1.0, -1.0] },
        ];
        let region = Region::from_loops(vec![outer, hole]);
        assert!(loop_signed_area(&region.loops[0]) > 0.0);
        assert!(loop_signed_area(&region.loops[1]) < 0.0);
        assert!((region.area() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn clip_square_through_the_middle() {
        let r = square(1.0);
        match r.clip([0.0, 0.0], [1.0, 0.0], MODEL_EPS).unwrap() {
            ClipOutcome::Split { negative, positive } => {
                assert!((negative.area() - 2.0).abs() < 1e-12);
                assert!((positive.area() - 2.0).abs() < 1e-12);
                assert_eq!(negative.loops.len(), 1);
                assert_eq!(positive.loops.len(), 1);
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn clip_missing_the_region_reports_the_side() {
        let r = square(1.0);
        assert!(matches!(
            r.clip([5.0, 0.0], [1.0, 0.0], MODEL_EPS).unwrap(),
            ClipOutcome::AllNegative
        ));
        assert!(matches!(
            r.clip([-5.0, 0.0], [1.0, 0.0], MODEL_EPS).unwrap(),
            ClipOutcome::AllPositive
        ));
    }

    #[test]
    fn clip_disk_gives_two_half_disks_with_arc_boundaries() {
        let r = Region::disk([0.0, 0.0], 2.0);
        match r.clip([0.0, 0.0], [1.0, 0.0], MODEL_EPS).unwrap() {
            ClipOutcome::Split { negative, positive } => {
                let half = 2.0 * PI;
                assert!((negative.area() - half).abs() < 1e-9);
                assert!((positive.area() - half).abs() < 1e-9);
                // Each half is one arc plus one bridge segment.
                assert_eq!(negative.loops[0].len(), 2);
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn clip_through_a_hole_bridges_around_it() {
        let r = Region::annulus([0.0, 0.0], 1.0, 2.0);
        match r.clip([0.0, 0.0], [1.0, 0.0], MODEL_EPS).unwrap() {
            ClipOutcome::Split { negative, positive } => {
                let half = 1.5 * PI;
                assert!((negative.area() - half).abs() < 1e-9);
                assert!((positive.area() - half).abs() < 1e-9);
                // One loop around the half-annulus: two outer arc pieces,
                // two inner arc pieces, two bridges.
                assert_eq!(positive.loops.len(), 1);
                assert_eq!(positive.loops[0].len(), 6);
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn clip_through_a_polygon_vertex_pairs_crossings() {
        // Diamond with vertices on the cut line: crossings at the vertices.
        let diamond = Region::polygon(&[[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, -1.0]]);
        match diamond.clip([0.0, 0.0], [1.0, 0.0], MODEL_EPS).unwrap() {
            ClipOutcome::Split { negative, positive } => {
                assert!((negative.area() - 1.0).abs() < 1e-12);
                assert!((positive.area() - 1.0).abs() < 1e-12);
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn clip_keeping_an_untouched_hole() {
        // Square with a small off-center hole; the cut misses the hole, which
        // must survive intact on its side.
        let outer = square(2.0);
        let hole = vec![
            PlanarEdge::Seg { a: [1.0, -0.25], b: [1.5, -0.25] },
            PlanarEdge::Seg { a: [1.5, -0.25], b: [1.5, 0.25] },
            PlanarEdge::Seg { a: [1.5, 0.25], b: [1.0, 0.25] },
            PlanarEdge::Seg { a: [1.0, 0.25], b: [1.0, -0.25] },
        ];
        let mut loops = outer.loops;
        loops.push(hole);
        let region = Region::from_loops(loops);
        match region.clip([0.0, 0.0], [1.0, 0.0], MODEL_EPS).unwrap() {
            ClipOutcome::Split { negative, positive } => {
                assert!((negative.area() - 8.0).abs() < 1e-12);
                assert!((positive.area() - 7.75).abs() < 1e-12);
                assert_eq!(negative.loops.len(), 1);
                assert_eq!(positive.loops.len(), 2);
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn fingerprints_ignore_edge_order_but_see_geometry() {
        let a = square(1.0);
        let mut rotated_edges = a.loops[0].clone();
        rotated_edges.rotate_left(2);
        let b = Region { loops: vec![rotated_edges] };
        assert_eq!(a.fingerprint(1e-6), b.fingerprint(1e-6));
        assert_ne!(a.fingerprint(1e-6), square(1.1).fingerprint(1e-6));
        let shifted = a.translated([0.5, 0.0]);
        assert_ne!(a.fingerprint(1e-6), shifted.fingerprint(1e-6));
    }

    #[test]
    fn centroid_of_offset_disk() {
        let d = Region::disk([3.0, -1.0], 1.5);
        let c = d.centroid();
        assert!((c[0] - 3.0).abs() < 1e-3);
        assert!((c[1] + 1.0).abs() < 1e-3);
    }
}
