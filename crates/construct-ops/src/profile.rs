use rig_types::{CurveLoop, CurveSegment, Frame, Point3, Profile};

use crate::types::ProfileError;

/// Endpoint coincidence tolerance for loop chaining.
const CHAIN_TOL: f64 = 1e-6;

/// Accumulates curve segments on a plane and validates them into a
/// [`Profile`] of closed loops.
///
/// Segments must be appended in chain order within each loop; a new loop
/// starts whenever a segment does not continue the previous (closed) one.
/// A full circle is a one-segment loop.
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    plane: Frame,
    segments: Vec<CurveSegment>,
}

impl ProfileBuilder {
    pub fn new(plane: Frame) -> Self {
        Self {
            plane,
            segments: Vec::new(),
        }
    }

    pub fn line(mut self, start: Point3, end: Point3) -> Self {
        self.segments.push(CurveSegment::Line { start, end });
        self
    }

    /// Closed polygon through `points`, in order.
    pub fn polygon(mut self, points: &[Point3]) -> Self {
        let n = points.len();
        for i in 0..n {
            self.segments.push(CurveSegment::Line {
                start: points[i],
                end: points[(i + 1) % n],
            });
        }
        self
    }

    /// Full circle about `center`, which must lie in the profile plane.
    pub fn circle(mut self, center: Point3, radius: f64) -> Self {
        self.segments.push(CurveSegment::Arc {
            frame: Frame::new(center, self.plane.dir_x, self.plane.dir_y),
            radius,
            start_angle: 0.0,
            end_angle: 2.0 * std::f64::consts::PI,
        });
        self
    }

    pub fn arc(mut self, center: Point3, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        self.segments.push(CurveSegment::Arc {
            frame: Frame::new(center, self.plane.dir_x, self.plane.dir_y),
            radius,
            start_angle,
            end_angle,
        });
        self
    }

    pub fn finish(self) -> Result<Profile, ProfileError> {
        let ProfileBuilder { plane, segments } = self;
        if segments.is_empty() {
            return Err(ProfileError::Empty);
        }
        let normal = plane.normal();
        let off_plane = |p: &Point3| {
            let d = (p.x - plane.origin.x) * normal.x()
                + (p.y - plane.origin.y) * normal.y()
                + (p.z - plane.origin.z) * normal.z();
            d.abs() > CHAIN_TOL
        };

        for (index, seg) in segments.iter().enumerate() {
            if seg.length() <= CHAIN_TOL {
                return Err(ProfileError::DegenerateSegment { index });
            }
            if off_plane(&seg.start_point()) || off_plane(&seg.end_point()) {
                return Err(ProfileError::OffPlane { index });
            }
        }
        check_straight_edge_crossings(&segments)?;

        // Chain segments into closed loops in insertion order.
        let mut loops: Vec<CurveLoop> = Vec::new();
        let mut open: Vec<CurveSegment> = Vec::new();
        for (index, seg) in segments.into_iter().enumerate() {
            if open.is_empty() {
                open.push(seg);
                continue;
            }
            let tail = open.last().map(|s| s.end_point()).unwrap_or(Point3::ORIGIN);
            if seg.start_point().distance_to(&tail) <= CHAIN_TOL {
                open.push(seg);
            } else if loop_is_closed(&open) {
                loops.push(CurveLoop {
                    segments: std::mem::take(&mut open),
                });
                open.push(seg);
            } else {
                return Err(ProfileError::Disconnected { index });
            }
        }
        if !loop_is_closed(&open) {
            return Err(ProfileError::Unclosed);
        }
        loops.push(CurveLoop { segments: open });

        Ok(Profile { plane, loops })
    }
}

fn loop_is_closed(segments: &[CurveSegment]) -> bool {
    match (segments.first(), segments.last()) {
        (Some(first), Some(last)) => {
            last.end_point().distance_to(&first.start_point()) <= CHAIN_TOL
        }
        _ => false,
    }
}

/// Rejects profiles whose straight edges properly cross. Arc edges are only
/// checked through their chords; the callers build arcs either as full
/// circles or as boundaries disjoint from the straight edges.
fn check_straight_edge_crossings(segments: &[CurveSegment]) -> Result<(), ProfileError> {
    let lines: Vec<(usize, Point3, Point3)> = segments
        .iter()
        .enumerate()
        .filter_map(|(i, s)| match s {
            CurveSegment::Line { start, end } => Some((i, *start, *end)),
            CurveSegment::Arc { .. } => None,
        })
        .collect();
    for (ai, (first, a0, a1)) in lines.iter().enumerate() {
        for (second, b0, b1) in lines.iter().skip(ai + 1) {
            if shares_endpoint(a0, a1, b0, b1) {
                continue;
            }
            if segments_cross(a0, a1, b0, b1) {
                return Err(ProfileError::SelfIntersecting {
                    first: *first,
                    second: *second,
                });
            }
        }
    }
    Ok(())
}

fn shares_endpoint(a0: &Point3, a1: &Point3, b0: &Point3, b1: &Point3) -> bool {
    [a0, a1]
        .iter()
        .any(|p| [b0, b1].iter().any(|q| p.distance_to(q) <= CHAIN_TOL))
}

/// Proper 2D crossing test, projected to XY for axial profiles and to the
/// dominant plane otherwise.
fn segments_cross(a0: &Point3, a1: &Point3, b0: &Point3, b1: &Point3) -> bool {
    // Project out the axis with the least variation across the four points.
    let spread = |f: fn(&Point3) -> f64| {
        let vals = [f(a0), f(a1), f(b0), f(b1)];
        let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        max - min
    };
    let sx = spread(|p| p.x);
    let sy = spread(|p| p.y);
    let sz = spread(|p| p.z);
    let to2d: fn(&Point3) -> [f64; 2] = if sz <= sx && sz <= sy {
        |p| [p.x, p.y]
    } else if sy <= sx {
        |p| [p.x, p.z]
    } else {
        |p| [p.y, p.z]
    };
    let (p0, p1, q0, q1) = (to2d(a0), to2d(a1), to2d(b0), to2d(b1));
    let orient = |a: [f64; 2], b: [f64; 2], c: [f64; 2]| {
        (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
    };
    let d1 = orient(p0, p1, q0);
    let d2 = orient(p0, p1, q1);
    let d3 = orient(q0, q1, p0);
    let d4 = orient(q0, q1, p1);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
