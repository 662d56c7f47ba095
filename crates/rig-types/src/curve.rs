use serde::{Deserialize, Serialize};

use crate::geom::{Frame, Point3};

/// A bounded curve segment in model space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CurveSegment {
    /// Straight segment from `start` to `end`.
    Line { start: Point3, end: Point3 },
    /// Circular arc in the plane of `frame`, swept from `start_angle` to
    /// `end_angle` (radians, measured from `dir_x` towards `dir_y`).
    /// A decreasing angle range is a clockwise arc.
    Arc {
        frame: Frame,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

impl CurveSegment {
    pub fn start_point(&self) -> Point3 {
        match self {
            CurveSegment::Line { start, .. } => *start,
            CurveSegment::Arc {
                frame,
                radius,
                start_angle,
                ..
            } => frame.point_at(radius * start_angle.cos(), radius * start_angle.sin()),
        }
    }

    pub fn end_point(&self) -> Point3 {
        match self {
            CurveSegment::Line { end, .. } => *end,
            CurveSegment::Arc {
                frame,
                radius,
                end_angle,
                ..
            } => frame.point_at(radius * end_angle.cos(), radius * end_angle.sin()),
        }
    }

    /// Arc length of the segment.
    pub fn length(&self) -> f64 {
        match self {
            CurveSegment::Line { start, end } => start.distance_to(end),
            CurveSegment::Arc {
                radius,
                start_angle,
                end_angle,
                ..
            } => radius * (end_angle - start_angle).abs(),
        }
    }

    /// A full circle starts and ends at the same point.
    pub fn is_closed(&self, tol: f64) -> bool {
        self.start_point().distance_to(&self.end_point()) <= tol
    }
}

/// A closed chain of connected curve segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveLoop {
    pub segments: Vec<CurveSegment>,
}

/// A validated planar profile: one or more closed loops lying in a common
/// plane. Loop containment follows the even-odd rule, so a loop inside
/// another loop bounds a hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub plane: Frame,
    pub loops: Vec<CurveLoop>,
}

impl Profile {
    pub fn segment_count(&self) -> usize {
        self.loops.iter().map(|l| l.segments.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn arc_endpoints_lie_on_the_circle() {
        let arc = CurveSegment::Arc {
            frame: Frame::xy_at(0.0),
            radius: 2.0,
            start_angle: 0.0,
            end_angle: PI / 2.0,
        };
        let s = arc.start_point();
        let e = arc.end_point();
        assert!((s.x - 2.0).abs() < 1e-12 && s.y.abs() < 1e-12);
        assert!(e.x.abs() < 1e-12 && (e.y - 2.0).abs() < 1e-12);
        assert!((arc.length() - PI).abs() < 1e-12);
    }

    #[test]
    fn full_circle_is_closed() {
        let circle = CurveSegment::Arc {
            frame: Frame::xy_at(0.0),
            radius: 1.0,
            start_angle: 0.0,
            end_angle: 2.0 * PI,
        };
        assert!(circle.is_closed(1e-9));
    }
}
