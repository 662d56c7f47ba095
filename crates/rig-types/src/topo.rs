use serde::{Deserialize, Serialize};

use crate::geom::Point3;

/// The kind of topological entity a selection group holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TopoKind {
    Edge,
    Face,
    Body,
}

/// Surface classification of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurfaceKind {
    Planar,
    Cylindrical,
}

/// Curve classification of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CurveKind {
    Line,
    Arc,
}

/// Geometric signature of a face as seen from one of its bodies.
///
/// A face shared between two bodies reports the outward normal of whichever
/// body it was queried through; the two uses see opposite normals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceSignature {
    pub surface: SurfaceKind,
    pub area: f64,
    pub centroid: Point3,
    /// Outward unit normal. For cylindrical faces this is sampled at the
    /// centroid parameter and always has zero axial component.
    pub normal: [f64; 3],
}

/// Geometric signature of an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSignature {
    pub curve: CurveKind,
    /// Parametric span: length for lines, subtended angle in radians for arcs.
    pub span: f64,
    pub midpoint: Point3,
}
