use serde::{Deserialize, Serialize};

use rig_types::{approx_eq, EdgeSignature, FaceSignature};

/// Normal component sign below this magnitude counts as zero, so cylinder
/// walls never satisfy an axial-sign predicate.
const SIGN_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CoordAxis {
    X,
    Y,
    Z,
}

impl CoordAxis {
    fn component(&self, v: [f64; 3]) -> f64 {
        match self {
            CoordAxis::X => v[0],
            CoordAxis::Y => v[1],
            CoordAxis::Z => v[2],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Sign {
    Positive,
    Negative,
}

/// Signature of an entity being classified, as seen from the body it was
/// gathered through.
#[derive(Debug, Clone)]
pub enum EntitySignature {
    Face(FaceSignature),
    Edge(EdgeSignature),
}

/// Declarative selection predicate over entity signatures.
///
/// Quantity comparisons are relative, scaled by the reference value the
/// predicate carries (see [`rig_types::approx_eq`]). A predicate aimed at the
/// wrong entity kind simply never matches, so one group query can run over a
/// mixed gather without pre-filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Predicate {
    /// Face area equals `value`.
    AreaEq { value: f64 },
    /// Edge span equals `value`: arc length for straight edges, subtended
    /// angle for arc edges.
    SpanEq { value: f64 },
    /// Representative point coordinate equals `value` (face centroid, edge
    /// midpoint).
    CoordEq { axis: CoordAxis, value: f64 },
    /// Outward face normal points along the positive or negative `axis`.
    NormalSign { axis: CoordAxis, sign: Sign },
    /// Any sub-predicate matches.
    AnyOf { preds: Vec<Predicate> },
    /// All sub-predicates match.
    AllOf { preds: Vec<Predicate> },
}

impl Predicate {
    pub fn area(value: f64) -> Predicate {
        Predicate::AreaEq { value }
    }

    pub fn span(value: f64) -> Predicate {
        Predicate::SpanEq { value }
    }

    pub fn coord(axis: CoordAxis, value: f64) -> Predicate {
        Predicate::CoordEq { axis, value }
    }

    pub fn normal(axis: CoordAxis, sign: Sign) -> Predicate {
        Predicate::NormalSign { axis, sign }
    }

    pub fn any_of(preds: Vec<Predicate>) -> Predicate {
        Predicate::AnyOf { preds }
    }

    pub fn all_of(preds: Vec<Predicate>) -> Predicate {
        Predicate::AllOf { preds }
    }

    pub fn matches(&self, sig: &EntitySignature, rel_tol: f64) -> bool {
        match self {
            Predicate::AreaEq { value } => match sig {
                EntitySignature::Face(f) => approx_eq(f.area, *value, rel_tol),
                EntitySignature::Edge(_) => false,
            },
            Predicate::SpanEq { value } => match sig {
                EntitySignature::Edge(e) => approx_eq(e.span, *value, rel_tol),
                EntitySignature::Face(_) => false,
            },
            Predicate::CoordEq { axis, value } => {
                let p = match sig {
                    EntitySignature::Face(f) => f.centroid,
                    EntitySignature::Edge(e) => e.midpoint,
                };
                approx_eq(axis.component(p.to_array()), *value, rel_tol)
            }
            Predicate::NormalSign { axis, sign } => match sig {
                EntitySignature::Face(f) => {
                    let c = axis.component(f.normal);
                    match sign {
                        Sign::Positive => c > SIGN_EPS,
                        Sign::Negative => c < -SIGN_EPS,
                    }
                }
                EntitySignature::Edge(_) => false,
            },
            Predicate::AnyOf { preds } => preds.iter().any(|p| p.matches(sig, rel_tol)),
            Predicate::AllOf { preds } => preds.iter().all(|p| p.matches(sig, rel_tol)),
        }
    }
}
