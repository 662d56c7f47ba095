//! Analytic kernel for prismatic and axisymmetric solids.
//!
//! Every solid is a planar cross-section region swept along Z over an
//! interval `[z0, z1]`. That covers all the bodies a periodic test rig is
//! assembled from, and it makes face areas and edge spans exact: no
//! tessellation, no boolean robustness problems. Splitting is supported for
//! axial cutters (normal along Z, splitting the interval) and in-plane
//! cutters (normal perpendicular to Z, clipping the cross-section).

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};

use tracing::{debug, info};

use rig_types::{
    Axis, CurveKind, CurveSegment, EdgeSignature, FaceSignature, Plane, Point3, Profile,
    SurfaceKind, Vec3,
};

use crate::planar::{ClipOutcome, PlanarEdge, Region, MODEL_EPS, P2};
use crate::traits::{Kernel, KernelIntrospect};
use crate::types::{KernelError, KernelId, MergeMode, SolidHandle, SplitResult, UnifyStats};

/// Cosine threshold for treating a direction as axial (or in-plane).
const AXIAL_COS: f64 = 0.99;

#[derive(Debug, Clone)]
struct PrismSolid {
    z0: f64,
    z1: f64,
    region: Region,
    /// Bottom cap, top cap, then one wall per boundary edge.
    faces: Vec<u64>,
}

#[derive(Debug, Clone)]
enum FaceShape {
    /// Horizontal cap at height `z`, covering the cross-section.
    Cap { z: f64, region: Region },
    /// Vertical wall swept from one boundary edge.
    Wall { edge: PlanarEdge, z0: f64, z1: f64 },
}

#[derive(Debug, Clone)]
struct FaceData {
    shape: FaceShape,
    /// Outward unit normal for the first use of the face.
    normal: [f64; 3],
    edges: Vec<u64>,
    /// (solid id, sense) for every body bounded by this face. The outward
    /// normal seen from a body is `normal * sense`.
    uses: Vec<(u64, f64)>,
}

#[derive(Debug, Clone)]
struct EdgeData {
    curve: CurveKind,
    span: f64,
    midpoint: Point3,
}

/// The in-tree [`Kernel`] implementation.
#[derive(Debug, Default)]
pub struct PrismKernel {
    next_id: u64,
    pending_faces: HashMap<u64, Profile>,
    solids: HashMap<u64, PrismSolid>,
    faces: HashMap<u64, FaceData>,
    edges: HashMap<u64, EdgeData>,
}

impl PrismKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn solid(&self, handle: &SolidHandle) -> Result<&PrismSolid, KernelError> {
        self.solids
            .get(&handle.0)
            .ok_or(KernelError::SolidNotFound(handle.0))
    }

    fn register_solid(&mut self, region: Region, z0: f64, z1: f64) -> SolidHandle {
        let id = self.fresh_id();
        self.solids.insert(
            id,
            PrismSolid {
                z0,
                z1,
                region,
                faces: Vec::new(),
            },
        );
        self.build_topology(id);
        SolidHandle(id)
    }

    /// Creates the face and edge entities for a solid's current geometry.
    fn build_topology(&mut self, solid_id: u64) {
        let solid = self.solids.get(&solid_id).cloned().unwrap_or_else(|| {
            unreachable!("build_topology on missing solid {solid_id}");
        });
        let (z0, z1) = (solid.z0, solid.z1);
        let zm = (z0 + z1) * 0.5;

        let mut bottom_edges: Vec<u64> = Vec::new();
        let mut top_edges: Vec<u64> = Vec::new();
        // Per loop: (bottom ids, top ids, vertical ids aligned with edge starts).
        let mut loop_edges: Vec<(Vec<u64>, Vec<u64>, Vec<u64>)> = Vec::new();

        for lp in &solid.region.loops {
            let mut bots = Vec::new();
            let mut tops = Vec::new();
            for edge in lp {
                let bot = self.fresh_id();
                self.edges.insert(bot, cap_edge_data(edge, z0));
                let top = self.fresh_id();
                self.edges.insert(top, cap_edge_data(edge, z1));
                bottom_edges.push(bot);
                top_edges.push(top);
                bots.push(bot);
                tops.push(top);
            }
            // A loop made of one closed circle has no vertices.
            let closed_single = lp.len() == 1 && {
                let e = &lp[0];
                distance2(e.start(), e.end()) <= MODEL_EPS
            };
            let mut verts = Vec::new();
            if !closed_single {
                for edge in lp {
                    let v = edge.start();
                    let id = self.fresh_id();
                    self.edges.insert(
                        id,
                        EdgeData {
                            curve: CurveKind::Line,
                            span: z1 - z0,
                            midpoint: Point3::new(v[0], v[1], zm),
                        },
                    );
                    verts.push(id);
                }
            }
            loop_edges.push((bots, tops, verts));
        }

        let mut face_ids = Vec::new();
        let bottom = self.fresh_id();
        self.faces.insert(
            bottom,
            FaceData {
                shape: FaceShape::Cap {
                    z: z0,
                    region: solid.region.clone(),
                },
                normal: [0.0, 0.0, -1.0],
                edges: bottom_edges,
                uses: vec![(solid_id, 1.0)],
            },
        );
        face_ids.push(bottom);
        let top = self.fresh_id();
        self.faces.insert(
            top,
            FaceData {
                shape: FaceShape::Cap {
                    z: z1,
                    region: solid.region.clone(),
                },
                normal: [0.0, 0.0, 1.0],
                edges: top_edges,
                uses: vec![(solid_id, 1.0)],
            },
        );
        face_ids.push(top);

        for (lp, (bots, tops, verts)) in solid.region.loops.iter().zip(&loop_edges) {
            for (i, edge) in lp.iter().enumerate() {
                let mut edges = vec![bots[i], tops[i]];
                if !verts.is_empty() {
                    let next = (i + 1) % lp.len();
                    edges.push(verts[i]);
                    if next != i {
                        edges.push(verts[next]);
                    }
                }
                let id = self.fresh_id();
                self.faces.insert(
                    id,
                    FaceData {
                        shape: FaceShape::Wall {
                            edge: edge.clone(),
                            z0,
                            z1,
                        },
                        normal: wall_outward_normal(edge),
                        edges,
                        uses: vec![(solid_id, 1.0)],
                    },
                );
                face_ids.push(id);
            }
        }

        if let Some(s) = self.solids.get_mut(&solid_id) {
            s.faces = face_ids;
        }
    }

    /// Drops a solid's face entities (keeping faces still used by another
    /// body) and garbage-collects edges nothing references any more.
    fn remove_topology(&mut self, solid_id: u64) {
        let face_ids = match self.solids.get_mut(&solid_id) {
            Some(s) => std::mem::take(&mut s.faces),
            None => return,
        };
        let mut edge_candidates: Vec<u64> = Vec::new();
        for fid in face_ids {
            let remove = if let Some(face) = self.faces.get_mut(&fid) {
                face.uses.retain(|(sid, _)| *sid != solid_id);
                face.uses.is_empty()
            } else {
                false
            };
            if remove {
                if let Some(face) = self.faces.remove(&fid) {
                    edge_candidates.extend(face.edges);
                }
            }
        }
        if edge_candidates.is_empty() {
            return;
        }
        let referenced: HashSet<u64> = self
            .faces
            .values()
            .flat_map(|f| f.edges.iter().copied())
            .collect();
        for eid in edge_candidates {
            if !referenced.contains(&eid) {
                self.edges.remove(&eid);
            }
        }
    }

    fn take_pending(&mut self, face: KernelId) -> Result<Profile, KernelError> {
        self.pending_faces
            .remove(&face.0)
            .ok_or(KernelError::FaceNotFound(face.0))
    }

    fn face_fingerprint(&self, face: &FaceData, grid: f64) -> u64 {
        let mut hasher = DefaultHasher::new();
        match &face.shape {
            FaceShape::Cap { z, region } => {
                (0u8, quantize(*z, grid), region.fingerprint(grid)).hash(&mut hasher);
            }
            FaceShape::Wall { edge, z0, z1 } => {
                (
                    1u8,
                    edge.quantized(grid),
                    quantize(*z0, grid),
                    quantize(*z1, grid),
                )
                    .hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    /// Registers a new solid, fusing it into an abutting solid with the
    /// same cross-section when the merge mode asks for it.
    fn register_or_extend(
        &mut self,
        region: Region,
        z0: f64,
        z1: f64,
        merge: MergeMode,
    ) -> SolidHandle {
        if merge == MergeMode::Add {
            let fp = region.fingerprint(MODEL_EPS);
            let candidate = self.solids.iter().find_map(|(id, s)| {
                let abuts = (s.z1 - z0).abs() <= MODEL_EPS || (s.z0 - z1).abs() <= MODEL_EPS;
                (abuts && s.region.fingerprint(MODEL_EPS) == fp).then_some(*id)
            });
            if let Some(other) = candidate {
                let existing = self.solids[&other].clone();
                let merged_z0 = existing.z0.min(z0);
                let merged_z1 = existing.z1.max(z1);
                self.remove_topology(other);
                self.solids.remove(&other);
                return self.register_solid(region, merged_z0, merged_z1);
            }
        }
        self.register_solid(region, z0, z1)
    }

    fn face_geometry(&self, face: &FaceData) -> (SurfaceKind, f64, Point3) {
        match &face.shape {
            FaceShape::Cap { z, region } => {
                let c = region.centroid();
                (SurfaceKind::Planar, region.area(), Point3::new(c[0], c[1], *z))
            }
            FaceShape::Wall { edge, z0, z1 } => {
                let m = edge.midpoint();
                let kind = match edge {
                    PlanarEdge::Seg { .. } => SurfaceKind::Planar,
                    PlanarEdge::Arc { .. } => SurfaceKind::Cylindrical,
                };
                (
                    kind,
                    edge.length() * (z1 - z0),
                    Point3::new(m[0], m[1], (z0 + z1) * 0.5),
                )
            }
        }
    }
}

fn quantize(x: f64, grid: f64) -> i64 {
    (x / grid).round() as i64
}

fn distance2(a: P2, b: P2) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

fn cap_edge_data(edge: &PlanarEdge, z: f64) -> EdgeData {
    let m = edge.midpoint();
    EdgeData {
        curve: match edge {
            PlanarEdge::Seg { .. } => CurveKind::Line,
            PlanarEdge::Arc { .. } => CurveKind::Arc,
        },
        span: edge.span(),
        midpoint: Point3::new(m[0], m[1], z),
    }
}

fn wall_outward_normal(edge: &PlanarEdge) -> [f64; 3] {
    match edge {
        PlanarEdge::Seg { a, b } => {
            let dx = b[0] - a[0];
            let dy = b[1] - a[1];
            let len = (dx * dx + dy * dy).sqrt();
            // Right-hand side of the walk direction: outward for CCW outer
            // loops and CW hole loops alike.
            [dy / len, -dx / len, 0.0]
        }
        PlanarEdge::Arc { start, end, .. } => {
            let mid = (start + end) * 0.5;
            let radial = [mid.cos(), mid.sin()];
            if end > start {
                [radial[0], radial[1], 0.0]
            } else {
                [-radial[0], -radial[1], 0.0]
            }
        }
    }
}

/// Converts a profile lying in a Z-normal plane to a cross-section region.
fn region_from_xy_profile(profile: &Profile) -> Result<(Region, f64), KernelError> {
    let normal = profile.plane.normal();
    if normal.z() < AXIAL_COS {
        return Err(KernelError::Unsupported {
            reason: "sweep profile must lie in a plane with normal +Z".into(),
        });
    }
    if profile.loops.is_empty() {
        return Err(KernelError::DegenerateProfile {
            reason: "profile has no loops".into(),
        });
    }
    let z = profile.plane.origin.z;
    let mut loops = Vec::new();
    for lp in &profile.loops {
        if lp.segments.is_empty() {
            return Err(KernelError::DegenerateProfile {
                reason: "profile contains an empty loop".into(),
            });
        }
        let mut edges = Vec::new();
        for seg in &lp.segments {
            match seg {
                CurveSegment::Line { start, end } => {
                    edges.push(PlanarEdge::Seg {
                        a: [start.x, start.y],
                        b: [end.x, end.y],
                    });
                }
                CurveSegment::Arc {
                    frame,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    if frame.normal().z() < AXIAL_COS {
                        return Err(KernelError::Unsupported {
                            reason: "arc frame must have normal +Z".into(),
                        });
                    }
                    // Frame axes may be rotated against world X/Y.
                    let offset = frame.dir_x.y().atan2(frame.dir_x.x());
                    edges.push(PlanarEdge::Arc {
                        center: [frame.origin.x, frame.origin.y],
                        radius: *radius,
                        start: start_angle + offset,
                        end: end_angle + offset,
                    });
                }
            }
        }
        // Loops must chain end to end.
        for i in 0..edges.len() {
            let j = (i + 1) % edges.len();
            if distance2(edges[i].end(), edges[j].start()) > 1e-6 {
                return Err(KernelError::DegenerateProfile {
                    reason: "profile loop is not closed".into(),
                });
            }
        }
        loops.push(edges);
    }
    Ok((Region::from_loops(loops), z))
}

/// Extracts the (radial, z) rectangle of a revolve profile.
fn revolve_rectangle(
    profile: &Profile,
    axis: &Axis,
) -> Result<(f64, f64, f64, f64), KernelError> {
    let normal = profile.plane.normal();
    let radial = Vec3::new(0.0, 0.0, 1.0).cross(&normal.as_vec());
    let radial = radial.direction().ok_or(KernelError::Unsupported {
        reason: "revolve profile plane must contain the axis direction".into(),
    })?;
    let lp = match profile.loops.as_slice() {
        [single] => single,
        _ => {
            return Err(KernelError::Unsupported {
                reason: "revolve profile must be a single rectangular loop".into(),
            })
        }
    };
    let mut rs = Vec::new();
    let mut zs = Vec::new();
    for seg in &lp.segments {
        let p = match seg {
            CurveSegment::Line { start, .. } => start,
            CurveSegment::Arc { .. } => {
                return Err(KernelError::Unsupported {
                    reason: "revolve profile must be bounded by straight edges".into(),
                })
            }
        };
        let d = Vec3::new(
            p.x - axis.origin.x,
            p.y - axis.origin.y,
            p.z - axis.origin.z,
        );
        rs.push(d.dot(&radial.as_vec()));
        zs.push(p.z);
    }
    // Each edge of the rectangle must be radial- or z-aligned.
    let n = rs.len();
    if n != 4 {
        return Err(KernelError::Unsupported {
            reason: "revolve profile must be a rectangle".into(),
        });
    }
    for i in 0..n {
        let j = (i + 1) % n;
        let dr = (rs[j] - rs[i]).abs();
        let dz = (zs[j] - zs[i]).abs();
        if dr > MODEL_EPS && dz > MODEL_EPS {
            return Err(KernelError::Unsupported {
                reason: "revolve profile rectangle must be axis-aligned".into(),
            });
        }
    }
    let (mut r0, mut r1) = (
        rs.iter().cloned().fold(f64::INFINITY, f64::min),
        rs.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    );
    if r1 <= MODEL_EPS {
        // Profile sits on the negative radial side; mirror it.
        let (a, b) = (-r1, -r0);
        r0 = a;
        r1 = b;
    }
    if r0 < -MODEL_EPS {
        return Err(KernelError::Unsupported {
            reason: "revolve profile must not straddle the axis".into(),
        });
    }
    let z0 = zs.iter().cloned().fold(f64::INFINITY, f64::min);
    let z1 = zs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if r1 - r0 <= MODEL_EPS || z1 - z0 <= MODEL_EPS {
        return Err(KernelError::DegenerateProfile {
            reason: "revolve rectangle has zero extent".into(),
        });
    }
    Ok((r0.max(0.0), r1, z0, z1))
}

impl Kernel for PrismKernel {
    fn planar_face(&mut self, profile: &Profile) -> Result<KernelId, KernelError> {
        if profile.loops.is_empty() || profile.loops.iter().any(|l| l.segments.is_empty()) {
            return Err(KernelError::DegenerateProfile {
                reason: "profile has no boundary".into(),
            });
        }
        let id = self.fresh_id();
        self.pending_faces.insert(id, profile.clone());
        Ok(KernelId(id))
    }

    fn extrude_face(
        &mut self,
        face: KernelId,
        direction: Vec3,
        length: f64,
        merge: MergeMode,
    ) -> Result<SolidHandle, KernelError> {
        if length <= MODEL_EPS {
            return Err(KernelError::InvalidParameter {
                reason: format!("extrude length must be positive, got {length}"),
            });
        }
        let dir = direction.direction().ok_or(KernelError::InvalidParameter {
            reason: "extrude direction is degenerate".into(),
        })?;
        if dir.z().abs() < AXIAL_COS {
            return Err(KernelError::Unsupported {
                reason: "extrude direction must be axial".into(),
            });
        }
        let profile = self.take_pending(face)?;
        let (region, plane_z) = region_from_xy_profile(&profile)?;
        let (z0, z1) = if dir.z() > 0.0 {
            (plane_z, plane_z + length)
        } else {
            (plane_z - length, plane_z)
        };
        debug!(z0, z1, loops = region.loops.len(), "extrude");
        Ok(self.register_or_extend(region, z0, z1, merge))
    }

    fn revolve_face(
        &mut self,
        face: KernelId,
        axis: &Axis,
        angle: f64,
        merge: MergeMode,
    ) -> Result<SolidHandle, KernelError> {
        if axis.direction.z().abs() < AXIAL_COS {
            return Err(KernelError::Unsupported {
                reason: "revolve axis must be axial".into(),
            });
        }
        if angle <= MODEL_EPS || angle > 2.0 * PI + 1e-9 {
            return Err(KernelError::InvalidParameter {
                reason: format!("revolve angle must be in (0, 2π], got {angle}"),
            });
        }
        let profile = self.take_pending(face)?;
        let (r0, r1, z0, z1) = revolve_rectangle(&profile, axis)?;
        let center = [axis.origin.x, axis.origin.y];
        debug!(r0, r1, z0, z1, angle, "revolve");

        let full = (angle - 2.0 * PI).abs() <= 1e-9;
        let region = if full {
            if r0 <= MODEL_EPS {
                Region::disk(center, r1)
            } else {
                Region::annulus(center, r0, r1)
            }
        } else {
            sector_region(center, r0, r1, angle)
        };
        Ok(self.register_or_extend(region, z0, z1, merge))
    }

    fn sweep_face(
        &mut self,
        face: KernelId,
        path: &CurveSegment,
        merge: MergeMode,
    ) -> Result<SolidHandle, KernelError> {
        match path {
            CurveSegment::Line { start, end } => {
                let dir = Vec3::new(end.x - start.x, end.y - start.y, end.z - start.z);
                let length = dir.norm();
                self.extrude_face(face, dir, length, merge)
            }
            CurveSegment::Arc { .. } => Err(KernelError::Unsupported {
                reason: "sweep path must be a straight segment".into(),
            }),
        }
    }

    fn split_solid(
        &mut self,
        solid: &SolidHandle,
        cutter: &Plane,
    ) -> Result<SplitResult, KernelError> {
        let body = self.solid(solid)?.clone();
        let n = cutter.normal;
        debug!(solid = solid.0, "split");

        if n.z().abs() >= AXIAL_COS {
            let c = cutter.origin.z;
            if c <= body.z0 + MODEL_EPS || c >= body.z1 - MODEL_EPS {
                return Err(KernelError::CutMissesSolid);
            }
            self.remove_topology(solid.0);
            self.solids.remove(&solid.0);
            let below = self.register_solid(body.region.clone(), body.z0, c);
            let above = self.register_solid(body.region, c, body.z1);
            let (negative, positive) = if n.z() > 0.0 {
                (below, above)
            } else {
                (above, below)
            };
            return Ok(SplitResult { negative, positive });
        }

        if n.z().abs() <= 1.0 - AXIAL_COS {
            let n2_len = (n.x() * n.x() + n.y() * n.y()).sqrt();
            let n2 = [n.x() / n2_len, n.y() / n2_len];
            let o2 = [cutter.origin.x, cutter.origin.y];
            let outcome = body
                .region
                .clip(o2, n2, MODEL_EPS)
                .map_err(|e| KernelError::Unsupported {
                    reason: format!("in-plane split failed: {e}"),
                })?;
            return match outcome {
                ClipOutcome::AllNegative | ClipOutcome::AllPositive => {
                    Err(KernelError::CutMissesSolid)
                }
                ClipOutcome::Split { negative, positive } => {
                    self.remove_topology(solid.0);
                    self.solids.remove(&solid.0);
                    let neg = self.register_solid(negative, body.z0, body.z1);
                    let pos = self.register_solid(positive, body.z0, body.z1);
                    Ok(SplitResult {
                        negative: neg,
                        positive: pos,
                    })
                }
            };
        }

        Err(KernelError::Unsupported {
            reason: "cutter plane must be axial or in-plane".into(),
        })
    }

    fn translate_solid(&mut self, solid: &SolidHandle, offset: Vec3) -> Result<(), KernelError> {
        self.solid(solid)?;
        self.remove_topology(solid.0);
        let s = self
            .solids
            .get_mut(&solid.0)
            .ok_or(KernelError::SolidNotFound(solid.0))?;
        s.z0 += offset.z;
        s.z1 += offset.z;
        s.region = s.region.translated([offset.x, offset.y]);
        self.build_topology(solid.0);
        Ok(())
    }

    fn copy_solid(
        &mut self,
        solid: &SolidHandle,
        offset: Vec3,
    ) -> Result<SolidHandle, KernelError> {
        let body = self.solid(solid)?.clone();
        Ok(self.register_solid(
            body.region.translated([offset.x, offset.y]),
            body.z0 + offset.z,
            body.z1 + offset.z,
        ))
    }

    fn merge_solids(&mut self, solids: &[SolidHandle]) -> Result<SolidHandle, KernelError> {
        if solids.len() < 2 {
            return Err(KernelError::InvalidParameter {
                reason: "merge needs at least two solids".into(),
            });
        }
        let mut parts: Vec<PrismSolid> = Vec::new();
        for h in solids {
            parts.push(self.solid(h)?.clone());
        }
        let fp = parts[0].region.fingerprint(MODEL_EPS);
        if parts.iter().any(|p| p.region.fingerprint(MODEL_EPS) != fp) {
            return Err(KernelError::Unsupported {
                reason: "merged solids must share a cross-section".into(),
            });
        }
        parts.sort_by(|a, b| a.z0.partial_cmp(&b.z0).unwrap_or(std::cmp::Ordering::Equal));
        for pair in parts.windows(2) {
            if (pair[1].z0 - pair[0].z1).abs() > MODEL_EPS {
                return Err(KernelError::Unsupported {
                    reason: "merged solids must abut along the axis".into(),
                });
            }
        }
        let region = parts[0].region.clone();
        let z0 = parts[0].z0;
        let z1 = parts.last().map(|p| p.z1).unwrap_or(z0);
        for h in solids {
            self.remove_topology(h.0);
            self.solids.remove(&h.0);
        }
        Ok(self.register_solid(region, z0, z1))
    }

    fn unify_topology(
        &mut self,
        solids: &[SolidHandle],
        tol: f64,
    ) -> Result<UnifyStats, KernelError> {
        let grid = tol.max(1e-9);
        let mut face_ids: Vec<u64> = Vec::new();
        for h in solids {
            face_ids.extend(self.solid(h)?.faces.iter().copied());
        }
        face_ids.sort_unstable();
        face_ids.dedup();

        let mut buckets: HashMap<u64, Vec<u64>> = HashMap::new();
        for fid in &face_ids {
            if let Some(face) = self.faces.get(fid) {
                buckets
                    .entry(self.face_fingerprint(face, grid))
                    .or_default()
                    .push(*fid);
            }
        }

        let mut merged = 0usize;
        let mut keys: Vec<u64> = buckets.keys().copied().collect();
        keys.sort_unstable();
        for key in keys {
            let ids = &buckets[&key];
            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    let (keep, drop) = (ids[i], ids[j]);
                    let (Some(a), Some(b)) = (self.faces.get(&keep), self.faces.get(&drop)) else {
                        continue;
                    };
                    if a.uses.len() != 1 || b.uses.len() != 1 || a.uses[0].0 == b.uses[0].0 {
                        continue;
                    }
                    let (_, area_a, centroid_a) = self.face_geometry(a);
                    let (_, area_b, centroid_b) = self.face_geometry(b);
                    if (area_a - area_b).abs() > tol
                        || centroid_a.distance_to(&centroid_b) > tol
                    {
                        continue;
                    }
                    let sense = if a.normal[0] * b.normal[0]
                        + a.normal[1] * b.normal[1]
                        + a.normal[2] * b.normal[2]
                        > 0.0
                    {
                        1.0
                    } else {
                        -1.0
                    };
                    let other_owner = b.uses[0].0;
                    let Some(dropped) = self.faces.remove(&drop) else {
                        continue;
                    };
                    if let Some(kept) = self.faces.get_mut(&keep) {
                        kept.uses.push((other_owner, sense));
                    }
                    if let Some(owner) = self.solids.get_mut(&other_owner) {
                        for f in owner.faces.iter_mut() {
                            if *f == drop {
                                *f = keep;
                            }
                        }
                    }
                    // The dropped face's edges stay alive through the owner's
                    // caps and neighbouring walls.
                    drop_unreferenced_edges(&mut self.edges, &self.faces, dropped.edges);
                    merged += 1;
                }
            }
        }
        info!(merged, faces = face_ids.len(), "topology unified");
        Ok(UnifyStats {
            merged_faces: merged,
        })
    }

    fn delete_solid(&mut self, solid: &SolidHandle) -> Result<(), KernelError> {
        self.solid(solid)?;
        self.remove_topology(solid.0);
        self.solids.remove(&solid.0);
        Ok(())
    }
}

fn drop_unreferenced_edges(
    edges: &mut HashMap<u64, EdgeData>,
    faces: &HashMap<u64, FaceData>,
    candidates: Vec<u64>,
) {
    if candidates.is_empty() {
        return;
    }
    let referenced: HashSet<u64> = faces.values().flat_map(|f| f.edges.iter().copied()).collect();
    for eid in candidates {
        if !referenced.contains(&eid) {
            edges.remove(&eid);
        }
    }
}

fn sector_region(center: P2, r0: f64, r1: f64, angle: f64) -> Region {
    let outer = PlanarEdge::Arc {
        center,
        radius: r1,
        start: 0.0,
        end: angle,
    };
    let at = |r: f64, a: f64| {
        [center[0] + r * a.cos(), center[1] + r * a.sin()]
    };
    if r0 <= MODEL_EPS {
        Region {
            loops: vec![vec![
                outer,
                PlanarEdge::Seg {
                    a: at(r1, angle),
                    b: center,
                },
                PlanarEdge::Seg {
                    a: center,
                    b: at(r1, 0.0),
                },
            ]],
        }
    } else {
        Region {
            loops: vec![vec![
                outer,
                PlanarEdge::Seg {
                    a: at(r1, angle),
                    b: at(r0, angle),
                },
                PlanarEdge::Arc {
                    center,
                    radius: r0,
                    start: angle,
                    end: 0.0,
                },
                PlanarEdge::Seg {
                    a: at(r0, 0.0),
                    b: at(r1, 0.0),
                },
            ]],
        }
    }
}

impl KernelIntrospect for PrismKernel {
    fn solid_faces(&self, solid: &SolidHandle) -> Result<Vec<KernelId>, KernelError> {
        Ok(self.solid(solid)?.faces.iter().map(|f| KernelId(*f)).collect())
    }

    fn face_signature(&self, solid: &SolidHandle, face: KernelId) -> Option<FaceSignature> {
        let data = self.faces.get(&face.0)?;
        let sense = data
            .uses
            .iter()
            .find(|(sid, _)| *sid == solid.0)
            .map(|(_, s)| *s)?;
        let (surface, area, centroid) = self.face_geometry(data);
        Some(FaceSignature {
            surface,
            area,
            centroid,
            normal: [
                data.normal[0] * sense,
                data.normal[1] * sense,
                data.normal[2] * sense,
            ],
        })
    }

    fn face_edges(&self, face: KernelId) -> Result<Vec<KernelId>, KernelError> {
        self.faces
            .get(&face.0)
            .map(|f| f.edges.iter().map(|e| KernelId(*e)).collect())
            .ok_or(KernelError::FaceNotFound(face.0))
    }

    fn edge_signature(&self, edge: KernelId) -> Option<EdgeSignature> {
        self.edges.get(&edge.0).map(|e| EdgeSignature {
            curve: e.curve,
            span: e.span,
            midpoint: e.midpoint,
        })
    }

    fn face_use_count(&self, face: KernelId) -> usize {
        self.faces.get(&face.0).map(|f| f.uses.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_types::{CurveLoop, Direction3, Frame};

    fn square_profile(half: f64, z: f64) -> Profile {
        let pts = [
            Point3::new(-half, -half, z),
            Point3::new(half, -half, z),
            Point3::new(half, half, z),
            Point3::new(-half, half, z),
        ];
        let segments = (0..4)
            .map(|i| CurveSegment::Line {
                start: pts[i],
                end: pts[(i + 1) % 4],
            })
            .collect();
        Profile {
            plane: Frame::xy_at(z),
            loops: vec![CurveLoop { segments }],
        }
    }

    fn rect_profile_yz(y0: f64, y1: f64, z0: f64, z1: f64) -> Profile {
        let pts = [
            Point3::new(0.0, y0, z0),
            Point3::new(0.0, y1, z0),
            Point3::new(0.0, y1, z1),
            Point3::new(0.0, y0, z1),
        ];
        let segments = (0..4)
            .map(|i| CurveSegment::Line {
                start: pts[i],
                end: pts[(i + 1) % 4],
            })
            .collect();
        Profile {
            plane: Frame::yz(),
            loops: vec![CurveLoop { segments }],
        }
    }

    fn extrude_cube(kernel: &mut PrismKernel, half: f64, height: f64) -> SolidHandle {
        let face = kernel.planar_face(&square_profile(half, 0.0)).unwrap();
        kernel
            .extrude_face(
                face,
                Direction3::POS_Z.as_vec(),
                height,
                MergeMode::ForceIndependent,
            )
            .unwrap()
    }

    #[test]
    fn extruded_box_has_expected_topology() {
        let mut kernel = PrismKernel::new();
        let solid = extrude_cube(&mut kernel, 1.0, 3.0);
        let faces = kernel.solid_faces(&solid).unwrap();
        assert_eq!(faces.len(), 6);

        let sigs: Vec<FaceSignature> = faces
            .iter()
            .map(|f| kernel.face_signature(&solid, *f).unwrap())
            .collect();
        let caps: Vec<&FaceSignature> =
            sigs.iter().filter(|s| s.normal[2].abs() > 0.5).collect();
        assert_eq!(caps.len(), 2);
        for cap in caps {
            assert!((cap.area - 4.0).abs() < 1e-9);
        }
        let walls: Vec<&FaceSignature> =
            sigs.iter().filter(|s| s.normal[2].abs() < 0.5).collect();
        assert_eq!(walls.len(), 4);
        for wall in walls {
            assert!((wall.area - 6.0).abs() < 1e-9);
        }

        // Each wall face is bounded by two horizontal and two vertical edges.
        let wall_id = faces
            .iter()
            .find(|f| kernel.face_signature(&solid, **f).unwrap().normal[0] > 0.5)
            .unwrap();
        let edges = kernel.face_edges(*wall_id).unwrap();
        assert_eq!(edges.len(), 4);
        let spans: Vec<f64> = edges
            .iter()
            .map(|e| kernel.edge_signature(*e).unwrap().span)
            .collect();
        assert_eq!(spans.iter().filter(|s| (**s - 2.0).abs() < 1e-9).count(), 2);
        assert_eq!(spans.iter().filter(|s| (**s - 3.0).abs() < 1e-9).count(), 2);
    }

    #[test]
    fn revolved_rectangle_makes_a_ring() {
        let mut kernel = PrismKernel::new();
        let face = kernel
            .planar_face(&rect_profile_yz(4.8, 5.0, 0.0, 2.0))
            .unwrap();
        let solid = kernel
            .revolve_face(face, &Axis::world_z(), 2.0 * PI, MergeMode::ForceIndependent)
            .unwrap();
        let faces = kernel.solid_faces(&solid).unwrap();
        // Bottom and top annular caps, outer and inner cylinder walls.
        assert_eq!(faces.len(), 4);
        let sigs: Vec<FaceSignature> = faces
            .iter()
            .map(|f| kernel.face_signature(&solid, *f).unwrap())
            .collect();
        let outer = sigs
            .iter()
            .find(|s| s.surface == SurfaceKind::Cylindrical && s.normal[0] > 0.0)
            .unwrap();
        assert!((outer.area - 2.0 * PI * 5.0 * 2.0).abs() < 1e-9);
        let inner = sigs
            .iter()
            .find(|s| s.surface == SurfaceKind::Cylindrical && s.normal[0] < 0.0)
            .unwrap();
        assert!((inner.area - 2.0 * PI * 4.8 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn quarter_revolve_has_planar_flanks_and_angular_edges() {
        let mut kernel = PrismKernel::new();
        let face = kernel
            .planar_face(&rect_profile_yz(4.8, 5.0, 0.0, 2.0))
            .unwrap();
        let solid = kernel
            .revolve_face(face, &Axis::world_z(), PI / 2.0, MergeMode::ForceIndependent)
            .unwrap();
        let faces = kernel.solid_faces(&solid).unwrap();
        // Two caps, outer and inner walls, two flat flanks.
        assert_eq!(faces.len(), 6);
        let arc_edge_spans: Vec<f64> = faces
            .iter()
            .flat_map(|f| kernel.face_edges(*f).unwrap())
            .filter_map(|e| kernel.edge_signature(e))
            .filter(|s| s.curve == CurveKind::Arc)
            .map(|s| s.span)
            .collect();
        assert!(!arc_edge_spans.is_empty());
        for span in arc_edge_spans {
            assert!((span - PI / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn axial_split_keeps_cross_section_and_splits_the_interval() {
        let mut kernel = PrismKernel::new();
        let solid = extrude_cube(&mut kernel, 1.0, 3.0);
        let result = kernel.split_solid(&solid, &Plane::z_at(1.0)).unwrap();
        assert_eq!(kernel.solid_count(), 2);
        // Old handle is gone.
        assert!(kernel.solid_faces(&solid).is_err());

        let lower_top = kernel
            .solid_faces(&result.negative)
            .unwrap()
            .into_iter()
            .find_map(|f| {
                let s = kernel.face_signature(&result.negative, f)?;
                (s.normal[2] > 0.5).then_some(s)
            })
            .unwrap();
        assert!((lower_top.centroid.z - 1.0).abs() < 1e-9);
        let upper_walls: Vec<FaceSignature> = kernel
            .solid_faces(&result.positive)
            .unwrap()
            .into_iter()
            .filter_map(|f| kernel.face_signature(&result.positive, f))
            .filter(|s| s.normal[2].abs() < 0.5)
            .collect();
        for wall in upper_walls {
            assert!((wall.area - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn in_plane_split_clips_the_cross_section() {
        let mut kernel = PrismKernel::new();
        let solid = extrude_cube(&mut kernel, 1.0, 2.0);
        let result = kernel.split_solid(&solid, &Plane::yz()).unwrap();
        for half in [&result.negative, &result.positive] {
            let caps: Vec<FaceSignature> = kernel
                .solid_faces(half)
                .unwrap()
                .into_iter()
                .filter_map(|f| kernel.face_signature(half, f))
                .filter(|s| s.normal[2].abs() > 0.5)
                .collect();
            for cap in caps {
                assert!((cap.area - 2.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn split_misses_outside_the_body() {
        let mut kernel = PrismKernel::new();
        let solid = extrude_cube(&mut kernel, 1.0, 2.0);
        let err = kernel.split_solid(&solid, &Plane::z_at(5.0)).unwrap_err();
        assert!(matches!(err, KernelError::CutMissesSolid));
        // The solid survives a missed cut.
        assert_eq!(kernel.solid_count(), 1);
        let err = kernel
            .split_solid(&solid, &Plane::new(Point3::new(9.0, 0.0, 0.0), Direction3::POS_X))
            .unwrap_err();
        assert!(matches!(err, KernelError::CutMissesSolid));
    }

    #[test]
    fn copy_translate_offsets_signatures() {
        let mut kernel = PrismKernel::new();
        let solid = extrude_cube(&mut kernel, 1.0, 2.0);
        let copy = kernel
            .copy_solid(&solid, Vec3::new(0.0, 0.0, 10.0))
            .unwrap();
        let bottom = kernel
            .solid_faces(&copy)
            .unwrap()
            .into_iter()
            .find_map(|f| {
                let s = kernel.face_signature(&copy, f)?;
                (s.normal[2] < -0.5).then_some(s)
            })
            .unwrap();
        assert!((bottom.centroid.z - 10.0).abs() < 1e-9);

        kernel.translate_solid(&solid, Vec3::new(3.0, 0.0, 0.0)).unwrap();
        let cap = kernel
            .solid_faces(&solid)
            .unwrap()
            .into_iter()
            .find_map(|f| {
                let s = kernel.face_signature(&solid, f)?;
                (s.normal[2] > 0.5).then_some(s)
            })
            .unwrap();
        assert!((cap.centroid.x - 3.0).abs() < 1e-6);
    }

    #[test]
    fn unify_shares_the_interface_with_opposite_normals() {
        let mut kernel = PrismKernel::new();
        let lower = extrude_cube(&mut kernel, 1.0, 1.0);
        let upper = kernel.copy_solid(&lower, Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let stats = kernel
            .unify_topology(&[lower.clone(), upper.clone()], 0.2)
            .unwrap();
        assert_eq!(stats.merged_faces, 1);

        let shared: Vec<KernelId> = kernel
            .solid_faces(&lower)
            .unwrap()
            .into_iter()
            .filter(|f| kernel.face_use_count(*f) == 2)
            .collect();
        assert_eq!(shared.len(), 1);
        let from_lower = kernel.face_signature(&lower, shared[0]).unwrap();
        let from_upper = kernel.face_signature(&upper, shared[0]).unwrap();
        assert!(from_lower.normal[2] > 0.5);
        assert!(from_upper.normal[2] < -0.5);
        // Boundary faces still report a single use.
        let boundary = kernel
            .solid_faces(&lower)
            .unwrap()
            .into_iter()
            .filter(|f| kernel.face_use_count(*f) == 1)
            .count();
        assert_eq!(boundary, 5);
    }

    #[test]
    fn merge_stacks_same_section_solids() {
        let mut kernel = PrismKernel::new();
        let a = extrude_cube(&mut kernel, 1.0, 1.0);
        let b = kernel.copy_solid(&a, Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let merged = kernel.merge_solids(&[a, b]).unwrap();
        assert_eq!(kernel.solid_count(), 1);
        let walls: Vec<FaceSignature> = kernel
            .solid_faces(&merged)
            .unwrap()
            .into_iter()
            .filter_map(|f| kernel.face_signature(&merged, f))
            .filter(|s| s.normal[2].abs() < 0.5)
            .collect();
        for wall in walls {
            assert!((wall.area - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn add_mode_extends_an_abutting_revolve() {
        let mut kernel = PrismKernel::new();
        let face = kernel
            .planar_face(&rect_profile_yz(4.8, 5.0, 0.0, 1.0))
            .unwrap();
        let _lower = kernel
            .revolve_face(face, &Axis::world_z(), 2.0 * PI, MergeMode::ForceIndependent)
            .unwrap();
        let face = kernel
            .planar_face(&rect_profile_yz(4.8, 5.0, 1.0, 2.0))
            .unwrap();
        let fused = kernel
            .revolve_face(face, &Axis::world_z(), 2.0 * PI, MergeMode::Add)
            .unwrap();
        assert_eq!(kernel.solid_count(), 1);
        let top = kernel
            .solid_faces(&fused)
            .unwrap()
            .into_iter()
            .find_map(|f| {
                let s = kernel.face_signature(&fused, f)?;
                (s.normal[2] > 0.5).then_some(s)
            })
            .unwrap();
        assert!((top.centroid.z - 2.0).abs() < 1e-9);
    }

    #[test]
    fn add_mode_extends_an_abutting_extrusion() {
        let mut kernel = PrismKernel::new();
        let _base = extrude_cube(&mut kernel, 1.0, 1.0);
        let face = kernel.planar_face(&square_profile(1.0, 1.0)).unwrap();
        let fused = kernel
            .extrude_face(face, Direction3::POS_Z.as_vec(), 1.0, MergeMode::Add)
            .unwrap();
        assert_eq!(kernel.solid_count(), 1);
        let top = kernel
            .solid_faces(&fused)
            .unwrap()
            .into_iter()
            .find_map(|f| {
                let s = kernel.face_signature(&fused, f)?;
                (s.normal[2] > 0.5).then_some(s)
            })
            .unwrap();
        assert!((top.centroid.z - 2.0).abs() < 1e-9);
    }
}
