use rig_types::{Axis, CurveSegment, EdgeSignature, FaceSignature, Plane, Profile, Vec3};

use crate::types::{KernelError, KernelId, MergeMode, SolidHandle, SplitResult, UnifyStats};

/// Construction side of the geometry-kernel contract.
///
/// All mutating operations go through this trait, so the modeling layer never
/// touches kernel internals. The supplied [`crate::PrismKernel`] covers the
/// prismatic and axisymmetric shapes the test rigs need; a full B-rep kernel
/// can be substituted behind the same trait.
pub trait Kernel {
    /// Registers a planar profile as a pending face for a later sweep.
    /// The face is consumed by whichever sweep uses it.
    fn planar_face(&mut self, profile: &Profile) -> Result<KernelId, KernelError>;

    /// Linear sweep of a pending face.
    fn extrude_face(
        &mut self,
        face: KernelId,
        direction: Vec3,
        length: f64,
        merge: MergeMode,
    ) -> Result<SolidHandle, KernelError>;

    /// Rotational sweep of a pending face about `axis`. `angle` is in
    /// radians; `2π` produces a closed ring.
    fn revolve_face(
        &mut self,
        face: KernelId,
        axis: &Axis,
        angle: f64,
        merge: MergeMode,
    ) -> Result<SolidHandle, KernelError>;

    /// Sweep of a pending face along a path curve.
    fn sweep_face(
        &mut self,
        face: KernelId,
        path: &CurveSegment,
        merge: MergeMode,
    ) -> Result<SolidHandle, KernelError>;

    /// Splits a solid by an unbounded plane into the two closed fragments on
    /// either side of it. The input handle is consumed.
    fn split_solid(&mut self, solid: &SolidHandle, cutter: &Plane)
        -> Result<SplitResult, KernelError>;

    /// Moves a solid in place. The handle stays valid.
    fn translate_solid(&mut self, solid: &SolidHandle, offset: Vec3) -> Result<(), KernelError>;

    /// Creates a translated copy, leaving the original untouched.
    fn copy_solid(&mut self, solid: &SolidHandle, offset: Vec3)
        -> Result<SolidHandle, KernelError>;

    /// Fuses solids into one body. The inputs are consumed.
    fn merge_solids(&mut self, solids: &[SolidHandle]) -> Result<SolidHandle, KernelError>;

    /// Fuses coincident boundary faces between the given solids so that each
    /// interface is represented once and shared by both bodies. Faces match
    /// when their geometry agrees within `tol`.
    fn unify_topology(
        &mut self,
        solids: &[SolidHandle],
        tol: f64,
    ) -> Result<UnifyStats, KernelError>;

    /// Removes a solid and its exclusive entities.
    fn delete_solid(&mut self, solid: &SolidHandle) -> Result<(), KernelError>;
}

/// Read-only interrogation side of the kernel contract.
pub trait KernelIntrospect {
    /// Faces bounding a solid, in deterministic construction order.
    fn solid_faces(&self, solid: &SolidHandle) -> Result<Vec<KernelId>, KernelError>;

    /// Signature of a face as seen from one of its bodies. A shared face
    /// reports the outward normal of the queried body. `None` when the face
    /// is not a boundary of that solid.
    fn face_signature(&self, solid: &SolidHandle, face: KernelId) -> Option<FaceSignature>;

    /// Edges bounding a face.
    fn face_edges(&self, face: KernelId) -> Result<Vec<KernelId>, KernelError>;

    fn edge_signature(&self, edge: KernelId) -> Option<EdgeSignature>;

    /// Number of solids using a face: 1 for an exterior boundary face, 2 for
    /// an interface shared after unification.
    fn face_use_count(&self, face: KernelId) -> usize;
}

/// Both halves of the kernel contract behind one object-safe seam, for code
/// that holds a kernel as a trait object.
pub trait KernelBundle: Kernel {
    fn introspect(&self) -> &dyn KernelIntrospect;

    fn kernel_mut(&mut self) -> &mut dyn Kernel;
}

impl<K> KernelBundle for K
where
    K: Kernel + KernelIntrospect,
{
    fn introspect(&self) -> &dyn KernelIntrospect {
        self
    }

    fn kernel_mut(&mut self) -> &mut dyn Kernel {
        self
    }
}
