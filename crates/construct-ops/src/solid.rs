use tracing::debug;

use rig_kernel::{Kernel, MergeMode};
use rig_types::{Axis, CurveSegment, Material, Profile, Vec3};

use crate::registry::{BodyKey, BodyRecord, BodyRegistry, OpKind, Provenance};
use crate::types::ConstructionError;

/// Extrudes `profile` along `direction` and registers the result as a root
/// body tagged with `material`.
pub fn extrude(
    kernel: &mut dyn Kernel,
    registry: &mut BodyRegistry,
    profile: &Profile,
    direction: Vec3,
    length: f64,
    merge: MergeMode,
    material: Material,
) -> Result<BodyKey, ConstructionError> {
    let face = kernel.planar_face(profile)?;
    let handle = kernel.extrude_face(face, direction, length, merge)?;
    debug!(length, material = material.label(), "extruded body");
    Ok(registry.append_root(BodyRecord {
        handle,
        material,
        provenance: Provenance::created(OpKind::Extrude),
    }))
}

/// Revolves `profile` about `axis` by `angle` radians.
pub fn revolve(
    kernel: &mut dyn Kernel,
    registry: &mut BodyRegistry,
    profile: &Profile,
    axis: &Axis,
    angle: f64,
    merge: MergeMode,
    material: Material,
) -> Result<BodyKey, ConstructionError> {
    let face = kernel.planar_face(profile)?;
    let handle = kernel.revolve_face(face, axis, angle, merge)?;
    debug!(angle, material = material.label(), "revolved body");
    Ok(registry.append_root(BodyRecord {
        handle,
        material,
        provenance: Provenance::created(OpKind::Revolve),
    }))
}

/// Sweeps `profile` along `path`.
pub fn sweep(
    kernel: &mut dyn Kernel,
    registry: &mut BodyRegistry,
    profile: &Profile,
    path: &CurveSegment,
    merge: MergeMode,
    material: Material,
) -> Result<BodyKey, ConstructionError> {
    let face = kernel.planar_face(profile)?;
    let handle = kernel.sweep_face(face, path, merge)?;
    Ok(registry.append_root(BodyRecord {
        handle,
        material,
        provenance: Provenance::created(OpKind::Sweep),
    }))
}
