use serde::{Deserialize, Serialize};
use tracing::debug;

use rig_kernel::{Kernel, KernelError};
use rig_types::Plane;

use crate::registry::{BodyKey, BodyRecord, BodyRegistry, OpKind, Provenance};
use crate::types::PartitionError;

/// What to do when a cutter plane does not intersect a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MissPolicy {
    /// A missed cut is a parameter mistake; fail the operation.
    ErrorOnMiss,
    /// Leave the body untouched and continue.
    SkipOnMiss,
}

#[derive(Debug, Clone, Copy)]
pub struct SplitOutcome {
    /// Body occupying the input body's registry slot after the cut. This is
    /// the fragment on the negative side of the cutter normal, or the
    /// untouched input when a miss was skipped.
    pub kept: BodyKey,
    /// Fragment on the positive side, appended at the end of the root list.
    /// `None` when a miss was skipped.
    pub split_off: Option<BodyKey>,
}

/// Cuts one body by an unbounded plane.
///
/// Both fragments are new bodies with fresh keys; they inherit the input
/// body's material tag. The negative-side fragment takes over the input
/// body's root slot so that index-based cut sequences stay stable.
pub fn split_body(
    kernel: &mut dyn Kernel,
    registry: &mut BodyRegistry,
    body: BodyKey,
    cutter: &Plane,
    policy: MissPolicy,
) -> Result<SplitOutcome, PartitionError> {
    let record = registry
        .get(body)
        .cloned()
        .ok_or(PartitionError::UnknownBody(body))?;
    match kernel.split_solid(&record.handle, cutter) {
        Ok(result) => {
            let kept = registry
                .replace(
                    body,
                    BodyRecord {
                        handle: result.negative,
                        material: record.material,
                        provenance: Provenance::derived(OpKind::Split, body),
                    },
                )
                .ok_or(PartitionError::UnknownBody(body))?;
            let split_off = registry.append_root(BodyRecord {
                handle: result.positive,
                material: record.material,
                provenance: Provenance::derived(OpKind::Split, body),
            });
            debug!(?kept, ?split_off, "split body");
            Ok(SplitOutcome {
                kept,
                split_off: Some(split_off),
            })
        }
        Err(KernelError::CutMissesSolid) if policy == MissPolicy::SkipOnMiss => {
            debug!(?body, "cutter missed, skipped");
            Ok(SplitOutcome {
                kept: body,
                split_off: None,
            })
        }
        Err(KernelError::CutMissesSolid) => Err(PartitionError::Missed { body }),
        Err(e) => Err(PartitionError::Kernel(e)),
    }
}

/// Cuts each listed body in order with the same plane. Fragments appear at
/// the end of the root list in cut order.
pub fn split_bodies(
    kernel: &mut dyn Kernel,
    registry: &mut BodyRegistry,
    bodies: &[BodyKey],
    cutter: &Plane,
    policy: MissPolicy,
) -> Result<Vec<SplitOutcome>, PartitionError> {
    bodies
        .iter()
        .map(|b| split_body(kernel, registry, *b, cutter, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileBuilder;
    use crate::solid;
    use rig_kernel::{MergeMode, PrismKernel};
    use rig_types::{Frame, Material, Point3, Vec3};

    fn prism(kernel: &mut PrismKernel, registry: &mut BodyRegistry, height: f64) -> BodyKey {
        let profile = ProfileBuilder::new(Frame::xy_at(0.0))
            .polygon(&[
                Point3::new(-1.0, -1.0, 0.0),
                Point3::new(1.0, -1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(-1.0, 1.0, 0.0),
            ])
            .finish()
            .unwrap();
        solid::extrude(
            kernel,
            registry,
            &profile,
            Vec3::new(0.0, 0.0, 1.0),
            height,
            MergeMode::ForceIndependent,
            Material::Fluid,
        )
        .unwrap()
    }

    #[test]
    fn split_keeps_the_slot_and_appends_the_rest() {
        let mut kernel = PrismKernel::new();
        let mut registry = BodyRegistry::new();
        let a = prism(&mut kernel, &mut registry, 2.0);
        let b = prism(&mut kernel, &mut registry, 2.0);

        let outcome =
            split_body(&mut kernel, &mut registry, a, &Plane::z_at(1.0), MissPolicy::ErrorOnMiss)
                .unwrap();
        let off = outcome.split_off.unwrap();
        assert_eq!(registry.root_bodies(), &[outcome.kept, b, off]);
        assert!(!registry.contains(a));
        // Fragments inherit the material and record their parentage.
        let kept = registry.get(outcome.kept).unwrap();
        assert_eq!(kept.material, Material::Fluid);
        assert_eq!(kept.provenance.op, OpKind::Split);
        assert_eq!(kept.provenance.parent, Some(a));
    }

    #[test]
    fn missed_cut_respects_the_policy() {
        let mut kernel = PrismKernel::new();
        let mut registry = BodyRegistry::new();
        let a = prism(&mut kernel, &mut registry, 2.0);

        let err =
            split_body(&mut kernel, &mut registry, a, &Plane::z_at(9.0), MissPolicy::ErrorOnMiss)
                .unwrap_err();
        assert!(matches!(err, PartitionError::Missed { .. }));

        let outcome =
            split_body(&mut kernel, &mut registry, a, &Plane::z_at(9.0), MissPolicy::SkipOnMiss)
                .unwrap();
        assert_eq!(outcome.kept, a);
        assert!(outcome.split_off.is_none());
        assert_eq!(registry.root_bodies(), &[a]);
    }

    #[test]
    fn scripted_cut_sequence_keeps_indices_stable() {
        // Two bodies, both cut by the same plane; a second cut then addresses
        // one of the appended fragments by position.
        let mut kernel = PrismKernel::new();
        let mut registry = BodyRegistry::new();
        prism(&mut kernel, &mut registry, 4.0);
        prism(&mut kernel, &mut registry, 4.0);

        let targets: Vec<BodyKey> = registry.root_bodies().to_vec();
        split_bodies(
            &mut kernel,
            &mut registry,
            &targets,
            &Plane::z_at(1.0),
            MissPolicy::ErrorOnMiss,
        )
        .unwrap();
        // Slots 0,1 hold the lower fragments; 2,3 the upper ones.
        assert_eq!(registry.root_bodies().len(), 4);
        let upper = registry.root_bodies()[2];
        let outcome = split_body(
            &mut kernel,
            &mut registry,
            upper,
            &Plane::z_at(2.0),
            MissPolicy::ErrorOnMiss,
        )
        .unwrap();
        assert_eq!(registry.root_bodies().len(), 5);
        assert_eq!(registry.root_bodies()[2], outcome.kept);
    }
}
