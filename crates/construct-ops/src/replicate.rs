use tracing::debug;
use uuid::Uuid;

use rig_kernel::Kernel;
use rig_types::Vec3;

use crate::component::{Component, ComponentTree};
use crate::registry::{BodyRecord, BodyRegistry, OpKind, Provenance};
use crate::types::ConstructionError;

/// Tiles a component along `step`, producing `count - 1` copies so that
/// `count` instances exist in total. Each copy is a full deep copy of the
/// component's bodies, registered as its own component with the same name
/// and kind. Returns the new component indices in tiling order.
pub fn replicate_component(
    kernel: &mut dyn Kernel,
    registry: &mut BodyRegistry,
    tree: &mut ComponentTree,
    index: usize,
    step: Vec3,
    count: usize,
) -> Result<Vec<usize>, ConstructionError> {
    if count < 1 {
        return Err(ConstructionError::BadReplicaCount(count));
    }
    let source = tree.component(index)?.clone();
    let mut created = Vec::with_capacity(count - 1);
    for i in 1..count {
        let offset = step.scaled(i as f64);
        let mut bodies = Vec::with_capacity(source.bodies.len());
        for key in &source.bodies {
            let record = registry
                .get(*key)
                .cloned()
                .ok_or(ConstructionError::UnknownBody(*key))?;
            let handle = kernel.copy_solid(&record.handle, offset)?;
            bodies.push(registry.register_detached(BodyRecord {
                handle,
                material: record.material,
                provenance: Provenance::derived(OpKind::Copy, *key),
            }));
        }
        created.push(tree.push(Component {
            id: Uuid::new_v4(),
            name: source.name.clone(),
            kind: source.kind,
            bodies,
        }));
    }
    debug!(index, copies = created.len(), "replicated component");
    Ok(created)
}

/// Rigid translation of every body in a component.
pub fn translate_component(
    kernel: &mut dyn Kernel,
    registry: &BodyRegistry,
    tree: &ComponentTree,
    index: usize,
    offset: Vec3,
) -> Result<(), ConstructionError> {
    for key in &tree.component(index)?.bodies {
        let record = registry
            .get(*key)
            .ok_or(ConstructionError::UnknownBody(*key))?;
        kernel.translate_solid(&record.handle, offset)?;
    }
    Ok(())
}

/// Deep copy of a whole component at a fixed offset, e.g. duplicating an
/// inlet stabilizer at the outlet.
pub fn copy_component(
    kernel: &mut dyn Kernel,
    registry: &mut BodyRegistry,
    tree: &mut ComponentTree,
    index: usize,
    offset: Vec3,
) -> Result<usize, ConstructionError> {
    let source = tree.component(index)?.clone();
    let mut bodies = Vec::with_capacity(source.bodies.len());
    for key in &source.bodies {
        let record = registry
            .get(*key)
            .cloned()
            .ok_or(ConstructionError::UnknownBody(*key))?;
        let handle = kernel.copy_solid(&record.handle, offset)?;
        bodies.push(registry.register_detached(BodyRecord {
            handle,
            material: record.material,
            provenance: Provenance::derived(OpKind::Copy, *key),
        }));
    }
    Ok(tree.push(Component {
        id: Uuid::new_v4(),
        name: source.name,
        kind: source.kind,
        bodies,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;
    use crate::profile::ProfileBuilder;
    use crate::solid;
    use rig_kernel::{KernelIntrospect, MergeMode, PrismKernel};
    use rig_types::{Frame, Material, Point3};

    fn cell(kernel: &mut PrismKernel, registry: &mut BodyRegistry) {
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
            5.0,
            MergeMode::ForceIndependent,
            Material::Fluid,
        )
        .unwrap();
    }

    #[test]
    fn replication_produces_count_instances_in_total() {
        let mut kernel = PrismKernel::new();
        let mut registry = BodyRegistry::new();
        let mut tree = ComponentTree::new();
        cell(&mut kernel, &mut registry);
        let source = tree
            .group_root(&mut registry, "test", ComponentKind::Cell)
            .unwrap();

        let copies = replicate_component(
            &mut kernel,
            &mut registry,
            &mut tree,
            source,
            Vec3::new(0.0, 0.0, 5.0),
            4,
        )
        .unwrap();
        assert_eq!(copies.len(), 3);
        assert_eq!(tree.components().len(), 4);
        assert_eq!(registry.len(), 4);

        // Copy i sits at z offset 5 * i.
        let last = tree.component(copies[2]).unwrap();
        let record = registry.get(last.bodies[0]).unwrap();
        let bottom = kernel
            .solid_faces(&record.handle)
            .unwrap()
            .into_iter()
            .find_map(|f| {
                let s = kernel.face_signature(&record.handle, f)?;
                (s.normal[2] < -0.5).then_some(s)
            })
            .unwrap();
        assert!((bottom.centroid.z - 15.0).abs() < 1e-9);
        // Copies carry the source component's name and kind.
        assert_eq!(last.name, "test");
        assert_eq!(last.kind, ComponentKind::Cell);
    }

    #[test]
    fn replication_count_one_is_a_no_op() {
        let mut kernel = PrismKernel::new();
        let mut registry = BodyRegistry::new();
        let mut tree = ComponentTree::new();
        cell(&mut kernel, &mut registry);
        let source = tree
            .group_root(&mut registry, "test", ComponentKind::Cell)
            .unwrap();
        let copies = replicate_component(
            &mut kernel,
            &mut registry,
            &mut tree,
            source,
            Vec3::new(0.0, 0.0, 5.0),
            1,
        )
        .unwrap();
        assert!(copies.is_empty());
        assert_eq!(tree.components().len(), 1);
    }
}
