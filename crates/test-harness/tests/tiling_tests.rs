//! Replication and topology unification over simple stacks.

use construct_ops::{
    replicate_component, unify_all, BodyRegistry, ComponentKind, ComponentTree,
};
use rig_kernel::{KernelIntrospect, PrismKernel};
use rig_types::{Material, Vec3};
use test_harness::helpers::square_block;

#[test]
fn tiling_a_block_merges_one_interface_per_junction() {
    let mut kernel = PrismKernel::new();
    let mut registry = BodyRegistry::new();
    let mut tree = ComponentTree::new();

    square_block(&mut kernel, &mut registry, 1.0, 2.0, Material::Fluid);
    let cell = tree
        .group_root(&mut registry, "stack", ComponentKind::Cell)
        .unwrap();
    replicate_component(
        &mut kernel,
        &mut registry,
        &mut tree,
        cell,
        Vec3::new(0.0, 0.0, 2.0),
        4,
    )
    .unwrap();
    assert_eq!(registry.len(), 4);

    let stats = unify_all(&mut kernel, &registry, 0.1).unwrap();
    assert_eq!(stats.merged_faces, 3);

    // The shared caps are now seen by two bodies each.
    let shared: usize = registry
        .iter()
        .flat_map(|(_, record)| kernel.solid_faces(&record.handle).unwrap())
        .filter(|f| kernel.face_use_count(*f) == 2)
        .count();
    // Each interface is counted once from each of its two bodies.
    assert_eq!(shared, 6);
}

#[test]
fn replicas_inherit_name_kind_and_material() {
    let mut kernel = PrismKernel::new();
    let mut registry = BodyRegistry::new();
    let mut tree = ComponentTree::new();

    square_block(&mut kernel, &mut registry, 1.0, 1.0, Material::Solid);
    let cell = tree
        .group_root(&mut registry, "stack", ComponentKind::Cell)
        .unwrap();
    let copies = replicate_component(
        &mut kernel,
        &mut registry,
        &mut tree,
        cell,
        Vec3::new(0.0, 0.0, 1.0),
        3,
    )
    .unwrap();
    assert_eq!(copies.len(), 2);
    for index in copies {
        let component = tree.component(index).unwrap();
        assert_eq!(component.name, "stack");
        assert_eq!(component.kind, ComponentKind::Cell);
    }
    assert_eq!(registry.material_bodies(Material::Solid).len(), 3);
}
