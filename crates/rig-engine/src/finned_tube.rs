//! Builds the internally finned tube rig: a quarter-symmetric periodic
//! pipe with an annular fin per period, stabilizer sections at both ends,
//! and named selection groups for every boundary condition of the
//! conjugate heat-transfer setup.

use std::f64::consts::{FRAC_PI_2, SQRT_2, TAU};

use tracing::info;

use classify_ops::{ClassificationReport, CoordAxis, Predicate, SelectionClassifier, Sign};
use construct_ops::{
    copy_component, replicate_component, solid, split_bodies, translate_component, unify_all,
    BodyKey, BodyRegistry, ComponentKind, MissPolicy, ProfileBuilder,
};
use rig_kernel::{Kernel, MergeMode};
use rig_types::{Axis, Frame, Material, ParameterSet, Plane, Point3, Profile, Vec3};

use crate::error::EngineError;
use crate::session::BuildSession;

/// Root slots holding the solid fin fragments after the unit-cell cuts.
const FIN_SLOTS: [usize; 4] = [3, 11, 17, 23];

fn diamond_points(half_diagonal: f64) -> [Point3; 4] {
    [
        Point3::new(half_diagonal, 0.0, 0.0),
        Point3::new(0.0, half_diagonal, 0.0),
        Point3::new(-half_diagonal, 0.0, 0.0),
        Point3::new(0.0, -half_diagonal, 0.0),
    ]
}

fn ring_profile(r0: f64, r1: f64, z0: f64, z1: f64) -> Result<Profile, EngineError> {
    Ok(ProfileBuilder::new(Frame::yz())
        .polygon(&[
            Point3::new(0.0, r0, z0),
            Point3::new(0.0, r1, z0),
            Point3::new(0.0, r1, z1),
            Point3::new(0.0, r0, z1),
        ])
        .finish()?)
}

/// Resolves positional root slots to keys, then cuts them all with one
/// plane. Slots are resolved before the first cut so the scripted sequence
/// is insensitive to the fragments the cuts append.
fn cut_slots(
    kernel: &mut dyn Kernel,
    registry: &mut BodyRegistry,
    slots: &[usize],
    cutter: &Plane,
) -> Result<(), EngineError> {
    let roots = registry.root_bodies();
    let mut targets = Vec::with_capacity(slots.len());
    for slot in slots {
        targets.push(*roots.get(*slot).ok_or(EngineError::BadCutSlot {
            slot: *slot,
            available: roots.len(),
        })?);
    }
    split_bodies(kernel, registry, &targets, cutter, MissPolicy::ErrorOnMiss)?;
    Ok(())
}

fn expect_roots(
    registry: &BodyRegistry,
    stage: &'static str,
    expected: usize,
) -> Result<(), EngineError> {
    let actual = registry.root_bodies().len();
    if actual != expected {
        return Err(EngineError::UnexpectedBodyCount {
            stage,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Builds one axial period of the finned tube at z in `[0, pitch]` as 27
/// root bodies.
///
/// Five primitives: a square core prism, its circular jacket out to the fin
/// tip radius, and three revolved rings between fin tip and pipe wall (the
/// middle ring is the solid fin). Two axial cuts isolate the fin interval,
/// then two radial cuts quarter everything that touches the pipe wall.
pub fn build_unit_cell(
    kernel: &mut dyn Kernel,
    registry: &mut BodyRegistry,
    params: &ParameterSet,
) -> Result<(), EngineError> {
    let og = params.core_half_diagonal();
    let a1 = params.fin_start();
    let a2 = params.fin_end();
    let rim = params.radius - params.height;
    let up = Vec3::new(0.0, 0.0, 1.0);

    let core = ProfileBuilder::new(Frame::xy_at(0.0))
        .polygon(&diamond_points(og))
        .finish()?;
    solid::extrude(
        kernel,
        registry,
        &core,
        up,
        params.pitch,
        MergeMode::ForceIndependent,
        Material::Fluid,
    )?;

    let jacket = ProfileBuilder::new(Frame::xy_at(0.0))
        .circle(Point3::ORIGIN, rim)
        .polygon(&diamond_points(og))
        .finish()?;
    solid::extrude(
        kernel,
        registry,
        &jacket,
        up,
        params.pitch,
        MergeMode::ForceIndependent,
        Material::Fluid,
    )?;

    for (z0, z1, material) in [
        (0.0, a1, Material::Fluid),
        (a1, a2, Material::Solid),
        (a2, params.pitch, Material::Fluid),
    ] {
        let ring = ring_profile(rim, params.radius, z0, z1)?;
        solid::revolve(
            kernel,
            registry,
            &ring,
            &Axis::world_z(),
            TAU,
            MergeMode::ForceIndependent,
            material,
        )?;
    }

    // Axial cuts bracket the fin; the rings already stop at a1 and a2.
    cut_slots(kernel, registry, &[0, 1], &Plane::z_at(a1))?;
    cut_slots(kernel, registry, &[5, 6], &Plane::z_at(a2))?;
    // Radial quarter cuts. The core prism is spared: it is the o-grid
    // meshing block and stays whole.
    cut_slots(kernel, registry, &[1, 2, 3, 4, 6, 8], &Plane::xz())?;
    cut_slots(
        kernel,
        registry,
        &[1, 2, 3, 4, 6, 8, 9, 10, 11, 12, 13, 14],
        &Plane::yz(),
    )?;

    expect_roots(registry, "unit cell", 27)?;
    let fins: Vec<usize> = registry
        .root_bodies()
        .iter()
        .enumerate()
        .filter(|(_, key)| {
            registry
                .get(**key)
                .is_some_and(|record| record.material == Material::Solid)
        })
        .map(|(slot, _)| slot)
        .collect();
    if fins != FIN_SLOTS {
        return Err(EngineError::FinLayout {
            expected: FIN_SLOTS.to_vec(),
            actual: fins,
        });
    }
    Ok(())
}

/// Builds one stabilizer section at z in `[0, length_stb]` as 9 root
/// bodies: the same cross-section as the cell but without the fin, so the
/// flow develops before the periodic section.
pub fn build_stabilizer(
    kernel: &mut dyn Kernel,
    registry: &mut BodyRegistry,
    params: &ParameterSet,
) -> Result<(), EngineError> {
    let og = params.core_half_diagonal();
    let rim = params.radius - params.height;
    let up = Vec3::new(0.0, 0.0, 1.0);

    let core = ProfileBuilder::new(Frame::xy_at(0.0))
        .polygon(&diamond_points(og))
        .finish()?;
    solid::extrude(
        kernel,
        registry,
        &core,
        up,
        params.length_stb,
        MergeMode::ForceIndependent,
        Material::Fluid,
    )?;

    let jacket = ProfileBuilder::new(Frame::xy_at(0.0))
        .circle(Point3::ORIGIN, rim)
        .polygon(&diamond_points(og))
        .finish()?;
    solid::extrude(
        kernel,
        registry,
        &jacket,
        up,
        params.length_stb,
        MergeMode::ForceIndependent,
        Material::Fluid,
    )?;

    let ring = ring_profile(rim, params.radius, 0.0, params.length_stb)?;
    solid::revolve(
        kernel,
        registry,
        &ring,
        &Axis::world_z(),
        TAU,
        MergeMode::ForceIndependent,
        Material::Fluid,
    )?;

    cut_slots(kernel, registry, &[1, 2], &Plane::xz())?;
    cut_slots(kernel, registry, &[1, 2, 3, 4], &Plane::yz())?;

    expect_roots(registry, "stabilizer", 9)
}

/// Assembles the full rig: one unit cell tiled `section_count` times
/// between two stabilizers, with coincident faces unified into shared
/// interfaces.
pub fn assemble(session: &mut BuildSession, params: &ParameterSet) -> Result<(), EngineError> {
    params.validate()?;
    let sections = params.section_count();

    build_unit_cell(session.kernel.kernel_mut(), &mut session.registry, params)?;
    let cell = session
        .tree
        .group_root(&mut session.registry, "test", ComponentKind::Cell)?;
    translate_component(
        session.kernel.kernel_mut(),
        &session.registry,
        &session.tree,
        cell,
        Vec3::new(0.0, 0.0, params.length_stb),
    )?;
    replicate_component(
        session.kernel.kernel_mut(),
        &mut session.registry,
        &mut session.tree,
        cell,
        Vec3::new(0.0, 0.0, params.pitch),
        sections,
    )?;

    build_stabilizer(session.kernel.kernel_mut(), &mut session.registry, params)?;
    let stab = session
        .tree
        .group_root(&mut session.registry, "stab", ComponentKind::Stabilizer)?;
    copy_component(
        session.kernel.kernel_mut(),
        &mut session.registry,
        &mut session.tree,
        stab,
        Vec3::new(
            0.0,
            0.0,
            params.length_stb + sections as f64 * params.pitch,
        ),
    )?;

    let stats = unify_all(
        session.kernel.kernel_mut(),
        &session.registry,
        params.share_tol,
    )?;
    info!(
        sections,
        bodies = session.registry.len(),
        merged_faces = stats.merged_faces,
        "assembled rig"
    );
    Ok(())
}

/// Classifies the assembled rig into the named selection groups the solver
/// setup consumes, then checks that every exterior face was claimed.
pub fn classify(
    session: &mut BuildSession,
    params: &ParameterSet,
) -> Result<ClassificationReport, EngineError> {
    let og = params.core_half_diagonal();
    let a1 = params.fin_start();
    let rim = params.radius - params.height;

    let cells: Vec<BodyKey> = session
        .tree
        .by_kind(ComponentKind::Cell)
        .into_iter()
        .flat_map(|i| session.tree.components()[i].bodies.clone())
        .collect();
    let stabs = session.tree.by_kind(ComponentKind::Stabilizer);
    let (Some(&first), Some(&second)) = (stabs.first(), stabs.get(1)) else {
        return Err(EngineError::UnexpectedBodyCount {
            stage: "classification",
            expected: 2,
            actual: stabs.len(),
        });
    };
    let inlet_stab = session.tree.component(first)?.bodies.clone();
    let outlet_stab = session.tree.component(second)?.bodies.clone();
    let mut all_stabs = inlet_stab.clone();
    all_stabs.extend(outlet_stab.iter().copied());

    let solid_bodies = session.registry.material_bodies(Material::Solid);
    let fluid_bodies = session.registry.material_bodies(Material::Fluid);
    let all_bodies: Vec<BodyKey> = session.registry.iter().map(|(key, _)| key).collect();

    let mut classifier = SelectionClassifier::new(
        session.kernel.introspect(),
        &session.registry,
        params.rel_tol,
    );

    classifier.classify_bodies("solid", solid_bodies.clone())?;
    classifier.classify_bodies("fluid", fluid_bodies)?;

    // Inlet and outlet are the outward-facing stabilizer caps.
    classifier.classify_faces(
        "inlet",
        &inlet_stab,
        &Predicate::normal(CoordAxis::Z, Sign::Negative),
    )?;
    classifier.classify_faces(
        "outlet",
        &outlet_stab,
        &Predicate::normal(CoordAxis::Z, Sign::Positive),
    )?;
    // Pipe-wall quarter cylinders, told apart by axial extent.
    classifier.classify_faces(
        "wall-out",
        &all_stabs,
        &Predicate::area(FRAC_PI_2 * params.radius * params.length_stb),
    )?;
    classifier.classify_faces(
        "wall-fluid",
        &cells,
        &Predicate::area(FRAC_PI_2 * params.radius * a1),
    )?;
    classifier.classify_faces(
        "wall-solid",
        &solid_bodies,
        &Predicate::area(FRAC_PI_2 * params.radius * params.delta),
    )?;
    // Fin flanks and fin tip, the fluid/solid coupling interfaces.
    classifier.classify_faces(
        "sides",
        &solid_bodies,
        &Predicate::any_of(vec![
            Predicate::normal(CoordAxis::Z, Sign::Positive),
            Predicate::normal(CoordAxis::Z, Sign::Negative),
            Predicate::area(FRAC_PI_2 * rim * params.delta),
        ]),
    )?;

    // Edge groups drive mesh sizing along each characteristic length. The
    // tangential and radial lengths recur in the stabilizer cross-section,
    // so those groups scan the stabilizers too; the fin spacings exist only
    // in the cells.
    let mut cells_and_stabs = cells.clone();
    cells_and_stabs.extend(all_stabs.iter().copied());
    classifier.classify_edges(
        "tan",
        &cells_and_stabs,
        &Predicate::any_of(vec![
            Predicate::span(SQRT_2 * og),
            Predicate::span(FRAC_PI_2),
        ]),
    )?;
    classifier.classify_edges("rad1", &cells_and_stabs, &Predicate::span(params.height))?;
    classifier.classify_edges("rad2", &cells_and_stabs, &Predicate::span(rim - og))?;
    classifier.classify_edges("axi1", &cells, &Predicate::span(a1))?;
    classifier.classify_edges("axi2", &cells, &Predicate::span(params.delta))?;
    classifier.classify_edges("axi3", &all_stabs, &Predicate::span(params.length_stb))?;

    let report = classifier.report(&all_bodies)?;
    session.groups = classifier.into_store();
    if report.unclassified_boundary_faces != 0 {
        return Err(EngineError::UncoveredBoundary {
            count: report.unclassified_boundary_faces,
        });
    }
    info!(
        groups = report.groups.len(),
        boundary_faces = report.boundary_faces,
        "classified rig"
    );
    Ok(report)
}

/// Full pipeline: assemble, unify, classify.
pub fn build_rig(
    session: &mut BuildSession,
    params: &ParameterSet,
) -> Result<ClassificationReport, EngineError> {
    assemble(session, params)?;
    classify(session, params)
}
