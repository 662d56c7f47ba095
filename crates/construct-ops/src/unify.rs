use tracing::info;

use rig_kernel::{Kernel, SolidHandle, UnifyStats};

use crate::registry::BodyRegistry;
use crate::types::ConstructionError;

/// Fuses coincident interfaces across every body in the registry, whether it
/// sits at the root or inside a component. Run once, after assembly and
/// before classification, so that interior faces are shared and boundary
/// faces are single-use.
pub fn unify_all(
    kernel: &mut dyn Kernel,
    registry: &BodyRegistry,
    tol: f64,
) -> Result<UnifyStats, ConstructionError> {
    let handles: Vec<SolidHandle> = registry.iter().map(|(_, r)| r.handle.clone()).collect();
    let stats = kernel.unify_topology(&handles, tol)?;
    info!(
        bodies = handles.len(),
        merged = stats.merged_faces,
        "shared topology"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileBuilder;
    use crate::solid;
    use rig_kernel::{KernelIntrospect, MergeMode, PrismKernel};
    use rig_types::{Frame, Material, Point3, Vec3};

    #[test]
    fn stacked_bodies_share_one_interface() {
        let mut kernel = PrismKernel::new();
        let mut registry = BodyRegistry::new();
        for z in [0.0, 1.0] {
            let profile = ProfileBuilder::new(Frame::xy_at(z))
                .polygon(&[
                    Point3::new(0.0, 0.0, z),
                    Point3::new(1.0, 0.0, z),
                    Point3::new(1.0, 1.0, z),
                    Point3::new(0.0, 1.0, z),
                ])
                .finish()
                .unwrap();
            solid::extrude(
                &mut kernel,
                &mut registry,
                &profile,
                Vec3::new(0.0, 0.0, 1.0),
                1.0,
                MergeMode::ForceIndependent,
                Material::Fluid,
            )
            .unwrap();
        }
        let stats = unify_all(&mut kernel, &registry, 0.2).unwrap();
        assert_eq!(stats.merged_faces, 1);

        let shared_total: usize = registry
            .iter()
            .flat_map(|(_, r)| kernel.solid_faces(&r.handle).unwrap())
            .filter(|f| kernel.face_use_count(*f) == 2)
            .count();
        // The shared face shows up once per body.
        assert_eq!(shared_total, 2);
    }
}
