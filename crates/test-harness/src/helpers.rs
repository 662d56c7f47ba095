//! Scene constructors shared by the integration scenarios.

use construct_ops::{solid, BodyKey, BodyRegistry, ProfileBuilder};
use rig_kernel::{Kernel, MergeMode};
use rig_types::{Frame, Material, Point3, Profile, Vec3};

/// A square cross-section of the given half-width drawn at z = 0.
pub fn square_profile(half: f64) -> Profile {
    ProfileBuilder::new(Frame::xy_at(0.0))
        .polygon(&[
            Point3::new(-half, -half, 0.0),
            Point3::new(half, -half, 0.0),
            Point3::new(half, half, 0.0),
            Point3::new(-half, half, 0.0),
        ])
        .finish()
        .expect("square profile is well formed")
}

/// Extrudes a square block of the given height and registers it as a root
/// body.
pub fn square_block(
    kernel: &mut dyn Kernel,
    registry: &mut BodyRegistry,
    half: f64,
    height: f64,
    material: Material,
) -> BodyKey {
    solid::extrude(
        kernel,
        registry,
        &square_profile(half),
        Vec3::new(0.0, 0.0, 1.0),
        height,
        MergeMode::ForceIndependent,
        material,
    )
    .expect("block extrusion succeeds")
}
