//! Corrugated-plate channel profiles.
//!
//! A plate channel is formed by two families of crossing panel strips, one
//! swept obliquely across the other. This module generates the planar panel
//! profiles and the sweep vector; the booleans joining the two families
//! need a general kernel, so assembly stops at the profile level here.

use construct_ops::ProfileBuilder;
use rig_types::{Frame, PlateParams, Point3, Profile, Vec3};

use crate::error::EngineError;

/// Emits the panel corner heights of a triangular corrugation.
///
/// Consecutive panels share their junction heights, so the wave is
/// continuous; the pattern repeats every two panels (one full ridge).
pub struct HeightCycle {
    delta: f64,
    ascent: f64,
    index: usize,
}

impl HeightCycle {
    pub fn new(delta: f64) -> Self {
        Self {
            delta,
            ascent: 2.0 * delta,
            index: 0,
        }
    }

    pub fn next_height(&mut self) -> f64 {
        let pattern = [
            0.0,
            self.delta,
            self.delta + self.ascent,
            self.ascent,
            self.ascent,
            self.delta + self.ascent,
            self.delta,
            0.0,
        ];
        let value = pattern[self.index % pattern.len()];
        self.index += 1;
        value
    }
}

/// Panel profiles running across the width, one quad per corrugation pitch,
/// drawn in the ZX plane.
pub fn x_panel_profiles(params: &PlateParams) -> Result<Vec<Profile>, EngineError> {
    params.validate()?;
    let pitch = params.pitch_x();
    let mut heights = HeightCycle::new(params.delta);
    let mut profiles = Vec::with_capacity(params.panels_x());
    for i in 0..params.panels_x() {
        let x0 = i as f64 * pitch;
        let x1 = x0 + pitch;
        let c0 = heights.next_height();
        let c1 = heights.next_height();
        let c2 = heights.next_height();
        let c3 = heights.next_height();
        let profile = ProfileBuilder::new(Frame::zx())
            .polygon(&[
                Point3::new(x0, 0.0, c0),
                Point3::new(x0, 0.0, c1),
                Point3::new(x1, 0.0, c2),
                Point3::new(x1, 0.0, c3),
            ])
            .finish()?;
        profiles.push(profile);
    }
    Ok(profiles)
}

/// Panel profiles running along the height, drawn in the YZ plane.
pub fn y_panel_profiles(params: &PlateParams) -> Result<Vec<Profile>, EngineError> {
    params.validate()?;
    let pitch = params.pitch_y();
    let mut heights = HeightCycle::new(params.delta);
    let mut profiles = Vec::with_capacity(params.panels_y());
    for i in 0..params.panels_y() {
        let y0 = i as f64 * pitch;
        let y1 = y0 + pitch;
        let c0 = heights.next_height();
        let c1 = heights.next_height();
        let c2 = heights.next_height();
        let c3 = heights.next_height();
        let profile = ProfileBuilder::new(Frame::yz())
            .polygon(&[
                Point3::new(0.0, y0, c0),
                Point3::new(0.0, y0, c1),
                Point3::new(0.0, y1, c2),
                Point3::new(0.0, y1, c3),
            ])
            .finish()?;
        profiles.push(profile);
    }
    Ok(profiles)
}

/// Direction the x-panels are swept along, inclined by the chevron angle.
pub fn sweep_direction(params: &PlateParams) -> Vec3 {
    Vec3::new(1.0, params.gamma.tan(), 0.0)
}

/// Sweep length covering the full plate width at the chevron angle.
pub fn sweep_length(params: &PlateParams) -> f64 {
    params.width / params.gamma.cos()
}
