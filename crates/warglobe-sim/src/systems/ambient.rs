//! Ambient rotation of the globe, atmosphere and starfield.

use warglobe_core::constants::{
    ATMOSPHERE_ROTATION_PER_FRAME, GLOBE_ROTATION_PER_FRAME, STARS_ROTATION_PER_FRAME,
};
use warglobe_core::state::GlobeView;

/// Rotation angles, advanced a fixed amount per frame while enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlobeState {
    pub rotation: f64,
    pub atmosphere_rotation: f64,
    pub stars_rotation: f64,
    pub enabled: bool,
}

impl GlobeState {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    pub fn view(&self) -> GlobeView {
        GlobeView {
            rotation: self.rotation,
            atmosphere_rotation: self.atmosphere_rotation,
            stars_rotation: self.stars_rotation,
            ambient_rotation: self.enabled,
        }
    }
}

pub fn run(globe: &mut GlobeState) {
    if !globe.enabled {
        return;
    }
    globe.rotation += GLOBE_ROTATION_PER_FRAME;
    globe.atmosphere_rotation += ATMOSPHERE_ROTATION_PER_FRAME;
    globe.stars_rotation += STARS_ROTATION_PER_FRAME;
}
