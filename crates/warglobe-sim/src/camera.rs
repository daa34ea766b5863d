//! Camera transition controller.
//!
//! One transition at a time. Starting a new transition bumps the generation
//! and replaces the previous one; a transition whose generation no longer
//! matches is dropped on the next update without touching the camera.

use glam::{DMat4, DQuat, DVec2};

use warglobe_core::constants::{
    CAMERA_FAR, CAMERA_FOCUS_DISTANCE, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_START,
    CAMERA_TRANSITION_MS, EARTH_RADIUS,
};
use warglobe_core::state::CameraView;
use warglobe_core::types::Point3;
use warglobe_geo::project;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    pub from_position: Point3,
    pub to_position: Point3,
    pub from_target: Point3,
    pub to_target: Point3,
    pub started_ms: f64,
    pub duration_ms: f64,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct CameraController {
    position: Point3,
    target: Point3,
    aspect: f64,
    generation: u64,
    transition: Option<CameraTransition>,
}

impl CameraController {
    pub fn new(aspect: f64) -> Self {
        Self {
            position: Point3::from_array(CAMERA_START),
            target: Point3::ZERO,
            aspect,
            generation: 0,
            transition: None,
        }
    }

    pub fn position(&self) -> Point3 {
        self.position
    }

    pub fn target(&self) -> Point3 {
        self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Start easing toward `position` looking at `target`, superseding any
    /// transition in progress. Returns the new generation.
    pub fn start_transition(
        &mut self,
        position: Point3,
        target: Point3,
        now_ms: f64,
        duration_ms: f64,
    ) -> u64 {
        self.generation += 1;
        self.transition = Some(CameraTransition {
            from_position: self.position,
            to_position: position,
            from_target: self.target,
            to_target: target,
            started_ms: now_ms,
            duration_ms: duration_ms.max(0.0),
            generation: self.generation,
        });
        self.generation
    }

    /// Look down on a coordinate from the focus distance.
    pub fn focus_on(&mut self, lat: f64, lon: f64, now_ms: f64) -> u64 {
        let normal = project(lat, lon, EARTH_RADIUS).normalize_or_zero();
        self.start_transition(
            normal * CAMERA_FOCUS_DISTANCE,
            Point3::ZERO,
            now_ms,
            CAMERA_TRANSITION_MS,
        )
    }

    /// Advance the active transition to `now_ms`.
    pub fn update(&mut self, now_ms: f64) {
        let Some(transition) = self.transition else {
            return;
        };
        if transition.generation != self.generation {
            self.transition = None;
            return;
        }

        let t = if transition.duration_ms > 0.0 {
            ((now_ms - transition.started_ms) / transition.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let eased = ease_out_cubic(t);
        self.position = transition.from_position.lerp(transition.to_position, eased);
        self.target = transition.from_target.lerp(transition.to_target, eased);

        if t >= 1.0 {
            self.transition = None;
        }
    }

    pub fn view_projection(&self) -> DMat4 {
        let projection = DMat4::perspective_rh(
            CAMERA_FOV_DEGREES.to_radians(),
            self.aspect,
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        let view = DMat4::look_at_rh(self.position, self.target, Point3::Y);
        projection * view
    }

    /// Normalized device coordinates of a globe-space point, with the globe
    /// rotated by `globe_rotation` about its axis.
    pub fn to_screen(&self, point: Point3, globe_rotation: f64) -> DVec2 {
        let world = DQuat::from_rotation_y(globe_rotation) * point;
        self.view_projection().project_point3(world).truncate()
    }

    /// Screen-space heading (radians, counter-clockwise from +x) of travel
    /// along `tangent` from `point`.
    pub fn screen_heading(
        &self,
        point: Point3,
        tangent: Point3,
        lookahead: f64,
        globe_rotation: f64,
    ) -> f64 {
        let here = self.to_screen(point, globe_rotation);
        let ahead = self.to_screen(point + tangent * lookahead, globe_rotation);
        let delta = ahead - here;
        delta.y.atan2(delta.x * self.aspect)
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            position: self.position,
            target: self.target,
            transitioning: self.transition.is_some(),
        }
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_completes_at_destination() {
        let mut camera = CameraController::new(16.0 / 9.0);
        camera.focus_on(0.0, 0.0, 0.0);
        camera.update(750.0);
        assert!(camera.is_transitioning());
        camera.update(1500.0);
        assert!(!camera.is_transitioning());
        assert!((camera.position().length() - CAMERA_FOCUS_DISTANCE).abs() < 1e-9);
        assert_eq!(camera.target(), Point3::ZERO);
    }

    #[test]
    fn test_new_transition_supersedes() {
        let mut camera = CameraController::new(1.0);
        let first = camera.focus_on(0.0, 0.0, 0.0);
        camera.update(500.0);
        let second = camera.focus_on(0.0, 90.0, 500.0);
        assert!(second > first);
        camera.update(2000.0);
        let expected = project(0.0, 90.0, 1.0) * CAMERA_FOCUS_DISTANCE;
        assert!(camera.position().distance(expected) < 1e-9);
    }

    #[test]
    fn test_ease_out_is_front_loaded() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn test_globe_center_projects_to_screen_center() {
        let camera = CameraController::new(1.5);
        let center = camera.to_screen(Point3::ZERO, 0.0);
        assert!(center.length() < 1e-9);
    }
}
