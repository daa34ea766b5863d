//! Scene snapshot: the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::components::Renderable;
use crate::enums::{Direction, EffectKind, JourneyPhase};
use crate::events::{StatusMessage, WorldEvent};
use crate::types::{CountryId, Point3, Rgb, SimTime};

/// Complete scene state after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub time: SimTime,
    pub speed_multiplier: f64,
    pub globe: GlobeView,
    pub camera: CameraView,
    pub journey: JourneyView,
    pub waypoints: Vec<WaypointView>,
    pub routes: Vec<RouteView>,
    pub traveler: Option<EntityView>,
    pub missiles: Vec<MissileView>,
    pub flashes: Vec<EntityView>,
    pub damaged: Vec<DamagedCountryView>,
    /// Entities removed since the previous snapshot; their render
    /// resources (textures, buffers) must be freed.
    pub released: Vec<u64>,
    pub status: Vec<StatusMessage>,
    pub events: Vec<WorldEvent>,
}

/// Render state of a single entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub entity: u64,
    pub render: Renderable,
}

/// Ambient rotation of the globe, atmosphere and starfield.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GlobeView {
    pub rotation: f64,
    pub atmosphere_rotation: f64,
    pub stars_rotation: f64,
    pub ambient_rotation: bool,
}

/// Camera placement.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CameraView {
    pub position: Point3,
    pub target: Point3,
    pub transitioning: bool,
}

/// Journey state machine summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JourneyView {
    pub phase: JourneyPhase,
    pub current_index: usize,
    pub direction: Direction,
    pub version: u64,
    /// Target waypoint and progress of the active flight, if any.
    pub target_index: Option<usize>,
    pub progress: Option<f64>,
}

/// A waypoint with its marker and label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypointView {
    pub index: usize,
    pub label: String,
    pub position: Point3,
    pub marker: Option<EntityView>,
    pub label_entity: Option<EntityView>,
}

/// A route polyline and its highlight state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteView {
    pub from: usize,
    pub to: usize,
    pub points: Vec<Point3>,
    pub active: bool,
    pub color: Rgb,
    pub opacity: f64,
}

/// A missile in flight, with its trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissileView {
    pub entity: u64,
    pub render: Renderable,
    pub progress: f64,
    pub trail: Vec<Point3>,
}

/// A destroyed country and its effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamagedCountryView {
    pub country: CountryId,
    pub border_color: Rgb,
    pub effects: Vec<EffectView>,
}

/// One damage effect. Particle systems export every live particle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub entity: u64,
    pub kind: EffectKind,
    pub render: Renderable,
    pub particles: Vec<ParticleView>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: Point3,
    pub color: Rgb,
    pub opacity: f64,
}
