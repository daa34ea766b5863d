//! Entity data owned by the registry.
//!
//! Components are plain data structs with no behavior.
//! Animation logic lives in the engine's systems, not here.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::{ROUTE_IDLE_COLOR, ROUTE_IDLE_OPACITY, ROUTE_RENDER_POINTS};
use crate::curve::Curve;
use crate::enums::EffectKind;
use crate::types::{AttackId, CountryId, Point3, Rgb, WaypointId};

/// Per-entity state read by the renderer after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub position: Point3,
    pub visible: bool,
    pub opacity: f64,
    pub color: Rgb,
    pub scale: f64,
    /// Screen-space rotation in radians (sprites only).
    pub rotation: f64,
}

impl Renderable {
    pub fn new(position: Point3, color: Rgb, scale: f64) -> Self {
        Self {
            position,
            visible: true,
            opacity: 1.0,
            color,
            scale,
            rotation: 0.0,
        }
    }

    pub fn hidden(color: Rgb, scale: f64) -> Self {
        Self {
            visible: false,
            ..Self::new(Point3::ZERO, color, scale)
        }
    }
}

/// A named stop on the journey. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub label: String,
    pub position: Point3,
    /// Country the location service placed this waypoint in, when known.
    pub country: Option<CountryId>,
}

/// Precomputed arc between two adjacent waypoints plus its highlight state.
#[derive(Debug, Clone)]
pub struct RouteSegment {
    /// Lower waypoint index of the pair.
    pub from: WaypointId,
    /// Higher waypoint index of the pair.
    pub to: WaypointId,
    pub curve: Curve,
    /// Evenly spaced render points, sampled once.
    pub polyline: Vec<Point3>,
    pub active: bool,
    pub color: Rgb,
    pub opacity: f64,
}

impl RouteSegment {
    pub fn new(from: WaypointId, to: WaypointId, curve: Curve) -> Self {
        Self {
            from,
            to,
            polyline: curve.sample(ROUTE_RENDER_POINTS),
            curve,
            active: false,
            color: ROUTE_IDLE_COLOR,
            opacity: ROUTE_IDLE_OPACITY,
        }
    }
}

/// Surface marker for a waypoint.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub waypoint: WaypointId,
}

/// Text label floating next to a waypoint marker.
#[derive(Debug, Clone)]
pub struct Label {
    pub waypoint: WaypointId,
    pub text: String,
}

/// The single traveling sprite.
#[derive(Debug, Clone, Copy)]
pub struct Traveler;

/// A missile on a ballistic arc.
#[derive(Debug, Clone)]
pub struct Missile {
    pub attack: AttackId,
    pub curve: Curve,
    /// Flight progress in [0, 1].
    pub progress: f64,
    pub duration_ms: f64,
    /// Elapsed time at which the missile reached its target.
    pub impacted_at_ms: Option<f64>,
}

/// Bounded history of recent positions, newest first.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    pub positions: VecDeque<Point3>,
    pub capacity: usize,
}

impl Trail {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, position: Point3) {
        self.positions.push_front(position);
        self.positions.truncate(self.capacity);
    }
}

/// Expanding, fading flash left by a missile impact.
#[derive(Debug, Clone, Copy)]
pub struct ImpactFlash {
    pub born_ms: f64,
}

/// Where a damage effect is attached.
#[derive(Debug, Clone)]
pub struct EffectAnchor {
    pub country: CountryId,
    pub centroid: Point3,
    /// Outward surface normal at the centroid.
    pub normal: Point3,
}

/// One fire/smoke particle, positioned relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub offset: Point3,
    pub velocity: Point3,
    pub age_ms: f64,
    pub lifetime_ms: f64,
    pub color: Rgb,
    pub opacity: f64,
}

/// Persistent visual damage on a destroyed country.
#[derive(Debug, Clone)]
pub enum DamageEffect {
    /// Pulsing glow over the centroid.
    Glow { phase: f64 },
    /// Flickering crater decal at a fixed surface point.
    Crater { position: Point3, phase: f64 },
    /// Looping fire/smoke particle system.
    Fire { particles: Vec<Particle> },
}

impl DamageEffect {
    pub fn kind(&self) -> EffectKind {
        match self {
            DamageEffect::Glow { .. } => EffectKind::Glow,
            DamageEffect::Crater { .. } => EffectKind::Crater,
            DamageEffect::Fire { .. } => EffectKind::Fire,
        }
    }
}
