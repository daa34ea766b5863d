//! Snapshot system: reads the registry and builds a complete SceneSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::{Entity, World};

use warglobe_core::components::*;
use warglobe_core::constants::DAMAGED_BORDER_COLOR;
use warglobe_core::events::{StatusMessage, WorldEvent};
use warglobe_core::state::*;
use warglobe_core::types::SimTime;
use warglobe_journey::Journey;

use crate::camera::CameraController;
use crate::registry::EntityRegistry;
use crate::systems::ambient::GlobeState;

/// Everything a snapshot needs besides the registry.
pub struct FrameState<'a> {
    pub time: SimTime,
    pub speed_multiplier: f64,
    pub globe: &'a GlobeState,
    pub camera: &'a CameraController,
    pub journey: &'a Journey,
}

pub fn build_snapshot(
    registry: &EntityRegistry,
    frame: FrameState<'_>,
    released: Vec<Entity>,
    status: Vec<StatusMessage>,
    events: Vec<WorldEvent>,
) -> SceneSnapshot {
    let world = registry.world();

    SceneSnapshot {
        time: frame.time,
        speed_multiplier: frame.speed_multiplier,
        globe: frame.globe.view(),
        camera: frame.camera.view(),
        journey: build_journey(frame.journey),
        waypoints: build_waypoints(registry),
        routes: build_routes(registry),
        traveler: registry
            .traveler_entity()
            .and_then(|entity| entity_view(world, entity)),
        missiles: build_missiles(world),
        flashes: build_flashes(world),
        damaged: build_damaged(registry),
        released: released.into_iter().map(entity_id).collect(),
        status,
        events,
    }
}

pub fn entity_id(entity: Entity) -> u64 {
    entity.to_bits().get()
}

fn entity_view(world: &World, entity: Entity) -> Option<EntityView> {
    let render = world.get::<&Renderable>(entity).ok()?;
    Some(EntityView {
        entity: entity_id(entity),
        render: *render,
    })
}

fn build_journey(journey: &Journey) -> JourneyView {
    let flight = journey.active_flight();
    JourneyView {
        phase: journey.phase(),
        current_index: journey.current_index(),
        direction: journey.direction(),
        version: journey.version(),
        target_index: flight.map(|f| f.target_index),
        progress: flight.map(|f| f.progress.min(1.0)),
    }
}

fn build_waypoints(registry: &EntityRegistry) -> Vec<WaypointView> {
    let world = registry.world();
    registry
        .waypoints()
        .iter()
        .enumerate()
        .map(|(index, entry)| WaypointView {
            index,
            label: entry.waypoint.label.clone(),
            position: entry.waypoint.position,
            marker: entity_view(world, entry.marker),
            label_entity: entity_view(world, entry.label),
        })
        .collect()
}

fn build_routes(registry: &EntityRegistry) -> Vec<RouteView> {
    registry
        .segments()
        .iter()
        .map(|segment| RouteView {
            from: segment.from.0,
            to: segment.to.0,
            points: segment.polyline.clone(),
            active: segment.active,
            color: segment.color,
            opacity: segment.opacity,
        })
        .collect()
}

fn build_missiles(world: &World) -> Vec<MissileView> {
    let mut missiles: Vec<MissileView> = world
        .query::<(&Missile, &Trail, &Renderable)>()
        .iter()
        .map(|(entity, (missile, trail, render))| MissileView {
            entity: entity_id(entity),
            render: *render,
            progress: missile.progress,
            trail: trail.positions.iter().copied().collect(),
        })
        .collect();
    missiles.sort_by_key(|m| m.entity);
    missiles
}

fn build_flashes(world: &World) -> Vec<EntityView> {
    let mut flashes: Vec<EntityView> = world
        .query::<(&ImpactFlash, &Renderable)>()
        .iter()
        .map(|(entity, (_flash, render))| EntityView {
            entity: entity_id(entity),
            render: *render,
        })
        .collect();
    flashes.sort_by_key(|f| f.entity);
    flashes
}

fn build_damaged(registry: &EntityRegistry) -> Vec<DamagedCountryView> {
    let world = registry.world();
    registry
        .damaged()
        .map(|(country, damaged)| DamagedCountryView {
            country: country.clone(),
            border_color: DAMAGED_BORDER_COLOR,
            effects: damaged
                .effects
                .iter()
                .filter_map(|&entity| effect_view(world, entity))
                .collect(),
        })
        .collect()
}

fn effect_view(world: &World, entity: Entity) -> Option<EffectView> {
    let mut query = world
        .query_one::<(&EffectAnchor, &DamageEffect, &Renderable)>(entity)
        .ok()?;
    let (anchor, effect, render) = query.get()?;

    let particles = match effect {
        DamageEffect::Fire { particles } => particles
            .iter()
            .map(|p| ParticleView {
                position: anchor.centroid + p.offset,
                color: p.color,
                opacity: p.opacity,
            })
            .collect(),
        _ => Vec::new(),
    };

    Some(EffectView {
        entity: entity_id(entity),
        kind: effect.kind(),
        render: *render,
        particles,
    })
}
