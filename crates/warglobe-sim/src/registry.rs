//! Entity registry: the single owner of every visual entity.
//!
//! Waypoints and route segments live in ordered vectors (segment `i` joins
//! waypoints `i` and `i + 1`); everything drawn per frame lives in the hecs
//! world. Every removal path goes through `release`, which records the
//! handle so the renderer can free the resources behind it.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use rand::Rng;

use warglobe_core::components::{Renderable, RouteSegment, Waypoint};
use warglobe_core::constants::{EARTH_RADIUS, SURFACE_OFFSET};
use warglobe_core::curve::Curve;
use warglobe_core::types::{AttackId, CountryId, Point3, WaypointId};
use warglobe_geo::{ballistic_arc, great_circle_arc, project, Country};
use warglobe_journey::Route;

use crate::world_setup;

/// A waypoint and the entities drawn for it.
#[derive(Debug, Clone)]
pub struct WaypointEntry {
    pub waypoint: Waypoint,
    pub marker: Entity,
    pub label: Entity,
}

/// A destroyed country and the effects attached to it.
#[derive(Debug, Clone, Default)]
pub struct DamagedCountry {
    pub effects: Vec<Entity>,
}

#[derive(Default)]
pub struct EntityRegistry {
    world: World,
    waypoints: Vec<WaypointEntry>,
    segments: Vec<RouteSegment>,
    traveler: Option<Entity>,
    damaged: BTreeMap<CountryId, DamagedCountry>,
    released: Vec<Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // --- Waypoints and routes ---

    /// Append a waypoint with its marker and label, and the route segment
    /// from the previous waypoint if there is one.
    pub fn add_waypoint(
        &mut self,
        label: &str,
        lat: f64,
        lon: f64,
        country: Option<CountryId>,
    ) -> WaypointId {
        let id = WaypointId(self.waypoints.len());
        let position = project(lat, lon, EARTH_RADIUS + SURFACE_OFFSET);

        if let Some(previous) = self.waypoints.last() {
            let from = WaypointId(id.0 - 1);
            let curve = great_circle_arc(previous.waypoint.position, position);
            self.segments.push(RouteSegment::new(from, id, curve));
        }

        let marker = world_setup::spawn_marker(&mut self.world, id, position);
        let label_entity = world_setup::spawn_label(&mut self.world, id, label, position);
        self.waypoints.push(WaypointEntry {
            waypoint: Waypoint {
                label: label.to_string(),
                position,
                country,
            },
            marker,
            label: label_entity,
        });

        tracing::debug!(index = id.0, label, "waypoint added");
        id
    }

    pub fn waypoints(&self) -> &[WaypointEntry] {
        &self.waypoints
    }

    pub fn waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index).map(|entry| &entry.waypoint)
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut [RouteSegment] {
        &mut self.segments
    }

    /// True unless the waypoint lies in a destroyed country.
    pub fn is_reachable(&self, index: usize) -> bool {
        match self.waypoint(index).and_then(|w| w.country.as_ref()) {
            Some(country) => !self.is_damaged(country),
            None => true,
        }
    }

    // --- Traveler ---

    /// The traveler entity, spawned on first use.
    pub fn traveler(&mut self) -> Entity {
        match self.traveler {
            Some(entity) => entity,
            None => {
                let entity = world_setup::spawn_traveler(&mut self.world);
                self.traveler = Some(entity);
                entity
            }
        }
    }

    pub fn traveler_entity(&self) -> Option<Entity> {
        self.traveler
    }

    // --- Damage ---

    pub fn is_damaged(&self, country: &CountryId) -> bool {
        self.damaged.contains_key(country)
    }

    pub fn damaged(&self) -> impl Iterator<Item = (&CountryId, &DamagedCountry)> {
        self.damaged.iter()
    }

    pub fn damaged_count(&self) -> usize {
        self.damaged.len()
    }

    /// Mark a country destroyed and attach its damage effects.
    /// Returns false, changing nothing, if it was already marked.
    pub fn mark_country_damaged(&mut self, country: &Country, rng: &mut impl Rng) -> bool {
        if self.damaged.contains_key(&country.id) {
            return false;
        }
        let effects =
            world_setup::spawn_damage_effects(&mut self.world, rng, &country.id, country.position);
        self.damaged
            .insert(country.id.clone(), DamagedCountry { effects });
        true
    }

    // --- Missiles and flashes ---

    pub fn spawn_missile(
        &mut self,
        attack: AttackId,
        from: Point3,
        to: Point3,
        duration_ms: f64,
        rng: &mut impl Rng,
    ) -> Entity {
        let curve = ballistic_arc(from, to, rng);
        world_setup::spawn_missile(&mut self.world, attack, curve, duration_ms)
    }

    /// Remove a missile and release its render resources.
    pub fn retire_missile(&mut self, missile: Entity) -> bool {
        self.release(missile)
    }

    pub fn spawn_flash(&mut self, position: Point3, now_ms: f64) -> Entity {
        world_setup::spawn_flash(&mut self.world, position, now_ms)
    }

    /// Despawn an entity and queue it for render-resource release.
    pub fn release(&mut self, entity: Entity) -> bool {
        if self.world.despawn(entity).is_err() {
            return false;
        }
        self.released.push(entity);
        true
    }

    /// Handles released since the last call.
    pub fn take_released(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.released)
    }

    pub fn render(&self, entity: Entity) -> Option<Renderable> {
        self.world.get::<&Renderable>(entity).ok().map(|r| *r)
    }
}

impl Route for EntityRegistry {
    fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    fn waypoint_position(&self, index: usize) -> Option<Point3> {
        self.waypoint(index).map(|w| w.position)
    }

    fn segment_curve(&self, segment: usize) -> Option<&Curve> {
        self.segments.get(segment).map(|s| &s.curve)
    }
}
