//! Entity spawn factories.
//!
//! Creates markers, labels, the traveler, missiles, impact flashes and
//! damage effects with their component bundles.

use hecs::{Entity, World};
use rand::Rng;

use warglobe_core::components::*;
use warglobe_core::constants::*;
use warglobe_core::curve::Curve;
use warglobe_core::types::{AttackId, CountryId, Point3, WaypointId};
use warglobe_geo::projection::surface_tangent;

/// Spawn the surface marker for a waypoint.
pub fn spawn_marker(world: &mut World, waypoint: WaypointId, position: Point3) -> Entity {
    world.spawn((
        Marker { waypoint },
        Renderable::new(position, MARKER_COLOR, MARKER_SCALE),
    ))
}

/// Spawn a waypoint label, lifted off the surface and pushed sideways so it
/// does not cover the marker.
pub fn spawn_label(
    world: &mut World,
    waypoint: WaypointId,
    text: &str,
    position: Point3,
) -> Entity {
    world.spawn((
        Label {
            waypoint,
            text: text.to_string(),
        },
        Renderable::new(label_position(text, position), MARKER_COLOR, LABEL_HEIGHT),
    ))
}

pub fn label_position(text: &str, position: Point3) -> Point3 {
    let normal = position.normalize_or_zero();
    let tangent = surface_tangent(normal);
    let up = normal.cross(tangent).normalize_or_zero();
    let width = text.chars().count() as f64 * LABEL_HEIGHT * LABEL_WIDTH_PER_CHAR;

    position
        + normal * LABEL_OUTWARD_OFFSET
        + tangent * (width / 2.0 + LABEL_SIDE_GAP)
        + up * LABEL_UP_OFFSET
}

/// Spawn the traveler sprite, hidden until its first flight.
pub fn spawn_traveler(world: &mut World) -> Entity {
    world.spawn((Traveler, Renderable::hidden(TRAVELER_COLOR, TRAVELER_SCALE)))
}

/// Spawn a missile at the start of its ballistic arc.
pub fn spawn_missile(
    world: &mut World,
    attack: AttackId,
    curve: Curve,
    duration_ms: f64,
) -> Entity {
    let start = curve.start();
    let mut trail = Trail::with_capacity(MISSILE_TRAIL_LEN);
    trail.push(start);

    world.spawn((
        Missile {
            attack,
            curve,
            progress: 0.0,
            duration_ms,
            impacted_at_ms: None,
        },
        trail,
        Renderable::new(start, MISSILE_COLOR, MISSILE_SCALE),
    ))
}

/// Spawn an impact flash at `position`.
pub fn spawn_flash(world: &mut World, position: Point3, now_ms: f64) -> Entity {
    world.spawn((
        ImpactFlash { born_ms: now_ms },
        Renderable::new(position, FLASH_COLOR, FLASH_START_SCALE),
    ))
}

/// Spawn the persistent glow, craters and fire for a destroyed country.
pub fn spawn_damage_effects(
    world: &mut World,
    rng: &mut impl Rng,
    country: &CountryId,
    centroid: Point3,
) -> Vec<Entity> {
    let normal = centroid.normalize_or_zero();
    let surface = normal * (EARTH_RADIUS + SURFACE_OFFSET);
    let anchor = EffectAnchor {
        country: country.clone(),
        centroid: surface,
        normal,
    };

    let mut entities = Vec::with_capacity(CRATER_COUNT + 2);

    entities.push(world.spawn((
        anchor.clone(),
        DamageEffect::Glow {
            phase: rng.gen_range(0.0..std::f64::consts::TAU),
        },
        Renderable::new(surface, GLOW_COLOR, GLOW_SCALE),
    )));

    let tangent = surface_tangent(normal);
    let bitangent = normal.cross(tangent).normalize_or_zero();
    for _ in 0..CRATER_COUNT {
        let dx = rng.gen_range(-CRATER_SPREAD..CRATER_SPREAD);
        let dy = rng.gen_range(-CRATER_SPREAD..CRATER_SPREAD);
        let position = (surface + tangent * dx + bitangent * dy).normalize_or_zero()
            * (EARTH_RADIUS + SURFACE_OFFSET);
        entities.push(world.spawn((
            anchor.clone(),
            DamageEffect::Crater {
                position,
                phase: rng.gen_range(0.0..std::f64::consts::TAU),
            },
            Renderable::new(position, CRATER_COLOR, CRATER_SPREAD * 0.5),
        )));
    }

    let particles = (0..FIRE_PARTICLES)
        .map(|_| {
            let mut particle = new_particle(rng, normal);
            // Stagger ages so the plume does not pulse in lockstep.
            particle.age_ms = rng.gen_range(0.0..particle.lifetime_ms);
            particle
        })
        .collect();
    entities.push(world.spawn((
        anchor,
        DamageEffect::Fire { particles },
        Renderable::new(surface, FIRE_COLOR, 1.0),
    )));

    entities
}

/// A fresh fire particle at the anchor, rising along `normal` with a small
/// random drift.
pub fn new_particle(rng: &mut impl Rng, normal: Point3) -> Particle {
    let tangent = surface_tangent(normal);
    let bitangent = normal.cross(tangent).normalize_or_zero();
    let drift = tangent * rng.gen_range(-PARTICLE_DRIFT_SPEED..PARTICLE_DRIFT_SPEED)
        + bitangent * rng.gen_range(-PARTICLE_DRIFT_SPEED..PARTICLE_DRIFT_SPEED);
    let rise = normal * PARTICLE_RISE_SPEED * rng.gen_range(0.6..1.0);

    Particle {
        offset: tangent * rng.gen_range(-0.03..0.03) + bitangent * rng.gen_range(-0.03..0.03),
        velocity: rise + drift,
        age_ms: 0.0,
        lifetime_ms: rng.gen_range(PARTICLE_MIN_LIFETIME_MS..PARTICLE_MAX_LIFETIME_MS),
        color: FIRE_COLOR,
        opacity: 1.0,
    }
}
