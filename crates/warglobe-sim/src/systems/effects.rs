//! Damage-effect and impact-flash animation.
//!
//! Effects are a tagged union; each variant has its own update rule.
//! Damage effects loop for the rest of the session. Flashes expand, fade
//! and are released when their lifetime ends.

use hecs::Entity;
use rand::Rng;

use warglobe_core::components::{DamageEffect, EffectAnchor, ImpactFlash, Particle, Renderable};
use warglobe_core::constants::*;

use crate::registry::EntityRegistry;
use crate::world_setup;

pub fn run(
    registry: &mut EntityRegistry,
    rng: &mut impl Rng,
    dt_ms: f64,
    now_ms: f64,
    despawn_buffer: &mut Vec<Entity>,
) {
    for (_entity, (anchor, effect, render)) in registry
        .world_mut()
        .query_mut::<(&EffectAnchor, &mut DamageEffect, &mut Renderable)>()
    {
        match effect {
            DamageEffect::Glow { phase } => update_glow(render, *phase, now_ms),
            DamageEffect::Crater { phase, .. } => update_crater(render, *phase, now_ms),
            DamageEffect::Fire { particles } => {
                for particle in particles.iter_mut() {
                    update_particle(particle, anchor, rng, dt_ms);
                }
            }
        }
    }

    despawn_buffer.clear();
    for (entity, (flash, render)) in registry
        .world_mut()
        .query_mut::<(&ImpactFlash, &mut Renderable)>()
    {
        let t = ((now_ms - flash.born_ms) / FLASH_LIFETIME_MS).clamp(0.0, 1.0);
        render.scale = FLASH_START_SCALE + (FLASH_END_SCALE - FLASH_START_SCALE) * t;
        render.opacity = 1.0 - t;
        if t >= 1.0 {
            despawn_buffer.push(entity);
        }
    }
    for entity in despawn_buffer.drain(..) {
        registry.release(entity);
    }
}

fn update_glow(render: &mut Renderable, phase: f64, now_ms: f64) {
    let pulse = (now_ms * GLOW_PULSE_RATE + phase).sin();
    render.opacity = 0.45 + 0.25 * pulse;
    render.scale = GLOW_SCALE * (1.0 + 0.1 * pulse);
}

fn update_crater(render: &mut Renderable, phase: f64, now_ms: f64) {
    let flicker = (now_ms * CRATER_FLICKER_RATE + phase).sin().abs();
    render.opacity = 0.7 + 0.3 * flicker;
}

/// Age a particle; recycle it at the anchor once its lifetime is spent.
/// Color moves from fire to smoke over the particle's life.
fn update_particle(
    particle: &mut Particle,
    anchor: &EffectAnchor,
    rng: &mut impl Rng,
    dt_ms: f64,
) {
    particle.age_ms += dt_ms.max(0.0);
    if particle.age_ms >= particle.lifetime_ms {
        *particle = world_setup::new_particle(rng, anchor.normal);
    } else {
        particle.offset += particle.velocity * (dt_ms.max(0.0) / 1000.0);
    }

    let life = (particle.age_ms / particle.lifetime_ms).clamp(0.0, 1.0);
    particle.color = FIRE_COLOR.lerp(SMOKE_COLOR, life);
    particle.opacity = 1.0 - life;
}
