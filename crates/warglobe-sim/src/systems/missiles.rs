//! Missile system: advances every missile along its arc, records trails,
//! spawns an impact flash on landing and retires missiles after a short
//! linger. Missile timing is wall-clock; the speed multiplier does not apply.

use hecs::Entity;

use warglobe_core::components::{Missile, Renderable, Trail};
use warglobe_core::constants::MISSILE_LINGER_MS;
use warglobe_core::events::WorldEvent;
use warglobe_core::types::Point3;

use crate::feedback::Feedback;
use crate::registry::EntityRegistry;

pub fn run(
    registry: &mut EntityRegistry,
    dt_ms: f64,
    now_ms: f64,
    despawn_buffer: &mut Vec<Entity>,
    feedback: &mut Feedback,
) {
    despawn_buffer.clear();
    let mut impacts: Vec<Point3> = Vec::new();

    for (entity, (missile, trail, render)) in registry
        .world_mut()
        .query_mut::<(&mut Missile, &mut Trail, &mut Renderable)>()
    {
        match missile.impacted_at_ms {
            None => {
                if missile.duration_ms > 0.0 {
                    missile.progress += dt_ms.max(0.0) / missile.duration_ms;
                } else {
                    missile.progress = 1.0;
                }
                missile.progress = missile.progress.min(1.0);

                let position = missile.curve.point_at(missile.progress);
                render.position = position;
                trail.push(position);

                if missile.progress >= 1.0 {
                    missile.impacted_at_ms = Some(now_ms);
                    render.visible = false;
                    impacts.push(position);
                    feedback.event(WorldEvent::MissileImpact {
                        attack: missile.attack,
                        position,
                    });
                }
            }
            Some(impacted) => {
                let fade = ((now_ms - impacted) / MISSILE_LINGER_MS).clamp(0.0, 1.0);
                render.opacity = 1.0 - fade;
                if fade >= 1.0 {
                    despawn_buffer.push(entity);
                }
            }
        }
    }

    for position in impacts {
        registry.spawn_flash(position, now_ms);
    }
    for entity in despawn_buffer.drain(..) {
        registry.retire_missile(entity);
    }
}
