//! Journey system: drives the traveler along the active leg, keeps the route
//! highlight in step, and schedules the settle-delay continuation on arrival.

use std::f64::consts::FRAC_PI_2;

use warglobe_core::components::Renderable;
use warglobe_core::constants::{
    HEADING_LOOKAHEAD, ROUTE_ACTIVE_COLOR, ROUTE_ACTIVE_OPACITY, ROUTE_IDLE_COLOR,
    ROUTE_IDLE_OPACITY, ROUTE_PULSE_AMPLITUDE, ROUTE_PULSE_BASE, ROUTE_PULSE_RATE,
    SETTLE_DELAY_MS,
};
use warglobe_core::enums::StatusKind;
use warglobe_core::events::WorldEvent;
use warglobe_journey::{Departure, Journey};

use crate::camera::CameraController;
use crate::feedback::Feedback;
use crate::registry::EntityRegistry;
use crate::scheduler::{DeferredEvent, Scheduler};

/// Advance the active flight by one frame.
#[allow(clippy::too_many_arguments)]
pub fn run(
    journey: &mut Journey,
    registry: &mut EntityRegistry,
    camera: &CameraController,
    globe_rotation: f64,
    dt_ms: f64,
    speed: f64,
    now_ms: f64,
    scheduler: &mut Scheduler,
    feedback: &mut Feedback,
) {
    let Some(frame) = journey.advance(dt_ms, speed, &*registry) else {
        return;
    };

    let heading = camera.screen_heading(
        frame.position,
        frame.tangent,
        HEADING_LOOKAHEAD,
        globe_rotation,
    );
    let traveler = registry.traveler();
    if let Ok(mut render) = registry.world_mut().get::<&mut Renderable>(traveler) {
        render.position = frame.position;
        render.rotation = heading - FRAC_PI_2;
        render.visible = true;
    }

    match frame.arrival {
        Some(arrival) => {
            reset_highlight(registry);
            let label = registry
                .waypoint(arrival.index)
                .map(|w| w.label.clone())
                .unwrap_or_default();
            feedback.status(StatusKind::Arrival, format!("Arrived at {label}"));
            feedback.event(WorldEvent::Arrived {
                index: arrival.index,
                label,
            });
            scheduler.schedule(
                now_ms + SETTLE_DELAY_MS,
                DeferredEvent::ResumeJourney {
                    version: arrival.version,
                },
            );
        }
        None => {
            if let Some(segment) = registry.segments_mut().get_mut(frame.segment) {
                segment.opacity =
                    ROUTE_PULSE_BASE + ROUTE_PULSE_AMPLITUDE * (now_ms * ROUTE_PULSE_RATE).sin();
            }
        }
    }
}

/// Highlight the new leg and put the traveler at its start.
pub fn on_departure(registry: &mut EntityRegistry, departure: &Departure, feedback: &mut Feedback) {
    reset_highlight(registry);
    if let Some(segment) = registry.segments_mut().get_mut(departure.segment) {
        segment.active = true;
        segment.color = ROUTE_ACTIVE_COLOR;
        segment.opacity = ROUTE_ACTIVE_OPACITY;
    }

    let start = registry
        .waypoint(departure.from_index)
        .map(|w| w.position)
        .unwrap_or_default();
    let traveler = registry.traveler();
    if let Ok(mut render) = registry.world_mut().get::<&mut Renderable>(traveler) {
        render.position = start;
        render.visible = true;
    }

    let label = registry
        .waypoint(departure.to_index)
        .map(|w| w.label.clone())
        .unwrap_or_default();
    feedback.status(StatusKind::Departure, format!("Flying to {label}"));
    feedback.event(WorldEvent::FlightStarted {
        from_index: departure.from_index,
        to_index: departure.to_index,
        version: departure.version,
    });
}

fn reset_highlight(registry: &mut EntityRegistry) {
    for segment in registry.segments_mut() {
        segment.active = false;
        segment.color = ROUTE_IDLE_COLOR;
        segment.opacity = ROUTE_IDLE_OPACITY;
    }
}
