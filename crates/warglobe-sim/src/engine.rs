//! Scene engine and frame scheduler.
//!
//! `WorldEngine` owns the entity registry, the journey, the attack
//! orchestrator, the camera and the deferred-event queue. Commands from
//! outside the frame loop are queued and applied at the next tick boundary,
//! so nothing mutates the scene mid-frame. Completely headless, enabling
//! deterministic testing.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warglobe_core::commands::WorldCommand;
use warglobe_core::constants::{SPEED_DEFAULT, SPEED_MAX, SPEED_MIN, SPEED_STEP};
use warglobe_core::enums::{JourneyPhase, StatusKind};
use warglobe_core::error::WarRoomError;
use warglobe_core::events::WorldEvent;
use warglobe_core::state::SceneSnapshot;
use warglobe_core::types::{CountryId, SimTime};
use warglobe_geo::CountryIndex;
use warglobe_journey::{Journey, Resume};

use crate::camera::CameraController;
use crate::feedback::Feedback;
use crate::orchestrator::AttackOrchestrator;
use crate::registry::EntityRegistry;
use crate::scheduler::{DeferredEvent, Scheduler};
use crate::systems;
use crate::systems::ambient::GlobeState;
use crate::systems::snapshot::FrameState;

/// Configuration for a new engine.
pub struct EngineConfig {
    /// RNG seed for determinism. Same seed = same scene.
    pub seed: u64,
    /// Initial travel speed multiplier.
    pub speed_multiplier: f64,
    /// Whether the globe starts rotating on its own.
    pub ambient_rotation: bool,
    /// Viewport width / height, used for screen-space headings.
    pub aspect: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            speed_multiplier: SPEED_DEFAULT,
            ambient_rotation: true,
            aspect: 16.0 / 9.0,
        }
    }
}

pub struct WorldEngine {
    time: SimTime,
    speed_multiplier: f64,
    rng: ChaCha8Rng,
    countries: CountryIndex,
    registry: EntityRegistry,
    journey: Journey,
    attacks: AttackOrchestrator,
    camera: CameraController,
    globe: GlobeState,
    scheduler: Scheduler,
    command_queue: VecDeque<WorldCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    feedback: Feedback,
}

impl WorldEngine {
    pub fn new(config: EngineConfig, countries: CountryIndex) -> Self {
        Self {
            time: SimTime::default(),
            speed_multiplier: clamp_speed(config.speed_multiplier),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            countries,
            registry: EntityRegistry::new(),
            journey: Journey::new(),
            attacks: AttackOrchestrator::new(),
            camera: CameraController::new(config.aspect),
            globe: GlobeState::new(config.ambient_rotation),
            scheduler: Scheduler::new(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            feedback: Feedback::default(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: WorldCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = WorldCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the scene by `dt_ms` of wall-clock time and return the
    /// resulting snapshot.
    pub fn tick(&mut self, dt_ms: f64) -> SceneSnapshot {
        let dt_ms = dt_ms.max(0.0);
        self.feedback.begin_frame(self.time.frame);
        self.process_commands();

        self.time.advance(dt_ms);
        let now_ms = self.time.elapsed_ms;

        for event in self.scheduler.pop_due(now_ms) {
            self.handle_deferred(event);
        }
        self.attacks.start_pending(
            &self.countries,
            &self.registry,
            &mut self.scheduler,
            &mut self.rng,
            now_ms,
            &mut self.feedback,
        );

        self.run_systems(dt_ms, now_ms);

        let released = self.registry.take_released();
        let status = self.feedback.take_status();
        let events = self.feedback.take_events();
        let frame = FrameState {
            time: self.time,
            speed_multiplier: self.speed_multiplier,
            globe: &self.globe,
            camera: &self.camera,
            journey: &self.journey,
        };
        systems::snapshot::build_snapshot(
            &self.registry,
            frame,
            released,
            status,
            events,
        )
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn journey(&self) -> &Journey {
        &self.journey
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn globe(&self) -> &GlobeState {
        &self.globe
    }

    pub fn attacks(&self) -> &AttackOrchestrator {
        &self.attacks
    }

    pub fn countries(&self) -> &CountryIndex {
        &self.countries
    }

    /// Mark a country destroyed without an attack (for tests needing a
    /// pre-damaged registry).
    #[cfg(test)]
    pub fn damage_country(&mut self, name: &str) -> bool {
        match self.countries.resolve(name).cloned() {
            Some(country) => self.registry.mark_country_damaged(&country, &mut self.rng),
            None => false,
        }
    }

    /// Frame order: ambient rotation, journey, missiles, damage effects,
    /// camera. The snapshot is built afterwards.
    fn run_systems(&mut self, dt_ms: f64, now_ms: f64) {
        systems::ambient::run(&mut self.globe);
        systems::journey::run(
            &mut self.journey,
            &mut self.registry,
            &self.camera,
            self.globe.rotation,
            dt_ms,
            self.speed_multiplier,
            now_ms,
            &mut self.scheduler,
            &mut self.feedback,
        );
        systems::missiles::run(
            &mut self.registry,
            dt_ms,
            now_ms,
            &mut self.despawn_buffer,
            &mut self.feedback,
        );
        systems::effects::run(
            &mut self.registry,
            &mut self.rng,
            dt_ms,
            now_ms,
            &mut self.despawn_buffer,
        );
        self.camera.update(now_ms);
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: WorldCommand) {
        match command {
            WorldCommand::AddWaypoint {
                label,
                lat,
                lon,
                country,
            } => self.add_waypoint(label, lat, lon, country),
            WorldCommand::LaunchAttacks { orders } => {
                if orders.is_empty() {
                    self.feedback
                        .error(&WarRoomError::invalid("no attack orders given"));
                } else {
                    self.attacks.enqueue(orders);
                }
            }
            WorldCommand::FocusCamera { lat, lon } => {
                self.focus_camera(lat, lon);
            }
            WorldCommand::SetAmbientRotation { enabled } => {
                self.globe.enabled = enabled;
            }
            WorldCommand::SetSpeed { multiplier } => self.set_speed(multiplier),
            WorldCommand::SpeedUp => self.set_speed(self.speed_multiplier + SPEED_STEP),
            WorldCommand::SpeedDown => self.set_speed(self.speed_multiplier - SPEED_STEP),
            WorldCommand::ReportFailure { error } => self.feedback.error(&error),
            WorldCommand::ReportInfo { message } => {
                self.feedback.status(StatusKind::Info, message);
            }
        }
    }

    fn set_speed(&mut self, multiplier: f64) {
        self.speed_multiplier = clamp_speed(multiplier);
        self.feedback.status(
            StatusKind::Info,
            format!("Speed {:.1}x", self.speed_multiplier),
        );
    }

    fn focus_camera(&mut self, lat: f64, lon: f64) {
        self.camera.focus_on(lat, lon, self.time.elapsed_ms);
        self.globe.enabled = false;
    }

    /// Travel request: vetoed if the destination's country is destroyed,
    /// otherwise appended to the route and handed to the journey.
    fn add_waypoint(&mut self, label: String, lat: f64, lon: f64, country: Option<String>) {
        let country_id = country.as_deref().map(|name| {
            self.countries
                .resolve(name)
                .map(|c| c.id.clone())
                .unwrap_or_else(|| CountryId::new(name))
        });

        if let Some(id) = &country_id {
            if self.registry.is_damaged(id) {
                let error = WarRoomError::BlockedDestination {
                    label: label.clone(),
                    country: id.to_string(),
                };
                self.feedback.error(&error);
                self.feedback.event(WorldEvent::TravelBlocked {
                    label,
                    country: id.clone(),
                });
                return;
            }
        }

        self.focus_camera(lat, lon);
        let was_in_flight = self.journey.phase() == JourneyPhase::InFlight;
        let id = self.registry.add_waypoint(&label, lat, lon, country_id);
        self.feedback.event(WorldEvent::WaypointAdded {
            index: id.0,
            label: label.clone(),
        });

        let message = match id.0 {
            0 => format!("Starting at {label}"),
            _ if was_in_flight => format!("Added {label} to the journey"),
            _ => format!("Added {label}"),
        };
        self.feedback.status(StatusKind::WaypointAdded, message);

        let registry = &self.registry;
        if let Some(departure) = self
            .journey
            .waypoint_added(registry, |i| registry.is_reachable(i))
        {
            systems::journey::on_departure(&mut self.registry, &departure, &mut self.feedback);
        }
    }

    fn handle_deferred(&mut self, event: DeferredEvent) {
        match event {
            DeferredEvent::ResumeJourney { version } => self.resume_journey(version),
            DeferredEvent::LaunchMissile {
                attack,
                duration_ms,
            } => {
                self.attacks.launch(
                    attack,
                    duration_ms,
                    &mut self.registry,
                    &mut self.rng,
                    &mut self.feedback,
                );
            }
            DeferredEvent::ApplyDamage { attack } => {
                self.attacks.complete(
                    attack,
                    &mut self.registry,
                    &mut self.rng,
                    &mut self.feedback,
                );
            }
        }
    }

    fn resume_journey(&mut self, version: u64) {
        let registry = &self.registry;
        match self
            .journey
            .resume(version, registry, |i| registry.is_reachable(i))
        {
            Resume::Stale => {
                tracing::debug!(version, "stale leg continuation dropped");
            }
            Resume::Departed(departure) => {
                systems::journey::on_departure(&mut self.registry, &departure, &mut self.feedback);
            }
            Resume::Parked => {
                let label = self
                    .registry
                    .waypoint(self.journey.current_index())
                    .map(|w| w.label.clone())
                    .unwrap_or_default();
                self.feedback.status(
                    StatusKind::Blocked,
                    format!("No reachable destination from {label}; holding position"),
                );
            }
        }
    }
}

pub fn clamp_speed(multiplier: f64) -> f64 {
    if multiplier.is_finite() {
        multiplier.clamp(SPEED_MIN, SPEED_MAX)
    } else {
        SPEED_DEFAULT
    }
}
