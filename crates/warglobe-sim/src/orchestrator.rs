//! Attack orchestrator.
//!
//! Orders run strictly one at a time in the order received. An order is
//! validated only when it reaches the front of the queue, after the previous
//! order's damage has landed, so a repeated target in one batch reports
//! "already destroyed" instead of being hit twice.

use std::collections::VecDeque;

use rand::Rng;

use warglobe_core::commands::AttackOrder;
use warglobe_core::constants::{
    MISSILE_MAX_DURATION_MS, MISSILE_MIN_DURATION_MS, SALVO_MAX, SALVO_MIN, SALVO_STAGGER_MS,
};
use warglobe_core::enums::{LookupSide, StatusKind};
use warglobe_core::error::WarRoomError;
use warglobe_core::events::WorldEvent;
use warglobe_core::types::AttackId;
use warglobe_geo::{Country, CountryIndex};

use crate::feedback::Feedback;
use crate::registry::EntityRegistry;
use crate::scheduler::{DeferredEvent, Scheduler};

/// The order currently being executed.
#[derive(Debug, Clone)]
pub struct ActiveAttack {
    pub id: AttackId,
    pub attacker: Country,
    pub target: Country,
    pub salvo: u32,
    pub launched: u32,
    pub damage_due_ms: f64,
}

/// Why an order was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Error(WarRoomError),
    AlreadyDestroyed(String),
}

#[derive(Debug, Default)]
pub struct AttackOrchestrator {
    queue: VecDeque<AttackOrder>,
    active: Option<ActiveAttack>,
    next_id: u32,
}

impl AttackOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, orders: impl IntoIterator<Item = AttackOrder>) {
        self.queue.extend(orders);
    }

    pub fn active(&self) -> Option<&ActiveAttack> {
        self.active.as_ref()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.queue.is_empty()
    }

    /// Resolve both sides of an order and check the target is still standing.
    /// The attacker is checked first, so an order naming two unknown
    /// countries reports only the attacker.
    pub fn validate(
        order: &AttackOrder,
        countries: &CountryIndex,
        registry: &EntityRegistry,
    ) -> Result<(Country, Country), Rejection> {
        let attacker = countries.resolve(&order.attacker).ok_or_else(|| {
            Rejection::Error(WarRoomError::unresolved(
                LookupSide::Attacker,
                order.attacker.as_str(),
            ))
        })?;
        let target = countries.resolve(&order.target).ok_or_else(|| {
            Rejection::Error(WarRoomError::unresolved(
                LookupSide::Target,
                order.target.as_str(),
            ))
        })?;

        if attacker.id == target.id {
            return Err(Rejection::Error(WarRoomError::invalid(format!(
                "{} cannot attack itself",
                attacker.id
            ))));
        }
        if registry.is_damaged(&target.id) {
            return Err(Rejection::AlreadyDestroyed(target.id.to_string()));
        }

        Ok((attacker.clone(), target.clone()))
    }

    /// Start queued orders until one is running or the queue is empty.
    /// Rejected orders are reported and skipped.
    pub fn start_pending(
        &mut self,
        countries: &CountryIndex,
        registry: &EntityRegistry,
        scheduler: &mut Scheduler,
        rng: &mut impl Rng,
        now_ms: f64,
        feedback: &mut Feedback,
    ) {
        while self.active.is_none() {
            let Some(order) = self.queue.pop_front() else {
                return;
            };

            let (attacker, target) = match Self::validate(&order, countries, registry) {
                Ok(pair) => pair,
                Err(Rejection::Error(error)) => {
                    tracing::warn!(
                        attacker = %order.attacker,
                        target = %order.target,
                        %error,
                        "attack rejected"
                    );
                    feedback.error(&error);
                    continue;
                }
                Err(Rejection::AlreadyDestroyed(name)) => {
                    feedback.status(
                        StatusKind::Destroyed,
                        format!("{name} has already been destroyed"),
                    );
                    continue;
                }
            };

            self.next_id += 1;
            let id = AttackId(self.next_id);
            let salvo = rng.gen_range(SALVO_MIN..=SALVO_MAX);

            let mut last_landing = now_ms;
            for i in 0..salvo {
                let duration_ms = rng.gen_range(MISSILE_MIN_DURATION_MS..=MISSILE_MAX_DURATION_MS);
                let launch_ms = now_ms + f64::from(i) * SALVO_STAGGER_MS;
                last_landing = launch_ms + duration_ms;
                scheduler.schedule(
                    launch_ms,
                    DeferredEvent::LaunchMissile {
                        attack: id,
                        duration_ms,
                    },
                );
            }
            scheduler.schedule(last_landing, DeferredEvent::ApplyDamage { attack: id });

            feedback.status(
                StatusKind::Attack,
                format!("{} launches {salvo} missiles at {}", attacker.id, target.id),
            );
            self.active = Some(ActiveAttack {
                id,
                attacker,
                target,
                salvo,
                launched: 0,
                damage_due_ms: last_landing,
            });
        }
    }

    /// Launch one missile of the active salvo. Stale ids do nothing.
    pub fn launch(
        &mut self,
        attack: AttackId,
        duration_ms: f64,
        registry: &mut EntityRegistry,
        rng: &mut impl Rng,
        feedback: &mut Feedback,
    ) -> Option<hecs::Entity> {
        let active = self.active.as_mut().filter(|a| a.id == attack)?;
        let missile = registry.spawn_missile(
            attack,
            active.attacker.position,
            active.target.position,
            duration_ms,
            rng,
        );
        active.launched += 1;
        feedback.event(WorldEvent::MissileLaunched { attack });
        Some(missile)
    }

    /// Apply persistent damage for the active attack and clear it.
    /// Stale ids do nothing.
    pub fn complete(
        &mut self,
        attack: AttackId,
        registry: &mut EntityRegistry,
        rng: &mut impl Rng,
        feedback: &mut Feedback,
    ) -> bool {
        if self.active.as_ref().map(|a| a.id) != Some(attack) {
            return false;
        }
        let Some(active) = self.active.take() else {
            return false;
        };

        if registry.mark_country_damaged(&active.target, rng) {
            feedback.status(
                StatusKind::Destroyed,
                format!("{} has been destroyed", active.target.id),
            );
            feedback.event(WorldEvent::CountryDestroyed {
                country: active.target.id,
            });
        } else {
            feedback.status(
                StatusKind::Destroyed,
                format!("{} has already been destroyed", active.target.id),
            );
        }
        true
    }
}
