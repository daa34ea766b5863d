//! Events emitted by the engine for the status channel and scene feedback.

use serde::{Deserialize, Serialize};

use crate::enums::StatusKind;
use crate::types::{AttackId, CountryId, Point3};

/// Structured world events, drained into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorldEvent {
    /// A waypoint was appended.
    WaypointAdded { index: usize, label: String },
    /// A new leg started.
    FlightStarted {
        from_index: usize,
        to_index: usize,
        version: u64,
    },
    /// The traveler arrived at a waypoint.
    Arrived { index: usize, label: String },
    /// A travel request was vetoed.
    TravelBlocked { label: String, country: CountryId },
    /// One missile of a salvo left the launcher.
    MissileLaunched { attack: AttackId },
    /// A missile reached its target.
    MissileImpact { attack: AttackId, position: Point3 },
    /// A country was marked destroyed.
    CountryDestroyed { country: CountryId },
}

/// A short human-readable status line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub message: String,
    pub frame: u64,
}
