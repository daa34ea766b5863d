//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// Journey state machine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JourneyPhase {
    /// Fewer than two waypoints, or nothing scheduled.
    #[default]
    Idle,
    /// The traveler is between two waypoints.
    InFlight,
    /// Arrived; waiting out the settle delay before the next leg.
    Holding,
}

/// Direction of travel along the waypoint list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Toward higher waypoint indices.
    #[default]
    Forward,
    /// Toward lower waypoint indices.
    Backward,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Which name in a lookup failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupSide {
    /// A free-text location search.
    Location,
    /// The attacking country of an attack order.
    Attacker,
    /// The target country of an attack order.
    Target,
}

impl std::fmt::Display for LookupSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LookupSide::Location => "location",
            LookupSide::Attacker => "attacker",
            LookupSide::Target => "target",
        };
        f.write_str(name)
    }
}

/// Category of a user-facing status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    /// Search in progress or neutral information.
    Info,
    /// First waypoint placed or waypoint appended.
    WaypointAdded,
    /// A new leg started.
    Departure,
    /// The traveler reached a waypoint.
    Arrival,
    /// A travel request was vetoed.
    Blocked,
    /// Attack progress (launch).
    Attack,
    /// A country became destroyed, or was already destroyed.
    Destroyed,
    /// Resolution, service or command failure.
    Error,
}

/// Discriminant of a damage effect, used by the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Glow,
    Crater,
    Fire,
}
