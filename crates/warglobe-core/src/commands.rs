//! Commands sent to the engine from input handlers and async collaborators.
//!
//! Commands are queued and applied at the next tick boundary, never mid-tick.

use serde::{Deserialize, Serialize};

use crate::error::WarRoomError;

/// One attacker/target pair as produced by the attack-command resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOrder {
    pub attacker: String,
    pub target: String,
}

impl AttackOrder {
    pub fn new(attacker: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            attacker: attacker.into(),
            target: target.into(),
        }
    }
}

/// All possible world mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorldCommand {
    // --- Journey ---
    /// Append a resolved location to the journey. `country` is the country
    /// name reported by the location service, if any.
    AddWaypoint {
        label: String,
        lat: f64,
        lon: f64,
        country: Option<String>,
    },

    // --- War room ---
    /// Queue attack orders for sequential execution, in order.
    LaunchAttacks { orders: Vec<AttackOrder> },

    // --- Camera / globe ---
    /// Ease the camera to look down on a coordinate.
    FocusCamera { lat: f64, lon: f64 },
    /// Enable or disable ambient globe rotation.
    SetAmbientRotation { enabled: bool },

    // --- Speed ---
    /// Set the travel speed multiplier (clamped).
    SetSpeed { multiplier: f64 },
    /// Increase the speed multiplier by one step.
    SpeedUp,
    /// Decrease the speed multiplier by one step.
    SpeedDown,

    // --- Status ---
    /// Report a failure that happened outside the frame loop.
    ReportFailure { error: WarRoomError },
    /// Report neutral progress (e.g. "Searching...").
    ReportInfo { message: String },
}
