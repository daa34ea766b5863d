//! Recoverable error kinds. None of these stop the frame loop; the engine
//! turns each one into a status message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::LookupSide;

pub type Result<T> = std::result::Result<T, WarRoomError>;

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum WarRoomError {
    /// A search returned nothing, or a country name could not be matched.
    #[error("could not resolve {side} \"{name}\"")]
    ResolutionFailure { side: LookupSide, name: String },

    /// A network or service call was rejected or failed.
    #[error("service failure: {message}")]
    ServiceFailure { message: String },

    /// The attack-command service returned a malformed entry or an explicit error.
    #[error("invalid command: {message}")]
    InvalidCommand { message: String },

    /// The destination lies in a destroyed country.
    #[error("cannot travel to {label}: {country} has been destroyed")]
    BlockedDestination { label: String, country: String },
}

impl WarRoomError {
    pub fn unresolved(side: LookupSide, name: impl Into<String>) -> Self {
        WarRoomError::ResolutionFailure {
            side,
            name: name.into(),
        }
    }

    pub fn service(message: impl Into<String>) -> Self {
        WarRoomError::ServiceFailure {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        WarRoomError::InvalidCommand {
            message: message.into(),
        }
    }
}
