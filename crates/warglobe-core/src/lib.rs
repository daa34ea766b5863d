//! Core types and definitions for the WARGLOBE engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, snapshot views, events, errors, curves and constants.
//! It has no dependency on any runtime, renderer or network client.

pub mod commands;
pub mod components;
pub mod constants;
pub mod curve;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::{Result, WarRoomError};

#[cfg(test)]
mod tests;
