//! WARGLOBE runtime shell.
//!
//! Wires the scene engine to a frame-loop thread, the external location and
//! attack-command services, and the debounced search session. The `warglobe`
//! binary drives all of it from stdin.

pub mod config;
pub mod game_loop;
pub mod runner;
pub mod search;
pub mod services;
pub mod state;

pub use warglobe_core as core;
