//! Scene engine for WARGLOBE.
//!
//! Owns the hecs world behind the entity registry, runs the journey, attack
//! and camera flows in a fixed per-frame order, and produces
//! `SceneSnapshot`s for the renderer.

pub mod camera;
pub mod engine;
pub mod feedback;
pub mod orchestrator;
pub mod registry;
pub mod scheduler;
pub mod systems;
pub mod world_setup;

pub use warglobe_core as core;
pub use engine::{EngineConfig, WorldEngine};
