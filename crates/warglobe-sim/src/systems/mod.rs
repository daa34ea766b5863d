//! Per-frame systems, run by the engine in a fixed order:
//! ambient rotation, journey, missiles, damage effects, then the snapshot.
//!
//! Systems are free functions over the registry; they own no state beyond
//! what is passed in.

pub mod ambient;
pub mod effects;
pub mod journey;
pub mod missiles;
pub mod snapshot;
