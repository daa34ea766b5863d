//! Globe geometry and country data for WARGLOBE.
//!
//! Sphere projection, great-circle and ballistic arc construction,
//! and the read-only country index built from boundary data.

pub use warglobe_core as core;

pub mod arcs;
pub mod countries;
pub mod projection;

// Re-export key items for convenience.
pub use arcs::{ballistic_arc, great_circle_arc};
pub use countries::{Country, CountryDataError, CountryIndex, CountryRecord};
pub use projection::project;

#[cfg(test)]
mod tests;
