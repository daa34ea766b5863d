//! Journey state machine for WARGLOBE.
//!
//! Drives the single traveler back and forth across the ordered waypoint
//! list. Operates on plain data through the [`fsm::Route`] trait; it owns
//! no entities and knows nothing about why a destination may be refused.

pub mod fsm;

pub use fsm::{ActiveFlight, Arrival, Departure, FlightFrame, Journey, JourneyState, Resume, Route};

#[cfg(test)]
mod tests;
