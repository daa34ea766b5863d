//! Journey finite state machine.
//!
//! `Idle` → `InFlight` → `Holding` → `InFlight` … with a bounce at both ends
//! of the waypoint list. Every departure bumps a monotonic version; the
//! deferred continuation scheduled on arrival carries the version it was
//! created under and is ignored once a newer departure has happened.

use warglobe_core::constants::{FLIGHT_BASE_MS, FLIGHT_MS_PER_UNIT};
use warglobe_core::curve::Curve;
use warglobe_core::enums::{Direction, JourneyPhase};
use warglobe_core::types::Point3;

/// Read access to the waypoints and route segments a journey travels over.
///
/// Segment `i` joins waypoint `i` and waypoint `i + 1`.
pub trait Route {
    fn waypoint_count(&self) -> usize;
    fn waypoint_position(&self, index: usize) -> Option<Point3>;
    fn segment_curve(&self, segment: usize) -> Option<&Curve>;
}

/// Transient state of the traveler between two waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFlight {
    pub from_index: usize,
    pub target_index: usize,
    /// Segment being flown (the lower of the two waypoint indices).
    pub segment: usize,
    /// Duration at 1x speed, fixed at departure.
    pub base_duration_ms: f64,
    /// Progress in [0, 1].
    pub progress: f64,
    /// True when flying the segment from its end back to its start.
    pub backward: bool,
    pub version: u64,
}

impl ActiveFlight {
    /// Curve parameter for the current progress, reversed when flying backward.
    pub fn curve_parameter(&self) -> f64 {
        let t = self.progress.clamp(0.0, 1.0);
        if self.backward {
            1.0 - t
        } else {
            t
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum JourneyState {
    #[default]
    Idle,
    InFlight(ActiveFlight),
    /// Arrived; waiting for the continuation tagged with `version`.
    Holding { version: u64 },
}

/// A leg that just started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Departure {
    pub from_index: usize,
    pub to_index: usize,
    pub segment: usize,
    pub version: u64,
    pub base_duration_ms: f64,
}

/// Arrival at a waypoint. The caller schedules the settle-delay continuation
/// with this version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub index: usize,
    pub version: u64,
}

/// Traveler pose after one advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightFrame {
    pub position: Point3,
    /// Unit direction of travel in globe space.
    pub tangent: Point3,
    pub progress: f64,
    pub segment: usize,
    pub arrival: Option<Arrival>,
}

/// Outcome of a settle-delay continuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resume {
    /// The continuation was superseded; nothing happened.
    Stale,
    /// The next leg started.
    Departed(Departure),
    /// No permitted neighbor; the traveler stays at its waypoint.
    Parked,
}

/// The journey: waypoint count, last confirmed position, direction and
/// the current state.
#[derive(Debug, Clone, Default)]
pub struct Journey {
    len: usize,
    current_index: usize,
    direction: Direction,
    version: u64,
    state: JourneyState,
}

impl Journey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> JourneyPhase {
        match self.state {
            JourneyState::Idle => JourneyPhase::Idle,
            JourneyState::InFlight(_) => JourneyPhase::InFlight,
            JourneyState::Holding { .. } => JourneyPhase::Holding,
        }
    }

    pub fn state(&self) -> &JourneyState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn active_flight(&self) -> Option<&ActiveFlight> {
        match &self.state {
            JourneyState::InFlight(flight) => Some(flight),
            _ => None,
        }
    }

    /// React to a waypoint appended to the route.
    ///
    /// The second waypoint starts the first leg from waypoint 0. Later waypoints never
    /// interrupt a flight; while idle or holding, travel restarts at once,
    /// heading forward. `allowed` vetoes destinations.
    pub fn waypoint_added(
        &mut self,
        route: &impl Route,
        allowed: impl Fn(usize) -> bool,
    ) -> Option<Departure> {
        self.len = route.waypoint_count();

        match self.len {
            0 => None,
            1 => {
                self.current_index = 0;
                self.state = JourneyState::Idle;
                None
            }
            _ => {
                if matches!(self.state, JourneyState::InFlight(_)) {
                    return None;
                }
                self.direction = Direction::Forward;
                let (to, direction) = self.next_target(&allowed)?;
                Some(self.depart(to, direction, route))
            }
        }
    }

    /// Advance the active flight by `dt_ms` of wall-clock time at `speed`.
    ///
    /// Returns `None` when not in flight. The speed multiplier is applied per
    /// call, so a change takes effect on the very next advance.
    pub fn advance(&mut self, dt_ms: f64, speed: f64, route: &impl Route) -> Option<FlightFrame> {
        let JourneyState::InFlight(flight) = &mut self.state else {
            return None;
        };

        let step = (dt_ms * speed).max(0.0);
        flight.progress += step / flight.base_duration_ms;

        let parameter = flight.curve_parameter();
        let curve = route.segment_curve(flight.segment)?;
        let position = curve.point_at(parameter);
        let mut tangent = curve.tangent_at(parameter);
        if flight.backward {
            tangent = -tangent;
        }

        let mut frame = FlightFrame {
            position,
            tangent,
            progress: flight.progress.min(1.0),
            segment: flight.segment,
            arrival: None,
        };

        if flight.progress >= 1.0 {
            let arrival = Arrival {
                index: flight.target_index,
                version: flight.version,
            };
            self.current_index = arrival.index;
            self.state = JourneyState::Holding {
                version: arrival.version,
            };
            frame.arrival = Some(arrival);
        }

        Some(frame)
    }

    /// Settle-delay continuation. A no-op unless the journey is still holding
    /// under `version`.
    pub fn resume(
        &mut self,
        version: u64,
        route: &impl Route,
        allowed: impl Fn(usize) -> bool,
    ) -> Resume {
        match self.state {
            JourneyState::Holding { version: held }
                if held == version && self.version == version => {}
            _ => return Resume::Stale,
        }

        match self.next_target(&allowed) {
            Some((to, direction)) => Resume::Departed(self.depart(to, direction, route)),
            None => {
                self.state = JourneyState::Idle;
                Resume::Parked
            }
        }
    }

    /// Next waypoint by bouncing: step in the current direction, flipping at
    /// either end. If the bounced target is vetoed, the opposite neighbor is
    /// tried with the direction flipped.
    pub fn next_target(&self, allowed: impl Fn(usize) -> bool) -> Option<(usize, Direction)> {
        if self.len < 2 {
            return None;
        }

        let (index, direction) = match self.step(self.direction) {
            Some(index) => (index, self.direction),
            None => (self.step(self.direction.flipped())?, self.direction.flipped()),
        };
        if allowed(index) {
            return Some((index, direction));
        }

        let reversed = direction.flipped();
        self.step(reversed)
            .filter(|&i| allowed(i))
            .map(|i| (i, reversed))
    }

    fn step(&self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Forward => {
                let next = self.current_index + 1;
                (next < self.len).then_some(next)
            }
            Direction::Backward => self.current_index.checked_sub(1),
        }
    }

    fn depart(&mut self, to_index: usize, direction: Direction, route: &impl Route) -> Departure {
        let from_index = self.current_index;
        let segment = from_index.min(to_index);
        let base_duration_ms = leg_duration_ms(
            route.waypoint_position(from_index).unwrap_or_default(),
            route.waypoint_position(to_index).unwrap_or_default(),
        );

        self.version += 1;
        self.direction = direction;
        self.state = JourneyState::InFlight(ActiveFlight {
            from_index,
            target_index: to_index,
            segment,
            base_duration_ms,
            progress: 0.0,
            backward: to_index < from_index,
            version: self.version,
        });

        tracing::debug!(from_index, to_index, version = self.version, "leg started");

        Departure {
            from_index,
            to_index,
            segment,
            version: self.version,
            base_duration_ms,
        }
    }
}

/// Base leg duration at 1x speed: a fixed part plus a chord-proportional part.
pub fn leg_duration_ms(from: Point3, to: Point3) -> f64 {
    FLIGHT_BASE_MS + from.distance(to) * FLIGHT_MS_PER_UNIT
}
