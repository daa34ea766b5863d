//! Tests for the journey state machine.

use warglobe_core::constants::{EARTH_RADIUS, FLIGHT_BASE_MS, SURFACE_OFFSET};
use warglobe_core::curve::Curve;
use warglobe_core::enums::{Direction, JourneyPhase};
use warglobe_core::types::Point3;
use warglobe_geo::{great_circle_arc, project};

use crate::fsm::{leg_duration_ms, Journey, Resume, Route};

const SURFACE: f64 = EARTH_RADIUS + SURFACE_OFFSET;

/// Minimal route: waypoints plus one arc per adjacent pair.
#[derive(Default)]
struct TestRoute {
    waypoints: Vec<Point3>,
    segments: Vec<Curve>,
}

impl TestRoute {
    fn push(&mut self, lat: f64, lon: f64) {
        let position = project(lat, lon, SURFACE);
        if let Some(&previous) = self.waypoints.last() {
            self.segments.push(great_circle_arc(previous, position));
        }
        self.waypoints.push(position);
    }
}

impl Route for TestRoute {
    fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    fn waypoint_position(&self, index: usize) -> Option<Point3> {
        self.waypoints.get(index).copied()
    }

    fn segment_curve(&self, segment: usize) -> Option<&Curve> {
        self.segments.get(segment)
    }
}

fn any(_: usize) -> bool {
    true
}

fn add(journey: &mut Journey, route: &mut TestRoute, lat: f64, lon: f64) {
    route.push(lat, lon);
    journey.waypoint_added(route, any);
}

/// Fly until arrival, returning the arrival index and version.
fn fly_to_arrival(journey: &mut Journey, route: &TestRoute) -> (usize, u64) {
    for _ in 0..10_000 {
        let frame = journey
            .advance(50.0, 1.0, route)
            .expect("journey should be in flight");
        if let Some(arrival) = frame.arrival {
            return (arrival.index, arrival.version);
        }
    }
    panic!("flight never arrived");
}

// ---- Idle / first legs ----

#[test]
fn test_single_waypoint_is_idle() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    route.push(10.0, 10.0);
    assert!(journey.waypoint_added(&route, any).is_none());
    assert_eq!(journey.phase(), JourneyPhase::Idle);
    assert!(journey.advance(1000.0, 1.0, &route).is_none());
}

#[test]
fn test_second_waypoint_starts_flight() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    add(&mut journey, &mut route, 0.0, 0.0);
    route.push(0.0, 90.0);
    let departure = journey.waypoint_added(&route, any).unwrap();

    assert_eq!(departure.from_index, 0);
    assert_eq!(departure.to_index, 1);
    assert_eq!(departure.segment, 0);
    assert_eq!(departure.version, 1);
    assert_eq!(journey.phase(), JourneyPhase::InFlight);
    assert_eq!(journey.direction(), Direction::Forward);
}

#[test]
fn test_two_waypoint_end_to_end() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    add(&mut journey, &mut route, 0.0, 0.0);
    add(&mut journey, &mut route, 0.0, 90.0);

    let duration = journey.active_flight().unwrap().base_duration_ms;
    let frame = journey.advance(duration, 1.0, &route).unwrap();

    let b = project(0.0, 90.0, SURFACE);
    assert!(frame.position.distance(b) < 1e-6, "position {:?}", frame.position);
    let arrival = frame.arrival.unwrap();
    assert_eq!(arrival.index, 1);
    assert_eq!(journey.current_index(), 1);
    assert_eq!(journey.phase(), JourneyPhase::Holding);

    // Continuation after the settle delay bounces back toward A.
    match journey.resume(arrival.version, &route, any) {
        Resume::Departed(departure) => {
            assert_eq!(departure.to_index, 0);
            assert_eq!(departure.version, arrival.version + 1);
        }
        other => panic!("expected departure, got {other:?}"),
    }
    assert_eq!(journey.direction(), Direction::Backward);

    // And the leg back arrives at A.
    let (index, _) = fly_to_arrival(&mut journey, &route);
    assert_eq!(index, 0);
}

// ---- Progress and speed ----

#[test]
fn test_base_duration_is_fixed_plus_chord() {
    let a = project(0.0, 0.0, SURFACE);
    let b = project(0.0, 90.0, SURFACE);
    let expected = FLIGHT_BASE_MS + a.distance(b) * 800.0;
    assert!((leg_duration_ms(a, b) - expected).abs() < 1e-9);
}

#[test]
fn test_speed_change_applies_on_next_advance() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    add(&mut journey, &mut route, 0.0, 0.0);
    add(&mut journey, &mut route, 20.0, 40.0);

    let p1 = journey.advance(100.0, 1.0, &route).unwrap().progress;
    let p2 = journey.advance(100.0, 1.0, &route).unwrap().progress;
    let p3 = journey.advance(100.0, 3.0, &route).unwrap().progress;

    let normal_step = p2 - p1;
    let fast_step = p3 - p2;
    assert!(normal_step > 0.0);
    assert!((fast_step - 3.0 * normal_step).abs() < 1e-12);
}

#[test]
fn test_progress_strictly_increases() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    add(&mut journey, &mut route, 0.0, 0.0);
    add(&mut journey, &mut route, 0.0, 90.0);

    let mut last = 0.0;
    for _ in 0..20 {
        let progress = journey.advance(16.0, 0.5, &route).unwrap().progress;
        assert!(progress > last);
        last = progress;
    }
}

#[test]
fn test_negative_delta_does_not_rewind() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    add(&mut journey, &mut route, 0.0, 0.0);
    add(&mut journey, &mut route, 0.0, 90.0);

    let before = journey.advance(500.0, 1.0, &route).unwrap().progress;
    let after = journey.advance(-500.0, 1.0, &route).unwrap().progress;
    assert_eq!(before, after);
}

#[test]
fn test_backward_flight_starts_at_segment_end() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    add(&mut journey, &mut route, 0.0, 0.0);
    add(&mut journey, &mut route, 0.0, 90.0);
    let (_, version) = fly_to_arrival(&mut journey, &route);
    journey.resume(version, &route, any);

    let flight = journey.active_flight().unwrap();
    assert!(flight.backward);
    assert_eq!(flight.curve_parameter(), 1.0);

    let frame = journey.advance(1e-6, 1.0, &route).unwrap();
    let b = project(0.0, 90.0, SURFACE);
    assert!(frame.position.distance(b) < 1e-4);

    // Heading points back toward A.
    let a = project(0.0, 0.0, SURFACE);
    assert!(frame.tangent.dot(a - b) > 0.0);
}

// ---- Waypoint additions ----

#[test]
fn test_third_waypoint_does_not_interrupt_flight() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    add(&mut journey, &mut route, 0.0, 0.0);
    add(&mut journey, &mut route, 0.0, 90.0);
    journey.advance(1000.0, 1.0, &route);
    let before = journey.active_flight().cloned().unwrap();

    route.push(45.0, 45.0);
    assert!(journey.waypoint_added(&route, any).is_none());

    let after = journey.active_flight().unwrap();
    assert_eq!(after, &before);
    assert_eq!(journey.len(), 3);
}

#[test]
fn test_stale_continuation_is_noop() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    add(&mut journey, &mut route, 0.0, 0.0);
    add(&mut journey, &mut route, 0.0, 90.0);

    let (_, v1) = fly_to_arrival(&mut journey, &route);
    assert_eq!(journey.phase(), JourneyPhase::Holding);

    // A new waypoint while holding starts travel immediately under a new version.
    route.push(30.0, 120.0);
    let departure = journey.waypoint_added(&route, any).unwrap();
    assert_eq!(departure.to_index, 2);
    assert!(departure.version > v1);

    // The old continuation fires later and must do nothing.
    assert_eq!(journey.resume(v1, &route, any), Resume::Stale);
    let flight = journey.active_flight().unwrap();
    assert_eq!(flight.target_index, 2);
    assert_eq!(flight.version, departure.version);
    assert_eq!(flight.progress, 0.0);
}

#[test]
fn test_resume_while_in_flight_is_stale() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    add(&mut journey, &mut route, 0.0, 0.0);
    add(&mut journey, &mut route, 0.0, 90.0);
    let version = journey.version();
    assert_eq!(journey.resume(version, &route, any), Resume::Stale);
}

// ---- Bouncing ----

#[test]
fn test_bounce_visits_every_index_and_alternates_ends() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    for (lat, lon) in [(0.0, 0.0), (10.0, 20.0), (20.0, 40.0), (30.0, 60.0)] {
        add(&mut journey, &mut route, lat, lon);
    }

    let mut visited = vec![0usize];
    for _ in 0..12 {
        let (index, version) = fly_to_arrival(&mut journey, &route);
        visited.push(index);
        match journey.resume(version, &route, any) {
            Resume::Departed(_) => {}
            other => panic!("expected departure, got {other:?}"),
        }
    }

    assert_eq!(visited, vec![0, 1, 2, 3, 2, 1, 0, 1, 2, 3, 2, 1, 0]);

    // Consecutive visits are always neighbors, and both ends are reached
    // alternately.
    let mut last_end = None;
    for pair in visited.windows(2) {
        assert_eq!(pair[0].abs_diff(pair[1]), 1);
        if pair[1] == 0 || pair[1] == 3 {
            assert_ne!(last_end, Some(pair[1]));
            last_end = Some(pair[1]);
        }
    }
}

#[test]
fn test_vetoed_target_turns_around() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    for (lat, lon) in [(0.0, 0.0), (10.0, 20.0), (20.0, 40.0)] {
        add(&mut journey, &mut route, lat, lon);
    }
    let (index, version) = fly_to_arrival(&mut journey, &route);
    assert_eq!(index, 1);

    // Waypoint 2 is refused: the traveler heads back to 0 instead.
    match journey.resume(version, &route, |i| i != 2) {
        Resume::Departed(departure) => assert_eq!(departure.to_index, 0),
        other => panic!("expected departure, got {other:?}"),
    }
    assert_eq!(journey.direction(), Direction::Backward);
}

#[test]
fn test_all_neighbors_vetoed_parks() {
    let mut journey = Journey::new();
    let mut route = TestRoute::default();
    for (lat, lon) in [(0.0, 0.0), (10.0, 20.0), (20.0, 40.0)] {
        add(&mut journey, &mut route, lat, lon);
    }
    let (_, version) = fly_to_arrival(&mut journey, &route);

    assert_eq!(journey.resume(version, &route, |i| i == 1), Resume::Parked);
    assert_eq!(journey.phase(), JourneyPhase::Idle);
    assert_eq!(journey.current_index(), 1);
}
