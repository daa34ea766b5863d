//! Arc construction between two points on the globe.
//!
//! Both arcs rotate the start direction toward the end direction around the
//! axis perpendicular to both, lifting each sample by an altitude profile.
//! Route arcs hug the surface; ballistic arcs climb high and plunge.

use glam::DQuat;
use rand::Rng;

use warglobe_core::constants::*;
use warglobe_core::curve::Curve;
use warglobe_core::types::Point3;

/// Rotation axis carrying direction `from` onto direction `to`.
///
/// Falls back to a deterministic perpendicular axis when the directions are
/// parallel or antipodal, where the cross product degenerates.
pub fn rotation_axis(from: Point3, to: Point3) -> Point3 {
    let axis = from.cross(to);
    if axis.length() >= PARALLEL_EPSILON {
        return axis.normalize();
    }
    let helper = if from.y.abs() > 0.9 { Point3::X } else { Point3::Y };
    from.cross(helper).normalize()
}

/// Great-circle route between two surface points with a low sine-profile lift.
pub fn great_circle_arc(start: Point3, end: Point3) -> Curve {
    let from = start.normalize_or_zero();
    let to = end.normalize_or_zero();
    let axis = rotation_axis(from, to);
    let angle = from.angle_between(to);

    let max_altitude = ROUTE_MAX_ALTITUDE.min(angle * ROUTE_ALTITUDE_PER_RADIAN);
    let segments = ROUTE_MIN_SEGMENTS.max((angle * ROUTE_SEGMENTS_PER_RADIAN) as usize);

    sweep(from, axis, angle, segments, |t| {
        max_altitude * (t * std::f64::consts::PI).sin()
    })
}

/// Launch-and-plunge missile arc. The endpoint is deflected slightly at random
/// so the missiles of one salvo do not overlap.
pub fn ballistic_arc(start: Point3, end: Point3, rng: &mut impl Rng) -> Curve {
    let deflection = Point3::new(
        rng.gen_range(-BALLISTIC_DEFLECTION..=BALLISTIC_DEFLECTION),
        rng.gen_range(-BALLISTIC_DEFLECTION..=BALLISTIC_DEFLECTION),
        rng.gen_range(-BALLISTIC_DEFLECTION..=BALLISTIC_DEFLECTION),
    );
    let from = start.normalize_or_zero();
    let to = (end.normalize_or_zero() * EARTH_RADIUS + deflection).normalize_or_zero();
    let axis = rotation_axis(from, to);
    let angle = from.angle_between(to);

    let peak = BALLISTIC_MAX_ALTITUDE
        .min(BALLISTIC_BASE_ALTITUDE + angle * BALLISTIC_ALTITUDE_PER_RADIAN);
    let segments = BALLISTIC_MIN_SEGMENTS.max((angle * BALLISTIC_SEGMENTS_PER_RADIAN) as usize);

    sweep(from, axis, angle, segments, |t| {
        peak * (t.powf(BALLISTIC_SKEW) * std::f64::consts::PI).sin()
    })
}

/// Chord distance between two points, used for leg durations.
pub fn chord_distance(a: Point3, b: Point3) -> f64 {
    a.distance(b)
}

fn sweep(
    from: Point3,
    axis: Point3,
    angle: f64,
    segments: usize,
    altitude: impl Fn(f64) -> f64,
) -> Curve {
    let base = EARTH_RADIUS + SURFACE_OFFSET;
    let points = (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let direction = DQuat::from_axis_angle(axis, t * angle) * from;
            direction * (base + altitude(t))
        })
        .collect();
    Curve::new(points)
}
