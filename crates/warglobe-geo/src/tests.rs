//! Tests for arcs and the country index.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use warglobe_core::constants::{EARTH_RADIUS, SURFACE_OFFSET};
use warglobe_core::types::{CountryId, Point3};

use crate::arcs::{ballistic_arc, great_circle_arc, rotation_axis};
use crate::countries::{CountryIndex, CountryRecord};
use crate::projection::project;

const SURFACE: f64 = EARTH_RADIUS + SURFACE_OFFSET;

// ---- Arcs ----

#[test]
fn test_route_arc_endpoints_match_waypoints() {
    let a = project(0.0, 0.0, SURFACE);
    let b = project(0.0, 90.0, SURFACE);
    let curve = great_circle_arc(a, b);
    assert!(curve.point_at(0.0).distance(a) < 1e-9);
    assert!(curve.point_at(1.0).distance(b) < 1e-9);
}

#[test]
fn test_route_arc_lifts_toward_midpoint_and_is_capped() {
    let a = project(10.0, -120.0, SURFACE);
    let b = project(-20.0, 100.0, SURFACE);
    let curve = great_circle_arc(a, b);
    let mid = curve.point_at(0.5).length();
    assert!(mid > SURFACE + 0.05, "midpoint radius {mid}");
    for p in curve.points() {
        assert!(p.length() <= SURFACE + 0.15 + 1e-9);
    }
}

#[test]
fn test_short_hop_keeps_segment_floor() {
    let a = project(48.85, 2.35, SURFACE);
    let b = project(50.85, 4.35, SURFACE);
    let curve = great_circle_arc(a, b);
    assert_eq!(curve.points().len(), 33);
}

#[test]
fn test_antipodal_axis_is_finite_and_perpendicular() {
    let a = project(0.0, 0.0, 1.0);
    let b = project(0.0, 180.0, 1.0);
    let axis = rotation_axis(a, b);
    assert!(axis.is_finite());
    assert!((axis.length() - 1.0).abs() < 1e-9);
    assert!(axis.dot(a).abs() < 1e-9);

    // Deterministic fallback.
    assert_eq!(axis, rotation_axis(a, b));
}

#[test]
fn test_antipodal_arc_progresses_monotonically() {
    let a = project(0.0, 0.0, SURFACE);
    let b = project(0.0, 180.0, SURFACE);
    let curve = great_circle_arc(a, b);

    let mut last_distance = f64::MAX;
    for i in 0..=50 {
        let p = curve.point_at(i as f64 / 50.0);
        assert!(p.is_finite(), "NaN at step {i}");
        let to_end = p.normalize().angle_between(b.normalize());
        assert!(to_end <= last_distance + 1e-9, "regressed at step {i}");
        last_distance = to_end;
    }
    assert!(curve.point_at(1.0).distance(b) < 1e-6);
}

#[test]
fn test_polar_antipodes_use_alternate_helper() {
    let a = Point3::Y;
    let b = -Point3::Y;
    let axis = rotation_axis(a, b);
    assert!(axis.is_finite());
    assert!(axis.dot(a).abs() < 1e-9);
}

#[test]
fn test_ballistic_arc_climbs_higher_than_route() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let a = project(46.6, 2.4, EARTH_RADIUS);
    let b = project(51.1, 10.4, EARTH_RADIUS);
    let route = great_circle_arc(a, b);
    let missile = ballistic_arc(a, b, &mut rng);

    let route_peak = route.points().iter().map(|p| p.length()).fold(0.0, f64::max);
    let missile_peak = missile.points().iter().map(|p| p.length()).fold(0.0, f64::max);
    assert!(missile_peak > route_peak + 0.2);
}

#[test]
fn test_ballistic_apex_comes_before_midpoint() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let a = project(0.0, 0.0, EARTH_RADIUS);
    let b = project(0.0, 60.0, EARTH_RADIUS);
    let missile = ballistic_arc(a, b, &mut rng);
    let points = missile.points();
    let apex = points
        .iter()
        .enumerate()
        .max_by(|x, y| x.1.length().total_cmp(&y.1.length()))
        .map(|(i, _)| i)
        .unwrap();
    assert!(apex < points.len() / 2, "apex index {apex} of {}", points.len());
}

#[test]
fn test_ballistic_endpoint_is_deflected_but_near_target() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let a = project(0.0, 0.0, EARTH_RADIUS);
    let b = project(30.0, 30.0, EARTH_RADIUS);
    let missile = ballistic_arc(a, b, &mut rng);
    let landing = missile.end().normalize();
    assert!(landing.angle_between(b.normalize()) < 0.05);
}

// ---- Country index ----

fn sample_geojson() -> serde_json::Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "France" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 44.0], [4.0, 44.0], [4.0, 48.0], [0.0, 48.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ADMIN": "Germany" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[8.0, 50.0], [12.0, 50.0]], [[100.0, 100.0]]],
                        [[[10.0, 54.0], [10.0, 54.0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "United States of America" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-100.0, 40.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "United Kingdom" },
                "geometry": { "type": "Polygon", "coordinates": [[[-2.0, 54.0]]] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0]]] }
            },
            {
                "type": "Feature",
                "properties": { "name": "Nowhere" },
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            }
        ]
    })
}

#[test]
fn test_geojson_centroid_averages_outer_ring() {
    let index = CountryIndex::from_geojson(&sample_geojson()).unwrap();
    let france = index.resolve("France").unwrap();
    assert_eq!(france.centroid.lat, 46.0);
    assert_eq!(france.centroid.lon, 2.0);
}

#[test]
fn test_multipolygon_ignores_holes_and_joins_outer_rings() {
    let index = CountryIndex::from_geojson(&sample_geojson()).unwrap();
    let germany = index.resolve("germany").unwrap();
    assert!((germany.centroid.lat - 52.0).abs() < 1e-9);
    assert!((germany.centroid.lon - 10.0).abs() < 1e-9);
}

#[test]
fn test_unnamed_and_non_polygon_features_skipped() {
    let index = CountryIndex::from_geojson(&sample_geojson()).unwrap();
    assert_eq!(index.len(), 4);
    assert!(index.resolve("Nowhere").is_none());
}

#[test]
fn test_resolution_tiers() {
    let index = CountryIndex::from_geojson(&sample_geojson()).unwrap();

    // Exact, case-insensitive.
    assert_eq!(index.resolve("  FRANCE ").unwrap().id, CountryId::new("France"));
    // Substring containment.
    assert_eq!(
        index.resolve("United States").unwrap().id,
        CountryId::new("United States of America")
    );
    // Reverse containment: the query contains the name.
    assert_eq!(index.resolve("southern france").unwrap().id, CountryId::new("France"));
    // Alias table.
    assert_eq!(
        index.resolve("U.S.A.").unwrap().id,
        CountryId::new("United States of America")
    );
    assert_eq!(index.resolve("uk").unwrap().id, CountryId::new("United Kingdom"));
    // Unknown.
    assert!(index.resolve("Atlantis").is_none());
    assert!(index.resolve("").is_none());
}

#[test]
fn test_short_query_does_not_substring_match() {
    let index = CountryIndex::from_geojson(&sample_geojson()).unwrap();
    assert!(index.resolve("an").is_none());
}

#[test]
fn test_records_round_trip_through_json() {
    let index = CountryIndex::from_geojson(&sample_geojson()).unwrap();
    let json = serde_json::to_string(&index.records()).unwrap();
    let reloaded = CountryIndex::from_json_str(&json).unwrap();
    assert_eq!(reloaded.len(), index.len());
    assert_eq!(
        reloaded.resolve("germany").unwrap().centroid,
        index.resolve("germany").unwrap().centroid
    );
}

#[test]
fn test_record_position_is_on_surface() {
    let index = CountryIndex::from_records(&[CountryRecord {
        name: "Equatoria".into(),
        lat: 0.0,
        lon: 0.0,
    }]);
    let country = index.get(&CountryId::new("Equatoria")).unwrap();
    assert!((country.position - Point3::new(EARTH_RADIUS, 0.0, 0.0)).length() < 1e-9);
}

#[test]
fn test_scalar_json_is_rejected() {
    assert!(CountryIndex::from_json_str("42").is_err());
    assert!(CountryIndex::from_json_str("{\"type\":\"FeatureCollection\"}").is_err());
}
