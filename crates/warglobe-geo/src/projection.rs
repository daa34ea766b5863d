//! Geographic projection: lat/lon on a sphere to globe-local Cartesian space.
//!
//! Same convention as the renderer's sphere mesh: longitude 0 faces +x,
//! longitude 90 faces -z, the north pole is +y.

use warglobe_core::types::{GeoCoord, Point3};

/// Convert lat/lon (degrees) to a point at `radius` from the globe center.
pub fn project(lat: f64, lon: f64, radius: f64) -> Point3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lon + 180.0).to_radians();
    Point3::new(
        -(radius * phi.sin() * theta.cos()),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Inverse of [`project`]; the radius is discarded.
pub fn unproject(point: Point3) -> GeoCoord {
    let radius = point.length();
    if radius <= f64::EPSILON {
        return GeoCoord::default();
    }
    let lat = 90.0 - (point.y / radius).clamp(-1.0, 1.0).acos().to_degrees();
    let theta = point.z.atan2(-point.x).to_degrees();
    let lon = (theta - 180.0 + 540.0).rem_euclid(360.0) - 180.0;
    GeoCoord::new(lat, lon)
}

/// Horizontal tangent at a surface direction: `up × normal`, or +x at the poles.
pub fn surface_tangent(normal: Point3) -> Point3 {
    let tangent = Point3::Y.cross(normal);
    if tangent.length_squared() < 1e-12 {
        Point3::X
    } else {
        tangent.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_prime_meridian_is_plus_x() {
        let p = project(0.0, 0.0, 2.0);
        assert!((p - Point3::new(2.0, 0.0, 0.0)).length() < 1e-9, "{p:?}");
    }

    #[test]
    fn test_east_90_is_minus_z() {
        let p = project(0.0, 90.0, 1.0);
        assert!((p - Point3::new(0.0, 0.0, -1.0)).length() < 1e-9, "{p:?}");
    }

    #[test]
    fn test_north_pole_is_plus_y() {
        let p = project(90.0, 37.0, 3.0);
        assert!((p - Point3::new(0.0, 3.0, 0.0)).length() < 1e-9, "{p:?}");
    }

    #[test]
    fn test_unproject_inverts_project() {
        for &(lat, lon) in &[(48.85, 2.35), (-33.9, 151.2), (40.7, -74.0)] {
            let geo = unproject(project(lat, lon, 3.2));
            assert!((geo.lat - lat).abs() < 1e-9, "{geo:?}");
            assert!((geo.lon - lon).abs() < 1e-9, "{geo:?}");
        }
    }

    #[test]
    fn test_tangent_is_perpendicular_to_normal() {
        let normal = project(30.0, 60.0, 1.0);
        let tangent = surface_tangent(normal);
        assert!(tangent.dot(normal).abs() < 1e-12);
        assert_eq!(surface_tangent(Point3::Y), Point3::X);
    }
}
