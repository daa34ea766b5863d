//! Smooth parametric curve through a list of control points.
//!
//! Uniform Catmull-Rom interpolation with an arc-length lookup table, so
//! `point_at(u)` advances at constant speed along the curve as `u` goes
//! from 0 to 1. Routes and missile trajectories are both stored as `Curve`s.

use crate::types::Point3;

/// Number of samples in the arc-length table.
const ARC_DIVISIONS: usize = 200;

/// Parameter offset used for finite-difference tangents.
const TANGENT_DELTA: f64 = 1e-4;

/// A continuous curve passing through every control point.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: Vec<Point3>,
    /// Cumulative arc length at `i / ARC_DIVISIONS` of the raw parameter.
    lengths: Vec<f64>,
}

impl Curve {
    /// Build a curve through `points`. A single point is duplicated so the
    /// curve is always evaluable; an empty list yields a curve at the origin.
    pub fn new(mut points: Vec<Point3>) -> Self {
        match points.len() {
            0 => points = vec![Point3::ZERO, Point3::ZERO],
            1 => points.push(points[0]),
            _ => {}
        }
        let mut curve = Self {
            points,
            lengths: Vec::with_capacity(ARC_DIVISIONS + 1),
        };
        curve.lengths = curve.compute_lengths();
        curve
    }

    /// Control points in order.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// First control point.
    pub fn start(&self) -> Point3 {
        self.points[0]
    }

    /// Last control point.
    pub fn end(&self) -> Point3 {
        self.points[self.points.len() - 1]
    }

    /// Approximate total arc length.
    pub fn length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at raw parameter `t` in [0, 1] (not arc-length uniform).
    pub fn point(&self, t: f64) -> Point3 {
        let t = t.clamp(0.0, 1.0);
        let last = self.points.len() - 1;
        let p = last as f64 * t;
        let mut index = p.floor() as usize;
        let mut weight = p - index as f64;
        if index >= last {
            index = last - 1;
            weight = 1.0;
        }

        let p1 = self.points[index];
        let p2 = self.points[index + 1];
        let p0 = if index > 0 {
            self.points[index - 1]
        } else {
            p1 * 2.0 - p2
        };
        let p3 = if index + 2 <= last {
            self.points[index + 2]
        } else {
            p2 * 2.0 - p1
        };

        catmull_rom(p0, p1, p2, p3, weight)
    }

    /// Point at arc-length parameter `u` in [0, 1].
    pub fn point_at(&self, u: f64) -> Point3 {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at arc-length parameter `u`, pointing toward increasing `u`.
    pub fn tangent_at(&self, u: f64) -> Point3 {
        let t = self.u_to_t(u);
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        (self.point(t2) - self.point(t1)).normalize_or_zero()
    }

    /// `count + 1` evenly spaced (by arc length) points, for line rendering.
    pub fn sample(&self, count: usize) -> Vec<Point3> {
        let count = count.max(1);
        (0..=count)
            .map(|i| self.point_at(i as f64 / count as f64))
            .collect()
    }

    fn compute_lengths(&self) -> Vec<f64> {
        let mut lengths = Vec::with_capacity(ARC_DIVISIONS + 1);
        let mut total = 0.0;
        let mut prev = self.point(0.0);
        lengths.push(0.0);
        for i in 1..=ARC_DIVISIONS {
            let current = self.point(i as f64 / ARC_DIVISIONS as f64);
            total += current.distance(prev);
            lengths.push(total);
            prev = current;
        }
        lengths
    }

    /// Map an arc-length fraction to the raw curve parameter.
    fn u_to_t(&self, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);
        let total = self.length();
        if total <= f64::EPSILON {
            return u;
        }
        let target = u * total;

        // Largest index whose cumulative length does not exceed the target.
        let i = match self
            .lengths
            .binary_search_by(|len| len.partial_cmp(&target).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(i) => return i as f64 / ARC_DIVISIONS as f64,
            Err(i) => i.saturating_sub(1),
        };
        if i >= ARC_DIVISIONS {
            return 1.0;
        }

        let before = self.lengths[i];
        let span = self.lengths[i + 1] - before;
        let fraction = if span > 0.0 { (target - before) / span } else { 0.0 };
        ((i as f64 + fraction) / ARC_DIVISIONS as f64).clamp(0.0, 1.0)
    }
}

fn catmull_rom(p0: Point3, p1: Point3, p2: Point3, p3: Point3, t: f64) -> Point3 {
    let t2 = t * t;
    let t3 = t2 * t;
    (p1 * 2.0
        + (p2 - p0) * t
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
        + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
        * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point3, b: Point3) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_endpoints_are_exact() {
        let curve = Curve::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);
        assert!(close(curve.point_at(0.0), curve.start()));
        assert!(close(curve.point_at(1.0), curve.end()));
    }

    #[test]
    fn test_arc_length_on_straight_line_is_linear() {
        let curve = Curve::new(vec![Point3::ZERO, Point3::new(10.0, 0.0, 0.0)]);
        assert!((curve.length() - 10.0).abs() < 1e-6);
        let mid = curve.point_at(0.5);
        assert!((mid.x - 5.0).abs() < 1e-3, "mid = {mid:?}");
    }

    #[test]
    fn test_tangent_points_forward() {
        let curve = Curve::new(vec![Point3::ZERO, Point3::new(0.0, 0.0, 4.0)]);
        let tangent = curve.tangent_at(0.5);
        assert!((tangent.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_point_curve_is_evaluable() {
        let curve = Curve::new(vec![Point3::ONE]);
        assert!(close(curve.point_at(0.3), Point3::ONE));
        assert_eq!(curve.tangent_at(0.3), Point3::ZERO);
    }
}
