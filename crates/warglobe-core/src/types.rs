//! Fundamental geometric and timing types.

use serde::{Deserialize, Serialize};

/// A point in globe-local space. The globe is centered at the origin,
/// y points to the north pole.
pub type Point3 = glam::DVec3;

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Index of a waypoint in the journey order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WaypointId(pub usize);

/// Identifier of one attack order within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttackId(pub u32);

/// Canonical country identifier (the feature name as published by the boundary data).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CountryId(pub String);

impl CountryId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CountryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wall-clock frame timing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of frames presented so far.
    pub frame: u64,
    /// Elapsed wall-clock time in milliseconds.
    pub elapsed_ms: f64,
}

impl SimTime {
    /// Advance by one frame of `dt_ms` milliseconds. Negative deltas are ignored.
    pub fn advance(&mut self, dt_ms: f64) {
        self.frame += 1;
        self.elapsed_ms += dt_ms.max(0.0);
    }
}

/// A 24-bit RGB color, as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn channels(self) -> (f64, f64, f64) {
        let r = ((self.0 >> 16) & 0xff) as f64 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f64 / 255.0;
        let b = (self.0 & 0xff) as f64 / 255.0;
        (r, g, b)
    }

    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        let to_byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        Self((to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b))
    }

    /// Linear blend toward `other` by `t` in [0, 1].
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let (r0, g0, b0) = self.channels();
        let (r1, g1, b1) = other.channels();
        Rgb::from_channels(r0 + (r1 - r0) * t, g0 + (g1 - g0) * t, b0 + (b1 - b0) * t)
    }
}
