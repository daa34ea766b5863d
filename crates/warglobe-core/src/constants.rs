//! Engine constants and tuning parameters.
//!
//! Distances are in globe units (the globe radius is `EARTH_RADIUS`).
//! Durations are wall-clock milliseconds unless stated otherwise.

use crate::types::Rgb;

// --- Globe ---

/// Radius of the rendered globe.
pub const EARTH_RADIUS: f64 = 3.2;

/// Height of markers and routes above the surface.
pub const SURFACE_OFFSET: f64 = 0.02;

/// Ambient globe rotation per frame (radians).
pub const GLOBE_ROTATION_PER_FRAME: f64 = 0.0009;

/// Ambient atmosphere rotation per frame (radians).
pub const ATMOSPHERE_ROTATION_PER_FRAME: f64 = 0.0012;

/// Ambient starfield rotation per frame (radians).
pub const STARS_ROTATION_PER_FRAME: f64 = 0.0002;

// --- Route arcs ---

/// Cross-product magnitude below which two directions are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 0.001;

/// Cap on route arc altitude.
pub const ROUTE_MAX_ALTITUDE: f64 = 0.15;

/// Route arc altitude per radian of separation.
pub const ROUTE_ALTITUDE_PER_RADIAN: f64 = 0.08;

/// Minimum number of route control segments.
pub const ROUTE_MIN_SEGMENTS: usize = 32;

/// Route control segments per radian of separation.
pub const ROUTE_SEGMENTS_PER_RADIAN: f64 = 40.0;

// --- Ballistic arcs ---

/// Cap on missile apex altitude.
pub const BALLISTIC_MAX_ALTITUDE: f64 = 1.6;

/// Missile apex altitude at zero separation.
pub const BALLISTIC_BASE_ALTITUDE: f64 = 0.35;

/// Missile apex altitude per radian of separation.
pub const BALLISTIC_ALTITUDE_PER_RADIAN: f64 = 0.45;

/// Exponent applied to `t` before the sine profile; below 1 the apex comes early.
pub const BALLISTIC_SKEW: f64 = 0.8;

/// Maximum per-axis endpoint deflection for salvo spread.
pub const BALLISTIC_DEFLECTION: f64 = 0.06;

/// Minimum number of ballistic control segments.
pub const BALLISTIC_MIN_SEGMENTS: usize = 48;

/// Ballistic control segments per radian of separation.
pub const BALLISTIC_SEGMENTS_PER_RADIAN: f64 = 60.0;

// --- Journey ---

/// Pause after arrival before the next leg. Not scaled by speed.
pub const SETTLE_DELAY_MS: f64 = 500.0;

/// Fixed part of a leg's base duration.
pub const FLIGHT_BASE_MS: f64 = 5000.0;

/// Base duration added per unit of chord distance between leg endpoints.
pub const FLIGHT_MS_PER_UNIT: f64 = 800.0;

/// Default speed multiplier.
pub const SPEED_DEFAULT: f64 = 1.0;

/// Speed multiplier bounds and step.
pub const SPEED_MIN: f64 = 0.5;
pub const SPEED_MAX: f64 = 5.0;
pub const SPEED_STEP: f64 = 0.5;

/// Distance along the tangent used to derive the screen-space heading.
pub const HEADING_LOOKAHEAD: f64 = 0.1;

// --- Route highlight ---

pub const ROUTE_IDLE_COLOR: Rgb = Rgb(0x4a7dc4);
pub const ROUTE_ACTIVE_COLOR: Rgb = Rgb(0x6fb5ff);
pub const ROUTE_IDLE_OPACITY: f64 = 0.5;
pub const ROUTE_ACTIVE_OPACITY: f64 = 0.8;

/// Active route opacity pulses `BASE + AMPLITUDE * sin(elapsed_ms * RATE)`.
pub const ROUTE_PULSE_BASE: f64 = 0.6;
pub const ROUTE_PULSE_AMPLITUDE: f64 = 0.2;
pub const ROUTE_PULSE_RATE: f64 = 0.003;

/// Number of points exported per route polyline.
pub const ROUTE_RENDER_POINTS: usize = 120;

// --- Markers ---

pub const MARKER_COLOR: Rgb = Rgb(0xffd666);
pub const MARKER_SCALE: f64 = 0.05;
pub const LABEL_HEIGHT: f64 = 0.09;
/// Label width per character of text, in label heights.
pub const LABEL_WIDTH_PER_CHAR: f64 = 0.55;
pub const LABEL_OUTWARD_OFFSET: f64 = 0.06;
pub const LABEL_SIDE_GAP: f64 = 0.08;
pub const LABEL_UP_OFFSET: f64 = 0.02;
pub const TRAVELER_SCALE: f64 = 0.25;
pub const TRAVELER_COLOR: Rgb = Rgb(0xffffff);

// --- Camera ---

/// Default camera transition duration. Not scaled by speed.
pub const CAMERA_TRANSITION_MS: f64 = 1500.0;

/// Camera distance from the globe center when focused on a city.
pub const CAMERA_FOCUS_DISTANCE: f64 = 7.0;

/// Initial camera position.
pub const CAMERA_START: [f64; 3] = [0.0, 3.5, 9.0];

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEGREES: f64 = 45.0;

pub const CAMERA_NEAR: f64 = 0.1;
pub const CAMERA_FAR: f64 = 200.0;

// --- Attacks ---

/// Salvo size bounds (inclusive).
pub const SALVO_MIN: u32 = 5;
pub const SALVO_MAX: u32 = 10;

/// Delay between consecutive launches of a salvo.
pub const SALVO_STAGGER_MS: f64 = 200.0;

/// Missile flight duration bounds.
pub const MISSILE_MIN_DURATION_MS: f64 = 2500.0;
pub const MISSILE_MAX_DURATION_MS: f64 = 3500.0;

/// How long a missile lingers after impact before it is retired.
pub const MISSILE_LINGER_MS: f64 = 300.0;

/// Positions kept in each missile trail.
pub const MISSILE_TRAIL_LEN: usize = 24;

pub const MISSILE_COLOR: Rgb = Rgb(0xff3b30);
pub const MISSILE_SCALE: f64 = 0.04;

/// Impact flash lifetime and scale range.
pub const FLASH_LIFETIME_MS: f64 = 600.0;
pub const FLASH_START_SCALE: f64 = 0.05;
pub const FLASH_END_SCALE: f64 = 0.45;
pub const FLASH_COLOR: Rgb = Rgb(0xffd27f);

// --- Damage ---

/// Border color applied to destroyed countries.
pub const DAMAGED_BORDER_COLOR: Rgb = Rgb(0xff2222);

pub const GLOW_COLOR: Rgb = Rgb(0xff4400);
pub const GLOW_SCALE: f64 = 0.35;
pub const GLOW_PULSE_RATE: f64 = 0.004;

/// Craters per destroyed country.
pub const CRATER_COUNT: usize = 4;
/// Maximum crater distance from the centroid, along the surface.
pub const CRATER_SPREAD: f64 = 0.15;
pub const CRATER_COLOR: Rgb = Rgb(0x2b1a10);
pub const CRATER_FLICKER_RATE: f64 = 0.011;

/// Fire/smoke particles per destroyed country.
pub const FIRE_PARTICLES: usize = 40;
pub const PARTICLE_MIN_LIFETIME_MS: f64 = 1000.0;
pub const PARTICLE_MAX_LIFETIME_MS: f64 = 2000.0;
/// Particle rise speed along the surface normal, units per second.
pub const PARTICLE_RISE_SPEED: f64 = 0.12;
/// Maximum horizontal drift speed, units per second.
pub const PARTICLE_DRIFT_SPEED: f64 = 0.03;
pub const FIRE_COLOR: Rgb = Rgb(0xff6a00);
pub const SMOKE_COLOR: Rgb = Rgb(0x555555);

// --- Search ---

/// Keystroke debounce before a search request is issued.
pub const SEARCH_DEBOUNCE_MS: f64 = 300.0;

/// Shortest query that triggers a search.
pub const SEARCH_MIN_QUERY_LEN: usize = 2;

/// Maximum number of suggestions requested.
pub const SEARCH_LIMIT: usize = 6;

/// Shortest query allowed to use substring country matching.
pub const COUNTRY_SUBSTRING_MIN_LEN: usize = 3;
