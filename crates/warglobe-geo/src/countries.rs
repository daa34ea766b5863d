//! Country index built once from boundary data.
//!
//! Accepts either a GeoJSON `FeatureCollection` of Polygon/MultiPolygon
//! features, or the compact `[{name, lat, lon}]` record list produced by
//! `country-prep`. Centroids are the plain average of outer-ring vertices.
//!
//! Name resolution is a heuristic with three tiers, tried in order:
//! exact match, substring containment (either direction), then a small
//! alias table whose expansion must be contained in a country name.
//! Ambiguous substring matches resolve to the first country in input order.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use warglobe_core::constants::{COUNTRY_SUBSTRING_MIN_LEN, EARTH_RADIUS};
use warglobe_core::types::{CountryId, GeoCoord, Point3};

use crate::projection::project;

/// Property keys probed for a feature's name, in order.
const NAME_KEYS: &[&str] = &["name", "NAME", "ADMIN", "admin", "name_long", "NAME_LONG"];

/// Common abbreviations and informal names, mapped to a fragment of the
/// official name.
const ALIASES: &[(&str, &str)] = &[
    ("usa", "united states"),
    ("us", "united states"),
    ("america", "united states"),
    ("uk", "united kingdom"),
    ("britain", "united kingdom"),
    ("great britain", "united kingdom"),
    ("england", "united kingdom"),
    ("uae", "united arab emirates"),
    ("drc", "democratic republic of the congo"),
    ("czechia", "czech"),
    ("holland", "netherlands"),
    ("ivory coast", "ivoire"),
    ("burma", "myanmar"),
    ("persia", "iran"),
];

#[derive(Debug, Error)]
pub enum CountryDataError {
    #[error("failed to read country data: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported country data: {0}")]
    Unsupported(String),
}

/// Compact on-disk country record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// A country known to the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub id: CountryId,
    pub centroid: GeoCoord,
    /// Centroid projected onto the globe surface.
    pub position: Point3,
    normalized: String,
}

impl Country {
    fn new(name: &str, centroid: GeoCoord) -> Self {
        Self {
            id: CountryId::new(name),
            centroid,
            position: project(centroid.lat, centroid.lon, EARTH_RADIUS),
            normalized: normalize_name(name),
        }
    }
}

/// Read-only lookup from names to centroids.
#[derive(Debug, Clone, Default)]
pub struct CountryIndex {
    countries: Vec<Country>,
}

impl CountryIndex {
    /// Build from compact records.
    pub fn from_records(records: &[CountryRecord]) -> Self {
        Self {
            countries: records
                .iter()
                .map(|r| Country::new(&r.name, GeoCoord::new(r.lat, r.lon)))
                .collect(),
        }
    }

    /// Build from a parsed GeoJSON `FeatureCollection`.
    /// Features without a name or a polygon geometry are skipped.
    pub fn from_geojson(collection: &Value) -> Result<Self, CountryDataError> {
        let features = collection
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| CountryDataError::Unsupported("missing \"features\" array".into()))?;

        let mut countries = Vec::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            let Some(name) = feature_name(feature) else {
                tracing::warn!(feature = i, "skipping country feature without a name");
                continue;
            };
            let Some(centroid) = feature.get("geometry").and_then(outer_ring_centroid) else {
                tracing::warn!(
                    feature = i,
                    name,
                    "skipping country feature without polygon geometry"
                );
                continue;
            };
            countries.push(Country::new(name, centroid));
        }
        Ok(Self { countries })
    }

    /// Parse either a GeoJSON collection or a record list.
    pub fn from_json_str(json: &str) -> Result<Self, CountryDataError> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Array(_) => {
                let records: Vec<CountryRecord> = serde_json::from_value(value)?;
                Ok(Self::from_records(&records))
            }
            Value::Object(_) => Self::from_geojson(&value),
            _ => Err(CountryDataError::Unsupported(
                "expected a FeatureCollection or a record array".into(),
            )),
        }
    }

    /// Load from a file in either supported format.
    pub fn load(path: &Path) -> Result<Self, CountryDataError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Export as compact records, in index order.
    pub fn records(&self) -> Vec<CountryRecord> {
        self.countries
            .iter()
            .map(|c| CountryRecord {
                name: c.id.0.clone(),
                lat: c.centroid.lat,
                lon: c.centroid.lon,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    /// Look up by canonical identifier.
    pub fn get(&self, id: &CountryId) -> Option<&Country> {
        self.countries.iter().find(|c| &c.id == id)
    }

    /// Resolve a free-form country name.
    pub fn resolve(&self, query: &str) -> Option<&Country> {
        let query = normalize_name(query);
        if query.is_empty() {
            return None;
        }

        if let Some(country) = self.countries.iter().find(|c| c.normalized == query) {
            return Some(country);
        }

        if query.len() >= COUNTRY_SUBSTRING_MIN_LEN {
            let found = self
                .countries
                .iter()
                .find(|c| c.normalized.contains(&query) || query.contains(&c.normalized));
            if found.is_some() {
                return found;
            }
        }

        let (_, expansion) = ALIASES.iter().find(|(alias, _)| *alias == query)?;
        self.countries
            .iter()
            .find(|c| c.normalized.contains(expansion))
    }
}

/// Lowercase, drop periods, collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .replace('.', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn feature_name(feature: &Value) -> Option<&str> {
    let properties = feature.get("properties")?;
    NAME_KEYS
        .iter()
        .filter_map(|key| properties.get(*key).and_then(Value::as_str))
        .find(|name| !name.trim().is_empty())
}

/// Average of every outer-ring vertex. MultiPolygons contribute the outer
/// ring of each member polygon.
fn outer_ring_centroid(geometry: &Value) -> Option<GeoCoord> {
    let kind = geometry.get("type")?.as_str()?;
    let coordinates = geometry.get("coordinates")?.as_array()?;

    let rings: Vec<&Value> = match kind {
        "Polygon" => coordinates.first().into_iter().collect(),
        "MultiPolygon" => coordinates
            .iter()
            .filter_map(|polygon| polygon.as_array()?.first())
            .collect(),
        _ => return None,
    };

    let mut sum_lat = 0.0;
    let mut sum_lon = 0.0;
    let mut count = 0usize;
    for ring in rings {
        for vertex in ring.as_array()? {
            let pair = vertex.as_array()?;
            let lon = pair.first()?.as_f64()?;
            let lat = pair.get(1)?.as_f64()?;
            sum_lon += lon;
            sum_lat += lat;
            count += 1;
        }
    }

    (count > 0).then(|| GeoCoord::new(sum_lat / count as f64, sum_lon / count as f64))
}
