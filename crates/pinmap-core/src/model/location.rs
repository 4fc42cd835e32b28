use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
///
/// Zero is a valid coordinate; absence is modelled with `Option`, never
/// with a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Parse decimal text (as the geocoder and text fields carry it).
    ///
    /// Returns `None` if either side is blank, unparseable, or non-finite.
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        let latitude = parse_degree(latitude)?;
        let longitude = parse_degree(longitude)?;
        Some(Self {
            latitude,
            longitude,
        })
    }
}

fn parse_degree(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Where a location's coordinates came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationSource {
    /// Explicit `Latitude` / `Longitude` fields on the item.
    Explicit,
    /// Geocoder match for `query` (the raw address or its fallback).
    Geocoded { query: String },
}

/// An item paired with the coordinates it resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub item_id: String,
    pub title: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub source: LocationSource,
}
