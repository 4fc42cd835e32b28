// ── Location resolution ──
//
// Item → coordinates. Explicit `Latitude`/`Longitude` fields short-circuit
// the network; otherwise the item's title is geocoded as free text, with a
// single regional fallback attempt. Unresolved items are dropped, never
// reported as errors.

use futures_util::{FutureExt, StreamExt, stream};
use tracing::{debug, warn};

use crate::config::ResolverOptions;
use crate::geocode::{GeocodeOutcome, Geocoder};
use crate::model::{Coordinates, FieldValue, Item, LocationSource, ResolvedLocation};

pub const LATITUDE_FIELD: &str = "Latitude";
pub const LONGITUDE_FIELD: &str = "Longitude";

// ── Pure helpers ───────────────────────────────────────────────────

fn explicit_component(value: &FieldValue) -> Option<f64> {
    let degrees = match value {
        FieldValue::RichText(_) | FieldValue::Title(_) => value
            .first_text()
            .and_then(|text| text.trim().parse::<f64>().ok()),
        FieldValue::Number(number) => *number,
        _ => None,
    };
    degrees.filter(|v| v.is_finite())
}

/// Coordinates carried by the item itself.
///
/// Both fields must be present and parse; a lone latitude or longitude
/// counts as absent.
pub fn explicit_coordinates(item: &Item) -> Option<Coordinates> {
    let latitude = explicit_component(item.field(LATITUDE_FIELD)?)?;
    let longitude = explicit_component(item.field(LONGITUDE_FIELD)?)?;
    Some(Coordinates {
        latitude,
        longitude,
    })
}

/// Case-sensitive whole-word match against `markers`.
///
/// Words are maximal runs of alphanumeric characters, so `"CA"` matches
/// `"Fresno, CA 93721"` but not `"Cascade Rd"`.
pub fn has_region_marker(address: &str, markers: &[String]) -> bool {
    address
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| markers.iter().any(|marker| marker == word))
}

// ── Resolver ───────────────────────────────────────────────────────

/// Resolves items to map locations through a [`Geocoder`].
#[derive(Debug)]
pub struct LocationResolver<G> {
    geocoder: G,
    options: ResolverOptions,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G, options: ResolverOptions) -> Self {
        Self { geocoder, options }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve one item, or `None` if no coordinates could be found.
    pub async fn resolve(&self, item: &Item) -> Option<ResolvedLocation> {
        let title = item.display_title();

        if let Some(coordinates) = explicit_coordinates(item) {
            debug!(item = %item.id, "using explicit coordinates");
            return Some(ResolvedLocation {
                item_id: item.id.clone(),
                address: title.clone(),
                title,
                coordinates,
                source: LocationSource::Explicit,
            });
        }

        let (query, coordinates) = self.lookup(&title).await?;
        Some(ResolvedLocation {
            item_id: item.id.clone(),
            address: title.clone(),
            title,
            coordinates,
            source: LocationSource::Geocoded { query },
        })
    }

    /// Resolve a batch with at most `concurrency` lookups in flight.
    ///
    /// Results keep the input order; unresolved items are skipped.
    pub async fn resolve_all(&self, items: &[Item]) -> Vec<ResolvedLocation> {
        // Collected eagerly: a lazily mapped stream over `&Item` is not `Send`.
        let lookups: Vec<_> = items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                self.resolve(item)
                    .map(move |outcome| outcome.map(|loc| (idx, loc)))
            })
            .collect();
        let mut resolved: Vec<(usize, ResolvedLocation)> = stream::iter(lookups)
            .buffer_unordered(self.options.concurrency.max(1))
            .filter_map(std::future::ready)
            .collect()
            .await;

        resolved.sort_by_key(|(idx, _)| *idx);
        debug!(
            total = items.len(),
            resolved = resolved.len(),
            "resolved batch"
        );
        resolved.into_iter().map(|(_, loc)| loc).collect()
    }

    /// Raw address first, then at most one regional fallback.
    async fn lookup(&self, address: &str) -> Option<(String, Coordinates)> {
        if let Some(coordinates) = self.attempt(address).await {
            return Some((address.to_owned(), coordinates));
        }

        if !has_region_marker(address, &self.options.region_markers) {
            let fallback = format!("{address}{}", self.options.fallback_suffix);
            if let Some(coordinates) = self.attempt(&fallback).await {
                return Some((fallback, coordinates));
            }
        }

        warn!(address, "geocode failed, skipping item");
        None
    }

    async fn attempt(&self, query: &str) -> Option<Coordinates> {
        match self.geocoder.geocode(query).await {
            Ok(GeocodeOutcome::Found(hit)) => {
                let coordinates = hit.coordinates();
                if coordinates.is_none() {
                    warn!(query, lat = %hit.lat, lon = %hit.lon, "geocoder returned unparseable coordinates");
                }
                coordinates
            }
            Ok(GeocodeOutcome::NotFound) => {
                debug!(query, "no geocoder match");
                None
            }
            Err(err) => {
                warn!(query, error = %err, "geocoder lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::error::CoreError;
    use crate::geocode::GeocodeHit;

    // ── Scripted geocoder ──────────────────────────────────────────

    enum Script {
        Hit(&'static str, &'static str),
        Fail,
    }

    #[derive(Default)]
    struct ScriptedGeocoder {
        script: HashMap<String, Script>,
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        delay: Duration,
    }

    impl ScriptedGeocoder {
        fn with(mut self, address: &str, script: Script) -> Self {
            self.script.insert(address.to_owned(), script);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Geocoder for ScriptedGeocoder {
        async fn geocode(&self, address: &str) -> Result<GeocodeOutcome, CoreError> {
            self.calls.lock().unwrap().push(address.to_owned());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.script.get(address) {
                Some(Script::Hit(lat, lon)) => Ok(GeocodeOutcome::Found(GeocodeHit {
                    lat: (*lat).to_owned(),
                    lon: (*lon).to_owned(),
                    display_name: None,
                })),
                Some(Script::Fail) => Err(CoreError::Upstream {
                    message: "connection reset".into(),
                    status: None,
                }),
                None => Ok(GeocodeOutcome::NotFound),
            }
        }
    }

    fn resolver(geocoder: ScriptedGeocoder) -> LocationResolver<ScriptedGeocoder> {
        LocationResolver::new(geocoder, ResolverOptions::default())
    }

    fn text(value: &str) -> Value {
        json!({ "type": "rich_text", "rich_text": [{ "plain_text": value }] })
    }

    fn item(id: &str, title: &str, extra: &[(&str, Value)]) -> Item {
        let mut props = serde_json::Map::new();
        props.insert(
            "Name".into(),
            json!({ "type": "title", "title": [{ "plain_text": title }] }),
        );
        for (name, value) in extra {
            props.insert((*name).to_owned(), value.clone());
        }
        Item::try_from(json!({ "id": id, "properties": props })).unwrap()
    }

    // ── Pure helpers ───────────────────────────────────────────────

    #[test]
    fn region_marker_is_whole_word_and_case_sensitive() {
        let markers = ResolverOptions::default().region_markers;
        assert!(has_region_marker("123 Main St, USA", &markers));
        assert!(has_region_marker("Fresno, CA 93721", &markers));
        assert!(!has_region_marker("123 Main St", &markers));
        assert!(!has_region_marker("400 Cascade Rd", &markers));
        assert!(!has_region_marker("Sacramento, ca", &markers));
        assert!(!has_region_marker("USAF Academy", &markers));
    }

    #[test]
    fn lone_coordinate_counts_as_absent() {
        let only_lat = item("p", "Somewhere", &[("Latitude", text("37.5"))]);
        assert_eq!(explicit_coordinates(&only_lat), None);

        let blank_lon = item(
            "p",
            "Somewhere",
            &[("Latitude", text("37.5")), ("Longitude", text(""))],
        );
        assert_eq!(explicit_coordinates(&blank_lon), None);
    }

    #[test]
    fn numeric_coordinate_fields_are_accepted() {
        let it = item(
            "p",
            "Null Island",
            &[
                ("Latitude", json!({ "type": "number", "number": 0 })),
                ("Longitude", json!({ "type": "number", "number": 0.0 })),
            ],
        );
        assert_eq!(
            explicit_coordinates(&it),
            Some(Coordinates {
                latitude: 0.0,
                longitude: 0.0
            })
        );
    }

    // ── Resolution paths ───────────────────────────────────────────

    #[tokio::test]
    async fn explicit_fields_skip_the_geocoder() {
        let r = resolver(ScriptedGeocoder::default());
        let it = item(
            "p1",
            "City Hall",
            &[("Latitude", text("37.5")), ("Longitude", text("-122.1"))],
        );

        let loc = r.resolve(&it).await.unwrap();

        assert_eq!(
            loc.coordinates,
            Coordinates {
                latitude: 37.5,
                longitude: -122.1
            }
        );
        assert_eq!(loc.source, LocationSource::Explicit);
        assert!(r.geocoder().calls().is_empty());
    }

    #[tokio::test]
    async fn unparseable_explicit_fields_fall_back_to_geocoding() {
        let r = resolver(ScriptedGeocoder::default().with("Pier 39", Script::Hit("37.8", "-122.4")));
        let it = item(
            "p1",
            "Pier 39",
            &[("Latitude", text("north-ish")), ("Longitude", text("-122.1"))],
        );

        let loc = r.resolve(&it).await.unwrap();
        assert_eq!(r.geocoder().calls(), vec!["Pier 39"]);
        assert_eq!(
            loc.source,
            LocationSource::Geocoded {
                query: "Pier 39".into()
            }
        );
    }

    #[tokio::test]
    async fn fallback_is_tried_exactly_once() {
        let r = resolver(ScriptedGeocoder::default());
        let it = item("p1", "123 Main St", &[]);

        assert!(r.resolve(&it).await.is_none());
        assert_eq!(
            r.geocoder().calls(),
            vec!["123 Main St", "123 Main St, CA, USA"]
        );
    }

    #[tokio::test]
    async fn fallback_match_is_used() {
        let r = resolver(
            ScriptedGeocoder::default().with("123 Main St, CA, USA", Script::Hit("34.05", "-118.25")),
        );
        let loc = r.resolve(&item("p1", "123 Main St", &[])).await.unwrap();

        assert_eq!(loc.address, "123 Main St");
        assert_eq!(
            loc.source,
            LocationSource::Geocoded {
                query: "123 Main St, CA, USA".into()
            }
        );
    }

    #[tokio::test]
    async fn regional_addresses_are_not_retried() {
        let r = resolver(ScriptedGeocoder::default());

        assert!(r.resolve(&item("p1", "123 Main St, USA", &[])).await.is_none());
        assert_eq!(r.geocoder().calls(), vec!["123 Main St, USA"]);
    }

    #[tokio::test]
    async fn geocoder_errors_are_treated_as_no_match() {
        let r = resolver(
            ScriptedGeocoder::default()
                .with("Ferry Building", Script::Fail)
                .with("Ferry Building, CA, USA", Script::Hit("37.79", "-122.39")),
        );
        let loc = r.resolve(&item("p1", "Ferry Building", &[])).await;
        assert!(loc.is_some());
    }

    #[tokio::test]
    async fn unparseable_geocoder_coordinates_are_no_match() {
        let r = resolver(ScriptedGeocoder::default().with("Nowhere, USA", Script::Hit("", "")));
        assert!(r.resolve(&item("p1", "Nowhere, USA", &[])).await.is_none());
    }

    // ── Batches ────────────────────────────────────────────────────

    #[tokio::test]
    async fn batch_keeps_order_and_drops_unresolved() {
        let r = resolver(
            ScriptedGeocoder::default().with("1 Market St", Script::Hit("37.79", "-122.39")),
        );
        let items = vec![
            item(
                "explicit",
                "HQ",
                &[("Latitude", text("37.5")), ("Longitude", text("-122.1"))],
            ),
            item("geocoded", "1 Market St", &[]),
            item("lost", "Atlantis", &[]),
        ];

        let locations = r.resolve_all(&items).await;

        let ids: Vec<_> = locations.iter().map(|l| l.item_id.as_str()).collect();
        assert_eq!(ids, vec!["explicit", "geocoded"]);
    }

    #[tokio::test(start_paused = true)]
    async fn batch_respects_concurrency_cap() {
        let geocoder = ScriptedGeocoder {
            delay: Duration::from_millis(50),
            ..ScriptedGeocoder::default()
        };
        let r = LocationResolver::new(
            geocoder,
            ResolverOptions {
                concurrency: 2,
                ..ResolverOptions::default()
            },
        );
        let items: Vec<_> = (0..6)
            .map(|i| item(&format!("p{i}"), &format!("{i} Main St, USA"), &[]))
            .collect();

        let locations = r.resolve_all(&items).await;

        assert!(locations.is_empty());
        assert_eq!(r.geocoder().calls().len(), 6);
        assert_eq!(r.geocoder().peak.load(Ordering::SeqCst), 2);
    }
}
