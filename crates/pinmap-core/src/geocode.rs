// ── Geocoding proxy ──
//
// Free-text address → first geocoder candidate. "No candidates" is a normal
// outcome, not an error: callers branch on `GeocodeOutcome`.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pinmap_api::{GeocodeClient, Place, TransportConfig};

use crate::config::GeocoderConfig;
use crate::error::CoreError;
use crate::model::Coordinates;
use crate::throttle::{RateLimiter, retry_delay};

pub const MISSING_ADDRESS: &str = "Missing address parameter";

/// The geocoder's top candidate, coordinates still as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeHit {
    pub lat: String,
    pub lon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl GeocodeHit {
    /// Parsed coordinates; `None` if the geocoder sent something unparseable.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::parse(&self.lat, &self.lon)
    }
}

impl From<Place> for GeocodeHit {
    fn from(place: Place) -> Self {
        Self {
            lat: place.lat,
            lon: place.lon,
            display_name: place.display_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeOutcome {
    Found(GeocodeHit),
    NotFound,
}

/// Anything that can turn free text into a location.
pub trait Geocoder: Send + Sync {
    /// Fails with `InvalidInput` for a blank address and `Upstream` on
    /// transport failure. Zero candidates is `Ok(NotFound)`.
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<GeocodeOutcome, CoreError>> + Send;
}

/// `Geocoder` backed by the Nominatim-compatible HTTP client.
///
/// Shares one `RateLimiter` across all callers and retries transient
/// failures with exponential backoff.
#[derive(Debug)]
pub struct GeocodeService {
    client: GeocodeClient,
    limiter: RateLimiter,
    max_attempts: u32,
    backoff_base: std::time::Duration,
}

impl GeocodeService {
    pub fn new(client: GeocodeClient, config: &GeocoderConfig) -> Self {
        Self {
            client,
            limiter: RateLimiter::new(config.min_interval),
            max_attempts: config.max_attempts.max(1),
            backoff_base: config.backoff_base,
        }
    }

    pub fn from_config(
        config: &GeocoderConfig,
        transport: &TransportConfig,
    ) -> Result<Self, CoreError> {
        let client = GeocodeClient::new(config.url.as_str(), transport)?;
        Ok(Self::new(client, config))
    }
}

impl Geocoder for GeocodeService {
    async fn geocode(&self, address: &str) -> Result<GeocodeOutcome, CoreError> {
        if address.trim().is_empty() {
            return Err(CoreError::invalid_input(MISSING_ADDRESS));
        }

        let mut attempt = 1;
        loop {
            self.limiter.acquire().await;
            match self.client.search(address).await {
                Ok(places) => {
                    debug!(address, candidates = places.len(), "geocoder answered");
                    return Ok(places
                        .into_iter()
                        .next()
                        .map_or(GeocodeOutcome::NotFound, |place| {
                            GeocodeOutcome::Found(place.into())
                        }));
                }
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let retry_after = match &err {
                        pinmap_api::Error::RateLimited { retry_after_secs } => {
                            Some(std::time::Duration::from_secs(*retry_after_secs))
                        }
                        _ => None,
                    };
                    let delay = retry_delay(self.backoff_base, attempt, retry_after);
                    warn!(address, attempt, ?delay, error = %err, "transient geocoder failure, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
