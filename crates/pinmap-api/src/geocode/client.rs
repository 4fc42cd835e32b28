// Async client for the free-text geocoder.
//
// Single endpoint: GET search?format=json&q=<free text>

use tracing::debug;
use url::Url;

use super::types::Place;
use crate::Error;
use crate::transport::{TransportConfig, retry_after_secs};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Async client for a Nominatim-compatible geocoder.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GeocodeClient {
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        Self::from_reqwest(base_url, transport.build_client()?)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    /// Look up free text. Candidates come back in the geocoder's ranking order.
    pub async fn search(&self, query: &str) -> Result<Vec<Place>, Error> {
        let url = self.base_url.join("search")?;
        debug!("GET {url} q={query:?}");

        let resp = self
            .http
            .get(url)
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited {
                retry_after_secs: retry_after_secs(resp.headers()),
            });
        }
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            return Err(Error::Geocoder {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
