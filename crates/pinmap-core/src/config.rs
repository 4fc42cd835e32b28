// ── Runtime configuration ──
//
// Fully resolved settings handed to the gateway and resolver. Produced by
// `pinmap-config` from TOML + environment; tests build it directly.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use pinmap_api::TransportConfig;

/// Workspace API connection settings.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    pub url: Url,
    pub token: SecretString,
    pub api_version: String,
    /// Parent page for `create_database`. Database creation fails without it.
    pub parent_page_id: Option<String>,
    /// Upper bound on cursor pages followed per listing.
    pub max_pages: usize,
}

/// Geocoder connection and politeness settings.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub url: Url,
    /// Minimum spacing between upstream requests.
    pub min_interval: Duration,
    /// Attempts per lookup, counting the first (transient failures only).
    pub max_attempts: u32,
    /// First backoff delay; doubled on every further attempt.
    pub backoff_base: Duration,
}

impl GeocoderConfig {
    /// Settings for `url` with the public geocoder's usage policy applied
    /// (one request per second).
    pub fn new(url: Url) -> Self {
        Self {
            url,
            min_interval: Duration::from_secs(1),
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
        }
    }
}

/// Location resolution settings.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Maximum in-flight lookups for one batch.
    pub concurrency: usize,
    /// Appended for the single fallback attempt.
    pub fallback_suffix: String,
    /// Whole words that mark an address as already regional.
    pub region_markers: Vec<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            fallback_suffix: ", CA, USA".into(),
            region_markers: vec!["CA".into(), "USA".into()],
        }
    }
}

/// Everything the services need.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Absent when only geocoding is needed (e.g. the `geocode` command).
    pub workspace: Option<WorkspaceConfig>,
    pub geocoder: GeocoderConfig,
    pub resolver: ResolverOptions,
    pub transport: TransportConfig,
}
