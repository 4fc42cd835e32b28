//! Domain layer between `pinmap-api` and the HTTP / CLI front-ends.
//!
//! - **[`RecordsGateway`]**: reads collections, items and schemas from the
//!   workspace API and forwards the few write operations. Nothing is cached.
//!
//! - **[`GeocodeService`]**: free-text geocoding behind the [`Geocoder`]
//!   trait, rate limited and retried with backoff.
//!
//! - **[`LocationResolver`]**: explicit `Latitude`/`Longitude` fields first,
//!   then the geocoder, then a single regional fallback. Batches run with
//!   bounded concurrency.
//!
//! - **[`render`]**: pure marker view-model ([`MapView`], [`Intent`],
//!   [`build_markers`], [`embed_snippet`]).

pub mod config;
pub mod convert;
pub mod error;
pub mod gateway;
pub mod geocode;
pub mod markers;
pub mod model;
pub mod render;
pub mod resolver;
pub mod throttle;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{GeocoderConfig, ResolverOptions, ServiceConfig, WorkspaceConfig};
pub use error::CoreError;
pub use gateway::{RecordsGateway, visible_collections};
pub use geocode::{GeocodeHit, GeocodeOutcome, GeocodeService, Geocoder, MISSING_ADDRESS};
pub use markers::collection_markers;
pub use model::{
    Collection, Coordinates, FieldSchema, FieldType, FieldValue, Item, LocationSource,
    ResolvedLocation, SelectOption, TextRun,
};
pub use render::{Intent, MapView, Marker, build_markers, embed_snippet, split_field_list};
pub use resolver::{LocationResolver, explicit_coordinates, has_region_marker};
pub use throttle::RateLimiter;

// Transport settings are part of `ServiceConfig`.
pub use pinmap_api::{TlsMode, TransportConfig};
