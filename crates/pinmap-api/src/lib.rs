// pinmap-api: Async Rust clients for the workspace-database API and the geocoder

pub mod error;
pub mod geocode;
pub mod transport;
pub mod workspace;

pub use error::Error;
pub use geocode::{GeocodeClient, Place};
pub use transport::{TlsMode, TransportConfig};
pub use workspace::{Paginated, WorkspaceClient};
