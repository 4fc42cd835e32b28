// Free-text geocoder (Nominatim-compatible `search` endpoint)

mod client;
mod types;

pub use client::{DEFAULT_BASE_URL, GeocodeClient};
pub use types::Place;
