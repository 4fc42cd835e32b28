use serde::{Deserialize, Serialize};

/// One candidate from the geocoder's `search` endpoint.
///
/// Coordinates arrive as decimal strings and are kept that way; parsing
/// happens in the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}
