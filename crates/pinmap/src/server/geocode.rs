use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use pinmap_core::{GeocodeOutcome, Geocoder};

use super::{ApiError, AppState};

const NO_RESULTS: &str = "No results found";

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    #[serde(default)]
    pub address: Option<String>,
}

/// Zero candidates is a 200 with `success: false`, not an error status.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GeocodeResponse {
    Found {
        success: bool,
        lat: String,
        lon: String,
    },
    NotFound {
        success: bool,
        message: &'static str,
    },
}

/// `GET /api/geocode?address=`
pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let address = query.address.unwrap_or_default();
    let response = match state.resolver.geocoder().geocode(&address).await? {
        GeocodeOutcome::Found(hit) => GeocodeResponse::Found {
            success: true,
            lat: hit.lat,
            lon: hit.lon,
        },
        GeocodeOutcome::NotFound => GeocodeResponse::NotFound {
            success: false,
            message: NO_RESULTS,
        },
    };
    Ok(Json(response))
}
