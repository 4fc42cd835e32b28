// ── Collection → markers pipeline ──
//
// Fetch a collection's items, resolve their locations, and turn the
// survivors into markers for the given view.

use tracing::info;

use crate::error::CoreError;
use crate::gateway::RecordsGateway;
use crate::geocode::Geocoder;
use crate::render::{Marker, MapView, build_markers};
use crate::resolver::LocationResolver;

/// Markers for `view.collection_id`.
///
/// Items without a resolvable location are skipped; only the listing
/// itself can fail.
pub async fn collection_markers<G: Geocoder>(
    gateway: &RecordsGateway,
    resolver: &LocationResolver<G>,
    view: &MapView,
) -> Result<Vec<Marker>, CoreError> {
    let collection_id = view
        .collection_id
        .as_deref()
        .ok_or_else(|| CoreError::invalid_input("No database selected"))?;

    let items = gateway.list_items(collection_id).await?;
    let locations = resolver.resolve_all(&items).await;
    info!(
        collection_id,
        items = items.len(),
        resolved = locations.len(),
        "resolved collection locations"
    );

    Ok(build_markers(view, &items, &locations))
}
