use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use pinmap_core::{
    Collection, FieldSchema, Intent, Item, MapView, Marker, collection_markers, split_field_list,
};

use super::{ApiError, AppState};

/// `{success: true, results}` envelope of the listing routes.
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub success: bool,
    pub results: Vec<T>,
}

impl<T> Listing<T> {
    fn ok(results: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            results,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub properties: FieldSchema,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkerQuery {
    #[serde(default)]
    pub fields: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl MarkerQuery {
    fn view(self, collection_id: String) -> MapView {
        let fields = self.fields.as_deref().map(split_field_list).unwrap_or_default();
        let color = self.color.filter(|c| !c.trim().is_empty());

        fields.into_iter().fold(
            MapView::for_collection(collection_id).update(Intent::SetColorField(color)),
            |view, field| view.update(Intent::ToggleField(field)),
        )
    }
}

/// `GET /api/databases`
pub async fn list(State(state): State<AppState>) -> Result<Json<Listing<Collection>>, ApiError> {
    let collections = state.gateway.list_collections().await?;
    Ok(Listing::ok(collections))
}

/// `GET /api/databases/{id}/pages`
pub async fn pages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Listing<Item>>, ApiError> {
    let items = state.gateway.list_items(&id).await?;
    Ok(Listing::ok(items))
}

/// `GET /api/databases/{id}`: the property schema, with upstream failures
/// reported under the upstream's status code.
pub async fn schema(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SchemaResponse>, ApiError> {
    let properties = state
        .gateway
        .get_schema(&id)
        .await
        .map_err(ApiError::with_upstream_status)?;
    Ok(Json(SchemaResponse { properties }))
}

/// `GET /api/databases/{id}/markers?fields=a,b&color=c`
pub async fn markers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MarkerQuery>,
) -> Result<Json<Listing<Marker>>, ApiError> {
    let view = query.view(id);
    let markers = collection_markers(&state.gateway, &state.resolver, &view).await?;
    Ok(Listing::ok(markers))
}
