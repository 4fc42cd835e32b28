use axum::Json;
use axum::extract::{Query, State};
use axum::response::Html;
use serde::{Deserialize, Serialize};

use pinmap_core::{Intent, MapView, embed_snippet, split_field_list};

use super::{ApiError, AppState};

const MISSING_DB: &str = "Missing db parameter";

/// View choices carried in the embed URL.
#[derive(Debug, Default, Deserialize)]
pub struct EmbedQuery {
    #[serde(default)]
    pub db: Option<String>,
    #[serde(default)]
    pub fields: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl EmbedQuery {
    fn view(self) -> Result<MapView, ApiError> {
        let db = self
            .db
            .filter(|db| !db.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest(MISSING_DB.into()))?;
        let fields = self.fields.as_deref().map(split_field_list).unwrap_or_default();

        Ok(fields.into_iter().fold(
            MapView::default()
                .update(Intent::SelectCollection(Some(db)))
                .update(Intent::SetColorField(self.color.filter(|c| !c.is_empty()))),
            |view, field| view.update(Intent::ToggleField(field)),
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct SnippetResponse {
    pub success: bool,
    pub snippet: String,
}

/// `GET /api/embed?db=&fields=&color=`
pub async fn snippet(
    State(state): State<AppState>,
    Query(query): Query<EmbedQuery>,
) -> Result<Json<SnippetResponse>, ApiError> {
    let view = query.view()?;
    let snippet = embed_snippet(&state.public_url, &view)
        .ok_or_else(|| ApiError::Internal("could not build embed URL".into()))?;
    Ok(Json(SnippetResponse {
        success: true,
        snippet,
    }))
}

const PAGE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
const map = L.map("map").setView([37.7749, -122.4194], 10);
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);
fetch(__MARKERS_URL__)
  .then((res) => res.json())
  .then((body) => {
    if (!body.success) { console.warn(body.message); return; }
    const points = body.results.map((m) => {
      L.circleMarker([m.lat, m.lon], { color: m.color, radius: 8 })
        .bindPopup(m.popup_html)
        .addTo(map);
      return [m.lat, m.lon];
    });
    if (points.length) map.fitBounds(points, { padding: [24, 24] });
  });
</script>
</body>
</html>
"#;

/// Relative markers URL for `view`, as a JS string literal safe inside
/// `<script>`.
fn markers_url_literal(view: &MapView) -> Result<String, ApiError> {
    let id = view.collection_id.as_deref().unwrap_or_default();
    let mut url = url::Url::parse("http://localhost/").map_err(|e| ApiError::Internal(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| ApiError::Internal("base URL cannot carry a path".into()))?
        .extend(["api", "databases", id, "markers"]);
    {
        let mut query = url.query_pairs_mut();
        if !view.visible_fields.is_empty() {
            query.append_pair("fields", &view.visible_fields.join(","));
        }
        if let Some(color) = view.color_field.as_deref() {
            query.append_pair("color", color);
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }

    serde_json::to_string(&url[url::Position::BeforePath..])
        .map(|literal| literal.replace('<', "\\u003c"))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// `GET /embed?db=&fields=&color=`: a standalone map page.
pub async fn page(Query(query): Query<EmbedQuery>) -> Result<Html<String>, ApiError> {
    let view = query.view()?;
    Ok(Html(PAGE.replace("__MARKERS_URL__", &markers_url_literal(&view)?)))
}
