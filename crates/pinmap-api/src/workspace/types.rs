// Request and response shapes for the workspace-database API.
//
// Listing payloads stay as raw `serde_json::Value` objects so callers can
// forward upstream records untouched; only the envelope is typed here.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A cursor-paginated listing (`search`, `databases/{id}/query`).
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Error body returned by the workspace API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

// ── Request bodies ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub filter: SearchFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchFilter {
    pub property: &'static str,
    pub value: &'static str,
}

impl SearchFilter {
    pub(crate) fn databases() -> Self {
        Self {
            property: "object",
            value: "database",
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

/// A single plain-text rich-text run: `{type: "text", text: {content}}`.
pub(crate) fn text_run(content: &str) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}

pub(crate) fn new_database_body(parent_page_id: &str, title: &str) -> Value {
    json!({
        "parent": { "type": "page_id", "page_id": parent_page_id },
        "title": [text_run(title)],
        "properties": { "Name": { "title": {} } },
    })
}

pub(crate) fn new_page_body(database_id: &str, name: &str, header: &str) -> Value {
    json!({
        "parent": { "type": "database_id", "database_id": database_id },
        "properties": {
            "Name": { "title": [text_run(name)] },
        },
        "children": [{
            "object": "block",
            "type": "heading_2",
            "heading_2": { "rich_text": [text_run(header)] },
        }],
    })
}

pub(crate) fn paragraph_children_body(content: &str) -> Value {
    json!({
        "children": [{
            "object": "block",
            "type": "paragraph",
            "paragraph": { "rich_text": [text_run(content)] },
        }],
    })
}

pub(crate) fn new_comment_body(page_id: &str, comment: &str) -> Value {
    json!({
        "parent": { "page_id": page_id },
        "rich_text": [text_run(comment)],
    })
}
