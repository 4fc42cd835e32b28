// Write-through routes. Failures are reported inside a 200 envelope
// (`{message: "error", error}`) rather than as an HTTP error status.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use pinmap_core::CoreError;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl From<Result<Value, CoreError>> for Envelope {
    fn from(result: Result<Value, CoreError>) -> Self {
        match result {
            Ok(data) => Self {
                message: "success",
                data: Some(data),
                error: None,
            },
            Err(err) => {
                warn!(error = %err, "write rejected");
                Self {
                    message: "error",
                    data: None,
                    error: Some(ErrorDetail {
                        status: err.status(),
                        message: err.to_string(),
                    }),
                }
            }
        }
    }
}

impl Envelope {
    /// Bodies axum could not decode still answer inside the envelope.
    fn rejected(rejection: &JsonRejection) -> Self {
        warn!(status = %rejection.status(), error = %rejection.body_text(), "write body rejected");
        Self {
            message: "error",
            data: None,
            error: Some(ErrorDetail {
                message: rejection.body_text(),
                status: None,
            }),
        }
    }
}

// ── Request bodies ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewDatabase {
    #[serde(rename = "dbName", default)]
    pub db_name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewPage {
    #[serde(rename = "dbID", default)]
    pub db_id: String,
    #[serde(rename = "pageName", default)]
    pub page_name: String,
    #[serde(default)]
    pub header: String,
}

#[derive(Debug, Deserialize)]
pub struct NewBlock {
    #[serde(rename = "pageID", default)]
    pub page_id: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct NewComment {
    #[serde(rename = "pageID", default)]
    pub page_id: String,
    #[serde(default)]
    pub comment: String,
}

fn require(value: &str, name: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::invalid_input(format!("Missing {name}")));
    }
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/databases", post(create_database))
        .route("/pages", post(create_page))
        .route("/blocks", post(append_block))
        .route("/comments", post(create_comment))
}

async fn create_database(
    State(state): State<AppState>,
    payload: Result<Json<NewDatabase>, JsonRejection>,
) -> Json<Envelope> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return Json(Envelope::rejected(&rejection)),
    };
    let result = match require(&body.db_name, "dbName") {
        Ok(()) => state.gateway.create_database(&body.db_name).await,
        Err(err) => Err(err),
    };
    Json(result.into())
}

async fn create_page(
    State(state): State<AppState>,
    payload: Result<Json<NewPage>, JsonRejection>,
) -> Json<Envelope> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return Json(Envelope::rejected(&rejection)),
    };
    let result = match require(&body.db_id, "dbID") {
        Ok(()) => {
            state
                .gateway
                .create_page(&body.db_id, &body.page_name, &body.header)
                .await
        }
        Err(err) => Err(err),
    };
    Json(result.into())
}

async fn append_block(
    State(state): State<AppState>,
    payload: Result<Json<NewBlock>, JsonRejection>,
) -> Json<Envelope> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return Json(Envelope::rejected(&rejection)),
    };
    let result = match require(&body.page_id, "pageID") {
        Ok(()) => state.gateway.append_block(&body.page_id, &body.content).await,
        Err(err) => Err(err),
    };
    Json(result.into())
}

async fn create_comment(
    State(state): State<AppState>,
    payload: Result<Json<NewComment>, JsonRejection>,
) -> Json<Envelope> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return Json(Envelope::rejected(&rejection)),
    };
    let result = match require(&body.page_id, "pageID") {
        Ok(()) => state.gateway.create_comment(&body.page_id, &body.comment).await,
        Err(err) => Err(err),
    };
    Json(result.into())
}
