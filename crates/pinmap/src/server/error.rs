use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use pinmap_core::CoreError;

/// Failure body shared by every `/api` route.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub success: bool,
    pub message: &'a str,
}

/// Error returned by the JSON API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or blank request parameter.
    #[error("{0}")]
    BadRequest(String),

    /// Upstream failure surfaced with the upstream's own status code.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Keep the upstream HTTP status when it is a real error status.
    pub fn with_upstream_status(err: CoreError) -> Self {
        let status = err
            .status()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .filter(|s| s.is_client_error() || s.is_server_error());
        match (status, err) {
            (Some(status), CoreError::Upstream { message, .. }) => Self::Upstream { status, message },
            (_, other) => other.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput { message } => Self::BadRequest(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (
            self.status_code(),
            Json(ErrorBody {
                success: false,
                message: self.to_string().as_str(),
            }),
        )
            .into_response()
    }
}
