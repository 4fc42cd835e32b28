// ── Core error types ──
//
// Domain-level failures. Consumers never see reqwest or JSON parse errors
// directly; the `From<pinmap_api::Error>` impl folds every upstream failure
// into `Upstream`, keeping the upstream message verbatim.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required parameter is missing or blank.
    #[error("{message}")]
    InvalidInput { message: String },

    /// Any failure from the workspace API or the geocoder.
    #[error("{message}")]
    Upstream {
        message: String,
        /// HTTP status reported by the upstream, if any.
        status: Option<u16>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Upstream HTTP status, when known.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<pinmap_api::Error> for CoreError {
    fn from(err: pinmap_api::Error) -> Self {
        match err {
            pinmap_api::Error::Workspace {
                message, status, ..
            }
            | pinmap_api::Error::Geocoder { message, status } => CoreError::Upstream {
                message,
                status: Some(status),
            },
            pinmap_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            pinmap_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            other => CoreError::Upstream {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}
