use thiserror::Error;

/// Top-level error type for the `pinmap-api` crate.
///
/// Covers every failure mode across both upstreams: transport, the
/// workspace-database API, and the geocoder. `pinmap-core` maps these
/// into its own taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Integration token rejected by the workspace API.
    #[error("Invalid integration token")]
    InvalidToken,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Rate limited by an upstream. Includes retry-after in seconds.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    // ── Workspace API ───────────────────────────────────────────────
    /// Structured error from the workspace API
    /// (`{object: "error", status, code, message}`).
    #[error("{message}")]
    Workspace {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Geocoder ────────────────────────────────────────────────────
    /// Non-success status from the geocoder.
    #[error("Geocoder error (HTTP {status}): {message}")]
    Geocoder { message: String, status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            Self::Workspace { status, .. } | Self::Geocoder { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Workspace { status: 404, .. } | Self::Geocoder { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The upstream HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidToken => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::Workspace { status, .. } | Self::Geocoder { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Extract the workspace API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Workspace { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
