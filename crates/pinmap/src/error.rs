//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use pinmap_config::ConfigError;
use pinmap_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("No workspace token configured")]
    #[diagnostic(
        code(pinmap::no_credentials),
        help(
            "Set NOTION_TOKEN (or the variable named by workspace.token_env),\n\
             store it in the system keyring as pinmap/{name}/token,\n\
             or set workspace.token in {path}"
        )
    )]
    NoCredentials { name: String, path: String },

    #[error(transparent)]
    #[diagnostic(
        code(pinmap::config),
        help("Check the config file and any PINMAP_* environment variables.")
    )]
    Config(ConfigError),

    // ── Input ────────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(pinmap::invalid_input))]
    InvalidInput { message: String },

    #[error("No results found for '{address}'")]
    #[diagnostic(
        code(pinmap::not_found),
        help("Try a more specific address, e.g. with city and region.")
    )]
    NoResults { address: String },

    // ── Upstream ─────────────────────────────────────────────────────

    #[error("Upstream request failed: {message}")]
    #[diagnostic(code(pinmap::upstream))]
    Upstream {
        message: String,
        status: Option<u16>,
    },

    #[error("{0}")]
    #[diagnostic(code(pinmap::internal))]
    Internal(String),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not encode output: {0}")]
    #[diagnostic(code(pinmap::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoCredentials { .. }
            | Self::Upstream {
                status: Some(401), ..
            } => exit_code::AUTH,
            Self::Upstream {
                status: Some(404), ..
            }
            | Self::NoResults { .. } => exit_code::NOT_FOUND,
            Self::Upstream { status: None, .. } => exit_code::CONNECTION,
            Self::InvalidInput { .. } | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { name } => CliError::NoCredentials {
                name,
                path: pinmap_config::config_path().display().to_string(),
            },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput { message } => CliError::InvalidInput { message },
            CoreError::Upstream { message, status } => CliError::Upstream { message, status },
            CoreError::Config { message } => CliError::Config(ConfigError::Validation {
                field: "config".into(),
                reason: message,
            }),
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
