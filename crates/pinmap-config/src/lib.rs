//! Configuration for the pinmap server and CLI.
//!
//! TOML file + `PINMAP_` environment variables layered with figment,
//! workspace token resolution (env var, keyring, plaintext), and
//! translation to `pinmap_core::ServiceConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use pinmap_core::{
    GeocoderConfig, ResolverOptions, ServiceConfig, TlsMode, TransportConfig, WorkspaceConfig,
};

pub const ENV_PREFIX: &str = "PINMAP_";
const KEYRING_SERVICE: &str = "pinmap";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no workspace token configured for '{name}'")]
    NoCredentials { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Upstream request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Extra CA certificate (PEM) trusted for both upstreams.
    pub ca_cert: Option<PathBuf>,

    #[serde(default)]
    pub server: Server,

    #[serde(default)]
    pub workspace: Workspace,

    #[serde(default)]
    pub geocoder: Geocoder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            ca_cert: None,
            server: Server::default(),
            workspace: Workspace::default(),
            geocoder: Geocoder::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Server {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally visible base URL used in embed snippets.
    /// Defaults to `http://<bind>:<port>/`.
    pub public_url: Option<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            public_url: None,
        }
    }
}

impl Server {
    pub fn public_url(&self) -> Result<Url, ConfigError> {
        match self.public_url {
            Some(ref raw) => parse_url("server.public_url", raw),
            None => parse_url(
                "server.public_url",
                &format!("http://{}:{}/", self.bind, self.port),
            ),
        }
    }
}

/// Workspace API connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Workspace {
    /// Keyring account prefix (`<name>/token`).
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_workspace_url")]
    pub url: String,

    /// Integration token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Page under which `POST /databases` creates new databases.
    pub parent_page_id: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Cursor pages followed per listing; 1 disables pagination.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            name: default_name(),
            url: default_workspace_url(),
            token: None,
            token_env: Some("NOTION_TOKEN".into()),
            parent_page_id: None,
            api_version: default_api_version(),
            max_pages: default_max_pages(),
        }
    }
}

/// Geocoder connection and resolver tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Geocoder {
    #[serde(default = "default_geocoder_url")]
    pub url: String,

    /// Minimum spacing between geocoder requests.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Lookups in flight per batch.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Appended to addresses lacking a region marker for the one fallback.
    pub fallback_suffix: Option<String>,
}

impl Default for Geocoder {
    fn default() -> Self {
        Self {
            url: default_geocoder_url(),
            min_interval_ms: default_min_interval_ms(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            concurrency: default_concurrency(),
            fallback_suffix: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_bind() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3000
}
fn default_name() -> String {
    "default".into()
}
fn default_workspace_url() -> String {
    "https://api.notion.com/".into()
}
fn default_api_version() -> String {
    "2022-06-28".into()
}
fn default_max_pages() -> usize {
    10
}
fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org/".into()
}
fn default_min_interval_ms() -> u64 {
    1000
}
fn default_max_attempts() -> u32 {
    3
}
fn default_backoff_ms() -> u64 {
    500
}
fn default_concurrency() -> usize {
    4
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "pinmap", "pinmap").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pinmap");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file (`path` or the platform default), then
/// `PINMAP_` env vars with `__` separating sections.
///
/// A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Render `config` as TOML, e.g. for a starter file.
pub fn to_toml(config: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

// ── Credential resolution ───────────────────────────────────────────

/// Workspace token from the credential chain.
pub fn resolve_token(workspace: &Workspace) -> Result<SecretString, ConfigError> {
    // 1. token_env → env var lookup
    if let Some(ref env_name) = workspace.token_env {
        if let Ok(val) = std::env::var(env_name) {
            if !val.trim().is_empty() {
                return Ok(SecretString::from(val));
            }
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{}/token", workspace.name)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = workspace.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        name: workspace.name.clone(),
    })
}

// ── Translation to core config ──────────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

pub fn transport_config(config: &Config) -> TransportConfig {
    TransportConfig {
        tls: config
            .ca_cert
            .clone()
            .map_or(TlsMode::System, TlsMode::CustomCa),
        timeout: Duration::from_secs(config.timeout),
        ..TransportConfig::default()
    }
}

/// Build the core `ServiceConfig`.
///
/// Without a token the workspace half is left out, unless
/// `require_workspace` is set, in which case that is an error.
pub fn to_service_config(
    config: &Config,
    require_workspace: bool,
) -> Result<ServiceConfig, ConfigError> {
    let workspace = match resolve_token(&config.workspace) {
        Ok(token) => Some(WorkspaceConfig {
            url: parse_url("workspace.url", &config.workspace.url)?,
            token,
            api_version: config.workspace.api_version.clone(),
            parent_page_id: config.workspace.parent_page_id.clone(),
            max_pages: config.workspace.max_pages,
        }),
        Err(err) if require_workspace => return Err(err),
        Err(_) => None,
    };

    let geo = &config.geocoder;
    if geo.concurrency == 0 {
        return Err(ConfigError::Validation {
            field: "geocoder.concurrency".into(),
            reason: "must be at least 1".into(),
        });
    }

    let geocoder = GeocoderConfig {
        min_interval: Duration::from_millis(geo.min_interval_ms),
        max_attempts: geo.max_attempts,
        backoff_base: Duration::from_millis(geo.backoff_ms),
        ..GeocoderConfig::new(parse_url("geocoder.url", &geo.url)?)
    };

    let mut resolver = ResolverOptions {
        concurrency: geo.concurrency,
        ..ResolverOptions::default()
    };
    if let Some(ref suffix) = geo.fallback_suffix {
        resolver.fallback_suffix.clone_from(suffix);
    }

    Ok(ServiceConfig {
        workspace,
        geocoder,
        resolver,
        transport: transport_config(config),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.workspace.max_pages, 10);
        assert_eq!(config.geocoder.min_interval_ms, 1000);
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            timeout = 5

            [server]
            port = 8080

            [workspace]
            token = "secret_plain"
            token_env = "PINMAP_TEST_UNSET_TOKEN_VAR"
            name = "pinmap-config-test-profile"
            parent_page_id = "parent-1"

            [geocoder]
            url = "http://localhost:8088/"
            concurrency = 2
            fallback_suffix = ", OR, USA"
            "#,
        );
        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.timeout, 5);
        assert_eq!(config.geocoder.concurrency, 2);
        assert_eq!(config.workspace.api_version, "2022-06-28");
    }

    #[test]
    fn service_config_from_file() {
        let file = write_config(
            r#"
            [workspace]
            token = "secret_plain"
            token_env = "PINMAP_TEST_UNSET_TOKEN_VAR"
            name = "pinmap-config-test-profile"

            [geocoder]
            min_interval_ms = 250
            fallback_suffix = ", OR, USA"
            "#,
        );
        let config = load_config(Some(file.path())).unwrap();
        let service = to_service_config(&config, true).unwrap();

        let workspace = service.workspace.unwrap();
        assert_eq!(workspace.token.expose_secret(), "secret_plain");
        assert_eq!(workspace.url.as_str(), "https://api.notion.com/");
        assert_eq!(service.geocoder.min_interval, Duration::from_millis(250));
        assert_eq!(service.resolver.fallback_suffix, ", OR, USA");
        assert_eq!(service.transport.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_token_is_optional_unless_required() {
        let config = Config {
            workspace: Workspace {
                name: "pinmap-config-test-missing".into(),
                token_env: Some("PINMAP_TEST_UNSET_TOKEN_VAR".into()),
                ..Workspace::default()
            },
            ..Config::default()
        };

        assert!(to_service_config(&config, false).unwrap().workspace.is_none());
        assert!(matches!(
            to_service_config(&config, true),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn invalid_urls_and_zero_concurrency_are_rejected() {
        let mut config = Config::default();
        config.geocoder.url = "not a url".into();
        let err = to_service_config(&config, false).unwrap_err();
        assert_eq!(err.to_string(), "invalid geocoder.url: invalid URL: not a url");

        let mut config = Config::default();
        config.geocoder.concurrency = 0;
        assert!(matches!(
            to_service_config(&config, false),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn public_url_defaults_to_bind_address() {
        let mut server = Server::default();
        assert_eq!(server.public_url().unwrap().as_str(), "http://127.0.0.1:3000/");

        server.public_url = Some("https://maps.example.org/".into());
        assert_eq!(server.public_url().unwrap().host_str(), Some("maps.example.org"));
    }

    #[test]
    fn ca_cert_selects_custom_tls() {
        let config = Config {
            ca_cert: Some(PathBuf::from("/etc/ssl/extra.pem")),
            ..Config::default()
        };
        assert!(matches!(
            transport_config(&config).tls,
            TlsMode::CustomCa(ref p) if p == Path::new("/etc/ssl/extra.pem")
        ));
    }

    #[test]
    fn defaults_render_as_toml() {
        let rendered = to_toml(&Config::default()).unwrap();
        assert!(rendered.contains("[geocoder]"));
        assert!(rendered.contains("min_interval_ms = 1000"));
    }
}
