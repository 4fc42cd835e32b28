// Hand-crafted async HTTP client for the workspace-database API.
//
// Base path: /v1/
// Auth: `Authorization: Bearer <integration token>` plus a pinned API version header.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::types::{self, ErrorResponse, Paginated, QueryRequest, SearchFilter, SearchRequest};
use crate::Error;
use crate::transport::{TransportConfig, retry_after_secs};

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/";
pub const DEFAULT_API_VERSION: &str = "2022-06-28";

const VERSION_HEADER: &str = "Notion-Version";

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the workspace-database API.
///
/// Every method performs exactly one upstream request. Listing methods
/// return a single page; callers follow `next_cursor` themselves.
#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl WorkspaceClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an integration token and transport config.
    ///
    /// Injects the bearer token and API version as default headers.
    pub fn new(
        base_url: &str,
        token: &SecretString,
        api_version: &str,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let version = HeaderValue::from_str(api_version).map_err(|e| Error::Deserialization {
            message: format!("invalid API version header value: {e}"),
            body: api_version.to_owned(),
        })?;
        headers.insert(VERSION_HEADER, version);

        let http = transport.build_client_with_headers(headers)?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"v1/search"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        handle_response(resp).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self.http.patch(url).json(body).send().await?;
        handle_response(resp).await
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Databases ────────────────────────────────────────────────────

    /// One page of databases visible to the integration.
    pub async fn search_databases(&self, cursor: Option<&str>) -> Result<Paginated<Value>, Error> {
        self.post(
            "v1/search",
            &SearchRequest {
                filter: SearchFilter::databases(),
                start_cursor: cursor,
            },
        )
        .await
    }

    /// One page of rows (pages) inside a database, in upstream order.
    pub async fn query_database(
        &self,
        database_id: &str,
        cursor: Option<&str>,
    ) -> Result<Paginated<Value>, Error> {
        self.post(
            &format!("v1/databases/{}/query", path_segment(database_id)),
            &QueryRequest {
                start_cursor: cursor,
            },
        )
        .await
    }

    /// The database object, including its `properties` schema.
    pub async fn retrieve_database(&self, database_id: &str) -> Result<Value, Error> {
        self.get(&format!("v1/databases/{}", path_segment(database_id)))
            .await
    }

    pub async fn create_database(&self, parent_page_id: &str, title: &str) -> Result<Value, Error> {
        self.post(
            "v1/databases",
            &types::new_database_body(parent_page_id, title),
        )
        .await
    }

    // ── Pages, blocks, comments ──────────────────────────────────────

    pub async fn create_page(
        &self,
        database_id: &str,
        name: &str,
        header: &str,
    ) -> Result<Value, Error> {
        self.post(
            "v1/pages",
            &types::new_page_body(database_id, name, header),
        )
        .await
    }

    /// Append one paragraph block. A page id is a valid block id.
    pub async fn append_paragraph(&self, block_id: &str, content: &str) -> Result<Value, Error> {
        self.patch(
            &format!("v1/blocks/{}/children", path_segment(block_id)),
            &types::paragraph_children_body(content),
        )
        .await
    }

    pub async fn create_comment(&self, page_id: &str, comment: &str) -> Result<Value, Error> {
        self.post("v1/comments", &types::new_comment_body(page_id, comment))
            .await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Ensure the base URL ends with `/` so relative joins keep its path.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Percent-encode an id for use as a single path segment.
fn path_segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Error::InvalidToken;
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Error::RateLimited {
            retry_after_secs: retry_after_secs(resp.headers()),
        };
    }

    let raw = resp.text().await.unwrap_or_default();

    if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
        Error::Workspace {
            status: status.as_u16(),
            message: err.message.unwrap_or_else(|| status.to_string()),
            code: err.code,
        }
    } else {
        Error::Workspace {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
            code: None,
        }
    }
}
