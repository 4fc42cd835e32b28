// ── Records gateway ──
//
// Read/write façade over the workspace API. Reads are fetched fresh on
// every call; nothing is cached.

use std::collections::HashSet;
use std::future::Future;

use serde_json::Value;
use tracing::{debug, warn};

use pinmap_api::{Paginated, TransportConfig, WorkspaceClient};

use crate::config::WorkspaceConfig;
use crate::convert::schema_from_database;
use crate::error::CoreError;
use crate::model::{Collection, FieldSchema, Item};

/// Drop archived collections, then keep the first occurrence of each id.
pub fn visible_collections(collections: impl IntoIterator<Item = Collection>) -> Vec<Collection> {
    let mut seen = HashSet::new();
    collections
        .into_iter()
        .filter(|c| !c.archived)
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct RecordsGateway {
    client: WorkspaceClient,
    parent_page_id: Option<String>,
    max_pages: usize,
}

impl RecordsGateway {
    pub fn new(client: WorkspaceClient, parent_page_id: Option<String>, max_pages: usize) -> Self {
        Self {
            client,
            parent_page_id,
            max_pages: max_pages.max(1),
        }
    }

    pub fn from_config(
        config: &WorkspaceConfig,
        transport: &TransportConfig,
    ) -> Result<Self, CoreError> {
        let client = WorkspaceClient::new(
            config.url.as_str(),
            &config.token,
            &config.api_version,
            transport,
        )?;
        Ok(Self::new(
            client,
            config.parent_page_id.clone(),
            config.max_pages,
        ))
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Non-archived databases, deduplicated by id, in upstream order.
    pub async fn list_collections(&self) -> Result<Vec<Collection>, CoreError> {
        let client = &self.client;
        let raw = self
            .collect_pages(|cursor| async move { client.search_databases(cursor.as_deref()).await })
            .await?;

        let collections = raw
            .into_iter()
            .map(Collection::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let total = collections.len();
        let visible = visible_collections(collections);
        debug!(total, visible = visible.len(), "listed collections");
        Ok(visible)
    }

    /// Items of a collection exactly as the upstream returned them.
    pub async fn list_items(&self, collection_id: &str) -> Result<Vec<Item>, CoreError> {
        let client = &self.client;
        let raw = self
            .collect_pages(|cursor| async move {
                client
                    .query_database(collection_id, cursor.as_deref())
                    .await
            })
            .await?;

        raw.into_iter().map(Item::try_from).collect()
    }

    /// Field name → type tag for a collection.
    pub async fn get_schema(&self, collection_id: &str) -> Result<FieldSchema, CoreError> {
        let database = self.client.retrieve_database(collection_id).await?;
        Ok(schema_from_database(&database))
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Create a database under the configured parent page.
    pub async fn create_database(&self, title: &str) -> Result<Value, CoreError> {
        let parent = self
            .parent_page_id
            .as_deref()
            .ok_or_else(|| CoreError::Config {
                message: "no parent page configured for new databases".into(),
            })?;
        Ok(self.client.create_database(parent, title).await?)
    }

    pub async fn create_page(
        &self,
        collection_id: &str,
        name: &str,
        header: &str,
    ) -> Result<Value, CoreError> {
        Ok(self.client.create_page(collection_id, name, header).await?)
    }

    pub async fn append_block(&self, page_id: &str, content: &str) -> Result<Value, CoreError> {
        Ok(self.client.append_paragraph(page_id, content).await?)
    }

    pub async fn create_comment(&self, page_id: &str, comment: &str) -> Result<Value, CoreError> {
        Ok(self.client.create_comment(page_id, comment).await?)
    }

    // ── Pagination ───────────────────────────────────────────────────

    /// Follow `next_cursor` until exhausted or `max_pages` is reached.
    async fn collect_pages<F, Fut>(&self, fetch: F) -> Result<Vec<Value>, CoreError>
    where
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = Result<Paginated<Value>, pinmap_api::Error>>,
    {
        let mut all = Vec::new();
        let mut cursor = None;
        let mut pages = 0;

        loop {
            let page = fetch(cursor.take()).await?;
            pages += 1;
            all.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more => {
                    if pages >= self.max_pages {
                        warn!(
                            pages,
                            fetched = all.len(),
                            "listing truncated at page limit"
                        );
                        break;
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        Ok(all)
    }
}
