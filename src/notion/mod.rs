//! Notion REST client.
//!
//! Only the four calls the ingest pipeline needs are implemented: database
//! query, page create, page property update and block-children append. They
//! sit behind the [`Workspace`] trait so the upsert logic can run against an
//! in-memory double in tests.

pub mod error;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

pub use error::{NotionError, Result};
pub use types::{Block, Filter, PageId, Properties, PropertyValue};

use crate::config::Config;
use crate::constants::{MAX_BLOCKS_PER_APPEND, NOTION_VERSION};
use types::{PageObject, QueryResponse};

/// Remote workspace operations used by the upserters.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Return the ids of pages in `database_id` matching `filter`, in the
    /// order the workspace returns them.
    async fn query_database(&self, database_id: &str, filter: &Filter) -> Result<Vec<PageId>>;

    /// Create a page in `database_id`, optionally with an external icon.
    async fn create_page(
        &self,
        database_id: &str,
        properties: &Properties,
        icon_url: Option<&str>,
    ) -> Result<PageId>;

    /// Overwrite the given properties on an existing page.
    async fn update_page(&self, page_id: &PageId, properties: &Properties) -> Result<()>;

    /// Append blocks after the existing body content of a page.
    async fn append_blocks(&self, page_id: &PageId, blocks: &[Block]) -> Result<()>;
}

/// HTTP client for the Notion API.
#[derive(Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl NotionClient {
    /// Create a client against `base_url` (e.g. `https://api.notion.com/v1`).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Create a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.notion_api_url,
            &config.notion_token,
            config.notion_timeout,
        )
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(NotionError::from_response(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Workspace for NotionClient {
    async fn query_database(&self, database_id: &str, filter: &Filter) -> Result<Vec<PageId>> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);
        debug!(database_id, filter = %filter.to_json(), "Querying Notion database");

        let resp: QueryResponse = self
            .send(self.http.post(&url).json(&json!({ "filter": filter })))
            .await?;

        Ok(resp.results.into_iter().map(|page| page.id).collect())
    }

    async fn create_page(
        &self,
        database_id: &str,
        properties: &Properties,
        icon_url: Option<&str>,
    ) -> Result<PageId> {
        let url = format!("{}/pages", self.base_url);
        let mut body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });
        if let Some(icon_url) = icon_url {
            body["icon"] = json!({ "type": "external", "external": { "url": icon_url } });
        }

        let page: PageObject = self.send(self.http.post(&url).json(&body)).await?;
        debug!(database_id, page_id = %page.id, "Created Notion page");
        Ok(page.id)
    }

    async fn update_page(&self, page_id: &PageId, properties: &Properties) -> Result<()> {
        let url = format!("{}/pages/{}", self.base_url, page_id);
        let _: PageObject = self
            .send(
                self.http
                    .patch(&url)
                    .json(&json!({ "properties": properties })),
            )
            .await?;
        debug!(page_id = %page_id, count = properties.len(), "Updated Notion page properties");
        Ok(())
    }

    async fn append_blocks(&self, page_id: &PageId, blocks: &[Block]) -> Result<()> {
        let url = format!("{}/blocks/{}/children", self.base_url, page_id);

        for chunk in blocks.chunks(MAX_BLOCKS_PER_APPEND) {
            let _: serde_json::Value = self
                .send(self.http.patch(&url).json(&json!({ "children": chunk })))
                .await?;
            debug!(page_id = %page_id, count = chunk.len(), "Appended blocks");
        }

        Ok(())
    }
}
