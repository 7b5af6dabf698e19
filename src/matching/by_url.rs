use std::sync::Arc;

use async_trait::async_trait;

use super::MatchStrategy;
use crate::constants::company_props;
use crate::model::Organization;
use crate::notion::{Filter, PageId, Result, Workspace};

/// Exact match on the organization's public URL.
pub struct UrlMatch {
    workspace: Arc<dyn Workspace>,
    database_id: String,
}

impl UrlMatch {
    #[must_use]
    pub fn new(workspace: Arc<dyn Workspace>, database_id: &str) -> Self {
        Self {
            workspace,
            database_id: database_id.to_string(),
        }
    }
}

#[async_trait]
impl MatchStrategy for UrlMatch {
    fn name(&self) -> &'static str {
        "url"
    }

    async fn resolve(&self, candidate: &Organization) -> Result<Option<PageId>> {
        let filter = Filter::UrlEquals {
            property: company_props::LINK,
            value: candidate.url.clone(),
        };
        let found = self
            .workspace
            .query_database(&self.database_id, &filter)
            .await?;
        Ok(found.into_iter().next())
    }
}
