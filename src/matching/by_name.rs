use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::MatchStrategy;
use crate::constants::company_props;
use crate::model::Organization;
use crate::notion::{Filter, PageId, Result, Workspace};

static LEGAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(llc|ltd|plc|inc|co|corp)\b").unwrap());

/// Lowercase `name` and strip legal-entity suffix words.
///
/// `"Acme Corp"` and `"ACME"` both become `"acme"`. Punctuation next to a
/// removed word is left in place.
#[must_use]
pub fn canonical_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    LEGAL_SUFFIX.replace_all(&lowered, "").trim().to_string()
}

/// Substring match on the canonical form of the organization's name.
pub struct CanonicalNameMatch {
    workspace: Arc<dyn Workspace>,
    database_id: String,
}

impl CanonicalNameMatch {
    #[must_use]
    pub fn new(workspace: Arc<dyn Workspace>, database_id: &str) -> Self {
        Self {
            workspace,
            database_id: database_id.to_string(),
        }
    }
}

#[async_trait]
impl MatchStrategy for CanonicalNameMatch {
    fn name(&self) -> &'static str {
        "canonical_name"
    }

    async fn resolve(&self, candidate: &Organization) -> Result<Option<PageId>> {
        let canonical = canonical_name(&candidate.name);
        // An empty containment filter matches every row.
        if canonical.is_empty() {
            debug!(name = %candidate.name, "Canonical name is empty, skipping name match");
            return Ok(None);
        }

        let filter = Filter::TitleContains {
            property: company_props::NAME,
            value: canonical,
        };
        let found = self
            .workspace
            .query_database(&self.database_id, &filter)
            .await?;
        Ok(found.into_iter().next())
    }
}
