//! Identity matching for organizations.
//!
//! Each strategy answers one question: does an existing record correspond to
//! this candidate? [`FirstMatch`] runs strategies in order and stops at the
//! first hit, which gives the exact-URL-then-fuzzy-name policy.

mod by_name;
mod by_url;

use async_trait::async_trait;
use tracing::debug;

pub use by_name::{canonical_name, CanonicalNameMatch};
pub use by_url::UrlMatch;

use crate::model::Organization;
use crate::notion::{PageId, Result};

/// Strategy for locating an existing record for a candidate.
#[async_trait]
pub trait MatchStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Return the id of the existing record for `candidate`, if any.
    async fn resolve(&self, candidate: &Organization) -> Result<Option<PageId>>;
}

/// Runs strategies in order; the first one that finds a record wins.
pub struct FirstMatch {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl FirstMatch {
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { strategies }
    }
}

#[async_trait]
impl MatchStrategy for FirstMatch {
    fn name(&self) -> &'static str {
        "first_match"
    }

    async fn resolve(&self, candidate: &Organization) -> Result<Option<PageId>> {
        for strategy in &self.strategies {
            if let Some(id) = strategy.resolve(candidate).await? {
                debug!(strategy = strategy.name(), page_id = %id, "Matched existing organization");
                return Ok(Some(id));
            }
        }
        Ok(None)
    }
}
