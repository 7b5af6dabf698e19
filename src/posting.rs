//! Create-or-update of posting records and their page body.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::constants::job_props;
use crate::content;
use crate::model::{Posting, Upserted};
use crate::notion::{Block, Filter, NotionError, PageId, Properties, PropertyValue, Workspace};

/// Failure of a posting upsert, split by whether the record itself was saved.
#[derive(Debug, Error)]
pub enum PostingError {
    /// The lookup, create or property update failed.
    #[error(transparent)]
    Record(#[from] NotionError),

    /// The record was saved but its body blocks were not (fully) appended.
    #[error("job {} was saved without its description: {source}", .job.id)]
    Body {
        job: Upserted,
        #[source]
        source: NotionError,
    },
}

/// Locates or creates a posting keyed by (title, organization, location).
pub struct PostingUpserter {
    workspace: Arc<dyn Workspace>,
    database_id: String,
}

impl PostingUpserter {
    #[must_use]
    pub fn new(workspace: Arc<dyn Workspace>, database_id: &str) -> Self {
        Self {
            workspace,
            database_id: database_id.to_string(),
        }
    }

    /// Create or update the posting and append its description blocks.
    ///
    /// An existing posting has its properties overwritten and a fresh
    /// description section appended after its current body. Earlier sections
    /// are not removed.
    ///
    /// # Errors
    ///
    /// Returns [`PostingError::Record`] if the record could not be saved, or
    /// [`PostingError::Body`] carrying the saved record if only the body
    /// append failed.
    pub async fn upsert(
        &self,
        posting: &Posting,
        company_id: &PageId,
    ) -> Result<Upserted, PostingError> {
        let existing = self
            .workspace
            .query_database(&self.database_id, &identity_filter(posting, company_id))
            .await?;
        debug!(
            title = %posting.title,
            location = ?posting.location,
            matches = existing.len(),
            "Looked up existing jobs"
        );

        if let Some(id) = existing.into_iter().next() {
            self.workspace
                .update_page(&id, &mutable_properties(posting))
                .await?;
            info!(job_id = %id, title = %posting.title, "Updated existing job");

            let job = Upserted { id, created: false };
            return match &posting.description {
                Some(description) => {
                    self.append_body(job, &content::description_section(description))
                        .await
                }
                None => Ok(job),
            };
        }

        let props = mutable_properties(posting)
            .with(job_props::TITLE, PropertyValue::Title(posting.title.clone()))
            .with(
                job_props::COMPANIES,
                PropertyValue::Relation(vec![company_id.clone()]),
            )
            .with(job_props::CATEGORY, PropertyValue::Select(None));
        let id = self
            .workspace
            .create_page(&self.database_id, &props, None)
            .await?;
        info!(job_id = %id, title = %posting.title, "Created new job");

        let job = Upserted { id, created: true };
        match &posting.description {
            Some(description) => {
                self.append_body(job, &content::new_posting_body(description))
                    .await
            }
            None => Ok(job),
        }
    }

    async fn append_body(&self, job: Upserted, blocks: &[Block]) -> Result<Upserted, PostingError> {
        match self.workspace.append_blocks(&job.id, blocks).await {
            Ok(()) => Ok(job),
            Err(source) => Err(PostingError::Body { job, source }),
        }
    }
}

/// Filter selecting postings with the same title, organization and location.
///
/// A posting without a location matches records whose location is empty.
fn identity_filter(posting: &Posting, company_id: &PageId) -> Filter {
    let location = match &posting.location {
        Some(location) => Filter::MultiSelectContains {
            property: job_props::LOCATION,
            value: location.clone(),
        },
        None => Filter::MultiSelectIsEmpty {
            property: job_props::LOCATION,
        },
    };

    Filter::And(vec![
        Filter::TitleEquals {
            property: job_props::TITLE,
            value: posting.title.clone(),
        },
        Filter::RelationContains {
            property: job_props::COMPANIES,
            id: company_id.clone(),
        },
        location,
    ])
}

/// Properties overwritten on every ingest.
fn mutable_properties(posting: &Posting) -> Properties {
    Properties::new()
        .with(
            job_props::APPLICATION_URL,
            PropertyValue::Url(posting.application_url.clone()),
        )
        .with(
            job_props::LOCATION,
            PropertyValue::MultiSelect(posting.location.iter().cloned().collect()),
        )
        .with(
            job_props::CONTACT_PERSON,
            PropertyValue::RichText(posting.contact_person.clone()),
        )
        .with(
            job_props::CONTACT_EMAIL,
            PropertyValue::Email(posting.contact_email.clone()),
        )
        .with(job_props::DEADLINE, PropertyValue::Date(posting.deadline))
}
