//! Ingest orchestration: validate, then upsert the organization and the
//! posting in that order.
//!
//! The two upserts are separate remote calls with no transaction around them.
//! If the posting step fails, the organization it depended on stays in place
//! and the error names it so the ingest can be retried by hand. A posting saved
//! without its body is reported with both ids.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::model::{IngestRequest, ValidationError};
use crate::notion::{NotionError, PageId, Workspace};
use crate::organization::OrganizationResolver;
use crate::posting::{PostingError, PostingUpserter};
use crate::session::SessionProvider;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("LinkedIn session not found. Run the login helper to capture one first.")]
    SessionMissing,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The organization phase failed; the remote message is passed through.
    #[error(transparent)]
    Organization(NotionError),

    #[error("Failed to create/update job (company {company_id} was saved): {source}")]
    Posting {
        company_id: PageId,
        #[source]
        source: NotionError,
    },

    #[error(
        "Job {job_id} was saved but its description was not written \
         (company {company_id} was saved): {source}"
    )]
    Body {
        company_id: PageId,
        job_id: PageId,
        job_created: bool,
        #[source]
        source: NotionError,
    },
}

/// Outcome of a successful ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub job_id: PageId,
    pub company_id: PageId,
    pub job_created: bool,
    pub company_created: bool,
    pub application_url: Option<String>,
    pub application_type: Option<String>,
}

/// Maps scraped postings onto organization and posting records.
pub struct Reconciler {
    session: Arc<dyn SessionProvider>,
    organizations: OrganizationResolver,
    postings: PostingUpserter,
}

impl Reconciler {
    #[must_use]
    pub fn new(
        workspace: Arc<dyn Workspace>,
        session: Arc<dyn SessionProvider>,
        companies_db_id: &str,
        jobs_db_id: &str,
    ) -> Self {
        Self {
            session,
            organizations: OrganizationResolver::new(workspace.clone(), companies_db_id),
            postings: PostingUpserter::new(workspace, jobs_db_id),
        }
    }

    /// Ingest one scraped posting.
    ///
    /// # Errors
    ///
    /// Returns an error if no browser session is available, the payload is
    /// invalid, or either upsert fails. Nothing is retried.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestOutcome, IngestError> {
        if !self.session.is_available() {
            return Err(IngestError::SessionMissing);
        }

        let record = request.validate()?;
        info!(
            title = %record.posting.title,
            company = %record.organization.name,
            application_type = ?record.application_type,
            "Received job data"
        );

        let company = self
            .organizations
            .upsert(&record.organization)
            .await
            .map_err(IngestError::Organization)?;

        let job = match self.postings.upsert(&record.posting, &company.id).await {
            Ok(job) => job,
            Err(PostingError::Record(source)) => {
                warn!(
                    company_id = %company.id,
                    company_created = company.created,
                    title = %record.posting.title,
                    error = %source,
                    "Job upsert failed after company was saved; company left without this job"
                );
                return Err(IngestError::Posting {
                    company_id: company.id,
                    source,
                });
            }
            Err(PostingError::Body { job, source }) => {
                warn!(
                    company_id = %company.id,
                    job_id = %job.id,
                    job_created = job.created,
                    error = %source,
                    "Job saved but description append failed; job body is incomplete"
                );
                return Err(IngestError::Body {
                    company_id: company.id,
                    job_id: job.id,
                    job_created: job.created,
                    source,
                });
            }
        };

        Ok(IngestOutcome {
            job_id: job.id,
            company_id: company.id,
            job_created: job.created,
            company_created: company.created,
            application_url: record.posting.application_url,
            application_type: record.application_type,
        })
    }
}
