//! Inbound payload schema and the typed records it validates into.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::notion::PageId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid URL in {field}: '{value}'")]
    InvalidUrl { field: &'static str, value: String },
}

/// Raw `/ingest` payload as sent by the browser extractor.
///
/// Every field is optional at this layer; [`IngestRequest::validate`] decides
/// which ones are required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub job_url: Option<String>,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub company_url: Option<String>,
    pub logo_url: Option<String>,
    pub location: Option<String>,
    pub application_type: Option<String>,
    pub job_description: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub ddl: Option<String>,
}

/// An employer as seen on a posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub name: String,
    pub url: String,
    pub logo: Option<String>,
}

/// Posting fields written to the jobs database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Posting {
    pub title: String,
    pub location: Option<String>,
    pub application_url: Option<String>,
    pub description: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub deadline: Option<NaiveDate>,
}

/// A validated ingest payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub organization: Organization,
    pub posting: Posting,
    pub application_type: Option<String>,
}

/// Result of a create-or-update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted {
    pub id: PageId,
    pub created: bool,
}

impl IngestRequest {
    /// Validate the payload into a [`JobRecord`].
    ///
    /// Blank strings count as absent. An unparseable deadline is dropped with
    /// a warning rather than failing the ingest.
    ///
    /// # Errors
    ///
    /// Returns an error if `title`, `companyName` or `companyUrl` is missing,
    /// or if `companyUrl` is not an absolute URL.
    pub fn validate(self) -> Result<JobRecord, ValidationError> {
        let title = present(self.title).ok_or(ValidationError::MissingField("title"))?;
        let name =
            present(self.company_name).ok_or(ValidationError::MissingField("companyName"))?;
        let url = present(self.company_url).ok_or(ValidationError::MissingField("companyUrl"))?;
        if url::Url::parse(&url).is_err() {
            return Err(ValidationError::InvalidUrl {
                field: "companyUrl",
                value: url,
            });
        }

        let deadline = present(self.ddl).and_then(|raw| {
            let parsed = parse_deadline(&raw);
            if parsed.is_none() {
                warn!(ddl = %raw, "Ignoring unrecognised deadline format");
            }
            parsed
        });

        Ok(JobRecord {
            organization: Organization {
                name,
                url,
                logo: present(self.logo_url),
            },
            posting: Posting {
                title,
                location: present(self.location),
                application_url: present(self.job_url),
                description: present(self.job_description),
                contact_person: present(self.contact_person),
                contact_email: present(self.contact_email),
                deadline,
            },
            application_type: present(self.application_type),
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a scraped deadline into a calendar date.
///
/// Accepts ISO dates and datetimes, `DD/MM/YYYY` (falling back to
/// `MM/DD/YYYY` when the day-first reading is impossible), two-digit years,
/// and `5 Mar 2025` / `5 March 2025`.
#[must_use]
pub fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Some(dt.date());
    }

    let short_year = raw
        .rsplit(|c: char| c == '/' || c.is_whitespace())
        .next()
        .is_some_and(|year| year.len() == 2);

    let formats: &[&str] = if short_year {
        &["%d/%m/%y", "%m/%d/%y", "%d %b %y"]
    } else {
        &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d %b %Y"]
    };

    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}
