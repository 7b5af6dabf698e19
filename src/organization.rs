//! Create-or-update of organization records.

use std::sync::Arc;

use tracing::info;

use crate::constants::company_props;
use crate::matching::{CanonicalNameMatch, FirstMatch, MatchStrategy, UrlMatch};
use crate::model::{Organization, Upserted};
use crate::notion::{Properties, PropertyValue, Result, Workspace};

/// Locates or creates the organization record for a posting.
pub struct OrganizationResolver {
    workspace: Arc<dyn Workspace>,
    database_id: String,
    matcher: Box<dyn MatchStrategy>,
}

impl OrganizationResolver {
    /// Resolver using the default policy: exact URL, then canonical name.
    #[must_use]
    pub fn new(workspace: Arc<dyn Workspace>, database_id: &str) -> Self {
        let strategies: Vec<Box<dyn MatchStrategy>> = vec![
            Box::new(UrlMatch::new(workspace.clone(), database_id)),
            Box::new(CanonicalNameMatch::new(workspace.clone(), database_id)),
        ];
        Self::with_matcher(workspace, database_id, Box::new(FirstMatch::new(strategies)))
    }

    #[must_use]
    pub fn with_matcher(
        workspace: Arc<dyn Workspace>,
        database_id: &str,
        matcher: Box<dyn MatchStrategy>,
    ) -> Self {
        Self {
            workspace,
            database_id: database_id.to_string(),
            matcher,
        }
    }

    /// Return the id of the organization record for `org`, creating it if no
    /// existing record matches.
    ///
    /// A matched record only has its public URL refreshed; its name and icon
    /// are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if any Notion call fails.
    pub async fn upsert(&self, org: &Organization) -> Result<Upserted> {
        if let Some(id) = self.matcher.resolve(org).await? {
            let props = Properties::new().with(
                company_props::LINK,
                PropertyValue::Url(Some(org.url.clone())),
            );
            self.workspace.update_page(&id, &props).await?;
            info!(company_id = %id, name = %org.name, "Updated existing company");
            return Ok(Upserted { id, created: false });
        }

        let props = Properties::new()
            .with(company_props::NAME, PropertyValue::Title(org.name.clone()))
            .with(company_props::INDUSTRY, PropertyValue::MultiSelect(Vec::new()))
            .with(company_props::LINK, PropertyValue::Url(Some(org.url.clone())));
        let id = self
            .workspace
            .create_page(&self.database_id, &props, org.logo.as_deref())
            .await?;
        info!(company_id = %id, name = %org.name, "Created new company");

        Ok(Upserted { id, created: true })
    }
}
