//! Shared test helpers: an in-memory Notion workspace and a fixed session.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use job_ingest::model::IngestRequest;
use job_ingest::notion::{
    Block, Filter, NotionError, PageId, Properties, PropertyValue, Result, Workspace,
};
use job_ingest::reconcile::Reconciler;
use job_ingest::session::SessionProvider;

pub const COMPANIES_DB: &str = "companies-db";
pub const JOBS_DB: &str = "jobs-db";

/// A page stored by [`MemoryWorkspace`].
#[derive(Debug, Clone)]
pub struct Page {
    pub id: PageId,
    pub database_id: String,
    pub properties: BTreeMap<String, PropertyValue>,
    pub icon: Option<String>,
    pub body: Vec<Block>,
}

impl Page {
    pub fn title(&self, property: &str) -> Option<&str> {
        match self.properties.get(property) {
            Some(PropertyValue::Title(t)) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn url(&self, property: &str) -> Option<&str> {
        match self.properties.get(property) {
            Some(PropertyValue::Url(u)) => u.as_deref(),
            _ => None,
        }
    }
}

/// A remote call recorded by [`MemoryWorkspace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Query(String),
    Create(String),
    Update(PageId),
    Append(PageId, usize),
}

#[derive(Default)]
struct Inner {
    pages: Vec<Page>,
    next_id: u64,
    calls: Vec<Call>,
    failing_databases: HashSet<String>,
    failing_appends: bool,
}

/// In-memory workspace evaluating filters the way Notion does for the
/// property kinds used here.
#[derive(Default)]
pub struct MemoryWorkspace {
    inner: Mutex<Inner>,
}

impl MemoryWorkspace {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every create in `database_id` fail with an API error.
    pub fn fail_creates_in(&self, database_id: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_databases
            .insert(database_id.to_string());
    }

    /// Make every block append fail with a network error.
    pub fn fail_appends(&self) {
        self.inner.lock().unwrap().failing_appends = true;
    }

    /// Insert a page directly, bypassing call recording.
    pub fn seed(&self, database_id: &str, properties: Properties) -> PageId {
        let mut inner = self.inner.lock().unwrap();
        let id = next_id(&mut inner);
        inner.pages.push(Page {
            id: id.clone(),
            database_id: database_id.to_string(),
            properties: to_map(&properties),
            icon: None,
            body: Vec::new(),
        });
        id
    }

    pub fn pages_in(&self, database_id: &str) -> Vec<Page> {
        self.inner
            .lock()
            .unwrap()
            .pages
            .iter()
            .filter(|p| p.database_id == database_id)
            .cloned()
            .collect()
    }

    pub fn page(&self, id: &PageId) -> Page {
        self.inner
            .lock()
            .unwrap()
            .pages
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .expect("page exists")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }
}

fn next_id(inner: &mut Inner) -> PageId {
    inner.next_id += 1;
    PageId(format!("page-{}", inner.next_id))
}

fn to_map(properties: &Properties) -> BTreeMap<String, PropertyValue> {
    properties
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn prop<'a>(page: &'a Page, name: &str) -> Option<&'a PropertyValue> {
    page.properties.get(name)
}

fn filter_matches(page: &Page, filter: &Filter) -> bool {
    match filter {
        Filter::UrlEquals { property, value } => {
            matches!(prop(page, property), Some(PropertyValue::Url(Some(u))) if u == value)
        }
        Filter::TitleEquals { property, value } => {
            matches!(prop(page, property), Some(PropertyValue::Title(t)) if t == value)
        }
        Filter::TitleContains { property, value } => matches!(
            prop(page, property),
            Some(PropertyValue::Title(t)) if t.to_lowercase().contains(&value.to_lowercase())
        ),
        Filter::RelationContains { property, id } => {
            matches!(prop(page, property), Some(PropertyValue::Relation(ids)) if ids.contains(id))
        }
        Filter::MultiSelectContains { property, value } => {
            matches!(prop(page, property), Some(PropertyValue::MultiSelect(names)) if names.contains(value))
        }
        Filter::MultiSelectIsEmpty { property } => match prop(page, property) {
            Some(PropertyValue::MultiSelect(names)) => names.is_empty(),
            None => true,
            Some(_) => false,
        },
        Filter::And(filters) => filters.iter().all(|f| filter_matches(page, f)),
    }
}

#[async_trait]
impl Workspace for MemoryWorkspace {
    async fn query_database(&self, database_id: &str, filter: &Filter) -> Result<Vec<PageId>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Query(database_id.to_string()));
        Ok(inner
            .pages
            .iter()
            .filter(|p| p.database_id == database_id && filter_matches(p, filter))
            .map(|p| p.id.clone())
            .collect())
    }

    async fn create_page(
        &self,
        database_id: &str,
        properties: &Properties,
        icon_url: Option<&str>,
    ) -> Result<PageId> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Create(database_id.to_string()));
        if inner.failing_databases.contains(database_id) {
            return Err(NotionError::Api {
                status: 400,
                code: "validation_error".to_string(),
                message: "Simulated create failure".to_string(),
            });
        }
        let id = next_id(&mut inner);
        inner.pages.push(Page {
            id: id.clone(),
            database_id: database_id.to_string(),
            properties: to_map(properties),
            icon: icon_url.map(str::to_string),
            body: Vec::new(),
        });
        Ok(id)
    }

    async fn update_page(&self, page_id: &PageId, properties: &Properties) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Update(page_id.clone()));
        let page = inner
            .pages
            .iter_mut()
            .find(|p| &p.id == page_id)
            .ok_or_else(|| NotionError::Api {
                status: 404,
                code: "object_not_found".to_string(),
                message: format!("Could not find page with ID: {page_id}"),
            })?;
        page.properties.extend(to_map(properties));
        Ok(())
    }

    async fn append_blocks(&self, page_id: &PageId, blocks: &[Block]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Append(page_id.clone(), blocks.len()));
        if inner.failing_appends {
            return Err(NotionError::Network("connection reset".to_string()));
        }
        let page = inner
            .pages
            .iter_mut()
            .find(|p| &p.id == page_id)
            .ok_or_else(|| NotionError::Api {
                status: 404,
                code: "object_not_found".to_string(),
                message: format!("Could not find block with ID: {page_id}"),
            })?;
        page.body.extend_from_slice(blocks);
        Ok(())
    }
}

/// Session provider with a fixed answer.
pub struct StaticSession(pub bool);

impl SessionProvider for StaticSession {
    fn is_available(&self) -> bool {
        self.0
    }
}

pub fn reconciler(workspace: &Arc<MemoryWorkspace>, session_available: bool) -> Reconciler {
    Reconciler::new(
        workspace.clone(),
        Arc::new(StaticSession(session_available)),
        COMPANIES_DB,
        JOBS_DB,
    )
}

/// A complete payload as the browser extractor would send it.
pub fn sample_request() -> IngestRequest {
    IngestRequest {
        job_url: Some("https://www.linkedin.com/jobs/view/4000000001/".to_string()),
        title: Some("Senior Rust Engineer".to_string()),
        company_name: Some("Ferrous Systems Ltd".to_string()),
        company_url: Some("https://www.linkedin.com/company/ferrous/".to_string()),
        logo_url: Some("https://media.licdn.test/logo.png".to_string()),
        location: Some("Berlin, Germany".to_string()),
        application_type: Some("Easy Apply".to_string()),
        job_description: Some(
            "About the role\n• Write Rust\n• Review code\nWhat we offer".to_string(),
        ),
        contact_person: Some("Jane Doe".to_string()),
        contact_email: Some("jobs@ferrous.test".to_string()),
        ddl: Some("2025-06-30".to_string()),
    }
}
