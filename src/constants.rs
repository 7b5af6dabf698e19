//! Shared constants used across the application.

/// Notion API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Maximum length, in UTF-16 code units, Notion accepts in a single rich
/// text object.
pub const MAX_BLOCK_TEXT_LEN: usize = 2000;

/// Maximum children Notion accepts in one append request.
pub const MAX_BLOCKS_PER_APPEND: usize = 100;

/// Organization database property names.
pub mod company_props {
    pub const NAME: &str = "Name";
    pub const INDUSTRY: &str = "Industry";
    pub const LINK: &str = "Company link";
}

/// Posting database property names.
pub mod job_props {
    pub const TITLE: &str = "Job Applications";
    pub const COMPANIES: &str = "Companies";
    pub const CATEGORY: &str = "Job Role Categorisation";
    pub const APPLICATION_URL: &str = "Application URL";
    pub const LOCATION: &str = "location";
    pub const CONTACT_PERSON: &str = "Contact Person";
    pub const CONTACT_EMAIL: &str = "Contact Email";
    pub const DEADLINE: &str = "DDL";
}
