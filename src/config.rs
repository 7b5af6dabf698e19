use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Notion
    pub notion_token: String,
    pub notion_api_url: String,
    pub notion_timeout: Duration,
    pub jobs_db_id: String,
    pub companies_db_id: String,

    // Browser session captured by the login helper
    pub session_state_path: PathBuf,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Notion
            notion_token: required_env("NOTION_TOKEN")?,
            notion_api_url: env_or_default("NOTION_API_URL", "https://api.notion.com/v1"),
            notion_timeout: Duration::from_secs(parse_env_u64("NOTION_TIMEOUT_SECS", 30)?),
            jobs_db_id: required_env("JOBS_DB_ID")?,
            companies_db_id: required_env("COMPANIES_DB_ID")?,

            // Session
            session_state_path: PathBuf::from(env_or_default(
                "SESSION_STATE_PATH",
                "storage/state.json",
            )),

            // Web Server
            web_host: env_or_default("WEB_HOST", "127.0.0.1"),
            web_port: parse_env_u16("PORT", 8787)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("NOTION_TOKEN", &self.notion_token),
            ("JOBS_DB_ID", &self.jobs_db_id),
            ("COMPANIES_DB_ID", &self.companies_db_id),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: "cannot be empty".to_string(),
                });
            }
        }
        if self.notion_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "NOTION_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if url::Url::parse(&self.notion_api_url).is_err() {
            return Err(ConfigError::InvalidValue {
                name: "NOTION_API_URL".to_string(),
                message: format!("not a valid URL: '{}'", self.notion_api_url),
            });
        }
        Ok(())
    }

    /// Configuration with placeholder credentials, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            notion_token: "secret_test".to_string(),
            notion_api_url: "http://127.0.0.1:9/v1".to_string(),
            notion_timeout: Duration::from_secs(5),
            jobs_db_id: "jobs-db".to_string(),
            companies_db_id: "companies-db".to_string(),
            session_state_path: PathBuf::from("storage/state.json"),
            web_host: "127.0.0.1".to_string(),
            web_port: 8787,
        }
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
