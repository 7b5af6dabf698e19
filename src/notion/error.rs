use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotionError>;

#[derive(Debug, Error)]
pub enum NotionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Notion API error (status {status}, {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Error body returned by the Notion API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl NotionError {
    /// Build an API error from a failed response's status and raw body.
    ///
    /// Falls back to the raw body when it is not a Notion error object.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                code,
                message: Some(message),
            }) => NotionError::Api {
                status,
                code: code.unwrap_or_else(|| "unknown".to_string()),
                message,
            },
            _ => NotionError::Api {
                status,
                code: "unknown".to_string(),
                message: body.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for NotionError {
    fn from(err: reqwest::Error) -> Self {
        NotionError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for NotionError {
    fn from(err: serde_json::Error) -> Self {
        NotionError::Parse(err.to_string())
    }
}
