use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteworkError {
    #[error("{method} {path} failed{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    RequestFailed {
        method: String,
        path: String,
        status: Option<u16>,
        message: String,
    },

    #[error("{0} '{1}' not found")]
    NotFound(&'static str, String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("action '{0}' is not available for {1}")]
    InvalidAction(String, &'static str),

    #[error("invalid field '{0}': {1}")]
    InvalidField(String, String),

    #[error("invalid value '{0}'")]
    InvalidValue(String),

    #[error("invalid sort direction '{0}', expected 'asc' or 'desc'")]
    InvalidSortDirection(String),

    #[error("{0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl SiteworkError {
    /// Whether this error is the generic "request failed" kind shown to users
    /// as a retryable toast.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            SiteworkError::RequestFailed { .. }
                | SiteworkError::NotFound(..)
                | SiteworkError::Http(_)
        )
    }

    pub fn request_failed(
        method: impl Into<String>,
        path: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        SiteworkError::RequestFailed {
            method: method.into(),
            path: path.into(),
            status,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteworkError>;
