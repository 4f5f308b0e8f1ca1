//! Error Handling
//!
//! Error type definitions used in gh-label-importer

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Structured error code the remote API reports when a label name is taken
pub const ALREADY_EXISTS_CODE: &str = "already_exists";

/// Error types for gh-label-importer
#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub API error: {0}")]
    GitHubApi(octocrab::Error),

    #[error("Remote API error: {0}")]
    Remote(#[from] RemoteError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    ConfigValidation(String),

    #[error("Label validation error: {0}")]
    LabelValidation(String),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Authentication failed: invalid token")]
    AuthenticationFailed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid repository format: {0} (expected 'owner/repo')")]
    InvalidRepositoryFormat(String),

    #[error("Invalid label color: {0} (expected 6-digit hex, optional # prefix)")]
    InvalidLabelColor(String),
}

impl Error {
    /// Create a new configuration validation error
    pub fn config_validation<S: Into<String>>(message: S) -> Self {
        Error::ConfigValidation(message.into())
    }

    /// Create a new label validation error
    pub fn label_validation<S: Into<String>>(message: S) -> Self {
        Error::LabelValidation(message.into())
    }

    /// Flatten any error into the payload recorded on a failed label outcome
    ///
    /// Structured remote errors are kept as-is so their codes stay inspectable;
    /// everything else is reduced to its message.
    pub fn into_remote(self) -> RemoteError {
        match self {
            Error::Remote(remote) => remote,
            other => RemoteError::message(other.to_string()),
        }
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => Error::Remote(RemoteError {
                status: Some(source.status_code.as_u16()),
                message: source.message.clone(),
                documentation_url: source.documentation_url.clone(),
                errors: source
                    .errors
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .map(RemoteErrorDetail::from_value)
                    .collect(),
            }),
            other => Error::GitHubApi(other),
        }
    }
}

/// Structured error payload returned by the remote API
///
/// Backend-neutral form of a GitHub `{ message, errors, documentation_url }`
/// body, so outcome records can be cloned and compared.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    /// HTTP status of the failed response, when one was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RemoteErrorDetail>,
}

impl RemoteError {
    /// Build an error carrying only a message
    pub fn message<S: Into<String>>(message: S) -> Self {
        Self {
            status: None,
            message: message.into(),
            documentation_url: None,
            errors: Vec::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Whether the token was rejected or lacks permission
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }

    /// Code of the first structured error entry, if any
    pub fn code(&self) -> Option<&str> {
        self.errors.first().and_then(|detail| detail.code.as_deref())
    }

    /// Whether the remote rejected the request because the label already exists
    pub fn is_already_exists(&self) -> bool {
        self.code() == Some(ALREADY_EXISTS_CODE)
    }
}

/// One entry of a remote error's `errors` array
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl RemoteErrorDetail {
    /// Read a detail entry from raw JSON, tolerating missing or non-string fields
    pub fn from_value(value: &serde_json::Value) -> Self {
        let field = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            resource: field("resource"),
            field: field("field"),
            code: field("code"),
        }
    }
}
