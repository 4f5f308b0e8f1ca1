//! Configuration Management
//!
//! Label definitions, label manifest loading and synchronizer settings

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable consulted for the access token when none is given
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Label Definition
///
/// A label to create on, or delete from, the remote repository
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Label {
    /// Label name (identity within a repository)
    pub name: String,

    /// Label color (6-digit hex code, `#` prefix optional). Not needed for deletion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Label description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Label {
    /// Create a new label definition
    ///
    /// # Errors
    /// Returns an error if the name is empty or the color format is invalid
    pub fn new<N: Into<String>, C: Into<String>>(name: N, color: C) -> Result<Self> {
        let label = Self {
            name: name.into(),
            color: Some(color.into()),
            description: None,
        };

        label.validate()?;
        Ok(label)
    }

    /// Reference a label by name only, e.g. for deletion
    pub fn named<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            color: None,
            description: None,
        }
    }

    /// Attach a description
    pub fn with_description<D: Into<String>>(mut self, description: D) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate label definition
    ///
    /// # Errors
    /// - If the name is empty
    /// - If a color is present and its format is invalid
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::label_validation("Label name cannot be empty"));
        }

        if let Some(color) = &self.color {
            if !is_valid_hex_color(&normalize_color(color)) {
                return Err(Error::InvalidLabelColor(color.clone()));
            }
        }

        Ok(())
    }

    /// Color as sent to the remote API (no `#`, lowercase)
    ///
    /// # Errors
    /// Returns a label validation error if the label has no color
    pub fn normalized_color(&self) -> Result<String> {
        self.color
            .as_deref()
            .map(normalize_color)
            .ok_or_else(|| {
                Error::label_validation(format!("Label '{}' has no color", self.name))
            })
    }
}

/// Normalize color (remove # and convert to lowercase)
pub fn normalize_color(color: &str) -> String {
    color.trim().trim_start_matches('#').to_lowercase()
}

/// Transport options passed through to the remote client
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Override the API root (GitHub Enterprise, local mocks)
    pub base_uri: Option<String>,

    /// Skip the `GET /user` token check performed at construction
    pub skip_token_check: bool,
}

/// Sync Configuration
///
/// Credentials and target repository, fixed once the synchronizer is built
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Repository owner
    pub user: String,

    /// Repository name
    pub repo: String,

    /// GitHub personal access token
    pub token: String,

    /// Transport options
    pub options: ClientOptions,

    /// Maximum in-flight remote calls during bulk operations (`None` = unbounded)
    pub max_concurrency: Option<usize>,
}

impl SyncConfig {
    /// Build a configuration from a token and an `owner/repo` string
    ///
    /// # Errors
    /// Returns an error if the repository format is invalid
    pub fn new<T: Into<String>>(token: T, repository: &str) -> Result<Self> {
        let (user, repo) = parse_repository(repository)?;
        Ok(Self {
            user,
            repo,
            token: token.into(),
            options: ClientOptions::default(),
            max_concurrency: None,
        })
    }

    /// Validate configuration
    ///
    /// # Errors
    /// - If the access token is empty
    /// - If owner or repository name is empty
    /// - If the concurrency cap is zero
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::config_validation("Access token is required"));
        }

        if self.user.trim().is_empty() || self.repo.trim().is_empty() {
            return Err(Error::InvalidRepositoryFormat(self.repository()));
        }

        if self.max_concurrency == Some(0) {
            return Err(Error::config_validation(
                "Concurrency limit must be at least 1",
            ));
        }

        if let Some(base_uri) = &self.options.base_uri {
            url::Url::parse(base_uri).map_err(|e| {
                Error::config_validation(format!("Invalid API base URI '{}': {}", base_uri, e))
            })?;
        }

        Ok(())
    }

    /// Repository in `owner/repo` form
    pub fn repository(&self) -> String {
        format!("{}/{}", self.user, self.repo)
    }
}

/// Parse repository string into owner and name
///
/// # Arguments
/// - `repo`: Repository string in "owner/repo" format
///
/// # Errors
/// Returns an error if the format is invalid
pub fn parse_repository(repo: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = repo.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(Error::InvalidRepositoryFormat(repo.to_string()));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// Load a label manifest from a file, detecting format by extension
///
/// # Arguments
/// - `path`: Path to the manifest (.json, .yaml, or .yml)
///
/// # Errors
/// If file reading, parsing, or validation fails, or if the extension is unsupported
pub fn load_labels_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Label>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Label file not found: {}", path.display()),
        )
        .into());
    }

    let content = std::fs::read_to_string(path)?;
    let labels: Vec<Label> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => {
            return Err(Error::config_validation(
                "Label file must be .json, .yaml, or .yml",
            ))
        }
    };

    validate_all(labels)
}

/// Load a label manifest from stdin
///
/// # Errors
/// If stdin is empty, or parsing/validation fails
pub fn load_labels_from_stdin() -> Result<Vec<Label>> {
    load_labels_from_reader(std::io::stdin())
}

/// Load a label manifest from any reader, auto-detecting JSON or YAML format
///
/// # Errors
/// If the reader is empty, or parsing/validation fails
pub fn load_labels_from_reader<R: std::io::Read>(mut reader: R) -> Result<Vec<Label>> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    if content.trim().is_empty() {
        return Err(Error::config_validation("Empty label input"));
    }

    parse_labels_auto_detect(&content)
}

/// Parse a label manifest, trying JSON first, then YAML
///
/// # Errors
/// If neither JSON nor YAML parsing succeeds, or validation fails
pub fn parse_labels_auto_detect(content: &str) -> Result<Vec<Label>> {
    if let Ok(labels) = serde_json::from_str::<Vec<Label>>(content) {
        return validate_all(labels);
    }

    let labels: Vec<Label> = serde_yaml::from_str(content)?;
    validate_all(labels)
}

fn validate_all(labels: Vec<Label>) -> Result<Vec<Label>> {
    for label in &labels {
        label.validate()?;
    }
    Ok(labels)
}

/// Validate hex color code
///
/// # Arguments
/// - `color`: Color code (6-digit hex without #)
fn is_valid_hex_color(color: &str) -> bool {
    color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
}
