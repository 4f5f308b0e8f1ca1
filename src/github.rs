//! GitHub API Client
//!
//! Remote client adapter: the [`LabelService`] seam and its octocrab-backed implementation

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ClientOptions, Label};
use crate::error::{Error, Result};

/// Page size used when listing labels
const LABELS_PER_PAGE: u8 = 100;

/// Encode a string for use in URL path segments (RFC 3986 with UTF-8 support)
///
/// Only unreserved characters (A-Z, a-z, 0-9, -, ., _, ~) are left unencoded.
fn encode_path_segment(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            // RFC 3986 unreserved characters
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '.' | '_' | '~' => c.to_string(),
            // Everything else gets percent-encoded as UTF-8 bytes
            _ => c
                .to_string()
                .bytes()
                .map(|b| format!("%{:02X}", b))
                .collect::<String>(),
        })
        .collect()
}

/// Remote Label Information
///
/// Represents label information retrieved from the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteLabel {
    /// Label ID
    pub id: u64,

    /// Label name
    pub name: String,

    /// Label color (6-digit hexadecimal, without #)
    pub color: String,

    /// Label description
    pub description: Option<String>,

    /// Whether this is a default label
    pub default: bool,

    /// Label URL
    pub url: String,
}

impl From<octocrab::models::Label> for RemoteLabel {
    fn from(label: octocrab::models::Label) -> Self {
        RemoteLabel {
            id: label.id.0,
            name: label.name,
            color: label.color,
            description: label.description,
            default: label.default,
            url: label.url.to_string(),
        }
    }
}

impl From<RemoteLabel> for Label {
    fn from(remote: RemoteLabel) -> Self {
        Label {
            name: remote.name,
            color: Some(remote.color),
            description: remote.description,
        }
    }
}

/// Pagination metadata attached to a label listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListMeta {
    /// Number of pages fetched
    pub pages: u32,

    /// Total count, when the API reports one
    pub total_count: Option<u64>,
}

/// Result of a label listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelPage {
    pub labels: Vec<RemoteLabel>,
    pub meta: ListMeta,
}

/// Label management operations scoped to a single repository
#[async_trait]
pub trait LabelService: Send + Sync {
    /// List every label in the repository
    async fn list_labels(&self) -> Result<LabelPage>;

    /// Create a label
    async fn create_label(&self, label: &Label) -> Result<RemoteLabel>;

    /// Delete a label by name
    async fn delete_label(&self, name: &str) -> Result<()>;
}

/// GitHub API Client
///
/// Authenticated once at construction; every call reuses the same session.
pub struct GitHubClient {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Create a new GitHub client
    ///
    /// # Arguments
    /// - `access_token`: GitHub access token
    /// - `owner`: Repository owner
    /// - `repo`: Repository name
    /// - `options`: Transport options
    ///
    /// # Errors
    /// Returns an error if client initialization or the token check fails
    pub async fn new(
        access_token: &str,
        owner: &str,
        repo: &str,
        options: &ClientOptions,
    ) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(access_token.to_string());
        if let Some(base_uri) = &options.base_uri {
            builder = builder.base_uri(base_uri.as_str())?;
        }
        let octocrab = builder.build()?;

        if !options.skip_token_check {
            let user = octocrab
                .current()
                .user()
                .await
                .map_err(|e| match Error::from(e) {
                    Error::Remote(remote) if remote.is_unauthorized() => {
                        Error::AuthenticationFailed
                    }
                    other => other,
                })?;
            debug!(login = %user.login, "authenticated");
        }

        Ok(Self {
            octocrab,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Repository in `owner/repo` form
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[async_trait]
impl LabelService for GitHubClient {
    async fn list_labels(&self) -> Result<LabelPage> {
        let mut result = LabelPage::default();
        let mut page = 1u32;

        loop {
            debug!(repository = %self.repository(), page, "listing labels");
            let response = self
                .octocrab
                .issues(&self.owner, &self.repo)
                .list_labels_for_repo()
                .page(page)
                .per_page(LABELS_PER_PAGE)
                .send()
                .await
                .map_err(|e| match Error::from(e) {
                    Error::Remote(remote) if remote.is_not_found() => {
                        Error::RepositoryNotFound(self.repository())
                    }
                    other => other,
                })?;

            result.meta.pages = page;
            if result.meta.total_count.is_none() {
                result.meta.total_count = response.total_count;
            }
            result
                .labels
                .extend(response.items.into_iter().map(RemoteLabel::from));

            if response.next.is_none() {
                break;
            }
            page += 1;
        }

        Ok(result)
    }

    async fn create_label(&self, label: &Label) -> Result<RemoteLabel> {
        let color = label.normalized_color()?;
        debug!(name = %label.name, %color, "creating label");
        let created = self
            .octocrab
            .issues(&self.owner, &self.repo)
            .create_label(
                &label.name,
                &color,
                label.description.as_deref().unwrap_or(""),
            )
            .await?;

        Ok(created.into())
    }

    async fn delete_label(&self, name: &str) -> Result<()> {
        debug!(%name, "deleting label");
        // Spaces, slashes and non-ASCII names must survive as a single path segment
        let route = format!(
            "/repos/{}/{}/labels/{}",
            self.owner,
            self.repo,
            encode_path_segment(name)
        );
        // The issues handler's delete_label never checks the response status
        let response = self.octocrab._delete(route, None::<&()>).await?;
        octocrab::map_github_error(response).await?;

        Ok(())
    }
}
