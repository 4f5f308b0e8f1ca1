//! # gh-label-importer
//!
//! Import a label set into a GitHub repository
//!
//! ## Features
//! - List, create and delete repository labels
//! - Purge-then-create import of a desired label set
//! - Per-label outcome records and audit logs
//! - Optional cap on concurrent API calls

pub mod bulk;
pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod sync;

pub use config::{ClientOptions, Label, SyncConfig};
pub use error::{Error, RemoteError, Result};
pub use github::{GitHubClient, LabelService};
pub use sync::{ImportResult, LabelOutcome, LabelStatus, LabelSyncer};

/// Import labels into a repository
///
/// Connects with the given token, optionally purges every existing label,
/// then creates `labels`.
///
/// # Examples
///
/// ```rust,no_run
/// use gh_label_importer::{Label, LabelSyncer, SyncConfig};
///
/// #[tokio::main]
/// async fn main() -> gh_label_importer::Result<()> {
///     let config = SyncConfig::new("your_github_token", "owner/repo")?;
///     let mut syncer = LabelSyncer::connect(config).await?;
///
///     let desired = vec![Label::new("feature", "#00ff00")?];
///     let result = syncer.import_labels(&desired, true).await?;
///
///     for outcome in result.outcomes() {
///         println!("{:?} {} -> {:?}", outcome.operation, outcome.name, outcome.status);
///     }
///     Ok(())
/// }
/// ```
pub async fn import_repository_labels(
    access_token: &str,
    repository: &str,
    labels: Vec<Label>,
    purge: bool,
) -> Result<ImportResult> {
    let config = SyncConfig::new(access_token, repository)?;
    let mut syncer = LabelSyncer::connect(config).await?;
    syncer.import_labels(&labels, purge).await
}
