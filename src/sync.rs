//! Label Synchronization Functionality
//!
//! Per-label and bulk create/delete operations, purge, and the purge-then-create import workflow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bulk;
use crate::config::{Label, SyncConfig};
use crate::error::{RemoteError, Result};
use crate::github::{GitHubClient, LabelService, ListMeta, RemoteLabel};

/// Kind of remote call a label outcome records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOperation {
    Create,
    Delete,
}

/// Terminal status of a single label operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStatus {
    /// The remote call succeeded
    Success,

    /// Creation was rejected because the label already exists
    Duplicate,

    /// Any other failure
    Error,
}

/// Result record of one create or delete attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelOutcome {
    pub operation: LabelOperation,
    pub name: String,
    pub color: Option<String>,
    pub status: LabelStatus,

    /// Remote error payload (create) or captured message (delete) on failure
    pub error: Option<RemoteError>,

    pub completed_at: DateTime<Utc>,
}

impl LabelOutcome {
    fn new(
        operation: LabelOperation,
        label: &Label,
        status: LabelStatus,
        error: Option<RemoteError>,
    ) -> Self {
        Self {
            operation,
            name: label.name.clone(),
            color: label.color.clone(),
            status,
            error,
            completed_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == LabelStatus::Success
    }

    /// Error message, if the operation failed
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}

/// Remote label set as last fetched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSnapshot {
    pub labels: Vec<RemoteLabel>,

    /// Pagination metadata, kept only when requested
    pub meta: Option<ListMeta>,
}

/// Import result
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Delete outcomes of the purge phase (empty when purge was skipped)
    pub purged: Vec<LabelOutcome>,

    /// Create outcomes for the desired labels
    pub created: Vec<LabelOutcome>,
}

impl ImportResult {
    /// Every outcome, purge phase first
    pub fn outcomes(&self) -> impl Iterator<Item = &LabelOutcome> {
        self.purged.iter().chain(self.created.iter())
    }

    /// Number of operations that succeeded
    pub fn succeeded(&self) -> usize {
        self.count(LabelStatus::Success)
    }

    /// Number of labels that already existed
    pub fn duplicates(&self) -> usize {
        self.count(LabelStatus::Duplicate)
    }

    /// Number of operations that failed outright
    pub fn failed(&self) -> usize {
        self.count(LabelStatus::Error)
    }

    /// Whether any operation ended in `Error`
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, status: LabelStatus) -> usize {
        self.outcomes().filter(|o| o.status == status).count()
    }
}

/// Label Synchronization Engine
///
/// Keeps the last remote snapshot and append-only audit logs of every
/// create and delete attempt, whatever its outcome.
pub struct LabelSyncer<S = GitHubClient> {
    service: S,
    max_concurrency: Option<usize>,
    labels: LabelSnapshot,
    created_labels: Vec<LabelOutcome>,
    deleted_labels: Vec<LabelOutcome>,
}

impl LabelSyncer<GitHubClient> {
    /// Validate the configuration and authenticate against GitHub
    ///
    /// # Errors
    /// Returns an error if configuration validation or GitHub client creation fails
    pub async fn connect(config: SyncConfig) -> Result<Self> {
        config.validate()?;

        let client =
            GitHubClient::new(&config.token, &config.user, &config.repo, &config.options).await?;

        Ok(Self::with_service(client, config.max_concurrency))
    }
}

impl<S: LabelService> LabelSyncer<S> {
    /// Build a synchronizer on top of any label service
    pub fn with_service(service: S, max_concurrency: Option<usize>) -> Self {
        Self {
            service,
            max_concurrency,
            labels: LabelSnapshot::default(),
            created_labels: Vec::new(),
            deleted_labels: Vec::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Last fetched remote snapshot
    pub fn labels(&self) -> &LabelSnapshot {
        &self.labels
    }

    /// Every create attempt so far
    pub fn created_labels(&self) -> &[LabelOutcome] {
        &self.created_labels
    }

    /// Every delete attempt so far
    pub fn deleted_labels(&self) -> &[LabelOutcome] {
        &self.deleted_labels
    }

    /// Fetch the remote label set and store it as the current snapshot
    ///
    /// # Arguments
    /// - `include_meta`: Keep pagination metadata in the snapshot
    ///
    /// # Errors
    /// Returns an error if the remote listing fails
    pub async fn get_labels(&mut self, include_meta: bool) -> Result<LabelSnapshot> {
        let page = self.service.list_labels().await?;
        debug!(count = page.labels.len(), pages = page.meta.pages, "fetched labels");

        let snapshot = LabelSnapshot {
            labels: page.labels,
            meta: include_meta.then_some(page.meta),
        };
        self.labels = snapshot.clone();
        Ok(snapshot)
    }

    /// Delete one label; failures are recorded, never returned
    pub async fn delete_label(&mut self, label: &Label) -> LabelOutcome {
        let outcome = self.attempt_delete(label).await;
        self.deleted_labels.push(outcome.clone());
        outcome
    }

    /// Delete every label concurrently
    pub async fn delete_labels(&mut self, labels: &[Label]) -> Vec<LabelOutcome> {
        let this = &*self;
        let outcomes = bulk::run_all(labels, this.max_concurrency, |label| {
            this.attempt_delete(label)
        })
        .await;
        self.deleted_labels.extend(outcomes.iter().cloned());
        outcomes
    }

    /// Create one label; failures are recorded, never returned
    pub async fn create_label(&mut self, label: &Label) -> LabelOutcome {
        let outcome = self.attempt_create(label).await;
        self.created_labels.push(outcome.clone());
        outcome
    }

    /// Create every label concurrently
    pub async fn create_labels(&mut self, labels: &[Label]) -> Vec<LabelOutcome> {
        let this = &*self;
        let outcomes = bulk::run_all(labels, this.max_concurrency, |label| {
            this.attempt_create(label)
        })
        .await;
        self.created_labels.extend(outcomes.iter().cloned());
        outcomes
    }

    /// Delete whatever labels the remote holds right now
    ///
    /// # Errors
    /// Returns an error if fetching the current label set fails
    pub async fn purge_labels(&mut self) -> Result<Vec<LabelOutcome>> {
        let snapshot = self.get_labels(false).await?;
        let targets: Vec<Label> = snapshot.labels.into_iter().map(Label::from).collect();
        info!(count = targets.len(), "purging labels");
        Ok(self.delete_labels(&targets).await)
    }

    /// Apply a desired label set, optionally purging the remote first
    ///
    /// The purge phase completes before any create is issued.
    ///
    /// # Errors
    /// Returns an error if the purge phase cannot list the remote labels
    pub async fn import_labels(&mut self, desired: &[Label], purge: bool) -> Result<ImportResult> {
        let purged = if purge {
            self.purge_labels().await?
        } else {
            Vec::new()
        };

        info!(count = desired.len(), "creating labels");
        let created = self.create_labels(desired).await;

        let result = ImportResult { purged, created };
        info!(
            succeeded = result.succeeded(),
            duplicates = result.duplicates(),
            failed = result.failed(),
            "import finished"
        );
        Ok(result)
    }

    async fn attempt_delete(&self, label: &Label) -> LabelOutcome {
        match self.service.delete_label(&label.name).await {
            Ok(()) => {
                debug!(name = %label.name, "label deleted");
                LabelOutcome::new(LabelOperation::Delete, label, LabelStatus::Success, None)
            }
            Err(e) => {
                let error = RemoteError::message(e.to_string());
                warn!(name = %label.name, error = %error, "failed to delete label");
                LabelOutcome::new(
                    LabelOperation::Delete,
                    label,
                    LabelStatus::Error,
                    Some(error),
                )
            }
        }
    }

    async fn attempt_create(&self, label: &Label) -> LabelOutcome {
        let result = match label.normalized_color() {
            Ok(_) => self.service.create_label(label).await.map(|_| ()),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                debug!(name = %label.name, "label created");
                LabelOutcome::new(LabelOperation::Create, label, LabelStatus::Success, None)
            }
            Err(e) => {
                let error = e.into_remote();
                let status = if error.is_already_exists() {
                    LabelStatus::Duplicate
                } else {
                    LabelStatus::Error
                };
                warn!(name = %label.name, ?status, error = %error, "failed to create label");
                LabelOutcome::new(LabelOperation::Create, label, status, Some(error))
            }
        }
    }
}
