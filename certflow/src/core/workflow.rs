//! The workflow aggregate and its request payloads.

use super::{derive_status, CertStage, Domain, StageResult, StageStatus, WorkflowStatus};
use crate::errors::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Git repository info associated with a certification workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitInfo {
    /// Full git repository URL or path.
    pub repository: String,
    /// Relative folder inside the repository where scripts live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Git branch for the workflow.
    pub branch: String,
    /// Commit SHA associated with the workflow.
    pub commit_sha: String,
    /// Author of the commit or workflow requester.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl GitInfo {
    /// Creates git info for a repository, branch and commit.
    #[must_use]
    pub fn new(
        repository: impl Into<String>,
        branch: impl Into<String>,
        commit_sha: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            folder: None,
            branch: branch.into(),
            commit_sha: commit_sha.into(),
            author: None,
        }
    }

    /// Sets the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the scripts folder.
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Rejects empty required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.repository.trim().is_empty() {
            return Err(ValidationError::empty_field("repository"));
        }
        if self.branch.trim().is_empty() {
            return Err(ValidationError::empty_field("branch"));
        }
        if self.commit_sha.trim().is_empty() {
            return Err(ValidationError::empty_field("commit_sha"));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

/// Notification configuration for a workflow.
///
/// A snapshot is captured on the workflow at creation; later changes to
/// global defaults never affect an existing workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Webhook URL for posting notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Email to notify upon completion or failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Chat channel for notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_channel: Option<String>,
    /// Send a notification when the workflow starts.
    #[serde(default)]
    pub on_start: bool,
    /// Send a notification when the workflow finishes.
    #[serde(default = "default_true")]
    pub on_finish: bool,
    /// Send a notification on any stage failure.
    #[serde(default = "default_true")]
    pub on_failure: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            email: None,
            slack_channel: None,
            on_start: false,
            on_finish: true,
            on_failure: true,
        }
    }
}

impl NotificationConfig {
    /// Sets the webhook URL.
    #[must_use]
    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    /// Enables or disables the on-start notification.
    #[must_use]
    pub fn with_on_start(mut self, on_start: bool) -> Self {
        self.on_start = on_start;
        self
    }
}

/// Request to create a certification workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowCreateRequest {
    /// Git parameters for the workflow.
    pub git: GitInfo,
    /// Domain to certify against.
    pub domain: Domain,
    /// Specific stages to run; domain defaults when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<CertStage>>,
    /// Arbitrary metadata for traceability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    /// Notification configuration override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationConfig>,
    /// Correlation id grouping related workflow requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlate_run_id: Option<String>,
}

impl WorkflowCreateRequest {
    /// Creates a request with domain-default stages.
    #[must_use]
    pub fn new(git: GitInfo, domain: Domain) -> Self {
        Self {
            git,
            domain,
            stages: None,
            metadata: None,
            notification: None,
            correlate_run_id: None,
        }
    }

    /// Overrides the planned stage list.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<CertStage>) -> Self {
        self.stages = Some(stages);
        self
    }

    /// Attaches traceability metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Attaches a notification configuration.
    #[must_use]
    pub fn with_notification(mut self, notification: NotificationConfig) -> Self {
        self.notification = Some(notification);
        self
    }

    /// Sets the correlation id.
    #[must_use]
    pub fn with_correlate_run_id(mut self, id: impl Into<String>) -> Self {
        self.correlate_run_id = Some(id.into());
        self
    }
}

/// Out-of-band stage update, typically an execution backend callback.
///
/// Unset optional fields leave the stored values untouched; set fields
/// overwrite them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageUpdateRequest {
    /// Stage being updated.
    pub stage: CertStage,
    /// New status for the stage.
    pub status: StageStatus,
    /// Optional logs link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs_url: Option<String>,
    /// Optional metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<HashMap<String, f64>>,
    /// Optional artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<HashMap<String, String>>,
    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Executor reference id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor_ref: Option<String>,
}

impl StageUpdateRequest {
    /// Creates an update carrying only a status change.
    #[must_use]
    pub fn new(stage: CertStage, status: StageStatus) -> Self {
        Self {
            stage,
            status,
            logs_url: None,
            metrics: None,
            artifacts: None,
            error_message: None,
            executor_ref: None,
        }
    }

    /// Attaches a logs link.
    #[must_use]
    pub fn with_logs_url(mut self, url: impl Into<String>) -> Self {
        self.logs_url = Some(url.into());
        self
    }

    /// Attaches metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: HashMap<String, f64>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Attaches artifacts.
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: HashMap<String, String>) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Attaches an error message.
    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Attaches the executor reference.
    #[must_use]
    pub fn with_executor_ref(mut self, executor_ref: impl Into<String>) -> Self {
        self.executor_ref = Some(executor_ref.into());
        self
    }
}

/// One end-to-end certification run over a specific git commit.
///
/// Invariant: `stage_results` holds exactly one entry per planned stage,
/// keyed by the stage token; entries are mutated in place but keys never
/// change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow identifier.
    pub id: String,
    /// Correlation id to group workflows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlate_run_id: Option<String>,
    /// Git information.
    pub git: GitInfo,
    /// Domain.
    pub domain: Domain,
    /// Stages planned for execution, fixed at creation.
    pub stages: Vec<CertStage>,
    /// Overall workflow status.
    pub status: WorkflowStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Map of stage token to result.
    #[serde(default)]
    pub stage_results: HashMap<String, StageResult>,
    /// Metadata for traceability.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Notification configuration in effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationConfig>,
}

impl Workflow {
    /// Builds a workflow from a create request, every planned stage pending.
    #[must_use]
    pub fn from_request(
        id: impl Into<String>,
        request: WorkflowCreateRequest,
        now: DateTime<Utc>,
    ) -> Self {
        let stages = request
            .stages
            .unwrap_or_else(|| request.domain.default_stages().to_vec());
        let mut workflow = Self {
            id: id.into(),
            correlate_run_id: request.correlate_run_id,
            git: request.git,
            domain: request.domain,
            stage_results: init_stage_results(&stages),
            stages,
            status: WorkflowStatus::Created,
            created_at: now,
            updated_at: now,
            metadata: request.metadata.unwrap_or_default(),
            notification: request.notification,
        };
        workflow.recompute_status();
        workflow
    }

    /// Looks up the result entry for a stage.
    #[must_use]
    pub fn stage_result(&self, stage: CertStage) -> Option<&StageResult> {
        self.stage_results.get(stage.key())
    }

    /// Recomputes the overall status from the current stage results.
    pub fn recompute_status(&mut self) {
        self.status = derive_status(&self.stage_results);
    }
}

/// Initializes one pending result entry per planned stage.
#[must_use]
pub fn init_stage_results(stages: &[CertStage]) -> HashMap<String, StageResult> {
    stages
        .iter()
        .map(|stage| (stage.key().to_string(), StageResult::pending(*stage)))
        .collect()
}
