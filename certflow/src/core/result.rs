//! Per-stage execution results.

use super::{CertStage, StageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result details for one planned stage of a workflow.
///
/// `duration_ms` is present exactly when both timestamps are, and equals
/// `finished_at - started_at` in whole milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    /// Stage this result belongs to.
    pub stage: CertStage,
    /// Current status of the stage.
    pub status: StageStatus,
    /// When the stage started running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the stage reached a terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Execution duration in whole milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    /// Link to logs for the stage run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs_url: Option<String>,
    /// Collected numeric metrics keyed by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<HashMap<String, f64>>,
    /// Artifact references keyed by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<HashMap<String, String>>,
    /// Error details if the stage failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Reference returned by the execution backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor_ref: Option<String>,
}

impl StageResult {
    /// Creates a pending result with no timestamps.
    #[must_use]
    pub fn pending(stage: CertStage) -> Self {
        Self {
            stage,
            status: StageStatus::Pending,
            started_at: None,
            finished_at: None,
            duration_ms: None,
            logs_url: None,
            metrics: None,
            artifacts: None,
            error_message: None,
            executor_ref: None,
        }
    }

    /// Marks the result running as of `at`, refreshing the start timestamp.
    pub fn start(&mut self, at: DateTime<Utc>) {
        self.status = StageStatus::Running;
        self.started_at = Some(at);
    }

    /// Moves the result to a terminal `status` as of `at`.
    ///
    /// The duration is computed only when a start timestamp is present, so
    /// both timestamps and the duration always appear together.
    pub fn finish(&mut self, status: StageStatus, at: DateTime<Utc>) {
        self.status = status;
        self.finished_at = Some(at);
        if let Some(started) = self.started_at {
            self.duration_ms = Some((at - started).num_milliseconds());
        }
    }

    /// Returns true if the stage has reached a terminal status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
