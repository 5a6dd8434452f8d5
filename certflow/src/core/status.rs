//! Stage and workflow status enums.

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The execution status of a single stage.
///
/// Transitions are enforced by the orchestrator, not by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage has not started yet.
    Pending,
    /// Stage is currently executing.
    Running,
    /// Stage completed successfully.
    Succeeded,
    /// Stage failed.
    Failed,
    /// Stage was skipped.
    Skipped,
    /// Stage was cancelled.
    Cancelled,
}

impl Default for StageStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl StageStatus {
    /// All known stage statuses.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Running,
        Self::Succeeded,
        Self::Failed,
        Self::Skipped,
        Self::Cancelled,
    ];

    /// Returns the stable string token for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if the status represents a terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::Skipped | Self::Cancelled
        )
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StageStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::unknown_token("stage status", s))
    }
}

/// The overall status of a workflow.
///
/// Derived from stage results via [`derive_status`](crate::core::derive_status),
/// except for `Queued` and `Cancelled`, which are explicit orchestrator
/// overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Workflow exists; no stage has started.
    Created,
    /// Workflow accepted by the orchestrator, about to run.
    Queued,
    /// At least one stage is executing.
    Running,
    /// Some stages finished, none running, not all done.
    Partial,
    /// Every stage succeeded.
    Succeeded,
    /// At least one stage failed.
    Failed,
    /// Workflow was cancelled as a whole.
    Cancelled,
}

impl WorkflowStatus {
    /// All known workflow statuses.
    pub const ALL: [Self; 7] = [
        Self::Created,
        Self::Queued,
        Self::Running,
        Self::Partial,
        Self::Succeeded,
        Self::Failed,
        Self::Cancelled,
    ];

    /// Returns the stable string token for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Partial => "partial",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if no further transition is expected.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::unknown_token("workflow status", s))
    }
}
