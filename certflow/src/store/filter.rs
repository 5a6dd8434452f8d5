//! Listing filters and pagination.

use crate::core::{CertStage, Domain, Workflow, WorkflowStatus};

/// Smallest accepted page size.
pub const MIN_LIMIT: usize = 1;
/// Largest accepted page size.
pub const MAX_LIMIT: usize = 500;
/// Page size used when none is requested.
pub const DEFAULT_LIMIT: usize = 50;

/// Filter predicates for workflow listings.
///
/// Every supplied field must match for a workflow to be included; unset
/// fields match everything. The status filter is enum-constrained, so
/// unknown status tokens are rejected at the parsing boundary instead of
/// silently matching nothing.
#[derive(Debug, Clone, Default)]
pub struct WorkflowFilter {
    /// Exact match against the `script_path` metadata key.
    pub script_path: Option<String>,
    /// Exact domain match.
    pub domain: Option<Domain>,
    /// Case-insensitive match against the git author.
    pub author: Option<String>,
    /// Exact branch match.
    pub branch: Option<String>,
    /// Exact commit SHA match.
    pub commit: Option<String>,
    /// Requires the stage to be present among the workflow's results.
    pub stage: Option<CertStage>,
    /// Exact overall status match.
    pub status: Option<WorkflowStatus>,
}

impl WorkflowFilter {
    /// Creates an empty filter matching every workflow.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by domain.
    #[must_use]
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Filters by git author, ignoring case.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Filters by branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Filters by commit SHA.
    #[must_use]
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    /// Filters by the `script_path` metadata entry.
    #[must_use]
    pub fn with_script_path(mut self, script_path: impl Into<String>) -> Self {
        self.script_path = Some(script_path.into());
        self
    }

    /// Filters by planned stage.
    #[must_use]
    pub fn with_stage(mut self, stage: CertStage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Filters by overall status.
    #[must_use]
    pub fn with_status(mut self, status: WorkflowStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if the workflow passes every supplied predicate.
    #[must_use]
    pub fn matches(&self, workflow: &Workflow) -> bool {
        if let Some(domain) = self.domain {
            if workflow.domain != domain {
                return false;
            }
        }
        if let Some(ref author) = self.author {
            let stored = workflow.git.author.as_deref().unwrap_or("");
            if stored.to_lowercase() != author.to_lowercase() {
                return false;
            }
        }
        if let Some(ref branch) = self.branch {
            if workflow.git.branch != *branch {
                return false;
            }
        }
        if let Some(ref commit) = self.commit {
            if workflow.git.commit_sha != *commit {
                return false;
            }
        }
        if let Some(status) = self.status {
            if workflow.status != status {
                return false;
            }
        }
        if let Some(ref script_path) = self.script_path {
            if workflow.metadata.get("script_path") != Some(script_path) {
                return false;
            }
        }
        if let Some(stage) = self.stage {
            if !workflow.stage_results.contains_key(stage.key()) {
                return false;
            }
        }
        true
    }
}

/// Pagination window with a clamped limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: usize,
    offset: usize,
}

impl Page {
    /// Creates a page, clamping `limit` into `1..=500`.
    #[must_use]
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: limit.clamp(MIN_LIMIT, MAX_LIMIT),
            offset,
        }
    }

    /// Maximum number of records returned.
    #[must_use]
    pub fn limit(self) -> usize {
        self.limit
    }

    /// Number of matching records skipped.
    #[must_use]
    pub fn offset(self) -> usize {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, 0)
    }
}
