//! Common fixtures for orchestration tests.

use crate::core::{Domain, GitInfo, WorkflowCreateRequest};

/// Initializes a tracing subscriber for test output. Safe to call
/// repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Git info pointing at a small fixture repository.
#[must_use]
pub fn sample_git() -> GitInfo {
    GitInfo::new("git@gitlab.com:acme/payments.git", "main", "abc123def456")
        .with_author("alice")
        .with_folder("scripts")
}

/// A create request for `domain` with default stages.
#[must_use]
pub fn create_request(domain: Domain) -> WorkflowCreateRequest {
    WorkflowCreateRequest::new(sample_git(), domain)
}
