//! Mock collaborators that record calls.

use crate::core::{CertStage, GitInfo};
use crate::errors::ExecutorError;
use crate::exec::StageExecutor;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::Notify;

/// An executor that records every triggered stage and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    triggered: Mutex<Vec<(String, CertStage)>>,
}

impl RecordingExecutor {
    /// Creates a new recording executor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the (workflow id, stage) pairs triggered so far.
    #[must_use]
    pub fn triggered(&self) -> Vec<(String, CertStage)> {
        self.triggered.lock().clone()
    }

    /// Number of trigger calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.triggered.lock().len()
    }
}

#[async_trait]
impl StageExecutor for RecordingExecutor {
    async fn trigger(
        &self,
        workflow_id: &str,
        stage: CertStage,
        _git: &GitInfo,
        _metadata: &HashMap<String, String>,
    ) -> Result<String, ExecutorError> {
        self.triggered.lock().push((workflow_id.to_string(), stage));
        Ok(format!("mock-{stage}"))
    }
}

/// An executor that fails every trigger with a fixed error.
#[derive(Debug)]
pub struct FailingExecutor {
    error: String,
}

impl FailingExecutor {
    /// Creates an executor failing with `error`.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[async_trait]
impl StageExecutor for FailingExecutor {
    async fn trigger(
        &self,
        _workflow_id: &str,
        _stage: CertStage,
        _git: &GitInfo,
        _metadata: &HashMap<String, String>,
    ) -> Result<String, ExecutorError> {
        Err(ExecutorError::Execution(self.error.clone()))
    }
}

/// An executor whose completions are released manually, for interleaving
/// callback updates with the advancement sequence.
#[derive(Debug, Default)]
pub struct ManualExecutor {
    release: Notify,
    waiting: Mutex<Vec<CertStage>>,
}

impl ManualExecutor {
    /// Creates a new manual executor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases one in-flight completion wait.
    pub fn release_one(&self) {
        self.release.notify_one();
    }

    /// Stages currently waiting on completion.
    #[must_use]
    pub fn waiting(&self) -> Vec<CertStage> {
        self.waiting.lock().clone()
    }
}

#[async_trait]
impl StageExecutor for ManualExecutor {
    async fn trigger(
        &self,
        _workflow_id: &str,
        stage: CertStage,
        _git: &GitInfo,
        _metadata: &HashMap<String, String>,
    ) -> Result<String, ExecutorError> {
        Ok(format!("manual-{stage}"))
    }

    async fn await_completion(
        &self,
        _workflow_id: &str,
        stage: CertStage,
        _executor_ref: &str,
    ) -> Result<(), ExecutorError> {
        self.waiting.lock().push(stage);
        self.release.notified().await;
        self.waiting.lock().retain(|s| *s != stage);
        Ok(())
    }
}
