//! Stage execution seam.

use crate::core::{CertStage, GitInfo};
use crate::errors::ExecutorError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// External system that performs a stage's work.
///
/// `trigger` submits the stage and resolves with a reference token once the
/// backend accepts it; `await_completion` resolves when the backend reports
/// the stage done. The orchestrator absorbs any error into the stage state
/// as a failure; nothing is propagated to the workflow creator.
#[async_trait]
pub trait StageExecutor: Send + Sync {
    /// Submits a stage for execution, returning the backend's reference
    /// token.
    async fn trigger(
        &self,
        workflow_id: &str,
        stage: CertStage,
        git: &GitInfo,
        metadata: &HashMap<String, String>,
    ) -> Result<String, ExecutorError>;

    /// Waits for a previously triggered stage to complete.
    ///
    /// The default treats the trigger as synchronous and resolves
    /// immediately.
    async fn await_completion(
        &self,
        _workflow_id: &str,
        _stage: CertStage,
        _executor_ref: &str,
    ) -> Result<(), ExecutorError> {
        Ok(())
    }
}

/// Simulated executor used until a real execution backend is wired in.
///
/// Accepts every stage after a short delay and reports completion after
/// another, mirroring the latency profile of a remote backend.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    accept_delay: Duration,
    completion_delay: Duration,
}

impl SimulatedExecutor {
    /// Creates a simulated executor with the given delays.
    #[must_use]
    pub fn new(accept_delay: Duration, completion_delay: Duration) -> Self {
        Self {
            accept_delay,
            completion_delay,
        }
    }

    /// Creates a simulated executor with no artificial latency.
    #[must_use]
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new(Duration::from_millis(50), Duration::from_millis(50))
    }
}

#[async_trait]
impl StageExecutor for SimulatedExecutor {
    async fn trigger(
        &self,
        workflow_id: &str,
        stage: CertStage,
        _git: &GitInfo,
        _metadata: &HashMap<String, String>,
    ) -> Result<String, ExecutorError> {
        tokio::time::sleep(self.accept_delay).await;
        let short_id = workflow_id.get(..8).unwrap_or(workflow_id);
        Ok(format!("exec-{short_id}-{stage}"))
    }

    async fn await_completion(
        &self,
        _workflow_id: &str,
        _stage: CertStage,
        _executor_ref: &str,
    ) -> Result<(), ExecutorError> {
        tokio::time::sleep(self.completion_delay).await;
        Ok(())
    }
}
