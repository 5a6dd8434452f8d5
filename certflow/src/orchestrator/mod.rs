//! Workflow orchestration: creation, stage advancement, external updates.

#[cfg(test)]
mod integration_tests;

use crate::core::{
    NotificationConfig, StageResult, StageStatus, StageUpdateRequest, Workflow,
    WorkflowCreateRequest, WorkflowStatus,
};
use crate::errors::CertflowError;
use crate::exec::StageExecutor;
use crate::notify::Notifier;
use crate::store::{Page, WorkflowFilter, WorkflowRepository};
use crate::utils::{new_workflow_id, now_utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Drives certification workflows from creation to completion.
///
/// One spawned task advances each workflow's stages strictly in planning
/// order; external callbacks may mutate the same record at any time. Both
/// paths serialize per workflow id, and every mutation re-reads the stored
/// record under that lock before writing, so concurrent field updates are
/// never lost to a stale full-record replace.
#[derive(Clone)]
pub struct Orchestrator {
    repo: Arc<dyn WorkflowRepository>,
    executor: Arc<dyn StageExecutor>,
    notifier: Arc<dyn Notifier>,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl Orchestrator {
    /// Creates an orchestrator over the given collaborators.
    #[must_use]
    pub fn new(
        repo: Arc<dyn WorkflowRepository>,
        executor: Arc<dyn StageExecutor>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repo,
            executor,
            notifier,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Creates a workflow and schedules its advancement sequence.
    ///
    /// The returned workflow is the freshly stored initial state; callers
    /// observe progress by re-querying the store. Stage execution failures
    /// are absorbed into workflow state and never surface here.
    pub async fn create_workflow(
        &self,
        request: WorkflowCreateRequest,
    ) -> Result<Workflow, CertflowError> {
        request.git.validate()?;

        let workflow = Workflow::from_request(new_workflow_id(), request, now_utc());
        let workflow = self.repo.create(workflow).await;
        debug!(workflow_id = %workflow.id, domain = %workflow.domain, "workflow created");

        if workflow.notification.as_ref().is_some_and(|n| n.on_start) {
            self.notify_detached(
                workflow.notification.clone(),
                format!(
                    "Workflow {} created for {}@{}",
                    workflow.id, workflow.git.repository, workflow.git.commit_sha
                ),
            );
        }

        self.spawn_advancement(workflow.id.clone());
        Ok(workflow)
    }

    /// Fetches a workflow snapshot by id.
    pub async fn get_workflow(&self, workflow_id: &str) -> Option<Workflow> {
        self.repo.get(workflow_id).await
    }

    /// Lists workflows matching `filter` within `page`.
    pub async fn list_workflows(&self, filter: &WorkflowFilter, page: Page) -> Vec<Workflow> {
        self.repo.list(filter, page).await
    }

    /// Applies an out-of-band stage update reported by an execution backend.
    ///
    /// Returns `None` when the workflow does not exist. Updates are accepted
    /// regardless of the overall status; the aggregate is re-derived from
    /// whatever the stage map contains afterwards.
    pub async fn update_stage(
        &self,
        workflow_id: &str,
        request: StageUpdateRequest,
    ) -> Option<Workflow> {
        self.mutate_workflow(workflow_id, move |workflow| {
            let entry = workflow
                .stage_results
                .entry(request.stage.key().to_string())
                .or_insert_with(|| StageResult::pending(request.stage));

            if let Some(logs_url) = request.logs_url {
                entry.logs_url = Some(logs_url);
            }
            if let Some(metrics) = request.metrics {
                entry.metrics = Some(metrics);
            }
            if let Some(artifacts) = request.artifacts {
                entry.artifacts = Some(artifacts);
            }
            if let Some(error_message) = request.error_message {
                entry.error_message = Some(error_message);
            }
            if let Some(executor_ref) = request.executor_ref {
                entry.executor_ref = Some(executor_ref);
            }

            match request.status {
                StageStatus::Running => entry.start(now_utc()),
                status if status.is_terminal() => entry.finish(status, now_utc()),
                status => entry.status = status,
            }
            workflow.recompute_status();
        })
        .await
    }

    /// Spawns the advancement task plus a watcher that converts a panicked
    /// task into recorded stage failures instead of a silent death.
    fn spawn_advancement(&self, workflow_id: String) {
        let runner = self.clone();
        let spawned_id = workflow_id.clone();
        let handle = tokio::spawn(async move { runner.advance(&spawned_id).await });

        let watcher = self.clone();
        tokio::spawn(async move {
            if let Err(join_err) = handle.await {
                let reason = format!("advancement aborted: {join_err}");
                warn!(workflow_id = %workflow_id, "{reason}");
                watcher
                    .mutate_workflow(&workflow_id, |workflow| {
                        for result in workflow.stage_results.values_mut() {
                            if result.status == StageStatus::Running {
                                result.error_message = Some(reason.clone());
                                result.finish(StageStatus::Failed, now_utc());
                            }
                        }
                        workflow.recompute_status();
                    })
                    .await;
            }
        });
    }

    /// Advancement sequence: drives every planned stage in order.
    ///
    /// Runs once per workflow, independently of the creating call. A stage
    /// failure halts the remaining stages; later stages stay pending
    /// forever and the derived status is already `failed`.
    async fn advance(&self, workflow_id: &str) {
        // Workflow may have vanished between create and spawn.
        let Some(workflow) = self.repo.get(workflow_id).await else {
            return;
        };

        self.mutate_workflow(workflow_id, |workflow| {
            workflow.status = WorkflowStatus::Queued;
        })
        .await;

        if workflow.stages.is_empty() {
            // Nothing to drive: a zero-stage workflow completes vacuously.
            self.mutate_workflow(workflow_id, |workflow| {
                workflow.status = WorkflowStatus::Succeeded;
            })
            .await;
        }

        for stage in workflow.stages.iter().copied() {
            debug!(workflow_id = %workflow_id, stage = %stage, "stage starting");
            let started = self
                .mutate_workflow(workflow_id, |workflow| {
                    if let Some(result) = workflow.stage_results.get_mut(stage.key()) {
                        result.start(now_utc());
                    }
                    workflow.recompute_status();
                })
                .await;
            if started.is_none() {
                return;
            }

            let outcome = match self
                .executor
                .trigger(workflow_id, stage, &workflow.git, &workflow.metadata)
                .await
            {
                Ok(executor_ref) => {
                    self.mutate_workflow(workflow_id, |workflow| {
                        if let Some(result) = workflow.stage_results.get_mut(stage.key()) {
                            result.executor_ref = Some(executor_ref.clone());
                        }
                    })
                    .await;
                    self.executor
                        .await_completion(workflow_id, stage, &executor_ref)
                        .await
                }
                Err(err) => Err(err),
            };

            match outcome {
                Ok(()) => {
                    self.mutate_workflow(workflow_id, |workflow| {
                        if let Some(result) = workflow.stage_results.get_mut(stage.key()) {
                            result.finish(StageStatus::Succeeded, now_utc());
                        }
                        workflow.recompute_status();
                    })
                    .await;
                    debug!(workflow_id = %workflow_id, stage = %stage, "stage succeeded");
                }
                Err(err) => {
                    warn!(workflow_id = %workflow_id, stage = %stage, "stage failed: {err}");
                    let updated = self
                        .mutate_workflow(workflow_id, |workflow| {
                            if let Some(result) = workflow.stage_results.get_mut(stage.key()) {
                                result.error_message = Some(err.to_string());
                                result.finish(StageStatus::Failed, now_utc());
                            }
                            workflow.recompute_status();
                        })
                        .await;
                    if let Some(updated) = updated {
                        if updated.notification.as_ref().is_some_and(|n| n.on_failure) {
                            self.notify_detached(
                                updated.notification.clone(),
                                format!(
                                    "Workflow {} stage {} failed: {}",
                                    updated.id, stage, err
                                ),
                            );
                        }
                    }
                    // A single stage failure halts the pipeline.
                    break;
                }
            }
        }

        let Some(finished) = self.repo.get(workflow_id).await else {
            return;
        };
        if finished.notification.as_ref().is_some_and(|n| n.on_finish) {
            let ok = finished.status == WorkflowStatus::Succeeded;
            self.notify_detached(
                finished.notification.clone(),
                format!(
                    "Workflow {} finished with status={}. ok={}",
                    finished.id, finished.status, ok
                ),
            );
        }
    }

    /// Runs one serialized fetch-mutate-persist transaction on a workflow.
    ///
    /// Returns the persisted record, or `None` if the workflow is absent.
    async fn mutate_workflow<F>(&self, workflow_id: &str, apply: F) -> Option<Workflow>
    where
        F: FnOnce(&mut Workflow),
    {
        let lock = self.lock_for(workflow_id);
        let _guard = lock.lock().await;

        let mut workflow = self.repo.get(workflow_id).await?;
        apply(&mut workflow);
        workflow.updated_at = now_utc();
        Some(self.repo.update(workflow).await)
    }

    fn lock_for(&self, workflow_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(workflow_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Dispatches a notification without blocking the calling sequence.
    fn notify_detached(&self, config: Option<NotificationConfig>, message: String) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            notifier.notify(config.as_ref(), &message).await;
        });
    }
}
