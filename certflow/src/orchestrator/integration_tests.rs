//! End-to-end orchestration tests over the in-memory store.

#[cfg(test)]
mod tests {
    use crate::core::{
        CertStage, Domain, GitInfo, NotificationConfig, StageStatus, StageUpdateRequest,
        Workflow, WorkflowCreateRequest, WorkflowStatus,
    };
    use crate::notify::CollectingNotifier;
    use crate::orchestrator::Orchestrator;
    use crate::store::{InMemoryWorkflowStore, Page, WorkflowFilter};
    use crate::testing::fixtures::{create_request, init_tracing, sample_git};
    use crate::testing::mocks::{FailingExecutor, ManualExecutor, RecordingExecutor};
    use crate::exec::StageExecutor;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    fn build_orchestrator(
        executor: Arc<dyn StageExecutor>,
    ) -> (Orchestrator, Arc<CollectingNotifier>) {
        init_tracing();
        let notifier = Arc::new(CollectingNotifier::new());
        let orchestrator = Orchestrator::new(
            Arc::new(InMemoryWorkflowStore::new()),
            executor,
            notifier.clone(),
        );
        (orchestrator, notifier)
    }

    async fn wait_for_status(
        orchestrator: &Orchestrator,
        workflow_id: &str,
        status: WorkflowStatus,
    ) -> Workflow {
        for _ in 0..400 {
            if let Some(workflow) = orchestrator.get_workflow(workflow_id).await {
                if workflow.status == status {
                    return workflow;
                }
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("workflow {workflow_id} never reached {status}");
    }

    async fn wait_until_waiting(executor: &ManualExecutor, stage: CertStage) {
        for _ in 0..400 {
            if executor.waiting().contains(&stage) {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("executor never started waiting on {stage}");
    }

    #[tokio::test]
    async fn test_create_uses_core_defaults_all_pending() {
        let (orchestrator, _) = build_orchestrator(Arc::new(ManualExecutor::new()));

        let workflow = orchestrator
            .create_workflow(create_request(Domain::Core))
            .await
            .unwrap();

        assert_eq!(
            workflow.stages,
            vec![
                CertStage::CodeQuality,
                CertStage::Security,
                CertStage::Functional,
            ]
        );
        assert_eq!(workflow.status, WorkflowStatus::Created);
        assert!(workflow
            .stage_results
            .values()
            .all(|r| r.status == StageStatus::Pending));
    }

    #[tokio::test]
    async fn test_single_stage_runs_to_success() {
        let (orchestrator, _) = build_orchestrator(Arc::new(RecordingExecutor::new()));

        let request = create_request(Domain::Core).with_stages(vec![CertStage::CodeQuality]);
        let created = orchestrator.create_workflow(request).await.unwrap();

        let finished =
            wait_for_status(&orchestrator, &created.id, WorkflowStatus::Succeeded).await;

        let result = finished.stage_result(CertStage::CodeQuality).unwrap();
        assert_eq!(result.status, StageStatus::Succeeded);
        assert!(result.executor_ref.is_some());
        assert!(result.duration_ms.unwrap() >= 0);
        assert!(result.started_at.is_some());
        assert!(result.finished_at.is_some());
    }

    #[tokio::test]
    async fn test_executor_failure_halts_pipeline() {
        let (orchestrator, _) = build_orchestrator(Arc::new(FailingExecutor::new("boom")));

        let request = create_request(Domain::Core)
            .with_stages(vec![CertStage::CodeQuality, CertStage::Security]);
        let created = orchestrator.create_workflow(request).await.unwrap();

        let finished = wait_for_status(&orchestrator, &created.id, WorkflowStatus::Failed).await;

        let failed = finished.stage_result(CertStage::CodeQuality).unwrap();
        assert_eq!(failed.status, StageStatus::Failed);
        assert!(failed.error_message.as_ref().unwrap().contains("boom"));
        assert!(failed.finished_at.is_some());

        // The failure halts the pipeline; the second stage is never driven.
        let untouched = finished.stage_result(CertStage::Security).unwrap();
        assert_eq!(untouched.status, StageStatus::Pending);
        assert!(untouched.started_at.is_none());
        assert!(untouched.duration_ms.is_none());
    }

    #[tokio::test]
    async fn test_stage_result_keys_stay_fixed_through_run() {
        let (orchestrator, _) = build_orchestrator(Arc::new(RecordingExecutor::new()));

        let created = orchestrator
            .create_workflow(create_request(Domain::Banking))
            .await
            .unwrap();
        let finished =
            wait_for_status(&orchestrator, &created.id, WorkflowStatus::Succeeded).await;

        let mut keys: Vec<&str> = finished.stage_results.keys().map(String::as_str).collect();
        let mut planned: Vec<&str> = finished.stages.iter().map(|s| s.key()).collect();
        keys.sort_unstable();
        planned.sort_unstable();
        assert_eq!(keys, planned);
    }

    #[tokio::test]
    async fn test_external_update_survives_concurrent_advancement() {
        let executor = Arc::new(ManualExecutor::new());
        let (orchestrator, _) = build_orchestrator(executor.clone());

        let request = create_request(Domain::Core)
            .with_stages(vec![CertStage::CodeQuality, CertStage::Security]);
        let created = orchestrator.create_workflow(request).await.unwrap();

        // First stage is in flight; report its outcome through the callback
        // path while the advancement task is parked on completion.
        wait_until_waiting(&executor, CertStage::CodeQuality).await;

        let metrics: HashMap<String, f64> = [("score".to_string(), 0.95)].into();
        let update = StageUpdateRequest::new(CertStage::CodeQuality, StageStatus::Succeeded)
            .with_metrics(metrics.clone());
        let updated = orchestrator
            .update_stage(&created.id, update)
            .await
            .unwrap();
        assert_eq!(
            updated
                .stage_result(CertStage::CodeQuality)
                .unwrap()
                .metrics,
            Some(metrics.clone())
        );

        executor.release_one();
        wait_until_waiting(&executor, CertStage::Security).await;
        executor.release_one();

        let finished =
            wait_for_status(&orchestrator, &created.id, WorkflowStatus::Succeeded).await;

        // The callback's metrics were not clobbered by the advancement
        // sequence's own success write.
        let result = finished.stage_result(CertStage::CodeQuality).unwrap();
        assert_eq!(result.metrics, Some(metrics));
        assert_eq!(result.status, StageStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_external_update_is_idempotent() {
        let (orchestrator, _) = build_orchestrator(Arc::new(ManualExecutor::new()));

        let request = create_request(Domain::Core).with_stages(vec![CertStage::Security]);
        let created = orchestrator.create_workflow(request).await.unwrap();

        let metrics: HashMap<String, f64> = [("cpu".to_string(), 0.5)].into();
        let update = StageUpdateRequest::new(CertStage::Security, StageStatus::Running)
            .with_metrics(metrics.clone())
            .with_logs_url("https://logs.example/run/1");

        orchestrator
            .update_stage(&created.id, update.clone())
            .await
            .unwrap();
        let twice = orchestrator
            .update_stage(&created.id, update)
            .await
            .unwrap();

        let result = twice.stage_result(CertStage::Security).unwrap();
        assert_eq!(result.status, StageStatus::Running);
        assert_eq!(result.metrics, Some(metrics));
        assert_eq!(
            result.logs_url.as_deref(),
            Some("https://logs.example/run/1")
        );
    }

    #[tokio::test]
    async fn test_external_update_keeps_unset_fields() {
        let (orchestrator, _) = build_orchestrator(Arc::new(ManualExecutor::new()));

        let request = create_request(Domain::Core).with_stages(vec![CertStage::Functional]);
        let created = orchestrator.create_workflow(request).await.unwrap();

        let first = StageUpdateRequest::new(CertStage::Functional, StageStatus::Running)
            .with_logs_url("https://logs.example/run/2");
        orchestrator.update_stage(&created.id, first).await.unwrap();

        // A later update without a logs link must not clear the stored one.
        let second = StageUpdateRequest::new(CertStage::Functional, StageStatus::Succeeded);
        let updated = orchestrator
            .update_stage(&created.id, second)
            .await
            .unwrap();

        let result = updated.stage_result(CertStage::Functional).unwrap();
        assert_eq!(
            result.logs_url.as_deref(),
            Some("https://logs.example/run/2")
        );
        assert_eq!(result.status, StageStatus::Succeeded);
        assert!(result.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_external_update_unknown_workflow_is_none() {
        let (orchestrator, _) = build_orchestrator(Arc::new(ManualExecutor::new()));

        let update = StageUpdateRequest::new(CertStage::Security, StageStatus::Running);
        assert!(orchestrator.update_stage("missing", update).await.is_none());
    }

    #[tokio::test]
    async fn test_callbacks_accepted_after_overall_failure() {
        let (orchestrator, _) = build_orchestrator(Arc::new(FailingExecutor::new("boom")));

        let request = create_request(Domain::Core)
            .with_stages(vec![CertStage::CodeQuality, CertStage::Security]);
        let created = orchestrator.create_workflow(request).await.unwrap();
        wait_for_status(&orchestrator, &created.id, WorkflowStatus::Failed).await;

        let update = StageUpdateRequest::new(CertStage::Security, StageStatus::Succeeded);
        let updated = orchestrator
            .update_stage(&created.id, update)
            .await
            .unwrap();

        assert_eq!(
            updated.stage_result(CertStage::Security).unwrap().status,
            StageStatus::Succeeded
        );
        // One failed stage keeps the overall status failed.
        assert_eq!(updated.status, WorkflowStatus::Failed);
    }

    #[tokio::test]
    async fn test_zero_stage_workflow_succeeds_vacuously() {
        let executor = Arc::new(RecordingExecutor::new());
        let (orchestrator, _) = build_orchestrator(executor.clone());

        let request = create_request(Domain::Core).with_stages(vec![]);
        let created = orchestrator.create_workflow(request).await.unwrap();

        let finished =
            wait_for_status(&orchestrator, &created.id, WorkflowStatus::Succeeded).await;
        assert!(finished.stage_results.is_empty());
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_notifications_on_start_and_finish() {
        let (orchestrator, notifier) = build_orchestrator(Arc::new(RecordingExecutor::new()));

        let request = create_request(Domain::Core)
            .with_stages(vec![CertStage::CodeQuality])
            .with_notification(NotificationConfig::default().with_on_start(true));
        let created = orchestrator.create_workflow(request).await.unwrap();
        wait_for_status(&orchestrator, &created.id, WorkflowStatus::Succeeded).await;

        // Notifications are dispatched on detached tasks; give them a beat.
        for _ in 0..100 {
            if notifier.messages().len() >= 2 {
                break;
            }
            sleep(Duration::from_millis(5)).await;
        }

        let messages = notifier.messages();
        assert!(messages.iter().any(|m| m.contains("created for")));
        assert!(messages
            .iter()
            .any(|m| m.contains("finished with status=succeeded. ok=true")));
    }

    #[tokio::test]
    async fn test_failure_notification_carries_stage_and_error() {
        let (orchestrator, notifier) = build_orchestrator(Arc::new(FailingExecutor::new("boom")));

        let request = create_request(Domain::Core)
            .with_stages(vec![CertStage::Security])
            .with_notification(NotificationConfig::default());
        let created = orchestrator.create_workflow(request).await.unwrap();
        wait_for_status(&orchestrator, &created.id, WorkflowStatus::Failed).await;

        for _ in 0..100 {
            if notifier.messages().len() >= 2 {
                break;
            }
            sleep(Duration::from_millis(5)).await;
        }

        let messages = notifier.messages();
        assert!(messages
            .iter()
            .any(|m| m.contains("stage security failed") && m.contains("boom")));
        assert!(messages
            .iter()
            .any(|m| m.contains("finished with status=failed. ok=false")));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_git_fields() {
        let (orchestrator, _) = build_orchestrator(Arc::new(RecordingExecutor::new()));

        let request = WorkflowCreateRequest::new(GitInfo::new("", "main", "abc"), Domain::Core);
        assert!(orchestrator.create_workflow(request).await.is_err());
    }

    #[tokio::test]
    async fn test_listing_reflects_stored_workflows() {
        let (orchestrator, _) = build_orchestrator(Arc::new(RecordingExecutor::new()));

        let mut metadata = HashMap::new();
        metadata.insert("script_path".to_string(), "ci/run.sh".to_string());
        let request = WorkflowCreateRequest::new(sample_git(), Domain::Transport)
            .with_metadata(metadata);
        let created = orchestrator.create_workflow(request).await.unwrap();
        wait_for_status(&orchestrator, &created.id, WorkflowStatus::Succeeded).await;

        let by_author = orchestrator
            .list_workflows(
                &WorkflowFilter::new().with_author("ALICE"),
                Page::default(),
            )
            .await;
        assert_eq!(by_author.len(), 1);

        let by_script = orchestrator
            .list_workflows(
                &WorkflowFilter::new().with_script_path("ci/run.sh"),
                Page::default(),
            )
            .await;
        assert_eq!(by_script.len(), 1);

        let by_commit = orchestrator
            .list_workflows(
                &WorkflowFilter::new().with_commit("0000000"),
                Page::default(),
            )
            .await;
        assert!(by_commit.is_empty());
    }

    #[tokio::test]
    async fn test_stages_run_in_planning_order() {
        let executor = Arc::new(RecordingExecutor::new());
        let (orchestrator, _) = build_orchestrator(executor.clone());

        let created = orchestrator
            .create_workflow(create_request(Domain::Healthcare))
            .await
            .unwrap();
        wait_for_status(&orchestrator, &created.id, WorkflowStatus::Succeeded).await;

        let order: Vec<CertStage> = executor
            .triggered()
            .into_iter()
            .map(|(_, stage)| stage)
            .collect();
        assert_eq!(order, Domain::Healthcare.default_stages().to_vec());
    }
}
