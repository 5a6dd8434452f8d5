//! Overall status derivation from per-stage results.

use super::{StageResult, StageStatus, WorkflowStatus};
use std::collections::HashMap;

/// Derives the overall workflow status from its stage results.
///
/// Precedence, first match wins:
///
/// 1. any stage failed → `Failed`
/// 2. every stage succeeded and the map is non-empty → `Succeeded`
/// 3. any stage running → `Running`
/// 4. any stage past pending → `Partial`
/// 5. otherwise → `Created`
///
/// `Queued` and `Cancelled` are never derived here; they are explicit
/// orchestrator overrides set outside stage-by-stage derivation. Callers
/// must persist a freshly derived status after every stage mutation rather
/// than recomputing on read.
#[must_use]
pub fn derive_status(results: &HashMap<String, StageResult>) -> WorkflowStatus {
    let any_failed = results
        .values()
        .any(|r| r.status == StageStatus::Failed);
    let any_running = results
        .values()
        .any(|r| r.status == StageStatus::Running);
    let all_succeeded = results
        .values()
        .all(|r| r.status == StageStatus::Succeeded);
    let any_started = results.values().any(|r| {
        matches!(
            r.status,
            StageStatus::Running
                | StageStatus::Succeeded
                | StageStatus::Failed
                | StageStatus::Skipped
        )
    });

    if any_failed {
        return WorkflowStatus::Failed;
    }
    if all_succeeded && !results.is_empty() {
        return WorkflowStatus::Succeeded;
    }
    if any_running {
        return WorkflowStatus::Running;
    }
    if any_started {
        return WorkflowStatus::Partial;
    }
    WorkflowStatus::Created
}
