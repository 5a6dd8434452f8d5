//! In-memory workflow store.

use super::{Page, WorkflowFilter, WorkflowRepository};
use crate::core::Workflow;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

/// Concurrency-safe in-memory store of workflow records.
///
/// Records live in a sharded map, so writers to different workflow ids never
/// block each other; a separate insertion-order index keeps `list` stable.
/// Swap in a database-backed repository for durable deployments.
#[derive(Debug, Default)]
pub struct InMemoryWorkflowStore {
    records: DashMap<String, Workflow>,
    order: Mutex<Vec<String>>,
}

impl InMemoryWorkflowStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored workflows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no workflows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn upsert(&self, workflow: Workflow) -> Workflow {
        let id = workflow.id.clone();
        if self.records.insert(id.clone(), workflow.clone()).is_none() {
            self.order.lock().push(id);
        }
        workflow
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowStore {
    async fn create(&self, workflow: Workflow) -> Workflow {
        self.upsert(workflow)
    }

    async fn get(&self, workflow_id: &str) -> Option<Workflow> {
        self.records.get(workflow_id).map(|entry| entry.clone())
    }

    async fn update(&self, workflow: Workflow) -> Workflow {
        self.upsert(workflow)
    }

    async fn list(&self, filter: &WorkflowFilter, page: Page) -> Vec<Workflow> {
        let ids = self.order.lock().clone();
        ids.iter()
            .filter_map(|id| self.records.get(id).map(|entry| entry.clone()))
            .filter(|workflow| filter.matches(workflow))
            .skip(page.offset())
            .take(page.limit())
            .collect()
    }
}
