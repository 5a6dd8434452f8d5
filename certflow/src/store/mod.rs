//! Workflow persistence: the repository trait and the in-memory store.

mod filter;
mod memory;

pub use filter::{Page, WorkflowFilter, DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT};
pub use memory::InMemoryWorkflowStore;

use crate::core::Workflow;
use async_trait::async_trait;

/// Keyed, concurrency-safe store of workflow records.
///
/// `get` and `list` return snapshots; absence and empty matches are normal
/// outcomes, never errors. `update` is a full-record replace, so callers own
/// read-modify-write consistency — the orchestrator serializes writers per
/// workflow id. Identifier collisions on `create` overwrite; the id
/// generator guarantees practical uniqueness.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Inserts a workflow under its identifier.
    async fn create(&self, workflow: Workflow) -> Workflow;

    /// Fetches a snapshot of a workflow by id.
    async fn get(&self, workflow_id: &str) -> Option<Workflow>;

    /// Replaces the record stored under the workflow's identifier.
    async fn update(&self, workflow: Workflow) -> Workflow;

    /// Lists stored workflows matching every supplied filter, in insertion
    /// order, windowed by `page`.
    async fn list(&self, filter: &WorkflowFilter, page: Page) -> Vec<Workflow>;
}
