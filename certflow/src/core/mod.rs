//! Core domain model for certification workflows.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Certification stage and domain enums with the default stage table
//! - Stage and workflow status enums
//! - Per-stage results and the workflow aggregate
//! - The overall-status derivation function

mod aggregate;
mod result;
mod stage;
mod status;
mod workflow;

pub use aggregate::derive_status;
pub use result::StageResult;
pub use stage::{CertStage, Domain};
pub use status::{StageStatus, WorkflowStatus};
pub use workflow::{
    init_stage_results, GitInfo, NotificationConfig, StageUpdateRequest, Workflow,
    WorkflowCreateRequest,
};
