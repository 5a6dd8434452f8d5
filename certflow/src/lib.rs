//! # Certflow
//!
//! Certification workflow orchestration core.
//!
//! Certflow drives multi-stage certification pipelines over a git commit:
//!
//! - **Domain model**: certification stages, target domains, statuses, and
//!   the workflow record itself
//! - **Status aggregation**: one overall workflow status derived from the
//!   per-stage results
//! - **Concurrent store**: a keyed workflow store safe for parallel mutators
//! - **Orchestration**: sequential stage advancement behind executor and
//!   notifier seams, plus an external callback path for out-of-band updates
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use certflow::prelude::*;
//!
//! let orchestrator = Orchestrator::new(
//!     Arc::new(InMemoryWorkflowStore::new()),
//!     Arc::new(SimulatedExecutor::default()),
//!     Arc::new(LoggingNotifier),
//! );
//!
//! let request = WorkflowCreateRequest::new(git, Domain::Banking);
//! let workflow = orchestrator.create_workflow(request).await?;
//! // Progress is observed by re-querying the store.
//! let current = orchestrator.get_workflow(&workflow.id).await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod core;
pub mod errors;
pub mod exec;
pub mod notify;
pub mod orchestrator;
pub mod store;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        derive_status, CertStage, Domain, GitInfo, NotificationConfig, StageResult, StageStatus,
        StageUpdateRequest, Workflow, WorkflowCreateRequest, WorkflowStatus,
    };
    pub use crate::errors::{CertflowError, ExecutorError, ValidationError};
    pub use crate::exec::{SimulatedExecutor, StageExecutor};
    pub use crate::notify::{CollectingNotifier, LoggingNotifier, NoOpNotifier, Notifier};
    pub use crate::orchestrator::Orchestrator;
    pub use crate::store::{InMemoryWorkflowStore, Page, WorkflowFilter, WorkflowRepository};
    pub use crate::utils::{generate_uuid, iso_timestamp, now_utc, Timestamp};
}
