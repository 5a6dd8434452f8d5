//! Test support: fixtures and collaborator mocks.
//!
//! Available to downstream crates for exercising orchestration without a
//! real execution backend.

pub mod fixtures;
pub mod mocks;

pub use fixtures::{create_request, init_tracing, sample_git};
pub use mocks::{FailingExecutor, ManualExecutor, RecordingExecutor};
