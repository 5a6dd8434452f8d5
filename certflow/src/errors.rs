//! Error types for the certflow core.
//!
//! Only validation and executor errors exist as values; not-found outcomes
//! are modeled as `Option::None` throughout, and notification failures are
//! suppressed at the notifier seam.

use thiserror::Error;

/// The main error type for certflow operations.
#[derive(Debug, Error)]
pub enum CertflowError {
    /// A request failed validation at the boundary.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A stage executor call failed.
    #[error("{0}")]
    Executor(#[from] ExecutorError),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error raised when a boundary value fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Validation error for an unrecognized enum token.
    #[must_use]
    pub fn unknown_token(kind: &str, value: &str) -> Self {
        Self::new(format!("unknown {kind}: {value:?}"))
    }

    /// Validation error for a required field left empty.
    #[must_use]
    pub fn empty_field(field: &str) -> Self {
        Self::new(format!("{field} must not be empty"))
    }
}

/// Errors surfaced by a stage execution backend.
///
/// The orchestrator absorbs these into stage state; they are never thrown
/// back to the caller that created the workflow.
#[derive(Debug, Clone, Error)]
pub enum ExecutorError {
    /// The execution backend could not be reached.
    #[error("executor transport error: {0}")]
    Transport(String),

    /// The execution backend rejected or aborted the stage.
    #[error("stage execution failed: {0}")]
    Execution(String),
}
