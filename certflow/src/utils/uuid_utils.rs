//! Identifier generation.

use uuid::Uuid;

/// Generates a new UUID v4.
#[must_use]
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Generates a workflow identifier: the hyphenated form of a UUID v4.
#[must_use]
pub fn new_workflow_id() -> String {
    generate_uuid().to_string()
}
