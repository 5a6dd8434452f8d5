//! Timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used throughout workflow records.
pub type Timestamp = DateTime<Utc>;

/// Returns the current UTC timestamp.
#[must_use]
pub fn now_utc() -> Timestamp {
    Utc::now()
}

/// Returns the current UTC time as an ISO 8601 formatted string:
/// `YYYY-MM-DDTHH:MM:SS.ffffff+00:00`.
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}
