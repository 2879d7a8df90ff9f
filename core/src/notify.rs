//! Caller-side convention for surfacing failed calls to a person.
//!
//! The client never recovers from errors itself. Front ends log the error
//! and show one blocking message built from the backend's `detail` field,
//! falling back to a generic text when there is none.

use crate::error::RequestError;

pub const UNKNOWN_ERROR: &str = "Unknown error";

/// `"Failed to <action>: <detail>"`, e.g. `"Failed to create Mission: SpyCat not found"`.
pub fn failure_message(action: &str, err: &RequestError) -> String {
    format!("Failed to {action}: {}", err.detail().unwrap_or(UNKNOWN_ERROR))
}

/// Log `err` and return the message to display for it.
pub fn report_failure(action: &str, err: &RequestError) -> String {
    tracing::error!(action, kind = ?err.kind(), status = ?err.status(), error = %err, "request failed");
    failure_message(action, err)
}
