//! Mapping from informal status names to Jira display names.
//!
//! Statuses are configurable per Jira project, so this only knows the common
//! ones; anything else is passed through exactly as given.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Lower-case status name to its usual Jira spelling.
static COMMON_STATUSES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("open", "Open"),
        ("in progress", "In Progress"),
        ("in review", "In Review"),
        ("done", "Done"),
        ("closed", "Closed"),
        ("canceled", "Canceled"),
        ("todo", "To Do"),
        ("to do", "To Do"),
        ("backlog", "Backlog"),
        ("blocked", "Blocked"),
        ("ready for review", "Ready for Review"),
        ("ready for qa", "Ready for QA"),
        ("in qa", "In QA"),
        ("deployed", "Deployed"),
    ])
});

/// Normalize a status to its Jira display name.
///
/// Matching is case-insensitive; unknown statuses are returned unchanged.
#[must_use]
pub fn normalize_status(status: &str) -> String {
    COMMON_STATUSES
        .get(status.to_lowercase().as_str())
        .map_or_else(|| status.to_string(), |s| (*s).to_string())
}
