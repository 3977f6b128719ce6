//! Jira ticket, sprint and operation result types.
//!
//! Status, priority and type are plain strings: each Jira project configures
//! its own vocabulary for them.

use serde::Serialize;

/// Summary information about a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ticket {
    /// Ticket key, e.g. `PROJ-123`.
    pub key: String,
    /// Summary line.
    pub summary: String,
    /// Current status, e.g. `In Progress`.
    pub status: String,
    /// Priority, e.g. `High`.
    pub priority: String,
    /// Issue type, e.g. `Bug`.
    pub issue_type: String,
    /// Assignee display name.
    pub assignee: Option<String>,
    /// Reporter display name.
    pub reporter: Option<String>,
    /// ISO-8601 creation time.
    pub created: Option<String>,
    /// ISO-8601 last update time.
    pub updated: Option<String>,
    /// Description as flat text.
    pub description: Option<String>,
}

/// A comment on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    /// Author display name.
    pub author: String,
    /// ISO-8601 creation time.
    pub created: String,
    /// Body as flat text.
    pub body: String,
}

/// A ticket together with its comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketDetail {
    /// The ticket fields.
    #[serde(flatten)]
    pub ticket: Ticket,
    /// Comments, oldest first as jira-cli returns them.
    pub comments: Vec<Comment>,
}

/// A sprint on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sprint {
    /// Sprint ID.
    pub id: u64,
    /// Sprint name.
    pub name: String,
    /// State, usually `active`, `future` or `closed`.
    pub state: String,
    /// Start date, if scheduled.
    pub start_date: Option<String>,
    /// End date, if scheduled.
    pub end_date: Option<String>,
    /// Sprint goal.
    pub goal: Option<String>,
}

/// Outcome of creating a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateTicketResult {
    /// Whether the operation went through.
    pub success: bool,
    /// Key of the new ticket.
    pub ticket_key: Option<String>,
    /// URL of the new ticket.
    pub ticket_url: Option<String>,
    /// Why creation failed.
    pub error: Option<String>,
}

/// Outcome of moving a ticket to another status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveTicketResult {
    /// Whether the operation went through.
    pub success: bool,
    /// The affected ticket.
    pub ticket_key: String,
    /// Status before the transition.
    pub previous_status: String,
    /// Status after the transition.
    pub new_status: String,
    /// Human-readable summary.
    pub message: String,
}

/// Outcome of actions that only report a key and a message: adding a
/// comment, updating a description, removing from a sprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketActionResult {
    /// Whether the operation went through.
    pub success: bool,
    /// The affected ticket.
    pub ticket_key: String,
    /// Human-readable summary.
    pub message: String,
}

/// Outcome of assigning a ticket to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignToMeResult {
    /// Whether the operation went through.
    pub success: bool,
    /// The affected ticket.
    pub ticket_key: String,
    /// Who the ticket was assigned to.
    pub assignee: String,
    /// Human-readable summary.
    pub message: String,
}

/// Outcome of adding a ticket to a sprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddToSprintResult {
    /// Whether the operation went through.
    pub success: bool,
    /// The affected ticket.
    pub ticket_key: String,
    /// The target sprint.
    pub sprint_id: u64,
    /// Human-readable summary.
    pub message: String,
}

/// Outcome of editing ticket fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditTicketResult {
    /// Whether the operation went through.
    pub success: bool,
    /// The affected ticket.
    pub ticket_key: String,
    /// Human-readable summary.
    pub message: String,
    /// Logical names of the fields that were changed.
    pub updated_fields: Vec<String>,
}
