//! Jira operations built on top of jira-cli.
//!
//! Each operation builds jira-cli arguments, runs them through a
//! [`JiraCli`](crate::executor::JiraCli) and maps the response into a typed
//! result. Failures of jira-cli itself are errors; expected negative outcomes
//! (creation rejected, nothing to edit) are results with `success == false`.

pub mod edit;
pub mod models;
pub mod rows;
pub mod sprints;
pub mod tickets;

use crate::error::{Error, Result};

pub use edit::{edit_ticket, EditTicketParams};
pub use models::{
    AddToSprintResult, AssignToMeResult, Comment, CreateTicketResult, EditTicketResult,
    MoveTicketResult, Sprint, Ticket, TicketActionResult, TicketDetail,
};
pub use sprints::{add_to_sprint, list_sprints, remove_from_sprint, ListSprintsParams};
pub use tickets::{
    add_comment, assign_to_me, create_ticket, get_ticket, list_tickets, move_ticket,
    open_ticket_in_browser, update_ticket_description, CreateTicketParams, ListTicketsParams,
};

/// Borrow owned arguments as the `&str` slice the executor takes.
fn as_args(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

/// Reject a ticket key that is blank or would be read as a flag.
fn check_ticket_key(ticket_key: &str) -> Result<()> {
    if ticket_key.trim().is_empty() {
        return Err(Error::InvalidInput("ticket key must not be empty".to_string()));
    }
    if ticket_key.starts_with('-') {
        return Err(Error::InvalidInput(format!("ticket key must not start with '-': {ticket_key}")));
    }
    Ok(())
}

/// Reject blank entries in a list-valued parameter.
fn check_items(field: &str, items: &[String]) -> Result<()> {
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(Error::InvalidInput(format!("{field} must not contain empty values")));
    }
    Ok(())
}
