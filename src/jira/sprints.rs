//! Sprint operations.

use super::models::{AddToSprintResult, Sprint, TicketActionResult};
use super::{as_args, check_ticket_key, rows};
use crate::error::{Error, Result};
use crate::executor::JiraCli;

const SPRINT_COLUMNS: &str = "id,name,state,startdate,enddate";

/// Parameters for [`list_sprints`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSprintsParams {
    /// Board to list sprints for.
    pub board_id: u64,
    /// Only sprints in this state (`active`, `future`, `closed`).
    pub state: Option<String>,
    /// Maximum number of sprints; 0 means jira-cli's default.
    pub limit: usize,
}

impl ListSprintsParams {
    /// Parameters listing up to 20 sprints of `board_id` in any state.
    #[must_use]
    pub const fn new(board_id: u64) -> Self {
        Self { board_id, state: None, limit: super::tickets::DEFAULT_LIMIT }
    }
}

/// List the sprints on a board.
///
/// # Errors
///
/// Returns an error if jira-cli fails for any reason other than the board
/// having no sprints, or if a row carries a non-numeric sprint ID.
pub fn list_sprints(cli: &JiraCli<'_>, params: &ListSprintsParams) -> Result<Vec<Sprint>> {
    let mut args: Vec<String> = vec![
        "sprint".into(),
        "list".into(),
        "--board".into(),
        params.board_id.to_string(),
        "--plain".into(),
        "--no-headers".into(),
        "--columns".into(),
        SPRINT_COLUMNS.into(),
    ];

    if let Some(state) = params.state.as_deref().filter(|s| !s.is_empty()) {
        args.extend(["--state".into(), state.to_string()]);
    }
    if params.limit > 0 {
        args.extend(["--paginate".into(), format!("0:{}", params.limit)]);
    }

    let output = cli.execute(&as_args(&args), None)?;

    if !output.success() {
        if rows::is_no_sprints(&output.stderr) {
            return Ok(Vec::new());
        }
        return Err(Error::Jira { action: "list sprints".to_string(), stderr: output.stderr });
    }

    rows::parse_sprint_rows(&output.stdout)
}

/// Add a ticket to a sprint.
///
/// # Errors
///
/// Returns an error if jira-cli fails.
pub fn add_to_sprint(
    cli: &JiraCli<'_>,
    ticket_key: &str,
    sprint_id: u64,
) -> Result<AddToSprintResult> {
    check_ticket_key(ticket_key)?;
    let sprint = sprint_id.to_string();
    cli.execute_checked(&["sprint", "add", &sprint, ticket_key], None, || {
        format!("add {ticket_key} to sprint {sprint_id}")
    })?;

    Ok(AddToSprintResult {
        success: true,
        ticket_key: ticket_key.to_string(),
        sprint_id,
        message: format!("Successfully added {ticket_key} to sprint {sprint_id}"),
    })
}

/// Take a ticket out of whatever sprint it is in by clearing its sprint
/// field.
///
/// # Errors
///
/// Returns an error if jira-cli fails.
pub fn remove_from_sprint(cli: &JiraCli<'_>, ticket_key: &str) -> Result<TicketActionResult> {
    check_ticket_key(ticket_key)?;
    cli.execute_checked(
        &["issue", "edit", ticket_key, "--custom", "sprint=", "--no-input"],
        None,
        || format!("remove {ticket_key} from sprint"),
    )?;

    Ok(TicketActionResult {
        success: true,
        ticket_key: ticket_key.to_string(),
        message: format!("Successfully removed {ticket_key} from its sprint"),
    })
}
