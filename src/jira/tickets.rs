//! Ticket operations: search, view, create, transition, comment, assign.

use super::models::{
    AssignToMeResult, Comment, CreateTicketResult, MoveTicketResult, Ticket, TicketActionResult,
    TicketDetail,
};
use super::{as_args, check_items, check_ticket_key, rows};
use crate::adf::render_value;
use crate::error::{Error, Result};
use crate::executor::{parse_json_output, JiraCli};
use crate::jql::TicketFilter;
use crate::status::normalize_status;
use serde_json::Value;

/// Columns requested from `jira issue list`, in the order rows are parsed.
const LIST_COLUMNS: &str = "key,summary,status,priority,type,assignee";

/// Default page size for listings.
pub const DEFAULT_LIMIT: usize = 20;

/// Default number of comments fetched with a ticket.
pub const DEFAULT_COMMENTS: usize = 5;

/// Parameters for [`list_tickets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTicketsParams {
    /// Which tickets to return.
    pub filter: TicketFilter,
    /// Maximum number of tickets; 0 means jira-cli's default.
    pub limit: usize,
    /// Field to sort by (created, updated, priority...).
    pub order_by: Option<String>,
    /// `asc` or `desc`; only meaningful with `order_by`.
    pub order_direction: Option<String>,
}

impl Default for ListTicketsParams {
    fn default() -> Self {
        Self {
            filter: TicketFilter::default(),
            limit: DEFAULT_LIMIT,
            order_by: None,
            order_direction: None,
        }
    }
}

/// List tickets matching a filter.
///
/// An empty search is an empty list, not an error.
///
/// # Errors
///
/// Returns an error if jira-cli cannot be run or reports a failure.
pub fn list_tickets(cli: &JiraCli<'_>, params: &ListTicketsParams) -> Result<Vec<Ticket>> {
    let mut args: Vec<String> = ["issue", "list", "--no-headers", "--plain", "--columns", LIST_COLUMNS]
        .iter()
        .map(|s| (*s).to_string())
        .collect();

    if let Some(jql) = params.filter.to_jql() {
        args.extend(["--jql".to_string(), jql]);
    }

    if let Some(order_by) = params.order_by.as_deref().filter(|o| !o.is_empty()) {
        args.extend(["--order-by".to_string(), order_by.to_string()]);
        if params.order_direction.as_deref().is_some_and(|d| d.eq_ignore_ascii_case("asc")) {
            args.push("--reverse".to_string());
        }
    }

    if params.limit > 0 {
        args.extend(["--paginate".to_string(), format!("0:{}", params.limit)]);
    }

    let output = cli.execute(&as_args(&args), None)?;

    if !output.success() {
        if rows::is_no_tickets(&output.stderr) {
            return Ok(Vec::new());
        }
        return Err(Error::Jira { action: "list tickets".to_string(), stderr: output.stderr });
    }

    Ok(rows::parse_ticket_rows(&output.stdout))
}

fn str_at(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn nested_str(value: &Value, key: &str, field: &str) -> Option<String> {
    value.get(key).and_then(|v| str_at(v, field))
}

fn parse_comment(raw: &Value) -> Comment {
    Comment {
        author: nested_str(raw, "author", "displayName").unwrap_or_else(|| "Unknown".to_string()),
        created: str_at(raw, "created").unwrap_or_default(),
        body: raw.get("body").and_then(render_value).unwrap_or_default(),
    }
}

/// Map the `jira issue view --raw` JSON into a [`TicketDetail`].
fn parse_ticket_detail(raw: &Value) -> TicketDetail {
    let fields = raw.get("fields").unwrap_or(&Value::Null);

    let comments = fields
        .get("comment")
        .and_then(|c| c.get("comments"))
        .and_then(Value::as_array)
        .map(|list| list.iter().map(parse_comment).collect())
        .unwrap_or_default();

    TicketDetail {
        ticket: Ticket {
            key: str_at(raw, "key").unwrap_or_default(),
            summary: str_at(fields, "summary").unwrap_or_default(),
            status: nested_str(fields, "status", "name").unwrap_or_default(),
            priority: nested_str(fields, "priority", "name").unwrap_or_default(),
            issue_type: nested_str(fields, "issuetype", "name").unwrap_or_default(),
            assignee: nested_str(fields, "assignee", "displayName"),
            reporter: nested_str(fields, "reporter", "displayName"),
            created: str_at(fields, "created"),
            updated: str_at(fields, "updated"),
            description: fields
                .get("description")
                .and_then(render_value)
                .filter(|d| !d.is_empty()),
        },
        comments,
    }
}

/// Fetch one ticket with up to `comments` comments.
///
/// Rich-text description and comment bodies are rendered to flat text.
///
/// # Errors
///
/// Returns an error if jira-cli fails or its output is not JSON.
pub fn get_ticket(cli: &JiraCli<'_>, ticket_key: &str, comments: usize) -> Result<TicketDetail> {
    check_ticket_key(ticket_key)?;
    let count = comments.to_string();
    let mut args = vec!["issue", "view", ticket_key, "--raw"];
    if comments > 0 {
        args.extend(["--comments", count.as_str()]);
    }

    let raw = cli.execute_json(&args)?;
    Ok(parse_ticket_detail(&raw))
}

/// Parameters for [`create_ticket`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTicketParams {
    /// Project key.
    pub project: String,
    /// Issue type, e.g. `Bug`.
    pub issue_type: String,
    /// Summary line.
    pub summary: String,
    /// Body, piped to jira-cli as the template.
    pub description: Option<String>,
    /// Priority name.
    pub priority: Option<String>,
    /// Assignee username or email.
    pub assignee: Option<String>,
    /// Labels to add.
    pub labels: Vec<String>,
    /// Components to add.
    pub components: Vec<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// Create a ticket.
///
/// jira-cli rejecting the ticket, or answering with something other than
/// JSON, is reported as an unsuccessful result.
///
/// # Errors
///
/// Returns an error if jira-cli cannot be run at all.
pub fn create_ticket(cli: &JiraCli<'_>, params: &CreateTicketParams) -> Result<CreateTicketResult> {
    check_items("labels", &params.labels)?;
    check_items("components", &params.components)?;

    let mut args: Vec<String> = vec![
        "issue".into(),
        "create".into(),
        "--project".into(),
        params.project.clone(),
        "--type".into(),
        params.issue_type.clone(),
        "--summary".into(),
        params.summary.clone(),
        "--no-input".into(),
        "--raw".into(),
    ];

    if let Some(priority) = non_empty(params.priority.as_ref()) {
        args.extend(["--priority".into(), priority.to_string()]);
    }
    if let Some(assignee) = non_empty(params.assignee.as_ref()) {
        args.extend(["--assignee".into(), assignee.to_string()]);
    }
    for label in &params.labels {
        args.extend(["--label".into(), label.clone()]);
    }
    for component in &params.components {
        args.extend(["--component".into(), component.clone()]);
    }

    let description = non_empty(params.description.as_ref());
    if description.is_some() {
        args.extend(["--template".into(), "-".into()]);
    }

    let output = cli.execute(&as_args(&args), description)?;

    if !output.success() {
        let error = if output.stderr.trim().is_empty() {
            "Failed to create ticket".to_string()
        } else {
            output.stderr
        };
        return Ok(CreateTicketResult { success: false, error: Some(error), ..Default::default() });
    }

    let created = match parse_json_output(&output.stdout) {
        Ok(created) => created,
        Err(e) => {
            return Ok(CreateTicketResult {
                success: false,
                error: Some(e.to_string()),
                ..Default::default()
            })
        }
    };
    Ok(CreateTicketResult {
        success: true,
        ticket_key: Some(str_at(&created, "key").unwrap_or_default()),
        ticket_url: Some(str_at(&created, "self").unwrap_or_default()),
        error: None,
    })
}

/// Transition a ticket to `status`, normalized first.
///
/// The current status is looked up beforehand so the result can report it.
///
/// # Errors
///
/// Returns an error if either the lookup or the transition fails.
pub fn move_ticket(cli: &JiraCli<'_>, ticket_key: &str, status: &str) -> Result<MoveTicketResult> {
    check_ticket_key(ticket_key)?;
    let target_status = normalize_status(status);

    let key_query = format!("key = {ticket_key}");
    let lookup = cli.execute_checked(
        &["issue", "list", "--jql", &key_query, "--plain", "--no-headers", "--columns", "status"],
        None,
        || format!("get current status for {ticket_key}"),
    )?;
    let previous_status =
        rows::last_column_of_first_row(&lookup.stdout).unwrap_or_else(|| "Unknown".to_string());

    cli.execute_checked(&["issue", "move", ticket_key, &target_status], None, || {
        format!("move ticket {ticket_key}")
    })?;

    Ok(MoveTicketResult {
        success: true,
        ticket_key: ticket_key.to_string(),
        message: format!("Successfully moved {ticket_key} from {previous_status} to {target_status}"),
        previous_status,
        new_status: target_status,
    })
}

/// Add a comment; the text is piped on stdin so it may span lines.
///
/// # Errors
///
/// Returns an error if jira-cli fails.
pub fn add_comment(cli: &JiraCli<'_>, ticket_key: &str, comment: &str) -> Result<TicketActionResult> {
    check_ticket_key(ticket_key)?;
    cli.execute_checked(
        &["issue", "comment", "add", ticket_key, "--no-input"],
        Some(comment),
        || format!("add comment to {ticket_key}"),
    )?;

    Ok(TicketActionResult {
        success: true,
        ticket_key: ticket_key.to_string(),
        message: format!("Successfully added comment to {ticket_key}"),
    })
}

/// Assign a ticket to whoever jira-cli is logged in as.
///
/// # Errors
///
/// Returns [`Error::NoCurrentUser`] if `jira me` prints nothing, or an error
/// if either command fails.
pub fn assign_to_me(cli: &JiraCli<'_>, ticket_key: &str) -> Result<AssignToMeResult> {
    check_ticket_key(ticket_key)?;
    let me = cli.execute_checked(&["me"], None, || "get current user".to_string())?;
    let current_user = me.stdout.trim();
    if current_user.is_empty() {
        return Err(Error::NoCurrentUser);
    }

    cli.execute_checked(&["issue", "assign", ticket_key, current_user], None, || {
        format!("assign ticket {ticket_key}")
    })?;

    Ok(AssignToMeResult {
        success: true,
        ticket_key: ticket_key.to_string(),
        assignee: current_user.to_string(),
        message: format!("Successfully assigned {ticket_key} to {current_user}"),
    })
}

/// Open a ticket in the default browser.
///
/// # Errors
///
/// Returns an error if jira-cli fails.
pub fn open_ticket_in_browser(cli: &JiraCli<'_>, ticket_key: &str) -> Result<String> {
    check_ticket_key(ticket_key)?;
    cli.execute_checked(&["open", ticket_key], None, || {
        format!("open ticket {ticket_key} in browser")
    })?;
    Ok(format!("Successfully opened ticket {ticket_key} in browser"))
}

/// Replace a ticket's description with `description`, piped on stdin.
///
/// # Errors
///
/// Returns an error if jira-cli fails.
pub fn update_ticket_description(
    cli: &JiraCli<'_>,
    ticket_key: &str,
    description: &str,
) -> Result<TicketActionResult> {
    check_ticket_key(ticket_key)?;
    cli.execute_checked(&["issue", "edit", ticket_key, "--no-input"], Some(description), || {
        format!("update ticket {ticket_key}")
    })?;

    Ok(TicketActionResult {
        success: true,
        ticket_key: ticket_key.to_string(),
        message: format!("Successfully updated description for {ticket_key}"),
    })
}
