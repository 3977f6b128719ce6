//! MCP server exposing Jira operations as tools.
//!
//! Each tool runs one operation through jira-cli and answers with text for
//! the model. Operational failures become tool error results rather than
//! protocol errors, so the model sees what went wrong.

// The rmcp `#[tool(aggr)]` macro requires ownership of input structs,
// making pass-by-value necessary for all tool handler functions.
#![allow(clippy::needless_pass_by_value)]

use crate::command::RealCommandRunner;
use crate::config::Config;
use crate::executor::{JiraCli, DEFAULT_TIMEOUT};
use crate::jira::tickets::{DEFAULT_COMMENTS, DEFAULT_LIMIT};
use crate::jira::{
    self, CreateTicketParams, EditTicketParams, ListSprintsParams, ListTicketsParams,
};
use crate::jql::TicketFilter;
use crate::logging::{self, ToolCallGuard};
use crate::templates;
use crate::traits::CommandRunner;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::tool;
use rmcp::Error as McpError;
use schemars::JsonSchema;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Instructions for the MCP server, shown to agents using this server.
const INSTRUCTIONS: &str = "Jira server backed by jira-cli. Use these tools to search, read, \
create, transition, comment on, assign and edit Jira tickets, and to manage sprint membership.

Ticket keys look like PROJ-123. Status names are matched case-insensitively against common \
workflow names (open, in progress, done...) and passed through unchanged otherwise.

`list_tickets` takes either raw JQL or simple filters; raw JQL wins when both are given.";

/// MCP server for Jira.
#[derive(Clone)]
pub struct JiraServer {
    runner: Arc<dyn CommandRunner>,
    cli_path: Arc<str>,
    timeout: Duration,
}

impl JiraServer {
    /// Create a server that runs the real jira-cli binary from `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_runner(Arc::new(RealCommandRunner::new()), config)
    }

    /// Create a server that runs jira-cli through `runner`.
    #[must_use]
    pub fn with_runner(runner: Arc<dyn CommandRunner>, config: &Config) -> Self {
        Self { runner, cli_path: Arc::from(config.cli_path.as_str()), timeout: DEFAULT_TIMEOUT }
    }

    /// Override the per-command timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the configured jira-cli binary can be found.
    #[must_use]
    pub fn cli_available(&self) -> bool {
        self.runner.is_available(&self.cli_path)
    }

    /// The error reported when the jira-cli binary is missing.
    #[must_use]
    pub fn missing_cli_error(&self) -> crate::error::Error {
        crate::error::Error::BinaryNotFound { path: self.cli_path.to_string() }
    }

    fn cli(&self) -> JiraCli<'_> {
        JiraCli::new(self.runner.as_ref(), &self.cli_path).with_timeout(self.timeout)
    }
}

/// Run one tool body, logging its duration and turning errors into tool
/// error results.
fn run_tool(
    tool_name: &str,
    doing: impl FnOnce() -> String,
    body: impl FnOnce() -> crate::error::Result<String>,
) -> Result<CallToolResult, McpError> {
    let mut guard = ToolCallGuard::new(tool_name);
    match body() {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(e) => {
            guard.mark_error();
            let message = format!("Error {}: {e}", doing());
            logging::log_error(&message);
            Ok(CallToolResult::error(vec![Content::text(message)]))
        }
    }
}

// Tool input schemas

const fn default_limit() -> usize {
    DEFAULT_LIMIT
}

const fn default_comments() -> usize {
    DEFAULT_COMMENTS
}

/// Input for listing tickets.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListTicketsInput {
    /// Raw JQL query (advanced users only). Overrides other filters if provided.
    pub jql: Option<String>,
    /// Maximum number of tickets to return (default 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Show only tickets assigned to me.
    pub assigned_to_me: Option<bool>,
    /// Show only unassigned tickets.
    pub unassigned: Option<bool>,
    /// Filter by status. Common values: Open, In Progress, Done, Closed.
    pub status: Option<String>,
    /// Filter by project key (e.g., 'PROJ').
    pub project: Option<String>,
    /// Show tickets created in the last 7 days.
    pub created_recently: Option<bool>,
    /// Show tickets updated in the last 7 days.
    pub updated_recently: Option<bool>,
    /// Sort tickets by field (created, updated, priority).
    pub order_by: Option<String>,
    /// Sort direction (asc, desc).
    pub order_direction: Option<String>,
}

impl From<ListTicketsInput> for ListTicketsParams {
    fn from(input: ListTicketsInput) -> Self {
        Self {
            filter: TicketFilter {
                jql: input.jql,
                assigned_to_me: input.assigned_to_me.unwrap_or(false),
                unassigned: input.unassigned.unwrap_or(false),
                status: input.status,
                project: input.project,
                created_recently: input.created_recently.unwrap_or(false),
                updated_recently: input.updated_recently.unwrap_or(false),
            },
            limit: input.limit,
            order_by: input.order_by,
            order_direction: input.order_direction,
        }
    }
}

/// Input for getting a ticket.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTicketInput {
    /// Jira ticket key (e.g., PROJ-123).
    pub ticket_key: String,
    /// Number of comments to include (default 5).
    #[serde(default = "default_comments")]
    pub comments: usize,
}

/// Input for creating a ticket.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateTicketInput {
    /// Jira project key (e.g., PROJ).
    pub project: String,
    /// Issue type (e.g., Bug, Story, Task).
    pub issue_type: String,
    /// Issue summary/title.
    pub summary: String,
    /// Issue description (markdown supported).
    pub description: Option<String>,
    /// Priority level (e.g., High, Medium, Low).
    pub priority: Option<String>,
    /// Assignee username or email.
    pub assignee: Option<String>,
    /// List of labels to add.
    pub labels: Option<Vec<String>>,
    /// List of components to add.
    pub components: Option<Vec<String>>,
}

impl From<CreateTicketInput> for CreateTicketParams {
    fn from(input: CreateTicketInput) -> Self {
        Self {
            project: input.project,
            issue_type: input.issue_type,
            summary: input.summary,
            description: input.description,
            priority: input.priority,
            assignee: input.assignee,
            labels: input.labels.unwrap_or_default(),
            components: input.components.unwrap_or_default(),
        }
    }
}

/// Input for moving a ticket.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct MoveTicketInput {
    /// Jira ticket key (e.g., PROJ-123).
    pub ticket_key: String,
    /// Target status (e.g., In Progress, Done).
    pub status: String,
}

/// Input for commenting on a ticket.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddCommentInput {
    /// Jira ticket key (e.g., PROJ-123).
    pub ticket_key: String,
    /// Comment text (markdown supported).
    pub comment: String,
}

/// Input for tools that only need a ticket key.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TicketKeyInput {
    /// Jira ticket key (e.g., PROJ-123).
    pub ticket_key: String,
}

/// Input for replacing a ticket's description.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateDescriptionInput {
    /// Jira ticket key (e.g., PROJ-123).
    pub ticket_key: String,
    /// New description (markdown supported).
    pub description: String,
}

/// Input for listing sprints.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListSprintsInput {
    /// Jira board ID.
    pub board_id: u64,
    /// Filter by state (active, future, closed).
    pub state: Option<String>,
    /// Maximum number of sprints to return (default 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Input for adding a ticket to a sprint.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddToSprintInput {
    /// Jira ticket key (e.g., PROJ-123).
    pub ticket_key: String,
    /// Sprint ID.
    pub sprint_id: u64,
}

/// Input for editing ticket fields.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EditTicketInput {
    /// Jira ticket key (e.g., PROJ-123).
    pub ticket_key: String,
    /// New summary/title for the ticket.
    pub summary: Option<String>,
    /// New priority level (e.g., High, Medium, Low).
    pub priority: Option<String>,
    /// New assignee username or email (use empty string to unassign).
    pub assignee: Option<String>,
    /// Labels to set on the ticket (replaces existing labels).
    pub labels: Option<Vec<String>>,
    /// Labels to add to the ticket.
    pub add_labels: Option<Vec<String>>,
    /// Labels to remove from the ticket.
    pub remove_labels: Option<Vec<String>>,
    /// Components to set on the ticket.
    pub components: Option<Vec<String>>,
    /// Fix versions to set on the ticket.
    pub fix_versions: Option<Vec<String>>,
    /// Parent issue key (for subtasks/child issues).
    pub parent: Option<String>,
    /// Custom fields to set (key-value pairs).
    pub custom_fields: Option<BTreeMap<String, String>>,
}

impl EditTicketInput {
    fn params(self) -> (String, EditTicketParams) {
        let params = EditTicketParams {
            summary: self.summary,
            priority: self.priority,
            assignee: self.assignee,
            labels: self.labels.unwrap_or_default(),
            add_labels: self.add_labels.unwrap_or_default(),
            remove_labels: self.remove_labels.unwrap_or_default(),
            components: self.components.unwrap_or_default(),
            fix_versions: self.fix_versions.unwrap_or_default(),
            parent: self.parent,
            custom_fields: self.custom_fields.unwrap_or_default(),
        };
        (self.ticket_key, params)
    }
}

#[tool(tool_box)]
impl JiraServer {
    /// Search and list tickets.
    #[tool(
        description = "List Jira tickets with optional filters. Supports JQL queries, semantic filters (assigned to me, unassigned, by status, by project), date filters (created/updated recently), and sorting options."
    )]
    fn list_tickets(
        &self,
        #[tool(aggr)] input: ListTicketsInput,
    ) -> Result<CallToolResult, McpError> {
        let params = ListTicketsParams::from(input);
        run_tool("list_tickets", || "listing tickets".to_string(), || {
            templates::ticket_list(&jira::list_tickets(&self.cli(), &params)?)
        })
    }

    /// Show one ticket in detail.
    #[tool(
        description = "Retrieve detailed information about a Jira ticket including summary, status, priority, type, assignee, reporter, dates, description, and comments."
    )]
    fn get_ticket(
        &self,
        #[tool(aggr)] input: GetTicketInput,
    ) -> Result<CallToolResult, McpError> {
        let key = input.ticket_key;
        run_tool("get_ticket", || format!("getting ticket {key}"), || {
            templates::ticket_detail(&jira::get_ticket(&self.cli(), &key, input.comments)?)
        })
    }

    /// Create a ticket.
    #[tool(
        description = "Create a new Jira ticket with project, type, summary, and optional description, priority, assignee, labels, and components."
    )]
    fn create_ticket(
        &self,
        #[tool(aggr)] input: CreateTicketInput,
    ) -> Result<CallToolResult, McpError> {
        let params = CreateTicketParams::from(input);
        run_tool("create_ticket", || "creating ticket".to_string(), || {
            templates::create_result(&jira::create_ticket(&self.cli(), &params)?)
        })
    }

    /// Transition a ticket.
    #[tool(description = "Move a Jira ticket to a different status (e.g., In Progress, Done).")]
    fn move_ticket(
        &self,
        #[tool(aggr)] input: MoveTicketInput,
    ) -> Result<CallToolResult, McpError> {
        let key = input.ticket_key;
        run_tool("move_ticket", || format!("moving ticket {key}"), || {
            Ok(jira::move_ticket(&self.cli(), &key, &input.status)?.message)
        })
    }

    /// Comment on a ticket.
    #[tool(description = "Add a comment to a Jira ticket.")]
    fn add_comment(
        &self,
        #[tool(aggr)] input: AddCommentInput,
    ) -> Result<CallToolResult, McpError> {
        let key = input.ticket_key;
        run_tool("add_comment", || format!("adding comment to {key}"), || {
            Ok(jira::add_comment(&self.cli(), &key, &input.comment)?.message)
        })
    }

    /// Assign a ticket to the current user.
    #[tool(description = "Assign a Jira ticket to yourself (the current jira-cli user).")]
    fn assign_to_me(
        &self,
        #[tool(aggr)] input: TicketKeyInput,
    ) -> Result<CallToolResult, McpError> {
        let key = input.ticket_key;
        run_tool("assign_to_me", || format!("assigning ticket {key}"), || {
            Ok(jira::assign_to_me(&self.cli(), &key)?.message)
        })
    }

    /// Open a ticket in the browser.
    #[tool(description = "Open a Jira ticket in the default web browser.")]
    fn open_ticket_in_browser(
        &self,
        #[tool(aggr)] input: TicketKeyInput,
    ) -> Result<CallToolResult, McpError> {
        let key = input.ticket_key;
        run_tool("open_ticket_in_browser", || format!("opening ticket {key} in browser"), || {
            jira::open_ticket_in_browser(&self.cli(), &key)
        })
    }

    /// Replace a ticket's description.
    #[tool(description = "Update the description of a Jira ticket.")]
    fn update_ticket_description(
        &self,
        #[tool(aggr)] input: UpdateDescriptionInput,
    ) -> Result<CallToolResult, McpError> {
        let key = input.ticket_key;
        run_tool("update_ticket_description", || format!("updating description for {key}"), || {
            Ok(jira::update_ticket_description(&self.cli(), &key, &input.description)?.message)
        })
    }

    /// List the sprints on a board.
    #[tool(description = "List sprints for a Jira board, optionally filtered by state.")]
    fn list_sprints(
        &self,
        #[tool(aggr)] input: ListSprintsInput,
    ) -> Result<CallToolResult, McpError> {
        let params =
            ListSprintsParams { board_id: input.board_id, state: input.state, limit: input.limit };
        run_tool("list_sprints", || "listing sprints".to_string(), || {
            templates::sprint_list(&jira::list_sprints(&self.cli(), &params)?)
        })
    }

    /// Add a ticket to a sprint.
    #[tool(description = "Add a Jira ticket to a sprint.")]
    fn add_to_sprint(
        &self,
        #[tool(aggr)] input: AddToSprintInput,
    ) -> Result<CallToolResult, McpError> {
        let key = input.ticket_key;
        run_tool("add_to_sprint", || format!("adding {key} to sprint"), || {
            Ok(jira::add_to_sprint(&self.cli(), &key, input.sprint_id)?.message)
        })
    }

    /// Remove a ticket from its sprint.
    #[tool(description = "Remove a Jira ticket from its current sprint (moves it to the backlog).")]
    fn remove_from_sprint(
        &self,
        #[tool(aggr)] input: TicketKeyInput,
    ) -> Result<CallToolResult, McpError> {
        let key = input.ticket_key;
        run_tool("remove_from_sprint", || format!("removing {key} from sprint"), || {
            Ok(jira::remove_from_sprint(&self.cli(), &key)?.message)
        })
    }

    /// Edit ticket fields.
    #[tool(
        description = "Edit fields on a Jira ticket: summary, priority, assignee, labels (set, add, remove), components, fix versions, parent and custom fields."
    )]
    fn edit_ticket(
        &self,
        #[tool(aggr)] input: EditTicketInput,
    ) -> Result<CallToolResult, McpError> {
        let (key, params) = input.params();
        run_tool("edit_ticket", || format!("editing ticket {key}"), || {
            Ok(jira::edit_ticket(&self.cli(), &key, &params)?.message)
        })
    }
}

#[rmcp::tool(tool_box)]
impl rmcp::ServerHandler for JiraServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "jira-mcp".to_string(),
                version: crate::VERSION.to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}
