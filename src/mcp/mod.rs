//! MCP (Model Context Protocol) server exposing Jira to language-model clients.

#[cfg(feature = "mcp")]
pub mod jira_server;

#[cfg(feature = "mcp")]
pub use jira_server::JiraServer;
