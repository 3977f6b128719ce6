//! # `jira_mcp`
//!
//! Jira tools for language-model clients, backed by the `jira` command-line
//! client. The library turns high-level requests into jira-cli invocations and
//! jira-cli output (delimited rows, JSON, Atlassian rich-text documents) into
//! typed results and plain text.

pub mod adf;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod jira;
pub mod jql;
pub mod logging;
pub mod mcp;
pub mod status;
pub mod templates;
pub mod testing;
pub mod traits;

pub use command::RealCommandRunner;
pub use config::Config;
pub use error::{Error, Result};
pub use executor::JiraCli;
pub use traits::{CommandOutput, CommandRunner};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
