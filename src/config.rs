//! Server configuration from the environment.
//!
//! jira-cli authenticates itself from the inherited environment; the server
//! only checks that the credentials it needs are present before starting.

use crate::error::{Error, Result};
use crate::executor::DEFAULT_CLI_PATH;
use std::path::PathBuf;

/// API token used by jira-cli.
pub const API_TOKEN_VAR: &str = "JIRA_API_TOKEN";

/// Authentication mode used by jira-cli (`basic`, `bearer`...).
pub const AUTH_TYPE_VAR: &str = "JIRA_AUTH_TYPE";

/// Overrides the location of the jira-cli binary.
pub const CLI_PATH_VAR: &str = "JIRA_CLI_PATH";

/// Path of an additional log file.
pub const LOG_FILE_VAR: &str = "JIRA_MCP_LOG_FILE";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Program run for every Jira operation.
    pub cli_path: String,
    /// Where to append log lines besides stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self { cli_path: DEFAULT_CLI_PATH.to_string(), log_file: None }
    }
}

impl Config {
    /// Load configuration from the process environment, after reading a
    /// `.env` file from the working directory if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the jira-cli credentials are missing.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is normal.
        let _ = dotenv::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the jira-cli credentials are missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> =
            [API_TOKEN_VAR, AUTH_TYPE_VAR].into_iter().filter(|name| get(name).is_none()).collect();
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "{} must be set: jira-cli needs {API_TOKEN_VAR} and {AUTH_TYPE_VAR} to authenticate",
                missing.join(" and ")
            )));
        }

        Ok(Self {
            cli_path: get(CLI_PATH_VAR).unwrap_or_else(|| DEFAULT_CLI_PATH.to_string()),
            log_file: get(LOG_FILE_VAR).map(PathBuf::from),
        })
    }
}
