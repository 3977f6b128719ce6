//! Error types for `jira_mcp`.

/// Errors that can occur while talking to jira-cli.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parameter was rejected before running jira-cli.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Required configuration is missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The jira-cli executable could not be found.
    #[error(
        "jira-cli not found at path: {path}. Please install jira-cli or set JIRA_CLI_PATH environment variable."
    )]
    BinaryNotFound {
        /// The configured executable path.
        path: String,
    },

    /// A command execution failed.
    #[error("Command '{command}' failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        /// The command that was run.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// The stderr output.
        stderr: String,
    },

    /// A jira-cli operation exited with a non-zero status.
    #[error("Failed to {action}: {stderr}")]
    Jira {
        /// What was being attempted, e.g. `list tickets`.
        action: String,
        /// The stderr output.
        stderr: String,
    },

    /// A command timed out.
    #[error("Command '{command}' timed out after {timeout_secs} seconds")]
    CommandTimeout {
        /// The command that was run.
        command: String,
        /// The timeout in seconds.
        timeout_secs: u64,
    },

    /// jira-cli succeeded but its output could not be parsed.
    #[error("Failed to parse {context}: {output}")]
    MalformedOutput {
        /// What was being parsed.
        context: String,
        /// The raw output, for diagnosis.
        output: String,
    },

    /// `jira me` returned nothing.
    #[error("Unable to determine current user")]
    NoCurrentUser,

    /// A template error occurred.
    #[error("Template error: {0}")]
    Template(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_not_found_names_path() {
        let err = Error::BinaryNotFound { path: "/opt/bin/jira".to_string() };
        let msg = err.to_string();
        assert!(msg.contains("/opt/bin/jira"));
        assert!(msg.contains("JIRA_CLI_PATH"));
    }

    #[test]
    fn test_jira_error_message() {
        let err = Error::Jira { action: "list tickets".to_string(), stderr: "boom".to_string() };
        assert_eq!(err.to_string(), "Failed to list tickets: boom");
    }

    #[test]
    fn test_invalid_input_message() {
        let err = Error::InvalidInput("ticket key must not be empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: ticket key must not be empty");
    }

    #[test]
    fn test_malformed_output_includes_raw() {
        let err = Error::MalformedOutput {
            context: "jira output as JSON".to_string(),
            output: "not json".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to parse jira output as JSON: not json");
    }
}
