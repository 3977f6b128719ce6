//! Invocation of the external `jira` command-line client.

use crate::command::describe_command;
use crate::error::{Error, Result};
use crate::logging;
use crate::traits::{CommandOutput, CommandRunner};
use std::time::Duration;

/// Program name used when `JIRA_CLI_PATH` is not set.
pub const DEFAULT_CLI_PATH: &str = "jira";

/// Hard limit on a single jira-cli invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Runs jira-cli through a [`CommandRunner`].
///
/// Holds no state beyond the program path and timeout; every call is a
/// fresh, self-contained subprocess.
#[derive(Clone, Copy)]
pub struct JiraCli<'a> {
    runner: &'a dyn CommandRunner,
    program: &'a str,
    timeout: Duration,
}

impl<'a> JiraCli<'a> {
    /// Create an executor for the jira-cli binary at `program`.
    #[must_use]
    pub const fn new(runner: &'a dyn CommandRunner, program: &'a str) -> Self {
        Self { runner, program, timeout: DEFAULT_TIMEOUT }
    }

    /// Override the per-call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured program path.
    #[must_use]
    pub const fn program(&self) -> &str {
        self.program
    }

    /// Run jira-cli with `args`, piping `stdin` if given.
    ///
    /// A non-zero exit is not an error here; callers inspect the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BinaryNotFound`] if the program cannot be located,
    /// [`Error::CommandTimeout`] if it runs past the timeout, or an I/O error
    /// if it cannot be spawned for another reason.
    pub fn execute(&self, args: &[&str], stdin: Option<&str>) -> Result<CommandOutput> {
        logging::log_debug(&format!("Running jira command: {}", describe_command(self.program, args)));

        let output =
            self.runner.run(self.program, args, stdin, Some(self.timeout)).map_err(|e| match e {
                Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                    Error::BinaryNotFound { path: self.program.to_string() }
                }
                other => other,
            })?;

        logging::log_debug(&format!("Command result: exit_code={}", output.exit_code));
        Ok(output)
    }

    /// Like [`execute`](Self::execute), but a non-zero exit becomes
    /// [`Error::Jira`] with `action` describing what was attempted.
    ///
    /// # Errors
    ///
    /// Everything [`execute`](Self::execute) returns, plus [`Error::Jira`].
    pub fn execute_checked(
        &self,
        args: &[&str],
        stdin: Option<&str>,
        action: impl FnOnce() -> String,
    ) -> Result<CommandOutput> {
        let output = self.execute(args, stdin)?;
        if output.success() {
            Ok(output)
        } else {
            Err(Error::Jira { action: action(), stderr: output.stderr })
        }
    }

    /// Run jira-cli and parse its stdout as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandFailed`] on a non-zero exit (carrying stderr)
    /// and [`Error::MalformedOutput`] if stdout is not valid JSON.
    pub fn execute_json(&self, args: &[&str]) -> Result<serde_json::Value> {
        let output = self.execute(args, None)?;

        if !output.success() {
            return Err(Error::CommandFailed {
                command: describe_command(self.program, args),
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        parse_json_output(&output.stdout)
    }
}

/// Parse jira-cli stdout as JSON, keeping the raw text on failure.
pub(crate) fn parse_json_output(stdout: &str) -> Result<serde_json::Value> {
    serde_json::from_str(stdout).map_err(|_| Error::MalformedOutput {
        context: "jira output as JSON".to_string(),
        output: stdout.to_string(),
    })
}
