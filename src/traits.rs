//! Core traits for testability and abstraction.

use crate::error::Result;
use std::time::Duration;

/// Output from a command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// The exit code of the command.
    pub exit_code: i32,
    /// The stdout output.
    pub stdout: String,
    /// The stderr output.
    pub stderr: String,
}

impl CommandOutput {
    /// Build a successful output with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { exit_code: 0, stdout: stdout.into(), stderr: String::new() }
    }

    /// Build a failed output (exit code 1) with the given stderr.
    #[must_use]
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self { exit_code: 1, stdout: String::new(), stderr: stderr.into() }
    }

    /// Check if the command succeeded (exit code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait for running external commands.
///
/// This trait abstracts command execution for testability.
pub trait CommandRunner: Send + Sync {
    /// Run a command with the given arguments, optional stdin and timeout.
    ///
    /// The child inherits the current process environment.
    ///
    /// # Arguments
    ///
    /// * `program` - The program to run.
    /// * `args` - The arguments to pass.
    /// * `stdin` - Text written to the child's stdin, if any.
    /// * `timeout` - Optional timeout duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or executed, or if
    /// it does not finish within `timeout`.
    fn run(
        &self,
        program: &str,
        args: &[&str],
        stdin: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput>;

    /// Check if a program is available in PATH.
    fn is_available(&self, program: &str) -> bool;
}
