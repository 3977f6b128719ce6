//! Testing utilities and mock implementations.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit tests.

#![allow(dead_code)]

use crate::error::Result;
use crate::traits::{CommandOutput, CommandRunner};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug)]
struct Expectation {
    program: String,
    args: Vec<String>,
    output: CommandOutput,
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<Expectation>,
    stdin_seen: Vec<Option<String>>,
    call_index: usize,
}

/// A mock command runner for testing.
///
/// Records expected commands and their outputs, then verifies they were called
/// in order. The stdin passed to each call is kept for later inspection.
#[derive(Debug, Default)]
pub struct MockCommandRunner {
    state: Mutex<MockState>,
    available_programs: Vec<String>,
}

impl MockCommandRunner {
    /// Create a new mock command runner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expected command and its output.
    pub fn expect(&mut self, program: &str, args: &[&str], output: CommandOutput) {
        self.state_mut().expectations.push(Expectation {
            program: program.to_string(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
            output,
        });
    }

    /// Add a program as available.
    pub fn set_available(&mut self, program: &str) {
        self.available_programs.push(program.to_string());
    }

    /// Number of commands run so far.
    pub fn call_count(&self) -> usize {
        self.lock().call_index
    }

    /// The stdin passed to the `index`th call (0-based).
    ///
    /// # Panics
    ///
    /// Panics if fewer than `index + 1` calls were made.
    pub fn stdin_of(&self, index: usize) -> Option<String> {
        self.lock().stdin_seen[index].clone()
    }

    /// Verify all expected commands were called.
    ///
    /// # Panics
    ///
    /// Panics if not all expected commands were called.
    pub fn verify(&self) {
        let state = self.lock();
        let index = state.call_index;
        let expected = state.expectations.len();
        drop(state);
        assert_eq!(index, expected, "Expected {expected} command calls, but only {index} were made");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut MockState {
        self.state.get_mut().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        stdin: Option<&str>,
        _timeout: Option<Duration>,
    ) -> Result<CommandOutput> {
        let mut state = self.lock();
        let index = state.call_index;

        assert!(
            index < state.expectations.len(),
            "Unexpected command call: {program} {args:?} (no more expectations)"
        );

        let expectation = &state.expectations[index];
        let args_vec: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();

        assert!(
            program == expectation.program && args_vec == expectation.args,
            "Command mismatch at index {index}:\n  Expected: {} {:?}\n  Got: {program} {args:?}",
            expectation.program,
            expectation.args,
        );

        let output = expectation.output.clone();
        state.stdin_seen.push(stdin.map(str::to_string));
        state.call_index += 1;
        drop(state);
        Ok(output)
    }

    fn is_available(&self, program: &str) -> bool {
        self.available_programs.iter().any(|p| p == program)
    }
}

/// A command runner that always fails, for testing error paths.
#[derive(Debug)]
pub struct FailingCommandRunner {
    kind: std::io::ErrorKind,
    error_message: String,
}

impl FailingCommandRunner {
    /// Create a new failing command runner with the specified error message.
    #[must_use]
    pub fn new(error_message: impl Into<String>) -> Self {
        Self { kind: std::io::ErrorKind::Other, error_message: error_message.into() }
    }

    /// A runner whose every spawn fails as if the program does not exist.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            kind: std::io::ErrorKind::NotFound,
            error_message: "No such file or directory".to_string(),
        }
    }
}

impl CommandRunner for FailingCommandRunner {
    fn run(
        &self,
        _program: &str,
        _args: &[&str],
        _stdin: Option<&str>,
        _timeout: Option<Duration>,
    ) -> Result<CommandOutput> {
        Err(std::io::Error::new(self.kind, self.error_message.clone()).into())
    }

    fn is_available(&self, _program: &str) -> bool {
        false
    }
}
