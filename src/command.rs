//! Real command execution implementation.

use crate::error::{Error, Result};
use crate::traits::{CommandOutput, CommandRunner};
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// ETXTBSY error code (errno 26 on Linux).
/// This error occurs when trying to execute a file that is currently being written.
const ETXTBSY: i32 = 26;

/// How often a running child is polled while waiting under a timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Spawn a command with retry logic for ETXTBSY errors.
///
/// ETXTBSY ("Text file busy") can occur on overlay filesystems (like Docker)
/// when executing a script that was just created. The file may still be held
/// open by the filesystem layer. A brief retry usually succeeds.
fn spawn_with_etxtbsy_retry<F>(mut spawn_fn: F) -> std::io::Result<Child>
where
    F: FnMut() -> std::io::Result<Child>,
{
    loop {
        match spawn_fn() {
            Ok(child) => return Ok(child),
            Err(e) if e.raw_os_error() == Some(ETXTBSY) => {
                std::thread::sleep(Duration::from_millis(1));
            }
            Err(e) => return Err(e),
        }
    }
}

/// Drain a child pipe on its own thread so a full pipe never blocks the child.
fn spawn_pipe_reader<R>(pipe: Option<R>) -> Option<JoinHandle<String>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Wait for the child to exit, killing it once `timeout` elapses.
///
/// Returns `None` if the child was killed.
fn wait_for_exit(child: &mut Child, timeout: Option<Duration>) -> Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return Ok(Some(child.wait()?));
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Render a program and its arguments for error messages and logs.
pub(crate) fn describe_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program).chain(args.iter().copied()).collect::<Vec<_>>().join(" ")
}

/// Real command runner that executes external programs.
#[derive(Debug, Default, Clone)]
pub struct RealCommandRunner;

impl RealCommandRunner {
    /// Create a new command runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CommandRunner for RealCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        stdin: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = spawn_with_etxtbsy_retry(|| command.spawn())?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            let input = input.to_owned();
            // Dropping the pipe at the end of the thread closes the child's stdin.
            thread::spawn(move || {
                let _ = pipe.write_all(input.as_bytes());
            });
        }

        let stdout = spawn_pipe_reader(child.stdout.take());
        let stderr = spawn_pipe_reader(child.stderr.take());

        match wait_for_exit(&mut child, timeout)? {
            Some(status) => Ok(CommandOutput {
                exit_code: status.code().unwrap_or(-1),
                stdout: join_reader(stdout),
                stderr: join_reader(stderr),
            }),
            // Readers are left detached: a grandchild may still hold the pipes open.
            None => Err(Error::CommandTimeout {
                command: describe_command(program, args),
                timeout_secs: timeout.map_or(0, |t| t.as_secs()),
            }),
        }
    }

    fn is_available(&self, program: &str) -> bool {
        Command::new("which")
            .arg(program)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_echo() {
        let runner = RealCommandRunner::new();
        let output = runner.run("echo", &["hello"], None, None).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn test_run_failing_command() {
        let runner = RealCommandRunner::new();
        let output = runner.run("false", &[], None, None).unwrap();
        assert!(!output.success());
        assert_ne!(output.exit_code, 0);
    }

    #[test]
    fn test_run_pipes_stdin() {
        let runner = RealCommandRunner::new();
        let output = runner.run("cat", &[], Some("line one\nline two"), None).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "line one\nline two");
    }

    #[test]
    fn test_run_captures_stderr() {
        let runner = RealCommandRunner::new();
        let output = runner.run("sh", &["-c", "echo oops >&2; exit 3"], None, None).unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[test]
    fn test_run_times_out() {
        let runner = RealCommandRunner::new();
        let start = Instant::now();
        let result = runner.run("sleep", &["5"], None, Some(Duration::from_millis(200)));
        assert!(matches!(result, Err(Error::CommandTimeout { .. })));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_run_within_timeout() {
        let runner = RealCommandRunner::new();
        let output = runner.run("echo", &["quick"], None, Some(Duration::from_secs(5))).unwrap();
        assert_eq!(output.stdout.trim(), "quick");
    }

    #[test]
    fn test_run_inherits_environment() {
        // PATH is always set for the test process; the child must see it too.
        let runner = RealCommandRunner::new();
        let output = runner.run("sh", &["-c", "echo \"$PATH\""], None, None).unwrap();
        assert_eq!(output.stdout.trim(), std::env::var("PATH").unwrap());
    }

    #[test]
    fn test_is_available() {
        let runner = RealCommandRunner::new();
        assert!(runner.is_available("echo"));
        assert!(!runner.is_available("definitely_not_a_real_command_12345"));
    }

    #[test]
    fn test_run_nonexistent_command() {
        let runner = RealCommandRunner::new();
        let result = runner.run("definitely_not_a_real_command_12345", &[], None, None);
        match result {
            Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_describe_command() {
        assert_eq!(describe_command("jira", &["issue", "list"]), "jira issue list");
        assert_eq!(describe_command("jira", &[]), "jira");
    }

    #[test]
    fn test_spawn_with_etxtbsy_retry_retries_on_etxtbsy() {
        let mut call_count = 0;
        let mut command = Command::new("true");
        command.stdout(Stdio::piped()).stderr(Stdio::piped());

        let result = spawn_with_etxtbsy_retry(|| {
            call_count += 1;
            if call_count < 3 {
                Err(std::io::Error::from_raw_os_error(ETXTBSY))
            } else {
                command.spawn()
            }
        });

        assert!(result.is_ok());
        assert_eq!(call_count, 3);
    }

    #[test]
    fn test_spawn_with_etxtbsy_retry_propagates_other_errors() {
        let mut call_count = 0;

        let result = spawn_with_etxtbsy_retry(|| {
            call_count += 1;
            Err(std::io::Error::from_raw_os_error(2))
        });

        assert!(result.is_err());
        assert_eq!(call_count, 1);
        assert_eq!(result.unwrap_err().raw_os_error(), Some(2));
    }
}
