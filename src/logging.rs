//! Server logging.
//!
//! Stdout carries the MCP protocol, so log lines go to stderr and, when a log
//! file is configured, are appended there as well. Logging before [`init`]
//! writes to stderr only, with debug messages suppressed.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::panic;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Maximum log file size before rotation (1MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Optional log file handle.
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// Whether `log_debug` messages are emitted.
static DEBUG: AtomicBool = AtomicBool::new(false);

/// Initialize logging.
///
/// `log_file`, if given, is rotated when oversized and opened for append.
/// Calling this again replaces the previous configuration.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn init(log_file: Option<&Path>, debug: bool) -> std::io::Result<()> {
    set_debug(debug);

    let file = match log_file {
        Some(path) => Some(open_log_file(path)?),
        None => None,
    };

    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = file;
    }

    log_debug(&format!("Logging is DEBUG: {debug}"));
    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    if fs::metadata(path).is_ok_and(|m| m.len() > MAX_LOG_SIZE) {
        let _ = fs::rename(path, path.with_extension("log.old"));
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Turn debug logging on or off.
pub fn set_debug(enabled: bool) {
    DEBUG.store(enabled, Ordering::Relaxed);
}

/// Whether debug logging is on.
#[must_use]
pub fn debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

fn write_log(message: &str) {
    let line = format!("[{}] {message}", Utc::now().format("%Y-%m-%dT%H:%M:%SZ"));

    let _ = writeln!(std::io::stderr(), "{line}");

    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "{line}");
            let _ = file.flush();
        }
    }
}

/// Log a general event.
pub fn log_event(message: &str) {
    write_log(&format!("INFO: {message}"));
}

/// Log a diagnostic message, only when debug logging is on.
pub fn log_debug(message: &str) {
    if debug_enabled() {
        write_log(&format!("DEBUG: {message}"));
    }
}

/// Log a tool call start.
pub fn log_tool_start(tool_name: &str) {
    log_debug(&format!("TOOL_START: {tool_name}"));
}

/// Log a tool call completion with duration.
pub fn log_tool_end(tool_name: &str, duration_ms: u128, success: bool) {
    let status = if success { "OK" } else { "ERROR" };
    let message = format!("TOOL_END: {tool_name} ({duration_ms}ms) [{status}]");
    if success {
        log_debug(&message);
    } else {
        log_warning(&message);
    }
}

/// Log an error.
pub fn log_error(message: &str) {
    write_log(&format!("ERROR: {message}"));
}

/// Log a warning.
pub fn log_warning(message: &str) {
    write_log(&format!("WARN: {message}"));
}

#[allow(deprecated)] // PanicHookInfo requires Rust 1.81+
fn log_panic(info: &panic::PanicInfo<'_>) {
    let location = info.location().map_or_else(
        || "unknown".to_string(),
        |loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()),
    );

    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    write_log(&format!("PANIC at {location}: {payload}"));
}

/// Install a panic hook that logs panics before running the previous hook.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        log_panic(info);
        original_hook(info);
    }));
}

/// Log server shutdown.
pub fn log_shutdown(exit_code: Option<i32>) {
    match exit_code {
        Some(code) => write_log(&format!("SHUTDOWN: exit code {code}")),
        None => write_log("SHUTDOWN: normal"),
    }
}

/// A guard that logs tool call duration when dropped.
///
/// ```ignore
/// let mut guard = ToolCallGuard::new("list_tickets");
/// if result.is_err() {
///     guard.mark_error();
/// }
/// ```
pub struct ToolCallGuard {
    tool_name: String,
    start: Instant,
    success: bool,
}

impl ToolCallGuard {
    /// Create a new tool call guard and log the start.
    #[must_use]
    pub fn new(tool_name: &str) -> Self {
        log_tool_start(tool_name);
        Self { tool_name: tool_name.to_string(), start: Instant::now(), success: true }
    }

    /// Mark the tool call as failed.
    pub fn mark_error(&mut self) {
        self.success = false;
    }
}

impl Drop for ToolCallGuard {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_millis();
        log_tool_end(&self.tool_name, duration, self.success);
    }
}
