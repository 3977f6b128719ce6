//! MCP server binary for Jira.
//!
//! Serves the Jira tools over stdio. Stdout belongs to the protocol; all
//! diagnostics go to stderr and the optional log file.

use clap::Parser;
use jira_mcp::mcp::JiraServer;
use jira_mcp::{logging, templates, Config};
use rmcp::ServiceExt;
use std::path::PathBuf;

/// Jira MCP Server: provides Jira tools for LLM clients via jira-cli.
#[derive(Debug, Parser)]
#[command(name = "jira-mcp", version, about)]
struct Args {
    /// Enable debug logging.
    #[arg(long)]
    debug: bool,

    /// Directory of `.tera` files overriding the built-in output layouts.
    #[arg(long, value_name = "DIR")]
    templates_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::log_error(&e.to_string());
            return Err(e.into());
        }
    };

    if let Err(e) = logging::init(config.log_file.as_deref(), args.debug) {
        logging::log_warning(&format!("log file init failed: {e}"));
    }
    logging::install_panic_hook();

    if let Some(dir) = args.templates_dir.as_deref() {
        templates::init_templates(Some(dir))?;
    }

    let server = JiraServer::new(&config);
    if !server.cli_available() {
        logging::log_warning(&server.missing_cli_error().to_string());
    }

    logging::log_event(&format!("Starting Jira MCP server v{}...", jira_mcp::VERSION));
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    logging::log_shutdown(None);
    Ok(())
}
