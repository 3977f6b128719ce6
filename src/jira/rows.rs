//! Parsing of jira-cli `--plain --no-headers` listings.
//!
//! Each line is one record with tab-separated columns. Empty columns are
//! dropped, so optional trailing columns (assignee, sprint dates) are simply
//! missing when unset.

use super::models::{Sprint, Ticket};
use crate::error::{Error, Result};

/// Columns required before a line is read as a ticket.
const MIN_TICKET_COLUMNS: usize = 5;

/// Columns required before a line is read as a sprint.
const MIN_SPRINT_COLUMNS: usize = 3;

fn columns(line: &str) -> Vec<&str> {
    line.split('\t').map(str::trim).filter(|c| !c.is_empty()).collect()
}

fn records(stdout: &str) -> impl Iterator<Item = Vec<&str>> {
    stdout.lines().filter(|l| !l.trim().is_empty()).map(columns)
}

/// Parse `key,summary,status,priority,type,assignee` rows.
///
/// Lines with too few columns are skipped.
pub fn parse_ticket_rows(stdout: &str) -> Vec<Ticket> {
    records(stdout)
        .filter(|cols| cols.len() >= MIN_TICKET_COLUMNS)
        .map(|cols| Ticket {
            key: cols[0].to_string(),
            summary: cols[1].to_string(),
            status: cols[2].to_string(),
            priority: cols[3].to_string(),
            issue_type: cols[4].to_string(),
            assignee: cols.get(5).map(|s| (*s).to_string()),
            ..Ticket::default()
        })
        .collect()
}

/// Parse `id,name,state,startdate,enddate` rows.
///
/// # Errors
///
/// Returns [`Error::MalformedOutput`] if a sprint ID is not an integer.
pub fn parse_sprint_rows(stdout: &str) -> Result<Vec<Sprint>> {
    records(stdout)
        .filter(|cols| cols.len() >= MIN_SPRINT_COLUMNS)
        .map(|cols| -> Result<Sprint> {
            let id = cols[0].parse::<u64>().map_err(|_| Error::MalformedOutput {
                context: "sprint listing".to_string(),
                output: stdout.to_string(),
            })?;
            Ok(Sprint {
                id,
                name: cols[1].to_string(),
                state: cols[2].to_string(),
                start_date: cols.get(3).map(|s| (*s).to_string()),
                end_date: cols.get(4).map(|s| (*s).to_string()),
                goal: None,
            })
        })
        .collect()
}

/// The value in the last column of the first record, if any.
pub fn last_column_of_first_row(stdout: &str) -> Option<String> {
    records(stdout).next().and_then(|cols| cols.last().map(|s| (*s).to_string()))
}

/// Whether jira-cli's stderr says a ticket search matched nothing.
///
/// jira-cli exits non-zero for an empty result, so the only signal is its
/// wording.
pub fn is_no_tickets(stderr: &str) -> bool {
    stderr.contains("No result found")
}

/// Whether jira-cli's stderr says a sprint listing matched nothing.
pub fn is_no_sprints(stderr: &str) -> bool {
    is_no_tickets(stderr) || stderr.to_lowercase().contains("no sprints")
}
