//! Presentation of operation results as text for the language-model client.
//!
//! Layouts are Tera templates embedded in the binary. A directory of
//! `.tera` files can be loaded over them with [`init_templates`].

use crate::error::{Error, Result};
use crate::jira::{CreateTicketResult, Sprint, Ticket, TicketDetail};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tera::{Context, Tera};

const TICKET_LIST: &str = "tickets/list.tera";
const TICKET_DETAIL: &str = "tickets/detail.tera";
const TICKET_CREATED: &str = "tickets/created.tera";
const SPRINT_LIST: &str = "sprints/list.tera";

static EMBEDDED_TEMPLATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(TICKET_LIST, include_str!("../templates/tickets/list.tera"));
    m.insert(TICKET_DETAIL, include_str!("../templates/tickets/detail.tera"));
    m.insert(TICKET_CREATED, include_str!("../templates/tickets/created.tera"));
    m.insert(SPRINT_LIST, include_str!("../templates/sprints/list.tera"));
    m
});

/// Global template engine with caching.
static TERA: Lazy<RwLock<Option<Tera>>> = Lazy::new(|| RwLock::new(None));

/// Initialize the template engine.
///
/// Templates found under `templates_dir` take precedence; any layout not
/// found there comes from the embedded defaults.
///
/// # Errors
///
/// Returns an error if the directory contains invalid templates.
pub fn init_templates(templates_dir: Option<&Path>) -> Result<()> {
    let mut tera = match templates_dir.filter(|d| d.exists()) {
        Some(dir) => {
            let glob_pattern = format!("{}/**/*.tera", dir.display());
            Tera::new(&glob_pattern).map_err(|e| {
                Error::Template(format!("Failed to load templates from {}: {e}", dir.display()))
            })?
        }
        None => Tera::default(),
    };

    for (name, content) in EMBEDDED_TEMPLATES.iter() {
        if tera.get_template(name).is_err() {
            tera.add_raw_template(name, content)
                .map_err(|e| Error::Template(format!("Invalid embedded template {name}: {e}")))?;
        }
    }

    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = Some(tera);

    Ok(())
}

/// Render a template, initializing the engine from embedded defaults on
/// first use.
///
/// # Errors
///
/// Returns an error if the template doesn't exist or rendering fails.
pub fn render(name: &str, context: &Context) -> Result<String> {
    let needs_init = TERA.read().map_err(|e| Error::Template(e.to_string()))?.is_none();

    if needs_init {
        init_templates(None)?;
    }

    let guard = TERA.read().map_err(|e| Error::Template(e.to_string()))?;
    let tera = guard.as_ref().ok_or_else(|| Error::Template("Templates not initialized".into()))?;
    let rendered = tera
        .render(name, context)
        .map_err(|e| Error::Template(format!("Failed to render template {name}: {e}")))?;
    drop(guard);

    Ok(rendered.trim_end().to_string())
}

/// Reset the template cache, forcing re-initialization on next use.
///
/// # Errors
///
/// Returns an error if the write lock cannot be acquired.
pub fn reset_cache() -> Result<()> {
    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = None;
    Ok(())
}

/// Format a ticket listing.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn ticket_list(tickets: &[Ticket]) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("tickets", tickets);
    render(TICKET_LIST, &ctx)
}

/// Format a ticket with its comments.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn ticket_detail(detail: &TicketDetail) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("ticket", &detail.ticket);
    ctx.insert("comments", &detail.comments);
    render(TICKET_DETAIL, &ctx)
}

/// Format the outcome of creating a ticket.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn create_result(result: &CreateTicketResult) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("result", result);
    render(TICKET_CREATED, &ctx)
}

/// Format a sprint listing.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn sprint_list(sprints: &[Sprint]) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("sprints", sprints);
    render(SPRINT_LIST, &ctx)
}

/// Get the list of all embedded template names.
#[must_use]
pub fn embedded_template_names() -> Vec<&'static str> {
    EMBEDDED_TEMPLATES.keys().copied().collect()
}

/// Verify all embedded templates render with sample data.
///
/// # Errors
///
/// Returns an error if any template fails to render.
pub fn verify_all_templates() -> Result<()> {
    reset_cache()?;
    init_templates(None)?;

    let sample = TicketDetail {
        ticket: Ticket {
            key: "PROJ-1".to_string(),
            summary: "Sample".to_string(),
            assignee: Some("Sample User".to_string()),
            ..Ticket::default()
        },
        comments: Vec::new(),
    };

    ticket_list(std::slice::from_ref(&sample.ticket))?;
    ticket_list(&[])?;
    ticket_detail(&sample)?;
    create_result(&CreateTicketResult::default())?;
    sprint_list(&[])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::Comment;
    use std::fs;
    use tempfile::TempDir;

    fn ticket(key: &str, assignee: Option<&str>) -> Ticket {
        Ticket {
            key: key.to_string(),
            summary: format!("Summary of {key}"),
            status: "Open".to_string(),
            priority: "High".to_string(),
            issue_type: "Bug".to_string(),
            assignee: assignee.map(str::to_string),
            ..Ticket::default()
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_ticket_list_empty() {
        reset_cache().unwrap();
        assert_eq!(ticket_list(&[]).unwrap(), "No tickets found.");
    }

    #[test]
    #[serial_test::serial]
    fn test_ticket_list() {
        reset_cache().unwrap();
        let text = ticket_list(&[ticket("TEST-1", Some("John Doe")), ticket("TEST-2", None)])
            .unwrap();
        assert_eq!(
            text,
            "TEST-1: Summary of TEST-1\n  Status: Open | Priority: High | Type: Bug | Assignee: John Doe\n\n\
             TEST-2: Summary of TEST-2\n  Status: Open | Priority: High | Type: Bug"
        );
    }

    #[test]
    #[serial_test::serial]
    fn test_ticket_detail_full() {
        reset_cache().unwrap();
        let detail = TicketDetail {
            ticket: Ticket {
                reporter: Some("Jane Smith".to_string()),
                created: Some("2024-01-10".to_string()),
                updated: Some("2024-01-15".to_string()),
                description: Some("Steps to reproduce".to_string()),
                ..ticket("TEST-123", Some("John Doe"))
            },
            comments: vec![
                Comment {
                    author: "John Doe".to_string(),
                    created: "2024-01-15".to_string(),
                    body: "First".to_string(),
                },
                Comment {
                    author: "Jane Smith".to_string(),
                    created: "2024-01-16".to_string(),
                    body: "Second".to_string(),
                },
            ],
        };
        let text = ticket_detail(&detail).unwrap();

        assert!(text.starts_with("**TEST-123: Summary of TEST-123**\n\n**Details:**\n"));
        assert!(text.contains("- Status: Open\n"));
        assert!(text.contains("- Type: Bug\n"));
        assert!(text.contains("- Assignee: John Doe\n"));
        assert!(text.contains("- Reporter: Jane Smith\n"));
        assert!(text.contains("- Created: 2024-01-10\n"));
        assert!(text.contains("**Description:**\nSteps to reproduce\n"));
        assert!(text.contains(
            "**Comments (2):**\n- **John Doe** (2024-01-15):\n  First\n\n- **Jane Smith** (2024-01-16):\n  Second"
        ));
    }

    #[test]
    #[serial_test::serial]
    fn test_ticket_detail_placeholders() {
        reset_cache().unwrap();
        let detail = TicketDetail { ticket: ticket("TEST-9", None), comments: Vec::new() };
        let text = ticket_detail(&detail).unwrap();

        assert!(text.contains("- Assignee: Unassigned\n"));
        assert!(text.contains("- Reporter: Unknown\n"));
        assert!(text.contains("No description provided"));
        assert!(text.ends_with("**Comments (0):**\nNo comments"));
    }

    #[test]
    #[serial_test::serial]
    fn test_create_result() {
        reset_cache().unwrap();
        let ok = CreateTicketResult {
            success: true,
            ticket_key: Some("TEST-456".to_string()),
            ticket_url: Some("https://jira.example.com/browse/TEST-456".to_string()),
            error: None,
        };
        assert_eq!(
            create_result(&ok).unwrap(),
            "Successfully created ticket TEST-456\nURL: https://jira.example.com/browse/TEST-456"
        );

        let failed = CreateTicketResult {
            error: Some("Project not found".to_string()),
            ..CreateTicketResult::default()
        };
        assert_eq!(create_result(&failed).unwrap(), "Failed to create ticket: Project not found");
    }

    #[test]
    #[serial_test::serial]
    fn test_sprint_list() {
        reset_cache().unwrap();
        assert_eq!(sprint_list(&[]).unwrap(), "No sprints found.");

        let sprints = vec![
            Sprint {
                id: 123,
                name: "Sprint 1".to_string(),
                state: "active".to_string(),
                start_date: Some("2024-01-01".to_string()),
                end_date: Some("2024-01-14".to_string()),
                goal: None,
            },
            Sprint {
                id: 456,
                name: "Sprint 2".to_string(),
                state: "future".to_string(),
                start_date: None,
                end_date: None,
                goal: None,
            },
        ];
        assert_eq!(
            sprint_list(&sprints).unwrap(),
            "Sprint 123: Sprint 1\n  State: active | Start: 2024-01-01 | End: 2024-01-14\n\n\
             Sprint 456: Sprint 2\n  State: future"
        );
    }

    #[test]
    #[serial_test::serial]
    fn test_text_is_not_html_escaped() {
        reset_cache().unwrap();
        let mut t = ticket("TEST-1", None);
        t.summary = "Use <T> & \"quotes\"".to_string();
        let text = ticket_list(&[t]).unwrap();
        assert!(text.contains("Use <T> & \"quotes\""));
    }

    #[test]
    #[serial_test::serial]
    fn test_filesystem_templates_override_embedded() {
        reset_cache().unwrap();

        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sprints")).unwrap();
        fs::write(dir.path().join("sprints/list.tera"), "CUSTOM: {{ sprints | length }}").unwrap();

        init_templates(Some(dir.path())).unwrap();

        assert_eq!(sprint_list(&[]).unwrap(), "CUSTOM: 0");
        assert_eq!(ticket_list(&[]).unwrap(), "No tickets found.");
        reset_cache().unwrap();
    }

    #[test]
    #[serial_test::serial]
    fn test_init_with_invalid_templates_fails() {
        reset_cache().unwrap();

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("invalid.tera"), "{% if foo %}unclosed if tag without endif")
            .unwrap();

        let err = init_templates(Some(dir.path())).unwrap_err().to_string();
        assert!(err.contains("Failed to load templates"), "Error was: {err}");
        reset_cache().unwrap();
    }

    #[test]
    #[serial_test::serial]
    fn test_render_missing_template_fails() {
        reset_cache().unwrap();
        assert!(render("nonexistent/template.tera", &Context::new()).is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_all_embedded_templates_render() {
        verify_all_templates().unwrap();
    }

    #[test]
    fn test_embedded_template_count() {
        assert_eq!(embedded_template_names().len(), 4);
    }
}
