//! Editing arbitrary ticket fields in one `jira issue edit` call.

use super::{as_args, check_items, check_ticket_key};
use super::models::EditTicketResult;
use crate::error::Result;
use crate::executor::JiraCli;
use std::collections::BTreeMap;

/// Assignee value jira-cli treats as "unassign".
const UNASSIGN_SENTINEL: &str = "x";

/// Fields to change on a ticket. Unset and empty fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTicketParams {
    /// New summary.
    pub summary: Option<String>,
    /// New priority.
    pub priority: Option<String>,
    /// New assignee; an empty string unassigns.
    pub assignee: Option<String>,
    /// Labels to set, replacing the existing ones.
    pub labels: Vec<String>,
    /// Labels to add.
    pub add_labels: Vec<String>,
    /// Labels to remove.
    pub remove_labels: Vec<String>,
    /// Components to set.
    pub components: Vec<String>,
    /// Fix versions to set.
    pub fix_versions: Vec<String>,
    /// Parent issue key.
    pub parent: Option<String>,
    /// Custom field values by field name, applied in key order.
    pub custom_fields: BTreeMap<String, String>,
}

/// Accumulates flags and the logical names of the fields they touch.
#[derive(Default)]
struct EditPlan {
    args: Vec<String>,
    touched: Vec<String>,
}

impl EditPlan {
    fn single(&mut self, flag: &str, value: Option<&str>, field: &str) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.args.extend([flag.to_string(), value.to_string()]);
            self.touched.push(field.to_string());
        }
    }

    fn repeated(&mut self, flag: &str, prefix: &str, values: &[String], field: &str) {
        if values.is_empty() {
            return;
        }
        for value in values {
            self.args.extend([flag.to_string(), format!("{prefix}{value}")]);
        }
        self.touched.push(field.to_string());
    }
}

impl EditTicketParams {
    fn check(&self) -> Result<()> {
        check_items("labels", &self.labels)?;
        check_items("add_labels", &self.add_labels)?;
        check_items("remove_labels", &self.remove_labels)?;
        check_items("components", &self.components)?;
        check_items("fix_versions", &self.fix_versions)
    }

    fn plan(&self) -> EditPlan {
        let mut plan = EditPlan::default();

        plan.single("--summary", self.summary.as_deref(), "summary");
        plan.single("--priority", self.priority.as_deref(), "priority");

        if let Some(assignee) = self.assignee.as_deref() {
            let value = if assignee.is_empty() { UNASSIGN_SENTINEL } else { assignee };
            plan.args.extend(["--assignee".to_string(), value.to_string()]);
            plan.touched.push("assignee".to_string());
        }

        plan.repeated("--label", "", &self.labels, "labels");
        plan.repeated("--label", "+", &self.add_labels, "labels (added)");
        plan.repeated("--label", "-", &self.remove_labels, "labels (removed)");
        plan.repeated("--component", "", &self.components, "components");
        plan.repeated("--fix-version", "", &self.fix_versions, "fix_versions");
        plan.single("--parent", self.parent.as_deref(), "parent");

        for (key, value) in &self.custom_fields {
            plan.args.extend(["--custom".to_string(), format!("{key}={value}")]);
            plan.touched.push(format!("custom:{key}"));
        }

        plan
    }
}

/// Apply `params` to a ticket.
///
/// With nothing to change, jira-cli is not invoked and the result has
/// `success == false`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`](crate::error::Error::InvalidInput) for a
/// malformed key or a blank list entry, or an error if jira-cli fails.
pub fn edit_ticket(
    cli: &JiraCli<'_>,
    ticket_key: &str,
    params: &EditTicketParams,
) -> Result<EditTicketResult> {
    check_ticket_key(ticket_key)?;
    params.check()?;
    let plan = params.plan();

    if plan.touched.is_empty() {
        return Ok(EditTicketResult {
            success: false,
            ticket_key: ticket_key.to_string(),
            message: "No fields specified to update".to_string(),
            updated_fields: Vec::new(),
        });
    }

    let mut args: Vec<String> =
        vec!["issue".into(), "edit".into(), ticket_key.to_string(), "--no-input".into()];
    args.extend(plan.args);

    cli.execute_checked(&as_args(&args), None, || format!("edit ticket {ticket_key}"))?;

    Ok(EditTicketResult {
        success: true,
        ticket_key: ticket_key.to_string(),
        message: format!("Successfully updated {ticket_key}: {}", plan.touched.join(", ")),
        updated_fields: plan.touched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::{FailingCommandRunner, MockCommandRunner};
    use crate::traits::CommandOutput;
    use proptest::prelude::*;

    #[test]
    fn test_edit_with_no_fields_does_not_run_jira() {
        let runner = MockCommandRunner::new();
        let cli = JiraCli::new(&runner, "jira");

        let result = edit_ticket(&cli, "TEST-1", &EditTicketParams::default()).unwrap();

        assert!(!result.success);
        assert!(result.updated_fields.is_empty());
        assert_eq!(result.message, "No fields specified to update");
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_edit_empty_values_count_as_unset() {
        let runner = MockCommandRunner::new();
        let cli = JiraCli::new(&runner, "jira");
        let params = EditTicketParams {
            summary: Some(String::new()),
            parent: Some(String::new()),
            ..Default::default()
        };

        let result = edit_ticket(&cli, "TEST-1", &params).unwrap();
        assert!(!result.success);
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_edit_summary_and_priority() {
        let mut runner = MockCommandRunner::new();
        runner.expect(
            "jira",
            &["issue", "edit", "TEST-1", "--no-input", "--summary", "New", "--priority", "High"],
            CommandOutput::ok(""),
        );

        let cli = JiraCli::new(&runner, "jira");
        let params = EditTicketParams {
            summary: Some("New".to_string()),
            priority: Some("High".to_string()),
            ..Default::default()
        };
        let result = edit_ticket(&cli, "TEST-1", &params).unwrap();

        assert!(result.success);
        assert_eq!(result.updated_fields, ["summary", "priority"]);
        assert_eq!(result.message, "Successfully updated TEST-1: summary, priority");
        runner.verify();
    }

    #[test]
    fn test_edit_empty_assignee_unassigns() {
        let mut runner = MockCommandRunner::new();
        runner.expect(
            "jira",
            &["issue", "edit", "TEST-1", "--no-input", "--assignee", "x"],
            CommandOutput::ok(""),
        );

        let cli = JiraCli::new(&runner, "jira");
        let params = EditTicketParams { assignee: Some(String::new()), ..Default::default() };
        let result = edit_ticket(&cli, "TEST-1", &params).unwrap();

        assert_eq!(result.updated_fields, ["assignee"]);
    }

    #[test]
    fn test_edit_all_fields() {
        let mut runner = MockCommandRunner::new();
        runner.expect(
            "jira",
            &[
                "issue", "edit", "TEST-1", "--no-input",
                "--assignee", "dev@example.com",
                "--label", "a", "--label", "b",
                "--label", "+new",
                "--label", "-old",
                "--component", "api",
                "--fix-version", "1.2",
                "--parent", "TEST-0",
                "--custom", "severity=low",
                "--custom", "story-points=3",
            ],
            CommandOutput::ok(""),
        );

        let cli = JiraCli::new(&runner, "jira");
        let params = EditTicketParams {
            assignee: Some("dev@example.com".to_string()),
            labels: vec!["a".to_string(), "b".to_string()],
            add_labels: vec!["new".to_string()],
            remove_labels: vec!["old".to_string()],
            components: vec!["api".to_string()],
            fix_versions: vec!["1.2".to_string()],
            parent: Some("TEST-0".to_string()),
            custom_fields: BTreeMap::from([
                ("story-points".to_string(), "3".to_string()),
                ("severity".to_string(), "low".to_string()),
            ]),
            ..Default::default()
        };
        let result = edit_ticket(&cli, "TEST-1", &params).unwrap();

        assert_eq!(
            result.updated_fields,
            [
                "assignee",
                "labels",
                "labels (added)",
                "labels (removed)",
                "components",
                "fix_versions",
                "parent",
                "custom:severity",
                "custom:story-points",
            ]
        );
        runner.verify();
    }

    #[test]
    fn test_edit_failure() {
        let mut runner = MockCommandRunner::new();
        runner.expect(
            "jira",
            &["issue", "edit", "TEST-1", "--no-input", "--summary", "x"],
            CommandOutput::failed("field not editable"),
        );

        let cli = JiraCli::new(&runner, "jira");
        let params = EditTicketParams { summary: Some("x".to_string()), ..Default::default() };
        let err = edit_ticket(&cli, "TEST-1", &params).unwrap_err();
        assert_eq!(err.to_string(), "Failed to edit ticket TEST-1: field not editable");
    }

    #[test]
    fn test_edit_rejects_bad_key_and_blank_list_items() {
        let runner = MockCommandRunner::new();
        let cli = JiraCli::new(&runner, "jira");

        let err = edit_ticket(&cli, "-TEST-1", &EditTicketParams::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let params =
            EditTicketParams { remove_labels: vec![" ".to_string()], ..Default::default() };
        let err = edit_ticket(&cli, "TEST-1", &params).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: remove_labels must not contain empty values");
        assert_eq!(runner.call_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_touched_fields_match_flags(
            labels in proptest::collection::vec("[a-z]{1,8}", 0..4),
            add_labels in proptest::collection::vec("[a-z]{1,8}", 0..4),
            summary in proptest::option::of("[A-Za-z ]{1,20}"),
        ) {
            let params = EditTicketParams {
                summary: summary.clone(),
                labels: labels.clone(),
                add_labels: add_labels.clone(),
                ..Default::default()
            };
            let plan = params.plan();

            let expected = usize::from(summary.is_some())
                + usize::from(!labels.is_empty())
                + usize::from(!add_labels.is_empty());
            prop_assert_eq!(plan.touched.len(), expected);
            prop_assert_eq!(
                plan.args.len(),
                2 * (usize::from(summary.is_some()) + labels.len() + add_labels.len())
            );
        }

        #[test]
        fn prop_no_fields_never_invokes_runner(key in "[A-Z]{2,5}-[0-9]{1,4}") {
            let runner = FailingCommandRunner::new("must not run");
            let cli = JiraCli::new(&runner, "jira");
            let result = edit_ticket(&cli, &key, &EditTicketParams::default()).unwrap();
            prop_assert!(!result.success);
        }
    }
}
