//! Building JQL queries from high-level filters.

use crate::status::normalize_status;

/// Semantic filters for listing tickets.
///
/// A non-empty `jql` overrides everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    /// Raw JQL, used verbatim.
    pub jql: Option<String>,
    /// Only tickets assigned to the current user.
    pub assigned_to_me: bool,
    /// Only unassigned tickets. Ignored when `assigned_to_me` is set.
    pub unassigned: bool,
    /// Status name, normalized before use.
    pub status: Option<String>,
    /// Project key.
    pub project: Option<String>,
    /// Created in the last 7 days.
    pub created_recently: bool,
    /// Updated in the last 7 days.
    pub updated_recently: bool,
}

impl TicketFilter {
    /// Build the JQL for this filter.
    ///
    /// Returns `None` when no filter applies, meaning the query flag should
    /// be omitted entirely.
    #[must_use]
    pub fn to_jql(&self) -> Option<String> {
        if let Some(jql) = self.jql.as_deref().filter(|q| !q.is_empty()) {
            return Some(jql.to_string());
        }

        let mut conditions: Vec<String> = Vec::new();

        if self.assigned_to_me {
            conditions.push("assignee = currentUser()".to_string());
        } else if self.unassigned {
            conditions.push("assignee is EMPTY".to_string());
        }

        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            conditions.push(format!("status = \"{}\"", normalize_status(status)));
        }

        if let Some(project) = self.project.as_deref().filter(|p| !p.is_empty()) {
            conditions.push(format!("project = {project}"));
        }

        if self.created_recently {
            conditions.push("created >= -7d".to_string());
        }
        if self.updated_recently {
            conditions.push("updated >= -7d".to_string());
        }

        if conditions.is_empty() {
            None
        } else {
            Some(conditions.join(" AND "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_raw_jql_takes_precedence() {
        let filter = TicketFilter {
            jql: Some("project = TEST".to_string()),
            assigned_to_me: true,
            status: Some("open".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.to_jql().as_deref(), Some("project = TEST"));
    }

    #[test]
    fn test_empty_raw_jql_is_ignored() {
        let filter =
            TicketFilter { jql: Some(String::new()), unassigned: true, ..Default::default() };
        assert_eq!(filter.to_jql().as_deref(), Some("assignee is EMPTY"));
    }

    #[test]
    fn test_assigned_to_me() {
        let filter = TicketFilter { assigned_to_me: true, ..Default::default() };
        assert_eq!(filter.to_jql().as_deref(), Some("assignee = currentUser()"));
    }

    #[test]
    fn test_unassigned() {
        let filter = TicketFilter { unassigned: true, ..Default::default() };
        assert_eq!(filter.to_jql().as_deref(), Some("assignee is EMPTY"));
    }

    #[test]
    fn test_assigned_to_me_overrides_unassigned() {
        let filter = TicketFilter { assigned_to_me: true, unassigned: true, ..Default::default() };
        let jql = filter.to_jql().unwrap();
        assert!(jql.contains("currentUser()"));
        assert!(!jql.contains("EMPTY"));
    }

    #[test]
    fn test_status_is_normalized() {
        let filter = TicketFilter { status: Some("in progress".to_string()), ..Default::default() };
        assert_eq!(filter.to_jql().as_deref(), Some("status = \"In Progress\""));
    }

    #[test]
    fn test_custom_status() {
        let filter =
            TicketFilter { status: Some("Custom Status".to_string()), ..Default::default() };
        assert_eq!(filter.to_jql().as_deref(), Some("status = \"Custom Status\""));
    }

    #[test]
    fn test_project_is_unquoted() {
        let filter = TicketFilter { project: Some("TEST".to_string()), ..Default::default() };
        assert_eq!(filter.to_jql().as_deref(), Some("project = TEST"));
    }

    #[test]
    fn test_date_filters() {
        let created = TicketFilter { created_recently: true, ..Default::default() };
        assert_eq!(created.to_jql().as_deref(), Some("created >= -7d"));

        let updated = TicketFilter { updated_recently: true, ..Default::default() };
        assert_eq!(updated.to_jql().as_deref(), Some("updated >= -7d"));
    }

    #[test]
    fn test_combined_filters_in_fixed_order() {
        let filter = TicketFilter {
            assigned_to_me: true,
            status: Some("open".to_string()),
            project: Some("TEST".to_string()),
            created_recently: true,
            updated_recently: true,
            ..Default::default()
        };
        assert_eq!(
            filter.to_jql().as_deref(),
            Some(
                "assignee = currentUser() AND status = \"Open\" AND project = TEST \
                 AND created >= -7d AND updated >= -7d"
            )
        );
    }

    #[test]
    fn test_no_filters() {
        assert_eq!(TicketFilter::default().to_jql(), None);
    }

    proptest! {
        #[test]
        fn prop_raw_jql_is_verbatim(
            raw in "[a-zA-Z0-9 =\"()]{1,40}",
            assigned in any::<bool>(),
            unassigned in any::<bool>(),
            recent in any::<bool>(),
        ) {
            let filter = TicketFilter {
                jql: Some(raw.clone()),
                assigned_to_me: assigned,
                unassigned,
                created_recently: recent,
                ..Default::default()
            };
            prop_assert_eq!(filter.to_jql(), Some(raw));
        }

        #[test]
        fn prop_clause_count_matches_flags(
            assigned in any::<bool>(),
            unassigned in any::<bool>(),
            created in any::<bool>(),
            updated in any::<bool>(),
        ) {
            let filter = TicketFilter {
                assigned_to_me: assigned,
                unassigned,
                created_recently: created,
                updated_recently: updated,
                ..Default::default()
            };
            let expected = usize::from(assigned || unassigned)
                + usize::from(created)
                + usize::from(updated);
            let clauses = filter.to_jql().map_or(0, |q| q.split(" AND ").count());
            prop_assert_eq!(clauses, expected);
        }
    }
}
