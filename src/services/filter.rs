use std::{fmt, str::FromStr};

use crate::models::task::{ParseTaskFieldError, Task, TaskStatus};

/// Sentinel accepted by the status and project filters to mean "any"
pub const ALL: &str = "all";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl FromStr for StatusFilter {
    type Err = ParseTaskFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str(ALL),
            StatusFilter::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

/// Conjunctive task predicates. The default value matches every task.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFilters {
    /// Case-insensitive substring of the title or the description
    pub search: Option<String>,
    pub status: StatusFilter,
    /// Exact project id; [`ALL`] matches any project
    pub project_id: Option<String>,
    /// Exact assignee id
    pub assigned_user_id: Option<String>,
}

impl TaskFilters {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(search) = non_empty(&self.search) {
            let needle = search.to_lowercase();
            if !task.title.to_lowercase().contains(&needle)
                && !task.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let StatusFilter::Only(status) = self.status
            && task.status != status
        {
            return false;
        }

        if let Some(project_id) = non_empty(&self.project_id)
            && project_id != ALL
            && task.project_id != project_id
        {
            return false;
        }

        if let Some(assigned_user_id) = non_empty(&self.assigned_user_id)
            && task.assigned_user_id != assigned_user_id
        {
            return false;
        }

        true
    }

    /// Keeps the matching tasks in input order
    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        tasks.into_iter().filter(|t| self.matches(t)).collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
