use std::collections::BTreeMap;

use crate::models::task::{NewTask, TaskDraft};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Field-level problems with a task form, keyed by the camelCase field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: BTreeMap<&'static str, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

pub fn validate_task(input: &TaskDraft) -> ValidationReport {
    let mut errors = BTreeMap::new();

    match input.title.as_deref() {
        None => {
            errors.insert("title", String::from("Title is required"));
        }
        Some(title) if title.trim().is_empty() => {
            errors.insert("title", String::from("Title is required"));
        }
        Some(title) if title.chars().count() > TITLE_MAX_CHARS => {
            errors.insert(
                "title",
                format!("Title must be less than {TITLE_MAX_CHARS} characters"),
            );
        }
        Some(_) => {}
    }

    if is_blank(&input.assigned_user_id) {
        errors.insert("assignedUserId", String::from("Assigned user is required"));
    }
    if is_blank(&input.project_id) {
        errors.insert("projectId", String::from("Project is required"));
    }
    if input.status.is_none() {
        errors.insert("status", String::from("Status is required"));
    }
    if input.priority.is_none() {
        errors.insert("priority", String::from("Priority is required"));
    }

    if let Some(description) = &input.description
        && description.chars().count() > DESCRIPTION_MAX_CHARS
    {
        errors.insert(
            "description",
            format!("Description must be less than {DESCRIPTION_MAX_CHARS} characters"),
        );
    }

    ValidationReport { errors }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

impl TaskDraft {
    pub fn validate(&self) -> ValidationReport {
        validate_task(self)
    }

    /// Converts a draft that passes validation into creation input.
    pub fn into_new_task(self) -> Result<NewTask, ValidationReport> {
        let report = self.validate();
        if !report.is_valid() {
            return Err(report);
        }

        match (
            self.title,
            self.assigned_user_id,
            self.project_id,
            self.status,
            self.priority,
        ) {
            (Some(title), Some(assigned_user_id), Some(project_id), Some(status), Some(priority)) => {
                Ok(NewTask {
                    title,
                    description: self.description.unwrap_or_default(),
                    assigned_user_id,
                    project_id,
                    status,
                    priority,
                    due_date: self.due_date,
                })
            }
            _ => Err(report),
        }
    }
}
