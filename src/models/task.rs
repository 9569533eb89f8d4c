use std::{fmt, str::FromStr};

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier of the task
    pub id: String,
    /// Title of the task
    pub title: String,
    /// Free-form description, possibly empty
    pub description: String,
    /// The user this task is assigned to. Not guaranteed to exist
    pub assigned_user_id: String,
    /// The project this task belongs to. Not guaranteed to exist
    pub project_id: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Due date for this task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    /// When the task was created
    pub created_at: Timestamp,
    /// When the task was last changed. Never earlier than `created_at`
    pub updated_at: Timestamp,
}

impl Task {
    pub fn from_input(id: String, input: NewTask, now: Timestamp) -> Task {
        Task {
            id,
            title: input.title,
            description: input.description,
            assigned_user_id: input.assigned_user_id,
            project_id: input.project_id,
            status: input.status,
            priority: input.priority,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges the provided fields of `update` onto this task and refreshes `updated_at`.
    ///
    /// The new stamp is strictly later than the previous one, even if the clock
    /// reports the same instant twice.
    pub fn apply(&mut self, update: TaskUpdate, now: Timestamp) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(assigned_user_id) = update.assigned_user_id {
            self.assigned_user_id = assigned_user_id;
        }
        if let Some(project_id) = update.project_id {
            self.project_id = project_id;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }

        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at
                .checked_add(jiff::SignedDuration::from_nanos(1))
                .unwrap_or(self.updated_at)
        };
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Wire name, as stored in JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    /// Human-readable label, e.g. "In Progress"
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseTaskFieldError {
    #[error("Invalid status '{0}'. Expected one of: todo, in-progress, done")]
    Status(String),

    #[error("Invalid priority '{0}'. Expected one of: low, medium, high")]
    Priority(String),
}

impl FromStr for TaskStatus {
    type Err = ParseTaskFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| ParseTaskFieldError::Status(s.to_string()))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ParseTaskFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(ParseTaskFieldError::Priority(s.to_string())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a task. Expected to be validated by the caller.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assigned_user_id: String,
    pub project_id: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
}

/// Partial update of a task. `None` fields keep their previous value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_user_id: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// `Some(None)` clears the due date
    pub due_date: Option<Option<Date>>,
}

impl TaskUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Unchecked task form input, as typed by a user. See [`crate::services::validation`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_user_id: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Date>,
}
