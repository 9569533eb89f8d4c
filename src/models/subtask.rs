use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A checklist item scoped to one task
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: Timestamp,
}
