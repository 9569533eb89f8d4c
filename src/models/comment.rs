use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// An append-only note scoped to one task
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub task_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: Timestamp,
}
