use thiserror::Error;

use crate::{
    models::task::{NewTask, Task, TaskUpdate},
    services::repository::Repository,
    storage::{KeyValueStore, StorageError, keys},
};

#[derive(Debug, Error)]
pub enum UpdateTaskError {
    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl<B: KeyValueStore> Repository<B> {
    /// Stores a new task. The input is expected to be validated already.
    pub async fn create_task(&self, input: NewTask) -> Result<Task, StorageError> {
        let mut tasks = self.tasks();
        let task = Task::from_input(Self::new_id(), input, jiff::Timestamp::now());

        tasks.push(task.clone());
        self.storage().write(keys::TASKS, &tasks)?;

        tracing::info!(task_id = %task.id, title = %task.title, "created task");
        Ok(task)
    }

    /// Merges the provided fields onto an existing task.
    pub async fn update_task(&self, update: TaskUpdate) -> Result<Task, UpdateTaskError> {
        let mut tasks = self.tasks();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == update.id)
            .ok_or_else(|| UpdateTaskError::TaskNotFound(update.id.clone()))?;

        task.apply(update, jiff::Timestamp::now());
        let updated_task = task.clone();

        self.storage().write(keys::TASKS, &tasks)?;

        tracing::info!(task_id = %updated_task.id, "updated task");
        Ok(updated_task)
    }

    /// Removes a task together with its subtasks and comments.
    ///
    /// Deleting an unknown id is not an error.
    pub async fn delete_task(&self, id: &str) -> Result<(), StorageError> {
        let mut tasks = self.tasks();
        let mut subtasks = self.subtasks();
        let mut comments = self.comments();

        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            tracing::debug!(task_id = id, "delete of unknown task");
        }

        // Cascade
        let subtasks_before = subtasks.len();
        subtasks.retain(|s| s.task_id != id);
        let comments_before = comments.len();
        comments.retain(|c| c.task_id != id);

        self.storage().write(keys::TASKS, &tasks)?;
        self.storage().write(keys::SUBTASKS, &subtasks)?;
        self.storage().write(keys::COMMENTS, &comments)?;

        tracing::info!(
            task_id = id,
            cascaded_subtasks = subtasks_before - subtasks.len(),
            cascaded_comments = comments_before - comments.len(),
            "deleted task"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::task::{TaskPriority, TaskStatus},
        services::{filter::TaskFilters, repository::tests::seeded_repository},
        storage::memory::MemoryStore,
    };

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: String::from("Some description"),
            assigned_user_id: String::from("user-2"),
            project_id: String::from("proj-1"),
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            due_date: Some(jiff::civil::date(2026, 3, 1)),
        }
    }

    #[tokio::test]
    async fn test_create_task() {
        let repository = seeded_repository().await;

        let task = repository.create_task(new_task("Ship release")).await.unwrap();
        let fetched = repository.get_task(&task.id).await.unwrap();

        assert_eq!(fetched.task, task);
        assert_eq!(fetched.task.created_at, fetched.task.updated_at);
        assert!(fetched.subtasks.is_empty());
        assert!(fetched.comments.is_empty());
        assert_eq!(fetched.assigned_user.unwrap().id, "user-2");

        let all = repository.list_tasks(&TaskFilters::default()).await;
        assert_eq!(all.len(), 6);
        assert_eq!(all.last().unwrap().task.id, task.id);
    }

    #[tokio::test]
    async fn test_created_ids_are_unique() {
        let repository = Repository::new(MemoryStore::new());

        let first = repository.create_task(new_task("a")).await.unwrap();
        let second = repository.create_task(new_task("b")).await.unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_create_task_next_to_malformed_record() {
        let repository = seeded_repository().await;
        let backend = repository.storage().backend();
        let raw = backend.get(keys::TASKS).unwrap().unwrap();
        let mut tasks: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        tasks[4]["status"] = serde_json::json!("blocked");
        backend
            .set(keys::TASKS, serde_json::to_string(&tasks).unwrap())
            .unwrap();

        repository.create_task(new_task("Still works")).await.unwrap();

        let stored: Vec<Task> = repository.storage().read(keys::TASKS, vec![]);
        assert_eq!(stored.len(), 5);
        assert_eq!(stored[4].title, "Still works");
    }

    #[tokio::test]
    async fn test_create_task_with_dangling_references() {
        let repository = seeded_repository().await;
        let input = NewTask {
            assigned_user_id: String::from("user-404"),
            project_id: String::from("proj-404"),
            ..new_task("Orphan")
        };

        let task = repository.create_task(input).await.unwrap();
        let fetched = repository.get_task(&task.id).await.unwrap();

        assert!(fetched.assigned_user.is_none());
        assert!(fetched.project.is_none());
    }

    #[tokio::test]
    async fn test_update_task_status() {
        let repository = seeded_repository().await;
        let task = repository.create_task(new_task("Ship release")).await.unwrap();

        let updated = repository
            .update_task(TaskUpdate {
                status: Some(TaskStatus::Done),
                ..TaskUpdate::new(task.id.clone())
            })
            .await
            .unwrap();

        let fetched = repository.get_task(&task.id).await.unwrap().task;
        assert_eq!(fetched, updated);
        assert_eq!(fetched.status, TaskStatus::Done);
        assert!(fetched.updated_at > fetched.created_at);
        assert_eq!(fetched.title, "Ship release");
        assert_eq!(fetched.priority, TaskPriority::High);
    }

    #[tokio::test]
    async fn test_update_seed_task_refreshes_stamp() {
        let repository = seeded_repository().await;
        let before = repository.get_task("task-2").await.unwrap().task;

        let updated = repository
            .update_task(TaskUpdate {
                title: Some(String::from("Implement OAuth")),
                ..TaskUpdate::new("task-2")
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "Implement OAuth");
        assert_eq!(updated.created_at, before.created_at);
        assert!(updated.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_task() {
        let repository = seeded_repository().await;

        let result = repository.update_task(TaskUpdate::new("task-404")).await;

        match result {
            Err(UpdateTaskError::TaskNotFound(id)) => assert_eq!(id, "task-404"),
            _ => panic!("Expected TaskNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_delete_task_cascades() {
        let repository = seeded_repository().await;
        repository.create_subtask("task-1", "Sketch").await.unwrap();
        repository.create_subtask("task-2", "Unrelated").await.unwrap();
        repository
            .create_comment("task-1", "user-1", "Looks good")
            .await
            .unwrap();

        repository.delete_task("task-1").await.unwrap();

        assert!(repository.get_task("task-1").await.is_none());
        assert!(repository.list_subtasks("task-1").await.is_empty());
        assert!(repository.list_comments("task-1").await.is_empty());
        assert_eq!(repository.list_subtasks("task-2").await.len(), 1);
        assert_eq!(repository.list_tasks(&TaskFilters::default()).await.len(), 4);
    }

    #[tokio::test]
    async fn test_delete_unknown_task_is_noop() {
        let repository = seeded_repository().await;

        repository.delete_task("task-404").await.unwrap();
        repository.delete_task("task-404").await.unwrap();

        assert_eq!(repository.list_tasks(&TaskFilters::default()).await.len(), 5);
    }

    #[tokio::test]
    async fn test_create_task_propagates_write_failure() {
        let repository = Repository::new(MemoryStore::with_quota(16));

        let result = repository.create_task(new_task("Too big")).await;

        assert!(matches!(result, Err(StorageError::QuotaExceeded { .. })));
        assert!(repository.list_tasks(&TaskFilters::default()).await.is_empty());
    }
}
