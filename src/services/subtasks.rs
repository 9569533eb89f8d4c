use thiserror::Error;

use crate::{
    models::subtask::Subtask,
    services::repository::Repository,
    storage::{KeyValueStore, StorageError, keys},
};

#[derive(Debug, Error)]
pub enum ToggleSubtaskError {
    #[error("Subtask '{0}' not found")]
    SubtaskNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl<B: KeyValueStore> Repository<B> {
    /// Appends an open subtask. The parent task is not checked.
    pub async fn create_subtask(&self, task_id: &str, title: &str) -> Result<Subtask, StorageError> {
        let mut subtasks = self.subtasks();
        let subtask = Subtask {
            id: Self::new_id(),
            task_id: task_id.to_string(),
            title: title.to_string(),
            completed: false,
            created_at: jiff::Timestamp::now(),
        };

        subtasks.push(subtask.clone());
        self.storage().write(keys::SUBTASKS, &subtasks)?;

        tracing::info!(subtask_id = %subtask.id, task_id, "created subtask");
        Ok(subtask)
    }

    /// Flips the completion state of a subtask
    pub async fn toggle_subtask(&self, id: &str) -> Result<Subtask, ToggleSubtaskError> {
        let mut subtasks = self.subtasks();
        let subtask = subtasks
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ToggleSubtaskError::SubtaskNotFound(id.to_string()))?;

        subtask.completed = !subtask.completed;
        let toggled = subtask.clone();

        self.storage().write(keys::SUBTASKS, &subtasks)?;

        tracing::info!(subtask_id = id, completed = toggled.completed, "toggled subtask");
        Ok(toggled)
    }

    /// Removes a subtask; unknown ids are ignored
    pub async fn delete_subtask(&self, id: &str) -> Result<(), StorageError> {
        let mut subtasks = self.subtasks();
        subtasks.retain(|s| s.id != id);
        self.storage().write(keys::SUBTASKS, &subtasks)?;

        tracing::info!(subtask_id = id, "deleted subtask");
        Ok(())
    }

    /// Subtasks of one task, in insertion order
    pub async fn list_subtasks(&self, task_id: &str) -> Vec<Subtask> {
        self.subtasks()
            .into_iter()
            .filter(|s| s.task_id == task_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::repository::tests::seeded_repository, storage::memory::MemoryStore};

    #[tokio::test]
    async fn test_create_subtask() {
        let repository = seeded_repository().await;

        let subtask = repository.create_subtask("task-1", "Wireframes").await.unwrap();

        assert!(!subtask.completed);
        assert_eq!(subtask.task_id, "task-1");
        let joined = repository.get_task("task-1").await.unwrap();
        assert_eq!(joined.subtasks, vec![subtask]);
        assert_eq!(joined.subtask_progress(), (0, 1));
    }

    #[tokio::test]
    async fn test_create_subtask_for_unknown_task() {
        let repository = Repository::new(MemoryStore::new());

        let subtask = repository.create_subtask("task-404", "Orphan").await.unwrap();

        assert_eq!(repository.list_subtasks("task-404").await, vec![subtask]);
    }

    #[tokio::test]
    async fn test_toggle_subtask_twice() {
        let repository = seeded_repository().await;
        let subtask = repository.create_subtask("task-1", "Wireframes").await.unwrap();

        let toggled = repository.toggle_subtask(&subtask.id).await.unwrap();
        assert!(toggled.completed);
        assert!(repository.list_subtasks("task-1").await[0].completed);

        let toggled_back = repository.toggle_subtask(&subtask.id).await.unwrap();
        assert!(!toggled_back.completed);
        assert_eq!(toggled_back.created_at, subtask.created_at);
    }

    #[tokio::test]
    async fn test_toggle_unknown_subtask() {
        let repository = seeded_repository().await;

        let result = repository.toggle_subtask("sub-404").await;

        assert!(matches!(result, Err(ToggleSubtaskError::SubtaskNotFound(id)) if id == "sub-404"));
    }

    #[tokio::test]
    async fn test_delete_subtask() {
        let repository = seeded_repository().await;
        let keep = repository.create_subtask("task-1", "Keep").await.unwrap();
        let removed = repository.create_subtask("task-1", "Drop").await.unwrap();

        repository.delete_subtask(&removed.id).await.unwrap();
        repository.delete_subtask(&removed.id).await.unwrap();

        assert_eq!(repository.list_subtasks("task-1").await, vec![keep]);
    }
}
