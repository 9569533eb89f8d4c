use uuid::Uuid;

use crate::{
    models::{
        comment::Comment,
        project::Project,
        relations::{Relations, TaskWithRelations},
        subtask::Subtask,
        task::Task,
        user::User,
    },
    services::{filter::TaskFilters, seed},
    storage::{KeyValueStore, Storage, StorageError, keys},
};

/// Entity access over an injected key-value store.
///
/// Every operation reads the collections it needs, edits an in-memory copy and
/// writes whole collections back. Operations are `async` so that a remote
/// backend can replace the local store without touching callers.
pub struct Repository<B> {
    storage: Storage<B>,
}

/// Every collection as currently stored
pub(crate) struct Snapshot {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub subtasks: Vec<Subtask>,
    pub comments: Vec<Comment>,
}

impl Snapshot {
    pub fn relations(&self) -> Relations<'_> {
        Relations {
            users: &self.users,
            projects: &self.projects,
            subtasks: &self.subtasks,
            comments: &self.comments,
        }
    }
}

impl<B: KeyValueStore> Repository<B> {
    pub fn new(backend: B) -> Self {
        Self {
            storage: Storage::new(backend),
        }
    }

    pub fn storage(&self) -> &Storage<B> {
        &self.storage
    }

    /// See [`seed::initialize_once`]
    pub async fn initialize_once(&self) -> Result<bool, StorageError> {
        seed::initialize_once(&self.storage)
    }

    pub async fn list_tasks(&self, filters: &TaskFilters) -> Vec<TaskWithRelations> {
        let tasks = filters.apply(self.tasks());
        let snapshot = self.snapshot();
        let relations = snapshot.relations();

        tracing::debug!(count = tasks.len(), "listing tasks");
        tasks.into_iter().map(|task| relations.join(task)).collect()
    }

    /// Returns `None` when no task has this id
    pub async fn get_task(&self, id: &str) -> Option<TaskWithRelations> {
        let task = self.tasks().into_iter().find(|t| t.id == id)?;
        Some(self.snapshot().relations().join(task))
    }

    pub(crate) fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub(crate) fn tasks(&self) -> Vec<Task> {
        self.storage.read_records(keys::TASKS)
    }

    pub(crate) fn subtasks(&self) -> Vec<Subtask> {
        self.storage.read_records(keys::SUBTASKS)
    }

    pub(crate) fn comments(&self) -> Vec<Comment> {
        self.storage.read_records(keys::COMMENTS)
    }

    pub(crate) fn users(&self) -> Vec<User> {
        self.storage.read_records(keys::USERS)
    }

    pub(crate) fn projects(&self) -> Vec<Project> {
        self.storage.read_records(keys::PROJECTS)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users(),
            projects: self.projects(),
            subtasks: self.subtasks(),
            comments: self.comments(),
        }
    }
}
