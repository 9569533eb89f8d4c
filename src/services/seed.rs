use jiff::{Timestamp, civil::date};

use crate::{
    models::{
        comment::Comment,
        project::Project,
        subtask::Subtask,
        task::{Task, TaskPriority, TaskStatus},
        user::User,
    },
    storage::{KeyValueStore, Storage, StorageError, keys},
};

/// Identity used as "current user" on a fresh store
pub const CURRENT_USER_ID: &str = "user-1";

/// Populates the store with the demo dataset unless it was already done.
///
/// Returns `true` when seeding happened. The initialized flag is written last,
/// so an interrupted run is retried from scratch next time.
pub fn initialize_once<B: KeyValueStore>(storage: &Storage<B>) -> Result<bool, StorageError> {
    if storage.read(keys::INITIALIZED, false) {
        tracing::debug!("store already initialized");
        return Ok(false);
    }

    storage.write(keys::USERS, &seed_users())?;
    storage.write(keys::PROJECTS, &seed_projects())?;
    storage.write(keys::TASKS, &seed_tasks())?;
    storage.write::<[Subtask]>(keys::SUBTASKS, &[])?;
    storage.write::<[Comment]>(keys::COMMENTS, &[])?;
    storage.write(keys::CURRENT_USER, CURRENT_USER_ID)?;
    storage.write(keys::INITIALIZED, &true)?;

    tracing::info!("seeded store with demo data");
    Ok(true)
}

fn user(id: &str, name: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar: None,
    }
}

pub fn seed_users() -> Vec<User> {
    vec![
        user("user-1", "John Doe", "john@example.com"),
        user("user-2", "Jane Smith", "jane@example.com"),
        user("user-3", "Bob Wilson", "bob@example.com"),
        user("user-4", "Alice Brown", "alice@example.com"),
    ]
}

fn project(id: &str, name: &str, description: &str, color: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        color: color.to_string(),
    }
}

pub fn seed_projects() -> Vec<Project> {
    vec![
        project("proj-1", "Website Redesign", "Complete overhaul of company website", "#1e3a8a"),
        project("proj-2", "Mobile App", "iOS and Android app development", "#60a5fa"),
        project("proj-3", "API Integration", "Third-party API integrations", "#1e40af"),
        project("proj-4", "Dashboard", "Analytics dashboard project", "#3b82f6"),
    ]
}

pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            id: String::from("task-1"),
            title: String::from("Design homepage mockup"),
            description: String::from(
                "Create initial wireframes and high-fidelity mockups for the new homepage design.",
            ),
            assigned_user_id: String::from("user-1"),
            project_id: String::from("proj-1"),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: Some(date(2026, 2, 15)),
            // 2026-01-20T10:00:00Z
            created_at: Timestamp::constant(1_768_903_200, 0),
            // 2026-01-25T14:30:00Z
            updated_at: Timestamp::constant(1_769_351_400, 0),
        },
        Task {
            id: String::from("task-2"),
            title: String::from("Implement user authentication"),
            description: String::from(
                "Set up JWT-based authentication with login, register, and password reset flows.",
            ),
            assigned_user_id: String::from("user-2"),
            project_id: String::from("proj-2"),
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            due_date: Some(date(2026, 2, 10)),
            // 2026-01-22T09:00:00Z
            created_at: Timestamp::constant(1_769_072_400, 0),
            updated_at: Timestamp::constant(1_769_072_400, 0),
        },
        Task {
            id: String::from("task-3"),
            title: String::from("Write API documentation"),
            description: String::from(
                "Document all API endpoints with examples and response schemas.",
            ),
            assigned_user_id: String::from("user-1"),
            project_id: String::from("proj-3"),
            status: TaskStatus::Done,
            priority: TaskPriority::Medium,
            due_date: None,
            // 2026-01-15T11:00:00Z
            created_at: Timestamp::constant(1_768_474_800, 0),
            // 2026-01-28T16:00:00Z
            updated_at: Timestamp::constant(1_769_616_000, 0),
        },
        Task {
            id: String::from("task-4"),
            title: String::from("Setup CI/CD pipeline"),
            description: String::from("Configure automated testing and deployment workflows."),
            assigned_user_id: String::from("user-3"),
            project_id: String::from("proj-2"),
            status: TaskStatus::InProgress,
            priority: TaskPriority::Medium,
            due_date: Some(date(2026, 2, 5)),
            // 2026-01-18T08:00:00Z
            created_at: Timestamp::constant(1_768_723_200, 0),
            // 2026-01-26T10:00:00Z
            updated_at: Timestamp::constant(1_769_421_600, 0),
        },
        Task {
            id: String::from("task-5"),
            title: String::from("Create dashboard widgets"),
            description: String::from(
                "Build reusable chart and metric components for the analytics dashboard.",
            ),
            assigned_user_id: String::from("user-4"),
            project_id: String::from("proj-4"),
            status: TaskStatus::Todo,
            priority: TaskPriority::Low,
            due_date: None,
            // 2026-01-25T14:00:00Z
            created_at: Timestamp::constant(1_769_349_600, 0),
            updated_at: Timestamp::constant(1_769_349_600, 0),
        },
    ]
}
