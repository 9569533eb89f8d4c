use serde::{Deserialize, Serialize};

use crate::models::{comment::Comment, project::Project, subtask::Subtask, task::Task, user::User};

/// A task together with the entities it references, resolved at read time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithRelations {
    #[serde(flatten)]
    pub task: Task,
    /// Absent when `assigned_user_id` does not match any user
    pub assigned_user: Option<User>,
    /// Absent when `project_id` does not match any project
    pub project: Option<Project>,
    /// Subtasks in insertion order
    pub subtasks: Vec<Subtask>,
    /// Comments in insertion order
    pub comments: Vec<Comment>,
}

impl TaskWithRelations {
    /// Comments ordered for display, most recent first
    pub fn comments_newest_first(&self) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> = self.comments.iter().collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments
    }

    /// Returns `(completed, total)` subtask counts
    pub fn subtask_progress(&self) -> (usize, usize) {
        let completed = self.subtasks.iter().filter(|s| s.completed).count();
        (completed, self.subtasks.len())
    }
}

/// Borrowed view over every collection a join needs.
#[derive(Clone, Copy)]
pub struct Relations<'a> {
    pub users: &'a [User],
    pub projects: &'a [Project],
    pub subtasks: &'a [Subtask],
    pub comments: &'a [Comment],
}

impl Relations<'_> {
    /// Attaches the assigned user, project, subtasks and comments to `task`.
    ///
    /// Dangling references produce `None` relations rather than errors.
    pub fn join(&self, task: Task) -> TaskWithRelations {
        let assigned_user = self
            .users
            .iter()
            .find(|u| u.id == task.assigned_user_id)
            .cloned();
        let project = self
            .projects
            .iter()
            .find(|p| p.id == task.project_id)
            .cloned();
        let subtasks = self
            .subtasks
            .iter()
            .filter(|s| s.task_id == task.id)
            .cloned()
            .collect();
        let comments = self
            .comments
            .iter()
            .filter(|c| c.task_id == task.id)
            .cloned()
            .collect();

        if assigned_user.is_none() || project.is_none() {
            tracing::debug!(task_id = %task.id, "task has a dangling user or project reference");
        }

        TaskWithRelations {
            task,
            assigned_user,
            project,
            subtasks,
            comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::task::NewTask;

    fn task(id: &str, user: &str, project: &str) -> Task {
        Task::from_input(
            id.to_string(),
            NewTask {
                title: format!("Task {id}"),
                assigned_user_id: user.to_string(),
                project_id: project.to_string(),
                ..NewTask::default()
            },
            Timestamp::UNIX_EPOCH,
        )
    }

    fn subtask(id: &str, task_id: &str, completed: bool) -> Subtask {
        Subtask {
            id: id.to_string(),
            task_id: task_id.to_string(),
            title: format!("Subtask {id}"),
            completed,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn comment(id: &str, task_id: &str, seconds: i64) -> Comment {
        Comment {
            id: id.to_string(),
            task_id: task_id.to_string(),
            user_id: String::from("user-1"),
            content: format!("Comment {id}"),
            created_at: Timestamp::from_second(seconds).unwrap(),
        }
    }

    #[test]
    fn test_join_resolves_relations() {
        let users = vec![
            User {
                id: String::from("user-1"),
                name: String::from("John Doe"),
                ..User::default()
            },
            User {
                id: String::from("user-1"),
                name: String::from("Shadowed duplicate"),
                ..User::default()
            },
        ];
        let projects = vec![Project {
            id: String::from("proj-1"),
            name: String::from("Website Redesign"),
            ..Project::default()
        }];
        let subtasks = vec![
            subtask("s-1", "task-1", false),
            subtask("s-2", "task-2", false),
            subtask("s-3", "task-1", true),
        ];
        let comments = vec![comment("c-1", "task-1", 10), comment("c-2", "task-1", 20)];
        let relations = Relations {
            users: &users,
            projects: &projects,
            subtasks: &subtasks,
            comments: &comments,
        };

        let joined = relations.join(task("task-1", "user-1", "proj-1"));

        assert_eq!(joined.assigned_user.unwrap().name, "John Doe");
        assert_eq!(joined.project.unwrap().name, "Website Redesign");
        let subtask_ids: Vec<_> = joined.subtasks.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(subtask_ids, vec!["s-1", "s-3"]);
        let comment_ids: Vec<_> = joined.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(comment_ids, vec!["c-1", "c-2"]);
    }

    #[test]
    fn test_join_leaves_dangling_references_empty() {
        let relations = Relations {
            users: &[],
            projects: &[],
            subtasks: &[],
            comments: &[],
        };

        let joined = relations.join(task("task-9", "user-404", "proj-404"));

        assert!(joined.assigned_user.is_none());
        assert!(joined.project.is_none());
        assert!(joined.subtasks.is_empty());
        assert!(joined.comments.is_empty());
    }

    #[test]
    fn test_display_helpers() {
        let subtasks = vec![subtask("s-1", "task-1", true), subtask("s-2", "task-1", false)];
        let comments = vec![
            comment("old", "task-1", 10),
            comment("new", "task-1", 30),
            comment("mid", "task-1", 20),
        ];
        let relations = Relations {
            users: &[],
            projects: &[],
            subtasks: &subtasks,
            comments: &comments,
        };

        let joined = relations.join(task("task-1", "user-1", "proj-1"));

        assert_eq!(joined.subtask_progress(), (1, 2));
        let ordered: Vec<_> = joined
            .comments_newest_first()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ordered, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_flattened_json_shape() {
        let relations = Relations {
            users: &[],
            projects: &[],
            subtasks: &[],
            comments: &[],
        };
        let joined = relations.join(task("task-1", "user-1", "proj-1"));

        let value = serde_json::to_value(&joined).unwrap();
        assert_eq!(value["id"], "task-1");
        assert_eq!(value["assignedUserId"], "user-1");
        assert!(value["assignedUser"].is_null());
        assert_eq!(value["subtasks"], serde_json::json!([]));
    }
}
