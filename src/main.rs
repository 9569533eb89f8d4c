use std::{fmt::Display, path::PathBuf};

use clap::{Parser, Subcommand};
use colored::*;
use jiff::civil::Date;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use taskflow::{
    config::{Config, STORE_ENV},
    models::task::{TaskDraft, TaskPriority, TaskStatus, TaskUpdate},
    services::{
        filter::{StatusFilter, TaskFilters},
        repository::Repository,
        seed::CURRENT_USER_ID,
    },
    storage::json::JsonFileStore,
};

mod ui;

#[derive(Parser)]
#[command(
    name = "taskflow",
    about = "Track tasks, subtasks and comments across projects"
)]
struct Cli {
    /// Path of the store file
    #[arg(long, global = true, env = STORE_ENV)]
    store: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks (default)
    List {
        /// Match title or description, case-insensitive
        #[arg(short, long)]
        search: Option<String>,

        /// Only tasks with this status (todo, in-progress, done, all)
        #[arg(long, default_value_t = StatusFilter::All)]
        status: StatusFilter,

        /// Only tasks in this project ("all" for any)
        #[arg(short, long)]
        project: Option<String>,

        /// Only tasks assigned to this user
        #[arg(short, long, conflicts_with = "mine")]
        assignee: Option<String>,

        /// Only tasks assigned to the current user
        #[arg(long)]
        mine: bool,
    },

    /// Show a task with its subtasks and comments
    Show { task_id: String },

    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Project id
        #[arg(short, long)]
        project: String,

        /// Assigned user id (defaults to the current user)
        #[arg(short, long)]
        assignee: Option<String>,

        #[arg(long, default_value_t = TaskStatus::Todo)]
        status: TaskStatus,

        #[arg(long, default_value_t = TaskPriority::Medium)]
        priority: TaskPriority,

        /// Due date (e.g., "2026-03-01")
        #[arg(long)]
        due: Option<Date>,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Change fields of an existing task
    Edit {
        task_id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        assignee: Option<String>,

        #[arg(short, long)]
        project: Option<String>,

        #[arg(long)]
        status: Option<TaskStatus>,

        #[arg(long)]
        priority: Option<TaskPriority>,

        /// New due date (e.g., "2026-03-01")
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<Date>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Delete a task with its subtasks and comments
    Delete { task_id: String },

    /// Manage subtasks
    #[command(subcommand)]
    Subtask(SubtaskCommands),

    /// Comment on a task as the current user
    Comment { task_id: String, content: String },

    /// List users
    Users,

    /// List projects
    Projects,

    /// Show the current user
    Whoami,
}

#[derive(Debug, Subcommand)]
enum SubtaskCommands {
    /// Add a subtask to a task
    Add { task_id: String, title: String },
    /// Mark a subtask done, or open again
    Toggle { subtask_id: String },
    /// Delete a subtask
    Delete { subtask_id: String },
}

fn init_tracing() {
    // Tracing is opt-in via RUST_LOG.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn fail(message: impl Display) -> ! {
    eprintln!("{} {}", "Error:".red(), message);
    std::process::exit(1);
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("Failed to encode output: {}", e)),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::resolve(cli.store);
    if let Err(e) = config.prepare() {
        fail(format!("Failed to create data directory: {}", e));
    }
    tracing::debug!(path = %config.store_path().display(), "opening store");

    let repository = Repository::new(JsonFileStore::new(config.store_path));

    if let Err(e) = repository.initialize_once().await {
        fail(format!("Failed to initialize store: {}", e));
    }

    let json = cli.json;
    let command = cli.command.unwrap_or(Commands::List {
        search: None,
        status: StatusFilter::All,
        project: None,
        assignee: None,
        mine: false,
    });

    match command {
        Commands::List {
            search,
            status,
            project,
            assignee,
            mine,
        } => {
            let assigned_user_id = if mine {
                Some(current_user_id(&repository).await)
            } else {
                assignee
            };
            let filters = TaskFilters {
                search,
                status,
                project_id: project,
                assigned_user_id,
            };

            let tasks = repository.list_tasks(&filters).await;

            if json {
                print_json(&tasks);
            } else if tasks.is_empty() {
                println!("No tasks found");
            } else {
                ui::render_view_header("Tasks", tasks.len(), "task");
                for task in &tasks {
                    ui::render_task_line(task);
                }
                println!();
            }
        }
        Commands::Show { task_id } => match repository.get_task(&task_id).await {
            Some(task) if json => print_json(&task),
            Some(task) => ui::render_task_detail(&task, &repository.list_users().await),
            None => fail(format!("Task '{}' not found", task_id)),
        },
        Commands::Add {
            title,
            project,
            assignee,
            status,
            priority,
            due,
            description,
        } => {
            let assignee = match assignee {
                Some(assignee) => assignee,
                None => current_user_id(&repository).await,
            };
            let draft = TaskDraft {
                title: Some(title),
                description,
                assigned_user_id: Some(assignee),
                project_id: Some(project),
                status: Some(status),
                priority: Some(priority),
                due_date: due,
            };

            let input = match draft.into_new_task() {
                Ok(input) => input,
                Err(report) => {
                    ui::render_validation_errors(&report);
                    std::process::exit(1);
                }
            };

            match repository.create_task(input).await {
                Ok(task) if json => print_json(&task),
                Ok(task) => println!(
                    "{} Created task: {} {}",
                    "✓".green(),
                    task.title.bold(),
                    format!("({})", task.id).dimmed()
                ),
                Err(e) => fail(e),
            }
        }
        Commands::Edit {
            task_id,
            title,
            description,
            assignee,
            project,
            status,
            priority,
            due,
            clear_due,
        } => {
            let Some(existing) = repository.get_task(&task_id).await else {
                fail(format!("Task '{}' not found", task_id));
            };

            // Check the merged result with the same rules as a new task
            let merged = TaskDraft {
                title: Some(title.clone().unwrap_or(existing.task.title)),
                description: Some(description.clone().unwrap_or(existing.task.description)),
                assigned_user_id: Some(assignee.clone().unwrap_or(existing.task.assigned_user_id)),
                project_id: Some(project.clone().unwrap_or(existing.task.project_id)),
                status: Some(status.unwrap_or(existing.task.status)),
                priority: Some(priority.unwrap_or(existing.task.priority)),
                due_date: None,
            };
            let report = merged.validate();
            if !report.is_valid() {
                ui::render_validation_errors(&report);
                std::process::exit(1);
            }

            let update = TaskUpdate {
                id: task_id,
                title,
                description,
                assigned_user_id: assignee,
                project_id: project,
                status,
                priority,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
            };

            match repository.update_task(update).await {
                Ok(task) if json => print_json(&task),
                Ok(task) => println!(
                    "{} Updated task: {} {}",
                    "✓".green(),
                    task.title.bold(),
                    format!("({})", task.id).dimmed()
                ),
                Err(e) => fail(e),
            }
        }
        Commands::Delete { task_id } => match repository.delete_task(&task_id).await {
            Ok(()) => println!("{} Deleted task {}", "✓".green(), task_id.dimmed()),
            Err(e) => fail(e),
        },
        Commands::Subtask(SubtaskCommands::Add { task_id, title }) => {
            let title = title.trim();
            if title.is_empty() {
                fail("Subtask title is required");
            }
            match repository.create_subtask(&task_id, title).await {
                Ok(subtask) if json => print_json(&subtask),
                Ok(subtask) => println!(
                    "{} Added subtask: {} {}",
                    "✓".green(),
                    subtask.title.bold(),
                    format!("({})", subtask.id).dimmed()
                ),
                Err(e) => fail(e),
            }
        }
        Commands::Subtask(SubtaskCommands::Toggle { subtask_id }) => {
            match repository.toggle_subtask(&subtask_id).await {
                Ok(subtask) if json => print_json(&subtask),
                Ok(subtask) => {
                    let state = if subtask.completed { "done" } else { "open" };
                    println!("{} Subtask {} is {}", "✓".green(), subtask.title.bold(), state);
                }
                Err(e) => fail(e),
            }
        }
        Commands::Subtask(SubtaskCommands::Delete { subtask_id }) => {
            match repository.delete_subtask(&subtask_id).await {
                Ok(()) => println!("{} Deleted subtask {}", "✓".green(), subtask_id.dimmed()),
                Err(e) => fail(e),
            }
        }
        Commands::Comment { task_id, content } => {
            let content = content.trim();
            if content.is_empty() {
                fail("Comment content is required");
            }
            let user_id = current_user_id(&repository).await;
            match repository.create_comment(&task_id, &user_id, content).await {
                Ok(comment) if json => print_json(&comment),
                Ok(comment) => println!(
                    "{} Commented on {} {}",
                    "✓".green(),
                    task_id.bold(),
                    format!("({})", comment.id).dimmed()
                ),
                Err(e) => fail(e),
            }
        }
        Commands::Users => {
            let users = repository.list_users().await;
            if json {
                print_json(&users);
            } else {
                let current = repository.get_current_user().await;
                ui::render_users(&users, current.as_ref());
            }
        }
        Commands::Projects => {
            let projects = repository.list_projects().await;
            if json {
                print_json(&projects);
            } else {
                ui::render_projects(&projects);
            }
        }
        Commands::Whoami => match repository.get_current_user().await {
            Some(user) if json => print_json(&user),
            Some(user) => println!("{} <{}>", user.name.bold(), user.email),
            None => fail("Current user not found"),
        },
    }
}

async fn current_user_id(repository: &Repository<JsonFileStore>) -> String {
    repository
        .get_current_user()
        .await
        .map(|user| user.id)
        .unwrap_or_else(|| CURRENT_USER_ID.to_string())
}
