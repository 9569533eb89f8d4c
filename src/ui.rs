use colored::*;
use jiff::civil::Date;

use taskflow::{
    models::{
        project::Project,
        relations::TaskWithRelations,
        task::{TaskPriority, TaskStatus},
        user::User,
    },
    services::validation::ValidationReport,
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

fn today() -> Date {
    jiff::Zoned::now().date()
}

/// Get the appropriate status glyph for a task
pub fn get_status_glyph(status: TaskStatus, is_overdue: bool) -> ColoredString {
    match status {
        TaskStatus::Done => "✓".dimmed(),
        _ if is_overdue => "●".red(),
        TaskStatus::InProgress => "◐".yellow(),
        TaskStatus::Todo => "○".normal(),
    }
}

fn priority_badge(priority: TaskPriority) -> ColoredString {
    match priority {
        TaskPriority::High => priority.label().red(),
        TaskPriority::Medium => priority.label().yellow(),
        TaskPriority::Low => priority.label().green(),
    }
}

fn status_badge(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Todo => status.label().normal(),
        TaskStatus::InProgress => status.label().yellow(),
        TaskStatus::Done => status.label().green(),
    }
}

/// A task is overdue when it is not done and its due date has passed
pub fn is_overdue(task: &TaskWithRelations, today: Date) -> bool {
    task.task.status != TaskStatus::Done && task.task.due_date.is_some_and(|due| due < today)
}

/// Build the context string for a task (Project · Assignee)
/// Returns None if neither relation resolves
pub fn get_task_context(task: &TaskWithRelations) -> Option<String> {
    match (&task.project, &task.assigned_user) {
        (Some(project), Some(user)) => Some(format!("{} · {}", project.name, user.name)),
        (Some(project), None) => Some(project.name.clone()),
        (None, Some(user)) => Some(user.name.clone()),
        (None, None) => None,
    }
}

/// Render a single task line with ID, glyph, title, and right-aligned context
pub fn render_task_line(task: &TaskWithRelations) {
    let terminal_width = get_terminal_width();
    let is_overdue = is_overdue(task, today());

    let glyph = get_status_glyph(task.task.status, is_overdue);
    let title = &task.task.title;
    let id_str = &task.task.id;

    let left_section = format!("  {}  {}", glyph, title);
    let styled_left = if task.task.status == TaskStatus::Done {
        left_section.dimmed()
    } else {
        left_section.bold()
    };

    let mut right_parts = vec![id_str.clone()];
    if let Some(context) = get_task_context(task) {
        right_parts.insert(0, context);
    }
    let right_section = right_parts.join("  ·  ");

    let left_visible_len = format!("  {}  {}", " ", title).chars().count();
    let right_visible_len = right_section.chars().count();
    let total_content = left_visible_len + right_visible_len;

    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", styled_left, " ".repeat(padding), right_section.dimmed());
    } else {
        // Not enough space for right alignment, print the context below
        println!("{}", styled_left);
        println!("      {}", right_section.dimmed());
    }
}

/// Render a whole task with its subtasks and comments.
///
/// `users` resolves comment authors to display names.
pub fn render_task_detail(task: &TaskWithRelations, users: &[User]) {
    let today = today();
    let t = &task.task;

    println!("\n  {}", t.title.bold());
    println!("  {}\n", t.id.dimmed());

    println!("  {:<10} {}", "Status".dimmed(), status_badge(t.status));
    println!("  {:<10} {}", "Priority".dimmed(), priority_badge(t.priority));
    println!(
        "  {:<10} {}",
        "Project".dimmed(),
        task.project
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("unknown ({})", t.project_id))
    );
    println!(
        "  {:<10} {}",
        "Assignee".dimmed(),
        task.assigned_user
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| format!("unknown ({})", t.assigned_user_id))
    );
    if let Some(due) = t.due_date {
        let formatted = format_date(due);
        if is_overdue(task, today) {
            println!("  {:<10} {} {}", "Due".dimmed(), formatted.red(), "(overdue)".red());
        } else {
            println!("  {:<10} {}", "Due".dimmed(), formatted);
        }
    }
    println!("  {:<10} {}", "Created".dimmed(), format_timestamp(t.created_at));
    println!("  {:<10} {}", "Updated".dimmed(), format_timestamp(t.updated_at));

    if !t.description.is_empty() {
        println!("\n  {}", t.description);
    }

    let (completed, total) = task.subtask_progress();
    render_section_header(&format!("Subtasks ({}/{})", completed, total));
    if task.subtasks.is_empty() {
        println!("  {}", "No subtasks yet".dimmed());
    }
    for subtask in &task.subtasks {
        let checkbox = if subtask.completed { "[x]".green() } else { "[ ]".normal() };
        println!("  {} {}  {}", checkbox, subtask.title, subtask.id.dimmed());
    }

    render_section_header(&format!("Comments ({})", task.comments.len()));
    if task.comments.is_empty() {
        println!("  {}", "No comments yet".dimmed());
    }
    for comment in task.comments_newest_first() {
        let author = users
            .iter()
            .find(|u| u.id == comment.user_id)
            .map_or("Unknown", |u| u.name.as_str());
        println!(
            "  {}  {}",
            author.cyan(),
            format_timestamp(comment.created_at).dimmed()
        );
        println!("    {}", comment.content);
    }
    println!();
}

pub fn render_users(users: &[User], current_user: Option<&User>) {
    render_view_header("Users", users.len(), "user");
    for user in users {
        let marker = if current_user.is_some_and(|c| c.id == user.id) {
            "*".cyan()
        } else {
            " ".normal()
        };
        println!("  {} {:<8} {}  {}", marker, user.id.dimmed(), user.name.bold(), user.email);
    }
    println!();
}

pub fn render_projects(projects: &[Project]) {
    render_view_header("Projects", projects.len(), "project");
    for project in projects {
        println!("  {:<8} {}", project.id.dimmed(), project.name.bold());
        if let Some(description) = &project.description {
            println!("           {}", description.dimmed());
        }
    }
    println!();
}

pub fn render_validation_errors(report: &ValidationReport) {
    eprintln!("{} task is invalid", "Error:".red());
    for (field, message) in &report.errors {
        eprintln!("  {}: {}", field.bold(), message);
    }
}

/// Format a due date for display (e.g., "Feb 15, 2026")
pub fn format_date(date: Date) -> String {
    date.strftime("%b %-d, %Y").to_string()
}

/// Format a timestamp in the local time zone (e.g., "Feb 15, 2026 3:04 PM")
pub fn format_timestamp(timestamp: jiff::Timestamp) -> String {
    let zoned = jiff::Zoned::new(timestamp, jiff::tz::TimeZone::system());
    zoned.strftime("%b %-d, %Y %-I:%M %p").to_string()
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize, noun: &str) {
    let word = if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, word);
}

/// Render a section header (e.g., "Subtasks (1/3)")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}
