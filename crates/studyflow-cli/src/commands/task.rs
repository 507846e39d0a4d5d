//! Task management commands for CLI.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use studyflow_core::{Priority, Task};

use super::{open_repository, CliResult, StoreChoice};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high (default: medium)
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Due date, RFC 3339 or YYYY-MM-DD
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
        /// Estimated minutes
        #[arg(long)]
        estimate: Option<u32>,
        /// Project name
        #[arg(long)]
        project: Option<String>,
    },
    /// List tasks
    List {
        /// Filter by project name
        #[arg(long)]
        project: Option<String>,
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
        /// New due date
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
        /// New estimate in minutes
        #[arg(long)]
        estimate: Option<u32>,
        /// New project name
        #[arg(long)]
        project: Option<String>,
        /// Set completed status
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark a task as completed
    Complete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

/// Accepts RFC 3339 timestamps or plain dates (end of that day, UTC).
fn parse_due(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid due date '{s}' (expected YYYY-MM-DD or RFC 3339)"))
}

pub fn run(action: TaskAction, store: StoreChoice) -> CliResult {
    let repo = open_repository(store)?;

    match action {
        TaskAction::Create {
            title,
            description,
            priority,
            due,
            estimate,
            project,
        } => {
            let mut task = Task::new(title).with_priority(priority);
            task.description = description.unwrap_or_default();
            task.due_at = due;
            task.estimated_duration_minutes = estimate;
            task.project = project;

            let task = repo.create_task(task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { project, all } => {
            let tasks: Vec<_> = repo
                .list_tasks()?
                .into_iter()
                .filter(|t| all || !t.completed)
                .filter(|t| project.is_none() || t.project == project)
                .collect();
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Get { id } => match repo.get_task(&id)? {
            Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
            None => return Err(format!("task not found: {id}").into()),
        },
        TaskAction::Update {
            id,
            title,
            description,
            priority,
            due,
            clear_due,
            estimate,
            project,
            completed,
        } => {
            let task = repo.update_task(&id, |task| {
                if let Some(t) = title {
                    task.title = t;
                }
                if let Some(d) = description {
                    task.description = d;
                }
                if let Some(p) = priority {
                    task.priority = p;
                }
                if clear_due {
                    task.due_at = None;
                } else if due.is_some() {
                    task.due_at = due;
                }
                if estimate.is_some() {
                    task.estimated_duration_minutes = estimate;
                }
                if project.is_some() {
                    task.project = project;
                }
                if let Some(c) = completed {
                    task.completed = c;
                }
            })?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Complete { id } => {
            let task = repo.mark_completed(&id)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Delete { id } => {
            if !repo.delete_task(&id)? {
                return Err(format!("task not found: {id}").into());
            }
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
