//! Dashboard overview: task counts, overdue warning, per-project tallies.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::{Project, Task};

/// Task count for one project, matched by project name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTally {
    pub name: String,
    pub color: String,
    pub tasks: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    /// Incomplete tasks whose due time has passed.
    pub overdue: usize,
    /// Incomplete tasks due on the calendar day of `now`, overdue ones included.
    pub due_today: usize,
    /// Completed share of all tasks, 0 to 100.
    pub completion_rate: f64,
    pub overdue_task_ids: Vec<String>,
    pub projects: Vec<ProjectTally>,
}

impl TaskSummary {
    /// Days are compared in the time zone of `now`.
    pub fn compute<Tz: TimeZone>(tasks: &[Task], projects: &[Project], now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();
        let active: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();
        let completed = tasks.len() - active.len();

        let overdue_task_ids: Vec<String> = active
            .iter()
            .filter(|t| t.due_at.is_some_and(|due| due < *now))
            .map(|t| t.id.clone())
            .collect();
        let due_today = active
            .iter()
            .filter(|t| {
                t.due_at
                    .is_some_and(|due| due.with_timezone(&now.timezone()).date_naive() == today)
            })
            .count();

        let projects = projects
            .iter()
            .map(|p| {
                let mine = tasks.iter().filter(|t| t.project.as_deref() == Some(p.name.as_str()));
                let (tasks, completed) = mine.fold((0, 0), |(n, done), t| (n + 1, done + usize::from(t.completed)));
                ProjectTally {
                    name: p.name.clone(),
                    color: p.color.clone(),
                    tasks,
                    completed,
                }
            })
            .collect();

        let completion_rate = if tasks.is_empty() {
            0.0
        } else {
            completed as f64 / tasks.len() as f64 * 100.0
        };

        Self {
            total: tasks.len(),
            active: active.len(),
            completed,
            overdue: overdue_task_ids.len(),
            due_today,
            completion_rate,
            overdue_task_ids,
            projects,
        }
    }

    /// One-line alert when anything is overdue.
    pub fn overdue_warning(&self) -> Option<String> {
        match self.overdue {
            0 => None,
            1 => Some("You have 1 overdue task. Review and reschedule it to stay on track.".into()),
            n => Some(format!(
                "You have {n} overdue tasks. Review and reschedule them to stay on track."
            )),
        }
    }
}
