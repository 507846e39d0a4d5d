//! Task and project CRUD over a [`KeyValueStore`].
//!
//! Tasks live as one JSON array under `tasks`, projects under `projects`.
//! Every mutation rewrites the whole array; the lists are small.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Priority, Project, Task, TaskSummary};
use crate::error::{CoreError, Result, ValidationError};
use crate::storage::KeyValueStore;

pub const TASKS_KEY: &str = "tasks";
pub const PROJECTS_KEY: &str = "projects";

pub struct TaskRepository<S> {
    store: S,
}

impl<S: KeyValueStore> TaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.read_list(TASKS_KEY)
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.list_tasks()?.into_iter().find(|t| t.id == id))
    }

    /// Append a task. The title must not be blank.
    pub fn create_task(&self, task: Task) -> Result<Task> {
        if task.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title").into());
        }
        let mut tasks = self.list_tasks()?;
        tasks.push(task.clone());
        self.write_list(TASKS_KEY, &tasks)?;
        tracing::debug!(task_id = %task.id, "task created");
        Ok(task)
    }

    /// Apply `change` to the task with `id` and persist it.
    pub fn update_task(&self, id: &str, change: impl FnOnce(&mut Task)) -> Result<Task> {
        let mut tasks = self.list_tasks()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("task", id))?;
        change(task);
        if task.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title").into());
        }
        let updated = task.clone();
        self.write_list(TASKS_KEY, &tasks)?;
        Ok(updated)
    }

    /// Remove a task. Returns whether it existed.
    pub fn delete_task(&self, id: &str) -> Result<bool> {
        let mut tasks = self.list_tasks()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.write_list(TASKS_KEY, &tasks)?;
        Ok(true)
    }

    pub fn mark_completed(&self, id: &str) -> Result<Task> {
        self.update_task(id, |t| t.completed = true)
    }

    // ── Projects ─────────────────────────────────────────────────────

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        self.read_list(PROJECTS_KEY)
    }

    pub fn create_project(&self, project: Project) -> Result<Project> {
        if project.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name").into());
        }
        let mut projects = self.list_projects()?;
        projects.push(project.clone());
        self.write_list(PROJECTS_KEY, &projects)?;
        Ok(project)
    }

    /// Remove a project. Tasks keep their project name.
    pub fn delete_project(&self, id: &str) -> Result<bool> {
        let mut projects = self.list_projects()?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Ok(false);
        }
        self.write_list(PROJECTS_KEY, &projects)?;
        Ok(true)
    }

    // ── Overview ─────────────────────────────────────────────────────

    pub fn summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<TaskSummary> {
        let tasks = self.list_tasks()?;
        let projects = self.list_projects()?;
        Ok(TaskSummary::compute(&tasks, &projects, now))
    }

    /// Write a starter set of tasks and projects when both lists are empty.
    /// Returns whether anything was written.
    pub fn seed_demo_data(&self, now: DateTime<Utc>) -> Result<bool> {
        if !self.list_tasks()?.is_empty() || !self.list_projects()?.is_empty() {
            return Ok(false);
        }

        let mut school = Project::new("School Assignments");
        school.description = "Track all your coursework and assignments".into();
        let mut goals = Project::new("Study Goals");
        goals.description = "Personal learning objectives and milestones".into();
        goals.color = "#10B981".into();

        let demo = |title: &str, desc: &str, days: i64, priority, minutes, project: &Project| {
            let mut t = Task::new(title)
                .with_priority(priority)
                .with_due_at(now + Duration::days(days))
                .with_estimate(minutes)
                .with_project(project.name.clone());
            t.description = desc.into();
            t
        };
        let mut presentation = demo(
            "Practice Presentation",
            "Rehearse final presentation for science project",
            3,
            Priority::Low,
            60,
            &goals,
        );
        presentation.completed = true;

        let tasks = vec![
            demo(
                "Complete Math Problem Set",
                "Finish exercises 1-20 from Chapter 5",
                2,
                Priority::High,
                120,
                &school,
            ),
            demo(
                "Review Study Notes",
                "Go through all notes from this week's lectures",
                1,
                Priority::Medium,
                60,
                &goals,
            ),
            demo(
                "History Essay Draft",
                "Write first draft of Industrial Revolution essay",
                5,
                Priority::Medium,
                180,
                &school,
            ),
            presentation,
        ];

        self.write_list(PROJECTS_KEY, &[school, goals])?;
        self.write_list(TASKS_KEY, &tasks)?;
        tracing::info!(tasks = tasks.len(), "seeded demo data");
        Ok(true)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.store.get(key)? {
            Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(&json)?),
            _ => Ok(Vec::new()),
        }
    }

    fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.store.set(key, &json)
    }
}

fn not_found(kind: &'static str, id: &str) -> CoreError {
    CoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}
