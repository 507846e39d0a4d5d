//! Completion sink: where "task marked done" events go.

use std::sync::Mutex;

use crate::error::{CoreError, Result};
use crate::storage::KeyValueStore;
use crate::task::TaskRepository;

/// Persists completions coming out of a focus session.
///
/// Called off the session loop; the result is only logged.
pub trait CompletionSink: Send + Sync {
    fn mark_completed(&self, task_id: &str) -> Result<()>;
}

/// Marks tasks done in a [`TaskRepository`].
pub struct RepositoryCompletionSink<S> {
    repo: Mutex<TaskRepository<S>>,
}

impl<S: KeyValueStore + Send> RepositoryCompletionSink<S> {
    pub fn new(repo: TaskRepository<S>) -> Self {
        Self {
            repo: Mutex::new(repo),
        }
    }

    /// Run `f` against the wrapped repository.
    pub fn with_repo<T>(&self, f: impl FnOnce(&TaskRepository<S>) -> Result<T>) -> Result<T> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| CoreError::Custom("task repository lock poisoned".into()))?;
        f(&repo)
    }
}

impl<S: KeyValueStore + Send> CompletionSink for RepositoryCompletionSink<S> {
    fn mark_completed(&self, task_id: &str) -> Result<()> {
        self.with_repo(|repo| repo.mark_completed(task_id).map(|_| ()))?;
        tracing::info!(task_id, "task marked completed");
        Ok(())
    }
}
