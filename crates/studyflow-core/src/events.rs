use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::SessionState;

/// Every focus session transition produces one or more Events.
/// The runner turns them into narration and completion effects; the CLI
/// prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        task_id: String,
        title: String,
        allocated_secs: u64,
        queue_len: usize,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The task at `index` was marked done. Forwarded to the completion sink.
    TaskCompleted {
        task_id: String,
        index: usize,
        at: DateTime<Utc>,
    },
    /// Focus moved to the next entry, by completion or by skip.
    TaskAdvanced {
        from_index: usize,
        to_index: usize,
        task_id: String,
        title: String,
        allocated_secs: u64,
        skipped: bool,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        completed_count: usize,
        queue_len: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        current_index: usize,
        task_id: Option<String>,
        title: Option<String>,
        remaining_secs: u64,
        allocated_secs: u64,
        progress_pct: f64,
        completed_task_ids: Vec<String>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine-friendly name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "session_started",
            Event::SessionPaused { .. } => "session_paused",
            Event::SessionResumed { .. } => "session_resumed",
            Event::TaskCompleted { .. } => "task_completed",
            Event::TaskAdvanced { .. } => "task_advanced",
            Event::SessionCompleted { .. } => "session_completed",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
