//! Focus session state machine.
//!
//! Walks a ranked queue one task at a time with a per-task countdown. The
//! machine does no I/O and has no clock of its own: the owner calls `tick()`
//! once per elapsed second while the session is running, and forwards user
//! actions as method calls. Every method returns the events it produced; an
//! empty vec means the request was not valid in the current state and
//! nothing changed.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running | Paused -> (advance) -> Running | Completed
//! any -> start() -> Running (fresh walk from the first entry)
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::ranking::{RankedEntry, Ranking};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    /// Every queue entry was consumed. Terminal until the next `start()`.
    Completed,
}

/// Knobs for how a session allocates time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Fixed allocation for entry 0 instead of its estimate.
    pub first_task_secs: Option<u64>,
}

/// Result of [`FocusSession::start`].
#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    Started(Event),
    /// The queue is empty; the session stays idle.
    NothingToDo,
}

impl StartOutcome {
    pub fn into_events(self) -> Vec<Event> {
        match self {
            StartOutcome::Started(event) => vec![event],
            StartOutcome::NothingToDo => Vec::new(),
        }
    }
}

/// Live state of one guided walk through a ranked queue.
#[derive(Debug, Clone)]
pub struct FocusSession {
    queue: Ranking,
    /// Allocated seconds per queue entry, fixed at construction.
    allocations: Vec<u64>,
    state: SessionState,
    current_index: usize,
    remaining_secs: u64,
    completed_task_ids: Vec<String>,
}

impl FocusSession {
    /// Create an idle session over `queue`.
    pub fn new(queue: impl Into<Ranking>, options: SessionOptions) -> Self {
        let queue: Ranking = queue.into();
        let allocations = queue
            .iter()
            .enumerate()
            .map(|(i, entry)| match (i, options.first_task_secs) {
                (0, Some(secs)) => secs,
                _ => u64::from(entry.duration_minutes).saturating_mul(60),
            })
            .collect();
        Self {
            queue,
            allocations,
            state: SessionState::Idle,
            current_index: 0,
            remaining_secs: 0,
            completed_task_ids: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn queue(&self) -> &Ranking {
        &self.queue
    }

    pub fn current_entry(&self) -> Option<&RankedEntry> {
        self.queue.get(self.current_index)
    }

    /// Allocation of the entry currently in focus.
    pub fn allocated_secs(&self) -> u64 {
        self.allocation(self.current_index)
    }

    pub fn allocation(&self, index: usize) -> u64 {
        self.allocations.get(index).copied().unwrap_or(0)
    }

    /// Task ids marked done during this session, in completion order.
    pub fn completed_task_ids(&self) -> &[String] {
        &self.completed_task_ids
    }

    /// 0.0 .. 100.0 progress within the current entry. Display only.
    pub fn progress_pct(&self) -> f64 {
        let total = self.allocated_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_secs) as f64;
        (elapsed / total as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let entry = self.current_entry();
        Event::StateSnapshot {
            state: self.state,
            current_index: self.current_index,
            task_id: entry.map(|e| e.task.id.clone()),
            title: entry.map(|e| e.task.title.clone()),
            remaining_secs: self.remaining_secs,
            allocated_secs: self.allocated_secs(),
            progress_pct: self.progress_pct(),
            completed_task_ids: self.completed_task_ids.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or restart) the walk from the first entry.
    pub fn start(&mut self) -> StartOutcome {
        let Some(first) = self.queue.first() else {
            tracing::debug!("start requested on an empty queue");
            return StartOutcome::NothingToDo;
        };

        self.current_index = 0;
        self.remaining_secs = self.allocation(0);
        self.completed_task_ids.clear();
        self.state = SessionState::Running;
        tracing::debug!(task_id = %first.task.id, allocated_secs = self.remaining_secs, "session started");

        StartOutcome::Started(Event::SessionStarted {
            task_id: first.task.id.clone(),
            title: first.task.title.clone(),
            allocated_secs: self.remaining_secs,
            queue_len: self.queue.len(),
            at: Utc::now(),
        })
    }

    /// One elapsed second. Completes the current entry when it runs out.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state != SessionState::Running {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return self.complete_current();
        }
        Vec::new()
    }

    pub fn pause(&mut self) -> Vec<Event> {
        if self.state != SessionState::Running {
            return Vec::new();
        }
        self.state = SessionState::Paused;
        tracing::debug!(remaining_secs = self.remaining_secs, "session paused");
        vec![Event::SessionPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }]
    }

    pub fn resume(&mut self) -> Vec<Event> {
        if self.state != SessionState::Paused {
            return Vec::new();
        }
        self.state = SessionState::Running;
        tracing::debug!(remaining_secs = self.remaining_secs, "session resumed");
        vec![Event::SessionResumed {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }]
    }

    /// Mark the entry in focus as done and move on.
    ///
    /// Valid while running or paused. Finishing the last entry completes the
    /// session.
    pub fn complete_current(&mut self) -> Vec<Event> {
        if !matches!(self.state, SessionState::Running | SessionState::Paused) {
            return Vec::new();
        }
        let Some(entry) = self.queue.get(self.current_index) else {
            return Vec::new();
        };

        let mut events = Vec::with_capacity(2);
        let task_id = entry.task.id.clone();
        if !self.completed_task_ids.contains(&task_id) {
            self.completed_task_ids.push(task_id.clone());
            events.push(Event::TaskCompleted {
                task_id,
                index: self.current_index,
                at: Utc::now(),
            });
        }

        if self.current_index + 1 < self.queue.len() {
            events.push(self.advance(false));
        } else {
            self.state = SessionState::Completed;
            self.remaining_secs = 0;
            tracing::debug!(completed = self.completed_task_ids.len(), "session completed");
            events.push(Event::SessionCompleted {
                completed_count: self.completed_task_ids.len(),
                queue_len: self.queue.len(),
                at: Utc::now(),
            });
        }
        events
    }

    /// Move to the next entry without marking the current one done.
    ///
    /// No-op on the last entry and outside running/paused.
    pub fn skip(&mut self) -> Vec<Event> {
        if !matches!(self.state, SessionState::Running | SessionState::Paused) {
            return Vec::new();
        }
        if self.current_index + 1 >= self.queue.len() {
            return Vec::new();
        }
        vec![self.advance(true)]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, skipped: bool) -> Event {
        let from = self.current_index;
        self.current_index += 1;
        self.remaining_secs = self.allocation(self.current_index);
        self.state = SessionState::Running;

        let entry = &self.queue[self.current_index];
        tracing::debug!(from, to = self.current_index, skipped, "advanced to next entry");
        Event::TaskAdvanced {
            from_index: from,
            to_index: self.current_index,
            task_id: entry.task.id.clone(),
            title: entry.task.title.clone(),
            allocated_secs: self.remaining_secs,
            skipped,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank;
    use crate::task::{Priority, Task};

    fn queue(estimates: &[u32]) -> Vec<RankedEntry> {
        // Earlier tasks get higher priority so the ranking keeps this order.
        let priorities = [Priority::High, Priority::Medium, Priority::Low];
        let tasks: Vec<Task> = estimates
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let mut t = Task::new(format!("Task {i}"))
                    .with_priority(priorities[i.min(2)])
                    .with_estimate(*m);
                t.id = format!("t{i}");
                t
            })
            .collect();
        rank(&tasks, Utc::now())
    }

    fn started(estimates: &[u32], options: SessionOptions) -> FocusSession {
        let mut s = FocusSession::new(queue(estimates), options);
        assert!(matches!(s.start(), StartOutcome::Started(_)));
        s
    }

    #[test]
    fn start_sets_first_allocation() {
        let s = started(&[1, 2], SessionOptions::default());
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.remaining_secs(), 60);
    }

    #[test]
    fn start_on_empty_queue_is_nothing_to_do() {
        let mut s = FocusSession::new(Vec::new(), SessionOptions::default());
        assert_eq!(s.start(), StartOutcome::NothingToDo);
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn first_task_override_only_applies_to_entry_zero() {
        let s = started(
            &[30, 1],
            SessionOptions {
                first_task_secs: Some(10),
            },
        );
        assert_eq!(s.remaining_secs(), 10);
        assert_eq!(s.allocation(1), 60);
    }

    #[test]
    fn ticks_run_out_and_advance() {
        let mut s = started(
            &[30, 1],
            SessionOptions {
                first_task_secs: Some(10),
            },
        );
        for _ in 0..9 {
            assert!(s.tick().is_empty());
        }
        let events = s.tick();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::TaskCompleted { ref task_id, .. } if task_id == "t0"));
        assert!(matches!(events[1], Event::TaskAdvanced { skipped: false, to_index: 1, .. }));
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.remaining_secs(), 60);
    }

    #[test]
    fn pause_freezes_countdown() {
        let mut s = started(&[1], SessionOptions::default());
        for _ in 0..53 {
            s.tick();
        }
        assert_eq!(s.remaining_secs(), 7);
        assert_eq!(s.pause().len(), 1);
        for _ in 0..5 {
            assert!(s.tick().is_empty());
        }
        assert_eq!(s.remaining_secs(), 7);
        assert_eq!(s.resume().len(), 1);
        s.tick();
        assert_eq!(s.remaining_secs(), 6);
    }

    #[test]
    fn invalid_transitions_are_no_ops() {
        let mut s = FocusSession::new(queue(&[1, 1]), SessionOptions::default());
        assert!(s.pause().is_empty());
        assert!(s.resume().is_empty());
        assert!(s.skip().is_empty());
        assert!(s.complete_current().is_empty());
        assert!(s.tick().is_empty());
        assert_eq!(s.state(), SessionState::Idle);

        s.start();
        assert!(s.resume().is_empty());
        s.pause();
        assert!(s.pause().is_empty());
    }

    #[test]
    fn skip_on_last_entry_is_no_op() {
        let mut s = started(&[1, 1], SessionOptions::default());
        assert_eq!(s.skip().len(), 1);
        assert_eq!(s.current_index(), 1);
        let before = s.remaining_secs();
        assert!(s.skip().is_empty());
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.remaining_secs(), before);
        assert!(s.completed_task_ids().is_empty());
    }

    #[test]
    fn completing_last_entry_finishes_once() {
        let mut s = started(&[1], SessionOptions::default());
        let events = s.complete_current();
        let finished = events
            .iter()
            .filter(|e| matches!(e, Event::SessionCompleted { .. }))
            .count();
        assert_eq!(finished, 1);
        assert_eq!(s.state(), SessionState::Completed);
        assert_eq!(s.remaining_secs(), 0);
        assert!(s.complete_current().is_empty());
        assert!(s.tick().is_empty());
    }

    #[test]
    fn complete_while_paused_resumes_on_next_entry() {
        let mut s = started(&[1, 1], SessionOptions::default());
        s.pause();
        s.complete_current();
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.current_index(), 1);
    }

    #[test]
    fn restart_clears_completed_ids() {
        let mut s = started(&[1, 1], SessionOptions::default());
        s.complete_current();
        s.complete_current();
        assert_eq!(s.state(), SessionState::Completed);
        assert_eq!(s.completed_task_ids().len(), 2);

        assert!(matches!(s.start(), StartOutcome::Started(_)));
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.current_index(), 0);
        assert!(s.completed_task_ids().is_empty());
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut s = started(&[1], SessionOptions::default());
        assert_eq!(s.progress_pct(), 0.0);
        for _ in 0..15 {
            s.tick();
        }
        assert!((s.progress_pct() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_reports_current_entry() {
        let s = started(&[1, 2], SessionOptions::default());
        match s.snapshot() {
            Event::StateSnapshot {
                state,
                current_index,
                task_id,
                remaining_secs,
                ..
            } => {
                assert_eq!(state, SessionState::Running);
                assert_eq!(current_index, 0);
                assert_eq!(task_id.as_deref(), Some("t0"));
                assert_eq!(remaining_secs, 60);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
