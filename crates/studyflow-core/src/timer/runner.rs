//! Async driver for a [`FocusSession`].
//!
//! The runner is the only owner of the session. It waits on a tick source and
//! a command channel, applies whichever arrives first to completion, and then
//! performs the effects of the resulting events:
//!
//! - narration through a [`Narrator`] (new lines cancel the previous one)
//! - completion through a [`CompletionSink`] on the blocking pool
//! - forwarding to an optional event stream
//!
//! Effect failures are logged and never reach the session.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

use super::clock::TickSource;
use super::session::{FocusSession, SessionState, StartOutcome};
use crate::completion::CompletionSink;
use crate::events::Event;
use crate::narration::{message_for, Narrator};

const COMMAND_BUFFER: usize = 32;

/// User actions a running session accepts.
#[derive(Debug)]
pub enum FocusCommand {
    Pause,
    Resume,
    Skip,
    CompleteCurrent,
    /// Start over from the first entry.
    Restart,
    /// Reply with a state snapshot.
    Snapshot(oneshot::Sender<Event>),
    Stop,
}

/// Cloneable sender side of a [`FocusRunner`].
///
/// Every method returns `false` once the runner has stopped.
#[derive(Debug, Clone)]
pub struct FocusHandle {
    tx: mpsc::Sender<FocusCommand>,
}

impl FocusHandle {
    pub async fn pause(&self) -> bool {
        self.send(FocusCommand::Pause).await
    }

    pub async fn resume(&self) -> bool {
        self.send(FocusCommand::Resume).await
    }

    pub async fn skip(&self) -> bool {
        self.send(FocusCommand::Skip).await
    }

    pub async fn complete_current(&self) -> bool {
        self.send(FocusCommand::CompleteCurrent).await
    }

    pub async fn restart(&self) -> bool {
        self.send(FocusCommand::Restart).await
    }

    pub async fn stop(&self) -> bool {
        self.send(FocusCommand::Stop).await
    }

    /// Current session state, or `None` if the runner is gone.
    pub async fn snapshot(&self) -> Option<Event> {
        let (reply, rx) = oneshot::channel();
        if !self.send(FocusCommand::Snapshot(reply)).await {
            return None;
        }
        rx.await.ok()
    }

    pub async fn send(&self, command: FocusCommand) -> bool {
        self.tx.send(command).await.is_ok()
    }
}

pub struct FocusRunner<T> {
    session: FocusSession,
    ticks: T,
    narrator: Arc<dyn Narrator>,
    sink: Arc<dyn CompletionSink>,
    commands: mpsc::Receiver<FocusCommand>,
    events: Option<mpsc::UnboundedSender<Event>>,
    stop_when_completed: bool,
    pending: JoinSet<()>,
}

impl<T: TickSource> FocusRunner<T> {
    pub fn new(
        session: FocusSession,
        ticks: T,
        narrator: Arc<dyn Narrator>,
        sink: Arc<dyn CompletionSink>,
    ) -> (Self, FocusHandle) {
        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let runner = Self {
            session,
            ticks,
            narrator,
            sink,
            commands,
            events: None,
            stop_when_completed: true,
            pending: JoinSet::new(),
        };
        (runner, FocusHandle { tx })
    }

    /// Receive every event the session emits, in order.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Keep the loop alive after the last entry so a restart is possible.
    pub fn stop_when_completed(mut self, stop: bool) -> Self {
        self.stop_when_completed = stop;
        self
    }

    /// Start the session and drive it until it completes, a `Stop` arrives,
    /// or every handle is dropped. Returns the final session.
    pub async fn run(mut self) -> FocusSession {
        match self.session.start() {
            StartOutcome::NothingToDo => {
                tracing::info!("focus queue is empty; nothing to do");
                return self.session;
            }
            StartOutcome::Started(event) => {
                tracing::info!(queue_len = self.session.queue().len(), "focus session started");
                self.dispatch(event);
            }
        }

        let mut ticks_alive = true;
        loop {
            if self.stop_when_completed && self.session.state() == SessionState::Completed {
                break;
            }
            let running = ticks_alive && self.session.state() == SessionState::Running;

            tokio::select! {
                biased;

                alive = self.ticks.tick(), if running => {
                    if !alive {
                        tracing::debug!("tick source closed");
                        ticks_alive = false;
                        continue;
                    }
                    let events = self.session.tick();
                    self.dispatch_all(events);
                }
                command = self.commands.recv() => match command {
                    None | Some(FocusCommand::Stop) => break,
                    Some(command) => self.apply(command),
                },
                Some(joined) = self.pending.join_next(), if !self.pending.is_empty() => {
                    if let Err(e) = joined {
                        tracing::warn!(error = %e, "completion task failed");
                    }
                }
            }
        }

        while let Some(joined) = self.pending.join_next().await {
            if let Err(e) = joined {
                tracing::warn!(error = %e, "completion task failed");
            }
        }
        tracing::info!(
            state = ?self.session.state(),
            completed = self.session.completed_task_ids().len(),
            "focus session ended"
        );
        self.session
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(&mut self, command: FocusCommand) {
        let was_running = self.session.state() == SessionState::Running;
        let events = match command {
            FocusCommand::Pause => self.session.pause(),
            FocusCommand::Resume => self.session.resume(),
            FocusCommand::Skip => self.session.skip(),
            FocusCommand::CompleteCurrent => self.session.complete_current(),
            FocusCommand::Restart => {
                let events = self.session.start().into_events();
                if !events.is_empty() {
                    self.ticks.reset();
                }
                events
            }
            FocusCommand::Snapshot(reply) => {
                let _ = reply.send(self.session.snapshot());
                return;
            }
            FocusCommand::Stop => return,
        };

        // Countdown restarts from here; time spent paused is not caught up.
        if !was_running && self.session.state() == SessionState::Running {
            self.ticks.reset();
        }
        if events.is_empty() {
            tracing::debug!(state = ?self.session.state(), "command ignored in current state");
        }
        self.dispatch_all(events);
    }

    fn dispatch_all(&mut self, events: Vec<Event>) {
        for event in events {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: Event) {
        tracing::debug!(kind = event.kind(), "focus event");

        if let Event::TaskCompleted { task_id, .. } = &event {
            let sink = Arc::clone(&self.sink);
            let task_id = task_id.clone();
            self.pending.spawn_blocking(move || {
                if let Err(e) = sink.mark_completed(&task_id) {
                    tracing::warn!(task_id = %task_id, error = %e, "failed to record completion");
                }
            });
        }

        if let Some(text) = message_for(&event) {
            let narrator = &self.narrator;
            let spoken = panic::catch_unwind(AssertUnwindSafe(|| {
                narrator.cancel();
                narrator.speak(&text)
            }));
            match spoken {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "narration failed"),
                Err(_) => tracing::warn!(kind = event.kind(), "narrator panicked"),
            }
        }

        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                self.events = None;
            }
        }
    }
}
