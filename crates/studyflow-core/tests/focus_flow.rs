//! End-to-end focus flow: ranked tasks from a SQLite-backed repository,
//! driven by the runner, with completions written back to the database.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use proptest::prelude::*;
use studyflow_core::error::NarrationError;
use studyflow_core::{
    rank, Database, Event, FocusRunner, FocusSession, ManualTicks, Narrator, Priority,
    RepositoryCompletionSink, SessionOptions, SessionState, Task, TaskRepository,
};

#[derive(Default)]
struct Transcript(Mutex<Vec<String>>);

impl Narrator for Transcript {
    fn speak(&self, text: &str) -> Result<(), NarrationError> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn completions_reach_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("studyflow.db")).unwrap();
    let repo = TaskRepository::new(db);
    repo.seed_demo_data(Utc::now()).unwrap();

    let ranking = rank(&repo.list_tasks().unwrap(), Utc::now());
    assert_eq!(ranking.len(), 3);
    let first_id = ranking[0].task.id.clone();
    let second_title = ranking[1].task.title.clone();

    let transcript = Arc::new(Transcript::default());
    let sink = Arc::new(RepositoryCompletionSink::new(repo));
    let (clock, ticks) = ManualTicks::new();
    let (mut runner, handle) = FocusRunner::new(
        FocusSession::new(
            ranking,
            SessionOptions {
                first_task_secs: Some(10),
            },
        ),
        ticks,
        transcript.clone(),
        sink.clone(),
    );
    let mut events = runner.subscribe();
    let join = tokio::spawn(runner.run());

    // First task runs out on its own; the second is skipped; the last is completed by hand.
    clock.advance(10);
    handle.snapshot().await.unwrap();
    handle.skip().await;
    handle.complete_current().await;

    let session = join.await.unwrap();
    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(session.completed_task_ids().len(), 2);

    let mut finished = 0;
    while let Some(event) = events.recv().await {
        if matches!(event, Event::SessionCompleted { .. }) {
            finished += 1;
        }
    }
    assert_eq!(finished, 1);

    let stored = sink.with_repo(|r| r.list_tasks()).unwrap();
    let done: Vec<_> = stored.iter().filter(|t| t.completed).map(|t| t.id.clone()).collect();
    // Two from this session plus the one seeded as already done.
    assert_eq!(done.len(), 3);
    assert!(done.contains(&first_id));

    let lines = transcript.0.lock().unwrap();
    assert!(lines[1].contains(&second_title));
    assert!(lines.last().unwrap().contains("complete"));
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Tick,
    Pause,
    Resume,
    Skip,
    Complete,
    Start,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => Just(Action::Tick),
        1 => Just(Action::Pause),
        1 => Just(Action::Resume),
        1 => Just(Action::Skip),
        1 => Just(Action::Complete),
        1 => Just(Action::Start),
    ]
}

fn short_queue(len: usize) -> FocusSession {
    let tasks: Vec<Task> = (0..len)
        .map(|i| {
            let mut t = Task::new(format!("Task {i}")).with_priority(Priority::Medium);
            t.id = format!("t{i}");
            t.estimated_duration_minutes = Some(1);
            t
        })
        .collect();
    FocusSession::new(
        rank(&tasks, Utc::now()),
        SessionOptions {
            first_task_secs: Some(3),
        },
    )
}

proptest! {
    #[test]
    fn prop_countdown_stays_in_bounds(
        len in 1usize..5,
        actions in prop::collection::vec(action(), 0..200),
    ) {
        let mut session = short_queue(len);
        session.start();
        for action in actions {
            let before = session.completed_task_ids().len();
            let events = match action {
                Action::Tick => session.tick(),
                Action::Pause => session.pause(),
                Action::Resume => session.resume(),
                Action::Skip => session.skip(),
                Action::Complete => session.complete_current(),
                Action::Start => session.start().into_events(),
            };
            if matches!(action, Action::Skip) {
                prop_assert_eq!(session.completed_task_ids().len(), before);
                let skip_completed_task = events.iter().any(|e| matches!(e, Event::TaskCompleted { .. }));
                prop_assert!(!skip_completed_task);
            }
            prop_assert!(session.current_index() < len);
            prop_assert!(session.remaining_secs() <= session.allocated_secs());
            let pct = session.progress_pct();
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }

    #[test]
    fn prop_completing_every_entry_finishes(len in 1usize..8) {
        let mut session = short_queue(len);
        session.start();
        for _ in 0..len {
            prop_assert!(!session.complete_current().is_empty());
        }
        prop_assert_eq!(session.state(), SessionState::Completed);
        let mut ids = session.completed_task_ids().to_vec();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), len);
    }
}
