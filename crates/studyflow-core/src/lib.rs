//! # StudyFlow Core Library
//!
//! Core logic for the StudyFlow student dashboard. Every operation is
//! available through the standalone `studyflow` CLI; this crate holds the
//! parts that do not depend on any surface.
//!
//! ## Architecture
//!
//! - **Ranking**: a pure, deterministic weighted sort of incomplete tasks with
//!   human-readable reasoning tags
//! - **Focus timer**: a sequential state machine that walks the ranked queue,
//!   driven by an async runner that owns the clock and the side effects
//! - **Narration**: short spoken lines for every session transition
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`Ranker`]: scores and orders tasks
//! - [`FocusSession`]: focus session state machine
//! - [`FocusRunner`]: drives a session from ticks and user commands
//! - [`Narrator`] / [`CompletionSink`]: effect seams used by the runner
//! - [`TaskRepository`]: task and project CRUD over a [`KeyValueStore`]
//! - [`Config`]: application configuration management

pub mod completion;
pub mod error;
pub mod events;
pub mod narration;
pub mod optimizer;
pub mod plan;
pub mod ranking;
pub mod storage;
pub mod task;
pub mod timer;

pub use completion::{CompletionSink, RepositoryCompletionSink};
pub use error::{ConfigError, CoreError, DatabaseError, NarrationError, ValidationError};
pub use events::Event;
pub use narration::{
    message_for, select_preferred_voice, CommandNarrator, ConsoleNarrator, LogNarrator, Narrator,
    SilentNarrator, VoiceCriteria, VoiceInfo,
};
pub use optimizer::{Optimizer, Suggestion, TemplateOptimizer};
pub use plan::FlowPlan;
pub use ranking::{rank, RankedEntry, Ranker, RankingConfig, Ranking, ReasonTag};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use task::{Priority, Project, ProjectTally, Task, TaskRepository, TaskSummary};
pub use timer::{
    FocusCommand, FocusHandle, FocusRunner, FocusSession, IntervalTicks, ManualClock, ManualTicks,
    SessionOptions, SessionState, StartOutcome, TickSource,
};
