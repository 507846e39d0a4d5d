mod clock;
mod runner;
mod session;

pub use clock::{IntervalTicks, ManualClock, ManualTicks, TickSource};
pub use runner::{FocusCommand, FocusHandle, FocusRunner};
pub use session::{FocusSession, SessionOptions, SessionState, StartOutcome};

use crate::storage::TimerConfig;

impl From<&TimerConfig> for SessionOptions {
    fn from(config: &TimerConfig) -> Self {
        Self {
            first_task_secs: config.first_task_secs,
        }
    }
}
