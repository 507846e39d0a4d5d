//! Tick sources for driving a focus session.
//!
//! A [`TickSource`] yields one tick per elapsed second. The runner only polls
//! it while the session is running and calls [`TickSource::reset`] whenever
//! the countdown restarts or resumes, so time spent paused is never caught up.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

pub trait TickSource: Send {
    /// Wait for the next tick. Returns `false` once the source is exhausted.
    fn tick(&mut self) -> impl Future<Output = bool> + Send;

    /// Drop any backlog and restart the period from now.
    fn reset(&mut self);
}

/// Wall-clock ticks backed by `tokio::time::interval`.
#[derive(Debug)]
pub struct IntervalTicks {
    interval: Interval,
}

impl IntervalTicks {
    /// One tick per second.
    pub fn every_second() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl TickSource for IntervalTicks {
    fn tick(&mut self) -> impl Future<Output = bool> + Send {
        async move {
            self.interval.tick().await;
            true
        }
    }

    fn reset(&mut self) {
        self.interval.reset();
    }
}

/// Ticks delivered on demand, for tests and scripted runs.
#[derive(Debug)]
pub struct ManualTicks {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Sending half of [`ManualTicks`].
#[derive(Debug, Clone)]
pub struct ManualClock {
    tx: mpsc::UnboundedSender<()>,
}

impl ManualTicks {
    pub fn new() -> (ManualClock, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ManualClock { tx }, Self { rx })
    }
}

impl ManualClock {
    /// Queue `secs` ticks. Returns `false` if the runner is gone.
    pub fn advance(&self, secs: u64) -> bool {
        (0..secs).all(|_| self.tx.send(()).is_ok())
    }
}

impl TickSource for ManualTicks {
    fn tick(&mut self) -> impl Future<Output = bool> + Send {
        async move { self.rx.recv().await.is_some() }
    }

    fn reset(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}
