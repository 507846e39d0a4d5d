//! Task ranking engine.
//!
//! Turns the incomplete tasks of a list into a deterministic "do this first"
//! order with a short explanation per entry.
//!
//! ## Score
//!
//! ```text
//! priority = weight(priority) * 10            high=3, medium=2, low=1
//! urgency  = ceiling - clamp(days_until_due, 0, ceiling)   no due date => 0
//! effort   = hours_ceiling - min(minutes / 60, hours_ceiling)
//! score    = priority + urgency + effort
//! ```
//!
//! Entries are ordered by descending score; equal scores keep their input
//! order. Ranking is a pure function of the task list and the evaluation
//! instant, so two calls with the same inputs produce identical output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::task::{Priority, Task, DEFAULT_DURATION_MINUTES};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Days until due at or below which a deadline counts as urgent.
const URGENT_WITHIN_DAYS: i64 = 2;
const QUICK_WIN_MAX_MINUTES: u32 = 30;
const FOCUS_BLOCK_MIN_MINUTES: u32 = 120;

/// Normalization ceilings for the score terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Due dates further out than this many days are all equally non-urgent.
    pub urgency_ceiling_days: f64,
    /// Estimates longer than this many hours get no effort bonus.
    pub effort_ceiling_hours: f64,
    /// Estimate assumed for tasks without one.
    pub default_duration_minutes: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            urgency_ceiling_days: 10.0,
            effort_ceiling_hours: 5.0,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

/// Human-readable justification attached to a ranked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonTag {
    HighPriority,
    UrgentDeadline,
    QuickWin,
    NeedsFocusBlock,
    BestMorningEnergy,
    EndOfDayTask,
    OptimalScheduling,
}

impl ReasonTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonTag::HighPriority => "high priority",
            ReasonTag::UrgentDeadline => "urgent deadline",
            ReasonTag::QuickWin => "quick win",
            ReasonTag::NeedsFocusBlock => "needs focus block",
            ReasonTag::BestMorningEnergy => "best morning energy",
            ReasonTag::EndOfDayTask => "end of day task",
            ReasonTag::OptimalScheduling => "optimal scheduling",
        }
    }
}

impl fmt::Display for ReasonTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReasonTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Individual score terms, kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreTerms {
    pub priority: f64,
    pub urgency: f64,
    pub effort: f64,
}

impl ScoreTerms {
    pub fn total(&self) -> f64 {
        self.priority + self.urgency + self.effort
    }
}

/// One task's place in a ranking. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub task: Task,
    /// Higher means do sooner.
    pub score: f64,
    pub terms: ScoreTerms,
    /// Zero-based rank index.
    pub position: usize,
    pub reasoning: Vec<ReasonTag>,
    /// Minutes used for this entry (estimate or configured fallback).
    pub duration_minutes: u32,
}

impl RankedEntry {
    pub fn task_id(&self) -> &str {
        &self.task.id
    }

    /// Reasoning joined for display, e.g. `high priority • quick win`.
    pub fn reasoning_line(&self) -> String {
        self.reasoning
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

/// An immutable ranking that can be shared between observers.
pub type Ranking = Arc<[RankedEntry]>;

/// Ranking engine with configurable ceilings.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: RankingConfig,
}

impl Ranker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank the incomplete tasks in `tasks` as of `now`.
    ///
    /// Completed tasks are dropped. Never fails: missing optional fields
    /// fall back to defaults.
    pub fn rank(&self, tasks: &[Task], now: DateTime<Utc>) -> Vec<RankedEntry> {
        let mut scored: Vec<(&Task, ScoreTerms, u32)> = tasks
            .iter()
            .filter(|t| !t.completed)
            .map(|t| {
                let minutes = t
                    .estimated_duration_minutes
                    .unwrap_or(self.config.default_duration_minutes);
                (t, self.score_terms(t, minutes, now), minutes)
            })
            .collect();

        // `sort_by` is stable, so equal scores keep input order.
        scored.sort_by(|a, b| b.1.total().total_cmp(&a.1.total()));

        let total = scored.len();
        scored
            .into_iter()
            .enumerate()
            .map(|(position, (task, terms, minutes))| RankedEntry {
                reasoning: reasoning(task, minutes, position, total, now),
                task: task.clone(),
                score: terms.total(),
                terms,
                position,
                duration_minutes: minutes,
            })
            .collect()
    }

    fn score_terms(&self, task: &Task, minutes: u32, now: DateTime<Utc>) -> ScoreTerms {
        let ceiling_days = self.config.urgency_ceiling_days.max(0.0);
        let urgency_days = match task.due_at {
            Some(due) => fractional_days(due, now).clamp(0.0, ceiling_days),
            None => ceiling_days,
        };

        let ceiling_hours = self.config.effort_ceiling_hours.max(0.0);
        let hours = f64::from(minutes) / 60.0;

        ScoreTerms {
            priority: f64::from(task.priority.weight()) * 10.0,
            urgency: ceiling_days - urgency_days,
            effort: ceiling_hours - hours.min(ceiling_hours),
        }
    }
}

/// Rank with the default ceilings.
pub fn rank(tasks: &[Task], now: DateTime<Utc>) -> Vec<RankedEntry> {
    Ranker::default().rank(tasks, now)
}

fn fractional_days(due: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (due - now).num_milliseconds() as f64 / MILLIS_PER_DAY
}

fn reasoning(
    task: &Task,
    minutes: u32,
    position: usize,
    total: usize,
    now: DateTime<Utc>,
) -> Vec<ReasonTag> {
    let mut tags = Vec::new();

    if task.priority == Priority::High {
        tags.push(ReasonTag::HighPriority);
    }

    if let Some(due) = task.due_at {
        let days_until_due = fractional_days(due, now).ceil() as i64;
        if days_until_due <= URGENT_WITHIN_DAYS {
            tags.push(ReasonTag::UrgentDeadline);
        }
    }

    if minutes <= QUICK_WIN_MAX_MINUTES {
        tags.push(ReasonTag::QuickWin);
    } else if minutes >= FOCUS_BLOCK_MIN_MINUTES {
        tags.push(ReasonTag::NeedsFocusBlock);
    }

    if position == 0 {
        tags.push(ReasonTag::BestMorningEnergy);
    }
    if position + 1 == total {
        tags.push(ReasonTag::EndOfDayTask);
    }

    if tags.is_empty() {
        tags.push(ReasonTag::OptimalScheduling);
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
    }

    fn task(id: &str, priority: Priority) -> Task {
        let mut t = Task::new(format!("task {id}")).with_priority(priority);
        t.id = id.to_string();
        t
    }

    #[test]
    fn empty_input_gives_empty_ranking() {
        assert!(rank(&[], now()).is_empty());
    }

    #[test]
    fn high_priority_quick_urgent_task_ranks_first() {
        let a = task("a", Priority::High)
            .with_due_at(now() + Duration::days(1))
            .with_estimate(30);
        let b = task("b", Priority::Low)
            .with_due_at(now() + Duration::days(10))
            .with_estimate(120);

        let ranked = rank(&[b.clone(), a.clone()], now());
        assert_eq!(ranked[0].task_id(), "a");
        assert_eq!(ranked[1].task_id(), "b");
        assert_eq!(
            ranked[0].reasoning,
            vec![
                ReasonTag::HighPriority,
                ReasonTag::UrgentDeadline,
                ReasonTag::QuickWin,
                ReasonTag::BestMorningEnergy,
            ]
        );
        assert_eq!(
            ranked[1].reasoning,
            vec![ReasonTag::NeedsFocusBlock, ReasonTag::EndOfDayTask]
        );
    }

    #[test]
    fn score_formula_matches_terms() {
        let t = task("a", Priority::Medium)
            .with_due_at(now() + Duration::days(4))
            .with_estimate(90);
        let ranked = rank(&[t], now());
        let e = &ranked[0];
        assert_eq!(e.terms.priority, 20.0);
        assert!((e.terms.urgency - 6.0).abs() < 1e-9);
        assert!((e.terms.effort - 3.5).abs() < 1e-9);
        assert!((e.score - 29.5).abs() < 1e-9);
    }

    #[test]
    fn missing_due_date_is_least_urgent() {
        let t = task("a", Priority::Low);
        let ranked = rank(&[t], now());
        assert_eq!(ranked[0].terms.urgency, 0.0);
        // Default estimate of 60 minutes.
        assert_eq!(ranked[0].duration_minutes, 60);
        assert_eq!(ranked[0].terms.effort, 4.0);
    }

    #[test]
    fn overdue_task_clamps_to_zero_days() {
        let t = task("a", Priority::Low).with_due_at(now() - Duration::days(3));
        let ranked = rank(&[t], now());
        assert_eq!(ranked[0].terms.urgency, 10.0);
        assert!(ranked[0].reasoning.contains(&ReasonTag::UrgentDeadline));
    }

    #[test]
    fn completed_tasks_are_dropped() {
        let mut done = task("done", Priority::High);
        done.completed = true;
        let open = task("open", Priority::Low);
        let ranked = rank(&[done, open], now());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].task_id(), "open");
    }

    #[test]
    fn ties_keep_input_order() {
        let tasks: Vec<Task> = ["x", "y", "z"]
            .iter()
            .map(|id| task(id, Priority::Medium).with_estimate(45))
            .collect();
        let ranked = rank(&tasks, now());
        let ids: Vec<_> = ranked.iter().map(|e| e.task_id()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
        let positions: Vec<_> = ranked.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn middle_entry_without_signals_is_optimal_scheduling() {
        let tasks = vec![
            task("a", Priority::High).with_estimate(60),
            task("b", Priority::Medium).with_estimate(60),
            task("c", Priority::Low).with_estimate(60),
        ];
        let ranked = rank(&tasks, now());
        assert_eq!(ranked[1].reasoning, vec![ReasonTag::OptimalScheduling]);
    }

    #[test]
    fn single_entry_is_both_first_and_last() {
        let ranked = rank(&[task("solo", Priority::Medium).with_estimate(60)], now());
        assert_eq!(
            ranked[0].reasoning,
            vec![ReasonTag::BestMorningEnergy, ReasonTag::EndOfDayTask]
        );
    }

    #[test]
    fn configured_ceilings_change_terms() {
        let ranker = Ranker::with_config(RankingConfig {
            urgency_ceiling_days: 20.0,
            effort_ceiling_hours: 2.0,
            default_duration_minutes: 30,
        });
        let t = task("a", Priority::Low).with_due_at(now() + Duration::days(15));
        let ranked = ranker.rank(&[t], now());
        assert!((ranked[0].terms.urgency - 5.0).abs() < 1e-9);
        assert!((ranked[0].terms.effort - 1.5).abs() < 1e-9);
        assert_eq!(ranked[0].duration_minutes, 30);
    }

    #[test]
    fn reasoning_serializes_as_strings() {
        let ranked = rank(&[task("a", Priority::High).with_estimate(20)], now());
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["reasoning"][0], "high priority");
        assert_eq!(json["reasoning"][1], "quick win");
    }
}
