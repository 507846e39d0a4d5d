//! Flow plan: a day-shaped view of a ranking.
//!
//! Each ranked entry becomes a node with a recommended start time, spaced
//! two hours apart from the configured day start, linked to the previous
//! node in sequence.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::ranking::RankedEntry;
use crate::task::Priority;

const SLOT_HOURS: i64 = 2;

const TIPS: [&str; 3] = [
    "Group similar tasks together to reduce context switching",
    "Take 15-minute breaks between high-priority items",
    "Schedule challenging tasks during your peak energy hours",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanNode {
    pub position: usize,
    pub task_id: String,
    pub title: String,
    pub priority: Priority,
    pub duration_minutes: u32,
    pub reasoning: String,
    pub recommended_start: NaiveDateTime,
    /// Task id of the node that comes before this one.
    pub depends_on: Option<String>,
}

impl PlanNode {
    /// Start time formatted like `9:00 AM`.
    pub fn start_label(&self) -> String {
        self.recommended_start.format("%-I:%M %p").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanConnection {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub total_hours: f64,
    pub suggested_schedule: String,
    pub optimization_tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowPlan {
    pub nodes: Vec<PlanNode>,
    pub connections: Vec<PlanConnection>,
    pub recommendations: Recommendations,
}

impl FlowPlan {
    /// Lay `ranking` out over the day starting at `day_start`.
    pub fn build(ranking: &[RankedEntry], day_start: NaiveDateTime) -> Self {
        let nodes: Vec<PlanNode> = ranking
            .iter()
            .enumerate()
            .map(|(i, entry)| PlanNode {
                position: entry.position,
                task_id: entry.task.id.clone(),
                title: entry.task.title.clone(),
                priority: entry.task.priority,
                duration_minutes: entry.duration_minutes,
                reasoning: entry.reasoning_line(),
                recommended_start: day_start + Duration::hours(SLOT_HOURS * i as i64),
                depends_on: i
                    .checked_sub(1)
                    .map(|prev| ranking[prev].task.id.clone()),
            })
            .collect();

        let connections = nodes
            .windows(2)
            .map(|pair| PlanConnection {
                from: pair[0].task_id.clone(),
                to: pair[1].task_id.clone(),
            })
            .collect();

        let total_minutes: u64 = ranking.iter().map(|e| u64::from(e.duration_minutes)).sum();
        let suggested_schedule = if ranking.is_empty() {
            "Nothing left to schedule"
        } else if ranking.iter().any(|e| e.task.priority == Priority::High) {
            "Tackle high-priority tasks in your morning focus sessions"
        } else {
            "Morning focus sessions work best for complex tasks"
        };

        Self {
            nodes,
            connections,
            recommendations: Recommendations {
                total_hours: total_minutes as f64 / 60.0,
                suggested_schedule: suggested_schedule.to_string(),
                optimization_tips: TIPS.iter().map(|t| t.to_string()).collect(),
            },
        }
    }

    /// Day start at `hour:00` on `date`. Hours past 23 clamp to 23.
    pub fn day_start(date: NaiveDate, hour: u32) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
        date.and_time(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank;
    use crate::task::Task;
    use chrono::Utc;

    fn day() -> NaiveDateTime {
        FlowPlan::day_start(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), 9)
    }

    #[test]
    fn nodes_are_two_hours_apart_and_chained() {
        let tasks = vec![
            Task::new("Math set").with_priority(Priority::High).with_estimate(120),
            Task::new("Notes").with_priority(Priority::Medium).with_estimate(60),
            Task::new("Reading").with_priority(Priority::Low).with_estimate(30),
        ];
        let ranking = rank(&tasks, Utc::now());
        let plan = FlowPlan::build(&ranking, day());

        assert_eq!(plan.nodes.len(), 3);
        assert_eq!(plan.nodes[0].start_label(), "9:00 AM");
        assert_eq!(plan.nodes[1].start_label(), "11:00 AM");
        assert_eq!(plan.nodes[2].start_label(), "1:00 PM");
        assert_eq!(plan.nodes[0].depends_on, None);
        assert_eq!(plan.nodes[1].depends_on.as_deref(), Some(plan.nodes[0].task_id.as_str()));
        assert_eq!(plan.connections.len(), 2);
        assert!((plan.recommendations.total_hours - 3.5).abs() < 1e-9);
        assert!(plan.recommendations.suggested_schedule.contains("high-priority"));
    }

    #[test]
    fn empty_ranking_gives_empty_plan() {
        let plan = FlowPlan::build(&[], day());
        assert!(plan.nodes.is_empty());
        assert!(plan.connections.is_empty());
        assert_eq!(plan.recommendations.total_hours, 0.0);
        assert_eq!(plan.recommendations.optimization_tips.len(), 3);
    }
}
