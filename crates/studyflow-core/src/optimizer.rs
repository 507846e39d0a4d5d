//! Task phrasing suggestions.
//!
//! The ranking and focus core never depend on this; it is a pluggable
//! capability the CLI exposes. [`TemplateOptimizer`] is the built-in,
//! deterministic implementation.

use serde::{Deserialize, Serialize};

use crate::task::Priority;

/// One rewritten version of a task with the reason behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub original: String,
    pub optimized: String,
    pub reasoning: String,
    pub priority: Priority,
}

pub trait Optimizer {
    /// Suggestions for `text`. Blank input yields none.
    fn optimize(&self, text: &str) -> Vec<Suggestion>;
}

/// Applies a fixed set of productivity templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateOptimizer;

const TEMPLATES: [(&str, &str, Priority); 3] = [
    (
        "Break into 25-minute focused sessions",
        "Short focused blocks keep attention high",
        Priority::Medium,
    ),
    (
        "Create checklist of subtasks first",
        "Breaking down complex tasks improves completion rate",
        Priority::High,
    ),
    (
        "Schedule for your peak energy time",
        "Timing tasks with energy levels maximizes efficiency",
        Priority::Medium,
    ),
];

impl Optimizer for TemplateOptimizer {
    fn optimize(&self, text: &str) -> Vec<Suggestion> {
        let original = text.trim();
        if original.is_empty() {
            return Vec::new();
        }
        TEMPLATES
            .iter()
            .map(|(advice, reasoning, priority)| Suggestion {
                original: original.to_string(),
                optimized: format!("{original} - {advice}"),
                reasoning: (*reasoning).to_string(),
                priority: *priority,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_three_templated_suggestions() {
        let out = TemplateOptimizer.optimize("  Study for chemistry quiz ");
        assert_eq!(out.len(), 3);
        assert!(out
            .iter()
            .all(|s| s.original == "Study for chemistry quiz"));
        assert!(out[1].optimized.ends_with("Create checklist of subtasks first"));
        assert_eq!(out[1].priority, Priority::High);
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(TemplateOptimizer.optimize("   ").is_empty());
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(
            TemplateOptimizer.optimize("Read"),
            TemplateOptimizer.optimize("Read")
        );
    }
}
