use crate::events::Event;

/// Narration line for an event, or `None` for events that stay silent.
pub fn message_for(event: &Event) -> Option<String> {
    match event {
        Event::SessionStarted {
            title,
            allocated_secs,
            ..
        } => Some(format!(
            "Initiating optimized workflow. Your first task: {title}. \
             Duration allocated: {}. Stay with it for the best results.",
            minutes_phrase(*allocated_secs)
        )),
        Event::TaskAdvanced {
            title,
            allocated_secs,
            skipped: false,
            ..
        } => Some(format!(
            "Excellent work. Task completed. Proceeding to next objective: {title}. \
             Time allocation: {}. Keep the momentum going.",
            minutes_phrase(*allocated_secs)
        )),
        Event::TaskAdvanced {
            title,
            skipped: true,
            ..
        } => Some(format!(
            "Advancing to next objective: {title}. Adjusting workflow sequence as requested."
        )),
        Event::SessionPaused { .. } => Some(
            "Workflow paused. A brief rest keeps you sharp. Resume when you are ready.".into(),
        ),
        Event::SessionResumed { .. } => {
            Some("Resuming workflow. Proceeding with the current objective.".into())
        }
        Event::SessionCompleted { .. } => Some(
            "Outstanding work. Every objective in your optimized workflow is complete. Well done."
                .into(),
        ),
        Event::TaskCompleted { .. } | Event::StateSnapshot { .. } => None,
    }
}

/// Seconds rounded up to whole minutes, e.g. `10` -> `"1 minute"`.
pub fn minutes_phrase(secs: u64) -> String {
    let minutes = secs.div_ceil(60);
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{minutes} minutes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn minutes_round_up() {
        assert_eq!(minutes_phrase(10), "1 minute");
        assert_eq!(minutes_phrase(60), "1 minute");
        assert_eq!(minutes_phrase(61), "2 minutes");
        assert_eq!(minutes_phrase(0), "0 minutes");
    }

    #[test]
    fn advance_names_next_task_and_duration() {
        let event = Event::TaskAdvanced {
            from_index: 0,
            to_index: 1,
            task_id: "t1".into(),
            title: "History essay".into(),
            allocated_secs: 3600,
            skipped: false,
            at: Utc::now(),
        };
        let line = message_for(&event).unwrap();
        assert!(line.contains("History essay"));
        assert!(line.contains("60 minutes"));
    }

    #[test]
    fn skip_uses_adjusting_line() {
        let event = Event::TaskAdvanced {
            from_index: 0,
            to_index: 1,
            task_id: "t1".into(),
            title: "Lab report".into(),
            allocated_secs: 600,
            skipped: true,
            at: Utc::now(),
        };
        let line = message_for(&event).unwrap();
        assert!(line.contains("Adjusting workflow sequence"));
    }

    #[test]
    fn completion_bookkeeping_is_silent() {
        let event = Event::TaskCompleted {
            task_id: "t0".into(),
            index: 0,
            at: Utc::now(),
        };
        assert!(message_for(&event).is_none());
    }
}
