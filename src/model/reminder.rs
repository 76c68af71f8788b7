//! Time-driven nudges shown in the assistant panel.
//!
//! Everything here takes `now` explicitly so the caller decides the clock.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use uuid::Uuid;

use crate::model::task::{Priority, Task};
use crate::model::time::TimeOfDay;

const DEADLINE_WINDOW_HOURS: i64 = 24;
const DEADLINE_URGENT_HOURS: i64 = 3;
const START_WINDOW_MINUTES: i64 = 5;
const QUICK_TASK_MINUTES: u32 = 30;
const SUGGESTION_SAMPLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    Deadline,
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub kind: ReminderKind,
    pub task_id: Uuid,
    pub message: String,
    pub urgency: Urgency,
}

/// Reminders for pending tasks: deadlines within a day, starts within five minutes.
pub fn task_reminders(tasks: &[Task], now: NaiveDateTime) -> Vec<Reminder> {
    let mut reminders = Vec::new();
    for task in tasks.iter().filter(|t| t.is_pending()) {
        if let Some(deadline) = task.deadline {
            let left = deadline - now;
            if left > Duration::zero() && left <= Duration::hours(DEADLINE_WINDOW_HOURS) {
                reminders.push(Reminder {
                    kind: ReminderKind::Deadline,
                    task_id: task.id,
                    message: format!("\"{}\" is due in {} hours", task.content, left.num_hours()),
                    urgency: if left <= Duration::hours(DEADLINE_URGENT_HOURS) {
                        Urgency::High
                    } else {
                        Urgency::Medium
                    },
                });
            }
        }
        if let Some(start) = task.scheduled_start {
            let left = start - now;
            if left > Duration::zero() && left <= Duration::minutes(START_WINDOW_MINUTES) {
                reminders.push(Reminder {
                    kind: ReminderKind::Start,
                    task_id: task.id,
                    message: format!("\"{}\" starts soon", task.content),
                    urgency: Urgency::High,
                });
            }
        }
    }
    reminders
}

/// Reminders already shown, so each one fires once while it stays due.
#[derive(Debug, Clone, Default)]
pub struct ReminderLog {
    shown: HashSet<(Uuid, ReminderKind)>,
}

impl ReminderLog {
    /// Reminders due at `now` that have not been shown yet.
    ///
    /// Entries whose reminder is no longer due (task done or deleted, deadline
    /// or start passed) are forgotten.
    pub fn fresh(&mut self, tasks: &[Task], now: NaiveDateTime) -> Vec<Reminder> {
        let due = task_reminders(tasks, now);
        let keys: HashSet<(Uuid, ReminderKind)> = due.iter().map(|r| (r.task_id, r.kind)).collect();
        self.shown.retain(|key| keys.contains(key));
        due.into_iter()
            .filter(|r| self.shown.insert((r.task_id, r.kind)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    HighPriority,
    DueSoon,
    Quick,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: String,
    pub task_ids: Vec<Uuid>,
}

/// Planning hints over pending tasks.
pub fn suggestions(tasks: &[Task], now: NaiveDateTime) -> Vec<Suggestion> {
    let pending: Vec<&Task> = tasks.iter().filter(|t| t.is_pending()).collect();
    let mut out = Vec::new();

    let high: Vec<&Task> = pending
        .iter()
        .copied()
        .filter(|t| t.priority == Priority::High)
        .collect();
    if !high.is_empty() {
        out.push(Suggestion {
            kind: SuggestionKind::HighPriority,
            message: format!("You have {} high-priority tasks open", high.len()),
            task_ids: high.iter().take(SUGGESTION_SAMPLE).map(|t| t.id).collect(),
        });
    }

    let due: Vec<Uuid> = pending
        .iter()
        .filter(|t| {
            t.deadline.is_some_and(|d| {
                let left = d - now;
                left > Duration::zero() && left <= Duration::hours(DEADLINE_WINDOW_HOURS)
            })
        })
        .map(|t| t.id)
        .collect();
    if !due.is_empty() {
        out.push(Suggestion {
            kind: SuggestionKind::DueSoon,
            message: format!("{} tasks are due within a day", due.len()),
            task_ids: due,
        });
    }

    let quick: Vec<Uuid> = pending
        .iter()
        .filter(|t| t.estimated_duration <= QUICK_TASK_MINUTES)
        .take(SUGGESTION_SAMPLE)
        .map(|t| t.id)
        .collect();
    if !quick.is_empty() {
        out.push(Suggestion {
            kind: SuggestionKind::Quick,
            message: format!("These can be done in {} minutes or less", QUICK_TASK_MINUTES),
            task_ids: quick,
        });
    }

    out
}

/// Morning window is 06:00 to noon, once per calendar day.
pub fn morning_greeting_due(now: NaiveDateTime, last_greeting: Option<NaiveDate>) -> bool {
    (6..12).contains(&now.hour()) && last_greeting != Some(now.date())
}

/// Next time the evening review should fire: today at `at`, or tomorrow if already past.
pub fn next_sleep_reminder(now: NaiveDateTime, at: TimeOfDay) -> NaiveDateTime {
    let today = now.date().and_time(at.to_naive_time());
    if today < now {
        today + Duration::days(1)
    } else {
        today
    }
}

/// Tracks continuous activity and suggests a break after a long stretch.
#[derive(Debug, Clone)]
pub struct FocusTracker {
    focus_start: Option<NaiveDateTime>,
    last_activity: NaiveDateTime,
}

impl FocusTracker {
    /// Activity older than this ends a focus stretch.
    pub const IDLE_AFTER: Duration = Duration::minutes(5);
    /// Focus longer than this triggers a break suggestion.
    pub const BREAK_AFTER: Duration = Duration::minutes(90);

    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            focus_start: None,
            last_activity: now,
        }
    }

    pub fn record_activity(&mut self, now: NaiveDateTime) {
        self.last_activity = now;
    }

    /// Periodic check. Returns true once when a break is due.
    pub fn tick(&mut self, now: NaiveDateTime) -> bool {
        if now - self.last_activity >= Self::IDLE_AFTER {
            self.focus_start = None;
            return false;
        }
        let start = *self.focus_start.get_or_insert(now);
        if now - start > Self::BREAK_AFTER {
            self.focus_start = None;
            return true;
        }
        false
    }
}
