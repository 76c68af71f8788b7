use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlannerError, Result};
use crate::model::time::{TimeOfDay, TimelineSpan};
use crate::parser::ParsedTask;

/// Task priority. Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Accepted spellings, two per level.
    pub const ALIASES: &'static [(&'static str, Priority)] = &[
        ("high", Priority::High),
        ("高", Priority::High),
        ("medium", Priority::Medium),
        ("中", Priority::Medium),
        ("low", Priority::Low),
        ("低", Priority::Low),
    ];

    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Look up a spelling, ignoring case.
    pub fn from_alias(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALIASES
            .iter()
            .find(|(alias, _)| *alias == s)
            .map(|(_, p)| *p)
    }

    /// Sort weight: high = 3, medium = 2, low = 1.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High priority",
            Self::Medium => "Medium priority",
            Self::Low => "Low priority",
        }
    }
}

/// Lifecycle of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Display classification of a free-text category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Work,
    Study,
    Life,
    Exercise,
    Other,
}

impl Category {
    const ALIASES: &'static [(&'static str, Category)] = &[
        ("work", Category::Work),
        ("工作", Category::Work),
        ("study", Category::Study),
        ("学习", Category::Study),
        ("life", Category::Life),
        ("生活", Category::Life),
        ("exercise", Category::Exercise),
        ("sport", Category::Exercise),
        ("运动", Category::Exercise),
        ("other", Category::Other),
        ("其他", Category::Other),
    ];

    /// Classify a category name; unknown names are `Other`.
    pub fn classify(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        Self::ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, c)| *c)
            .unwrap_or(Category::Other)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Study => "Study",
            Self::Life => "Life",
            Self::Exercise => "Exercise",
            Self::Other => "Other",
        }
    }
}

/// A user task, optionally placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub content: String,
    pub category: String,
    pub priority: Priority,
    /// Estimated duration in minutes.
    pub estimated_duration: u32,
    #[serde(default)]
    pub deadline: Option<NaiveDateTime>,
    #[serde(default)]
    pub scheduled_start: Option<NaiveDateTime>,
    #[serde(default)]
    pub scheduled_end: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
}

impl Task {
    /// Create a pending, unscheduled task from parser output.
    pub fn from_parsed(parsed: ParsedTask, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: parsed.content,
            category: parsed.category,
            priority: parsed.priority,
            estimated_duration: parsed.estimated_duration_minutes,
            deadline: parsed.deadline,
            scheduled_start: None,
            scheduled_end: None,
            status: TaskStatus::Pending,
            created_at: now,
            completed_at: None,
        }
    }

    pub fn category_kind(&self) -> Category {
        Category::classify(&self.category)
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Whether the scheduled window starts on `date`.
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.scheduled_start.is_some_and(|s| s.date() == date)
    }

    /// Start and end time of day of the scheduled window.
    pub fn scheduled_times(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        let start = self.scheduled_start?;
        let end = self.scheduled_end?;
        Some((TimeOfDay::from(start.time()), TimeOfDay::from(end.time())))
    }

    /// Place the task on `date` over `span`. The window must fit in the day.
    pub fn schedule(&mut self, date: NaiveDate, span: TimelineSpan) -> Result<()> {
        if !span.fits_in_day() {
            return Err(PlannerError::OutsideDay {
                start: span.start_time(),
                minutes: span.duration_minutes,
            });
        }
        self.scheduled_start = Some(date.and_time(span.start_time().to_naive_time()));
        self.scheduled_end = Some(date.and_time(span.end_time().to_naive_time()));
        Ok(())
    }

    pub fn unschedule(&mut self) {
        self.scheduled_start = None;
        self.scheduled_end = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_aliases_map_to_three_levels() {
        assert_eq!(Priority::from_alias("HIGH"), Some(Priority::High));
        assert_eq!(Priority::from_alias("高"), Some(Priority::High));
        assert_eq!(Priority::from_alias("中"), Some(Priority::Medium));
        assert_eq!(Priority::from_alias("Low"), Some(Priority::Low));
        assert_eq!(Priority::from_alias("urgent"), None);
        assert!(Priority::High > Priority::Medium && Priority::Medium > Priority::Low);
    }

    #[test]
    fn category_classification_falls_back_to_other() {
        assert_eq!(Category::classify("Study"), Category::Study);
        assert_eq!(Category::classify("学习"), Category::Study);
        assert_eq!(Category::classify("gardening"), Category::Other);
    }

    #[test]
    fn schedule_places_task_on_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let now = date.and_hms_opt(8, 0, 0).unwrap();
        let mut task = Task::from_parsed(crate::parser::parse_task_text("gym 45m"), now);
        task.schedule(date, TimelineSpan { start_minutes: 18 * 60, duration_minutes: 45 })
            .unwrap();
        assert!(task.is_scheduled_on(date));
        let (start, end) = task.scheduled_times().unwrap();
        assert_eq!(start.to_string(), "18:00");
        assert_eq!(end.to_string(), "18:45");
        task.unschedule();
        assert!(!task.is_scheduled_on(date));
    }

    #[test]
    fn window_running_past_midnight_is_refused() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let now = date.and_hms_opt(8, 0, 0).unwrap();
        let mut task = Task::from_parsed(crate::parser::parse_task_text("late call 1h"), now);
        let err = task
            .schedule(date, TimelineSpan { start_minutes: 23 * 60 + 30, duration_minutes: 60 })
            .unwrap_err();
        assert!(matches!(err, PlannerError::OutsideDay { minutes: 60, .. }));
        assert_eq!(task.scheduled_start, None);

        task.schedule(date, TimelineSpan { start_minutes: 22 * 60 + 59, duration_minutes: 60 })
            .unwrap();
        assert_eq!(task.scheduled_times().unwrap().1.to_string(), "23:59");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
