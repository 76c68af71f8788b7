use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::task::{Priority, Task, TaskStatus};

/// Criteria for the task list. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub keyword: String,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.keyword.trim().is_empty()
    }

    /// Status, category and priority criteria. The keyword is left to [`search`].
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.category.as_deref().is_some_and(|c| c != task.category) {
            return false;
        }
        !self.priority.is_some_and(|p| p != task.priority)
    }

    /// Keyword search, then the remaining criteria.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        search(tasks, &self.keyword)
            .into_iter()
            .filter(|t| self.matches(t))
            .collect()
    }
}

/// Free-text search over content, category and priority label.
pub fn search<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return tasks.iter().collect();
    }
    tasks
        .iter()
        .filter(|t| {
            t.content.to_lowercase().contains(&query)
                || t.category.to_lowercase().contains(&query)
                || t.priority.label().to_lowercase().contains(&query)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Priority,
    Deadline,
    Created,
    Duration,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Priority,
        SortKey::Deadline,
        SortKey::Created,
        SortKey::Duration,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Priority => "Priority",
            Self::Deadline => "Deadline",
            Self::Created => "Newest",
            Self::Duration => "Duration",
        }
    }
}

/// Stable sort in place.
///
/// Priority: high first. Deadline: soonest first, none last.
/// Created: newest first. Duration: shortest first.
pub fn sort_tasks(tasks: &mut [&Task], key: SortKey) {
    match key {
        SortKey::Priority => tasks.sort_by_key(|t| Reverse(t.priority.rank())),
        SortKey::Deadline => tasks.sort_by_key(|t| (t.deadline.is_none(), t.deadline)),
        SortKey::Created => tasks.sort_by_key(|t| Reverse(t.created_at)),
        SortKey::Duration => tasks.sort_by_key(|t| t.estimated_duration),
    }
}

/// Aggregate counts over a task list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskStatistics {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub by_category: BTreeMap<String, usize>,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Estimated minutes across all tasks.
    pub total_minutes: u64,
    pub completed_minutes: u64,
}

impl TaskStatistics {
    pub fn collect(tasks: &[Task]) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Default::default()
        };
        for task in tasks {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::Completed => stats.completed += 1,
                _ => {}
            }
            *stats.by_category.entry(task.category.clone()).or_default() += 1;
            match task.priority {
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
            stats.total_minutes += u64::from(task.estimated_duration);
            if task.is_completed() {
                stats.completed_minutes += u64::from(task.estimated_duration);
            }
        }
        stats
    }

    /// Share of completed tasks, 0.0 when there are none.
    pub fn completion_ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_task_text;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn sample() -> Vec<Task> {
        let lines = [
            "write report 2h high [work]",
            "gym 45m low [exercise]",
            "read paper 30m [study]",
            "pay rent 10m high [life]",
        ];
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| Task::from_parsed(parse_task_text(l), base() + Duration::minutes(i as i64)))
            .collect()
    }

    #[test]
    fn filter_combines_criteria() {
        let mut tasks = sample();
        tasks[3].status = TaskStatus::Completed;

        let high = TaskFilter {
            priority: Some(Priority::High),
            ..Default::default()
        };
        assert_eq!(high.apply(&tasks).len(), 2);

        let pending_high = TaskFilter {
            status: Some(TaskStatus::Pending),
            ..high.clone()
        };
        let found = pending_high.apply(&tasks);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content, "write report");

        let keyword = TaskFilter {
            keyword: "  PAPER ".into(),
            ..Default::default()
        };
        assert_eq!(keyword.apply(&tasks)[0].category, "study");

        let category_word = TaskFilter {
            keyword: "life".into(),
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let found = category_word.apply(&tasks);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content, "pay rent");
        assert!(TaskFilter::default().is_empty());
        assert_eq!(TaskFilter::default().apply(&tasks).len(), 4);
    }

    #[test]
    fn search_looks_at_category_and_priority_label() {
        let tasks = sample();
        assert_eq!(search(&tasks, "exercise").len(), 1);
        assert_eq!(search(&tasks, "high priority").len(), 2);
        assert_eq!(search(&tasks, "   ").len(), 4);
    }

    #[test]
    fn sorting() {
        let mut tasks = sample();
        tasks[1].deadline = Some(base() + Duration::days(2));
        tasks[2].deadline = Some(base() + Duration::days(1));

        let mut refs: Vec<&Task> = tasks.iter().collect();
        sort_tasks(&mut refs, SortKey::Priority);
        let order: Vec<_> = refs.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(order, ["write report", "pay rent", "read paper", "gym"]);

        sort_tasks(&mut refs, SortKey::Deadline);
        assert_eq!(refs[0].content, "read paper");
        assert_eq!(refs[1].content, "gym");
        assert!(refs[2].deadline.is_none() && refs[3].deadline.is_none());

        sort_tasks(&mut refs, SortKey::Created);
        assert_eq!(refs[0].content, "pay rent");

        sort_tasks(&mut refs, SortKey::Duration);
        let minutes: Vec<_> = refs.iter().map(|t| t.estimated_duration).collect();
        assert_eq!(minutes, [10, 30, 45, 120]);
    }

    #[test]
    fn statistics() {
        let mut tasks = sample();
        tasks[0].status = TaskStatus::Completed;
        let stats = TaskStatistics::collect(&tasks);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.high, 2);
        assert_eq!(stats.medium, 1);
        assert_eq!(stats.low, 1);
        assert_eq!(stats.by_category.get("work"), Some(&1));
        assert_eq!(stats.total_minutes, 205);
        assert_eq!(stats.completed_minutes, 120);
        assert_eq!(stats.completion_ratio(), 0.25);
    }
}
