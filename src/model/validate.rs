use thiserror::Error;

use crate::model::task::Task;

pub const MAX_CONTENT_CHARS: usize = 200;
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// A rule a task breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("task content is empty")]
    EmptyContent,
    #[error("task content exceeds 200 characters ({0})")]
    ContentTooLong(usize),
    #[error("estimated duration must be greater than zero")]
    ZeroDuration,
    #[error("estimated duration exceeds 24 hours ({0} minutes)")]
    DurationTooLong(u32),
}

/// Check a task before it is accepted. An empty result means valid.
pub fn validate_task(task: &Task) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let chars = task.content.trim().chars().count();
    if chars == 0 {
        issues.push(ValidationIssue::EmptyContent);
    } else if chars > MAX_CONTENT_CHARS {
        issues.push(ValidationIssue::ContentTooLong(chars));
    }
    if task.estimated_duration == 0 {
        issues.push(ValidationIssue::ZeroDuration);
    } else if task.estimated_duration > MAX_DURATION_MINUTES {
        issues.push(ValidationIssue::DurationTooLong(task.estimated_duration));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_task_text;
    use chrono::NaiveDate;

    fn task(text: &str) -> Task {
        let now = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        Task::from_parsed(parse_task_text(text), now)
    }

    #[test]
    fn valid_task_has_no_issues() {
        assert!(validate_task(&task("write report 2h")).is_empty());
    }

    #[test]
    fn token_only_line_is_empty_content() {
        assert_eq!(validate_task(&task("2h high")), vec![ValidationIssue::EmptyContent]);
    }

    #[test]
    fn limits() {
        let long = "x".repeat(201);
        assert_eq!(validate_task(&task(&long)), vec![ValidationIssue::ContentTooLong(201)]);
        assert_eq!(
            validate_task(&task("marathon 25h")),
            vec![ValidationIssue::DurationTooLong(1500)]
        );
        let mut zero = task("x");
        zero.estimated_duration = 0;
        assert_eq!(validate_task(&zero), vec![ValidationIssue::ZeroDuration]);
        let exactly = "y".repeat(200);
        assert!(validate_task(&task(&exactly)).is_empty());
    }
}
