use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::model::Task;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn format_opt(value: Option<NaiveDateTime>) -> String {
    value
        .map(|v| v.format(DATE_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Export tasks to a semicolon-delimited CSV file.
///
/// Columns: Content ; Category ; Priority ; Duration ; Status ; Deadline ; Start ; End
/// Date-times are written as `YYYY-MM-DD HH:MM`, empty when unset.
/// Returns the number of tasks written.
pub fn export_csv(tasks: &[Task], path: &Path) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;

    wtr.write_record([
        "Content", "Category", "Priority", "Duration", "Status", "Deadline", "Start", "End",
    ])?;

    for task in tasks {
        wtr.write_record([
            task.content.as_str(),
            task.category.as_str(),
            task.priority.as_str(),
            &task.estimated_duration.to_string(),
            task.status.label(),
            &format_opt(task.deadline),
            &format_opt(task.scheduled_start),
            &format_opt(task.scheduled_end),
        ])?;
    }

    wtr.flush()?;
    Ok(tasks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_task_text;
    use chrono::NaiveDate;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");
        let day = NaiveDate::from_ymd_opt(2025, 7, 2).unwrap();
        let mut task = Task::from_parsed(
            parse_task_text("plan trip; book hotel 45m high [life]"),
            day.and_hms_opt(8, 0, 0).unwrap(),
        );
        task.scheduled_start = day.and_hms_opt(19, 0, 0);
        task.scheduled_end = day.and_hms_opt(19, 45, 0);

        assert_eq!(export_csv(&[task], &path).unwrap(), 1);
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Content;Category;Priority;Duration;Status;Deadline;Start;End")
        );
        assert_eq!(
            lines.next(),
            Some("\"plan trip; book hotel\";life;high;45;Pending;;2025-07-02 19:00;2025-07-02 19:45")
        );
    }
}
