use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::model::validate::{validate_task, ValidationIssue};
use crate::model::{AppState, FixedSchedule, Task};

/// Everything the planner keeps between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerData {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub fixed_schedules: Vec<FixedSchedule>,
}

impl PlannerData {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            tasks: state.tasks.clone(),
            fixed_schedules: state.fixed_schedules.clone(),
        }
    }

    pub fn restore_into(self, state: &mut AppState) {
        state.tasks = self.tasks;
        state.fixed_schedules = self.fixed_schedules;
    }
}

/// Save planner data to a JSON file, creating parent directories.
pub fn save_data(data: &PlannerData, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load planner data. A missing file is an empty planner.
pub fn load_data(path: &Path) -> Result<PlannerData> {
    match std::fs::read_to_string(path) {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PlannerData::default()),
        Err(e) => Err(e.into()),
    }
}

#[derive(Serialize)]
struct ExportEnvelope<'a> {
    export_date: NaiveDateTime,
    total_tasks: usize,
    tasks: &'a [Task],
}

#[derive(Deserialize)]
struct ImportEnvelope {
    tasks: Vec<serde_json::Value>,
}

/// Write tasks wrapped in an export envelope. Returns the number written.
pub fn export_tasks(tasks: &[Task], path: &Path, now: NaiveDateTime) -> Result<usize> {
    let envelope = ExportEnvelope {
        export_date: now,
        total_tasks: tasks.len(),
        tasks,
    };
    std::fs::write(path, serde_json::to_string_pretty(&envelope)?)?;
    Ok(tasks.len())
}

/// A task entry that was not imported.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedTask {
    /// Position in the file's `tasks` array.
    pub index: usize,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    Malformed(String),
    Invalid(Vec<ValidationIssue>),
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub tasks: Vec<Task>,
    pub rejected: Vec<RejectedTask>,
}

/// Read an export envelope back. Each entry is decoded and validated on its own.
pub fn import_tasks(path: &Path) -> Result<ImportReport> {
    let json = std::fs::read_to_string(path)?;
    let envelope: ImportEnvelope = serde_json::from_str(&json)?;
    let mut report = ImportReport::default();

    for (index, value) in envelope.tasks.into_iter().enumerate() {
        let task: Task = match serde_json::from_value(value) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(index, "skipping malformed task: {}", e);
                report.rejected.push(RejectedTask {
                    index,
                    reason: RejectReason::Malformed(e.to_string()),
                });
                continue;
            }
        };
        let issues = validate_task(&task);
        if issues.is_empty() {
            report.tasks.push(task);
        } else {
            tracing::warn!(index, content = %task.content, ?issues, "skipping invalid task");
            report.rejected.push(RejectedTask {
                index,
                reason: RejectReason::Invalid(issues),
            });
        }
    }

    if report.tasks.is_empty() && !report.rejected.is_empty() {
        return Err(PlannerError::EmptyImport(format!(
            "no valid tasks ({} rejected)",
            report.rejected.len()
        )));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_task_text;
    use chrono::{NaiveDate, Weekday};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap().and_hms_opt(18, 30, 0).unwrap()
    }

    #[test]
    fn planner_data_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("planner.json");
        let mut state = AppState::new(now().date());
        state.add_task(parse_task_text("water plants 10m low [life]"), now());
        state.add_fixed_schedule(
            FixedSchedule::new("Physics", Weekday::Thu, "14:00".parse().unwrap(), "15:40".parse().unwrap())
                .unwrap()
                .with_location("Hall B"),
        );

        save_data(&PlannerData::from_state(&state), &path).unwrap();
        let mut restored = AppState::new(now().date());
        load_data(&path).unwrap().restore_into(&mut restored);
        assert_eq!(restored.tasks, state.tasks);
        assert_eq!(restored.fixed_schedules, state.fixed_schedules);
    }

    #[test]
    fn missing_data_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_data(&dir.path().join("none.json")).unwrap(), PlannerData::default());
    }

    #[test]
    fn export_envelope_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let tasks = vec![Task::from_parsed(parse_task_text("call mom 15m"), now())];
        assert_eq!(export_tasks(&tasks, &path, now()).unwrap(), 1);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_tasks"], 1);
        assert_eq!(value["export_date"], "2025-09-01T18:30:00");
        assert_eq!(value["tasks"][0]["content"], "call mom");

        let report = import_tasks(&path).unwrap();
        assert_eq!(report.tasks, tasks);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn import_reports_bad_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let good = Task::from_parsed(parse_task_text("stretch 10m"), now());
        let mut empty = good.clone();
        empty.content = " ".into();
        let json = serde_json::json!({
            "export_date": "2025-09-01T18:30:00",
            "total_tasks": 3,
            "tasks": [good, { "content": 42 }, empty],
        });
        std::fs::write(&path, json.to_string()).unwrap();

        let report = import_tasks(&path).unwrap();
        assert_eq!(report.tasks.len(), 1);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].index, 1);
        assert!(matches!(report.rejected[0].reason, RejectReason::Malformed(_)));
        assert_eq!(
            report.rejected[1].reason,
            RejectReason::Invalid(vec![ValidationIssue::EmptyContent])
        );
    }

    #[test]
    fn import_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "total_tasks": 0 }"#).unwrap();
        assert!(matches!(import_tasks(&path), Err(PlannerError::Json(_))));

        std::fs::write(&path, r#"{ "tasks": [ { "id": "nope" } ] }"#).unwrap();
        assert!(matches!(import_tasks(&path), Err(PlannerError::EmptyImport(_))));

        std::fs::write(&path, r#"{ "tasks": [] }"#).unwrap();
        assert!(import_tasks(&path).unwrap().tasks.is_empty());
    }
}
