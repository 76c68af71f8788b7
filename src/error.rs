use thiserror::Error;
use uuid::Uuid;

use crate::model::time::TimeOfDay;

/// Errors raised by the planner core and its file formats.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid time '{0}': expected HH:MM with hour 0-23 and minute 0-59")]
    InvalidTimeFormat(String),

    #[error("invalid fixed schedule: {0}")]
    InvalidSchedule(String),

    #[error("a {minutes}-minute window starting at {start} does not fit in the day")]
    OutsideDay { start: TimeOfDay, minutes: i32 },

    #[error("task {0} not found")]
    TaskNotFound(Uuid),

    #[error("fixed schedule {0} not found")]
    ScheduleNotFound(Uuid),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns (found {found:?}); need: {required}")]
    MissingColumns { found: Vec<String>, required: String },

    #[error("{0}")]
    EmptyImport(String),

    #[error("schedule service failed: {0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
