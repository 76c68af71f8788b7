use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::drag::DragAction;
use crate::error::Result;
use crate::model::TimeOfDay;

const SETTINGS_FILE: &str = "settings.json";
const DATA_FILE: &str = "planner.json";

/// User preferences persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Answer to the drag dialog when the user asked to remember it.
    pub drag_action: Option<DragAction>,
    pub sleep_reminder_time: TimeOfDay,
    /// Where the timeline scrolls to on start.
    pub work_start: TimeOfDay,
    pub drag_snap_minutes: u32,
    pub last_morning_greeting: Option<NaiveDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            drag_action: None,
            sleep_reminder_time: TimeOfDay::new(22, 0).unwrap_or(TimeOfDay::MIDNIGHT),
            work_start: TimeOfDay::new(9, 0).unwrap_or(TimeOfDay::MIDNIGHT),
            drag_snap_minutes: 5,
            last_morning_greeting: None,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults if the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to read settings: {}", e);
                return Self::default();
            }
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "ignoring corrupt settings: {}", e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

/// Per-user config directory, e.g. `~/.config/dayplanner` on Linux.
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "DayPlanner").map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn default_settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

/// Where tasks and fixed schedules are kept between runs.
pub fn default_data_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "DayPlanner").map(|dirs| dirs.data_dir().join(DATA_FILE))
}
