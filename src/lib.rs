//! Day planner core: free-text task entry, a minute-accurate day timeline,
//! weekly fixed schedules and drag-to-reschedule.
//!
//! The library carries no UI code. The `day-planner` binary renders it with egui.

pub mod config;
pub mod drag;
pub mod error;
pub mod io;
pub mod model;
pub mod parser;
pub mod service;

pub use error::{PlannerError, Result};
pub use parser::{parse_task_text, ParsedTask};
