pub mod conflict;
pub mod query;
pub mod reminder;
pub mod schedule;
pub mod state;
pub mod task;
pub mod time;
pub mod timeline;
pub mod validate;

pub use conflict::{detect_conflicts, Conflict};
pub use query::{SortKey, TaskFilter, TaskStatistics};
pub use schedule::{FixedSchedule, ScheduleSource};
pub use state::{AppState, BlockLayout, BlockSource, TimelineBlock};
pub use task::{Category, Priority, Task, TaskStatus};
pub use time::{TimeOfDay, TimelineSpan};
pub use timeline::DayViewport;
