pub mod assistant;
pub mod day_timeline;
pub mod dialogs;
pub mod task_list;
pub mod theme;
pub mod toolbar;
