pub mod csv_export;
pub mod csv_import;
pub mod file;

pub use csv_export::export_csv;
pub use csv_import::{import_timetable, parse_timetable};
pub use file::{export_tasks, import_tasks, load_data, save_data, ImportReport, PlannerData};
