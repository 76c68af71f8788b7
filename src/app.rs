use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use uuid::Uuid;

use day_planner::config::{self, Settings};
use day_planner::drag::{DragAction, DragMachine, DragOutcome};
use day_planner::io;
use day_planner::model::reminder::{self, FocusTracker, ReminderLog, Urgency};
use day_planner::model::validate::validate_task;
use day_planner::model::{
    AppState, DayViewport, FixedSchedule, SortKey, Task, TaskFilter, TimeOfDay, TimelineSpan,
};
use day_planner::parse_task_text;
use day_planner::service::ScheduleService;

use crate::ui;
use crate::ui::assistant::{AssistantMessage, Tone};

/// Input fields of the "Add fixed schedule" dialog.
pub struct FixedScheduleForm {
    pub title: String,
    pub weekday: Weekday,
    pub start: String,
    pub end: String,
    pub location: String,
}

impl Default for FixedScheduleForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            weekday: Weekday::Mon,
            start: "08:00".into(),
            end: "09:00".into(),
            location: String::new(),
        }
    }
}

/// A task being edited plus its start time as typed.
pub struct TaskEditForm {
    pub task: Task,
    pub start: String,
}

/// Main application state.
pub struct PlannerApp {
    pub state: AppState,
    pub viewport: DayViewport,
    pub drag: DragMachine,
    pub settings: Settings,
    settings_path: Option<PathBuf>,
    data_path: Option<PathBuf>,
    pub selected_task: Option<Uuid>,

    // Task list
    pub quick_add: String,
    pub filter: TaskFilter,
    pub sort_key: SortKey,

    // Dialog state
    pub show_add_fixed: bool,
    pub fixed_form: FixedScheduleForm,
    pub editing: Option<TaskEditForm>,
    pub show_about: bool,
    pub remember_drag_choice: bool,

    // Assistant
    pub assistant: Vec<AssistantMessage>,
    focus: FocusTracker,
    reminders: ReminderLog,
    last_check_minute: Option<NaiveDateTime>,
    next_sleep_reminder: NaiveDateTime,

    service: Option<Box<dyn ScheduleService>>,
    pub scroll_to_minute: Option<i32>,
    pub status_message: String,
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl PlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let settings_path = config::default_settings_path();
        let settings = settings_path
            .as_deref()
            .map(Settings::load)
            .unwrap_or_default();
        let data_path = config::default_data_path();

        let now = now();
        let mut state = AppState::new(now.date());
        let mut status_message = "Ready".to_string();
        if let Some(path) = &data_path {
            match io::load_data(path) {
                Ok(data) => data.restore_into(&mut state),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "failed to load planner data: {}", e);
                    status_message = format!("Could not load saved data: {}", e);
                }
            }
        }
        tracing::info!(
            tasks = state.tasks.len(),
            fixed = state.fixed_schedules.len(),
            "planner started"
        );

        Self {
            state,
            viewport: DayViewport::default(),
            drag: DragMachine::new(settings.drag_action, settings.drag_snap_minutes),
            next_sleep_reminder: reminder::next_sleep_reminder(now, settings.sleep_reminder_time),
            scroll_to_minute: Some(settings.work_start.minutes_since_midnight()),
            settings,
            settings_path,
            data_path,
            selected_task: None,
            quick_add: String::new(),
            filter: TaskFilter::default(),
            sort_key: SortKey::default(),
            show_add_fixed: false,
            fixed_form: FixedScheduleForm::default(),
            editing: None,
            show_about: false,
            remember_drag_choice: false,
            assistant: vec![AssistantMessage::new(
                now,
                "Type a task like \"write report 2h high [work]\" to add it.",
                Tone::Info,
            )],
            focus: FocusTracker::new(now),
            reminders: ReminderLog::default(),
            last_check_minute: None,
            service: None,
            status_message,
        }
    }

    // --- Persistence ---

    /// Save tasks and fixed schedules, then show `message`.
    fn commit(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.save_data();
    }

    pub fn save_data(&mut self) {
        let Some(path) = self.data_path.clone() else {
            return;
        };
        if let Err(e) = io::save_data(&io::PlannerData::from_state(&self.state), &path) {
            tracing::error!(path = %path.display(), "failed to save planner data: {}", e);
            self.status_message = format!("Error saving: {}", e);
        }
    }

    fn save_settings(&mut self) {
        let Some(path) = self.settings_path.clone() else {
            return;
        };
        if let Err(e) = self.settings.save(&path) {
            tracing::warn!("failed to save settings: {}", e);
            self.status_message = format!("Error saving settings: {}", e);
        }
    }

    // --- Tasks ---

    pub fn quick_add_task(&mut self) {
        let text = self.quick_add.trim().to_string();
        if text.is_empty() {
            return;
        }
        let parsed = parse_task_text(&text);
        let issues = validate_task(&Task::from_parsed(parsed.clone(), now()));
        if let Some(issue) = issues.first() {
            self.status_message = format!("Task not added: {}", issue);
            return;
        }
        let summary = format!(
            "Added '{}' ({} min, {}, {})",
            parsed.content,
            parsed.estimated_duration_minutes,
            parsed.priority.as_str(),
            parsed.category
        );
        let id = self.state.add_task(parsed, now());
        self.selected_task = Some(id);
        self.quick_add.clear();
        self.commit(summary);
    }

    pub fn toggle_complete(&mut self, id: Uuid) {
        match self.state.toggle_complete(id, now()) {
            Ok(status) => self.commit(format!("Task marked {}", status.label().to_lowercase())),
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn delete_task(&mut self, id: Uuid) {
        match self.state.delete_task(id) {
            Ok(task) => {
                if self.selected_task == Some(id) {
                    self.selected_task = None;
                }
                self.commit(format!("Deleted '{}'", task.content));
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn begin_edit(&mut self, id: Uuid) {
        if let Some(task) = self.state.task(id) {
            let start = task
                .scheduled_times()
                .map(|(start, _)| start.to_string())
                .unwrap_or_default();
            self.editing = Some(TaskEditForm {
                task: task.clone(),
                start,
            });
        }
    }

    /// Apply the edit dialog. Returns false and keeps the dialog open on invalid input.
    pub fn finish_edit(&mut self) -> bool {
        let Some(form) = self.editing.take() else {
            return true;
        };
        let issues = validate_task(&form.task);
        if let Some(issue) = issues.first() {
            self.status_message = issue.to_string();
            self.editing = Some(form);
            return false;
        }

        let mut task = form.task.clone();
        let start = form.start.trim();
        if start.is_empty() {
            task.unschedule();
        } else {
            match start.parse::<TimeOfDay>() {
                Ok(start) => {
                    let span = TimelineSpan {
                        start_minutes: start.minutes_since_midnight(),
                        duration_minutes: task.estimated_duration as i32,
                    };
                    let date = task
                        .scheduled_start
                        .map(|s| s.date())
                        .unwrap_or(self.state.current_date);
                    if let Err(e) = task.schedule(date, span) {
                        self.status_message = e.to_string();
                        self.editing = Some(form);
                        return false;
                    }
                }
                Err(e) => {
                    self.status_message = e.to_string();
                    self.editing = Some(form);
                    return false;
                }
            }
        }

        let content = task.content.clone();
        match self.state.update_task(task) {
            Ok(()) => self.commit(format!("Updated '{}'", content)),
            Err(e) => self.status_message = e.to_string(),
        }
        true
    }

    pub fn clear_schedule(&mut self) {
        let cleared = self.state.clear_schedule();
        self.commit(format!("Cleared {} scheduled tasks", cleared));
    }

    // --- Fixed schedules ---

    pub fn add_fixed_from_form(&mut self) -> bool {
        let form = &self.fixed_form;
        let parsed = form
            .start
            .parse::<TimeOfDay>()
            .and_then(|start| Ok((start, form.end.parse::<TimeOfDay>()?)))
            .and_then(|(start, end)| FixedSchedule::new(form.title.clone(), form.weekday, start, end));
        match parsed {
            Ok(schedule) => {
                let schedule = schedule.with_location(form.location.clone());
                let message = format!("Added fixed schedule '{}'", schedule.title);
                self.state.add_fixed_schedule(schedule);
                self.fixed_form = FixedScheduleForm::default();
                self.commit(message);
                true
            }
            Err(e) => {
                self.status_message = e.to_string();
                false
            }
        }
    }

    pub fn delete_fixed(&mut self, id: Uuid) {
        match self.state.delete_fixed_schedule(id) {
            Ok(schedule) => self.commit(format!("Removed fixed schedule '{}'", schedule.title)),
            Err(e) => self.status_message = e.to_string(),
        }
    }

    // --- Timeline drag ---

    pub fn apply_drag_outcome(&mut self, outcome: DragOutcome) {
        if self.drag.remembered() != self.settings.drag_action {
            self.settings.drag_action = self.drag.remembered();
            self.save_settings();
        }
        if let Err(e) = self.state.apply_move(outcome.task_id, outcome.span) {
            self.status_message = e.to_string();
            return;
        }
        let title = self
            .state
            .task(outcome.task_id)
            .map(|t| t.content.clone())
            .unwrap_or_default();
        self.commit(format!("Moved '{}' to {}", title, outcome.span));
        if outcome.action == DragAction::Reschedule {
            self.reschedule_day();
        }
    }

    pub fn forget_drag_choice(&mut self) {
        self.drag.forget_choice();
        self.settings.drag_action = None;
        self.save_settings();
        self.status_message = "The drop dialog will ask again".to_string();
    }

    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }

    pub fn reschedule_day(&mut self) {
        let Some(service) = &self.service else {
            self.status_message.push_str(" (no schedule service configured, nothing re-planned)");
            return;
        };
        let date = self.state.current_date;
        match self.state.replan_with(service.as_ref()) {
            Ok(applied) => self.commit(format!("Re-planned {} tasks", applied)),
            Err(e) => {
                tracing::warn!(%date, "re-planning failed: {}", e);
                self.status_message = format!("Re-planning failed: {}", e);
            }
        }
    }

    // --- File operations ---

    pub fn import_timetable(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match io::import_timetable(&path) {
                Ok((schedules, skipped)) => {
                    let count = schedules.len();
                    for schedule in schedules {
                        self.state.add_fixed_schedule(schedule);
                    }
                    if skipped > 0 {
                        self.commit(format!("Imported {} classes ({} rows skipped)", count, skipped));
                    } else {
                        self.commit(format!("Imported {} classes", count));
                    }
                }
                Err(e) => self.status_message = format!("Timetable import failed: {}", e),
            }
        }
    }

    pub fn import_tasks(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Task export", &["json"])
            .pick_file()
        {
            match io::import_tasks(&path) {
                Ok(report) => {
                    let known: HashSet<Uuid> = self.state.tasks.iter().map(|t| t.id).collect();
                    let mut added = 0;
                    for task in report.tasks.into_iter().filter(|t| !known.contains(&t.id)) {
                        self.state.tasks.push(task);
                        added += 1;
                    }
                    self.commit(format!(
                        "Imported {} tasks ({} rejected)",
                        added,
                        report.rejected.len()
                    ));
                }
                Err(e) => self.status_message = format!("Import failed: {}", e),
            }
        }
    }

    pub fn export_tasks_json(&mut self) {
        if self.state.tasks.is_empty() {
            self.status_message = "Nothing to export".to_string();
            return;
        }
        let now = now();
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Task export", &["json"])
            .set_file_name(format!("tasks_{}.json", now.format("%Y-%m-%d")))
            .save_file()
        {
            match io::export_tasks(&self.state.tasks, &path, now) {
                Ok(count) => self.status_message = format!("Exported {} tasks", count),
                Err(e) => self.status_message = format!("Export failed: {}", e),
            }
        }
    }

    pub fn export_tasks_csv(&mut self) {
        if self.state.tasks.is_empty() {
            self.status_message = "Nothing to export".to_string();
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name("tasks.csv")
            .save_file()
        {
            match io::export_csv(&self.state.tasks, &path) {
                Ok(count) => self.status_message = format!("Exported {} tasks to CSV", count),
                Err(e) => self.status_message = format!("CSV export failed: {}", e),
            }
        }
    }

    pub fn open_data_folder(&mut self) {
        let Some(dir) = self.data_path.as_ref().and_then(|p| p.parent()) else {
            self.status_message = "No data folder on this platform".to_string();
            return;
        };
        if let Err(e) = std::fs::create_dir_all(dir).and_then(|_| open::that(dir)) {
            self.status_message = format!("Could not open folder: {}", e);
        }
    }

    // --- Assistant ---

    pub fn say(&mut self, text: impl Into<String>, tone: Tone) {
        self.assistant.push(AssistantMessage::new(now(), text, tone));
    }

    pub fn suggest(&mut self) {
        let suggestions = reminder::suggestions(&self.state.tasks, now());
        if suggestions.is_empty() {
            self.say("Nothing pending. Enjoy the free time.", Tone::Info);
        }
        for s in suggestions {
            let names: Vec<String> = s
                .task_ids
                .iter()
                .filter_map(|id| self.state.task(*id))
                .map(|t| t.content.clone())
                .collect();
            self.say(format!("{}: {}", s.message, names.join(", ")), Tone::Info);
        }
    }

    /// Minute-granularity checks for reminders, greetings and breaks.
    fn tick(&mut self, now: NaiveDateTime) {
        let minute = now.with_second(0).and_then(|t| t.with_nanosecond(0));
        if minute.is_none() || minute == self.last_check_minute {
            return;
        }
        self.last_check_minute = minute;

        for r in self.reminders.fresh(&self.state.tasks, now) {
            let tone = match r.urgency {
                Urgency::High => Tone::Urgent,
                Urgency::Medium => Tone::Reminder,
            };
            self.say(r.message, tone);
        }
        tracing::trace!(shown = self.reminders.len(), "reminders checked");

        if reminder::morning_greeting_due(now, self.settings.last_morning_greeting) {
            let today = now.date();
            let open = self
                .state
                .tasks
                .iter()
                .filter(|t| t.is_pending() && t.is_scheduled_on(today))
                .count();
            self.say(
                format!("Good morning! {} tasks are planned for today.", open),
                Tone::Info,
            );
            self.settings.last_morning_greeting = Some(today);
            self.save_settings();
        }

        if now >= self.next_sleep_reminder {
            let done = self
                .state
                .tasks
                .iter()
                .filter(|t| t.completed_at.is_some_and(|c| c.date() == now.date()))
                .count();
            self.say(
                format!("Time to wind down. You finished {} tasks today.", done),
                Tone::Reminder,
            );
            self.next_sleep_reminder =
                reminder::next_sleep_reminder(now + chrono::Duration::minutes(1), self.settings.sleep_reminder_time);
        }

        if self.focus.tick(now) {
            self.say("You have been focused for 90 minutes. Take a short break.", Tone::Reminder);
        }
    }

    pub fn go_to_today(&mut self) {
        let now = now();
        self.state.go_to_today(now.date());
        self.scroll_to_minute = Some(TimeOfDay::from(now.time()).minutes_since_midnight());
    }

    pub fn weekday_title(&self) -> String {
        let date = self.state.current_date;
        format!(
            "{} {}",
            day_planner::model::schedule::weekday_label(date.weekday()),
            date.format("%Y-%m-%d")
        )
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = now();
        if ctx.input(|i| i.pointer.is_moving() || !i.events.is_empty()) {
            self.focus.record_activity(now);
        }
        self.tick(now);
        ctx.request_repaint_after(std::time::Duration::from_secs(30));

        // Handle keyboard shortcuts outside closures to avoid borrow issues
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.commit("Saved");
        }
        if ctx.input(|i| i.modifiers.alt && i.key_pressed(egui::Key::ArrowLeft)) {
            self.state.change_date(-1);
        }
        if ctx.input(|i| i.modifiers.alt && i.key_pressed(egui::Key::ArrowRight)) {
            self.state.change_date(1);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Zoom: {:.0}%", self.viewport.zoom * 100.0))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(
                            egui::RichText::new(format!("Tasks: {}", self.state.tasks.len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let mut list_action = ui::task_list::TaskListAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                list_action = ui::task_list::show_task_list(self, ui);
            });
        match list_action {
            ui::task_list::TaskListAction::Select(id) => self.selected_task = Some(id),
            ui::task_list::TaskListAction::Edit(id) => self.begin_edit(id),
            ui::task_list::TaskListAction::ToggleComplete(id) => self.toggle_complete(id),
            ui::task_list::TaskListAction::Delete(id) => self.delete_task(id),
            ui::task_list::TaskListAction::QuickAdd => self.quick_add_task(),
            ui::task_list::TaskListAction::None => {}
        }

        egui::SidePanel::right("assistant_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui::assistant::show_assistant(self, ui);
            });

        let mut interaction = ui::day_timeline::TimelineInteraction::default();
        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(ui::theme::BG_DARK))
            .show(ctx, |ui| {
                interaction = ui::day_timeline::show_day_timeline(
                    &self.state,
                    &mut self.viewport,
                    &mut self.drag,
                    self.selected_task,
                    self.scroll_to_minute.take(),
                    now,
                    ui,
                );
            });
        if let Some(id) = interaction.select {
            self.selected_task = Some(id);
        }
        if let Some(id) = interaction.edit {
            self.begin_edit(id);
        }
        if let Some(id) = interaction.delete_fixed {
            self.delete_fixed(id);
        }
        if let Some(outcome) = interaction.outcome {
            self.apply_drag_outcome(outcome);
        }

        // Dialogs
        if self.drag.pending().is_some() {
            if let Some(outcome) = ui::dialogs::show_drag_dialog(self, ctx) {
                self.apply_drag_outcome(outcome);
            }
        }
        if self.show_add_fixed {
            ui::dialogs::show_add_fixed_dialog(self, ctx);
        }
        if self.editing.is_some() {
            ui::dialogs::show_edit_task_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
