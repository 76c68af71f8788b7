use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::{PlannerError, Result};
use crate::model::conflict::{detect_conflicts, Conflict};
use crate::model::schedule::FixedSchedule;
use crate::model::task::{Priority, Task, TaskStatus};
use crate::model::time::{TimeOfDay, TimelineSpan};
use crate::model::timeline::{height_between, offset_of, PIXELS_PER_MINUTE};
use crate::parser::ParsedTask;
use crate::service::{ScheduleService, ScheduledSlot};

/// What a timeline block represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSource {
    Fixed(Uuid),
    Task { id: Uuid, priority: Priority },
}

/// Placement of a block on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLayout {
    /// Top offset and height in timeline pixels.
    Placed { top: i32, height: i32 },
    /// End precedes start; not drawable.
    Inverted { minutes: i32 },
}

/// One entry of the day timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBlock {
    pub source: BlockSource,
    pub title: String,
    pub category: Option<String>,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub layout: BlockLayout,
}

impl TimelineBlock {
    fn new(source: BlockSource, title: String, start: TimeOfDay, end: TimeOfDay) -> Self {
        let top = offset_of(start);
        let height = height_between(start, end);
        let layout = if height < 0 {
            BlockLayout::Inverted { minutes: height / PIXELS_PER_MINUTE }
        } else {
            BlockLayout::Placed { top, height }
        };
        Self {
            source,
            title,
            category: None,
            start,
            end,
            layout,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.source, BlockSource::Fixed(_))
    }

    pub fn task_id(&self) -> Option<Uuid> {
        match self.source {
            BlockSource::Task { id, .. } => Some(id),
            BlockSource::Fixed(_) => None,
        }
    }

    pub fn span(&self) -> Option<TimelineSpan> {
        TimelineSpan::between(self.start, self.end)
    }
}

/// Application state owned by the caller and passed to every view.
#[derive(Debug, Clone)]
pub struct AppState {
    pub current_date: NaiveDate,
    pub tasks: Vec<Task>,
    pub fixed_schedules: Vec<FixedSchedule>,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            current_date: today,
            tasks: Vec::new(),
            fixed_schedules: Vec::new(),
        }
    }

    // --- Date navigation ---

    pub fn change_date(&mut self, delta_days: i64) {
        self.current_date += Duration::days(delta_days);
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.current_date = date;
    }

    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.current_date = today;
    }

    // --- Tasks ---

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn task_mut(&mut self, id: Uuid) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(PlannerError::TaskNotFound(id))
    }

    /// Add a parsed task and return its id.
    pub fn add_task(&mut self, parsed: ParsedTask, now: NaiveDateTime) -> Uuid {
        let task = Task::from_parsed(parsed, now);
        let id = task.id;
        tracing::info!(%id, content = %task.content, "task added");
        self.tasks.push(task);
        id
    }

    /// Replace a task's editable fields, keeping id and timestamps.
    pub fn update_task(&mut self, updated: Task) -> Result<()> {
        let task = self.task_mut(updated.id)?;
        *task = Task {
            created_at: task.created_at,
            ..updated
        };
        Ok(())
    }

    pub fn delete_task(&mut self, id: Uuid) -> Result<Task> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(PlannerError::TaskNotFound(id))?;
        tracing::info!(%id, "task deleted");
        Ok(self.tasks.remove(pos))
    }

    pub fn set_status(&mut self, id: Uuid, status: TaskStatus, now: NaiveDateTime) -> Result<()> {
        let task = self.task_mut(id)?;
        task.status = status;
        task.completed_at = (status == TaskStatus::Completed).then_some(now);
        Ok(())
    }

    /// Flip between completed and pending. Returns the new status.
    pub fn toggle_complete(&mut self, id: Uuid, now: NaiveDateTime) -> Result<TaskStatus> {
        let next = if self.task_mut(id)?.is_completed() {
            TaskStatus::Pending
        } else {
            TaskStatus::Completed
        };
        self.set_status(id, next, now)?;
        Ok(next)
    }

    /// Drop every scheduled window. Returns how many tasks were cleared.
    pub fn clear_schedule(&mut self) -> usize {
        let mut cleared = 0;
        for task in self.tasks.iter_mut().filter(|t| t.scheduled_start.is_some()) {
            task.unschedule();
            cleared += 1;
        }
        tracing::info!(cleared, "schedule cleared");
        cleared
    }

    /// Move a task to `span` on the current date.
    pub fn apply_move(&mut self, id: Uuid, span: TimelineSpan) -> Result<()> {
        let date = self.current_date;
        let task = self.task_mut(id)?;
        task.schedule(date, span)?;
        tracing::info!(%id, %date, window = %span, "task rescheduled");
        Ok(())
    }

    /// Write back slots returned by a schedule service. Unknown ids are skipped.
    pub fn apply_slots(&mut self, slots: &[ScheduledSlot]) -> usize {
        let mut applied = 0;
        for slot in slots {
            match self.task_mut(slot.task_id) {
                Ok(task) => {
                    task.scheduled_start = Some(slot.start);
                    task.scheduled_end = Some(slot.end);
                    applied += 1;
                }
                Err(e) => tracing::warn!("skipping slot: {}", e),
            }
        }
        applied
    }

    /// Ask `service` to re-plan the current date and write its slots back.
    /// On error the tasks are left as they were.
    pub fn replan_with(&mut self, service: &dyn ScheduleService) -> Result<usize> {
        let fixed: Vec<FixedSchedule> = self.fixed_for_current_day().cloned().collect();
        let slots = service.reschedule_day(self.current_date, &self.tasks, &fixed)?;
        let applied = self.apply_slots(&slots);
        tracing::info!(date = %self.current_date, applied, "day re-planned");
        Ok(applied)
    }

    // --- Fixed schedules ---

    pub fn add_fixed_schedule(&mut self, schedule: FixedSchedule) {
        tracing::info!(title = %schedule.title, weekday = ?schedule.weekday, "fixed schedule added");
        self.fixed_schedules.push(schedule);
    }

    pub fn delete_fixed_schedule(&mut self, id: Uuid) -> Result<FixedSchedule> {
        let pos = self
            .fixed_schedules
            .iter()
            .position(|s| s.id == id)
            .ok_or(PlannerError::ScheduleNotFound(id))?;
        Ok(self.fixed_schedules.remove(pos))
    }

    // --- Day view ---

    pub fn fixed_for_current_day(&self) -> impl Iterator<Item = &FixedSchedule> {
        let weekday = self.current_date.weekday();
        self.fixed_schedules
            .iter()
            .filter(move |s| s.weekday == weekday)
    }

    pub fn scheduled_on_current_day(&self) -> impl Iterator<Item = &Task> {
        let date = self.current_date;
        self.tasks.iter().filter(move |t| t.is_scheduled_on(date))
    }

    /// Blocks for the current day: fixed schedules first, then tasks.
    pub fn day_blocks(&self) -> Vec<TimelineBlock> {
        let mut blocks: Vec<TimelineBlock> = self
            .fixed_for_current_day()
            .map(|s| TimelineBlock::new(BlockSource::Fixed(s.id), s.title.clone(), s.start, s.end))
            .collect();

        for task in self.scheduled_on_current_day() {
            let Some((start, end)) = task.scheduled_times() else {
                continue;
            };
            let mut block = TimelineBlock::new(
                BlockSource::Task {
                    id: task.id,
                    priority: task.priority,
                },
                task.content.clone(),
                start,
                end,
            );
            block.category = Some(task.category.clone());
            if let BlockLayout::Inverted { minutes } = block.layout {
                tracing::warn!(id = %task.id, minutes, "task window ends before it starts");
            }
            blocks.push(block);
        }
        blocks
    }

    pub fn day_conflicts(&self) -> Vec<Conflict> {
        detect_conflicts(self.fixed_for_current_day(), self.scheduled_on_current_day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_task_text;
    use chrono::Weekday;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn now() -> NaiveDateTime {
        monday().and_hms_opt(8, 0, 0).unwrap()
    }

    fn state_with_class() -> AppState {
        let mut state = AppState::new(monday());
        state.add_fixed_schedule(
            FixedSchedule::new("Algebra", Weekday::Mon, "08:00".parse().unwrap(), "09:30".parse().unwrap())
                .unwrap(),
        );
        state.add_fixed_schedule(
            FixedSchedule::new("Chemistry", Weekday::Tue, "10:00".parse().unwrap(), "11:00".parse().unwrap())
                .unwrap(),
        );
        state
    }

    #[test]
    fn day_blocks_list_fixed_then_tasks() {
        let mut state = state_with_class();
        let id = state.add_task(parse_task_text("review notes 30m"), now());
        state
            .apply_move(id, TimelineSpan { start_minutes: 9 * 60, duration_minutes: 30 })
            .unwrap();
        state.add_task(parse_task_text("unscheduled"), now());

        let blocks = state.day_blocks();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_fixed());
        assert_eq!(blocks[0].layout, BlockLayout::Placed { top: 480, height: 90 });
        assert_eq!(blocks[1].task_id(), Some(id));
        assert_eq!(blocks[1].layout, BlockLayout::Placed { top: 540, height: 30 });
        assert_eq!(state.day_conflicts().len(), 1);

        state.change_date(1);
        let blocks = state.day_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, "Chemistry");
    }

    #[test]
    fn inverted_task_window_is_flagged() {
        let mut state = AppState::new(monday());
        let id = state.add_task(parse_task_text("broken"), now());
        let task = state.tasks.iter_mut().find(|t| t.id == id).unwrap();
        task.scheduled_start = Some(monday().and_hms_opt(10, 0, 0).unwrap());
        task.scheduled_end = Some(monday().and_hms_opt(9, 0, 0).unwrap());

        let blocks = state.day_blocks();
        assert_eq!(blocks[0].layout, BlockLayout::Inverted { minutes: -60 });
        assert!(blocks[0].span().is_none());
    }

    #[test]
    fn toggle_complete_tracks_completion_time() {
        let mut state = AppState::new(monday());
        let id = state.add_task(parse_task_text("laundry"), now());
        assert_eq!(state.toggle_complete(id, now()).unwrap(), TaskStatus::Completed);
        assert_eq!(state.task(id).unwrap().completed_at, Some(now()));
        assert_eq!(state.toggle_complete(id, now()).unwrap(), TaskStatus::Pending);
        assert_eq!(state.task(id).unwrap().completed_at, None);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut state = AppState::new(monday());
        let missing = Uuid::new_v4();
        assert!(matches!(
            state.apply_move(missing, TimelineSpan { start_minutes: 0, duration_minutes: 10 }),
            Err(PlannerError::TaskNotFound(id)) if id == missing
        ));
        assert!(matches!(
            state.delete_fixed_schedule(missing),
            Err(PlannerError::ScheduleNotFound(_))
        ));
    }

    #[test]
    fn move_past_midnight_leaves_task_untouched() {
        let mut state = AppState::new(monday());
        let id = state.add_task(parse_task_text("night shift 2h"), now());
        state
            .apply_move(id, TimelineSpan { start_minutes: 20 * 60, duration_minutes: 120 })
            .unwrap();
        assert!(matches!(
            state.apply_move(id, TimelineSpan { start_minutes: 23 * 60, duration_minutes: 120 }),
            Err(PlannerError::OutsideDay { .. })
        ));
        let (start, end) = state.task(id).unwrap().scheduled_times().unwrap();
        assert_eq!((start.to_string(), end.to_string()), ("20:00".into(), "22:00".into()));
    }

    #[test]
    fn slots_for_unknown_tasks_are_skipped() {
        let mut state = AppState::new(monday());
        let id = state.add_task(parse_task_text("known 30m"), now());
        let at = |h, m| monday().and_hms_opt(h, m, 0).unwrap();
        let slots = [
            ScheduledSlot { task_id: Uuid::new_v4(), start: at(9, 0), end: at(10, 0) },
            ScheduledSlot { task_id: id, start: at(10, 0), end: at(10, 30) },
        ];
        assert_eq!(state.apply_slots(&slots), 1);
        let task = state.task(id).unwrap();
        assert_eq!(task.scheduled_start, Some(at(10, 0)));
        assert_eq!(task.scheduled_end, Some(at(10, 30)));
    }

    #[test]
    fn clear_schedule_unschedules_everything() {
        let mut state = AppState::new(monday());
        for text in ["a", "b", "c"] {
            let id = state.add_task(parse_task_text(text), now());
            state
                .apply_move(id, TimelineSpan { start_minutes: 600, duration_minutes: 60 })
                .unwrap();
        }
        state.add_task(parse_task_text("d"), now());
        assert_eq!(state.clear_schedule(), 3);
        assert!(state.day_blocks().is_empty());
    }

    #[test]
    fn update_keeps_creation_time() {
        let mut state = AppState::new(monday());
        let id = state.add_task(parse_task_text("draft"), now());
        let mut edited = state.task(id).unwrap().clone();
        edited.content = "final draft".into();
        edited.created_at = now() + Duration::days(3);
        state.update_task(edited).unwrap();
        let task = state.task(id).unwrap();
        assert_eq!(task.content, "final draft");
        assert_eq!(task.created_at, now());
    }

    #[test]
    fn date_navigation() {
        let mut state = AppState::new(monday());
        state.change_date(-1);
        assert_eq!(state.current_date.weekday(), Weekday::Sun);
        state.go_to_today(monday());
        assert_eq!(state.current_date, monday());
    }
}
