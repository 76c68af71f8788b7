//! Boundary to the external schedule optimiser.
//!
//! Day re-planning (greedy or model-driven) runs in a remote service. The
//! planner only hands over the day's inputs and writes the returned windows
//! back with [`AppState::apply_slots`](crate::model::AppState::apply_slots).

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{FixedSchedule, Task};

/// A task window proposed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSlot {
    pub task_id: Uuid,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

pub trait ScheduleService {
    /// Re-plan `date` given all tasks and the fixed schedules of that weekday.
    fn reschedule_day(
        &self,
        date: NaiveDate,
        tasks: &[Task],
        fixed: &[FixedSchedule],
    ) -> Result<Vec<ScheduledSlot>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use crate::model::{AppState, TimelineSpan};
    use crate::parser::parse_task_text;

    /// Stacks pending tasks back to back from 09:00.
    struct BackToBack;

    impl ScheduleService for BackToBack {
        fn reschedule_day(
            &self,
            date: NaiveDate,
            tasks: &[Task],
            _fixed: &[FixedSchedule],
        ) -> Result<Vec<ScheduledSlot>> {
            let mut cursor = date.and_hms_opt(9, 0, 0).unwrap();
            Ok(tasks
                .iter()
                .filter(|t| t.is_pending())
                .map(|t| {
                    let end = cursor + chrono::Duration::minutes(t.estimated_duration as i64);
                    let slot = ScheduledSlot { task_id: t.id, start: cursor, end };
                    cursor = end;
                    slot
                })
                .collect())
        }
    }

    struct Offline;

    impl ScheduleService for Offline {
        fn reschedule_day(&self, _: NaiveDate, _: &[Task], _: &[FixedSchedule]) -> Result<Vec<ScheduledSlot>> {
            Err(PlannerError::Service("offline".into()))
        }
    }

    #[test]
    fn slots_are_written_back() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        let now = date.and_hms_opt(7, 0, 0).unwrap();
        let mut state = AppState::new(date);
        let a = state.add_task(parse_task_text("a 30m"), now);
        let b = state.add_task(parse_task_text("b 1h"), now);

        let slots = BackToBack.reschedule_day(date, &state.tasks, &[]).unwrap();
        assert_eq!(state.apply_slots(&slots), 2);

        let blocks = state.day_blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].task_id(), Some(a));
        assert_eq!(blocks[0].span(), Some(TimelineSpan { start_minutes: 540, duration_minutes: 30 }));
        assert_eq!(blocks[1].task_id(), Some(b));
        assert_eq!(blocks[1].start.to_string(), "09:30");
    }

    #[test]
    fn failed_replan_leaves_tasks_alone() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        let now = date.and_hms_opt(7, 0, 0).unwrap();
        let mut state = AppState::new(date);
        let id = state.add_task(parse_task_text("essay 1h"), now);
        state
            .apply_move(id, TimelineSpan { start_minutes: 600, duration_minutes: 60 })
            .unwrap();
        let before = state.tasks.clone();

        assert!(matches!(state.replan_with(&Offline), Err(PlannerError::Service(_))));
        assert_eq!(state.tasks, before);

        assert_eq!(state.replan_with(&BackToBack).unwrap(), 1);
        assert_eq!(state.task(id).unwrap().scheduled_times().unwrap().0.to_string(), "09:00");
    }
}
