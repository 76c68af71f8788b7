//! Drag-to-reschedule interaction for timeline blocks.
//!
//! The machine is toolkit-agnostic: the view feeds it pointer events and
//! reads back a preview span while dragging and a [`DragOutcome`] once the
//! move is settled.
//!
//! ```text
//! Idle --Press--> Dragging --Release--> Resolving --Confirm--> Idle (outcome)
//!                    |          \--(remembered action)-------> Idle (outcome)
//!                    \--Release, no movement / Cancel--------> Idle
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::time::{TimelineSpan, LAST_MINUTE};

/// What to do with a dropped block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragAction {
    /// Keep the new time and leave the rest of the day alone.
    SaveOnly,
    /// Keep the new time and ask the schedule service to re-plan the day.
    Reschedule,
}

impl DragAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SaveOnly => "Save this change only",
            Self::Reschedule => "Save and re-plan the day",
        }
    }
}

/// An in-flight drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub task_id: Uuid,
    pub original: TimelineSpan,
    pub preview: TimelineSpan,
    pointer_origin_y: f32,
    pixels_per_minute: f32,
}

/// A dropped block waiting for the user's decision.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    pub task_id: Uuid,
    pub from: TimelineSpan,
    pub to: TimelineSpan,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
    Resolving(PendingMove),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Press {
        task_id: Uuid,
        span: TimelineSpan,
        pointer_y: f32,
        pixels_per_minute: f32,
    },
    Move {
        pointer_y: f32,
    },
    Release,
    Confirm {
        action: DragAction,
        remember: bool,
    },
    Cancel,
}

/// A settled move.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome {
    pub task_id: Uuid,
    pub span: TimelineSpan,
    pub action: DragAction,
}

#[derive(Debug, Clone)]
pub struct DragMachine {
    state: DragState,
    /// Answer used instead of asking, once the user ticked "remember".
    remembered: Option<DragAction>,
    snap_minutes: i32,
}

impl Default for DragMachine {
    fn default() -> Self {
        Self::new(None, 5)
    }
}

impl DragMachine {
    pub fn new(remembered: Option<DragAction>, snap_minutes: u32) -> Self {
        Self {
            state: DragState::Idle,
            remembered,
            snap_minutes: snap_minutes.clamp(1, 60) as i32,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn remembered(&self) -> Option<DragAction> {
        self.remembered
    }

    pub fn forget_choice(&mut self) {
        self.remembered = None;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Preview span of the block being dragged, if any.
    pub fn preview(&self, task_id: Uuid) -> Option<TimelineSpan> {
        match &self.state {
            DragState::Dragging(s) if s.task_id == task_id => Some(s.preview),
            DragState::Resolving(p) if p.task_id == task_id => Some(p.to),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingMove> {
        match &self.state {
            DragState::Resolving(p) => Some(p),
            _ => None,
        }
    }

    /// Feed one event. Events that make no sense in the current state are ignored.
    pub fn handle(&mut self, event: DragEvent) -> Option<DragOutcome> {
        let state = std::mem::take(&mut self.state);
        let (next, outcome) = match (state, event) {
            (
                DragState::Idle,
                DragEvent::Press {
                    task_id,
                    span,
                    pointer_y,
                    pixels_per_minute,
                },
            ) => {
                tracing::debug!(%task_id, window = %span, "drag started");
                let session = DragSession {
                    task_id,
                    original: span,
                    preview: span,
                    pointer_origin_y: pointer_y,
                    pixels_per_minute: pixels_per_minute.max(f32::EPSILON),
                };
                (DragState::Dragging(session), None)
            }
            (DragState::Dragging(mut session), DragEvent::Move { pointer_y }) => {
                session.preview = self.moved_span(&session, pointer_y);
                (DragState::Dragging(session), None)
            }
            (DragState::Dragging(session), DragEvent::Release) => self.release(session),
            (DragState::Resolving(pending), DragEvent::Confirm { action, remember }) => {
                if remember {
                    self.remembered = Some(action);
                }
                tracing::debug!(task_id = %pending.task_id, ?action, remember, "drag confirmed");
                (
                    DragState::Idle,
                    Some(DragOutcome {
                        task_id: pending.task_id,
                        span: pending.to,
                        action,
                    }),
                )
            }
            (DragState::Dragging(_) | DragState::Resolving(_), DragEvent::Cancel) => {
                tracing::debug!("drag cancelled");
                (DragState::Idle, None)
            }
            (state, event) => {
                tracing::trace!(?event, "drag event ignored");
                (state, None)
            }
        };
        self.state = next;
        outcome
    }

    fn release(&self, session: DragSession) -> (DragState, Option<DragOutcome>) {
        if session.preview == session.original {
            return (DragState::Idle, None);
        }
        match self.remembered {
            Some(action) => (
                DragState::Idle,
                Some(DragOutcome {
                    task_id: session.task_id,
                    span: session.preview,
                    action,
                }),
            ),
            None => (
                DragState::Resolving(PendingMove {
                    task_id: session.task_id,
                    from: session.original,
                    to: session.preview,
                }),
                None,
            ),
        }
    }

    /// Original span shifted by the pointer delta, snapped and kept inside the day.
    fn moved_span(&self, session: &DragSession, pointer_y: f32) -> TimelineSpan {
        let delta = ((pointer_y - session.pointer_origin_y) / session.pixels_per_minute).round() as i32;
        let raw = session.original.start_minutes + delta;
        let snapped = (raw as f32 / self.snap_minutes as f32).round() as i32 * self.snap_minutes;
        let latest = (LAST_MINUTE - session.original.duration_minutes).max(0);
        TimelineSpan {
            start_minutes: snapped.clamp(0, latest),
            duration_minutes: session.original.duration_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: i32, duration: i32) -> TimelineSpan {
        TimelineSpan {
            start_minutes: start,
            duration_minutes: duration,
        }
    }

    fn press(machine: &mut DragMachine, id: Uuid, s: TimelineSpan) {
        machine.handle(DragEvent::Press {
            task_id: id,
            span: s,
            pointer_y: 100.0,
            pixels_per_minute: 1.0,
        });
    }

    #[test]
    fn drag_then_confirm() {
        let id = Uuid::new_v4();
        let mut m = DragMachine::new(None, 5);
        press(&mut m, id, span(540, 60));
        assert!(matches!(m.state(), DragState::Dragging(_)));

        m.handle(DragEvent::Move { pointer_y: 162.0 });
        assert_eq!(m.preview(id), Some(span(600, 60)));

        assert_eq!(m.handle(DragEvent::Release), None);
        assert_eq!(
            m.pending(),
            Some(&PendingMove { task_id: id, from: span(540, 60), to: span(600, 60) })
        );

        let outcome = m.handle(DragEvent::Confirm { action: DragAction::SaveOnly, remember: false });
        assert_eq!(
            outcome,
            Some(DragOutcome { task_id: id, span: span(600, 60), action: DragAction::SaveOnly })
        );
        assert!(m.is_idle());
        assert_eq!(m.remembered(), None);
    }

    #[test]
    fn remembered_choice_skips_dialog() {
        let id = Uuid::new_v4();
        let mut m = DragMachine::new(None, 5);
        press(&mut m, id, span(540, 30));
        m.handle(DragEvent::Move { pointer_y: 130.0 });
        m.handle(DragEvent::Release);
        m.handle(DragEvent::Confirm { action: DragAction::Reschedule, remember: true });
        assert_eq!(m.remembered(), Some(DragAction::Reschedule));

        press(&mut m, id, span(570, 30));
        m.handle(DragEvent::Move { pointer_y: 40.0 });
        let outcome = m.handle(DragEvent::Release).unwrap();
        assert_eq!(outcome.action, DragAction::Reschedule);
        assert_eq!(outcome.span, span(510, 30));
        assert!(m.is_idle());
    }

    #[test]
    fn release_without_movement_is_a_click() {
        let id = Uuid::new_v4();
        let mut m = DragMachine::default();
        press(&mut m, id, span(300, 45));
        m.handle(DragEvent::Move { pointer_y: 101.0 });
        assert_eq!(m.handle(DragEvent::Release), None);
        assert!(m.is_idle());
    }

    #[test]
    fn block_stays_inside_the_day() {
        let id = Uuid::new_v4();
        let mut m = DragMachine::new(None, 1);
        press(&mut m, id, span(60, 120));
        m.handle(DragEvent::Move { pointer_y: -500.0 });
        assert_eq!(m.preview(id), Some(span(0, 120)));
        m.handle(DragEvent::Move { pointer_y: 5000.0 });
        assert_eq!(m.preview(id), Some(span(1319, 120)));
    }

    #[test]
    fn zoom_scales_pointer_delta() {
        let id = Uuid::new_v4();
        let mut m = DragMachine::new(None, 15);
        m.handle(DragEvent::Press {
            task_id: id,
            span: span(480, 60),
            pointer_y: 0.0,
            pixels_per_minute: 2.0,
        });
        m.handle(DragEvent::Move { pointer_y: 55.0 });
        // 27.5 min rounds to 28, snaps to 30
        assert_eq!(m.preview(id), Some(span(510, 60)));
    }

    #[test]
    fn cancel_mid_drag_discards_preview() {
        let id = Uuid::new_v4();
        let mut m = DragMachine::default();
        press(&mut m, id, span(600, 30));
        m.handle(DragEvent::Move { pointer_y: 160.0 });
        assert_eq!(m.preview(id), Some(span(660, 30)));

        assert_eq!(m.handle(DragEvent::Cancel), None);
        assert!(m.is_idle());
        assert_eq!(m.preview(id), None);
        assert_eq!(m.handle(DragEvent::Release), None);
        assert!(m.pending().is_none());
    }

    #[test]
    fn cancel_and_ignored_events() {
        let id = Uuid::new_v4();
        let mut m = DragMachine::default();
        assert_eq!(m.handle(DragEvent::Release), None);
        assert_eq!(m.handle(DragEvent::Move { pointer_y: 3.0 }), None);
        assert!(m.is_idle());

        press(&mut m, id, span(600, 30));
        let other = Uuid::new_v4();
        press(&mut m, other, span(0, 30));
        assert_eq!(m.preview(other), None);
        assert_eq!(m.preview(id), Some(span(600, 30)));

        m.handle(DragEvent::Move { pointer_y: 200.0 });
        m.handle(DragEvent::Release);
        assert!(m.pending().is_some());
        m.handle(DragEvent::Cancel);
        assert!(m.is_idle());
    }
}
