use uuid::Uuid;

use crate::model::schedule::FixedSchedule;
use crate::model::task::Task;
use crate::model::time::TimelineSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Fixed,
    Task,
}

/// Something occupying a stretch of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub kind: SlotKind,
    pub id: Uuid,
    pub title: String,
    pub span: TimelineSpan,
}

/// Two slots whose time ranges overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub first: Slot,
    pub second: Slot,
    pub overlap: TimelineSpan,
}

/// Collect fixed schedules and scheduled tasks into comparable slots.
///
/// Tasks without a window, or whose window ends before it starts, are left out.
pub fn collect_slots<'a>(
    fixed: impl IntoIterator<Item = &'a FixedSchedule>,
    tasks: impl IntoIterator<Item = &'a Task>,
) -> Vec<Slot> {
    let mut slots: Vec<Slot> = fixed
        .into_iter()
        .map(|s| Slot {
            kind: SlotKind::Fixed,
            id: s.id,
            title: s.title.clone(),
            span: s.span(),
        })
        .collect();

    slots.extend(tasks.into_iter().filter_map(|t| {
        let (start, end) = t.scheduled_times()?;
        Some(Slot {
            kind: SlotKind::Task,
            id: t.id,
            title: t.content.clone(),
            span: TimelineSpan::between(start, end)?,
        })
    }));
    slots
}

/// Every pair of slots that overlap, in input order.
pub fn detect_conflicts<'a>(
    fixed: impl IntoIterator<Item = &'a FixedSchedule>,
    tasks: impl IntoIterator<Item = &'a Task>,
) -> Vec<Conflict> {
    let slots = collect_slots(fixed, tasks);
    let mut conflicts = Vec::new();
    for (i, a) in slots.iter().enumerate() {
        for b in &slots[i + 1..] {
            if let Some(overlap) = a.span.overlap(&b.span) {
                conflicts.push(Conflict {
                    first: a.clone(),
                    second: b.clone(),
                    overlap,
                });
            }
        }
    }
    conflicts
}
