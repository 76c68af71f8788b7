use chrono::NaiveDateTime;
use day_planner::drag::{DragEvent, DragMachine, DragOutcome};
use day_planner::model::timeline::{current_time_position, hour_labels};
use day_planner::model::{
    AppState, BlockLayout, BlockSource, Category, DayViewport, TimelineBlock, TimelineSpan,
};
use egui::{Color32, Pos2, Rect, RichText, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

use crate::ui::theme;

const MIN_BLOCK_HEIGHT: f32 = 14.0;

/// Result details from interactions with the day timeline.
#[derive(Debug, Clone, Default)]
pub struct TimelineInteraction {
    pub select: Option<Uuid>,
    pub edit: Option<Uuid>,
    pub delete_fixed: Option<Uuid>,
    pub outcome: Option<DragOutcome>,
}

/// Render the 24-hour timeline for the current day (central panel).
pub fn show_day_timeline(
    state: &AppState,
    viewport: &mut DayViewport,
    drag: &mut DragMachine,
    selected_task: Option<Uuid>,
    scroll_to_minute: Option<i32>,
    now: NaiveDateTime,
    ui: &mut Ui,
) -> TimelineInteraction {
    let mut interaction = TimelineInteraction::default();

    // Handle zoom with scroll wheel
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll > 0.0 {
            viewport.zoom_in();
        } else if scroll < 0.0 {
            viewport.zoom_out();
        }
    }
    if ui.input(|i| i.key_pressed(egui::Key::Escape)) && !drag.is_idle() {
        drag.handle(DragEvent::Cancel);
    }

    let blocks = state.day_blocks();
    let conflicts = state.day_conflicts();
    show_warnings(&blocks, conflicts.len(), ui);

    let mut scroll = egui::ScrollArea::vertical().auto_shrink([false, false]);
    if let Some(minute) = scroll_to_minute {
        scroll = scroll.vertical_scroll_offset(viewport.minute_to_y((minute - 30).max(0)));
    }

    scroll.show(ui, |ui| {
        let width = ui.available_width();
        let (response, painter) =
            ui.allocate_painter(Vec2::new(width, viewport.total_height()), Sense::hover());
        let origin = response.rect.min;

        draw_hour_bands(&painter, origin, viewport, width);
        draw_drag_hint(&painter, origin);

        let lane_left = origin.x + theme::GUTTER_WIDTH + theme::BLOCK_INSET;
        let lane_width = (width - theme::GUTTER_WIDTH - theme::BLOCK_INSET * 2.0).max(40.0);

        for overlap in conflicts.iter().map(|c| c.overlap) {
            let rect = span_rect(origin, viewport, lane_left - 4.0, 3.0, overlap);
            painter.rect_filled(rect, 0.0, theme::CONFLICT);
        }

        for block in &blocks {
            let BlockLayout::Placed { .. } = block.layout else {
                continue;
            };
            let Some(mut span) = block.span() else {
                continue;
            };
            match block.source {
                BlockSource::Fixed(id) => {
                    let rect = span_rect(origin, viewport, lane_left, lane_width, span);
                    draw_block(&painter, rect, block, span, theme::FIXED_BLOCK, None, false);
                    let resp = ui.interact(rect, ui.make_persistent_id(("fixed", id)), Sense::click());
                    resp.context_menu(|ui| {
                        if ui.button("Remove fixed schedule").clicked() {
                            interaction.delete_fixed = Some(id);
                            ui.close_menu();
                        }
                    });
                }
                BlockSource::Task { id, priority } => {
                    let original = span;
                    if let Some(preview) = drag.preview(id) {
                        span = preview;
                    }
                    let rect = span_rect(origin, viewport, lane_left, lane_width, span);
                    let color = block
                        .category
                        .as_deref()
                        .map(|c| theme::category_color(Category::classify(c)))
                        .unwrap_or(theme::ACCENT);
                    let is_selected = selected_task == Some(id);
                    draw_block(
                        &painter,
                        rect,
                        block,
                        span,
                        color,
                        Some(theme::priority_color(priority)),
                        is_selected,
                    );

                    let resp = ui.interact(
                        rect,
                        ui.make_persistent_id(("task-block", id)),
                        Sense::click_and_drag(),
                    );
                    let pointer_y = resp.interact_pointer_pos().map(|p| p.y);

                    if resp.drag_started() {
                        if let Some(pointer_y) = pointer_y {
                            drag.handle(DragEvent::Press {
                                task_id: id,
                                span: original,
                                pointer_y,
                                pixels_per_minute: viewport.pixels_per_minute(),
                            });
                            interaction.select = Some(id);
                        }
                    }
                    if resp.dragged() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
                        if let Some(pointer_y) = pointer_y {
                            drag.handle(DragEvent::Move { pointer_y });
                        }
                    }
                    if resp.drag_stopped() {
                        interaction.outcome = drag.handle(DragEvent::Release);
                    }

                    if resp.double_clicked() {
                        interaction.edit = Some(id);
                    } else if resp.clicked() {
                        interaction.select = Some(id);
                    }

                    if resp.hovered() && drag.is_idle() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
                        egui::show_tooltip_at_pointer(
                            ui.ctx(),
                            ui.layer_id(),
                            egui::Id::new(("task-tip", id)),
                            |ui| {
                                ui.strong(&block.title);
                                ui.label(span.to_string());
                                ui.label(format!(
                                    "{} · {}",
                                    block.category.as_deref().unwrap_or_default(),
                                    priority.label()
                                ));
                            },
                        );
                    }
                }
            }
        }

        if state.current_date == now.date() {
            draw_now_line(&painter, origin, viewport, width, now);
        }
    });

    interaction
}

fn span_rect(origin: Pos2, viewport: &DayViewport, left: f32, width: f32, span: TimelineSpan) -> Rect {
    let top = origin.y + viewport.minute_to_y(span.start_minutes);
    let height = viewport.minute_to_y(span.duration_minutes).max(MIN_BLOCK_HEIGHT);
    Rect::from_min_size(Pos2::new(left, top), Vec2::new(width, height))
}

fn show_warnings(blocks: &[TimelineBlock], conflicts: usize, ui: &mut Ui) {
    let inverted: Vec<&str> = blocks
        .iter()
        .filter(|b| matches!(b.layout, BlockLayout::Inverted { .. }))
        .map(|b| b.title.as_str())
        .collect();
    if inverted.is_empty() && conflicts == 0 {
        return;
    }
    ui.horizontal(|ui| {
        ui.add_space(8.0);
        if conflicts > 0 {
            ui.label(
                RichText::new(format!("{} overlapping entries", conflicts))
                    .size(11.0)
                    .color(theme::CONFLICT),
            );
        }
        if !inverted.is_empty() {
            ui.label(
                RichText::new(format!("Not shown, ends before it starts: {}", inverted.join(", ")))
                    .size(11.0)
                    .color(theme::WARNING),
            );
        }
    });
}

fn draw_hour_bands(painter: &egui::Painter, origin: Pos2, viewport: &DayViewport, width: f32) {
    let band = viewport.minute_to_y(60);
    for (minute, label) in hour_labels() {
        let y = origin.y + viewport.minute_to_y(minute);
        if (minute / 60) % 2 == 1 {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, band)),
                0.0,
                theme::BG_HOUR_ODD,
            );
        }
        painter.line_segment(
            [Pos2::new(origin.x + theme::GUTTER_WIDTH, y), Pos2::new(origin.x + width, y)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        if viewport.zoom >= 1.0 {
            let half = y + band / 2.0;
            painter.line_segment(
                [Pos2::new(origin.x + theme::GUTTER_WIDTH, half), Pos2::new(origin.x + width, half)],
                Stroke::new(0.5, theme::HALF_HOUR_LINE),
            );
        }
        painter.text(
            Pos2::new(origin.x + theme::GUTTER_WIDTH - 6.0, y + 2.0),
            egui::Align2::RIGHT_TOP,
            label,
            theme::font_hour(),
            theme::TEXT_SECONDARY,
        );
    }
    painter.line_segment(
        [
            Pos2::new(origin.x + theme::GUTTER_WIDTH, origin.y),
            Pos2::new(origin.x + theme::GUTTER_WIDTH, origin.y + viewport.total_height()),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_drag_hint(painter: &egui::Painter, origin: Pos2) {
    let galley = painter.layout_no_wrap(
        "Drag tasks to move · Double-click to edit · Ctrl+Scroll to zoom".to_string(),
        theme::font_small(),
        theme::TEXT_DIM,
    );
    let badge_rect = Rect::from_min_size(
        Pos2::new(origin.x + theme::GUTTER_WIDTH + 8.0, origin.y + 4.0),
        Vec2::new(galley.size().x + 16.0, 16.0),
    );
    painter.rect_filled(
        badge_rect,
        Rounding::same(8.0),
        Color32::from_rgba_premultiplied(20, 20, 28, 200),
    );
    painter.galley(
        Pos2::new(badge_rect.left() + 8.0, badge_rect.top() + 2.0),
        galley,
        Color32::TRANSPARENT,
    );
}

fn draw_now_line(painter: &egui::Painter, origin: Pos2, viewport: &DayViewport, width: f32, now: NaiveDateTime) {
    let y = origin.y + current_time_position(now.time()) as f32 * viewport.zoom;
    painter.line_segment(
        [Pos2::new(origin.x + theme::GUTTER_WIDTH, y), Pos2::new(origin.x + width, y)],
        Stroke::new(1.5, theme::NOW_LINE),
    );
    painter.circle_filled(Pos2::new(origin.x + theme::GUTTER_WIDTH, y), 4.0, theme::NOW_LINE);
    painter.text(
        Pos2::new(origin.x + theme::GUTTER_WIDTH - 6.0, y),
        egui::Align2::RIGHT_CENTER,
        now.format("%H:%M").to_string(),
        theme::font_small(),
        theme::NOW_LINE,
    );
}

fn draw_block(
    painter: &egui::Painter,
    rect: Rect,
    block: &TimelineBlock,
    span: TimelineSpan,
    fill: Color32,
    stripe: Option<Color32>,
    is_selected: bool,
) {
    let rounding = Rounding::same(theme::BLOCK_ROUNDING);

    // Soft shadow
    painter.rect_filled(rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(rect, rounding, fill);

    if let Some(stripe) = stripe {
        let stripe_rect = Rect::from_min_size(rect.min, Vec2::new(theme::PRIORITY_STRIPE, rect.height()));
        painter.rect_filled(
            stripe_rect,
            Rounding {
                nw: theme::BLOCK_ROUNDING,
                sw: theme::BLOCK_ROUNDING,
                ne: 0.0,
                se: 0.0,
            },
            stripe,
        );
    }

    if is_selected {
        painter.rect_stroke(
            rect.expand(1.5),
            Rounding::same(theme::BLOCK_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Title and time, clipped to the block
    let clipped = painter.with_clip_rect(rect.shrink(2.0));
    let text_left = rect.left() + theme::PRIORITY_STRIPE + 6.0;
    let label = if block.is_fixed() {
        format!("{}  {}", block.title, span)
    } else {
        block.title.clone()
    };
    clipped.text(
        Pos2::new(text_left, rect.top() + 2.0),
        egui::Align2::LEFT_TOP,
        label,
        theme::font_block(),
        theme::TEXT_ON_BLOCK,
    );
    if !block.is_fixed() && rect.height() >= 30.0 {
        clipped.text(
            Pos2::new(text_left, rect.top() + 16.0),
            egui::Align2::LEFT_TOP,
            span.to_string(),
            theme::font_small(),
            Color32::from_white_alpha(180),
        );
    }
}
