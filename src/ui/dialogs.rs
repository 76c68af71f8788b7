use crate::app::PlannerApp;
use crate::ui::theme;
use day_planner::drag::{DragAction, DragEvent, DragOutcome};
use day_planner::model::schedule::{weekday_label, WEEK};
use day_planner::model::{Priority, TaskStatus};
use egui::{Color32, Context, RichText, Window};

fn primary_button(text: &str) -> egui::Button<'_> {
    egui::Button::new(RichText::new(text).color(Color32::WHITE))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0))
}

/// Ask what to do with a dropped task. Returns the settled move once the user decides.
pub fn show_drag_dialog(app: &mut PlannerApp, ctx: &Context) -> Option<DragOutcome> {
    let pending = app.drag.pending()?.clone();
    let title = app
        .state
        .task(pending.task_id)
        .map(|t| t.content.clone())
        .unwrap_or_default();
    let mut event = None;
    let can_replan = app.has_service();

    Window::new(RichText::new("Task moved").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([340.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(RichText::new(&title).strong());
            ui.label(
                RichText::new(format!("{}  →  {}", pending.from, pending.to))
                    .color(theme::TEXT_SECONDARY),
            );
            ui.add_space(6.0);
            ui.checkbox(&mut app.remember_drag_choice, "Remember my choice");
            if !can_replan {
                ui.label(
                    RichText::new("Re-planning needs a schedule service.")
                        .small()
                        .color(theme::TEXT_DIM),
                );
            }
            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                for action in [DragAction::SaveOnly, DragAction::Reschedule] {
                    let button = if action == DragAction::SaveOnly {
                        primary_button(action.label())
                    } else {
                        egui::Button::new(action.label())
                    };
                    let enabled = can_replan || action != DragAction::Reschedule;
                    if ui
                        .add_enabled(enabled, button)
                        .on_disabled_hover_text("No schedule service is configured")
                        .clicked()
                    {
                        event = Some(DragEvent::Confirm {
                            action,
                            remember: app.remember_drag_choice,
                        });
                    }
                }
            });
            ui.add_space(2.0);
            if ui.button("Cancel").clicked() {
                event = Some(DragEvent::Cancel);
            }
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        event = Some(DragEvent::Cancel);
    }
    let event = event?;
    if matches!(event, DragEvent::Cancel) {
        app.status_message = "Move cancelled".to_string();
    }
    app.remember_drag_choice = false;
    app.drag.handle(event)
}

/// Render the "Add fixed schedule" dialog.
pub fn show_add_fixed_dialog(app: &mut PlannerApp, ctx: &Context) {
    let mut should_close = false;
    let mut submit = false;
    let mut remove = None;
    Window::new(RichText::new("Add Fixed Schedule").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([340.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            let form = &mut app.fixed_form;
            egui::Grid::new("add_fixed_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Title").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [200.0, 24.0],
                        egui::TextEdit::singleline(&mut form.title).hint_text("Linear Algebra"),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Day").color(theme::TEXT_SECONDARY));
                    egui::ComboBox::from_id_salt("fixed_weekday")
                        .selected_text(weekday_label(form.weekday))
                        .show_ui(ui, |ui| {
                            for day in WEEK {
                                ui.selectable_value(&mut form.weekday, day, weekday_label(day));
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add_sized([80.0, 24.0], egui::TextEdit::singleline(&mut form.start).hint_text("HH:MM"));
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.add_sized([80.0, 24.0], egui::TextEdit::singleline(&mut form.end).hint_text("HH:MM"));
                    ui.end_row();

                    ui.label(RichText::new("Location").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [200.0, 24.0],
                        egui::TextEdit::singleline(&mut form.location).hint_text("optional"),
                    );
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.add_sized([80.0, 28.0], primary_button("Add")).clicked() {
                    submit = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);

            if !app.state.fixed_schedules.is_empty() {
                ui.separator();
                ui.label(RichText::new("Existing").color(theme::TEXT_SECONDARY));
                egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                    for schedule in &app.state.fixed_schedules {
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(format!(
                                    "{} {}-{}",
                                    weekday_label(schedule.weekday),
                                    schedule.start,
                                    schedule.end
                                ))
                                .monospace()
                                .size(11.0),
                            );
                            ui.label(&schedule.title);
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui
                                    .add(egui::Button::new(egui_phosphor::regular::TRASH).frame(false))
                                    .on_hover_text("Remove")
                                    .clicked()
                                {
                                    remove = Some(schedule.id);
                                }
                            });
                        });
                    }
                });
            }
        });

    if let Some(id) = remove {
        app.delete_fixed(id);
    }
    if submit && app.add_fixed_from_form() {
        should_close = true;
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_add_fixed = false;
    }
}

/// Render the task editor dialog.
pub fn show_edit_task_dialog(app: &mut PlannerApp, ctx: &Context) {
    let mut save = false;
    let mut cancel = false;
    let Some(form) = app.editing.as_mut() else {
        return;
    };

    Window::new(RichText::new("Edit Task").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([380.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            let task = &mut form.task;
            egui::Grid::new("edit_task_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Content").color(theme::TEXT_SECONDARY));
                    ui.add_sized([240.0, 24.0], egui::TextEdit::singleline(&mut task.content));
                    ui.end_row();

                    ui.label(RichText::new("Category").color(theme::TEXT_SECONDARY));
                    ui.add_sized([140.0, 24.0], egui::TextEdit::singleline(&mut task.category));
                    ui.end_row();

                    ui.label(RichText::new("Priority").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        for priority in Priority::ALL {
                            ui.radio_value(&mut task.priority, priority, priority.as_str());
                        }
                    });
                    ui.end_row();

                    ui.label(RichText::new("Status").color(theme::TEXT_SECONDARY));
                    egui::ComboBox::from_id_salt("edit_status")
                        .selected_text(task.status.label())
                        .show_ui(ui, |ui| {
                            for status in TaskStatus::ALL {
                                ui.selectable_value(&mut task.status, status, status.label());
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("Duration").color(theme::TEXT_SECONDARY));
                    ui.add(
                        egui::DragValue::new(&mut task.estimated_duration)
                            .range(1..=1440)
                            .suffix(" min"),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Deadline").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        let mut has_deadline = task.deadline.is_some();
                        if ui.checkbox(&mut has_deadline, "").changed() {
                            task.deadline = has_deadline
                                .then(|| task.created_at.date().and_hms_opt(23, 59, 0))
                                .flatten();
                        }
                        if let Some(deadline) = task.deadline.as_mut() {
                            let mut date = deadline.date();
                            if ui
                                .add(egui_extras::DatePickerButton::new(&mut date).id_salt("edit_deadline"))
                                .changed()
                            {
                                *deadline = date.and_time(deadline.time());
                            }
                        }
                    });
                    ui.end_row();

                    ui.label(RichText::new("Starts at").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [80.0, 24.0],
                        egui::TextEdit::singleline(&mut form.start).hint_text("HH:MM"),
                    );
                    ui.end_row();
                });
            ui.label(
                RichText::new("Leave the start empty to take the task off the timeline.")
                    .small()
                    .color(theme::TEXT_DIM),
            );

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.add_sized([80.0, 28.0], primary_button("Save")).clicked() {
                    save = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    cancel = true;
                }
            });
            ui.add_space(2.0);
        });

    if save {
        app.finish_edit();
    } else if cancel || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.editing = None;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut PlannerApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Day Planner").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Plan your day on a 24-hour timeline.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
