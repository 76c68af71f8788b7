use day_planner::model::query::{sort_tasks, SortKey};
use day_planner::model::{Category, Priority, Task, TaskStatus};
use egui::{Color32, RichText, Ui};
use egui_phosphor::regular as icons;
use uuid::Uuid;

use crate::app::PlannerApp;
use crate::ui::theme;

/// Actions that the task list can request.
pub enum TaskListAction {
    None,
    Select(Uuid),
    Edit(Uuid),
    ToggleComplete(Uuid),
    Delete(Uuid),
    QuickAdd,
}

/// Render the left-side task panel: quick-add line, filters and task rows.
pub fn show_task_list(app: &mut PlannerApp, ui: &mut Ui) -> TaskListAction {
    let mut action = TaskListAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Tasks").strong().size(15.0));
        ui.label(
            RichText::new(format!("({})", app.state.tasks.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        let edit = ui.add(
            egui::TextEdit::singleline(&mut app.quick_add)
                .hint_text("write report 2h high [work]")
                .desired_width(ui.available_width() - 34.0),
        );
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let btn = egui::Button::new(RichText::new(icons::PLUS).color(Color32::WHITE))
            .fill(theme::ACCENT);
        if ui.add_sized([28.0, 22.0], btn).on_hover_text("Add task").clicked() || submitted {
            action = TaskListAction::QuickAdd;
            if submitted {
                edit.request_focus();
            }
        }
    });

    ui.add_space(4.0);
    show_filters(app, ui);
    ui.add_space(2.0);
    ui.separator();

    let mut visible = app.filter.apply(&app.state.tasks);
    sort_tasks(&mut visible, app.sort_key);

    if visible.is_empty() {
        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            let text = if app.filter.is_empty() {
                "No tasks yet"
            } else {
                "No tasks match the filter"
            };
            ui.label(RichText::new(text).color(theme::TEXT_DIM));
        });
        return action;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, task) in visible.iter().enumerate() {
                if let Some(a) = show_row(task, i, app.selected_task == Some(task.id), ui) {
                    action = a;
                }
                ui.add_space(1.0);
            }
        });

    action
}

fn show_filters(app: &mut PlannerApp, ui: &mut Ui) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        egui::ComboBox::from_id_salt("filter_status")
            .width(90.0)
            .selected_text(app.filter.status.map(|s| s.label()).unwrap_or("Any status"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut app.filter.status, None, "Any status");
                for status in TaskStatus::ALL {
                    ui.selectable_value(&mut app.filter.status, Some(status), status.label());
                }
            });

        egui::ComboBox::from_id_salt("filter_priority")
            .width(90.0)
            .selected_text(app.filter.priority.map(|p| p.label()).unwrap_or("Any priority"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut app.filter.priority, None, "Any priority");
                for priority in Priority::ALL {
                    ui.selectable_value(&mut app.filter.priority, Some(priority), priority.label());
                }
            });

        let mut categories: Vec<String> = app
            .state
            .tasks
            .iter()
            .map(|t| t.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        egui::ComboBox::from_id_salt("filter_category")
            .width(90.0)
            .selected_text(app.filter.category.as_deref().unwrap_or("Any category"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut app.filter.category, None, "Any category");
                for category in categories {
                    ui.selectable_value(&mut app.filter.category, Some(category.clone()), category);
                }
            });

        egui::ComboBox::from_id_salt("sort_key")
            .width(80.0)
            .selected_text(format!("Sort: {}", app.sort_key.label()))
            .show_ui(ui, |ui| {
                for key in SortKey::ALL {
                    ui.selectable_value(&mut app.sort_key, key, key.label());
                }
            });
    });

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut app.filter.keyword)
                .hint_text(format!("{} Search", icons::MAGNIFYING_GLASS))
                .desired_width(ui.available_width() - 28.0),
        );
        if !app.filter.is_empty()
            && ui
                .add(egui::Button::new(icons::X).frame(false))
                .on_hover_text("Clear filters")
                .clicked()
        {
            app.filter = Default::default();
        }
    });
}

fn show_row(task: &Task, index: usize, is_selected: bool, ui: &mut Ui) -> Option<TaskListAction> {
    let mut action = None;
    let row_bg = if is_selected {
        theme::BG_SELECTED
    } else if index % 2 == 0 {
        theme::BG_PANEL
    } else {
        theme::BG_DARK
    };
    let frame = egui::Frame {
        fill: row_bg,
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::symmetric(6.0, 4.0),
        ..Default::default()
    };

    let frame_resp = frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 6.0;

            let check = if task.is_completed() {
                icons::CHECK_CIRCLE
            } else {
                icons::CIRCLE
            };
            if ui
                .add(egui::Button::new(RichText::new(check).size(14.0)).frame(false))
                .on_hover_text("Toggle done")
                .clicked()
            {
                action = Some(TaskListAction::ToggleComplete(task.id));
            }

            // Priority stripe
            let (stripe, _) = ui.allocate_exact_size(egui::vec2(3.0, 16.0), egui::Sense::hover());
            ui.painter()
                .rect_filled(stripe, 1.0, theme::priority_color(task.priority));

            ui.vertical(|ui| {
                let mut name = RichText::new(&task.content).size(12.0);
                if task.is_completed() {
                    name = name.strikethrough().color(theme::TEXT_DIM);
                }
                ui.add(egui::Label::new(name).truncate());

                let mut meta = format!("{} · {} min", task.category, task.estimated_duration);
                if let (Some(day), Some((start, end))) = (task.scheduled_start, task.scheduled_times()) {
                    meta.push_str(&format!(" · {} {}-{}", day.format("%m/%d"), start, end));
                }
                if let Some(deadline) = task.deadline {
                    meta.push_str(&format!(" · due {}", deadline.format("%m/%d %H:%M")));
                }
                ui.label(
                    RichText::new(meta)
                        .size(10.0)
                        .color(theme::category_color(Category::classify(&task.category))),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(RichText::new(icons::TRASH).color(theme::TEXT_DIM)).frame(false))
                    .on_hover_text("Delete task")
                    .clicked()
                {
                    action = Some(TaskListAction::Delete(task.id));
                }
                if ui
                    .add(egui::Button::new(RichText::new(icons::PENCIL_SIMPLE).color(theme::TEXT_DIM)).frame(false))
                    .on_hover_text("Edit task")
                    .clicked()
                {
                    action = Some(TaskListAction::Edit(task.id));
                }
            });
        });
    });

    // Make entire row clickable
    let row_click = ui.interact(
        frame_resp.response.rect,
        egui::Id::new(("task-row", task.id)),
        egui::Sense::click(),
    );
    if row_click.double_clicked() {
        action = Some(TaskListAction::Edit(task.id));
    } else if row_click.clicked() && action.is_none() {
        action = Some(TaskListAction::Select(task.id));
    }
    action
}
