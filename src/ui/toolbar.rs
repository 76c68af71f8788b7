use crate::app::PlannerApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top menu bar and the date navigation row.
pub fn show_toolbar(app: &mut PlannerApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_data();
                app.status_message = "Saved".to_string();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Import Timetable CSV...").clicked() {
                app.import_timetable();
                ui.close_menu();
            }
            if ui.button("  Import Tasks JSON...").clicked() {
                app.import_tasks();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Export Tasks JSON...").clicked() {
                app.export_tasks_json();
                ui.close_menu();
            }
            if ui.button("  Export Tasks CSV...").clicked() {
                app.export_tasks_csv();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Open Data Folder").clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Plan  ").font(theme::font_menu()), |ui| {
            if ui.button("  Add Fixed Schedule...").clicked() {
                app.show_add_fixed = true;
                ui.close_menu();
            }
            if ui
                .add_enabled(app.has_service(), egui::Button::new("  Re-plan Day"))
                .on_disabled_hover_text("No schedule service is configured")
                .clicked()
            {
                app.status_message = "Re-plan requested".to_string();
                app.reschedule_day();
                ui.close_menu();
            }
            if ui.button("  Clear All Scheduled Times").clicked() {
                app.clear_schedule();
                ui.close_menu();
            }
            ui.separator();
            let remembered = app
                .drag
                .remembered()
                .map(|a| a.label())
                .unwrap_or("ask every time");
            ui.label(RichText::new(format!("On drop: {}", remembered)).small().weak());
            if ui
                .add_enabled(app.drag.remembered().is_some(), egui::Button::new("  Ask Again on Drop"))
                .clicked()
            {
                app.forget_drag_choice();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.viewport.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.viewport.zoom_out();
                ui.close_menu();
            }
            if ui.button("  Reset Zoom").clicked() {
                app.viewport.reset_zoom();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Jump to Now").clicked() {
                app.go_to_today();
                ui.close_menu();
            }
            if ui.button("  Jump to Work Start").clicked() {
                app.scroll_to_minute = Some(app.settings.work_start.minutes_since_midnight());
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });
    });

    ui.horizontal(|ui| {
        if ui
            .button(icons::ARROW_LEFT)
            .on_hover_text("Previous day (Alt+←)")
            .clicked()
        {
            app.state.change_date(-1);
        }
        let mut date = app.state.current_date;
        if ui
            .add(egui_extras::DatePickerButton::new(&mut date).id_salt("toolbar_date"))
            .changed()
        {
            app.state.set_date(date);
        }
        if ui
            .button(icons::ARROW_RIGHT)
            .on_hover_text("Next day (Alt+→)")
            .clicked()
        {
            app.state.change_date(1);
        }
        if ui.button("Today").clicked() {
            app.go_to_today();
        }
        ui.add_space(8.0);
        ui.label(RichText::new(app.weekday_title()).strong());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let fixed = app.state.fixed_for_current_day().count();
            let planned = app.state.scheduled_on_current_day().count();
            ui.label(
                RichText::new(format!("{} fixed · {} planned", fixed, planned))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
