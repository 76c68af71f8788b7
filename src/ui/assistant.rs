use chrono::NaiveDateTime;
use day_planner::model::TaskStatistics;
use egui::{Color32, RichText, Ui};

use crate::app::PlannerApp;
use crate::ui::theme;

const MAX_MESSAGES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Reminder,
    Urgent,
}

#[derive(Debug, Clone)]
pub struct AssistantMessage {
    pub at: NaiveDateTime,
    pub text: String,
    pub tone: Tone,
}

impl AssistantMessage {
    pub fn new(at: NaiveDateTime, text: impl Into<String>, tone: Tone) -> Self {
        Self {
            at,
            text: text.into(),
            tone,
        }
    }
}

fn tone_color(tone: Tone) -> Color32 {
    match tone {
        Tone::Info => theme::ACCENT,
        Tone::Reminder => theme::WARNING,
        Tone::Urgent => theme::CONFLICT,
    }
}

/// Render the right-side assistant panel: day statistics and the message feed.
pub fn show_assistant(app: &mut PlannerApp, ui: &mut Ui) {
    ui.add_space(2.0);
    ui.label(RichText::new("Assistant").strong().size(15.0));
    ui.add_space(4.0);

    let stats = TaskStatistics::collect(&app.state.tasks);
    egui::Grid::new("stats_grid")
        .num_columns(2)
        .spacing([12.0, 2.0])
        .show(ui, |ui| {
            ui.label(RichText::new("Pending").color(theme::TEXT_SECONDARY));
            ui.label(stats.pending.to_string());
            ui.end_row();
            ui.label(RichText::new("Completed").color(theme::TEXT_SECONDARY));
            ui.label(stats.completed.to_string());
            ui.end_row();
            ui.label(RichText::new("High priority").color(theme::TEXT_SECONDARY));
            ui.label(stats.high.to_string());
            ui.end_row();
            ui.label(RichText::new("Planned time").color(theme::TEXT_SECONDARY));
            ui.label(format!("{}h {:02}m", stats.total_minutes / 60, stats.total_minutes % 60));
            ui.end_row();
        });
    ui.add(
        egui::ProgressBar::new(stats.completion_ratio())
            .show_percentage()
            .fill(theme::ACCENT),
    );

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        if ui
            .button(format!("{} Suggest", egui_phosphor::regular::LIGHTBULB))
            .clicked()
        {
            app.suggest();
        }
        if ui.button("Clear").clicked() {
            app.assistant.clear();
        }
    });
    ui.separator();

    if app.assistant.len() > MAX_MESSAGES {
        let excess = app.assistant.len() - MAX_MESSAGES;
        app.assistant.drain(..excess);
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in &app.assistant {
                let frame = egui::Frame {
                    fill: theme::BG_DARK,
                    rounding: egui::Rounding::same(4.0),
                    inner_margin: egui::Margin::symmetric(6.0, 4.0),
                    stroke: egui::Stroke::new(1.0, tone_color(message.tone)),
                    ..Default::default()
                };
                frame.show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(
                        RichText::new(message.at.format("%H:%M").to_string())
                            .font(theme::font_small())
                            .color(theme::TEXT_DIM),
                    );
                    ui.label(RichText::new(&message.text).size(12.0));
                });
                ui.add_space(3.0);
            }
        });
}
