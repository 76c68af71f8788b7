use day_planner::model::{Category, Priority};
use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HOUR_ODD: Color32 = Color32::from_rgb(27, 27, 36);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 45);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(90, 140, 220);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_ON_BLOCK: Color32 = Color32::from_rgb(255, 255, 255);

pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);
pub const NOW_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 46, 58);
pub const HALF_HOUR_LINE: Color32 = Color32::from_rgb(36, 38, 48);
pub const FIXED_BLOCK: Color32 = Color32::from_rgb(88, 96, 118);
pub const CONFLICT: Color32 = Color32::from_rgb(229, 57, 53);
pub const WARNING: Color32 = Color32::from_rgb(255, 193, 7);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const GUTTER_WIDTH: f32 = 56.0;
pub const BLOCK_ROUNDING: f32 = 5.0;
pub const BLOCK_INSET: f32 = 4.0;
pub const PRIORITY_STRIPE: f32 = 4.0;
pub const STATUS_BAR_HEIGHT: f32 = 24.0;
pub const SIDE_PANEL_WIDTH: f32 = 340.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_hour() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_block() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

// ── Domain colours ───────────────────────────────────────────────────────────

pub fn category_color(category: Category) -> Color32 {
    match category {
        Category::Work => Color32::from_rgb(66, 133, 244),
        Category::Study => Color32::from_rgb(171, 71, 188),
        Category::Life => Color32::from_rgb(52, 168, 83),
        Category::Exercise => Color32::from_rgb(251, 140, 0),
        Category::Other => Color32::from_rgb(0, 150, 170),
    }
}

pub fn priority_color(priority: Priority) -> Color32 {
    match priority {
        Priority::High => Color32::from_rgb(229, 57, 53),
        Priority::Medium => Color32::from_rgb(255, 193, 7),
        Priority::Low => Color32::from_rgb(120, 190, 120),
    }
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = Color32::from_rgb(20, 20, 28);

    let rounding = Rounding::same(4.0);
    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    widgets.noninteractive.rounding = rounding;
    widgets.inactive.bg_fill = Color32::from_rgb(42, 44, 56);
    widgets.inactive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    widgets.inactive.rounding = rounding;
    widgets.hovered.bg_fill = Color32::from_rgb(52, 54, 68);
    widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    widgets.hovered.rounding = rounding;
    widgets.active.bg_fill = Color32::from_rgb(60, 62, 76);
    widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    widgets.active.rounding = rounding;

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}
