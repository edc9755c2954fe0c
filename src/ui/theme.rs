use egui::{Color32, FontId, Rounding, Stroke, Visuals};
use wedding_timeline::layout::BarKind;
use wedding_timeline::model::RiskLevel;

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(26, 24, 30);
pub const BG_PANEL: Color32 = Color32::from_rgb(33, 30, 38);
pub const BG_HEADER: Color32 = Color32::from_rgb(40, 36, 46);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(190, 120, 150, 45);
pub const BG_FIELD: Color32 = Color32::from_rgb(22, 20, 26);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(54, 50, 62);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(232, 160, 190);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(236, 232, 238);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(165, 156, 172);
pub const TEXT_DIM: Color32 = Color32::from_rgb(108, 100, 116);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);

pub const ACCENT: Color32 = Color32::from_rgb(196, 110, 148);
pub const TODAY_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const MILESTONE: Color32 = Color32::from_rgb(236, 190, 90);
pub const GRID_LINE: Color32 = Color32::from_rgb(46, 42, 54);

pub const PROGRESS_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 55);

// Bar fills by kind, before risk tinting.
pub const BAR_PARENT: Color32 = Color32::from_rgb(120, 110, 200);
pub const BAR_SEGMENT: Color32 = Color32::from_rgb(96, 140, 210);
pub const BAR_SUBTASK: Color32 = Color32::from_rgb(70, 160, 150);

pub const RISK_OK: Color32 = Color32::from_rgb(82, 170, 100);
pub const RISK_WARNING: Color32 = Color32::from_rgb(230, 160, 40);
pub const RISK_CRITICAL: Color32 = Color32::from_rgb(220, 64, 64);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const BAR_ROUNDING: f32 = 5.0;
pub const BAR_INSET: f32 = 4.0; // vertical inset so bars don't touch row edges
pub const STATUS_BAR_HEIGHT: f32 = 24.0;
pub const DETAILS_PANEL_WIDTH: f32 = 260.0;
pub const ROW_INDENT: f32 = 14.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(12.0)
}

// ── Colors derived from layout data ──────────────────────────────────────────

pub fn risk_color(risk: RiskLevel) -> Color32 {
    match risk {
        RiskLevel::Ok => RISK_OK,
        RiskLevel::Warning => RISK_WARNING,
        RiskLevel::Critical => RISK_CRITICAL,
    }
}

/// Fill for a bar. Parent-level bars take their risk color when one is set.
/// Spans are never painted.
pub fn bar_fill(kind: BarKind, risk: Option<RiskLevel>) -> Color32 {
    match (kind, risk) {
        (BarKind::ParentSpan, _) => Color32::TRANSPARENT,
        (BarKind::Condensed | BarKind::ParentSegment, Some(risk)) => risk_color(risk),
        (BarKind::Condensed | BarKind::ParentSegment, None) => BAR_PARENT,
        (BarKind::Segment, _) => BAR_SEGMENT,
        (BarKind::Subtask, _) => BAR_SUBTASK,
    }
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_FIELD;

    visuals.widgets.noninteractive.bg_fill = BG_PANEL;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(46, 42, 54);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(58, 52, 66);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);

    visuals.widgets.active.bg_fill = Color32::from_rgb(66, 58, 76);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.striped = false;

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}
