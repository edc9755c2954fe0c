use chrono::{Datelike, NaiveTime};
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use wedding_timeline::layout::{Bar, BarTarget, ScrollCommand, Selection, TimelineLayout};
use wedding_timeline::model::temporal::add_months;
use wedding_timeline::model::TimelineWindow;

use crate::ui::theme;

/// Result of one frame of chart interaction.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// The interactive bar that was clicked, if any.
    pub clicked: Option<Bar>,
    /// True when the empty canvas was clicked.
    pub cleared: bool,
    /// Ctrl+Scroll over the canvas: positive zooms in, negative zooms out.
    pub zoom: i8,
}

/// Render the scrollable timeline canvas.
pub fn show_timeline_chart(
    layout: &TimelineLayout,
    row_height: f32,
    header_height: f32,
    selection: Option<&Selection>,
    scroll: Option<ScrollCommand>,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let available = ui.available_size();
    let (canvas_w, canvas_h) = layout.canvas_size;
    let chart_width = canvas_w.max(available.x);
    let chart_height = canvas_h.max(available.y);

    let mut area = egui::ScrollArea::horizontal()
        .id_salt("timeline_scroll")
        .auto_shrink([false, false]);
    match scroll {
        Some(ScrollCommand::CenterOn(x)) => area = area.horizontal_scroll_offset(x),
        Some(ScrollCommand::ResetToOrigin) => area = area.horizontal_scroll_offset(0.0),
        None => {}
    }

    area.show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(Vec2::new(chart_width, chart_height), Sense::click());
        let origin = response.rect.min;
        let mut consumed_click = false;

        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

        // Alternating row bands
        for i in 0..layout.rows.len() {
            let y = origin.y + header_height + i as f32 * row_height;
            let band = if i % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(chart_width, row_height)),
                0.0,
                band,
            );
            painter.line_segment(
                [
                    Pos2::new(origin.x, y + row_height),
                    Pos2::new(origin.x + chart_width, y + row_height),
                ],
                Stroke::new(0.5, theme::BORDER_SUBTLE),
            );
        }

        draw_month_header(&painter, origin, &layout.window, chart_width, header_height, chart_height);

        for bar in layout.bars.iter().filter(|b| b.visible) {
            let selected = is_selected(bar, selection);
            let bar_rect = draw_bar(&painter, origin, bar, row_height, header_height, selected);
            if !bar.interactive {
                continue;
            }

            let mut bar_response = ui.interact(
                bar_rect,
                ui.make_persistent_id(("timeline-bar", &bar.key)),
                Sense::click(),
            );
            if let Some(tip) = &bar.tooltip {
                bar_response = bar_response.on_hover_text(tip);
            }
            if bar_response.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            if bar_response.clicked() {
                interaction.clicked = Some(bar.clone());
                consumed_click = true;
            }
        }

        for marker in &layout.milestones {
            let x = origin.x + marker.x;
            painter.line_segment(
                [Pos2::new(x, origin.y + header_height), Pos2::new(x, origin.y + chart_height)],
                Stroke::new(1.0, theme::MILESTONE.gamma_multiply(0.6)),
            );
            let diamond = draw_diamond(&painter, Pos2::new(x, origin.y + header_height - 6.0), 5.0);
            ui.interact(
                diamond.expand(3.0),
                ui.make_persistent_id(("milestone", &marker.task_id)),
                Sense::hover(),
            )
            .on_hover_text(format!("{}\n{}", marker.name, marker.date.format("%d/%m/%Y")));
        }

        if let Some(today_x) = layout.today_x {
            draw_today_line(&painter, origin, today_x, header_height, chart_height);
        }

        if response.clicked() && !consumed_click {
            interaction.cleared = true;
        }

        if response.hovered() {
            let zoom = ui.input(|i| i.zoom_delta());
            if zoom > 1.0 {
                interaction.zoom = 1;
            } else if zoom < 1.0 {
                interaction.zoom = -1;
            }
        }
    });

    interaction
}

fn is_selected(bar: &Bar, selection: Option<&Selection>) -> bool {
    match (&bar.target, selection) {
        (BarTarget::Parent(id), Some(Selection::Parent(task))) => *id == task.id,
        (BarTarget::Subtask { parent_id, subtask_id }, Some(Selection::Subtask(sub))) => {
            *parent_id == sub.parent_id && *subtask_id == sub.id
        }
        _ => false,
    }
}

fn draw_month_header(
    painter: &egui::Painter,
    origin: Pos2,
    window: &TimelineWindow,
    width: f32,
    header_height: f32,
    height: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, header_height)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + header_height),
            Pos2::new(origin.x + width, origin.y + header_height),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let Some(first) = window.start.date().with_day(1) else {
        return;
    };
    let first = first.and_time(NaiveTime::MIN);
    let column = window.column_width_px;

    for i in 0..window.column_count() {
        let month = add_months(first, i);
        let x = origin.x + window.x_for(month).max(0.0);

        painter.line_segment(
            [Pos2::new(x, origin.y + header_height), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );

        // Narrow columns only label January, with the year.
        let label = if column >= 60.0 {
            Some(month.format("%b %Y").to_string())
        } else if column >= 28.0 {
            Some(month.format("%b").to_string())
        } else if month.month() == 1 {
            Some(month.format("%Y").to_string())
        } else {
            None
        };
        if let Some(label) = label {
            painter.text(
                Pos2::new(x + 4.0, origin.y + 16.0),
                egui::Align2::LEFT_CENTER,
                label,
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }
        if column >= 28.0 && (i == 0 || month.month() == 1) && column < 60.0 {
            painter.text(
                Pos2::new(x + 4.0, origin.y + 32.0),
                egui::Align2::LEFT_CENTER,
                month.format("%Y").to_string(),
                theme::font_sub(),
                theme::TEXT_SECONDARY,
            );
        }
    }
}

fn draw_bar(
    painter: &egui::Painter,
    origin: Pos2,
    bar: &Bar,
    row_height: f32,
    header_height: f32,
    is_selected: bool,
) -> Rect {
    let y = origin.y + header_height + bar.row_index as f32 * row_height;
    let inset = theme::BAR_INSET;
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + bar.left, y + inset),
        Vec2::new(bar.width, (row_height - inset * 2.0).max(2.0)),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let fill = theme::bar_fill(bar.kind, bar.risk_level);

    // Soft shadow
    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, fill);

    if bar.progress > 0.0 {
        let progress_width = bar.width * (bar.progress / 100.0).clamp(0.0, 1.0);
        let progress_rect = Rect::from_min_size(bar_rect.min, Vec2::new(progress_width, bar_rect.height()));
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar.width > 36.0 {
        if let Some(name) = bar.tooltip.as_deref().and_then(|t| t.lines().next()) {
            let galley = painter.layout_no_wrap(name.to_string(), theme::font_bar(), theme::TEXT_ON_BAR);
            let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
            painter
                .with_clip_rect(bar_rect.shrink(2.0))
                .galley(Pos2::new(bar_rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
        }
    }

    bar_rect
}

fn draw_diamond(painter: &egui::Painter, center: Pos2, size: f32) -> Rect {
    let points = vec![
        Pos2::new(center.x, center.y - size),
        Pos2::new(center.x + size, center.y),
        Pos2::new(center.x, center.y + size),
        Pos2::new(center.x - size, center.y),
    ];
    painter.add(egui::Shape::convex_polygon(points, theme::MILESTONE, Stroke::NONE));
    Rect::from_center_size(center, Vec2::splat(size * 2.0))
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, today_x: f32, header_height: f32, height: f32) {
    let x = origin.x + today_x;
    painter.line_segment(
        [Pos2::new(x, origin.y + header_height), Pos2::new(x, origin.y + height)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + header_height - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}
