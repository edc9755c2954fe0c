use egui::{Color32, RichText, Sense, Ui, Vec2};
use wedding_timeline::layout::{ExpandState, Row, RowKind, Selection};

use crate::ui::theme;

/// Actions that the row list can request.
pub enum RowListAction {
    None,
    ToggleParent(String),
    ToggleSegment(String),
    SelectParent(String),
}

/// Render the fixed label column to the left of the chart.
///
/// Rows are laid out at exactly `row_height` so they stay aligned with the
/// canvas bands. Expand chevrons are only offered in detail mode.
pub fn show_row_list(
    rows: &[Row],
    row_height: f32,
    header_height: f32,
    detail_mode: bool,
    expand: &ExpandState,
    selection: Option<&Selection>,
    ui: &mut Ui,
) -> RowListAction {
    let mut action = RowListAction::None;
    let width = ui.available_width();

    // Header cell, same height as the month header
    let (header_rect, _) = ui.allocate_exact_size(Vec2::new(width, header_height), Sense::hover());
    ui.painter().rect_filled(header_rect, 0.0, theme::BG_HEADER);
    ui.painter().text(
        header_rect.left_center() + egui::vec2(8.0, 0.0),
        egui::Align2::LEFT_CENTER,
        format!("Tasks ({})", rows.iter().filter(|r| r.kind == RowKind::Parent).count()),
        theme::font_header(),
        theme::TEXT_SECONDARY,
    );

    for (i, row) in rows.iter().enumerate() {
        let (rect, response) = ui.allocate_exact_size(Vec2::new(width, row_height), Sense::click());
        let selected = match selection {
            Some(Selection::Parent(task)) => row.kind == RowKind::Parent && row.id == task.id,
            Some(Selection::Subtask(sub)) => {
                row.kind == RowKind::Subtask && row.parent_id == sub.parent_id && row.id == sub.id
            }
            None => false,
        };
        let fill = if selected {
            theme::BG_SELECTED
        } else if i % 2 == 0 {
            theme::BG_PANEL
        } else {
            theme::BG_DARK
        };
        ui.painter().rect_filled(rect, 0.0, fill);

        let indent = 6.0 + row.level as f32 * theme::ROW_INDENT;
        let mut child = ui.new_child(
            egui::UiBuilder::new()
                .max_rect(rect.shrink2(egui::vec2(0.0, 2.0)))
                .layout(egui::Layout::left_to_right(egui::Align::Center)),
        );
        child.add_space(indent);

        if detail_mode && row.expandable {
            let expanded = match row.kind {
                RowKind::Parent => expand.is_parent_expanded(&row.id),
                RowKind::Segment => expand.is_segment_expanded(&row.id),
                RowKind::Subtask => false,
            };
            let icon = if expanded {
                egui_phosphor::regular::CARET_DOWN
            } else {
                egui_phosphor::regular::CARET_RIGHT
            };
            let chevron = child.add(
                egui::Button::new(RichText::new(icon).size(11.0).color(theme::TEXT_SECONDARY)).frame(false),
            );
            if chevron.clicked() {
                action = match row.kind {
                    RowKind::Parent => RowListAction::ToggleParent(row.id.clone()),
                    _ => RowListAction::ToggleSegment(row.id.clone()),
                };
            }
        } else {
            child.add_space(14.0);
        }

        let color = match (selected, row.kind) {
            (true, _) => Color32::WHITE,
            (false, RowKind::Parent) => theme::TEXT_PRIMARY,
            (false, RowKind::Segment) => theme::TEXT_SECONDARY,
            (false, RowKind::Subtask) => theme::TEXT_DIM,
        };
        let size = if row.kind == RowKind::Parent { 12.0 } else { 11.0 };
        child.add(egui::Label::new(RichText::new(&row.label).size(size).color(color)).truncate());

        if row.kind == RowKind::Parent && response.clicked() {
            action = RowListAction::SelectParent(row.id.clone());
        }
    }

    action
}
