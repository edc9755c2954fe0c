use egui::{RichText, Ui};
use wedding_timeline::layout::{PreparedData, Selection};
use wedding_timeline::model::{RiskLevel, SubtaskRecord, TaskKind, TaskRecord};

use crate::ui::theme;

/// Render the right-hand panel describing the current selection.
/// Returns true when the user asked to close it.
pub fn show_details(selection: &Selection, prepared: &PreparedData, ui: &mut Ui) -> bool {
    let mut close = false;

    ui.horizontal(|ui| {
        let title = match selection {
            Selection::Parent(_) => "Task",
            Selection::Subtask(_) => "Subtask",
        };
        ui.label(RichText::new(title).strong().size(15.0).color(theme::TEXT_PRIMARY));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let btn = egui::Button::new(RichText::new(egui_phosphor::regular::X).size(11.0).color(theme::TEXT_DIM))
                .frame(false);
            if ui.add(btn).on_hover_text("Close").clicked() {
                close = true;
            }
        });
    });
    ui.separator();
    ui.add_space(4.0);

    match selection {
        Selection::Parent(task) => show_task(task, prepared, ui),
        Selection::Subtask(subtask) => show_subtask(subtask, prepared, ui),
    }

    close
}

fn show_task(task: &TaskRecord, prepared: &PreparedData, ui: &mut Ui) {
    ui.label(RichText::new(&task.name).size(14.0).color(theme::TEXT_PRIMARY));
    ui.add_space(6.0);

    egui::Grid::new("task_details")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            field(ui, "Start", task.start.format("%d/%m/%Y").to_string());
            field(ui, "End", task.end.format("%d/%m/%Y").to_string());
            let kind = match task.kind {
                TaskKind::Task => "Task",
                TaskKind::Milestone => "Milestone",
                TaskKind::ProjectBound => "Project bound",
            };
            field(ui, "Type", kind.to_string());
            let blocks = prepared.segments.get(&task.id).map(Vec::len).unwrap_or(0);
            let subtasks = prepared.subtasks.get(&task.id).map(Vec::len).unwrap_or(0);
            field(ui, "Subtasks", format!("{subtasks} in {blocks} block(s)"));
        });

    ui.add_space(6.0);
    progress(ui, task.progress);

    if let Some(risk) = task.risk_level {
        ui.add_space(8.0);
        let (icon, text) = match risk {
            RiskLevel::Ok => (egui_phosphor::regular::CHECK_CIRCLE, "On track"),
            RiskLevel::Warning => (egui_phosphor::regular::WARNING, "At risk"),
            RiskLevel::Critical => (egui_phosphor::regular::WARNING_OCTAGON, "Critical"),
        };
        ui.label(
            RichText::new(format!("{icon}  {text}"))
                .strong()
                .color(theme::risk_color(risk)),
        );
        if let Some(message) = &task.risk_message {
            ui.label(RichText::new(message).small().color(theme::TEXT_SECONDARY));
        }
    }

    if !task.dependencies.is_empty() {
        ui.add_space(8.0);
        ui.label(RichText::new("Depends on").strong().color(theme::TEXT_SECONDARY));
        for dep in &task.dependencies {
            let name = prepared.task(dep).map(|t| t.name.as_str()).unwrap_or(dep.as_str());
            ui.label(
                RichText::new(format!("{}  {name}", egui_phosphor::regular::ARROW_RIGHT))
                    .size(11.0)
                    .color(theme::TEXT_PRIMARY),
            );
        }
    }
}

fn show_subtask(subtask: &SubtaskRecord, prepared: &PreparedData, ui: &mut Ui) {
    ui.label(RichText::new(&subtask.name).size(14.0).color(theme::TEXT_PRIMARY));
    ui.add_space(6.0);

    egui::Grid::new("subtask_details")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            let parent = prepared
                .task(&subtask.parent_id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| subtask.parent_id.clone());
            field(ui, "Part of", parent);
            field(ui, "Start", subtask.start.format("%d/%m/%Y").to_string());
            field(ui, "End", subtask.end.format("%d/%m/%Y").to_string());
        });

    ui.add_space(6.0);
    progress(ui, subtask.progress);
}

fn field(ui: &mut Ui, label: &str, value: String) {
    ui.label(RichText::new(label).color(theme::TEXT_SECONDARY));
    ui.label(RichText::new(value).color(theme::TEXT_PRIMARY));
    ui.end_row();
}

fn progress(ui: &mut Ui, percent: f32) {
    let bar = egui::ProgressBar::new((percent / 100.0).clamp(0.0, 1.0))
        .text(format!("{percent:.0}% done"))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(3.0));
    ui.add(bar);
}
