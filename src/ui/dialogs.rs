use crate::app::TimelineApp;
use crate::ui::theme;
use egui::{Context, RichText, Window};

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut TimelineApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 170.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Wedding Timeline").strong());
                ui.add_space(2.0);
                ui.label(RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION"))).color(theme::TEXT_SECONDARY));
                ui.add_space(10.0);
                ui.label("Month-scaled planning timeline");
                ui.label("built with Rust and egui.");
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

/// Render the "CSV Import Format" help dialog.
pub fn show_csv_help_dialog(app: &mut TimelineApp, ctx: &Context) {
    let mut should_close = false;

    Window::new(RichText::new("CSV Import Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([560.0, 480.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(4.0);

                // ── Delimiters ───────────────────────────────────────────
                ui.label(RichText::new("Delimiters").strong());
                ui.label("The delimiter is auto-detected: comma (,), semicolon (;), or tab.");
                ui.add_space(8.0);

                // ── Columns ──────────────────────────────────────────────
                ui.label(RichText::new("Columns").strong());
                ui.add_space(2.0);
                egui::Grid::new("csv_columns")
                    .num_columns(2)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Column").underline());
                        ui.label(RichText::new("Accepted headers (case-insensitive)").underline());
                        ui.end_row();

                        for (column, headers) in [
                            ("Name *", "Name, Task, Task Name, Label, Title, Activity"),
                            ("Start *", "Start, Start Date, From, Begin, Date, When"),
                            ("End", "End, End Date, To, Finish, Due, Until"),
                            ("Id", "Id, Task Id, Key"),
                            ("Progress", "Progress, Status, State, Stage (number, % or status word)"),
                            ("Parent", "Parent, Parent Id, Parent Task, Subtask Of"),
                            ("Milestone", "Milestone, Is Milestone, Type, Kind"),
                            ("Risk", "Risk, Risk Level (ok / warning / critical)"),
                            ("Risk message", "Risk Message, Risk Note, Warning"),
                            ("Dependencies", "Dependencies, Depends On, Predecessors (comma-separated ids)"),
                        ] {
                            ui.label(RichText::new(column).strong());
                            ui.label(headers);
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);

                // ── Notes ────────────────────────────────────────────────
                ui.label(RichText::new("Notes").strong());
                ui.add_space(2.0);
                let notes = [
                    "• Rows with a parent become subtasks of that task, matched by id or by name.",
                    "• Subtasks more than ten days apart are grouped into separate blocks.",
                    "• Dates may be ISO (2025-06-15), 15/06/2025, epoch milliseconds, and more.",
                    "• Rows without a name are skipped. Rows with unreadable or reversed dates are hidden.",
                ];
                for note in &notes {
                    ui.label(RichText::new(*note).small());
                }
                ui.add_space(10.0);

                // ── Example ──────────────────────────────────────────────
                ui.label(RichText::new("Example (semicolon-delimited)").strong());
                ui.add_space(2.0);
                let example = "Task Name;Start Date;End Date;Status;Parent;Risk\n\
                               Venue;01/01/2025;30/04/2025;In Progress;;ok\n\
                               Site visits;05/01/2025;12/01/2025;Done;Venue;\n\
                               Sign contract;20/03/2025;21/03/2025;Not Started;Venue;\n\
                               Save the date;01/05/2025;;;;";
                egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut example.to_string())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .interactive(false),
                    );
                });
                ui.add_space(8.0);
            });

            ui.separator();
            ui.add_space(4.0);
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_csv_help = false;
    }
}
