use std::path::PathBuf;

use wedding_timeline::config::TimelineConfig;
use wedding_timeline::layout::{InteractionController, LayoutMemo, PreparedData, Selection};
use wedding_timeline::model::TimelineSnapshot;

use crate::ui;
use crate::ui::row_list::RowListAction;

/// Main application state.
pub struct TimelineApp {
    pub snapshot: TimelineSnapshot,
    pub prepared: PreparedData,
    pub config: TimelineConfig,
    pub controller: InteractionController,
    pub memo: LayoutMemo,
    pub selection: Option<Selection>,
    pub file_path: Option<PathBuf>,

    // Dialog state
    pub show_about: bool,
    pub show_csv_help: bool,

    // Status message
    pub status_message: String,

    revision: u64,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let config = TimelineConfig::load_or_default();
        let snapshot = wedding_timeline::io::sample_snapshot(chrono::Utc::now().date_naive());
        let prepared = PreparedData::build(&snapshot, &config, 0);

        let mut app = Self {
            snapshot,
            prepared,
            config,
            controller: InteractionController::new(),
            memo: LayoutMemo::default(),
            selection: None,
            file_path: None,
            show_about: false,
            show_csv_help: false,
            status_message: "Ready".to_string(),
            revision: 0,
        };
        if app.config.detail_mode {
            app.set_detail_mode(true);
        }
        app
    }

    /// Replace the data behind the timeline and rebuild everything derived from it.
    fn set_snapshot(&mut self, snapshot: TimelineSnapshot, file_path: Option<PathBuf>) {
        self.revision += 1;
        self.snapshot = snapshot;
        self.file_path = file_path;
        self.selection = None;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.prepared = PreparedData::build(&self.snapshot, &self.config, self.revision);
        // Re-derive the expand sets from the new segment ids.
        if self.controller.detail_mode() {
            self.controller.set_detail_mode(false, &self.prepared.segments);
            self.controller.set_detail_mode(true, &self.prepared.segments);
        }
        self.controller.rearm_auto_scroll();
    }

    // --- File operations ---

    pub fn open_snapshot(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Wedding Timeline", &["timeline.json", "json"])
            .pick_file()
        {
            match wedding_timeline::io::load_snapshot(&path) {
                Ok(snapshot) => {
                    self.set_snapshot(snapshot, Some(path));
                    self.status_message = format!("Loaded {} tasks", self.prepared.tasks.len());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to open timeline");
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_snapshot_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Wedding Timeline", &["timeline.json", "json"])
            .set_file_name(format!("{}.timeline.json", self.snapshot.name))
            .save_file()
        {
            match wedding_timeline::io::save_snapshot(&self.snapshot, &path) {
                Ok(()) => {
                    self.file_path = Some(path);
                    self.status_message = "Timeline saved".to_string();
                }
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    /// Import a CSV file. With `merge` the rows are appended to the current
    /// timeline; otherwise they replace it.
    pub fn import_csv(&mut self, merge: bool) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        else {
            return;
        };

        let imported = match wedding_timeline::io::import_csv(&path) {
            Ok(imported) => imported,
            Err(e) => {
                tracing::warn!(error = %e, "CSV import failed");
                self.status_message = format!("CSV import failed: {}", e);
                return;
            }
        };

        let (tasks, subtasks, skipped) = (imported.tasks.len(), imported.subtasks.len(), imported.skipped);
        if merge {
            let mut snapshot = self.snapshot.clone();
            snapshot.tasks.extend(imported.tasks);
            snapshot.subtasks.extend(imported.subtasks);
            let file_path = self.file_path.clone();
            self.set_snapshot(snapshot, file_path);
        } else {
            // Derive the timeline name from the file name
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Imported Timeline")
                .to_string();
            let mut snapshot = TimelineSnapshot::new(name);
            snapshot.bounds = self.snapshot.bounds.clone();
            snapshot.tasks = imported.tasks;
            snapshot.subtasks = imported.subtasks;
            self.set_snapshot(snapshot, None);
        }

        self.status_message = if skipped > 0 {
            format!("Imported {} tasks and {} subtasks ({} rows skipped)", tasks, subtasks, skipped)
        } else {
            format!("Imported {} tasks and {} subtasks", tasks, subtasks)
        };
    }

    pub fn load_sample(&mut self) {
        let snapshot = wedding_timeline::io::sample_snapshot(chrono::Utc::now().date_naive());
        self.set_snapshot(snapshot, None);
        self.status_message = "Sample wedding loaded".to_string();
    }

    pub fn save_settings(&mut self) {
        self.config.detail_mode = self.controller.detail_mode();
        let Some(path) = TimelineConfig::default_path() else {
            self.status_message = "No settings directory available".to_string();
            return;
        };
        match self.config.save(&path) {
            Ok(()) => self.status_message = format!("Settings saved to {}", path.display()),
            Err(e) => self.status_message = format!("Error saving settings: {}", e),
        }
    }

    // --- View operations ---

    pub fn detail_mode(&self) -> bool {
        self.controller.detail_mode()
    }

    pub fn set_detail_mode(&mut self, on: bool) {
        if self.controller.set_detail_mode(on, &self.prepared.segments) {
            self.status_message = if on { "Detail mode on" } else { "Detail mode off" }.to_string();
        }
    }

    pub fn scroll_to_today(&mut self) {
        self.controller.rearm_auto_scroll();
    }

    pub fn zoom_in(&mut self) {
        self.config.zoom_in();
        self.report_zoom();
    }

    pub fn zoom_out(&mut self) {
        self.config.zoom_out();
        self.report_zoom();
    }

    fn report_zoom(&mut self) {
        // The layout memo keys on the config, so the next frame refits.
        self.status_message = format!("Month column: {:.0}px", self.config.column_width_px);
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_sub())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let subtasks: usize = self.prepared.subtasks.values().map(Vec::len).sum();
                        ui.label(
                            egui::RichText::new(format!(
                                "Tasks: {} · Subtasks: {}{}",
                                self.prepared.tasks.len(),
                                subtasks,
                                if self.controller.detail_mode() { " · Detail" } else { "" }
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Right panel: selection details
        let mut close_details = false;
        if let Some(selection) = &self.selection {
            egui::SidePanel::right("details_panel")
                .default_width(ui::theme::DETAILS_PANEL_WIDTH)
                .resizable(true)
                .frame(
                    egui::Frame::default()
                        .fill(ui::theme::BG_PANEL)
                        .inner_margin(egui::Margin::same(10.0))
                        .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
                )
                .show(ctx, |ui| {
                    close_details = ui::details::show_details(selection, &self.prepared, ui);
                });
        }
        if close_details {
            self.selection = None;
        }

        // Central panel: label column + timeline chart
        let mut row_action = RowListAction::None;
        let mut chart = ui::timeline_chart::ChartInteraction::default();
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let today = chrono::Utc::now().naive_utc();
            let layout = self.memo.get(
                &self.prepared,
                self.controller.expand_state(),
                self.controller.detail_mode(),
                ui.available_width(),
                today,
                &self.config,
            );
            let scroll = self.controller.auto_scroll(&layout.window, today);
            let row_height = self.config.row_height_px;
            let header_height = self.config.header_height_px;
            let label_width = self.config.side_panel_width_px;

            egui::ScrollArea::vertical()
                .id_salt("timeline_rows")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.horizontal_top(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        ui.allocate_ui(egui::vec2(label_width, layout.canvas_size.1), |ui| {
                            ui.set_width(label_width);
                            ui.spacing_mut().item_spacing.y = 0.0;
                            row_action = ui::row_list::show_row_list(
                                &layout.rows,
                                row_height,
                                header_height,
                                self.controller.detail_mode(),
                                self.controller.expand_state(),
                                self.selection.as_ref(),
                                ui,
                            );
                        });
                        chart = ui::timeline_chart::show_timeline_chart(
                            layout,
                            row_height,
                            header_height,
                            self.selection.as_ref(),
                            scroll,
                            ui,
                        );
                    });
                });
        });

        match row_action {
            RowListAction::ToggleParent(id) => {
                self.controller.toggle_parent(&id);
            }
            RowListAction::ToggleSegment(id) => {
                self.controller.toggle_segment(&id);
            }
            RowListAction::SelectParent(id) => {
                if let Some(task) = self.prepared.task(&id) {
                    self.selection = Some(Selection::Parent(task.clone()));
                }
            }
            RowListAction::None => {}
        }

        if let Some(bar) = chart.clicked {
            let routed = self.controller.handle_click(
                &bar,
                &self.prepared.tasks,
                &self.prepared.subtasks,
                &mut self.selection,
            );
            if routed {
                if let Some(selection) = &self.selection {
                    self.status_message = match selection {
                        Selection::Parent(task) => format!("Selected '{}'", task.name),
                        Selection::Subtask(sub) => format!("Selected subtask '{}'", sub.name),
                    };
                }
            }
        } else if chart.cleared {
            self.selection = None;
        }

        match chart.zoom {
            z if z > 0 => self.zoom_in(),
            z if z < 0 => self.zoom_out(),
            _ => {}
        }

        // Dialogs
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.show_csv_help {
            ui::dialogs::show_csv_help_dialog(self, ctx);
        }
    }
}
