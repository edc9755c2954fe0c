use crate::app::TimelineApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  Open Timeline...", icons::FOLDER_OPEN)).clicked() {
                app.open_snapshot();
                ui.close_menu();
            }
            if ui.button(format!("{}  Save As...", icons::FLOPPY_DISK)).clicked() {
                app.save_snapshot_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Import CSV...", icons::FILE_CSV)).clicked() {
                app.import_csv(false);
                ui.close_menu();
            }
            if ui.button(format!("{}  Merge CSV into Timeline...", icons::FILE_CSV)).clicked() {
                app.import_csv(true);
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Load Sample Wedding", icons::HEART)).clicked() {
                app.load_sample();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            let mut detail = app.detail_mode();
            if ui.checkbox(&mut detail, "Detail mode").changed() {
                app.set_detail_mode(detail);
                ui.close_menu();
            }
            if ui.button(format!("{}  Zoom In        Ctrl+Scroll ↑", icons::MAGNIFYING_GLASS_PLUS)).clicked() {
                app.zoom_in();
                ui.close_menu();
            }
            if ui.button(format!("{}  Zoom Out      Ctrl+Scroll ↓", icons::MAGNIFYING_GLASS_MINUS)).clicked() {
                app.zoom_out();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Scroll to Today", icons::CALENDAR)).clicked() {
                app.scroll_to_today();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Save Settings").clicked() {
                app.save_settings();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("CSV Format").clicked() {
                app.show_csv_help = true;
                ui.close_menu();
            }
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned timeline name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let unsaved = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.snapshot.name, unsaved))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
