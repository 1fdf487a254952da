use egui::{menu, RichText, Ui};

use crate::app::TimelineApp;
use crate::timeline::ViewMode;
use crate::ui::theme;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.button("Open dataset…").clicked() {
                app.open_dataset();
                ui.close_menu();
            }
            if ui.button("Load sample").clicked() {
                app.load_sample();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Open settings folder").clicked() {
                app.open_settings_folder();
                ui.close_menu();
            }
        });

        ui.menu_button("View", |ui| {
            if ui.button("Zoom in          Ctrl+Scroll").clicked() {
                let mode = app.view.view_mode.finer();
                app.set_view_mode(mode);
                ui.close_menu();
            }
            if ui.button("Zoom out        Ctrl+Scroll").clicked() {
                let mode = app.view.view_mode.coarser();
                app.set_view_mode(mode);
                ui.close_menu();
            }
        });

        ui.menu_button("Help", |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();
        for mode in ViewMode::ALL {
            let active = app.view.view_mode == mode;
            if ui.selectable_label(active, mode.label()).clicked() && !active {
                app.set_view_mode(mode);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(&app.dataset.name).size(11.0).color(theme::TEXT_SECONDARY));
            ui.label(
                RichText::new("Drag bars to move · Drag edges to resize · Ctrl+Scroll to zoom")
                    .size(10.0)
                    .color(theme::TEXT_DIM),
            );
        });
    });
}
