use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime, TimeDelta};

use crate::config::Settings;
use crate::io;
use crate::model::{Dataset, TaskId};
use crate::timeline::{InteractionEngine, ViewMode, ViewState};
use crate::ui;
use crate::ui::task_sidebar::SidebarAction;
use crate::ui::timeline_chart::{ChartScroll, CursorCapture};

/// Main application state.
pub struct TimelineApp {
    pub dataset: Dataset,
    pub view: ViewState,
    pub settings: Settings,
    pub dataset_path: Option<PathBuf>,
    pub selected_task: Option<TaskId>,
    pub status_message: String,
    pub show_about: bool,
    engine: InteractionEngine<CursorCapture>,
    scroll: ChartScroll,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        ui::theme::apply_theme(&cc.egui_ctx);

        let dataset = Dataset::sample(chrono::Local::now().date_naive());
        let view = Self::view_for(&dataset, &settings);
        let engine = InteractionEngine::with_throttle(CursorCapture::default(), settings.drag_throttle());

        Self {
            dataset,
            view,
            settings,
            dataset_path: None,
            selected_task: None,
            status_message: "Ready".to_string(),
            show_about: false,
            engine,
            scroll: ChartScroll::default(),
        }
    }

    /// Visible range for `dataset`: its task span plus padding, or a window
    /// around today when it has no tasks.
    fn view_for(dataset: &Dataset, settings: &Settings) -> ViewState {
        Self::view_around(dataset, settings, chrono::Local::now().date_naive())
    }

    fn view_around(dataset: &Dataset, settings: &Settings, today: NaiveDate) -> ViewState {
        let padding = settings.range_padding();
        let (start, end) = dataset.padded_range(padding).unwrap_or_else(|| {
            let today = today.and_time(NaiveTime::MIN);
            let pad = TimeDelta::try_days(padding.max(1)).unwrap_or_default();
            (
                today.checked_sub_signed(pad).unwrap_or(today),
                today.checked_add_signed(pad).unwrap_or(today),
            )
        });
        ViewState::new(settings.view_mode, start, end)
    }

    fn replace_dataset(&mut self, dataset: Dataset, path: Option<PathBuf>) {
        self.engine.cancel_all();
        self.view = Self::view_for(&dataset, &self.settings);
        self.dataset = dataset;
        self.dataset_path = path;
        self.selected_task = None;
        self.scroll = ChartScroll::default();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view.switch_view_mode(mode);
        self.remember_view_mode();
    }

    fn remember_view_mode(&mut self) {
        if self.settings.view_mode != self.view.view_mode {
            self.settings.view_mode = self.view.view_mode;
            self.settings.save();
            self.status_message = format!("{} view", self.view.view_mode);
        }
    }

    pub fn open_dataset(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline dataset", &["json"])
            .pick_file()
        else {
            return;
        };
        match io::load_dataset(&path) {
            Ok(dataset) => {
                self.status_message = format!("Opened '{}'", dataset.name);
                self.replace_dataset(dataset, Some(path));
            }
            Err(e) => {
                tracing::warn!("{e}");
                self.status_message = format!("Error loading: {e}");
            }
        }
    }

    pub fn load_sample(&mut self) {
        self.replace_dataset(Dataset::sample(chrono::Local::now().date_naive()), None);
        self.status_message = "Sample dataset loaded".to_string();
    }

    pub fn open_settings_folder(&mut self) {
        let Some(dir) = Settings::config_dir() else {
            self.status_message = "No settings folder on this system".to_string();
            return;
        };
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|()| open::that(&dir)) {
            tracing::warn!(path = %dir.display(), "could not open settings folder: {e}");
            self.status_message = format!("Could not open {}: {e}", dir.display());
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let source = self
                            .dataset_path
                            .as_ref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "sample".to_string());
                        ui.label(
                            egui::RichText::new(format!(
                                "{} tasks · {} rows · {}",
                                self.dataset.tasks.len(),
                                self.dataset.rows.len(),
                                source
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });
    }

    fn show_about_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("About")
            .open(&mut self.show_about)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Gantt Timeline");
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.add_space(4.0);
                ui.label("Drag a bar to move it, drag its edges to resize it.");
                ui.label("Ctrl+Scroll switches between day, week and month.");
            });
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        self.show_status_bar(ctx);

        let mut sidebar_action = SidebarAction::None;
        if let Some(task) = self.selected_task.and_then(|id| self.dataset.task(id)) {
            egui::SidePanel::right("task_sidebar")
                .default_width(280.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        sidebar_action = ui::task_sidebar::show_task_sidebar(task, &self.dataset, ui);
                    });
                });
        }
        match sidebar_action {
            SidebarAction::None => {}
            SidebarAction::Select(id) => self.selected_task = Some(id),
            SidebarAction::Commit(patch) => {
                if let Some(id) = self.selected_task {
                    if self.dataset.apply_update(id, &patch) {
                        tracing::info!(task = ?id, ?patch, "task edited");
                        self.status_message = "Task updated".to_string();
                    }
                }
            }
        }

        egui::SidePanel::left("row_panel")
            .exact_width(ui::theme::LEFT_PANEL_WIDTH)
            .resizable(false)
            .frame(egui::Frame::default().fill(ui::theme::BG_PANEL))
            .show(ctx, |ui| {
                ui::row_panel::show_row_panel(ui, &self.dataset, self.selected_task, &mut self.scroll.vertical);
            });

        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_CANVAS)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let interaction = ui::timeline_chart::show_timeline_chart(
                ui,
                &mut self.dataset,
                &mut self.view,
                &mut self.engine,
                &mut self.scroll,
                &mut self.selected_task,
            );
            if let Some(id) = interaction.drag_finished {
                if let Some(task) = self.dataset.task(id) {
                    self.status_message = format!(
                        "Updated '{}' ({} → {})",
                        task.title,
                        ui::format::format_standard_date(task.start),
                        ui::format::format_standard_date(task.end)
                    );
                }
            } else if interaction.changed {
                self.status_message = "Dragging…".to_string();
            }
        });
        self.remember_view_mode();

        if self.show_about {
            self.show_about_window(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_RANGE_PADDING_DAYS;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn empty_dataset_with_huge_padding_stays_bounded() {
        let settings = Settings {
            range_padding_days: 1_000_000_000,
            ..Default::default()
        };
        let view = TimelineApp::view_around(&Dataset::new("empty"), &settings, today());
        assert_eq!(view.total_days(), (2 * MAX_RANGE_PADDING_DAYS) as f64);
    }

    #[test]
    fn empty_dataset_gets_a_window_around_today() {
        let settings = Settings {
            range_padding_days: 0,
            ..Default::default()
        };
        let view = TimelineApp::view_around(&Dataset::new("empty"), &settings, today());
        assert_eq!(view.start.date(), NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        assert_eq!(view.end.date(), NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
    }

    #[test]
    fn sample_view_is_padded_around_its_tasks() {
        let settings = Settings::default();
        let view = TimelineApp::view_around(&Dataset::sample(today()), &settings, today());
        assert_eq!(view.view_mode, settings.view_mode);
        assert_eq!(view.start.date(), today() - TimeDelta::days(5 + 7));
        assert_eq!(view.end.date(), today() + TimeDelta::days(32 + 7));
    }
}
