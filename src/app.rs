use eframe::egui::{self, Color32, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
const BINNED_HISTOGRAM_COLOR: Color32 = Color32::from_rgb(76, 114, 176);

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinExplorerApp {
    pub state: AppState,
}

impl PenguinExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PenguinExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

impl PenguinExplorerApp {
    /// Lay out one frame.
    pub fn show(&mut self, ctx: &egui::Context) {
        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Top panel: menu bar, after the controls so counts are current ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // Control changes above invalidated parts of the graph; bring the
        // sinks up to date before drawing them.
        let ran = self.state.dashboard.flush();
        if !ran.is_empty() {
            log::trace!("frame recomputed {ran:?}");
        }
        let artifacts = self.state.dashboard.artifacts();

        // ---- Central panel: tables and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::header(ui, &mut self.state, &artifacts.download_data);
            ui.separator();

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.columns(2, |cols| {
                        table::data_table(&mut cols[0], &artifacts.data_table);
                        table::data_grid(&mut cols[1], &artifacts.data_grid);
                    });
                    ui.add_space(12.0);

                    ui.columns(2, |cols| {
                        plot::histogram(
                            &mut cols[0],
                            "numeric_histogram",
                            &artifacts.numeric_histogram,
                            HISTOGRAM_COLOR,
                        );
                        plot::histogram(
                            &mut cols[1],
                            "slider_histogram",
                            &artifacts.slider_histogram,
                            BINNED_HISTOGRAM_COLOR,
                        );
                    });
                    ui.add_space(12.0);

                    ui.group(|ui: &mut Ui| {
                        ui.strong("Scatterplot: Species");
                        plot::scatterplot(ui, &artifacts.scatterplot, &self.state.colors);
                    });
                });
        });
    }
}
