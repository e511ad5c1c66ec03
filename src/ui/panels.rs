use eframe::egui::{self, Color32, RichText, Ui};

use crate::controls::{self, ControlEvent};
use crate::dashboard::ExportResult;
use crate::data::export::EXPORT_FILENAME;
use crate::data::filter::{all_species, SpeciesSelection};
use crate::data::model::{Attribute, Species};
use crate::state::AppState;

const DATASET_URL: &str = "https://allisonhorst.github.io/palmerpenguins/";
const REPOSITORY_URL: &str = "https://github.com/Kiruthikaa2512/cintel-02-data";

// ---------------------------------------------------------------------------
// Left side panel – control widgets
// ---------------------------------------------------------------------------

/// Render the sidebar controls. Each change is applied to the dashboard
/// before the next widget is drawn.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sidebar");
    ui.separator();

    // ---- Attribute selector ----
    ui.strong("Select Attribute");
    let current = state.dashboard.selected_attribute();
    egui::ComboBox::from_id_salt(controls::SELECTED_ATTRIBUTE)
        .selected_text(current.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for attr in Attribute::ALL {
                if ui
                    .selectable_label(current.as_str() == attr.column(), attr.column())
                    .clicked()
                {
                    state.apply(ControlEvent::SelectAttribute(attr.column().to_string()));
                }
            }
        });
    ui.add_space(8.0);

    // ---- Numeric bin entry ----
    ui.strong("Number of Histogram Bins");
    let (min, max) = (
        *controls::NUMERIC_BINS_RANGE.start(),
        *controls::NUMERIC_BINS_RANGE.end(),
    );
    let response = ui.add(
        egui::DragValue::new(&mut state.numeric_bins_entry)
            .range(i64::from(min)..=i64::from(max))
            .speed(0.2),
    );
    if response.changed() {
        state.apply(ControlEvent::SetNumericBins(state.numeric_bins_entry));
    }
    ui.label("This controls how many bins the histogram will display.");
    ui.add_space(8.0);

    // ---- Slider ----
    ui.strong("Number of Binned Histogram Bins");
    let mut slider_bins = state.dashboard.slider_bins();
    if ui
        .add(egui::Slider::new(&mut slider_bins, controls::SLIDER_BINS_RANGE))
        .changed()
    {
        state.apply(ControlEvent::SetSliderBins(i64::from(slider_bins)));
    }
    ui.add_space(8.0);

    // ---- Species filter ----
    let selected = state.dashboard.selected_species();
    ui.strong(format!(
        "Filter by Species  ({}/{})",
        selected.len(),
        Species::ALL.len()
    ));
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for species in Species::ALL {
            let mut checked = selected.contains(&species);
            let text = RichText::new(species.as_str()).color(state.colors.color_for(species));
            if ui.checkbox(&mut checked, text).changed() {
                state.apply(ControlEvent::ToggleSpecies(species));
            }
        }
    });
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.apply(ControlEvent::SetSpecies(all_species()));
        }
        if ui.small_button("None").clicked() {
            state.apply(ControlEvent::SetSpecies(SpeciesSelection::new()));
        }
    });

    ui.separator();
    ui.hyperlink_to("GitHub", REPOSITORY_URL);
    ui.hyperlink_to("Palmer penguins dataset", DATASET_URL);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar. Drawn after the sidebar so the counts
/// include this frame's control changes.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Download filtered data…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(state.summary());
        ui.weak(format!("from {}", state.source));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Saved") {
                Color32::GREEN
            } else {
                Color32::RED
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Instructions + download button (top of the central panel)
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui, state: &mut AppState, download: &ExportResult) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("Instructions:").strong());
        ui.label("Use dropdowns to explore the data visually.");
    });
    match download {
        Ok(export) => {
            let label = format!("Download Filtered Data ({} rows)", export.rows);
            if ui.button(label).clicked() {
                save_file_dialog(state);
            }
        }
        Err(e) => {
            ui.add_enabled(false, egui::Button::new("Download Filtered Data"))
                .on_disabled_hover_text(e.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open penguins table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_dataset(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(EXPORT_FILENAME)
        .add_filter("CSV", &["csv"]);
    if let Some(dir) = &state.export_dir {
        dialog = dialog.set_directory(dir);
    }

    if let Some(path) = dialog.save_file() {
        state.save_download(&path);
    }
}
