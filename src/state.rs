use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::color::SpeciesColors;
use crate::controls::ControlEvent;
use crate::dashboard::Dashboard;
use crate::data::export::export_to_path;
use crate::data::model::PenguinDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Reactive graph over the loaded dataset.
    pub dashboard: Dashboard,

    /// Where the current dataset came from.
    pub source: String,

    /// Species colours shared by the scatterplot and the filter checkboxes.
    pub colors: SpeciesColors,

    /// Text currently in the numeric bin entry (may hold a rejected value
    /// until the next frame).
    pub numeric_bins_entry: i64,

    /// Directory the download dialog opens in.
    pub export_dir: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(
        dataset: PenguinDataset,
        source: impl Into<String>,
        export_dir: Option<PathBuf>,
    ) -> Self {
        let dashboard = Dashboard::new(Rc::new(dataset));
        Self {
            numeric_bins_entry: i64::from(dashboard.numeric_bins()),
            dashboard,
            source: source.into(),
            colors: SpeciesColors::default(),
            export_dir,
            status_message: None,
        }
    }

    /// Row counts for the top bar.
    pub fn summary(&mut self) -> String {
        let total = self.dashboard.dataset().len();
        let visible = self.dashboard.filtered_data().len();
        format!("{total} penguins loaded, {visible} visible")
    }

    /// Swap in a newly loaded dataset, keeping the control values.
    pub fn set_dataset(&mut self, dataset: PenguinDataset) {
        let defaults = self.dashboard.current_defaults();
        self.dashboard = Dashboard::with_defaults(Rc::new(dataset), defaults);
        self.status_message = None;
    }

    /// Forward a control event; rejected values are reported in the status
    /// line and the control snaps back to the stored value.
    pub fn apply(&mut self, event: ControlEvent) {
        match self.dashboard.apply(event) {
            Ok(_) => self.status_message = None,
            Err(e) => {
                log::warn!("rejected control value: {e}");
                self.status_message = Some(e.to_string());
            }
        }
        self.numeric_bins_entry = i64::from(self.dashboard.numeric_bins());
    }

    /// Load a dataset file, reporting failures in the status line.
    pub fn load_dataset(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} penguins with columns {:?}",
                    dataset.len(),
                    dataset.column_names
                );
                self.set_dataset(dataset);
                self.source = path.display().to_string();
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Write the current filtered view to `path`, unless the download sink
    /// is in a failed state.
    pub fn save_download(&mut self, path: &Path) {
        let result = match &*self.dashboard.download_data() {
            Ok(_) => export_to_path(&self.dashboard.filtered_data(), path),
            Err(e) => Err(anyhow::anyhow!("{e}")),
        };
        match result {
            Ok(rows) => {
                self.status_message = Some(format!("Saved {rows} rows to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to save download: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::export::EXPORT_FILENAME;
    use crate::data::loader;
    use tempfile::TempDir;

    fn state() -> AppState {
        AppState::new(loader::bundled().unwrap(), loader::BUNDLED_SOURCE, None)
    }

    #[test]
    fn rejected_bins_snap_back_and_report() {
        let mut s = state();
        s.numeric_bins_entry = -1;
        s.apply(ControlEvent::SetNumericBins(-1));
        assert_eq!(s.numeric_bins_entry, 20);
        assert!(s.status_message.as_deref().unwrap().contains("numeric_bins"));

        s.apply(ControlEvent::SetNumericBins(30));
        assert_eq!(s.numeric_bins_entry, 30);
        assert!(s.status_message.is_none());
    }

    #[test]
    fn summary_tracks_the_latest_selection() {
        let mut s = state();
        let total = s.dashboard.dataset().len();
        assert_eq!(s.summary(), format!("{total} penguins loaded, {total} visible"));

        s.apply(ControlEvent::SetSpecies(Default::default()));
        assert_eq!(s.summary(), format!("{total} penguins loaded, 0 visible"));
    }

    #[test]
    fn failed_load_keeps_current_dataset() {
        let mut s = state();
        let before = s.dashboard.dataset().len();
        s.load_dataset(Path::new("/definitely/not/here.csv"));
        assert_eq!(s.dashboard.dataset().len(), before);
        assert_eq!(s.source, loader::BUNDLED_SOURCE);
        assert!(s.status_message.as_deref().unwrap().starts_with("Error"));
    }

    #[test]
    fn loaded_file_becomes_the_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gentoo.csv");
        std::fs::write(
            &path,
            "species,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g\n\
             Gentoo,46.1,13.2,211,4500\n",
        )
        .unwrap();

        let mut s = state();
        s.load_dataset(&path);
        assert_eq!(s.dashboard.dataset().len(), 1);
        assert_eq!(s.source, path.display().to_string());
        assert!(s.status_message.is_none());
    }

    #[test]
    fn save_download_writes_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(EXPORT_FILENAME);
        let mut s = state();
        s.dashboard.flush();
        s.save_download(&path);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), s.dashboard.dataset().len() + 1);
    }
}
