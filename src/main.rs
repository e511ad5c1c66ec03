use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use eframe::egui;

use penguin_explorer::app::PenguinExplorerApp;
use penguin_explorer::data::loader;
use penguin_explorer::data::model::PenguinDataset;
use penguin_explorer::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "penguin-explorer", version, about = "Explore the Palmer penguins table")]
struct Args {
    /// Dataset file (.csv, .json, .parquet), e.g. the Palmer penguins CSV.
    /// Defaults to the bundled synthetic sample.
    #[arg(long, env = "PENGUIN_DATA")]
    data: Option<PathBuf>,

    /// Directory the download dialog starts in.
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

/// Load `--data` if given, falling back to the bundled sample on failure.
/// Returns the dataset and a label naming its source.
fn startup_dataset(args: &Args) -> Result<(PenguinDataset, String)> {
    if let Some(path) = &args.data {
        match loader::load_file(path) {
            Ok(dataset) => return Ok((dataset, path.display().to_string())),
            Err(e) => log::error!("Failed to load {}: {e:#}; using bundled data", path.display()),
        }
    }
    log::warn!("Using the bundled synthetic sample table");
    Ok((loader::bundled()?, loader::BUNDLED_SOURCE.to_string()))
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let (dataset, source) = match startup_dataset(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("{e:#}");
            std::process::exit(1);
        }
    };
    log::info!(
        "Loaded {} penguins with columns {:?}",
        dataset.len(),
        dataset.column_names
    );
    let state = AppState::new(dataset, source, args.export_dir);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Penguin Explorer – Dashboard by Kiruthikaa",
        options,
        Box::new(|_cc| Ok(Box::new(PenguinExplorerApp::new(state)))),
    )
}
