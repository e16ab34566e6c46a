mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::MacroMapApp;
use config::AppConfig;
use data::cache::{DatasetCache, FileSource};
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::resolve();
    log::info!("Data source: {}", config.data_path.display());

    // First access to the cache happens here, before the window opens.
    let cache = DatasetCache::new(FileSource::new(config.data_path));
    let state = AppState::new(cache, config.country_groups);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Macro Map – Economic Models",
        options,
        Box::new(|_cc| Ok(Box::new(MacroMapApp::new(state)))),
    )
}
