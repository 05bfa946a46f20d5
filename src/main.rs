mod app;
mod color;
mod config;
mod data;
mod error;
mod format;
mod state;
mod ui;

use app::CarbonDashApp;
use config::DashConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match std::env::current_dir() {
        Ok(dir) => DashConfig::discover(&dir),
        Err(e) => {
            log::warn!("Cannot read working directory, using default settings: {e}");
            DashConfig::default()
        }
    };

    let mut state = AppState::new(config);
    if let Some(path) = state.config.dataset_path.clone() {
        if path.exists() {
            state.load_path(&path);
        } else {
            log::info!("{} not found; waiting for File → Open", path.display());
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        app::TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(CarbonDashApp::new(state)))),
    )
}
