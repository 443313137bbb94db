mod app;
mod config;
mod converter;
mod error;
mod folder_picker;
mod preview;

use app::GifApp;
use config::Settings;

fn main() -> eframe::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        initial_window_size: Some([config::WINDOW_WIDTH, config::WINDOW_HEIGHT].into()),
        min_window_size: Some([300.0, 220.0].into()),
        centered: true,
        ..Default::default()
    };
    eframe::run_native(
        config::WINDOW_TITLE,
        native_options,
        Box::new(|cc| Box::new(GifApp::new(cc, Settings::default()))),
    )
}
