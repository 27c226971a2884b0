#![warn(clippy::all, rust_2018_idioms)]
// hide console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use canvas_paint::{PaintApp, PaintConfig};

/// Optional JSON config overriding the persisted settings. Created with defaults if missing.
const CONFIG_ENV: &str = "CANVAS_PAINT_CONFIG";

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = std::env::var_os(CONFIG_ENV).map(PaintConfig::load_or_create);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Canvas Paint")
            .with_inner_size([900.0, 720.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Canvas Paint",
        native_options,
        Box::new(|cc| Ok(Box::new(PaintApp::new(cc, config)?))),
    )
}
