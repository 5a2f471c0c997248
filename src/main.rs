mod app;
mod state;
mod ui;

use std::path::PathBuf;

use app::TradeAtlasApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional route file to open instead of the built-in sample.
    let initial: Option<PathBuf> = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Global Trade Routes & Tariff Impact",
        options,
        Box::new(move |_cc| Ok(Box::new(TradeAtlasApp::new(initial.as_deref())))),
    )
}
