use std::path::PathBuf;

use eframe::egui;
use rusty_trials::app::TrialsApp;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional folder to open at startup.
    let folder = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Trials – Bootstrap CI Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(TrialsApp::with_folder(folder.as_deref())))),
    )
}
