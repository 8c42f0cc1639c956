//! Slackr client - a desktop chat client built with egui
//!
//! Architecture:
//! - Main thread: runs the egui UI
//! - Backend thread: runs a Tokio runtime for the REST calls
//! - Communication via crossbeam channels

use eframe::egui;

use slackr_client::app::SlackrApp;
use slackr_client::logging::init_tracing;

fn main() -> eframe::Result<()> {
    init_tracing();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 680.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Slackr",
        options,
        Box::new(|cc| Ok(Box::new(SlackrApp::new(cc)))),
    )
}
