//! WebM to MP3 Converter
//!
//! Main entry point for the application.

use webm2mp3::ConverterApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Starting WebM to MP3 Converter v{}", env!("CARGO_PKG_VERSION"));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 600.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("WebM to MP3 Converter"),
        ..Default::default()
    };

    eframe::run_native(
        "WebM to MP3 Converter",
        native_options,
        Box::new(|cc| Box::new(ConverterApp::new(cc))),
    )
}
