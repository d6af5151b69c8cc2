//! Main application state
//!
//! Wraps the converter window in an eframe application.

use crate::converter::ConverterWindow;
use crate::settings::Settings;
use eframe::egui;

/// Main application state
pub struct ConverterApp {
    pub converter_window: ConverterWindow,
}

impl ConverterApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        log::info!("Initializing WebM to MP3 Converter...");

        let settings_path = Settings::default_path();
        let settings = Settings::load_or_default(settings_path.as_deref());

        Self {
            converter_window: ConverterWindow::new(settings, settings_path),
        }
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.converter_window.show(ctx);
    }
}
