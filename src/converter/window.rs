//! Converter window UI.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use egui::{Color32, RichText, Vec2};

use super::ffmpeg::{FFmpegWrapper, Transcoder};
use super::presenter::{Notice, Presenter, UiState};
use crate::settings::Settings;

/// Main converter panel.
pub struct ConverterWindow {
    presenter: Presenter,
    settings: Settings,
    settings_path: Option<PathBuf>,
    /// FFmpeg status message
    ffmpeg_status: Option<String>,
}

impl ConverterWindow {
    /// Create the window, locating FFmpeg and restoring the last directories.
    pub fn new(settings: Settings, settings_path: Option<PathBuf>) -> Self {
        let (ffmpeg, error) = FFmpegWrapper::locate(settings.ffmpeg_path.as_deref());
        let ffmpeg_status = error.map(|e| e.to_string());

        let mut window = Self::with_transcoder(Arc::new(ffmpeg), settings, settings_path);
        window.ffmpeg_status = ffmpeg_status;
        window
    }

    /// Create the window around any transcoder.
    pub fn with_transcoder(
        transcoder: Arc<dyn Transcoder>,
        settings: Settings,
        settings_path: Option<PathBuf>,
    ) -> Self {
        let mut presenter = Presenter::new(transcoder);

        if let Some(input) = settings.last_input_dir.as_ref().filter(|p| p.is_dir()) {
            presenter.choose_input_dir(input.clone());
        }
        // An output equal to the input is the default, not a choice
        let output = settings
            .last_output_dir
            .clone()
            .filter(|p| p.is_dir() && Some(p) != settings.last_input_dir.as_ref());
        presenter.choose_output_dir(output);

        Self {
            presenter,
            settings,
            settings_path,
            ffmpeg_status: None,
        }
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    /// Show the converter.
    pub fn show(&mut self, ctx: &egui::Context) {
        self.presenter.poll();

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_contents(ui);
        });

        self.show_next_notice();

        // Keep draining results while converting
        if self.presenter.state() == UiState::Converting {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    /// Show window contents.
    fn show_contents(&mut self, ui: &mut egui::Ui) {
        // FFmpeg warning
        if let Some(ref error) = self.ffmpeg_status {
            ui.horizontal(|ui| {
                ui.label(RichText::new("⚠").color(Color32::YELLOW));
                ui.label(RichText::new(error).color(Color32::YELLOW).small());
            });
            ui.separator();
        }

        self.show_directories(ui);
        ui.separator();

        self.show_progress(ui);
        ui.separator();

        self.show_lists(ui);
        ui.separator();

        self.show_controls(ui);
    }

    /// Directory pickers with the selected paths.
    fn show_directories(&mut self, ui: &mut egui::Ui) {
        let editable = self.presenter.state() != UiState::Converting;

        egui::Grid::new("directories")
            .num_columns(3)
            .spacing([12.0, 10.0])
            .show(ui, |ui| {
                ui.label("Select WebM Directory");
                ui.add_enabled_ui(editable, |ui| {
                    if ui.button("📁 Browse").clicked() {
                        self.pick_input_dir();
                    }
                });
                ui.label(path_label(self.presenter.input_dir()));
                ui.end_row();

                ui.label("Select MP3 Directory");
                ui.add_enabled_ui(editable, |ui| {
                    if ui.button("📁 Browse").clicked() {
                        self.pick_output_dir();
                    }
                });
                ui.label(path_label(self.presenter.output_dir()));
                ui.end_row();
            });
    }

    /// Counts, progress bar and percentage.
    fn show_progress(&mut self, ui: &mut egui::Ui) {
        ui.label(self.presenter.counts_label());

        ui.horizontal(|ui| {
            let fraction = self.presenter.progress().percent() / 100.0;
            let bar = egui::ProgressBar::new(fraction)
                .animate(self.presenter.state() == UiState::Converting);
            ui.add_sized(Vec2::new(ui.available_width() - 60.0, 20.0), bar);
            ui.label(RichText::new(self.presenter.percent_label()).size(14.0));
        });
    }

    /// Active, completed and failed conversions.
    fn show_lists(&mut self, ui: &mut egui::Ui) {
        let height = (ui.available_height() - 60.0).max(100.0);

        ui.columns(3, |columns| {
            file_list(&mut columns[0], "Active Conversions", self.presenter.active(), height);
            file_list(
                &mut columns[1],
                "Completed Conversions",
                self.presenter.completed(),
                height,
            );

            let failed: Vec<String> = self
                .presenter
                .failed()
                .iter()
                .map(|r| r.display_name.clone())
                .collect();
            file_list(&mut columns[2], "Failed Conversions", &failed, height);
        });
    }

    /// Convert button.
    fn show_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_enabled_ui(self.presenter.can_convert(), |ui| {
                if ui.button("▶ Convert").clicked() {
                    self.start_conversion();
                }
            });

            if self.presenter.state() == UiState::Converting {
                ui.spinner();
                ui.label(RichText::new("Converting...").color(Color32::LIGHT_BLUE));
            }
        });
    }

    fn start_conversion(&mut self) {
        self.settings.last_input_dir = self.presenter.input_dir().map(Path::to_path_buf);
        self.settings.last_output_dir = self.presenter.explicit_output_dir().map(Path::to_path_buf);
        if let Some(path) = &self.settings_path {
            if let Err(e) = self.settings.save(path) {
                log::warn!("Failed to save settings: {}", e);
            }
        }

        self.presenter.start_conversion();
    }

    /// Show one pending notice as a native modal dialog.
    fn show_next_notice(&mut self) {
        let Some(notice) = self.presenter.pop_notice() else {
            return;
        };

        let level = match notice {
            Notice::ScanFailed(_) | Notice::ConversionError { .. } | Notice::RunAborted(_) => {
                rfd::MessageLevel::Error
            }
            Notice::NoFiles | Notice::Complete { .. } => rfd::MessageLevel::Info,
        };

        let message = notice.message();
        let _ = rfd::MessageDialog::new()
            .set_level(level)
            .set_title(notice.title())
            .set_description(&message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    /// Open folder dialog for the WebM directory.
    fn pick_input_dir(&mut self) {
        let mut dialog = rfd::FileDialog::new();
        if let Some(dir) = self.presenter.input_dir() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_folder() {
            self.presenter.choose_input_dir(path);
        }
    }

    /// Open folder dialog for the MP3 directory.
    fn pick_output_dir(&mut self) {
        let mut dialog = rfd::FileDialog::new();
        if let Some(dir) = self.presenter.output_dir() {
            dialog = dialog.set_directory(dir);
        }
        self.presenter.choose_output_dir(dialog.pick_folder());
    }
}

fn path_label(path: Option<&Path>) -> RichText {
    match path {
        Some(p) => {
            let path_str = p.display().to_string();
            let count = path_str.chars().count();
            let truncated = if count > 60 {
                let tail: String = path_str.chars().skip(count - 57).collect();
                format!("...{}", tail)
            } else {
                path_str
            };
            RichText::new(truncated).monospace().small()
        }
        None => RichText::new("Not selected").italics().color(Color32::GRAY),
    }
}

fn file_list(ui: &mut egui::Ui, title: &str, names: &[String], height: f32) {
    ui.label(RichText::new(title).strong());
    egui::ScrollArea::vertical()
        .id_source(title)
        .max_height(height)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if names.is_empty() {
                ui.label(RichText::new("—").color(Color32::GRAY));
            }
            for name in names {
                ui.label(name);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::batch::tests::FakeTranscoder;

    #[test]
    fn test_restores_last_directories() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("a.webm"), b"").unwrap();

        let settings = Settings {
            last_input_dir: Some(input.path().to_path_buf()),
            last_output_dir: Some(output.path().to_path_buf()),
            ffmpeg_path: None,
        };
        let window =
            ConverterWindow::with_transcoder(Arc::new(FakeTranscoder::default()), settings, None);

        assert_eq!(window.presenter().state(), UiState::Ready);
        assert_eq!(window.presenter().output_dir(), Some(output.path()));
        assert_eq!(window.presenter().progress().total(), 1);
    }

    #[test]
    fn test_restored_default_output_follows_new_input() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        // What a run with no MP3 directory chosen used to save
        let settings = Settings {
            last_input_dir: Some(first.path().to_path_buf()),
            last_output_dir: Some(first.path().to_path_buf()),
            ffmpeg_path: None,
        };
        let mut window =
            ConverterWindow::with_transcoder(Arc::new(FakeTranscoder::default()), settings, None);
        assert_eq!(window.presenter().explicit_output_dir(), None);

        window.presenter.choose_input_dir(second.path().to_path_buf());
        assert_eq!(window.presenter().output_dir(), Some(second.path()));
    }

    #[test]
    fn test_only_chosen_output_is_saved() {
        let input = tempfile::tempdir().unwrap();
        let config = tempfile::tempdir().unwrap();
        let settings_path = config.path().join("settings.json");

        let mut window = ConverterWindow::with_transcoder(
            Arc::new(FakeTranscoder::default()),
            Settings::default(),
            Some(settings_path.clone()),
        );
        window.presenter.choose_input_dir(input.path().to_path_buf());
        window.start_conversion();

        let saved = Settings::load(&settings_path).unwrap();
        assert_eq!(saved.last_input_dir, Some(input.path().to_path_buf()));
        assert_eq!(saved.last_output_dir, None);
    }

    #[test]
    fn test_stale_directories_are_ignored() {
        let settings = Settings {
            last_input_dir: Some(PathBuf::from("/no/such/webm/dir")),
            ..Default::default()
        };
        let window =
            ConverterWindow::with_transcoder(Arc::new(FakeTranscoder::default()), settings, None);

        assert_eq!(window.presenter().state(), UiState::Idle);
    }
}
