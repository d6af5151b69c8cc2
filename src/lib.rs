//! WebM to MP3 Converter Library
//!
//! Batch conversion of a directory of WebM files into MP3 audio by
//! running FFmpeg, with an egui front end.

pub mod app;
pub mod converter;
pub mod settings;

// Re-export commonly used types
pub use app::ConverterApp;
pub use converter::{ConversionJob, ConverterWindow, FFmpegWrapper, JobResult, Presenter, Transcoder};
pub use settings::Settings;
