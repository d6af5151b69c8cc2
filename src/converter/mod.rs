//! WebM to MP3 Converter Module
//!
//! Converts a directory of WebM files to MP3 using FFmpeg, five at a time.

pub mod batch;
pub mod ffmpeg;
pub mod formats;
pub mod job;
pub mod presenter;
pub mod progress;
pub mod runner;
pub mod scan;
mod window;

pub use batch::{run_batches, RunSummary, WorkerEvent, BATCH_SIZE, WORKER_POOL_SIZE};
pub use ffmpeg::{FFmpegError, FFmpegWrapper, Transcoder};
pub use job::{ConversionJob, JobResult, JobStatus};
pub use presenter::{Notice, Presenter, UiState};
pub use progress::ProgressTracker;
pub use runner::ConversionRunner;
pub use scan::{scan_directory, ScanError};
pub use window::ConverterWindow;
