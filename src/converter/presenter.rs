//! Converter state machine, kept apart from rendering.
//!
//! All session state lives here and is only touched on the UI thread.
//! Background work reports back through [`WorkerEvent`]s drained by
//! [`Presenter::poll`].

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::batch::WorkerEvent;
use super::ffmpeg::Transcoder;
use super::job::{ConversionJob, JobResult, JobStatus};
use super::progress::ProgressTracker;
use super::runner::ConversionRunner;
use super::scan::scan_directory;

/// Where the converter is in its workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    /// No input directory chosen
    Idle,
    /// Input chosen, convert enabled
    Ready,
    /// Run in progress
    Converting,
}

/// Message to show the user in a modal dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoFiles,
    ScanFailed(String),
    ConversionError { file: String, error: String },
    RunAborted(String),
    Complete { converted: usize, failed: usize },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::NoFiles => "No Files",
            Notice::ScanFailed(_) => "Directory Error",
            Notice::ConversionError { .. } | Notice::RunAborted(_) => "Conversion Error",
            Notice::Complete { .. } => "Conversion Complete",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::NoFiles => "No WebM files found in the selected directory.".to_string(),
            Notice::ScanFailed(error) | Notice::RunAborted(error) => error.clone(),
            Notice::ConversionError { file, error } => {
                format!("Error converting {}: {}", file, error)
            }
            Notice::Complete { failed: 0, .. } => "All files have been processed!".to_string(),
            Notice::Complete { converted, failed } => format!(
                "All files have been processed. {} converted, {} failed.",
                converted, failed
            ),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::ScanFailed(_) | Notice::ConversionError { .. } | Notice::RunAborted(_)
        )
    }
}

/// Owner of the directory selection, counters and display lists.
pub struct Presenter {
    transcoder: Arc<dyn Transcoder>,
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    progress: ProgressTracker,
    active: Vec<String>,
    completed: Vec<String>,
    failed: Vec<JobResult>,
    notices: VecDeque<Notice>,
    runner: Option<ConversionRunner>,
}

impl Presenter {
    pub fn new(transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            transcoder,
            input_dir: None,
            output_dir: None,
            progress: ProgressTracker::default(),
            active: Vec::new(),
            completed: Vec::new(),
            failed: Vec::new(),
            notices: VecDeque::new(),
            runner: None,
        }
    }

    pub fn state(&self) -> UiState {
        if self.runner.is_some() {
            UiState::Converting
        } else if self.input_dir.is_some() {
            UiState::Ready
        } else {
            UiState::Idle
        }
    }

    pub fn can_convert(&self) -> bool {
        self.state() == UiState::Ready
    }

    /// Set the input directory and recount its WebM files.
    pub fn choose_input_dir(&mut self, dir: PathBuf) {
        if self.state() == UiState::Converting {
            log::warn!("Ignoring input directory change during conversion");
            return;
        }

        let total = match scan_directory(&dir) {
            Ok(files) => files.len(),
            Err(e) => {
                log::error!("{}", e);
                self.notices.push_back(Notice::ScanFailed(e.to_string()));
                0
            }
        };

        log::info!("Input directory {:?} ({} WebM files)", dir, total);
        self.input_dir = Some(dir);
        self.progress = ProgressTracker::new(total);
    }

    /// Set the output directory. `None` (picker cancelled) clears it, so
    /// the output follows whatever input directory is current.
    pub fn choose_output_dir(&mut self, dir: Option<PathBuf>) {
        if self.state() == UiState::Converting {
            log::warn!("Ignoring output directory change during conversion");
            return;
        }
        self.output_dir = dir;
    }

    pub fn input_dir(&self) -> Option<&Path> {
        self.input_dir.as_deref()
    }

    /// Output directory the user picked, if any.
    pub fn explicit_output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Output directory in effect, falling back to the input directory.
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref().or(self.input_dir.as_deref())
    }

    /// Scan the input directory and start the background run.
    pub fn start_conversion(&mut self) {
        if !self.can_convert() {
            return;
        }
        let (Some(input), Some(output)) = (self.input_dir.clone(), self.output_dir().map(Path::to_path_buf))
        else {
            return;
        };

        self.active.clear();
        self.completed.clear();
        self.failed.clear();

        let files = match scan_directory(&input) {
            Ok(files) => files,
            Err(e) => {
                log::error!("{}", e);
                self.notices.push_back(Notice::ScanFailed(e.to_string()));
                return;
            }
        };

        self.progress = ProgressTracker::new(files.len());
        if files.is_empty() {
            log::info!("No WebM files in {:?}", input);
            self.notices.push_back(Notice::NoFiles);
            return;
        }

        let jobs: Vec<ConversionJob> = files
            .into_iter()
            .map(|source| ConversionJob::new(source, &output))
            .collect();

        self.runner = Some(ConversionRunner::start(jobs, Arc::clone(&self.transcoder)));
    }

    /// Drain pending worker events into the session state.
    pub fn poll(&mut self) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };

        for event in runner.poll_events() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::BatchStarted { names, .. } => {
                self.active = names;
            }
            WorkerEvent::JobFinished { result, active } => {
                self.progress.record();
                match &result.status {
                    JobStatus::Succeeded => {
                        self.active = active;
                        self.completed.push(result.display_name.clone());
                    }
                    JobStatus::Failed { error } => {
                        self.active.clear();
                        self.notices.push_back(Notice::ConversionError {
                            file: result.display_name.clone(),
                            error: error.clone(),
                        });
                        self.failed.push(result);
                    }
                }
            }
            WorkerEvent::RunFinished => {
                self.active.clear();
                if let Some(runner) = self.runner.take() {
                    runner.wait();
                }
                if !self.progress.is_complete() {
                    log::warn!(
                        "Run finished at {}/{} files",
                        self.progress.completed(),
                        self.progress.total()
                    );
                }
                self.notices.push_back(Notice::Complete {
                    converted: self.completed.len(),
                    failed: self.failed.len(),
                });
            }
            WorkerEvent::RunAborted { error } => {
                self.active.clear();
                self.runner = None;
                self.notices.push_back(Notice::RunAborted(error));
            }
        }
    }

    /// Next dialog to show, if any.
    pub fn pop_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    /// "Total Files: N, Remaining: M"
    pub fn counts_label(&self) -> String {
        format!(
            "Total Files: {}, Remaining: {}",
            self.progress.total(),
            self.progress.remaining()
        )
    }

    pub fn percent_label(&self) -> String {
        format!("{}%", self.progress.percent() as u32)
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    pub fn failed(&self) -> &[JobResult] {
        &self.failed
    }
}
