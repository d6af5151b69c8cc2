//! Conversion job and result definitions.

use std::path::PathBuf;

use super::formats::output_path_for;

/// A single WebM file to be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Input file path
    pub source: PathBuf,
    /// Output file path
    pub destination: PathBuf,
    /// Name shown in the active/completed lists
    pub display_name: String,
}

impl ConversionJob {
    /// Create a job converting `source` into the output directory.
    pub fn new(source: PathBuf, output_dir: &std::path::Path) -> Self {
        let destination = output_path_for(&source, output_dir);
        let display_name = source
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            source,
            destination,
            display_name,
        }
    }
}

/// Outcome of a conversion job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// FFmpeg exited successfully
    Succeeded,
    /// Spawning, running or the worker itself failed
    Failed { error: String },
}

/// Result reported once per job by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub display_name: String,
    pub status: JobStatus,
}

impl JobResult {
    pub fn succeeded(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            status: JobStatus::Succeeded,
        }
    }

    pub fn failed(display_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            status: JobStatus::Failed {
                error: error.into(),
            },
        }
    }

    /// Check if the job succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self.status, JobStatus::Succeeded)
    }

    /// Error message for failed jobs.
    pub fn error_detail(&self) -> Option<&str> {
        match &self.status {
            JobStatus::Succeeded => None,
            JobStatus::Failed { error } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_job_paths() {
        let job = ConversionJob::new(PathBuf::from("/in/song.webm"), Path::new("/out"));
        assert_eq!(job.destination, PathBuf::from("/out/song.mp3"));
        assert_eq!(job.display_name, "song.webm");
    }

    #[test]
    fn test_result_accessors() {
        let ok = JobResult::succeeded("a.webm");
        assert!(ok.is_success());
        assert_eq!(ok.error_detail(), None);

        let failed = JobResult::failed("b.webm", "exit code 1");
        assert!(!failed.is_success());
        assert_eq!(failed.error_detail(), Some("exit code 1"));
    }
}
