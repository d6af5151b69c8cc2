//! FFmpeg wrapper for audio extraction.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;

use super::formats::{AudioSettings, MP3_AUDIO};
use super::job::ConversionJob;

/// Errors that can occur during FFmpeg operations.
#[derive(Error, Debug)]
pub enum FFmpegError {
    #[error("FFmpeg binary not found. Please install FFmpeg or place it in assets/ffmpeg/")]
    NotFound,
    #[error("Failed to spawn FFmpeg process: {0}")]
    SpawnFailed(#[from] std::io::Error),
    #[error("FFmpeg conversion failed: {0}")]
    ConversionFailed(String),
}

/// Anything able to turn one job into an output file.
///
/// Implementations block the calling thread until the job is done.
pub trait Transcoder: Send + Sync {
    fn transcode(&self, job: &ConversionJob) -> Result<(), FFmpegError>;
}

/// FFmpeg wrapper for spawning conversion processes.
#[derive(Debug, Clone)]
pub struct FFmpegWrapper {
    /// Path (or bare program name) of the FFmpeg binary
    ffmpeg_path: PathBuf,
    audio: AudioSettings,
}

impl FFmpegWrapper {
    /// Create a new FFmpeg wrapper, searching for the binary.
    pub fn new() -> Result<Self, FFmpegError> {
        Ok(Self::with_path(Self::find_ffmpeg()?))
    }

    /// Create a wrapper around a known executable.
    pub fn with_path(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            audio: MP3_AUDIO,
        }
    }

    /// Resolve the executable, preferring an explicit override.
    ///
    /// Falls back to the bare `ffmpeg` program name when nothing is found,
    /// so that a missing binary shows up as a per-job spawn error.
    pub fn locate(override_path: Option<&Path>) -> (Self, Option<FFmpegError>) {
        if let Some(path) = override_path {
            if path.exists() {
                log::info!("Using configured FFmpeg at {:?}", path);
                return (Self::with_path(path), None);
            }
            log::warn!("Configured FFmpeg path {:?} does not exist", path);
        }

        match Self::new() {
            Ok(wrapper) => {
                log::info!("Found FFmpeg at {:?}", wrapper.ffmpeg_path);
                (wrapper, None)
            }
            Err(e) => {
                log::warn!("{}", e);
                (Self::with_path("ffmpeg"), Some(e))
            }
        }
    }

    /// Find FFmpeg binary in various locations.
    fn find_ffmpeg() -> Result<PathBuf, FFmpegError> {
        // 1. Check bundled location
        let bundled_paths = if cfg!(target_os = "macos") {
            vec![
                PathBuf::from("assets/ffmpeg/ffmpeg-macos"),
                PathBuf::from("assets/ffmpeg/ffmpeg"),
            ]
        } else if cfg!(target_os = "windows") {
            vec![
                PathBuf::from("assets/ffmpeg/ffmpeg-windows.exe"),
                PathBuf::from("assets/ffmpeg/ffmpeg.exe"),
            ]
        } else {
            vec![PathBuf::from("assets/ffmpeg/ffmpeg")]
        };

        if let Some(path) = bundled_paths.into_iter().find(|p| p.exists()) {
            return Ok(path);
        }

        // 2. Check system PATH
        if let Ok(path) = which::which("ffmpeg") {
            return Ok(path);
        }

        // 3. Check common install locations
        let common_paths: &[&str] = if cfg!(target_os = "macos") {
            &[
                "/usr/local/bin/ffmpeg",
                "/opt/homebrew/bin/ffmpeg",
                "/opt/local/bin/ffmpeg",
            ]
        } else if cfg!(target_os = "windows") {
            &[
                "C:\\ffmpeg\\bin\\ffmpeg.exe",
                "C:\\Program Files\\ffmpeg\\bin\\ffmpeg.exe",
            ]
        } else {
            &["/usr/bin/ffmpeg", "/usr/local/bin/ffmpeg"]
        };

        common_paths
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
            .ok_or(FFmpegError::NotFound)
    }

    /// Argument list for one job. Passed directly to the process, no shell.
    pub fn build_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-i".into(), input.into()];
        args.extend(
            [
                "-vn", // Drop video
                "-ab",
                self.audio.bitrate,
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push("-ar".into());
        args.push(self.audio.sample_rate.to_string().into());
        args.push("-y".into()); // Overwrite output
        args.push(output.into());
        args
    }

    /// Run FFmpeg for `input` and wait for it to exit.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<(), FFmpegError> {
        log::debug!("ffmpeg {:?} -> {:?}", input, output);

        let result = Command::new(&self.ffmpeg_path)
            .args(self.build_args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(FFmpegError::SpawnFailed)?;

        if result.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr);
            Err(FFmpegError::ConversionFailed(failure_message(
                result.status.code(),
                &stderr,
            )))
        }
    }
}

impl Transcoder for FFmpegWrapper {
    fn transcode(&self, job: &ConversionJob) -> Result<(), FFmpegError> {
        self.convert(&job.source, &job.destination)
    }
}

/// Summarise a failed run: exit code plus the last line FFmpeg printed.
fn failure_message(code: Option<i32>, stderr: &str) -> String {
    let code = match code {
        Some(c) => format!("exit code {}", c),
        None => "terminated by signal".to_string(),
    };

    match stderr.lines().rev().map(str::trim).find(|l| !l.is_empty()) {
        Some(last) => format!("{} ({})", code, last),
        None => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let ffmpeg = FFmpegWrapper::with_path("ffmpeg");
        let args = ffmpeg.build_args(Path::new("/in/a \"b\"; rm.webm"), Path::new("/out/a.mp3"));
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();

        assert_eq!(
            args,
            vec![
                "-i",
                "/in/a \"b\"; rm.webm",
                "-vn",
                "-ab",
                "320k",
                "-ar",
                "44100",
                "-y",
                "/out/a.mp3",
            ]
        );
    }

    #[test]
    fn test_failure_message() {
        assert_eq!(
            failure_message(Some(1), "header\nin.webm: Invalid data found\n\n"),
            "exit code 1 (in.webm: Invalid data found)"
        );
        assert_eq!(failure_message(None, ""), "terminated by signal");
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let ffmpeg = FFmpegWrapper::with_path("/definitely/not/here/ffmpeg");
        let err = ffmpeg
            .convert(Path::new("in.webm"), Path::new("out.mp3"))
            .unwrap_err();
        assert!(matches!(err, FFmpegError::SpawnFailed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure() {
        // `false` ignores its arguments and exits with 1
        let ffmpeg = FFmpegWrapper::with_path("false");
        let err = ffmpeg
            .convert(Path::new("in.webm"), Path::new("out.mp3"))
            .unwrap_err();
        assert!(matches!(err, FFmpegError::ConversionFailed(ref m) if m.starts_with("exit code 1")));
    }
}
