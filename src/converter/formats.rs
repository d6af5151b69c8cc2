//! Input/output formats and the fixed audio encoding parameters.

use std::path::{Path, PathBuf};

/// Extension of files picked up from the input directory.
pub const INPUT_EXTENSION: &str = "webm";

/// Extension given to converted files.
pub const OUTPUT_EXTENSION: &str = "mp3";

/// Audio encoding parameters passed to FFmpeg for every job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSettings {
    /// Bitrate argument for `-ab`
    pub bitrate: &'static str,
    /// Sample rate in Hz for `-ar`
    pub sample_rate: u32,
}

/// 320 kbit/s at 44.1 kHz. Not user configurable.
pub const MP3_AUDIO: AudioSettings = AudioSettings {
    bitrate: "320k",
    sample_rate: 44_100,
};

/// Check whether a file name is eligible for conversion.
///
/// Matching is an exact, case-sensitive `.webm` suffix.
pub fn is_eligible_name(name: &str) -> bool {
    name.strip_suffix(INPUT_EXTENSION)
        .map(|rest| rest.ends_with('.'))
        .unwrap_or(false)
}

/// Build the destination path for a source file inside `output_dir`.
///
/// `clip.webm` becomes `<output_dir>/clip.mp3`.
pub fn output_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());

    let stem = name
        .strip_suffix(INPUT_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(&name);

    output_dir.join(format!("{}.{}", stem, OUTPUT_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligible_names() {
        assert!(is_eligible_name("talk.webm"));
        assert!(is_eligible_name("a.b.webm"));
        assert!(!is_eligible_name("talk.WEBM"));
        assert!(!is_eligible_name("talk.webm.part"));
        assert!(!is_eligible_name("webm"));
        assert!(!is_eligible_name("notes.txt"));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path_for(Path::new("/videos/my clip.webm"), Path::new("/music")),
            PathBuf::from("/music/my clip.mp3")
        );

        // Only the trailing extension is replaced
        assert_eq!(
            output_path_for(Path::new("/in/webm.webm"), Path::new("/out")),
            PathBuf::from("/out/webm.mp3")
        );
    }

    #[test]
    fn test_mp3_audio_settings() {
        assert_eq!(MP3_AUDIO.bitrate, "320k");
        assert_eq!(MP3_AUDIO.sample_rate, 44100);
    }
}
