//! Application preferences
//!
//! Remembers the last used directories and an optional FFmpeg override,
//! stored as JSON under the platform config directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persistent converter preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last chosen WebM directory
    pub last_input_dir: Option<PathBuf>,
    /// Last chosen MP3 directory
    pub last_output_dir: Option<PathBuf>,
    /// Explicit FFmpeg executable, bypassing discovery
    pub ffmpeg_path: Option<PathBuf>,
}

impl Settings {
    /// Default settings file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("webm2mp3");
            p.push("settings.json");
            p
        })
    }

    /// Save to a file, creating parent directories
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Load from a file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Load from `path`, falling back to defaults when missing or unreadable
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Ignoring settings file {:?}: {}", path, e);
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            last_input_dir: Some(PathBuf::from("/videos")),
            last_output_dir: None,
            ffmpeg_path: Some(PathBuf::from("/opt/ffmpeg")),
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"last_input_dir": "/a"}"#).unwrap();
        assert_eq!(settings.last_input_dir, Some(PathBuf::from("/a")));
        assert_eq!(settings.ffmpeg_path, None);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(Settings::load_or_default(Some(&path)), Settings::default());
        assert_eq!(Settings::load_or_default(None), Settings::default());
    }
}
