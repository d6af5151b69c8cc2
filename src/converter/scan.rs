//! Input directory enumeration.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::formats::is_eligible_name;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot read directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// List the WebM files directly inside `dir`, sorted by file name.
///
/// Subdirectories are skipped, never descended into.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let entries = fs::read_dir(dir).map_err(|source| ScanError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .filter(|entry| is_eligible_name(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .collect();

    files.sort();
    log::debug!("Found {} WebM files in {:?}", files.len(), dir);
    Ok(files)
}
