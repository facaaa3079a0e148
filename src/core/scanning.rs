//! Audio file discovery
//!
//! The batch runner asks a [`FileListProvider`] for candidate paths instead
//! of walking directories itself.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::audio::is_supported_audio_file;

/// Source of audio file paths to normalize
pub trait FileListProvider {
    fn audio_files(&self) -> Result<Vec<PathBuf>, String>;
}

/// A fixed list of paths
impl FileListProvider for Vec<PathBuf> {
    fn audio_files(&self) -> Result<Vec<PathBuf>, String> {
        Ok(self.clone())
    }
}

/// Every `.mp3` and `.flac` file below a root directory
#[derive(Debug, Clone)]
pub struct DirectoryScan {
    root: PathBuf,
}

impl DirectoryScan {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileListProvider for DirectoryScan {
    fn audio_files(&self) -> Result<Vec<PathBuf>, String> {
        find_audio_files(&self.root)
    }
}

/// Collect supported audio files below `path`, sorted for a stable order
pub fn find_audio_files(path: &Path) -> Result<Vec<PathBuf>, String> {
    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", path.display()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported_audio_file(path))
        .collect();

    files.sort();
    log::debug!("Found {} audio files in {}", files.len(), path.display());
    Ok(files)
}
