//! Error types for artwork normalization.

use std::path::PathBuf;
use thiserror::Error;

use super::jpeg::ScanError;
use super::transform::TransformError;
use crate::audio::ContainerError;

/// Why a single file could not be normalized.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The path does not name an MP3 or FLAC file.
    #[error("unsupported audio container: {}", path.display())]
    UnsupportedContainer { path: PathBuf },

    /// The audio container could not be opened or parsed.
    #[error("could not read audio container: {0}")]
    ContainerRead(#[source] ContainerError),

    /// The embedded artwork is not a readable JPEG stream.
    #[error("malformed image: {0}")]
    MalformedImage(#[from] ScanError),

    /// Decoding, resizing or encoding the artwork failed.
    #[error("could not transform artwork: {0}")]
    Transform(#[from] TransformError),

    /// The updated container could not be saved.
    #[error("could not save audio container: {0}")]
    Persistence(#[source] ContainerError),
}

impl NormalizeError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizeError::UnsupportedContainer { .. } => "unsupported-container",
            NormalizeError::ContainerRead(_) => "container-read",
            NormalizeError::MalformedImage(_) => "malformed-image",
            NormalizeError::Transform(_) => "transform",
            NormalizeError::Persistence(_) => "persistence",
        }
    }
}

impl From<ContainerError> for NormalizeError {
    fn from(err: ContainerError) -> Self {
        match err {
            ContainerError::Unsupported { path } => NormalizeError::UnsupportedContainer { path },
            err if err.is_persistence() => NormalizeError::Persistence(err),
            // Picture errors only happen while building the replacement
            ContainerError::Picture(_) => NormalizeError::Persistence(err),
            err => NormalizeError::ContainerRead(err),
        }
    }
}
