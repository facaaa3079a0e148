//! Audio containers with embedded artwork
//!
//! Each container exposes the same small surface: read the first embedded
//! image, replace every embedded image with a single new one, and save.
//! Saving goes through a staged copy of the file so the original is either
//! fully replaced or left exactly as it was read.

use std::fs;
use std::path::{Path, PathBuf};

use lofty::{LoftyError, MimeType, Picture, PictureInformation, PictureType};
use thiserror::Error;

use super::detection::ContainerKind;
use super::flac::FlacContainer;
use super::mp3::Mp3Container;

/// Width, height and color depth stored alongside a picture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
}

impl From<&PictureInformation> for ImageDimensions {
    fn from(info: &PictureInformation) -> Self {
        Self {
            width: info.width,
            height: info.height,
            color_depth: info.color_depth,
        }
    }
}

impl From<ImageDimensions> for PictureInformation {
    fn from(dimensions: ImageDimensions) -> Self {
        PictureInformation {
            width: dimensions.width,
            height: dimensions.height,
            color_depth: dimensions.color_depth,
            num_colors: 0,
        }
    }
}

/// An image as stored in (or destined for) an audio container
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub role: PictureType,
    pub description: Option<String>,
    /// Only FLAC stores these
    pub dimensions: Option<ImageDimensions>,
}

impl ImageRecord {
    pub const JPEG_MIME: &'static str = "image/jpeg";

    /// A square 24-bit front cover JPEG
    pub fn front_cover_jpeg(data: Vec<u8>, size: u32) -> Self {
        Self {
            data,
            mime_type: Self::JPEG_MIME.to_string(),
            role: PictureType::CoverFront,
            description: None,
            dimensions: Some(ImageDimensions {
                width: size,
                height: size,
                color_depth: 24,
            }),
        }
    }

    pub(crate) fn from_picture(picture: &Picture, dimensions: Option<ImageDimensions>) -> Self {
        Self {
            data: picture.data().to_vec(),
            mime_type: picture
                .mime_type()
                .map(MimeType::as_str)
                .unwrap_or_default()
                .to_string(),
            role: picture.pic_type(),
            description: picture.description().map(str::to_owned),
            dimensions,
        }
    }

    /// Build a lofty picture carrying this record's data and role
    pub(crate) fn to_picture(&self, description: &str) -> Result<Picture, ContainerError> {
        let mut reader = self.data.as_slice();
        let mut picture = Picture::from_reader(&mut reader).map_err(ContainerError::Picture)?;
        picture.set_pic_type(self.role);
        picture.set_description(Some(description.to_string()));
        Ok(picture)
    }
}

/// Errors raised while reading or saving an audio container
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("unsupported audio container: {}", path.display())]
    Unsupported { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: LoftyError,
    },

    #[error("invalid picture data: {0}")]
    Picture(#[source] LoftyError),

    #[error("failed to write tags to {}: {source}", path.display())]
    WriteTags {
        path: PathBuf,
        #[source]
        source: LoftyError,
    },

    #[error("failed to replace {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContainerError {
    /// Whether the error happened while saving the container
    pub fn is_persistence(&self) -> bool {
        matches!(self, ContainerError::WriteTags { .. } | ContainerError::Io { .. })
    }
}

/// An audio file that can hold embedded images
pub trait AudioContainer {
    fn path(&self) -> &Path;

    fn kind(&self) -> ContainerKind;

    /// Number of embedded images
    fn image_count(&self) -> usize;

    /// Copies of every embedded image, in container order
    fn images(&self) -> Vec<ImageRecord>;

    /// A copy of the first embedded image, if any
    fn first_image(&self) -> Option<ImageRecord> {
        self.images().into_iter().next()
    }

    /// Remove every embedded image and attach `image` in their place
    ///
    /// Only the in-memory representation changes; call [`AudioContainer::save`]
    /// to persist.
    fn replace_images(&mut self, image: &ImageRecord) -> Result<(), ContainerError>;

    /// Write the container back to its path
    fn save(&self) -> Result<(), ContainerError>;

    /// Replace all images and persist in one step
    fn replace_artwork(&mut self, image: &ImageRecord) -> Result<(), ContainerError> {
        self.replace_images(image)?;
        self.save()
    }
}

/// Open the container at `path`, dispatching on its extension
pub fn open_container(path: &Path) -> Result<Box<dyn AudioContainer>, ContainerError> {
    match ContainerKind::from_path(path) {
        Some(ContainerKind::Mp3) => Ok(Box::new(Mp3Container::open(path)?)),
        Some(ContainerKind::Flac) => Ok(Box::new(FlacContainer::open(path)?)),
        None => Err(ContainerError::Unsupported {
            path: path.to_path_buf(),
        }),
    }
}

/// Save through a staged sibling copy, then rename it over `path`
///
/// The staged file keeps the original extension (lofty picks the writer by
/// file type) and the original permission bits. If `write` fails the staged
/// file is removed and `path` is untouched.
pub(crate) fn persist_atomically<F>(path: &Path, write: F) -> Result<(), ContainerError>
where
    F: FnOnce(&Path) -> Result<(), LoftyError>,
{
    let io_err = |source| ContainerError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let staged = tempfile::Builder::new()
        .prefix(".artfix-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(io_err)?;

    // fs::copy also carries over the permission bits
    fs::copy(path, staged.path()).map_err(io_err)?;

    write(staged.path()).map_err(|source| ContainerError::WriteTags {
        path: path.to_path_buf(),
        source,
    })?;

    staged.persist(path).map_err(|e| io_err(e.error))?;
    log::debug!("Replaced {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{baseline_jpeg, write_flac, write_mp3};
    use tempfile::TempDir;

    #[test]
    fn test_front_cover_record() {
        let record = ImageRecord::front_cover_jpeg(vec![1, 2, 3], 500);
        assert_eq!(record.mime_type, "image/jpeg");
        assert_eq!(record.role, PictureType::CoverFront);
        assert_eq!(
            record.dimensions,
            Some(ImageDimensions {
                width: 500,
                height: 500,
                color_depth: 24
            })
        );
    }

    #[test]
    fn test_open_unsupported_extension() {
        let result = open_container(Path::new("/tmp/song.ogg"));
        assert!(matches!(result, Err(ContainerError::Unsupported { .. })));
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_container(Path::new("/nonexistent/file.mp3"));
        assert!(matches!(result, Err(ContainerError::Read { .. })));
    }

    #[test]
    fn test_open_dispatches_on_extension() {
        let dir = TempDir::new().unwrap();
        let jpeg = baseline_jpeg(16, 16);
        let mp3 = write_mp3(dir.path(), "a.mp3", &[&jpeg]);
        let flac = write_flac(dir.path(), "b.flac", &[&jpeg]);

        assert_eq!(open_container(&mp3).unwrap().kind(), ContainerKind::Mp3);
        assert_eq!(open_container(&flac).unwrap().kind(), ContainerKind::Flac);
    }

    #[test]
    fn test_persist_failure_leaves_original() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("track.mp3");
        fs::write(&path, b"original bytes").unwrap();

        let result = persist_atomically(&path, |staged| {
            fs::write(staged, b"half written").unwrap();
            Err(LoftyError::from(std::io::Error::other("disk full")))
        });

        assert!(matches!(result, Err(ContainerError::WriteTags { .. })));
        assert!(result.unwrap_err().is_persistence());
        assert_eq!(fs::read(&path).unwrap(), b"original bytes");
        // Only the original remains; the staged copy is cleaned up
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_persist_success_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("track.flac");
        fs::write(&path, b"old").unwrap();

        persist_atomically(&path, |staged| {
            assert_eq!(staged.extension().unwrap(), "flac");
            assert_eq!(fs::read(staged).unwrap(), b"old");
            fs::write(staged, b"new").map_err(LoftyError::from)
        })
        .unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
