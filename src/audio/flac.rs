//! FLAC artwork access through METADATA_BLOCK_PICTURE blocks

use std::fs::File;
use std::path::{Path, PathBuf};

use lofty::flac::FlacFile;
use lofty::ogg::OggPictureStorage;
use lofty::{AudioFile, LoftyError, ParseOptions};

use super::container::{persist_atomically, AudioContainer, ContainerError, ImageRecord};
use super::detection::ContainerKind;

/// Description written on replacement picture blocks
pub const FLAC_COVER_DESCRIPTION: &str = "Cover (front)";

/// A parsed FLAC file
///
/// Pictures keep their block order, so the first one is the one a player
/// (and this tool) picks up.
pub struct FlacContainer {
    path: PathBuf,
    file: FlacFile,
}

impl FlacContainer {
    pub fn open(path: &Path) -> Result<Self, ContainerError> {
        let read_err = |source| ContainerError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(|e| read_err(LoftyError::from(e)))?;
        let flac = FlacFile::read_from(&mut file, ParseOptions::new()).map_err(read_err)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: flac,
        })
    }
}

impl AudioContainer for FlacContainer {
    fn path(&self) -> &Path {
        &self.path
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::Flac
    }

    fn image_count(&self) -> usize {
        self.file.pictures().len()
    }

    fn images(&self) -> Vec<ImageRecord> {
        self.file
            .pictures()
            .iter()
            .map(|(picture, info)| ImageRecord::from_picture(picture, Some(info.into())))
            .collect()
    }

    fn replace_images(&mut self, image: &ImageRecord) -> Result<(), ContainerError> {
        let picture = image.to_picture(FLAC_COVER_DESCRIPTION)?;

        while !self.file.pictures().is_empty() {
            self.file.remove_picture(0);
        }
        // Without explicit dimensions lofty reads them from the image header
        self.file
            .insert_picture(picture, image.dimensions.map(Into::into))
            .map(|_| ())
            .map_err(ContainerError::Picture)
    }

    fn save(&self) -> Result<(), ContainerError> {
        persist_atomically(&self.path, |staged| self.file.save_to_path(staged))
    }
}
