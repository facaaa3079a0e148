//! MP3 artwork access through the ID3v2 tag
//!
//! Only APIC frames are touched; every other frame in the tag is written back
//! as it was read.

use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf};

use lofty::id3::v2::{AttachedPictureFrame, FrameId, FrameValue};
use lofty::mpeg::MpegFile;
use lofty::{AudioFile, LoftyError, ParseOptions, Picture};

use super::container::{persist_atomically, AudioContainer, ContainerError, ImageRecord};
use super::detection::ContainerKind;

/// Description written on replacement APIC frames
pub const MP3_COVER_DESCRIPTION: &str = "Cover";

const APIC: FrameId<'static> = FrameId::Valid(Cow::Borrowed("APIC"));

/// A parsed MP3 file and its tags
pub struct Mp3Container {
    path: PathBuf,
    file: MpegFile,
}

impl Mp3Container {
    pub fn open(path: &Path) -> Result<Self, ContainerError> {
        let read_err = |source| ContainerError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(|e| read_err(LoftyError::from(e)))?;
        let mpeg = MpegFile::read_from(&mut file, ParseOptions::new()).map_err(read_err)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: mpeg,
        })
    }

    /// Pictures of the APIC frames, in tag order
    fn pictures(&self) -> impl Iterator<Item = &Picture> + '_ {
        self.file
            .id3v2()
            .into_iter()
            .flat_map(|tag| tag.into_iter())
            .filter_map(|frame| match frame.content() {
                FrameValue::Picture(AttachedPictureFrame { picture, .. }) => Some(picture),
                _ => None,
            })
    }
}

impl AudioContainer for Mp3Container {
    fn path(&self) -> &Path {
        &self.path
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::Mp3
    }

    fn image_count(&self) -> usize {
        self.pictures().count()
    }

    fn images(&self) -> Vec<ImageRecord> {
        self.pictures()
            .map(|picture| ImageRecord::from_picture(picture, None))
            .collect()
    }

    fn replace_images(&mut self, image: &ImageRecord) -> Result<(), ContainerError> {
        let picture = image.to_picture(MP3_COVER_DESCRIPTION)?;

        let mut tag = self.file.remove_id3v2().unwrap_or_default();
        tag.remove(&APIC).for_each(drop);
        // Written as a UTF-8 APIC frame
        tag.insert_picture(picture);
        self.file.set_id3v2(tag);
        Ok(())
    }

    fn save(&self) -> Result<(), ContainerError> {
        if self.file.id3v2().is_none() {
            return Ok(());
        }
        persist_atomically(&self.path, |staged| self.file.save_to_path(staged))
    }
}
