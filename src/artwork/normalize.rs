//! Per-file artwork normalization
//!
//! Drives one audio file through extract, scan, transform and write. Every
//! failure stays inside the returned [`NormalizeOutcome`]; nothing here
//! panics or aborts a surrounding batch.

use std::fmt;
use std::path::Path;

use super::error::NormalizeError;
use super::jpeg::{scan_jpeg_bytes, ScanResult};
use super::transform::ArtworkTransform;
use crate::audio::{open_container, AudioContainer, ImageRecord};

/// Why a file was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The container has no embedded image
    NoArtwork,
    /// The embedded image is already a baseline JPEG
    AlreadyBaseline,
    /// The image is progressive but writes are disabled
    DryRun,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoArtwork => "no album art found",
            SkipReason::AlreadyBaseline => "album art is already baseline",
            SkipReason::DryRun => "album art is progressive (dry run, not rewritten)",
        };
        f.write_str(text)
    }
}

/// Terminal state of one file's normalization
#[derive(Debug)]
pub enum NormalizeOutcome {
    /// Artwork was re-encoded and the file rewritten
    Done,
    Skipped(SkipReason),
    Failed(NormalizeError),
}

/// Normalizes embedded artwork one file at a time
pub struct Normalizer<T> {
    transform: T,
    dry_run: bool,
}

impl<T: ArtworkTransform> Normalizer<T> {
    pub fn new(transform: T) -> Self {
        Self {
            transform,
            dry_run: false,
        }
    }

    /// Scan and report, but never transform or write
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Normalize the artwork of the audio file at `path`
    pub fn normalize_file(&self, path: &Path) -> NormalizeOutcome {
        match self.try_normalize(path) {
            Ok(None) => NormalizeOutcome::Done,
            Ok(Some(reason)) => NormalizeOutcome::Skipped(reason),
            Err(e) => NormalizeOutcome::Failed(e),
        }
    }

    /// `Ok(None)` means the file was rewritten
    fn try_normalize(&self, path: &Path) -> Result<Option<SkipReason>, NormalizeError> {
        let mut container = open_container(path)?;

        let Some(artwork) = container.first_image() else {
            return Ok(Some(SkipReason::NoArtwork));
        };
        log::debug!(
            "{} ({:?}): found {} embedded image(s), first is {} bytes ({}, {:?})",
            container.path().display(),
            container.kind(),
            container.image_count(),
            artwork.data.len(),
            artwork.mime_type,
            artwork.description.as_deref().unwrap_or("")
        );

        match scan_jpeg_bytes(&artwork.data)? {
            ScanResult::Baseline => return Ok(Some(SkipReason::AlreadyBaseline)),
            ScanResult::Progressive if self.dry_run => return Ok(Some(SkipReason::DryRun)),
            ScanResult::Progressive => {}
        }

        let replacement = self.transform.transform(&artwork.data)?;
        let record = ImageRecord::front_cover_jpeg(replacement, self.transform.target_size());

        // On failure the container is dropped with its unsaved changes
        write_artwork(container.as_mut(), &record)?;
        Ok(None)
    }
}

fn write_artwork(
    container: &mut dyn AudioContainer,
    record: &ImageRecord,
) -> Result<(), NormalizeError> {
    container
        .replace_artwork(record)
        .map_err(NormalizeError::Persistence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::transform::{JpegResizer, TransformError};
    use crate::audio::container::ImageDimensions;
    use crate::audio::flac::FlacContainer;
    use crate::audio::mp3::Mp3Container;
    use crate::test_fixtures::{
        baseline_jpeg, progressive_jpeg, progressive_jpeg_stub, truncated_jpeg, write_flac,
        write_mp3,
    };
    use lofty::PictureType;
    use std::fs;
    use tempfile::TempDir;

    /// Stands in for the image codec, which cannot decode the progressive stub
    struct FixedOutput {
        output: Vec<u8>,
        size: u32,
    }

    impl FixedOutput {
        fn square(size: u32) -> Self {
            Self {
                output: baseline_jpeg(size, size),
                size,
            }
        }
    }

    impl ArtworkTransform for FixedOutput {
        fn transform(&self, _data: &[u8]) -> Result<Vec<u8>, TransformError> {
            Ok(self.output.clone())
        }

        fn target_size(&self) -> u32 {
            self.size
        }
    }

    struct FailingTransform;

    impl ArtworkTransform for FailingTransform {
        fn transform(&self, _data: &[u8]) -> Result<Vec<u8>, TransformError> {
            Err(TransformError::Encode(image::ImageError::IoError(
                std::io::Error::other("codec unavailable"),
            )))
        }

        fn target_size(&self) -> u32 {
            500
        }
    }

    #[test]
    fn test_progressive_flac_is_normalized() {
        let dir = TempDir::new().unwrap();
        let path = write_flac(dir.path(), "prog.flac", &[&progressive_jpeg_stub()]);

        let outcome = Normalizer::new(FixedOutput::square(500)).normalize_file(&path);
        assert!(matches!(outcome, NormalizeOutcome::Done), "{:?}", outcome);

        let images = FlacContainer::open(&path).unwrap().images();
        assert_eq!(images.len(), 1);
        let cover = &images[0];
        assert_eq!(cover.mime_type, "image/jpeg");
        assert_eq!(cover.role, PictureType::CoverFront);
        assert_eq!(cover.description.as_deref(), Some("Cover (front)"));
        assert_eq!(
            cover.dimensions,
            Some(ImageDimensions {
                width: 500,
                height: 500,
                color_depth: 24
            })
        );
        assert_eq!(scan_jpeg_bytes(&cover.data).unwrap(), ScanResult::Baseline);
        let decoded = image::load_from_memory(&cover.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (500, 500));
    }

    #[test]
    fn test_progressive_mp3_is_normalized() {
        let dir = TempDir::new().unwrap();
        let path = write_mp3(
            dir.path(),
            "prog.mp3",
            &[&progressive_jpeg_stub(), &baseline_jpeg(8, 8)],
        );

        let outcome = Normalizer::new(FixedOutput::square(500)).normalize_file(&path);
        assert!(matches!(outcome, NormalizeOutcome::Done), "{:?}", outcome);

        let container = Mp3Container::open(&path).unwrap();
        assert_eq!(container.image_count(), 1);
        let image = container.first_image().unwrap();
        assert_eq!(image.description.as_deref(), Some("Cover"));
        assert_eq!(scan_jpeg_bytes(&image.data).unwrap(), ScanResult::Baseline);
    }

    #[test]
    fn test_real_progressive_artwork_is_resized() {
        let dir = TempDir::new().unwrap();
        let flac = write_flac(dir.path(), "real.flac", &[&progressive_jpeg()]);
        let mp3 = write_mp3(
            dir.path(),
            "real.mp3",
            &[&progressive_jpeg(), &baseline_jpeg(8, 8)],
        );
        let normalizer = Normalizer::new(JpegResizer::default());

        for path in [&flac, &mp3] {
            let outcome = normalizer.normalize_file(path);
            assert!(matches!(outcome, NormalizeOutcome::Done), "{:?}", outcome);

            let images = open_container(path).unwrap().images();
            assert_eq!(images.len(), 1);
            assert_eq!(images[0].role, PictureType::CoverFront);
            assert_eq!(scan_jpeg_bytes(&images[0].data).unwrap(), ScanResult::Baseline);
            let decoded = image::load_from_memory(&images[0].data).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (500, 500));
        }

        let flac_cover = FlacContainer::open(&flac).unwrap().first_image().unwrap();
        assert_eq!(
            flac_cover.dimensions,
            Some(ImageDimensions {
                width: 500,
                height: 500,
                color_depth: 24
            })
        );
    }

    #[test]
    fn test_baseline_mp3_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = write_mp3(dir.path(), "base.mp3", &[&baseline_jpeg(64, 64)]);
        let before = fs::read(&path).unwrap();

        let outcome = Normalizer::new(JpegResizer::default()).normalize_file(&path);
        assert!(matches!(
            outcome,
            NormalizeOutcome::Skipped(SkipReason::AlreadyBaseline)
        ));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_baseline_flac_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = write_flac(dir.path(), "base.flac", &[&baseline_jpeg(64, 64)]);
        let before = fs::read(&path).unwrap();

        let outcome = Normalizer::new(JpegResizer::default()).normalize_file(&path);
        assert!(matches!(
            outcome,
            NormalizeOutcome::Skipped(SkipReason::AlreadyBaseline)
        ));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let path = write_flac(dir.path(), "twice.flac", &[&progressive_jpeg_stub()]);
        let normalizer = Normalizer::new(FixedOutput::square(500));

        assert!(matches!(normalizer.normalize_file(&path), NormalizeOutcome::Done));
        let after_first = fs::read(&path).unwrap();

        assert!(matches!(
            normalizer.normalize_file(&path),
            NormalizeOutcome::Skipped(SkipReason::AlreadyBaseline)
        ));
        assert_eq!(fs::read(&path).unwrap(), after_first);
    }

    #[test]
    fn test_no_artwork_is_skipped() {
        let dir = TempDir::new().unwrap();
        for path in [
            write_mp3(dir.path(), "bare.mp3", &[]),
            write_flac(dir.path(), "bare.flac", &[]),
        ] {
            let before = fs::read(&path).unwrap();
            let outcome = Normalizer::new(JpegResizer::default()).normalize_file(&path);
            assert!(matches!(
                outcome,
                NormalizeOutcome::Skipped(SkipReason::NoArtwork)
            ));
            assert_eq!(fs::read(&path).unwrap(), before);
        }
    }

    #[test]
    fn test_truncated_artwork_fails_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_flac(dir.path(), "cut.flac", &[&truncated_jpeg()]);
        let before = fs::read(&path).unwrap();

        let outcome = Normalizer::new(FixedOutput::square(500)).normalize_file(&path);
        match outcome {
            NormalizeOutcome::Failed(NormalizeError::MalformedImage(_)) => {}
            other => panic!("expected malformed image, got {:?}", other),
        }
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_transform_failure_fails_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_mp3(dir.path(), "codec.mp3", &[&progressive_jpeg_stub()]);
        let before = fs::read(&path).unwrap();

        let outcome = Normalizer::new(FailingTransform).normalize_file(&path);
        match outcome {
            NormalizeOutcome::Failed(NormalizeError::Transform(_)) => {}
            other => panic!("expected transform error, got {:?}", other),
        }
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = write_mp3(dir.path(), "dry.mp3", &[&progressive_jpeg_stub()]);
        let before = fs::read(&path).unwrap();

        let outcome = Normalizer::new(FixedOutput::square(500))
            .dry_run(true)
            .normalize_file(&path);
        assert!(matches!(outcome, NormalizeOutcome::Skipped(SkipReason::DryRun)));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_unreadable_container_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junk.flac");
        fs::write(&path, b"not audio").unwrap();

        let outcome = Normalizer::new(JpegResizer::default()).normalize_file(&path);
        match outcome {
            NormalizeOutcome::Failed(err) => assert_eq!(err.kind(), "container-read"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_extension_fails() {
        let outcome =
            Normalizer::new(JpegResizer::default()).normalize_file(Path::new("/music/a.wav"));
        match outcome {
            NormalizeOutcome::Failed(NormalizeError::UnsupportedContainer { .. }) => {}
            other => panic!("expected unsupported container, got {:?}", other),
        }
    }
}
