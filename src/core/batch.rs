//! Batch normalization over a list of audio files
//!
//! Files are processed one at a time. A failure is logged and recorded, then
//! the run continues with the next file.

use std::path::{Path, PathBuf};

use super::scanning::FileListProvider;
use crate::artwork::{ArtworkTransform, NormalizeOutcome, Normalizer, SkipReason};

/// Summary of a batch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub no_artwork: usize,
    pub already_baseline: usize,
    pub would_process: usize,
    /// (path, error message)
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed
            + self.no_artwork
            + self.already_baseline
            + self.would_process
            + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn record(&mut self, path: &Path, outcome: NormalizeOutcome) {
        match outcome {
            NormalizeOutcome::Done => {
                log::info!("Processed album art for {}.", path.display());
                self.processed += 1;
            }
            NormalizeOutcome::Skipped(SkipReason::NoArtwork) => {
                log::info!("No album art found in {}.", path.display());
                self.no_artwork += 1;
            }
            NormalizeOutcome::Skipped(SkipReason::AlreadyBaseline) => {
                log::debug!("Album art in {} is already baseline.", path.display());
                self.already_baseline += 1;
            }
            NormalizeOutcome::Skipped(reason @ SkipReason::DryRun) => {
                log::info!("{}: {}", path.display(), reason);
                self.would_process += 1;
            }
            NormalizeOutcome::Failed(e) => {
                log::warn!("Failed to process {}: {}", path.display(), e);
                log::debug!("{}: failure kind {}", path.display(), e.kind());
                self.failed.push((path.to_path_buf(), e.to_string()));
            }
        }
    }
}

/// Normalize every file the provider yields
pub fn run_batch<T: ArtworkTransform>(
    provider: &dyn FileListProvider,
    normalizer: &Normalizer<T>,
) -> Result<BatchReport, String> {
    let files = provider.audio_files()?;
    let mut report = BatchReport::default();

    for (index, path) in files.iter().enumerate() {
        log::debug!("[{}/{}] {}", index + 1, files.len(), path.display());
        let outcome = normalizer.normalize_file(path);
        report.record(path, outcome);
    }

    log::info!(
        "Finished {} files: {} processed, {} already baseline, {} without art, {} failed",
        report.total(),
        report.processed,
        report.already_baseline,
        report.no_artwork,
        report.failed.len()
    );
    Ok(report)
}
