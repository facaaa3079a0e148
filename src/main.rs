//! Album Art Fixer
//!
//! Walks a music directory and rewrites progressive JPEG cover art embedded
//! in MP3 and FLAC files as fixed-size baseline JPEGs, which older players
//! and car stereos can display.

mod artwork;
mod audio;
mod core;
mod logging;
mod test_fixtures;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use crate::artwork::Normalizer;
use crate::core::{run_batch, BatchReport, DirectoryScan, NormalizeSettings};

/// Re-encode progressive cover art embedded in MP3 and FLAC files
#[derive(Debug, Parser)]
#[command(name = "album-art-fixer", version, about)]
struct Cli {
    /// Music directory to process (searched recursively)
    directory: PathBuf,

    /// Edge length of the square replacement image
    #[arg(long, value_name = "PIXELS")]
    size: Option<u32>,

    /// JPEG quality of the replacement image (1-100)
    #[arg(long, value_name = "QUALITY")]
    quality: Option<u8>,

    /// Report which files would be rewritten without touching them
    #[arg(long)]
    dry_run: bool,

    /// Store --size and --quality as the new defaults
    #[arg(long)]
    save_settings: bool,

    /// Show debug output in the terminal
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::init_logging(level);

    let settings = NormalizeSettings::load().with_overrides(cli.size, cli.quality);
    if let Err(e) = settings.validate() {
        log::error!("{}", e);
        return ExitCode::from(2);
    }

    if cli.save_settings {
        match settings.save() {
            Ok(path) => log::info!("Saved settings to {}", path.display()),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }

    let normalizer = Normalizer::new(settings.resizer()).dry_run(cli.dry_run);
    let provider = DirectoryScan::new(&cli.directory);

    log::info!(
        "Processing {} (target {}x{}, quality {}{})",
        provider.root().display(),
        settings.target_size,
        settings.target_size,
        settings.jpeg_quality,
        if cli.dry_run { ", dry run" } else { "" }
    );

    match run_batch(&provider, &normalizer) {
        Ok(report) => exit_code(&report),
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

/// Failures were already logged one by one as the batch ran
fn exit_code(report: &BatchReport) -> ExitCode {
    if report.has_failures() {
        log::warn!(
            "{} of {} files could not be processed",
            report.failed.len(),
            report.total()
        );
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
