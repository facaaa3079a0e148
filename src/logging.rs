//! Logging configuration for Album Art Fixer
//!
//! Logs are written to both the terminal and a file at:
//! `~/Library/Logs/Album Art Fixer/album-art-fixer.log` on macOS, or
//! `<local data dir>/Album Art Fixer/logs/album-art-fixer.log` elsewhere.

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "Album Art Fixer";
const LOG_FILE: &str = "album-art-fixer.log";

/// Rotate the log once it grows past this size
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Get the log directory path
pub fn get_log_directory() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Logs").join(APP_DIR))
    } else {
        dirs::data_local_dir().map(|d| d.join(APP_DIR).join("logs"))
    }
}

fn log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build()
}

/// Move an oversized log aside so the next session starts fresh
fn rotate_if_large(log_path: &Path) {
    if let Ok(metadata) = fs::metadata(log_path)
        && metadata.len() > MAX_LOG_SIZE
    {
        let backup_path = log_path.with_extension("log.old");
        let _ = fs::rename(log_path, backup_path);
    }
}

/// Initialize the logging system
///
/// Terminal output shows `terminal_level` and above; the log file always
/// captures debug. Returns the path to the log file on success.
pub fn init_logging(terminal_level: LevelFilter) -> Option<PathBuf> {
    let log_dir = match get_log_directory() {
        Some(d) => d,
        None => {
            eprintln!("Warning: Could not determine log directory");
            init_terminal_only(terminal_level);
            return None;
        }
    };

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        init_terminal_only(terminal_level);
        return None;
    }

    let log_path = log_dir.join(LOG_FILE);
    rotate_if_large(&log_path);

    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file: {}", e);
            init_terminal_only(terminal_level);
            return None;
        }
    };

    let config = log_config();
    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(terminal_level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(LevelFilter::Debug.max(terminal_level), config, log_file),
    ];

    if CombinedLogger::init(loggers).is_err() {
        eprintln!("Warning: Logger already initialized");
    }

    log::debug!("=== Album Art Fixer session started ===");
    log::debug!("Log file: {}", log_path.display());

    Some(log_path)
}

/// Initialize terminal-only logging (fallback if file logging fails)
fn init_terminal_only(level: LevelFilter) {
    let term_logger = TermLogger::new(level, log_config(), TerminalMode::Mixed, ColorChoice::Auto);
    let _ = CombinedLogger::init(vec![term_logger]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_log_directory_returns_path() {
        let dir = get_log_directory();
        assert!(dir.is_some(), "Should return a log directory path");

        let path = dir.unwrap();
        assert!(
            path.to_string_lossy().contains(APP_DIR),
            "Path should contain app name"
        );
    }

    #[test]
    fn test_small_log_is_not_rotated() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join(LOG_FILE);
        fs::write(&log_path, b"a few lines").unwrap();

        rotate_if_large(&log_path);

        assert!(log_path.exists());
        assert!(!dir.path().join("album-art-fixer.log.old").exists());
    }

    #[test]
    fn test_large_log_is_rotated() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join(LOG_FILE);
        let file = fs::File::create(&log_path).unwrap();
        file.set_len(MAX_LOG_SIZE + 1).unwrap();

        rotate_if_large(&log_path);

        assert!(!log_path.exists());
        assert!(dir.path().join("album-art-fixer.log.old").exists());
    }
}
