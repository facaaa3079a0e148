//! Normalization settings
//!
//! Persisted to <data dir>/Album Art Fixer/settings.json and overridable from
//! the command line.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::artwork::JpegResizer;

/// Largest accepted target edge length
pub const MAX_TARGET_SIZE: u32 = 4096;

/// Settings that shape the replacement artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeSettings {
    /// Edge length of the square replacement image
    #[serde(default = "default_target_size")]
    pub target_size: u32,
    /// JPEG quality of the replacement image (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_target_size() -> u32 {
    JpegResizer::DEFAULT_SIZE
}

fn default_jpeg_quality() -> u8 {
    JpegResizer::DEFAULT_QUALITY
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            target_size: default_target_size(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl NormalizeSettings {
    const SETTINGS_FILE: &'static str = "settings.json";

    /// Get the app data directory (~/Library/Application Support/Album Art Fixer/)
    fn get_app_data_dir() -> Result<PathBuf, String> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| "Could not determine data directory".to_string())?;

        let app_dir = data_dir.join("Album Art Fixer");

        if !app_dir.exists() {
            std::fs::create_dir_all(&app_dir)
                .map_err(|e| format!("Failed to create app data directory: {}", e))?;
        }

        Ok(app_dir)
    }

    /// Path of the settings file in the app data directory
    pub fn settings_path() -> Result<PathBuf, String> {
        Ok(Self::get_app_data_dir()?.join(Self::SETTINGS_FILE))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        match Self::settings_path().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => {
                log::debug!("Loaded settings from disk: {:?}", settings);
                settings
            }
            Err(e) => {
                log::debug!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Err("Settings file not found".to_string());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings: {}", e))?;

        let settings: Self = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to the app data directory
    pub fn save(&self) -> Result<PathBuf, String> {
        let path = Self::settings_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        self.validate()?;

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(path, json).map_err(|e| format!("Failed to write settings: {}", e))?;

        log::debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, target_size: Option<u32>, jpeg_quality: Option<u8>) -> Self {
        if let Some(size) = target_size {
            self.target_size = size;
        }
        if let Some(quality) = jpeg_quality {
            self.jpeg_quality = quality;
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.target_size == 0 || self.target_size > MAX_TARGET_SIZE {
            return Err(format!(
                "Target size must be between 1 and {}, got {}",
                MAX_TARGET_SIZE, self.target_size
            ));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            ));
        }
        Ok(())
    }

    /// The image transform these settings describe
    pub fn resizer(&self) -> JpegResizer {
        JpegResizer::new(self.target_size, self.jpeg_quality)
    }
}
