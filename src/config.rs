/// Fixed launcher parameters
///
/// The launcher reads no config file, flags or environment variables. Every
/// tunable lives here as a constant and is gathered into one `LauncherConfig`
/// that the application context owns.
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{LauncherError, Result};

/// Audio passthrough sample rate (Hz)
pub const SAMPLE_RATE: u32 = 44_100;

/// Audio passthrough channel count (mono)
pub const CHANNELS: u16 = 1;

/// Camera preview polling rate (frames per second)
pub const PREVIEW_FPS: u64 = 30;

/// Clock refresh period
pub const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

/// Extension used both when saving captures and when listing the gallery
pub const PHOTO_EXTENSION: &str = "png";

/// File name prefix of captured photos
pub const PHOTO_PREFIX: &str = "photo_";

/// Longest edge of gallery thumbnails
pub const THUMBNAIL_SIZE: u32 = 256;

/// Name of the photo folder
const PHOTO_DIR_NAME: &str = "Gallery";

/// Application directory inside the user's data dir
const APP_DIR_NAME: &str = "launcher";

/// Runtime configuration, built once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct LauncherConfig {
    /// Folder shared by the camera (writer) and the gallery (reader)
    pub photo_dir: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
    pub preview_interval: Duration,
    pub clock_interval: Duration,
}

impl LauncherConfig {
    /// Configuration with the photo folder in the user's data directory:
    /// - Linux: ~/.local/share/launcher/Gallery
    /// - macOS: ~/Library/Application Support/launcher/Gallery
    /// - Windows: %APPDATA%\launcher\Gallery
    pub fn new() -> Self {
        Self::with_photo_dir(Self::default_photo_dir())
    }

    /// Same constants, different photo folder
    pub fn with_photo_dir(photo_dir: impl Into<PathBuf>) -> Self {
        Self {
            photo_dir: photo_dir.into(),
            sample_rate: SAMPLE_RATE,
            channels: CHANNELS,
            preview_interval: Duration::from_millis(1000 / PREVIEW_FPS),
            clock_interval: CLOCK_INTERVAL,
        }
    }

    fn default_photo_dir() -> PathBuf {
        match dirs::data_dir().or_else(dirs::home_dir) {
            Some(mut path) => {
                path.push(APP_DIR_NAME);
                path.push(PHOTO_DIR_NAME);
                path
            }
            // Relative to the working directory, like a plain `Gallery` folder
            None => PathBuf::from(PHOTO_DIR_NAME),
        }
    }

    /// Create the photo folder if it does not exist yet
    pub fn ensure_photo_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.photo_dir)
            .map_err(|e| LauncherError::io(&self.photo_dir, e))?;
        Ok(&self.photo_dir)
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_photo_dir_is_named_gallery() {
        let config = LauncherConfig::new();
        assert!(config.photo_dir.ends_with(PHOTO_DIR_NAME));
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.channels, 1);
    }

    #[test]
    fn test_preview_interval_matches_fps() {
        let config = LauncherConfig::with_photo_dir("Gallery");
        assert_eq!(config.preview_interval, Duration::from_millis(33));
        assert_eq!(config.clock_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_ensure_photo_dir_creates_missing_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LauncherConfig::with_photo_dir(tmp.path().join("nested").join("Gallery"));
        assert!(!config.photo_dir.exists());

        config.ensure_photo_dir().unwrap();
        assert!(config.photo_dir.is_dir());

        // Second call is harmless
        config.ensure_photo_dir().unwrap();
    }
}
