//! Run settings: compiled-in defaults with an optional TOML overlay.
//!
//! The overlay is read from `./gamebase.toml` if present, otherwise from
//! `~/.config/gamebase/settings.toml`. Every key is optional; missing keys
//! keep their default.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use gamebase_core::{MAX_BUCKET_SIZE, MAX_NAME_LENGTH};

use crate::error::ConvertError;

/// Settings file looked up in the working directory.
pub const LOCAL_SETTINGS_FILE: &str = "gamebase.toml";

pub const DOWNLOAD_URL: &str = "https://archive.org/download/gbc-v18/GBC_V18_01.iso";
pub const IMAGE_FILE: &str = "GBC_V18_01.iso";
pub const IMAGE_SIZE: u64 = 3_547_310_080;
pub const OUTPUT_DIR: &str = "gamebase";
pub const TEMP_DIR: &str = "tmp";
pub const GAMES_ROOT: &str = "/GAMES/";
pub const ARCHIVE_EXTENSION: &str = ".ZIP";
pub const METADATA_EXTENSION: &str = ".nfo";
pub const CHUNK_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the source image is fetched from.
    pub download_url: String,
    /// Local path of the source image.
    pub image_file: PathBuf,
    /// Exact byte length of a complete image.
    pub expected_size: u64,
    /// Root of the bucketed output. Cleared at the start of every run.
    pub output_dir: PathBuf,
    /// Scratch directory for extracted games. Removed at the end of every run.
    pub temp_dir: PathBuf,
    /// Image directory holding one sub-directory of archives per letter.
    pub games_root: String,
    pub archive_extension: String,
    pub metadata_extension: String,
    /// Download buffer size in bytes.
    pub chunk_size: usize,
    pub max_bucket_size: usize,
    pub max_name_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_url: DOWNLOAD_URL.to_string(),
            image_file: PathBuf::from(IMAGE_FILE),
            expected_size: IMAGE_SIZE,
            output_dir: PathBuf::from(OUTPUT_DIR),
            temp_dir: PathBuf::from(TEMP_DIR),
            games_root: GAMES_ROOT.to_string(),
            archive_extension: ARCHIVE_EXTENSION.to_string(),
            metadata_extension: METADATA_EXTENSION.to_string(),
            chunk_size: CHUNK_SIZE,
            max_bucket_size: MAX_BUCKET_SIZE,
            max_name_length: MAX_NAME_LENGTH,
        }
    }
}

/// Canonical path of the user settings file: `~/.config/gamebase/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("gamebase").join("settings.toml")
}

impl Settings {
    /// Load settings using the lookup chain:
    ///
    /// 1. `./gamebase.toml`
    /// 2. `~/.config/gamebase/settings.toml`
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConvertError> {
        for path in [PathBuf::from(LOCAL_SETTINGS_FILE), settings_path()] {
            if path.is_file() {
                log::debug!("Loading settings from {}", path.display());
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConvertError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConvertError> {
        let settings: Self = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.max_bucket_size == 0 {
            return Err(ConvertError::config("max_bucket_size must be at least 1"));
        }
        if self.max_name_length == 0 {
            return Err(ConvertError::config("max_name_length must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(ConvertError::config("chunk_size must be at least 1"));
        }
        if self.output_dir.as_os_str().is_empty() || self.temp_dir.as_os_str().is_empty() {
            return Err(ConvertError::config("output_dir and temp_dir must not be empty"));
        }

        // Both directories are wiped during a run.
        let output = absolute_lexical(&self.output_dir);
        let temp = absolute_lexical(&self.temp_dir);
        if output.starts_with(&temp) || temp.starts_with(&output) {
            return Err(ConvertError::config(format!(
                "output_dir ({}) and temp_dir ({}) must not overlap",
                self.output_dir.display(),
                self.temp_dir.display()
            )));
        }
        let image = absolute_lexical(&self.image_file);
        if image.starts_with(&output) || image.starts_with(&temp) {
            return Err(ConvertError::config(format!(
                "image_file ({}) must not live inside output_dir or temp_dir",
                self.image_file.display()
            )));
        }
        Ok(())
    }

    /// Pretty TOML rendering, for diagnostics.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

/// Absolute form of `path` with `.` dropped and `..` applied, without
/// touching the filesystem.
fn absolute_lexical(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
