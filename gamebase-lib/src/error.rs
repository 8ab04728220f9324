use std::path::PathBuf;

use gamebase_iso::IsoError;

/// Errors that stop a conversion run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ISO error: {0}")]
    Iso(#[from] IsoError),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("{} is {actual} bytes, expected {expected}", path.display())]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("Could not prepare directory {}: {source}", path.display())]
    PrepareDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Destination already exists: {}", .0.display())]
    Collision(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl ConvertError {
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn prepare_directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PrepareDirectory {
            path: path.into(),
            source,
        }
    }
}
