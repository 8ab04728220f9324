//! Naming an extracted game folder from the metadata files inside it.

use std::fs;
use std::path::{Path, PathBuf};

use gamebase_core::resolve_name;

use crate::error::ConvertError;

/// Regular files directly in `folder` whose names end with `extension`
/// (case-insensitive), sorted by file name.
pub fn metadata_files(folder: &Path, extension: &str) -> Result<Vec<PathBuf>, ConvertError> {
    let extension = extension.to_lowercase();
    let mut files: Vec<PathBuf> = fs::read_dir(folder)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().to_lowercase().ends_with(&extension))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Text of a metadata file with invalid UTF-8 dropped; `None` if unreadable.
fn read_metadata(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(
            String::from_utf8_lossy(&bytes)
                .chars()
                .filter(|&c| c != char::REPLACEMENT_CHARACTER)
                .collect(),
        ),
        Err(e) => {
            log::debug!("Skipping unreadable {}: {e}", path.display());
            None
        }
    }
}

/// Resolve the display name of an extracted game folder.
///
/// Metadata files are scanned in name order; when none yields a name, the
/// folder's own name is used.
pub fn resolve_folder_name(
    folder: &Path,
    extension: &str,
    max_len: usize,
) -> Result<String, ConvertError> {
    let files = metadata_files(folder, extension)?;
    let folder_name = folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let texts = files.iter().filter_map(|path| read_metadata(path));
    Ok(resolve_name(texts, &folder_name, max_len))
}
