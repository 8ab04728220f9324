//! Pulling game archives out of the image and unpacking them.

use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use gamebase_iso::IsoImage;

use crate::error::ConvertError;

/// Remove `path` if it exists and create it again, empty.
pub fn prepare_empty_directory(path: &Path) -> Result<(), ConvertError> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| ConvertError::prepare_directory(path, e))?;
    }
    fs::create_dir_all(path).map_err(|e| ConvertError::prepare_directory(path, e))
}

/// Scratch folder for an archive: `/GAMES/A/FOO.ZIP` -> `<temp_dir>/GAMES/A/FOO`.
pub fn extraction_folder(temp_dir: &Path, archive: &str) -> PathBuf {
    let relative = Path::new(archive.trim_start_matches('/')).with_extension("");
    temp_dir.join(relative)
}

/// Unpack every entry of an in-memory zip into `destination`.
pub fn extract_zip(bytes: &[u8], destination: &Path) -> Result<(), ConvertError> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes))?;
    zip.extract(destination)?;
    Ok(())
}

/// Read `archive` from the image and unpack it into a fresh scratch folder.
pub fn extract_game<R: Read + Seek>(
    image: &mut IsoImage<R>,
    archive: &str,
    temp_dir: &Path,
) -> Result<PathBuf, ConvertError> {
    let bytes = image.read_file(archive)?;
    let folder = extraction_folder(temp_dir, archive);
    prepare_empty_directory(&folder)?;
    extract_zip(&bytes, &folder)?;
    Ok(folder)
}

/// Best-effort removal of the scratch directory.
pub fn remove_temp_dir(temp_dir: &Path) {
    if !temp_dir.exists() {
        return;
    }
    match fs::remove_dir_all(temp_dir) {
        Ok(()) => log::debug!("Removed {}", temp_dir.display()),
        Err(e) => log::warn!("Could not remove {}: {e}", temp_dir.display()),
    }
}

#[cfg(test)]
#[path = "tests/extract_tests.rs"]
mod tests;
