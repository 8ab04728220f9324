//! Materializing planned buckets on disk.

use std::fs;
use std::path::{Path, PathBuf};

use gamebase_core::Bucket;

use crate::error::ConvertError;
use crate::progress::ConvertProgress;

/// Create the bucket directory and move every game folder into it as
/// `<bucket>/<name>`. Returns the bucket directory.
///
/// A destination that already exists is an error; names are unique per run,
/// so it means the output was tampered with or the plan is broken.
pub fn place_bucket(output_dir: &Path, bucket: &Bucket) -> Result<PathBuf, ConvertError> {
    let destination = bucket.path.to_path(output_dir);
    fs::create_dir_all(&destination)
        .map_err(|e| ConvertError::prepare_directory(&destination, e))?;

    for game in &bucket.games {
        let target = destination.join(game.name());
        if target.symlink_metadata().is_ok() {
            return Err(ConvertError::Collision(target));
        }
        fs::rename(game.source_folder(), &target)?;
    }
    Ok(destination)
}

/// Place every bucket in order. Returns the number of games moved.
pub fn place_buckets(
    output_dir: &Path,
    buckets: Vec<Bucket>,
    progress: &dyn Fn(ConvertProgress),
) -> Result<usize, ConvertError> {
    let mut moved = 0;
    for bucket in buckets {
        progress(ConvertProgress::Placing {
            bucket: bucket.path.to_string(),
            games: bucket.len(),
        });
        let destination = place_bucket(output_dir, &bucket)?;
        log::debug!("{} games -> {}", bucket.len(), destination.display());
        moved += bucket.len();
    }
    Ok(moved)
}
