//! The full conversion run: image -> extracted games -> named collection ->
//! bucket plan -> output tree.

use std::io::{Read, Seek};

use gamebase_core::{Collection, plan_buckets};
use gamebase_iso::{IsoImage, list_game_archives};

use crate::download::ensure_image;
use crate::error::ConvertError;
use crate::extract::{extract_game, prepare_empty_directory, remove_temp_dir};
use crate::placement::place_buckets;
use crate::progress::ConvertProgress;
use crate::resolver::resolve_folder_name;
use crate::settings::Settings;

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Whether the source image had to be downloaded
    pub downloaded: bool,
    /// Game archives found in the image
    pub archives: usize,
    /// Games placed into the output tree
    pub games: usize,
    /// Bucket directories written
    pub buckets: usize,
}

/// Run the whole pipeline.
///
/// The scratch directory is removed afterwards whether or not the run
/// succeeded.
pub fn convert(
    settings: &Settings,
    progress: &dyn Fn(ConvertProgress),
) -> Result<ConvertSummary, ConvertError> {
    settings.validate()?;

    let result = run(settings, progress);

    progress(ConvertProgress::CleaningUp);
    remove_temp_dir(&settings.temp_dir);

    if result.is_ok() {
        progress(ConvertProgress::Done);
    }
    result
}

fn run(
    settings: &Settings,
    progress: &dyn Fn(ConvertProgress),
) -> Result<ConvertSummary, ConvertError> {
    log::info!("Preparing directories: {}", settings.output_dir.display());
    progress(ConvertProgress::PreparingOutput {
        path: settings.output_dir.clone(),
    });
    prepare_empty_directory(&settings.output_dir)?;

    let downloaded = ensure_image(settings, progress)?;
    progress(ConvertProgress::ImageReady { downloaded });

    log::info!("Opening ISO image: {}", settings.image_file.display());
    let mut image = IsoImage::open(&settings.image_file)?;

    log::info!("Reading game archives from {}", settings.games_root);
    let archives = list_game_archives(
        &mut image,
        &settings.games_root,
        &settings.archive_extension,
    )?;
    log::info!("Found {} archives", archives.len());
    progress(ConvertProgress::ArchivesFound {
        count: archives.len(),
    });

    let collection = extract_all(&mut image, &archives, settings, progress)?;

    log::info!("Closing ISO image");
    image.close();

    log::info!(
        "Dividing games to buckets and moving them to {}",
        settings.output_dir.display()
    );
    let games = collection.len();
    let buckets = plan_buckets(collection, settings.max_bucket_size);
    let bucket_count = buckets.len();
    place_buckets(&settings.output_dir, buckets, progress)?;

    Ok(ConvertSummary {
        downloaded,
        archives: archives.len(),
        games,
        buckets: bucket_count,
    })
}

/// Extract and name every archive, one at a time, into a collection with
/// unique names.
pub fn extract_all<R: Read + Seek>(
    image: &mut IsoImage<R>,
    archives: &[String],
    settings: &Settings,
    progress: &dyn Fn(ConvertProgress),
) -> Result<Collection, ConvertError> {
    let total = archives.len();
    archives
        .iter()
        .enumerate()
        .try_fold(Collection::new(), |collection, (i, archive)| {
            progress(ConvertProgress::Extracting {
                archive: archive.clone(),
                index: i + 1,
                total,
            });

            let folder = extract_game(image, archive, &settings.temp_dir)?;
            let candidate = resolve_folder_name(
                &folder,
                &settings.metadata_extension,
                settings.max_name_length,
            )?;
            let (collection, name) = collection.with_game(&candidate, folder);

            log::debug!("{archive} -> {name}");
            progress(ConvertProgress::Named {
                archive: archive.clone(),
                name,
            });
            Ok(collection)
        })
}
