//! Acquisition of the source disc image.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::error::ConvertError;
use crate::progress::ConvertProgress;
use crate::settings::Settings;

/// Make sure the source image exists locally with the expected size.
///
/// An image of the wrong size is deleted and fetched again. Returns whether a
/// download happened.
pub fn ensure_image(
    settings: &Settings,
    progress: &dyn Fn(ConvertProgress),
) -> Result<bool, ConvertError> {
    let path = settings.image_file.as_path();
    progress(ConvertProgress::CheckingImage {
        path: path.to_path_buf(),
    });

    match fs::metadata(path) {
        Ok(meta) if meta.len() == settings.expected_size => {
            log::info!(
                "{} exists and is the correct size, skipping download",
                path.display()
            );
            return Ok(false);
        }
        Ok(meta) => {
            log::warn!(
                "{} exists but is {} bytes instead of {}, deleting it and re-downloading",
                path.display(),
                meta.len(),
                settings.expected_size
            );
            fs::remove_file(path)?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    download_file(&settings.download_url, path, settings.chunk_size, progress)?;

    let actual = fs::metadata(path)?.len();
    if actual != settings.expected_size {
        return Err(ConvertError::SizeMismatch {
            path: path.to_path_buf(),
            expected: settings.expected_size,
            actual,
        });
    }
    Ok(true)
}

/// Stream `url` into `destination` in `chunk_size` pieces, reporting progress
/// after every chunk. Returns the number of bytes written.
///
/// A non-success status is an error; nothing is written in that case.
pub fn download_file(
    url: &str,
    destination: &Path,
    chunk_size: usize,
    progress: &dyn Fn(ConvertProgress),
) -> Result<u64, ConvertError> {
    log::info!("Downloading {url} to {}", destination.display());

    // No whole-request timeout: the body is several gigabytes.
    let client = reqwest::blocking::Client::builder().timeout(None).build()?;
    let mut response = client.get(url).send()?;

    if !response.status().is_success() {
        return Err(ConvertError::download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let bytes_total = response.content_length().unwrap_or(0);
    let mut writer = BufWriter::new(File::create(destination)?);
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut bytes_done = 0u64;

    loop {
        let n = response.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        bytes_done += n as u64;
        progress(ConvertProgress::Downloading {
            bytes_done,
            bytes_total,
        });
    }
    writer.flush()?;

    log::info!("Downloaded {url} to {}", destination.display());
    Ok(bytes_done)
}
