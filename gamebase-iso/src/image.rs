//! Directory traversal and file reads on an opened image.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::error::IsoError;
use crate::sector::{
    PVD_SECTOR, SECTOR_SIZE, SectorFormat, detect_format, read_extent, read_sector,
};

/// Directory flag bit in a directory record.
const FLAG_DIRECTORY: u8 = 0x02;

/// Minimum size of a directory record (without the identifier).
const MIN_RECORD_LEN: usize = 33;

/// One entry of an ISO 9660 directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File identifier with any `;N` version suffix removed.
    pub name: String,
    pub is_dir: bool,
    extent_lba: u32,
    data_length: u32,
}

impl DirEntry {
    /// Size of the entry's data in bytes.
    pub fn size(&self) -> u64 {
        self.data_length as u64
    }
}

/// Parse a single directory record. `.` and `..` come back as `"."`/`".."`.
fn parse_directory_record(data: &[u8]) -> Option<DirEntry> {
    let record_len = data[0] as usize;
    if record_len < MIN_RECORD_LEN || record_len > data.len() {
        return None;
    }

    let extent_lba = u32::from_le_bytes([data[2], data[3], data[4], data[5]]);
    let data_length = u32::from_le_bytes([data[10], data[11], data[12], data[13]]);
    let file_flags = data[25];
    let id_len = data[32] as usize;

    if MIN_RECORD_LEN + id_len > record_len {
        return None;
    }

    let identifier = &data[33..33 + id_len];
    let name = match identifier {
        [0x00] => ".".to_string(),
        [0x01] => "..".to_string(),
        _ => {
            let raw = String::from_utf8_lossy(identifier);
            let without_version = raw.split(';').next().unwrap_or(&raw);
            without_version.to_string()
        }
    };

    Some(DirEntry {
        name,
        is_dir: file_flags & FLAG_DIRECTORY != 0,
        extent_lba,
        data_length,
    })
}

/// Read a padded ISO 9660 string (strip trailing spaces).
fn read_str_a(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end().to_string()
}

/// An opened ISO 9660 image.
pub struct IsoImage<R> {
    reader: R,
    format: SectorFormat,
    volume_identifier: String,
    root: DirEntry,
}

impl IsoImage<File> {
    /// Open an image file from disk.
    pub fn open(path: &Path) -> Result<Self, IsoError> {
        let file = File::open(path)?;
        let image = Self::from_reader(file)?;
        log::debug!(
            "Opened {} ({}, volume '{}')",
            path.display(),
            image.format.name(),
            image.volume_identifier
        );
        Ok(image)
    }
}

impl<R: Read + Seek> IsoImage<R> {
    /// Read the Primary Volume Descriptor and locate the root directory.
    pub fn from_reader(mut reader: R) -> Result<Self, IsoError> {
        let format = detect_format(&mut reader)?;
        let pvd = read_sector(&mut reader, PVD_SECTOR, format)?;

        if pvd[0] != 0x01 {
            return Err(IsoError::invalid_image(format!(
                "expected PVD type 0x01, got 0x{:02X}",
                pvd[0]
            )));
        }
        if &pvd[1..6] != b"CD001" {
            return Err(IsoError::invalid_image("missing CD001 signature in PVD"));
        }

        let volume_identifier = read_str_a(&pvd[40..72]);
        let mut root = parse_directory_record(&pvd[156..190])
            .ok_or_else(|| IsoError::corrupted("unreadable root directory record"))?;
        root.is_dir = true;

        Ok(Self {
            reader,
            format,
            volume_identifier,
            root,
        })
    }

    pub fn format(&self) -> SectorFormat {
        self.format
    }

    pub fn volume_identifier(&self) -> &str {
        &self.volume_identifier
    }

    /// Entries of the directory at `path` (e.g. `/GAMES/A/`), excluding
    /// `.` and `..`, in on-disc order.
    pub fn list_children(&mut self, path: &str) -> Result<Vec<DirEntry>, IsoError> {
        let dir = self.lookup(path)?;
        if !dir.is_dir {
            return Err(IsoError::NotADirectory(path.to_string()));
        }
        self.read_dir(&dir)
    }

    /// Contents of the file at `path`.
    pub fn read_file(&mut self, path: &str) -> Result<Vec<u8>, IsoError> {
        let entry = self.lookup(path)?;
        if entry.is_dir {
            return Err(IsoError::IsADirectory(path.to_string()));
        }
        read_extent(
            &mut self.reader,
            entry.extent_lba as u64,
            entry.data_length as usize,
            self.format,
        )
    }

    /// Release the image.
    pub fn close(self) {
        log::debug!("Closed image '{}'", self.volume_identifier);
    }

    /// Resolve an absolute path one component at a time. Matching is
    /// case-insensitive and ignores version suffixes.
    fn lookup(&mut self, path: &str) -> Result<DirEntry, IsoError> {
        let mut current = self.root.clone();
        for component in path.split('/').filter(|c| !c.is_empty()) {
            if !current.is_dir {
                return Err(IsoError::NotADirectory(path.to_string()));
            }
            let wanted = component.split(';').next().unwrap_or(component);
            current = self
                .read_dir(&current)?
                .into_iter()
                .find(|entry| entry.name.eq_ignore_ascii_case(wanted))
                .ok_or_else(|| IsoError::not_found(path))?;
        }
        Ok(current)
    }

    fn read_dir(&mut self, dir: &DirEntry) -> Result<Vec<DirEntry>, IsoError> {
        let mut entries = Vec::new();
        let dir_sectors = (dir.data_length as u64).div_ceil(SECTOR_SIZE as u64);

        for sector_offset in 0..dir_sectors {
            let sector = dir.extent_lba as u64 + sector_offset;
            let sector_data = read_sector(&mut self.reader, sector, self.format)?;

            // Records never straddle sectors; a zero length byte means the
            // rest of this sector is padding.
            let mut pos = 0;
            while pos < SECTOR_SIZE {
                let record_len = sector_data[pos] as usize;
                if record_len == 0 || pos + record_len > SECTOR_SIZE {
                    break;
                }
                if let Some(entry) = parse_directory_record(&sector_data[pos..pos + record_len])
                    && entry.name != "."
                    && entry.name != ".."
                {
                    entries.push(entry);
                }
                pos += record_len;
            }
        }

        Ok(entries)
    }
}

/// ISO paths of every game archive: files ending in `extension`
/// (case-insensitive) inside the directories directly under `games_root`.
pub fn list_game_archives<R: Read + Seek>(
    image: &mut IsoImage<R>,
    games_root: &str,
    extension: &str,
) -> Result<Vec<String>, IsoError> {
    let root = format!("/{}/", games_root.trim_matches('/'));
    let extension = extension.to_uppercase();

    let mut archives = Vec::new();
    for dir in image.list_children(&root)? {
        if !dir.is_dir {
            continue;
        }
        let dir_path = format!("{root}{}/", dir.name);
        let before = archives.len();
        for entry in image.list_children(&dir_path)? {
            if !entry.is_dir && entry.name.to_uppercase().ends_with(&extension) {
                archives.push(format!("{dir_path}{}", entry.name));
            }
        }
        log::debug!("{dir_path}: {} archives", archives.len() - before);
    }
    Ok(archives)
}

#[cfg(test)]
#[path = "tests/image_tests.rs"]
mod tests;
