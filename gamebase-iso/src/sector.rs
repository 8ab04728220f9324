//! Sector layout detection and sector reads.

use std::io::{Read, Seek, SeekFrom};

use crate::error::IsoError;

/// CD sync pattern at the start of every raw (2352-byte) sector.
pub(crate) const CD_SYNC_PATTERN: [u8; 12] = [
    0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
];

/// User data bytes per sector.
pub const SECTOR_SIZE: usize = 2048;

/// Raw CD sector size (sync + header + subheader + data + EDC + ECC).
const RAW_SECTOR_SIZE: u64 = 2352;

/// Offset to user data within a Mode 2 Form 1 raw sector.
/// 12 (sync) + 4 (header) + 8 (subheader) = 24.
const MODE2_FORM1_DATA_OFFSET: u64 = 24;

/// The Primary Volume Descriptor always lives at sector 16.
pub const PVD_SECTOR: u64 = 16;

/// How user data is laid out in the image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorFormat {
    /// Plain 2048 byte/sector ISO image.
    Iso2048,
    /// Raw 2352 byte/sector Mode 2 Form 1 dump.
    Raw2352,
}

impl SectorFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Iso2048 => "ISO 9660",
            Self::Raw2352 => "Raw BIN (2352)",
        }
    }

    fn offset(&self, sector: u64) -> u64 {
        match self {
            Self::Iso2048 => sector * SECTOR_SIZE as u64,
            Self::Raw2352 => sector * RAW_SECTOR_SIZE + MODE2_FORM1_DATA_OFFSET,
        }
    }
}

/// Detect the sector layout by looking for the raw sync pattern or the
/// `CD001` signature at sector 16.
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> Result<SectorFormat, IsoError> {
    reader.seek(SeekFrom::Start(0))?;
    let mut buf = [0u8; 12];
    let bytes_read = reader.read(&mut buf)?;
    if bytes_read < buf.len() {
        return Err(IsoError::TooSmall {
            expected: buf.len() as u64,
            actual: bytes_read as u64,
        });
    }

    if buf == CD_SYNC_PATTERN {
        return Ok(SectorFormat::Raw2352);
    }

    // +1 skips the descriptor type byte
    reader.seek(SeekFrom::Start(SectorFormat::Iso2048.offset(PVD_SECTOR) + 1))?;
    let mut cd001 = [0u8; 5];
    if reader.read_exact(&mut cd001).is_ok() && &cd001 == b"CD001" {
        return Ok(SectorFormat::Iso2048);
    }

    Err(IsoError::invalid_image("no CD001 signature at sector 16"))
}

/// Read 2048 bytes of user data from a sector.
pub fn read_sector<R: Read + Seek>(
    reader: &mut R,
    sector: u64,
    format: SectorFormat,
) -> Result<[u8; SECTOR_SIZE], IsoError> {
    reader.seek(SeekFrom::Start(format.offset(sector)))?;
    let mut data = [0u8; SECTOR_SIZE];
    reader.read_exact(&mut data).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            IsoError::corrupted(format!("sector {sector} is beyond end of image"))
        } else {
            IsoError::Io(e)
        }
    })?;
    Ok(data)
}

/// Read `length` bytes of a file extent starting at `first_sector`.
///
/// Plain images are read in one go; raw images sector by sector.
pub fn read_extent<R: Read + Seek>(
    reader: &mut R,
    first_sector: u64,
    length: usize,
    format: SectorFormat,
) -> Result<Vec<u8>, IsoError> {
    if format == SectorFormat::Iso2048 {
        reader.seek(SeekFrom::Start(format.offset(first_sector)))?;
        let mut data = vec![0u8; length];
        reader.read_exact(&mut data).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                IsoError::corrupted(format!(
                    "extent at sector {first_sector} runs past end of image"
                ))
            } else {
                IsoError::Io(e)
            }
        })?;
        return Ok(data);
    }

    let mut result = Vec::with_capacity(length);
    let sectors_needed = length.div_ceil(SECTOR_SIZE) as u64;
    let mut remaining = length;
    for i in 0..sectors_needed {
        let sector_data = read_sector(reader, first_sector + i, format)?;
        let to_copy = remaining.min(SECTOR_SIZE);
        result.extend_from_slice(&sector_data[..to_copy]);
        remaining -= to_copy;
    }
    Ok(result)
}
