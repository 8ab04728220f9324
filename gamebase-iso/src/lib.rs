//! Read-only access to ISO 9660 disc images.
//!
//! Only what the gamebase pipeline needs: open an image, list a directory,
//! read a file into memory. Both plain 2048-byte/sector images and raw
//! 2352-byte/sector Mode 2 Form 1 dumps are understood.

pub mod error;
pub mod image;
pub mod sector;

pub use error::IsoError;
pub use image::{DirEntry, IsoImage, list_game_archives};
pub use sector::SectorFormat;
