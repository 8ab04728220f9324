//! gamebase pipeline.
//!
//! Fetches the source disc image, extracts every zipped game, names each one
//! from its `.nfo` metadata and lays the collection out in size-capped
//! bucket directories.

pub mod convert;
pub mod download;
pub mod error;
pub mod extract;
pub mod placement;
pub mod progress;
pub mod resolver;
pub mod settings;

pub use convert::{ConvertSummary, convert};
pub use error::ConvertError;
pub use progress::ConvertProgress;
pub use settings::Settings;
