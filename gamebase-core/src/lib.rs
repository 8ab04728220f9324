//! Core naming and bucketing rules for gamebase.
//!
//! Pure functions only: resolving display names from metadata text, keeping
//! names unique, assigning categories and planning the bucket layout.

pub mod bucket;
pub mod category;
pub mod name;
pub mod record;

pub use bucket::{Bucket, BucketPath, MAX_BUCKET_SIZE, plan_buckets};
pub use category::{Category, categorize};
pub use name::{MAX_NAME_LENGTH, resolve_name};
pub use record::{Collection, GameRecord, unique_name};
