//! Bucket planning: turning the whole collection into capacity-bounded,
//! alphabetically contiguous directories.
//!
//! Planning is pure. It consumes a [`Collection`] and returns the list of
//! [`Bucket`]s to materialize; nothing touches the filesystem here.
//!
//! Size capping slices a sorted bucket into runs of `max_bucket_size + 1`
//! records, so with the default of 255 every directory holds at most 256
//! games. Overflow slices get ` (2)`, ` (3)`, ... appended to the last path
//! segment.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::category::{Category, categorize};
use crate::record::{Collection, GameRecord};

/// Default bucket capacity bound.
pub const MAX_BUCKET_SIZE: usize = 255;

/// Number of leading characters forming a sub-category key.
pub const SUB_CATEGORY_LEN: usize = 2;

/// Relative destination of a bucket, as path segments under the output root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketPath {
    segments: Vec<String>,
}

impl BucketPath {
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
        }
    }

    /// Append a nested segment.
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// The same path with ` (<index>)` appended to its last segment.
    pub fn overflow(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            last.push_str(&format!(" ({index})"));
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolve against the output root directory.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.segments
            .iter()
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl fmt::Display for BucketPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Games destined for one directory, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub path: BucketPath,
    pub games: Vec<GameRecord>,
}

impl Bucket {
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Names of the games in this bucket, in placement order.
    pub fn names(&self) -> Vec<&str> {
        self.games.iter().map(GameRecord::name).collect()
    }
}

/// The first `len` characters of a name.
pub fn name_prefix(name: &str, len: usize) -> String {
    name.chars().take(len).collect()
}

/// Group records by `key`, with groups in ascending key order.
pub fn group_by<K, F>(
    games: impl IntoIterator<Item = GameRecord>,
    key: F,
) -> BTreeMap<K, Vec<GameRecord>>
where
    K: Ord,
    F: Fn(&GameRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<GameRecord>> = BTreeMap::new();
    for game in games {
        groups.entry(key(&game)).or_default().push(game);
    }
    groups
}

/// Sort `games` by name and slice them into buckets of at most
/// `max_bucket_size + 1` records: `path`, `path (2)`, `path (3)`, ...
///
/// An empty input produces no buckets.
pub fn cap_bucket(
    path: &BucketPath,
    mut games: Vec<GameRecord>,
    max_bucket_size: usize,
) -> Vec<Bucket> {
    games.sort_by(|a, b| a.name().cmp(b.name()));

    let slice_len = max_bucket_size + 1;
    let mut buckets = Vec::with_capacity(games.len().div_ceil(slice_len));
    let mut rest = games;
    let mut index = 1;
    while !rest.is_empty() {
        let tail = rest.split_off(slice_len.min(rest.len()));
        let bucket_path = if index == 1 {
            path.clone()
        } else {
            path.overflow(index)
        };
        buckets.push(Bucket {
            path: bucket_path,
            games: rest,
        });
        rest = tail;
        index += 1;
    }
    buckets
}

/// Greedily pack key-ordered groups into running buckets under `parent`.
///
/// The first running bucket is labelled `first_label`; every later one is
/// labelled with the key of the group that opened it. A group is never split
/// across two running buckets, so a single large group can overflow; each
/// running bucket still goes through [`cap_bucket`].
pub fn pack_groups(
    parent: &BucketPath,
    first_label: &str,
    groups: BTreeMap<String, Vec<GameRecord>>,
    max_bucket_size: usize,
) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut running: Vec<GameRecord> = Vec::new();
    let mut label = first_label.to_string();

    for (key, group) in groups {
        if !running.is_empty() && running.len() + group.len() > max_bucket_size {
            let full = std::mem::take(&mut running);
            buckets.extend(cap_bucket(&parent.join(&label), full, max_bucket_size));
            label = key;
        }
        running.extend(group);
    }
    if !running.is_empty() {
        buckets.extend(cap_bucket(&parent.join(&label), running, max_bucket_size));
    }
    buckets
}

/// Emit `games` as a single capped bucket at `path` if they fit, otherwise
/// regroup them by `key` and pack the groups underneath `path`.
pub fn split_if_over_capacity<F>(
    path: &BucketPath,
    label: &str,
    games: Vec<GameRecord>,
    key: F,
    max_bucket_size: usize,
) -> Vec<Bucket>
where
    F: Fn(&GameRecord) -> String,
{
    if games.len() <= max_bucket_size {
        return cap_bucket(path, games, max_bucket_size);
    }
    pack_groups(path, label, group_by(games, key), max_bucket_size)
}

/// Buckets for one top-level category.
///
/// - `0-9` is split per leading digit into `0-9/0` .. `0-9/9`.
/// - `Other` is one capped bucket.
/// - A letter stays flat while it fits and is otherwise packed by
///   two-character prefix.
pub fn split_category(
    category: Category,
    games: Vec<GameRecord>,
    max_bucket_size: usize,
) -> Vec<Bucket> {
    let path = BucketPath::new(category.key());
    match category {
        Category::Digits => split_digits(&path, games, max_bucket_size),
        Category::Other => cap_bucket(&path, games, max_bucket_size),
        Category::Letter(_) => split_if_over_capacity(
            &path,
            &category.key(),
            games,
            |game| name_prefix(game.name(), SUB_CATEGORY_LEN),
            max_bucket_size,
        ),
    }
}

/// Ten sub-buckets `<path>/0` .. `<path>/9`, each capped on its own. A digit
/// without games still gets its (empty) directory.
fn split_digits(
    path: &BucketPath,
    games: Vec<GameRecord>,
    max_bucket_size: usize,
) -> Vec<Bucket> {
    let mut groups = group_by(games, |game| name_prefix(game.name(), 1));
    ('0'..='9')
        .flat_map(|digit| {
            let digit_path = path.join(digit);
            match groups.remove(&digit.to_string()) {
                Some(group) => cap_bucket(&digit_path, group, max_bucket_size),
                None => vec![Bucket {
                    path: digit_path,
                    games: Vec::new(),
                }],
            }
        })
        .collect()
}

/// Plan every bucket for a collection, categories in key order.
pub fn plan_buckets(collection: Collection, max_bucket_size: usize) -> Vec<Bucket> {
    group_by(collection.into_records(), categorize)
        .into_iter()
        .flat_map(|(category, games)| split_category(category, games, max_bucket_size))
        .collect()
}

#[cfg(test)]
#[path = "tests/bucket_tests.rs"]
mod tests;
