//! Game records and the name-keyed collection they are gathered into.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One extracted game: its unique display name and the folder it was
/// extracted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    name: String,
    source_folder: PathBuf,
}

impl GameRecord {
    pub fn new(name: impl Into<String>, source_folder: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_folder: source_folder.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_folder(&self) -> &Path {
        &self.source_folder
    }
}

/// Return `candidate`, or the first of `candidate_2`, `candidate_3`, ... that
/// is not yet a key of `collection`.
pub fn unique_name(candidate: &str, collection: &Collection) -> String {
    if !collection.contains(candidate) {
        return candidate.to_string();
    }
    (2u64..)
        .map(|index| format!("{candidate}_{index}"))
        .find(|name| !collection.contains(name))
        .unwrap_or_else(|| candidate.to_string())
}

/// All games of a run, keyed by their unique name.
///
/// The collection is passed by value between pipeline stages; adding a game
/// consumes it and hands back the extended collection.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    games: BTreeMap<String, GameRecord>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a game under `candidate`, suffixing the name if it is already taken.
    ///
    /// Returns the extended collection and the name the game was stored under.
    pub fn with_game(
        mut self,
        candidate: &str,
        source_folder: impl Into<PathBuf>,
    ) -> (Self, String) {
        let name = unique_name(candidate, &self);
        self.games
            .insert(name.clone(), GameRecord::new(name.clone(), source_folder));
        (self, name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.games.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&GameRecord> {
        self.games.get(name)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Records in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.games.values()
    }

    pub fn into_records(self) -> Vec<GameRecord> {
        self.games.into_values().collect()
    }
}

impl FromIterator<(String, PathBuf)> for Collection {
    fn from_iter<T: IntoIterator<Item = (String, PathBuf)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |collection, (candidate, folder)| {
                collection.with_game(&candidate, folder).0
            })
    }
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
