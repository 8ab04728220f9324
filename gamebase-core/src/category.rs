//! Top-level category keys derived from the first character of a name.

use std::fmt;

use crate::record::GameRecord;

/// Category key of the digit bucket.
pub const DIGITS_KEY: &str = "0-9";

/// Category key of the catch-all bucket.
pub const OTHER_KEY: &str = "Other";

/// Top-level bucket a game belongs to.
///
/// Ordered digits first, then letters A-Z, then `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Names starting with `0`..`9`.
    Digits,
    /// Names starting with a letter; holds the upper-cased letter.
    Letter(char),
    /// Everything else.
    Other,
}

impl Category {
    /// Directory name of the category.
    pub fn key(&self) -> String {
        match self {
            Self::Digits => DIGITS_KEY.to_string(),
            Self::Letter(c) => c.to_string(),
            Self::Other => OTHER_KEY.to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Category of a bare name. An empty name falls into [`Category::Other`].
pub fn categorize_name(name: &str) -> Category {
    match name.chars().next() {
        Some(c) if c.is_ascii_digit() => Category::Digits,
        Some(c) if c.is_alphabetic() => Category::Letter(c.to_uppercase().next().unwrap_or(c)),
        _ => Category::Other,
    }
}

/// Category of a game record.
pub fn categorize(game: &GameRecord) -> Category {
    categorize_name(game.name())
}

#[cfg(test)]
#[path = "tests/category_tests.rs"]
mod tests;
