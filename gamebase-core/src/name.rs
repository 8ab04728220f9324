//! Display-name derivation from `.nfo` metadata text.
//!
//! Everything here works on text that has already been read from disk; the
//! folder scanning side lives in `gamebase-lib`.

/// Characters allowed to survive into a game name. Anything else is dropped.
pub const ALLOWED_CHARS: &str = "QWERTYUIOPASDFGHJKLZXCVBNM1234567890.,-()[]! ";

/// Characters stripped from the front of a resolved name.
pub const LEADING_STRIP_CHARS: &str = ".,-()[]! ";

/// Maximum length of a resolved name, in characters.
pub const MAX_NAME_LENGTH: usize = 25;

/// Name used when nothing else survives sanitizing.
pub const FALLBACK_NAME: &str = "NO_NAME";

/// Primary metadata field holding the game title.
pub const NAME_FIELD: &str = "Name";

/// Secondary metadata field, used when a file has no usable `Name`.
pub const UNIQUE_ID_FIELD: &str = "Unique-ID";

/// Upper-case `raw`, keep only whitelisted characters and cut it to `max_len`.
pub fn sanitize(raw: &str, max_len: usize) -> String {
    raw.to_uppercase()
        .chars()
        .filter(|c| ALLOWED_CHARS.contains(*c))
        .take(max_len)
        .collect()
}

/// Drop leading punctuation and spaces until the name starts with
/// an alphanumeric character or runs out.
pub fn strip_leading(name: &str) -> &str {
    name.trim_start_matches(|c: char| LEADING_STRIP_CHARS.contains(c))
}

/// Find the value of `header` in a block of metadata lines.
///
/// Only the first line starting with `"<header>:"` is considered. The value is
/// everything after the first colon, trimmed and sanitized. Returns `None`
/// when no line carries the field.
pub fn field_value<'a, I>(header: &str, lines: I, max_len: usize) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = format!("{header}:");
    lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .find(|line| line.starts_with(&prefix))
        .map(|line| {
            let value = line.split_once(':').map_or("", |(_, rest)| rest);
            sanitize(value.trim(), max_len)
        })
}

/// Split metadata text on `\n`, `\r\n` and lone `\r` line endings.
pub fn metadata_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n'])
}

/// Look up the title of a single metadata file: `Name` first, then `Unique-ID`.
///
/// A field that is present but sanitizes to nothing counts as missing.
pub fn metadata_name(text: &str, max_len: usize) -> Option<String> {
    [NAME_FIELD, UNIQUE_ID_FIELD]
        .iter()
        .filter_map(|header| field_value(header, metadata_lines(text), max_len))
        .find(|value| !value.is_empty())
}

/// Resolve the display name of a game.
///
/// `metadata` yields the contents of each candidate metadata file in scan
/// order; the first one that produces a name wins. Otherwise `folder_name` is
/// sanitized and used. Leading punctuation is then stripped, and an empty
/// result becomes [`FALLBACK_NAME`].
pub fn resolve_name<I, S>(metadata: I, folder_name: &str, max_len: usize) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let raw = metadata
        .into_iter()
        .find_map(|text| metadata_name(text.as_ref(), max_len))
        .unwrap_or_else(|| sanitize(folder_name, max_len));

    let stripped = strip_leading(&raw);
    if stripped.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
#[path = "tests/name_tests.rs"]
mod tests;
