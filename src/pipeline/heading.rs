//! Heading classification of the untouched first line.

use regex::Regex;
use std::sync::LazyLock;

static RE_EMPTY_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s*$").expect("RE_EMPTY_HEADING regex is valid"));

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s").expect("RE_HEADING regex is valid"));

/// What the first line looks like before any processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    /// Not a heading (includes 7+ leading `#`).
    None,
    /// `#` to `######`, whitespace, then content.
    Valid,
    /// Heading markers with nothing after them.
    Empty,
}

/// Classifies the original, untrimmed line.
pub fn classify(line: &str) -> HeadingKind {
    if RE_EMPTY_HEADING.is_match(line) {
        HeadingKind::Empty
    } else if RE_HEADING.is_match(line) {
        HeadingKind::Valid
    } else {
        HeadingKind::None
    }
}

/// Removes a `#`..`######` prefix followed by whitespace, if present.
pub fn strip_prefix(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}
