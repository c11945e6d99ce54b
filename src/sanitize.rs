//! Filename sanitization.
//!
//! Turns an extracted title into a string that is safe to use as a note
//! filename on the configured platform:
//!
//! 1. Forbidden characters are replaced (when configured) or dropped
//! 2. Leading dots are removed so the note never becomes a hidden file
//! 3. Unicode NFC normalization; control characters removed
//! 4. Whitespace runs collapse to a single space
//! 5. Truncation to `max_title_chars` characters
//!
//! An empty result becomes `Untitled`.

use crate::pipeline::UNTITLED;
use crate::settings::{ForbiddenChar, Settings};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static RE_WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("RE_WHITESPACE_RUN regex is valid"));

/// Sanitizes a title for use as a filename.
///
/// # Example
///
/// ```
/// use firstline::{sanitize_filename, Settings};
///
/// let settings = Settings::default();
/// assert_eq!(sanitize_filename("Q1: plans / ideas", &settings), "Q1 plans ideas");
/// assert_eq!(sanitize_filename("///", &settings), "Untitled");
/// ```
pub fn sanitize_filename(title: &str, settings: &Settings) -> String {
    if title == UNTITLED {
        return title.to_string();
    }

    let replaced = replace_forbidden(title, settings);
    let visible = replaced.trim_start_matches(|c: char| c == '.' || c.is_whitespace());

    let normalized: String = visible
        .nfc()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    let collapsed = RE_WHITESPACE_RUN.replace_all(&normalized, " ");

    let truncated = truncate_chars(collapsed.trim(), settings.max_title_chars).trim();
    if truncated.is_empty() {
        log::debug!("title {:?} sanitized to nothing, using {}", title, UNTITLED);
        return UNTITLED.to_string();
    }
    truncated.to_string()
}

/// Replaces or drops every character forbidden under the active OS preset.
fn replace_forbidden(title: &str, settings: &Settings) -> String {
    let mut result = String::with_capacity(title.len());
    let mut chars = title.chars().peekable();

    while let Some(c) = chars.next() {
        let Some(forbidden) = ForbiddenChar::from_char(c).filter(|f| settings.forbids(*f)) else {
            result.push(c);
            continue;
        };

        let Some(entry) = settings.active_replacement(forbidden) else {
            continue;
        };
        if entry.trim_left {
            let kept = result.trim_end().len();
            result.truncate(kept);
        }
        result.push_str(&entry.replacement);
        if entry.trim_right {
            while chars.next_if(|next| next.is_whitespace()).is_some() {}
        }
    }

    result
}

/// Returns at most `max` characters of `text`, never splitting a code point.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
