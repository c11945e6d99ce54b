//! Obsidian (`%%…%%`) and HTML (`<!--…-->`) comment removal.

use super::escape::{body, replace_unescaped, EscapeMap};
use crate::settings::CommentMode;
use fancy_regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_MARKDOWN_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%(?P<body>.*?)%%").expect("RE_MARKDOWN_COMMENT regex is valid"));

static RE_HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--(?P<body>.*?)-->").expect("RE_HTML_COMMENT regex is valid"));

/// Removes or unwraps comment spans. Unterminated markers are left alone.
pub fn strip_comments(text: &str, escapes: &EscapeMap, mode: CommentMode) -> String {
    let result = replace_unescaped(&RE_MARKDOWN_COMMENT, text, escapes, |caps| {
        rewrite(caps, mode)
    });
    replace_unescaped(&RE_HTML_COMMENT, &result, escapes, |caps| rewrite(caps, mode))
}

fn rewrite(caps: &Captures, mode: CommentMode) -> String {
    match mode {
        CommentMode::Omit => String::new(),
        CommentMode::Unwrap => body(caps).to_string(),
    }
}
