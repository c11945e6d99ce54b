//! Backslash escape protection.
//!
//! Every `\<char>` is swapped for an opaque placeholder before any markup
//! pattern runs, and any match that touches a placeholder is left as-is. The
//! placeholders are bracketed by Private Use Area code points, which no
//! markup pattern matches and no `\w` class includes. Those two code points
//! are dropped from the input so a line can never forge a placeholder.

use fancy_regex::{Captures, Regex};
use std::ops::Range;

/// Opens a placeholder token.
const TOKEN_OPEN: char = '\u{E000}';
/// Closes a placeholder token.
const TOKEN_CLOSE: char = '\u{E001}';

/// Call-scoped arena of placeholder tokens and the characters they stand for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscapeMap {
    entries: Vec<(String, char)>,
}

impl EscapeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Replaces each `\<char>` in `text` with a fresh placeholder.
    ///
    /// A trailing lone backslash has nothing to escape and stays literal.
    pub fn protect(&mut self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut chars = text.chars().filter(|c| !is_token_bracket(*c));

        while let Some(c) = chars.next() {
            if c != '\\' {
                result.push(c);
                continue;
            }
            match chars.next() {
                Some(escaped) => {
                    let token = format!("{}{}{}", TOKEN_OPEN, self.entries.len(), TOKEN_CLOSE);
                    result.push_str(&token);
                    self.entries.push((token, escaped));
                }
                None => result.push('\\'),
            }
        }

        result
    }

    /// Puts the escaped characters back, without their backslashes.
    pub fn restore(&self, text: &str) -> String {
        if self.is_empty() || !text.contains(TOKEN_OPEN) {
            return text.to_string();
        }

        let mut result = text.to_string();
        for (token, original) in &self.entries {
            result = result.replace(token.as_str(), &original.to_string());
        }
        result
    }

    /// Byte ranges of every placeholder still present in `text`.
    pub fn placeholder_spans(&self, text: &str) -> Vec<Range<usize>> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut spans = Vec::new();
        let mut start = None;
        for (i, c) in text.char_indices() {
            match c {
                TOKEN_OPEN => start = Some(i),
                TOKEN_CLOSE => {
                    if let Some(s) = start.take() {
                        spans.push(s..i + c.len_utf8());
                    }
                }
                _ => {}
            }
        }
        spans
    }
}

fn is_token_bracket(c: char) -> bool {
    c == TOKEN_OPEN || c == TOKEN_CLOSE
}

/// Returns true if any placeholder overlaps the matched span.
pub fn span_escaped(guarded: &[Range<usize>], span: Range<usize>) -> bool {
    guarded
        .iter()
        .any(|token| token.start < span.end && span.start < token.end)
}

/// Rewrites every match of `re` in `text`, except matches that overlap a
/// placeholder.
///
/// A regex runtime error (backtrack limit) stops rewriting and keeps the rest
/// of the text as-is.
pub fn replace_unescaped<F>(re: &Regex, text: &str, escapes: &EscapeMap, mut rewrite: F) -> String
where
    F: FnMut(&Captures) -> String,
{
    let guarded = escapes.placeholder_spans(text);
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for caps in re.captures_iter(text) {
        let caps = match caps {
            Ok(caps) => caps,
            Err(err) => {
                log::warn!("pattern {} failed, leaving text as-is: {}", re.as_str(), err);
                break;
            }
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };
        result.push_str(&text[last..whole.start()]);
        if span_escaped(&guarded, whole.start()..whole.end()) {
            result.push_str(whole.as_str());
        } else {
            result.push_str(&rewrite(&caps));
        }
        last = whole.end();
    }

    result.push_str(&text[last..]);
    result
}

/// Returns the `body` group of a match, or an empty string.
pub fn body<'t>(caps: &Captures<'t>) -> &'t str {
    caps.name("body").map(|m| m.as_str()).unwrap_or("")
}
