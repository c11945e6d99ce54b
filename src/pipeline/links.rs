//! Wikilink and markdown link resolution.

use super::escape::{body, replace_unescaped, EscapeMap};
use fancy_regex::Regex;
use std::sync::LazyLock;

static RE_EMPTY_LINKS_ONLY: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^\s*(?:!?\[\]\([^)]*\)\s*)+$").expect("RE_EMPTY_LINKS_ONLY regex is valid")
});

static RE_MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?P<body>[^\]]+)\]\([^)]*\)").expect("RE_MARKDOWN_LINK regex is valid")
});

static RE_EMPTY_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[\]\([^)]*\)").expect("RE_EMPTY_LINK regex is valid"));

/// Replaces each `[[target|alias]]` with its display text.
///
/// Pairs are found left to right, each `[[` with the nearest `]]` after it.
/// An unterminated `[[` ends the scan and stays literal.
pub fn resolve_wikilinks(text: &str) -> String {
    let mut result = text.to_string();
    let mut from = 0;

    while let Some(open) = result[from..].find("[[").map(|i| from + i) {
        let Some(close) = result[open + 2..].find("]]").map(|i| open + 2 + i) else {
            break;
        };
        let inner = &result[open + 2..close];
        let display = match inner.rfind('|') {
            Some(pipe) => inner[pipe + 1..].to_string(),
            None => inner.to_string(),
        };
        result.replace_range(open..close + 2, &display);
        from = open + display.len();
    }

    result
}

/// Returns true if the line holds nothing but empty links like `[](url)`.
pub fn is_only_empty_links(text: &str) -> bool {
    RE_EMPTY_LINKS_ONLY.is_match(text)
}

/// `[caption](url)` keeps `caption`; leftover `[](url)` disappears.
pub fn resolve_markdown_links(text: &str, escapes: &EscapeMap) -> String {
    let result = replace_unescaped(&RE_MARKDOWN_LINK, text, escapes, |caps| {
        body(caps).to_string()
    });
    let result = replace_unescaped(&RE_EMPTY_LINK, &result, escapes, |_| String::new());
    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        for re in [&RE_MARKDOWN_LINK, &RE_EMPTY_LINK] {
            assert!(re.is_match("").is_ok(), "{}", re.as_str());
        }
        assert!(!RE_EMPTY_LINKS_ONLY.is_match(""));
    }

    #[test]
    fn test_escaped_brackets_keep_link_literal() {
        let mut escapes = EscapeMap::new();
        let protected = escapes.protect(r"[link \[1\]](url)");
        let result = resolve_markdown_links(&protected, &escapes);
        assert_eq!(escapes.restore(&result), "[link [1]](url)");
    }

    #[test]
    fn test_wikilink_plain() {
        assert_eq!(resolve_wikilinks("[[My Note]]"), "My Note");
    }

    #[test]
    fn test_wikilink_alias() {
        assert_eq!(resolve_wikilinks("[[My Note|Alias]]"), "Alias");
        assert_eq!(resolve_wikilinks("[[a|b|c]]"), "c");
    }

    #[test]
    fn test_wikilink_chain() {
        assert_eq!(resolve_wikilinks("See [[A]] and [[B|b]]"), "See A and b");
    }

    #[test]
    fn test_wikilink_unterminated() {
        assert_eq!(resolve_wikilinks("[[open and [[done]]"), "open and [[done");
        assert_eq!(resolve_wikilinks("[[never closed"), "[[never closed");
    }

    #[test]
    fn test_wikilink_display_not_rescanned() {
        // Resolved text that itself looks like a link is not resolved again.
        assert_eq!(resolve_wikilinks("[[x|[[y]]"), "[[y");
    }

    #[test]
    fn test_empty_links_only() {
        assert!(is_only_empty_links("[](url)"));
        assert!(is_only_empty_links("![](a.png) [](b)"));
        assert!(!is_only_empty_links("[](url) text"));
        assert!(!is_only_empty_links("[x](url)"));
    }

    #[test]
    fn test_markdown_links() {
        let escapes = EscapeMap::new();
        assert_eq!(resolve_markdown_links("[link](url)", &escapes), "link");
        assert_eq!(
            resolve_markdown_links("Read [the docs](https://x.y) first", &escapes),
            "Read the docs first"
        );
        assert_eq!(resolve_markdown_links("Title [](url)", &escapes), "Title");
    }
}
