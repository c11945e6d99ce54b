//! Markup stripping.
//!
//! Steps run in a fixed order; later steps rely on earlier ones:
//!
//! 1. HTML tags, code fences and math blocks (may wrap everything else)
//! 2. Inline code and inline math
//! 3. Footnotes
//! 4. Line-start markers: callouts, blockquotes, rules, tasks, lists, tables
//! 5. Embeds (`![[x]]` keeps the link for the resolver)
//! 6. Emphasis (bold before italic), repeated until nothing changes
//! 7. Heading prefix, gated on the original line's classification
//!
//! Only matched pairs are touched; a lone delimiter stays literal text.

use super::escape::{body, replace_unescaped, EscapeMap};
use super::heading;
use super::LineState;
use crate::settings::MarkupOptions;
use fancy_regex::{Captures, Regex};
use std::sync::LazyLock;

/// One ordered stripping step.
struct Step {
    name: &'static str,
    enabled: fn(&MarkupOptions) -> bool,
    apply: fn(&str, &EscapeMap) -> String,
}

const STEPS: &[Step] = &[
    Step {
        name: "html_tags",
        enabled: |m| m.html_tags,
        apply: strip_html_tags,
    },
    Step {
        name: "code_blocks",
        enabled: |m| m.code_blocks,
        apply: strip_code_fence,
    },
    Step {
        name: "math_blocks",
        enabled: |m| m.math_blocks,
        apply: strip_math_blocks,
    },
    Step {
        name: "inline_code",
        enabled: |m| m.inline_code,
        apply: strip_inline_code,
    },
    Step {
        name: "inline_math",
        enabled: |m| m.inline_math,
        apply: strip_inline_math,
    },
    Step {
        name: "footnotes",
        enabled: |m| m.footnotes,
        apply: strip_footnotes,
    },
    Step {
        name: "callouts",
        enabled: |m| m.callouts,
        apply: strip_callout,
    },
    Step {
        name: "blockquotes",
        enabled: |m| m.blockquotes,
        apply: strip_blockquote,
    },
    Step {
        name: "horizontal_rules",
        enabled: |m| m.horizontal_rules,
        apply: strip_horizontal_rule,
    },
    Step {
        name: "task_checkboxes",
        enabled: |m| m.task_checkboxes,
        apply: strip_task_checkbox,
    },
    Step {
        name: "lists",
        enabled: |m| m.lists,
        apply: strip_list_marker,
    },
    Step {
        name: "tables",
        enabled: |m| m.tables,
        apply: strip_table_row,
    },
    Step {
        name: "wikilink_embeds",
        enabled: |m| m.wikilinks,
        apply: unwrap_wikilink_embeds,
    },
    Step {
        name: "image_embeds",
        enabled: |m| m.markdown_links,
        apply: unwrap_image_embeds,
    },
];

/// Emphasis patterns in application order. Bold runs before italic so the
/// single-delimiter patterns never see half of a double delimiter.
static EMPHASIS: &[(fn(&MarkupOptions) -> bool, &LazyLock<Regex>)] = &[
    (|m| m.bold, &RE_BOLD_STAR),
    (|m| m.bold, &RE_BOLD_UNDERSCORE),
    (|m| m.italic, &RE_ITALIC_STAR),
    (|m| m.italic, &RE_ITALIC_UNDERSCORE),
    (|m| m.strikethrough, &RE_STRIKETHROUGH),
    (|m| m.highlight, &RE_HIGHLIGHT),
];

// ============================================================================
// Patterns
// ============================================================================

static RE_HTML_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?P<tag>[A-Za-z][A-Za-z0-9-]*)\b[^>]*>(?P<body>.*?)</(?P=tag)\s*>")
        .expect("RE_HTML_PAIR regex is valid")
});

static RE_HTML_SELF_CLOSING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[A-Za-z][A-Za-z0-9-]*\b[^>]*/>").expect("RE_HTML_SELF_CLOSING regex is valid")
});

static RE_CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:`{3,}|~{3,})[^`~]*$").expect("RE_CODE_FENCE regex is valid")
});

static RE_MATH_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$(?P<body>.+?)\$\$").expect("RE_MATH_BLOCK regex is valid")
});

static RE_MATH_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\$\s*$").expect("RE_MATH_FENCE regex is valid"));

static RE_INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?<!`)(?P<ticks>`+)(?!`)(?P<body>.+?)(?<!`)(?P=ticks)(?!`)")
        .expect("RE_INLINE_CODE regex is valid")
});

static RE_INLINE_MATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?<!\$)\$(?=[^\s$])(?P<body>[^$]*?[^\s$])\$(?![$\d])")
        .expect("RE_INLINE_MATH regex is valid")
});

static RE_FOOTNOTE_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\^[^\]]+\]:\s*").expect("RE_FOOTNOTE_DEFINITION regex is valid")
});

static RE_FOOTNOTE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\^[^\]]+\]").expect("RE_FOOTNOTE_REF regex is valid"));

static RE_INLINE_FOOTNOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^\[[^\]]*\]").expect("RE_INLINE_FOOTNOTE regex is valid"));

static RE_CALLOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^>\s*\[![^\]]+\][+-]?\s*").expect("RE_CALLOUT regex is valid")
});

static RE_BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:>\s*)+").expect("RE_BLOCKQUOTE regex is valid"));

static RE_HORIZONTAL_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<mark>[-*_])\s*(?:(?P=mark)\s*){2,}$")
        .expect("RE_HORIZONTAL_RULE regex is valid")
});

static RE_TASK_CHECKBOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+\[[ xX/-]\]\s+").expect("RE_TASK_CHECKBOX regex is valid")
});

static RE_LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+").expect("RE_LIST_MARKER regex is valid")
});

static RE_TABLE_DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\|\s*:?-+:?\s*(?:\|\s*:?-+:?\s*)*\|?\s*$")
        .expect("RE_TABLE_DELIMITER regex is valid")
});

static RE_TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\|(?P<body>.*)\|\s*$").expect("RE_TABLE_ROW regex is valid")
});

static RE_WIKILINK_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[\[(?P<body>[^\]]*?)\]\]").expect("RE_WIKILINK_EMBED regex is valid")
});

static RE_IMAGE_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[(?P<body>[^\]]+)\]\([^)]*\)").expect("RE_IMAGE_EMBED regex is valid")
});

static RE_BOLD_STAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(?P<body>.+?)\*\*(?!\*)").expect("RE_BOLD_STAR regex is valid")
});

static RE_BOLD_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__(?P<body>.+?)__(?!_)").expect("RE_BOLD_UNDERSCORE regex is valid"));

static RE_ITALIC_STAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?<!\*)\*(?![\s*])(?P<body>.+?)(?<![\s*])\*(?!\*)")
        .expect("RE_ITALIC_STAR regex is valid")
});

static RE_ITALIC_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?<![\w])_(?![\s_])(?P<body>.+?)(?<![\s_])_(?![\w])")
        .expect("RE_ITALIC_UNDERSCORE regex is valid")
});

static RE_STRIKETHROUGH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~(?P<body>.+?)~~").expect("RE_STRIKETHROUGH regex is valid"));

static RE_HIGHLIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"==(?P<body>.+?)==").expect("RE_HIGHLIGHT regex is valid"));

// ============================================================================
// Steps
// ============================================================================

fn keep_body(caps: &Captures) -> String {
    body(caps).to_string()
}

fn remove(_caps: &Captures) -> String {
    String::new()
}

/// Applies `step` until the text stops changing.
///
/// Every successful rewrite removes delimiters, so the text shrinks and the
/// loop ends.
fn until_stable(text: &str, mut step: impl FnMut(&str) -> String) -> String {
    let mut current = text.to_string();
    loop {
        let next = step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// `<b><i>x</i></b>` unwraps to `x`; self-closing tags vanish.
pub fn strip_html_tags(text: &str, escapes: &EscapeMap) -> String {
    let unwrapped = until_stable(text, |t| {
        replace_unescaped(&RE_HTML_PAIR, t, escapes, keep_body)
    });
    replace_unescaped(&RE_HTML_SELF_CLOSING, &unwrapped, escapes, remove)
}

/// An opening fence line carries no title.
pub fn strip_code_fence(text: &str, escapes: &EscapeMap) -> String {
    replace_unescaped(&RE_CODE_FENCE, text, escapes, remove)
}

pub fn strip_math_blocks(text: &str, escapes: &EscapeMap) -> String {
    let result = replace_unescaped(&RE_MATH_BLOCK, text, escapes, keep_body);
    replace_unescaped(&RE_MATH_FENCE, &result, escapes, remove)
}

/// Backtick runs pair only with a run of the same length.
pub fn strip_inline_code(text: &str, escapes: &EscapeMap) -> String {
    replace_unescaped(&RE_INLINE_CODE, text, escapes, keep_body)
}

/// `$x$` unwraps; `$5 and $10` stays (no space inside, no digit after).
pub fn strip_inline_math(text: &str, escapes: &EscapeMap) -> String {
    replace_unescaped(&RE_INLINE_MATH, text, escapes, keep_body)
}

pub fn strip_footnotes(text: &str, escapes: &EscapeMap) -> String {
    let result = replace_unescaped(&RE_FOOTNOTE_DEFINITION, text, escapes, remove);
    let result = replace_unescaped(&RE_FOOTNOTE_REF, &result, escapes, remove);
    replace_unescaped(&RE_INLINE_FOOTNOTE, &result, escapes, remove)
}

/// `> [!note]- Title` keeps `Title`.
pub fn strip_callout(text: &str, escapes: &EscapeMap) -> String {
    replace_unescaped(&RE_CALLOUT, text, escapes, remove)
}

pub fn strip_blockquote(text: &str, escapes: &EscapeMap) -> String {
    replace_unescaped(&RE_BLOCKQUOTE, text, escapes, remove)
}

pub fn strip_horizontal_rule(text: &str, escapes: &EscapeMap) -> String {
    replace_unescaped(&RE_HORIZONTAL_RULE, text, escapes, remove)
}

pub fn strip_task_checkbox(text: &str, escapes: &EscapeMap) -> String {
    replace_unescaped(&RE_TASK_CHECKBOX, text, escapes, remove)
}

pub fn strip_list_marker(text: &str, escapes: &EscapeMap) -> String {
    replace_unescaped(&RE_LIST_MARKER, text, escapes, remove)
}

/// `| a | b |` becomes `a b`; a delimiter row becomes empty.
pub fn strip_table_row(text: &str, escapes: &EscapeMap) -> String {
    let result = replace_unescaped(&RE_TABLE_DELIMITER, text, escapes, remove);
    replace_unescaped(&RE_TABLE_ROW, &result, escapes, |caps| {
        body(caps)
            .split('|')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// `![[x]]` becomes `[[x]]`, resolved later with the other wikilinks.
pub fn unwrap_wikilink_embeds(text: &str, escapes: &EscapeMap) -> String {
    replace_unescaped(&RE_WIKILINK_EMBED, text, escapes, |caps| {
        format!("[[{}]]", body(caps))
    })
}

/// `![caption](url)` becomes `caption`. Empty captions are left for the
/// empty-link check.
pub fn unwrap_image_embeds(text: &str, escapes: &EscapeMap) -> String {
    replace_unescaped(&RE_IMAGE_EMBED, text, escapes, keep_body)
}

/// Unwraps bold, italic, strikethrough and highlight, nesting included.
pub fn strip_emphasis(text: &str, escapes: &EscapeMap, markup: &MarkupOptions) -> String {
    until_stable(text, |t| {
        EMPHASIS
            .iter()
            .filter(|(enabled, _)| enabled(markup))
            .fold(t.to_string(), |acc, (_, re)| {
                replace_unescaped(re, &acc, escapes, keep_body)
            })
    })
}

/// Runs every enabled step on the working line.
pub fn strip(mut state: LineState, markup: &MarkupOptions) -> LineState {
    for step in STEPS {
        if !(step.enabled)(markup) {
            continue;
        }
        let next = (step.apply)(&state.text, &state.escapes);
        if next != state.text {
            log::trace!("markup step {}: {:?} -> {:?}", step.name, state.text, next);
            state.text = next;
        }
    }

    if markup.any_emphasis() {
        state.text = strip_emphasis(&state.text, &state.escapes, markup);
    }

    if state.is_heading && markup.headings {
        if let Some(rest) = heading::strip_prefix(&state.text) {
            state.text = rest.to_string();
        }
    }

    state
}
