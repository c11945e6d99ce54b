//! # Title Pipeline
//!
//! Turns the raw first line of a note into a title. The result is not yet a
//! safe filename; [`crate::sanitize`] handles forbidden characters.
//!
//! ## Stages
//!
//! 1. **Heading check** - an empty heading (`# `) is `Untitled` right away
//! 2. **Escape protection** - `\*` and friends become opaque placeholders
//! 3. **Comments** - `%%…%%` and `<!--…-->`
//! 4. **Markup** - emphasis, HTML, lists, quotes, code, math, heading prefix
//! 5. **Custom rules** - user search/replace, may collapse to `Untitled`
//! 6. **Links** - wikilinks and markdown links; a line of empty links is `Untitled`
//! 7. **Escape restore** - placeholders back to literal characters
//! 8. **Finalize** - trim, empty becomes `Untitled`
//!
//! The pipeline is a pure function of the line and the settings.

pub mod comments;
pub mod escape;
pub mod heading;
pub mod links;
pub mod markup;
pub mod rules;

use crate::settings::Settings;
pub use escape::EscapeMap;
pub use heading::HeadingKind;
use std::ops::ControlFlow;

/// Title used when a line holds nothing usable.
pub const UNTITLED: &str = "Untitled";

/// Working state threaded through the stages of one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineState {
    /// Current text of the line.
    pub text: String,
    /// Placeholders created by escape protection.
    pub escapes: EscapeMap,
    /// Whether the original line was a valid heading.
    pub is_heading: bool,
}

impl LineState {
    pub fn new(text: impl Into<String>, is_heading: bool) -> Self {
        Self {
            text: text.into(),
            escapes: EscapeMap::new(),
            is_heading,
        }
    }
}

/// Outcome of one stage: keep going, or stop with a final title.
pub type StageResult = ControlFlow<String, LineState>;

/// A pipeline stage.
pub type Stage = fn(LineState, &Settings) -> StageResult;

/// Stages in execution order.
pub const STAGES: &[(&str, Stage)] = &[
    ("escape", protect_escapes),
    ("comments", strip_comments),
    ("markup", strip_markup),
    ("custom_rules", apply_custom_rules),
    ("links", resolve_links),
    ("restore", restore_escapes),
];

fn protect_escapes(mut state: LineState, settings: &Settings) -> StageResult {
    if !settings.replaces_backslash() {
        state.text = state.escapes.protect(&state.text);
    }
    ControlFlow::Continue(state)
}

fn strip_comments(mut state: LineState, settings: &Settings) -> StageResult {
    if settings.markup.comments {
        state.text = comments::strip_comments(&state.text, &state.escapes, settings.comment_mode);
    }
    ControlFlow::Continue(state)
}

fn strip_markup(state: LineState, settings: &Settings) -> StageResult {
    ControlFlow::Continue(markup::strip(state, &settings.markup))
}

fn apply_custom_rules(state: LineState, settings: &Settings) -> StageResult {
    if !settings.enable_custom_rules {
        return ControlFlow::Continue(state);
    }
    rules::apply_rules(state, &settings.custom_rules)
}

fn resolve_links(mut state: LineState, settings: &Settings) -> StageResult {
    if settings.markup.wikilinks {
        state.text = links::resolve_wikilinks(&state.text);
    }
    if links::is_only_empty_links(&state.text) {
        return ControlFlow::Break(UNTITLED.to_string());
    }
    if settings.markup.markdown_links {
        state.text = links::resolve_markdown_links(&state.text, &state.escapes);
    }
    ControlFlow::Continue(state)
}

fn restore_escapes(mut state: LineState, _settings: &Settings) -> StageResult {
    state.text = state.escapes.restore(&state.text);
    ControlFlow::Continue(state)
}

/// Trims the line; nothing left means `Untitled`.
fn finalize(state: LineState) -> String {
    let title = state.text.trim();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

/// Extracts a title from the raw first line of a note.
///
/// # Example
///
/// ```
/// use firstline::{extract_title, Settings};
///
/// let settings = Settings::default();
/// assert_eq!(extract_title("# **Hello** [[World|you]]", &settings), "Hello you");
/// assert_eq!(extract_title("# ", &settings), "Untitled");
/// ```
pub fn extract_title(line: &str, settings: &Settings) -> String {
    let is_heading = match heading::classify(line) {
        HeadingKind::Empty => {
            log::debug!("empty heading, using {}", UNTITLED);
            return UNTITLED.to_string();
        }
        HeadingKind::Valid => true,
        HeadingKind::None => false,
    };

    let mut state = LineState::new(line.trim(), is_heading);
    for (name, stage) in STAGES {
        match stage(state, settings) {
            ControlFlow::Continue(next) => {
                log::trace!("stage {}: {:?}", name, next.text);
                state = next;
            }
            ControlFlow::Break(title) => {
                log::debug!("stage {} collapsed line to {:?}", name, title);
                return title;
            }
        }
    }

    finalize(state)
}
