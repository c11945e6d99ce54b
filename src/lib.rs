//! # firstline
//!
//! Derives a note's filename from its first line, the way a Markdown vault
//! expects: markup is stripped, links resolve to their display text, and the
//! result is made safe for the target filesystem.
//!
//! ## Pipeline
//!
//! - **Extraction** ([`extract_title`]): heading check, escape protection,
//!   comments, markup, custom rules, links
//! - **Sanitization** ([`sanitize_filename`]): forbidden characters, leading
//!   dots, Unicode normalization, length limit
//! - **Safewords** ([`is_blocked`]): candidate names that must not be used
//!
//! ## Quick Start
//!
//! ```
//! use firstline::{title_from_content, Settings};
//!
//! let note = "---\ntags: [work]\n---\n# **Q3** review: [[Roadmap|roadmap]]\n\nBody";
//! let title = title_from_content(note, &Settings::default());
//! assert_eq!(title, "Q3 review roadmap");
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): rayon-backed [`extract_titles`]

pub mod content;
pub mod error;
pub mod pipeline;
pub mod safeword;
pub mod sanitize;
pub mod settings;

// Re-exports
pub use content::{first_line, split_frontmatter};
pub use error::{Error, Result};
pub use pipeline::{extract_title, UNTITLED};
pub use safeword::is_blocked;
pub use sanitize::sanitize_filename;
pub use settings::{
    CharReplacement, CharReplacements, CommentMode, CustomRule, ForbiddenChar, MarkupOptions,
    MatchMode, OsPreset, Safeword, Settings,
};

use std::path::Path;

/// Extracts and sanitizes a title from a single raw line.
///
/// # Example
///
/// ```
/// use firstline::{title_from_line, Settings};
///
/// assert_eq!(title_from_line("## Notes: *draft*", &Settings::default()), "Notes draft");
/// ```
pub fn title_from_line(line: &str, settings: &Settings) -> String {
    sanitize_filename(&extract_title(line, settings), settings)
}

/// Computes the filename title for a whole note.
///
/// Frontmatter and leading blank lines are skipped; a note without a content
/// line is `Untitled`.
pub fn title_from_content(content: &str, settings: &Settings) -> String {
    match first_line(content) {
        Some(line) => title_from_line(line, settings),
        None => UNTITLED.to_string(),
    }
}

/// Computes titles for many lines, preserving input order.
///
/// Uses rayon when the `parallel` feature is enabled.
pub fn extract_titles<S>(lines: &[S], settings: &Settings) -> Vec<String>
where
    S: AsRef<str> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        lines
            .par_iter()
            .map(|line| title_from_line(line.as_ref(), settings))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        lines
            .iter()
            .map(|line| title_from_line(line.as_ref(), settings))
            .collect()
    }
}

/// Builder for proposing note titles.
///
/// # Example
///
/// ```
/// use firstline::{OsPreset, Safeword, TitleExtractor};
///
/// let extractor = TitleExtractor::new()
///     .with_os_preset(OsPreset::Windows)
///     .with_safeword(Safeword::new("private"));
///
/// let proposal = extractor.propose("# Plans: 2025?");
/// assert_eq!(proposal.title, "Plans 2025");
/// assert!(!proposal.is_blocked());
///
/// assert!(extractor.propose("Private diary").is_blocked());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TitleExtractor {
    settings: Settings,
}

impl TitleExtractor {
    /// Creates a new extractor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an extractor from existing settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }

    /// Creates an extractor from a JSON settings file.
    pub fn from_settings_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_settings(Settings::load(path)?))
    }

    /// Sets the target platform.
    pub fn with_os_preset(mut self, preset: OsPreset) -> Self {
        self.settings.os_preset = preset;
        self
    }

    /// Sets the markup categories to strip.
    pub fn with_markup(mut self, markup: MarkupOptions) -> Self {
        self.settings.markup = markup;
        self
    }

    /// Appends a custom rule.
    pub fn with_rule(mut self, rule: CustomRule) -> Self {
        self.settings.custom_rules.push(rule);
        self
    }

    /// Appends a safeword.
    pub fn with_safeword(mut self, safeword: Safeword) -> Self {
        self.settings.safewords.push(safeword);
        self
    }

    /// Sets the maximum title length in characters.
    pub fn with_max_title_chars(mut self, max: usize) -> Self {
        self.settings.max_title_chars = max;
        self
    }

    /// Replaces forbidden characters with look-alikes instead of dropping them.
    pub fn strict(mut self) -> Self {
        let strict = Settings::strict();
        self.settings.enable_char_replacements = true;
        self.settings.char_replacements = strict.char_replacements;
        self
    }

    /// Returns the active settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Proposes a title for a note's content.
    pub fn propose(&self, content: &str) -> Proposal {
        let title = title_from_content(content, &self.settings);
        let blocked_by = is_blocked(&title, &self.settings).map(|s| s.text.clone());
        Proposal { title, blocked_by }
    }

    /// Reads a note from disk and proposes a title for it.
    pub fn propose_file(&self, path: impl AsRef<Path>) -> Result<Proposal> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.propose(&content))
    }
}

/// A proposed title for one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Sanitized title, ready to use as a filename stem.
    pub title: String,
    /// Text of the safeword that blocks the rename, if any.
    pub blocked_by: Option<String>,
}

impl Proposal {
    /// Returns true if a safeword blocks renaming to this title.
    pub fn is_blocked(&self) -> bool {
        self.blocked_by.is_some()
    }

    /// Returns true if the proposed title differs from `current`.
    pub fn differs_from(&self, current: &str) -> bool {
        self.title != current
    }
}
