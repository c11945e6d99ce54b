//! Settings for title extraction and filename sanitization.
//!
//! One [`Settings`] value is read per extraction call and never mutated by
//! the pipeline. The JSON form uses camelCase keys and tolerates missing
//! fields, so partial settings files fall back to the defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling title extraction and sanitization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Which markup categories are stripped from the first line.
    pub markup: MarkupOptions,

    /// How comments are handled when comment stripping is enabled.
    pub comment_mode: CommentMode,

    /// Master switch for the custom rule engine.
    pub enable_custom_rules: bool,

    /// User-defined search/replace rules, applied in order.
    pub custom_rules: Vec<CustomRule>,

    /// Master switch for forbidden-character replacement.
    /// When off, forbidden characters are dropped.
    pub enable_char_replacements: bool,

    /// Per-character replacement table.
    pub char_replacements: CharReplacements,

    /// Target platform; decides which extra characters are forbidden.
    pub os_preset: OsPreset,

    /// Maximum title length in characters.
    pub max_title_chars: usize,

    /// Words that block renaming when found in a candidate filename.
    pub safewords: Vec<Safeword>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            markup: MarkupOptions::default(),
            comment_mode: CommentMode::Omit,
            enable_custom_rules: true,
            custom_rules: Vec::new(),
            enable_char_replacements: false,
            char_replacements: CharReplacements::default(),
            os_preset: OsPreset::Linux,
            max_title_chars: 100,
            safewords: Vec::new(),
        }
    }
}

impl Settings {
    /// Creates new settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings that keep all markup in place (only sanitization applies).
    pub fn plain() -> Self {
        Self {
            markup: MarkupOptions::none(),
            ..Self::default()
        }
    }

    /// Settings that replace forbidden characters with look-alikes
    /// instead of dropping them.
    pub fn strict() -> Self {
        let mut settings = Self::default();
        settings.enable_char_replacements = true;
        for c in ForbiddenChar::ALL {
            settings.char_replacements.get_mut(c).enabled = true;
        }
        settings
    }

    /// Parses settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading settings from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes settings as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the OS preset.
    pub fn with_os_preset(mut self, preset: OsPreset) -> Self {
        self.os_preset = preset;
        self
    }

    /// Sets the markup options.
    pub fn with_markup(mut self, markup: MarkupOptions) -> Self {
        self.markup = markup;
        self
    }

    /// Sets the comment handling mode.
    pub fn with_comment_mode(mut self, mode: CommentMode) -> Self {
        self.comment_mode = mode;
        self
    }

    /// Appends a custom rule.
    pub fn with_rule(mut self, rule: CustomRule) -> Self {
        self.custom_rules.push(rule);
        self
    }

    /// Appends a safeword.
    pub fn with_safeword(mut self, safeword: Safeword) -> Self {
        self.safewords.push(safeword);
        self
    }

    /// Enables replacement for one forbidden character.
    pub fn with_replacement(mut self, c: ForbiddenChar, replacement: impl Into<String>) -> Self {
        self.enable_char_replacements = true;
        let entry = self.char_replacements.get_mut(c);
        entry.enabled = true;
        entry.replacement = replacement.into();
        self
    }

    /// Sets the maximum title length in characters.
    pub fn with_max_title_chars(mut self, max: usize) -> Self {
        self.max_title_chars = max;
        self
    }

    /// Returns true if `c` is forbidden under the active OS preset.
    pub fn forbids(&self, c: ForbiddenChar) -> bool {
        self.os_preset.forbids(c)
    }

    /// Returns the replacement entry for `c` when replacement is active.
    pub fn active_replacement(&self, c: ForbiddenChar) -> Option<&CharReplacement> {
        if !self.enable_char_replacements {
            return None;
        }
        let entry = self.char_replacements.get(c);
        entry.enabled.then_some(entry)
    }

    /// Returns true if backslashes are replaced as forbidden characters.
    ///
    /// In that case backslash escapes are not interpreted by the pipeline.
    pub fn replaces_backslash(&self) -> bool {
        self.active_replacement(ForbiddenChar::Backslash).is_some()
    }

    /// Checks settings for values the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_title_chars == 0 {
            return Err(Error::InvalidSettings(
                "maxTitleChars must be at least 1".into(),
            ));
        }

        for c in ForbiddenChar::ALL {
            let entry = self.char_replacements.get(c);
            if !entry.enabled {
                continue;
            }
            if let Some(bad) = entry
                .replacement
                .chars()
                .find(|r| ForbiddenChar::from_char(*r).is_some_and(|f| self.forbids(f)))
            {
                return Err(Error::InvalidSettings(format!(
                    "replacement for '{}' contains forbidden character '{}'",
                    c.as_char(),
                    bad
                )));
            }
        }

        for (index, rule) in self.custom_rules.iter().enumerate() {
            if rule.replace.contains(['\n', '\r']) {
                return Err(Error::InvalidRule {
                    index,
                    message: "replacement must be a single line".into(),
                });
            }
        }

        Ok(())
    }
}

/// Markup categories stripped from the first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkupOptions {
    pub headings: bool,
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub highlight: bool,
    pub wikilinks: bool,
    pub markdown_links: bool,
    pub blockquotes: bool,
    pub callouts: bool,
    pub lists: bool,
    pub task_checkboxes: bool,
    pub horizontal_rules: bool,
    pub inline_code: bool,
    pub code_blocks: bool,
    pub footnotes: bool,
    pub comments: bool,
    pub tables: bool,
    pub inline_math: bool,
    pub math_blocks: bool,
    pub html_tags: bool,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self::all()
    }
}

impl MarkupOptions {
    /// Every category enabled.
    pub fn all() -> Self {
        Self {
            headings: true,
            bold: true,
            italic: true,
            strikethrough: true,
            highlight: true,
            wikilinks: true,
            markdown_links: true,
            blockquotes: true,
            callouts: true,
            lists: true,
            task_checkboxes: true,
            horizontal_rules: true,
            inline_code: true,
            code_blocks: true,
            footnotes: true,
            comments: true,
            tables: true,
            inline_math: true,
            math_blocks: true,
            html_tags: true,
        }
    }

    /// Every category disabled.
    pub fn none() -> Self {
        Self {
            headings: false,
            bold: false,
            italic: false,
            strikethrough: false,
            highlight: false,
            wikilinks: false,
            markdown_links: false,
            blockquotes: false,
            callouts: false,
            lists: false,
            task_checkboxes: false,
            horizontal_rules: false,
            inline_code: false,
            code_blocks: false,
            footnotes: false,
            comments: false,
            tables: false,
            inline_math: false,
            math_blocks: false,
            html_tags: false,
        }
    }

    /// Returns true if any emphasis category is enabled.
    pub fn any_emphasis(&self) -> bool {
        self.bold || self.italic || self.strikethrough || self.highlight
    }
}

/// What happens to `%%…%%` and `<!--…-->` spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommentMode {
    /// Remove the comment and its content.
    #[default]
    Omit,
    /// Remove only the comment markers, keeping the inner text.
    Unwrap,
}

/// How a custom rule matches the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    /// Replace every occurrence anywhere in the line.
    #[default]
    Substring,
    /// Replace only a leading occurrence.
    LineStart,
    /// Replace only when the trimmed line equals the trimmed search text.
    WholeLine,
}

/// A user-defined search/replace rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomRule {
    pub search: String,
    pub replace: String,
    pub mode: MatchMode,
    pub enabled: bool,
}

impl Default for CustomRule {
    fn default() -> Self {
        Self {
            search: String::new(),
            replace: String::new(),
            mode: MatchMode::Substring,
            enabled: true,
        }
    }
}

impl CustomRule {
    /// Creates an enabled substring rule.
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replace: replace.into(),
            ..Self::default()
        }
    }

    /// Sets the match mode.
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Disables the rule.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Characters that can never appear in a note filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForbiddenChar {
    Slash,
    Backslash,
    Colon,
    Pipe,
    Hash,
    Caret,
    LeftBracket,
    RightBracket,
    Asterisk,
    Quote,
    LessThan,
    GreaterThan,
    Question,
}

impl ForbiddenChar {
    pub const ALL: [ForbiddenChar; 13] = [
        ForbiddenChar::Slash,
        ForbiddenChar::Backslash,
        ForbiddenChar::Colon,
        ForbiddenChar::Pipe,
        ForbiddenChar::Hash,
        ForbiddenChar::Caret,
        ForbiddenChar::LeftBracket,
        ForbiddenChar::RightBracket,
        ForbiddenChar::Asterisk,
        ForbiddenChar::Quote,
        ForbiddenChar::LessThan,
        ForbiddenChar::GreaterThan,
        ForbiddenChar::Question,
    ];

    pub fn as_char(self) -> char {
        match self {
            ForbiddenChar::Slash => '/',
            ForbiddenChar::Backslash => '\\',
            ForbiddenChar::Colon => ':',
            ForbiddenChar::Pipe => '|',
            ForbiddenChar::Hash => '#',
            ForbiddenChar::Caret => '^',
            ForbiddenChar::LeftBracket => '[',
            ForbiddenChar::RightBracket => ']',
            ForbiddenChar::Asterisk => '*',
            ForbiddenChar::Quote => '"',
            ForbiddenChar::LessThan => '<',
            ForbiddenChar::GreaterThan => '>',
            ForbiddenChar::Question => '?',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_char() == c)
    }

    /// Characters only forbidden on Windows-like filesystems.
    pub fn is_os_specific(self) -> bool {
        matches!(
            self,
            ForbiddenChar::Asterisk
                | ForbiddenChar::Quote
                | ForbiddenChar::LessThan
                | ForbiddenChar::GreaterThan
                | ForbiddenChar::Question
        )
    }
}

/// Target platform for filename rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OsPreset {
    #[default]
    Linux,
    MacOs,
    Windows,
    Android,
    Ios,
}

impl OsPreset {
    /// Returns true if `c` is forbidden on this platform.
    pub fn forbids(self, c: ForbiddenChar) -> bool {
        if c.is_os_specific() {
            matches!(self, OsPreset::Windows | OsPreset::Android)
        } else {
            true
        }
    }
}

impl std::fmt::Display for OsPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsPreset::Linux => write!(f, "Linux"),
            OsPreset::MacOs => write!(f, "macOS"),
            OsPreset::Windows => write!(f, "Windows"),
            OsPreset::Android => write!(f, "Android"),
            OsPreset::Ios => write!(f, "iOS"),
        }
    }
}

/// Replacement rule for one forbidden character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharReplacement {
    pub enabled: bool,
    pub replacement: String,
    /// Remove whitespace immediately before the character.
    pub trim_left: bool,
    /// Remove whitespace immediately after the character.
    pub trim_right: bool,
}

impl Default for CharReplacement {
    fn default() -> Self {
        Self::new("")
    }
}

impl CharReplacement {
    /// Creates a disabled entry with the given replacement.
    pub fn new(replacement: impl Into<String>) -> Self {
        Self {
            enabled: false,
            replacement: replacement.into(),
            trim_left: false,
            trim_right: false,
        }
    }
}

/// Replacement table, one entry per [`ForbiddenChar`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharReplacements {
    pub slash: CharReplacement,
    pub backslash: CharReplacement,
    pub colon: CharReplacement,
    pub pipe: CharReplacement,
    pub hash: CharReplacement,
    pub caret: CharReplacement,
    pub left_bracket: CharReplacement,
    pub right_bracket: CharReplacement,
    pub asterisk: CharReplacement,
    pub quote: CharReplacement,
    pub less_than: CharReplacement,
    pub greater_than: CharReplacement,
    pub question: CharReplacement,
}

impl Default for CharReplacements {
    fn default() -> Self {
        Self {
            slash: CharReplacement::new("∕"),
            backslash: CharReplacement::new("⧵"),
            colon: CharReplacement::new("։"),
            pipe: CharReplacement::new("❘"),
            hash: CharReplacement::new("＃"),
            caret: CharReplacement::new("ˆ"),
            left_bracket: CharReplacement::new("［"),
            right_bracket: CharReplacement::new("］"),
            asterisk: CharReplacement::new("∗"),
            quote: CharReplacement::new("＂"),
            less_than: CharReplacement::new("‹"),
            greater_than: CharReplacement::new("›"),
            question: CharReplacement::new("﹖"),
        }
    }
}

impl CharReplacements {
    pub fn get(&self, c: ForbiddenChar) -> &CharReplacement {
        match c {
            ForbiddenChar::Slash => &self.slash,
            ForbiddenChar::Backslash => &self.backslash,
            ForbiddenChar::Colon => &self.colon,
            ForbiddenChar::Pipe => &self.pipe,
            ForbiddenChar::Hash => &self.hash,
            ForbiddenChar::Caret => &self.caret,
            ForbiddenChar::LeftBracket => &self.left_bracket,
            ForbiddenChar::RightBracket => &self.right_bracket,
            ForbiddenChar::Asterisk => &self.asterisk,
            ForbiddenChar::Quote => &self.quote,
            ForbiddenChar::LessThan => &self.less_than,
            ForbiddenChar::GreaterThan => &self.greater_than,
            ForbiddenChar::Question => &self.question,
        }
    }

    pub fn get_mut(&mut self, c: ForbiddenChar) -> &mut CharReplacement {
        match c {
            ForbiddenChar::Slash => &mut self.slash,
            ForbiddenChar::Backslash => &mut self.backslash,
            ForbiddenChar::Colon => &mut self.colon,
            ForbiddenChar::Pipe => &mut self.pipe,
            ForbiddenChar::Hash => &mut self.hash,
            ForbiddenChar::Caret => &mut self.caret,
            ForbiddenChar::LeftBracket => &mut self.left_bracket,
            ForbiddenChar::RightBracket => &mut self.right_bracket,
            ForbiddenChar::Asterisk => &mut self.asterisk,
            ForbiddenChar::Quote => &mut self.quote,
            ForbiddenChar::LessThan => &mut self.less_than,
            ForbiddenChar::GreaterThan => &mut self.greater_than,
            ForbiddenChar::Question => &mut self.question,
        }
    }
}

/// A word that blocks renaming when found in a candidate filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Safeword {
    pub text: String,
    pub only_at_start: bool,
    pub only_whole_line: bool,
    pub case_sensitive: bool,
    pub enabled: bool,
}

impl Default for Safeword {
    fn default() -> Self {
        Self {
            text: String::new(),
            only_at_start: false,
            only_whole_line: false,
            case_sensitive: false,
            enabled: true,
        }
    }
}

impl Safeword {
    /// Creates an enabled, case-insensitive substring safeword.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.markup.bold);
        assert!(!settings.enable_char_replacements);
        assert_eq!(settings.max_title_chars, 100);
    }

    #[test]
    fn test_plain_disables_markup() {
        let settings = Settings::plain();
        assert_eq!(settings.markup, MarkupOptions::none());
        assert!(!settings.markup.any_emphasis());
    }

    #[test]
    fn test_strict_enables_all_replacements() {
        let settings = Settings::strict();
        for c in ForbiddenChar::ALL {
            assert!(settings.active_replacement(c).is_some(), "{:?}", c);
        }
        assert!(settings.replaces_backslash());
    }

    #[test]
    fn test_replacement_inactive_without_master_switch() {
        let mut settings = Settings::default();
        settings.char_replacements.colon.enabled = true;
        assert!(settings.active_replacement(ForbiddenChar::Colon).is_none());
        settings.enable_char_replacements = true;
        assert!(settings.active_replacement(ForbiddenChar::Colon).is_some());
    }

    #[test]
    fn test_os_preset_forbids() {
        assert!(OsPreset::Linux.forbids(ForbiddenChar::Colon));
        assert!(!OsPreset::Linux.forbids(ForbiddenChar::Question));
        assert!(!OsPreset::MacOs.forbids(ForbiddenChar::Asterisk));
        assert!(OsPreset::Windows.forbids(ForbiddenChar::Asterisk));
        assert!(OsPreset::Android.forbids(ForbiddenChar::Quote));
    }

    #[test]
    fn test_forbidden_char_round_trip() {
        for c in ForbiddenChar::ALL {
            assert_eq!(ForbiddenChar::from_char(c.as_char()), Some(c));
        }
        assert_eq!(ForbiddenChar::from_char('a'), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "osPreset": "windows", "markup": { "bold": false } }"#;
        let settings = Settings::from_json_str(json).unwrap();
        assert_eq!(settings.os_preset, OsPreset::Windows);
        assert!(!settings.markup.bold);
        assert!(settings.markup.italic);
        assert_eq!(settings.max_title_chars, 100);
    }

    #[test]
    fn test_json_custom_rules() {
        let json = r#"{
            "customRules": [
                { "search": "Draft", "replace": "", "mode": "wholeLine" },
                { "search": "TODO ", "replace": "", "mode": "lineStart", "enabled": false }
            ]
        }"#;
        let settings = Settings::from_json_str(json).unwrap();
        assert_eq!(settings.custom_rules.len(), 2);
        assert_eq!(settings.custom_rules[0].mode, MatchMode::WholeLine);
        assert!(settings.custom_rules[0].enabled);
        assert!(!settings.custom_rules[1].enabled);
    }

    #[test]
    fn test_invalid_json() {
        let result = Settings::from_json_str("{ not json");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_zero_max_chars_rejected() {
        let settings = Settings::default().with_max_title_chars(0);
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_forbidden_replacement_rejected() {
        let settings = Settings::default().with_replacement(ForbiddenChar::Colon, " / ");
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_os_specific_replacement_allowed_on_linux() {
        // '?' is legal on Linux, so it may appear in a replacement there.
        let settings = Settings::default().with_replacement(ForbiddenChar::Colon, "?");
        assert!(settings.validate().is_ok());
        let windows = settings.with_os_preset(OsPreset::Windows);
        assert!(windows.validate().is_err());
    }

    #[test]
    fn test_multiline_rule_rejected() {
        let settings = Settings::default().with_rule(CustomRule::new("a", "b\nc"));
        match settings.validate() {
            Err(Error::InvalidRule { index, .. }) => assert_eq!(index, 0),
            other => panic!("Expected InvalidRule, got {:?}", other),
        }
    }

    #[test]
    fn test_settings_json_round_trip() {
        let settings = Settings::strict()
            .with_os_preset(OsPreset::MacOs)
            .with_rule(CustomRule::new("x", "y").with_mode(MatchMode::LineStart))
            .with_safeword(Safeword::new("private"));
        let json = settings.to_json_pretty().unwrap();
        assert!(json.contains("\"osPreset\": \"macOs\""));
        let parsed = Settings::from_json_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}
