//! Safewords: filenames that must never be produced by a rename.

use crate::settings::{Safeword, Settings};

impl Safeword {
    /// Returns true if this safeword matches `candidate`.
    ///
    /// Disabled and empty safewords never match.
    pub fn matches(&self, candidate: &str) -> bool {
        if !self.enabled || self.text.is_empty() {
            return false;
        }

        let (candidate, text) = if self.case_sensitive {
            (candidate.to_string(), self.text.clone())
        } else {
            (candidate.to_lowercase(), self.text.to_lowercase())
        };

        if self.only_whole_line {
            candidate.trim() == text.trim()
        } else if self.only_at_start {
            candidate.starts_with(&text)
        } else {
            candidate.contains(&text)
        }
    }
}

/// Returns the first safeword that blocks `candidate`, if any.
///
/// Callers skip the rename when a safeword is returned.
pub fn is_blocked<'s>(candidate: &str, settings: &'s Settings) -> Option<&'s Safeword> {
    let blocked = settings.safewords.iter().find(|s| s.matches(candidate));
    if let Some(safeword) = blocked {
        log::debug!("{:?} blocked by safeword {:?}", candidate, safeword.text);
    }
    blocked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_case_insensitive() {
        let safeword = Safeword::new("private");
        assert!(safeword.matches("My PRIVATE notes"));
        assert!(!safeword.matches("Public notes"));
    }

    #[test]
    fn test_case_sensitive() {
        let safeword = Safeword {
            case_sensitive: true,
            ..Safeword::new("TODO")
        };
        assert!(safeword.matches("TODO list"));
        assert!(!safeword.matches("todo list"));
    }

    #[test]
    fn test_only_at_start() {
        let safeword = Safeword {
            only_at_start: true,
            ..Safeword::new("Daily")
        };
        assert!(safeword.matches("daily 2024-01-01"));
        assert!(!safeword.matches("My daily log"));
    }

    #[test]
    fn test_only_whole_line() {
        let safeword = Safeword {
            only_whole_line: true,
            ..Safeword::new("Index")
        };
        assert!(safeword.matches("index"));
        assert!(!safeword.matches("Index of notes"));
    }

    #[test]
    fn test_disabled_and_empty_never_match() {
        let disabled = Safeword {
            enabled: false,
            ..Safeword::new("a")
        };
        assert!(!disabled.matches("a"));
        assert!(!Safeword::new("").matches("anything"));
    }

    #[test]
    fn test_is_blocked_returns_first_match() {
        let settings = Settings::default()
            .with_safeword(Safeword::new("zzz"))
            .with_safeword(Safeword::new("secret"))
            .with_safeword(Safeword::new("sec"));
        let blocked = is_blocked("Top secret", &settings);
        assert_eq!(blocked.map(|s| s.text.as_str()), Some("secret"));
        assert!(is_blocked("Open", &settings).is_none());
    }
}
