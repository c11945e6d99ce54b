//! Custom search/replace rules.

use super::{LineState, UNTITLED};
use crate::settings::{CustomRule, MatchMode};
use std::ops::ControlFlow;

/// Applies enabled rules in order, each to the previous rule's output.
///
/// A whole-line rule with an empty replacement that matches collapses the
/// title to `Untitled` at that point in the scan; later rules never run.
pub fn apply_rules(mut state: LineState, rules: &[CustomRule]) -> ControlFlow<String, LineState> {
    for (index, rule) in rules.iter().enumerate() {
        if !rule.enabled || rule.search.is_empty() {
            continue;
        }

        match rule.mode {
            MatchMode::WholeLine => {
                if state.text.trim() != rule.search.trim() {
                    continue;
                }
                if rule.replace.is_empty() {
                    log::debug!("custom rule #{} cleared the whole line", index);
                    return ControlFlow::Break(UNTITLED.to_string());
                }
                state.text = rule.replace.clone();
            }
            MatchMode::LineStart => {
                if let Some(rest) = state.text.strip_prefix(rule.search.as_str()) {
                    state.text = format!("{}{}", rule.replace, rest);
                }
            }
            MatchMode::Substring => {
                if state.text.contains(rule.search.as_str()) {
                    state.text = state.text.replace(rule.search.as_str(), &rule.replace);
                }
            }
        }
        log::trace!("custom rule #{} -> {:?}", index, state.text);
    }

    ControlFlow::Continue(state)
}
