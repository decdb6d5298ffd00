//! Session-label matching strategies
//!
//! Signup sheets record the breakout session as free text: sometimes the
//! acronym, sometimes the full title, sometimes both. Matching is therefore
//! a heuristic and is kept behind the [`SessionMatcher`] trait so other
//! strategies can be swapped in.

use std::collections::HashSet;

/// Decides whether a row's session label refers to the target group
pub trait SessionMatcher {
    fn matches(&self, target: &str, label: &str) -> bool;
}

impl<F> SessionMatcher for F
where
    F: Fn(&str, &str) -> bool,
{
    fn matches(&self, target: &str, label: &str) -> bool {
        self(target, label)
    }
}

/// Default matcher: equality, containment, then token overlap
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzySessionMatcher;

impl SessionMatcher for FuzzySessionMatcher {
    fn matches(&self, target: &str, label: &str) -> bool {
        fuzzy_session_match(target, label)
    }
}

/// Exact, case-insensitive match on trimmed strings
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSessionMatcher;

impl SessionMatcher for ExactSessionMatcher {
    fn matches(&self, target: &str, label: &str) -> bool {
        let target = normalize(target);
        !target.is_empty() && target == normalize(label)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn tokens(s: &str) -> HashSet<String> {
    s.replace([',', ':'], "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Fuzzy match between a target group and a session label.
///
/// Both sides are lowercased and trimmed. They match when equal, when either
/// contains the other, or when they share at least `min(2, target tokens)`
/// whitespace tokens after commas and colons are stripped. Blank inputs
/// never match.
///
/// ```
/// use session_report::talks::fuzzy_session_match;
///
/// assert!(fuzzy_session_match("DWARF", "DWARF: Data, Workflows, Agents"));
/// assert!(fuzzy_session_match("AI", "FAIRNESS, AI, AND ETHICS"));
/// assert!(!fuzzy_session_match("DWARF", "STORAGE SYSTEMS"));
/// ```
pub fn fuzzy_session_match(target: &str, label: &str) -> bool {
    let target = normalize(target);
    let label = normalize(label);

    if target.is_empty() || label.is_empty() {
        return false;
    }

    if target == label || label.contains(&target) || target.contains(&label) {
        return true;
    }

    let target_tokens = tokens(&target);
    if target_tokens.is_empty() {
        return false;
    }
    let label_tokens = tokens(&label);

    let overlap = target_tokens.intersection(&label_tokens).count();
    overlap >= target_tokens.len().min(2)
}
