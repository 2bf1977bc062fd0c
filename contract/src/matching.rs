//! Response body matching rules.
//!
//! A contract may attach a matching rule to a body path, relaxing the default
//! exact-equality comparison. Rules use the wire representation of the
//! original contract files: `{"match": "type", "min": 1}`,
//! `{"match": "regex", "regex": "..."}`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How an expected body value at a path is compared against the actual value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "lowercase")]
pub enum MatchingRule {
    /// Exact value equality (the default when no rule is attached).
    Equality,
    /// Same primitive category as the expected value.
    ///
    /// On an array path, `min` switches the comparison to template semantics:
    /// the actual array must hold at least `min` elements, each compared
    /// against the first expected element.
    Type {
        /// Minimum number of elements when attached to an array path.
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
    },
    /// The actual scalar's string form must satisfy the pattern.
    Regex {
        /// The regular expression the actual value must match.
        regex: String,
    },
}

/// Matching rules keyed by body path (`$.body.items[0].name`).
///
/// Stored paths may use `[*]` in place of a concrete index to cover every
/// element of an array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchingRules(HashMap<String, MatchingRule>);

impl MatchingRules {
    /// Create an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a rule to a path.
    pub fn insert(&mut self, path: impl Into<String>, rule: MatchingRule) {
        self.0.insert(path.into(), rule);
    }

    /// Find the rule governing a concrete body path, if any.
    ///
    /// An exact path entry takes precedence over a `[*]` wildcard entry.
    #[must_use]
    pub fn rule_at(&self, path: &str) -> Option<&MatchingRule> {
        if let Some(rule) = self.0.get(path) {
            return Some(rule);
        }
        self.0
            .iter()
            .find(|(pattern, _)| path_matches(pattern, path))
            .map(|(_, rule)| rule)
    }

    /// Number of attached rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no rules are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P: Into<String>> FromIterator<(P, MatchingRule)> for MatchingRules {
    fn from_iter<T: IntoIterator<Item = (P, MatchingRule)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(p, r)| (p.into(), r)).collect())
    }
}

/// Whether a stored rule path (possibly holding `[*]` wildcards) covers a
/// concrete path.
fn path_matches(pattern: &str, path: &str) -> bool {
    let pattern_tokens = tokenize(pattern);
    let path_tokens = tokenize(path);

    pattern_tokens.len() == path_tokens.len()
        && pattern_tokens
            .iter()
            .zip(&path_tokens)
            .all(|(p, t)| token_matches(p, t))
}

fn token_matches(pattern: &str, token: &str) -> bool {
    if pattern == "[*]" {
        token.starts_with('[') && token.ends_with(']')
    } else {
        pattern == token
    }
}

/// Split a path into name and index tokens: `$.a.b[0]` → `$`, `a`, `b`, `[0]`.
fn tokenize(path: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for segment in path.split('.') {
        match segment.find('[') {
            Some(0) => tokens.push(segment),
            Some(bracket) => {
                tokens.push(&segment[..bracket]);
                let mut rest = &segment[bracket..];
                while let Some(end) = rest.find(']') {
                    tokens.push(&rest[..=end]);
                    rest = &rest[end + 1..];
                }
            }
            None => tokens.push(segment),
        }
    }
    tokens
}
