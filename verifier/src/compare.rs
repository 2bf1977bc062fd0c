//! Structural comparison of expected vs actual responses.
//!
//! The comparer collects every divergence it finds while walking the full
//! structure; a mismatch in one branch never stops comparison of its
//! siblings. Only an actual body that cannot be parsed at all under the
//! expected content type short-circuits the body walk, with a single
//! mismatch describing the parse failure.

use crate::response::{ActualResponse, ResponseBody};
use covenant_contract::{Headers, MatchingRule, MatchingRules, ResponseSpec};
use regex::Regex;
use serde_json::Value;
use std::fmt;

/// A single divergence between the expected and actual response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Location of the divergence (`$.status`, `$.headers.X`, `$.body.a[0]`)
    pub path: String,
    /// Expected value at the path, when one exists
    pub expected: Option<Value>,
    /// Actual value at the path, when one exists
    pub actual: Option<Value>,
    /// Human-readable description of the divergence
    pub description: String,
}

impl Mismatch {
    fn new(
        path: impl Into<String>,
        expected: Option<Value>,
        actual: Option<Value>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected,
            actual,
            description: description.into(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.description)
    }
}

/// Compare an expected response spec against an actual response.
///
/// Returns every mismatch found across status, headers, and body. An empty
/// result means the provider honored the interaction.
#[must_use]
pub fn compare(expected: &ResponseSpec, actual: &ActualResponse) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();

    compare_status(expected.status, actual.status, &mut mismatches);
    if let Some(expected_headers) = &expected.headers {
        compare_headers(expected_headers, &actual.headers, &mut mismatches);
    }
    compare_body(expected, actual, &mut mismatches);

    mismatches
}

fn compare_status(expected: u16, actual: u16, out: &mut Vec<Mismatch>) {
    if expected != actual {
        out.push(Mismatch::new(
            "$.status",
            Some(Value::from(expected)),
            Some(Value::from(actual)),
            format!("expected status {expected}, got {actual}"),
        ));
    }
}

/// Subset semantics: every expected header must be present in the actual
/// response with an equivalent value; extra actual headers are fine.
fn compare_headers(expected: &Headers, actual: &Headers, out: &mut Vec<Mismatch>) {
    for (name, expected_value) in expected.iter() {
        let path = format!("$.headers.{name}");
        match actual.get(name) {
            None => out.push(Mismatch::new(
                path,
                Some(Value::from(expected_value)),
                None,
                format!("missing header \"{name}\""),
            )),
            Some(actual_value) if !header_values_equivalent(expected_value, actual_value) => {
                out.push(Mismatch::new(
                    path,
                    Some(Value::from(expected_value)),
                    Some(Value::from(actual_value)),
                    format!(
                        "expected header \"{name}\" with value \"{expected_value}\", \
                         got \"{actual_value}\""
                    ),
                ));
            }
            Some(_) => {}
        }
    }
}

/// Header values are equivalent when their comma-separated parts match after
/// trimming surrounding whitespace, so `a, b` equals `a,b`.
fn header_values_equivalent(expected: &str, actual: &str) -> bool {
    let mut expected_parts = expected.split(',').map(str::trim);
    let mut actual_parts = actual.split(',').map(str::trim);
    loop {
        match (expected_parts.next(), actual_parts.next()) {
            (None, None) => return true,
            (Some(e), Some(a)) if e == a => {}
            _ => return false,
        }
    }
}

fn compare_body(expected: &ResponseSpec, actual: &ActualResponse, out: &mut Vec<Mismatch>) {
    let Some(expected_body) = &expected.body else {
        return;
    };
    let rules = expected.matching_rules.as_ref();

    match &actual.body {
        ResponseBody::Json(actual_body) => {
            walk(expected_body, actual_body, "$.body", rules, false, out);
        }
        ResponseBody::Text(text) => {
            let actual_value = Value::String(text.clone());
            walk(expected_body, &actual_value, "$.body", rules, false, out);
        }
        ResponseBody::Empty => out.push(Mismatch::new(
            "$.body",
            Some(expected_body.clone()),
            None,
            "expected a body, got none",
        )),
        ResponseBody::Unparseable { media_type, error } => out.push(Mismatch::new(
            "$.body",
            Some(expected_body.clone()),
            None,
            format!("body could not be parsed as {media_type}: {error}"),
        )),
    }
}

/// Recursive structural walk.
///
/// `type_cascade` is set below an array matched with template semantics:
/// descendants without a rule of their own compare by type rather than by
/// value.
fn walk(
    expected: &Value,
    actual: &Value,
    path: &str,
    rules: Option<&MatchingRules>,
    type_cascade: bool,
    out: &mut Vec<Mismatch>,
) {
    match (expected, actual) {
        (Value::Object(expected_map), Value::Object(actual_map)) => {
            for (key, expected_value) in expected_map {
                let child = format!("{path}.{key}");
                match actual_map.get(key) {
                    Some(actual_value) => {
                        walk(expected_value, actual_value, &child, rules, type_cascade, out);
                    }
                    None => out.push(Mismatch::new(
                        child,
                        Some(expected_value.clone()),
                        None,
                        format!("missing key \"{key}\""),
                    )),
                }
            }
            // extra actual keys never mismatch
        }
        (Value::Array(expected_items), Value::Array(actual_items)) => {
            compare_array(expected_items, actual_items, path, rules, type_cascade, out);
        }
        _ => compare_value(expected, actual, path, rules, type_cascade, out),
    }
}

fn compare_array(
    expected: &[Value],
    actual: &[Value],
    path: &str,
    rules: Option<&MatchingRules>,
    type_cascade: bool,
    out: &mut Vec<Mismatch>,
) {
    let rule = rules.and_then(|r| r.rule_at(path));

    if let Some(MatchingRule::Type { min }) = rule {
        // template semantics: each actual element is compared against the
        // first expected element, with type matching cascading below
        if let Some(min) = min {
            if actual.len() < *min {
                out.push(Mismatch::new(
                    path,
                    Some(Value::from(*min)),
                    Some(Value::from(actual.len())),
                    format!("expected at least {min} element(s), got {}", actual.len()),
                ));
            }
        }
        if let Some(template) = expected.first() {
            for (index, actual_item) in actual.iter().enumerate() {
                let child = format!("{path}[{index}]");
                walk(template, actual_item, &child, rules, true, out);
            }
        }
        return;
    }

    if expected.len() != actual.len() {
        out.push(Mismatch::new(
            path,
            Some(Value::from(expected.len())),
            Some(Value::from(actual.len())),
            format!(
                "expected {} element(s), got {}",
                expected.len(),
                actual.len()
            ),
        ));
    }
    for (index, (expected_item, actual_item)) in expected.iter().zip(actual).enumerate() {
        let child = format!("{path}[{index}]");
        walk(expected_item, actual_item, &child, rules, type_cascade, out);
    }
}

fn compare_value(
    expected: &Value,
    actual: &Value,
    path: &str,
    rules: Option<&MatchingRules>,
    type_cascade: bool,
    out: &mut Vec<Mismatch>,
) {
    let fallback = if type_cascade {
        MatchingRule::Type { min: None }
    } else {
        MatchingRule::Equality
    };
    let rule = rules.and_then(|r| r.rule_at(path)).unwrap_or(&fallback);

    match rule {
        MatchingRule::Equality => {
            if expected != actual {
                out.push(Mismatch::new(
                    path,
                    Some(expected.clone()),
                    Some(actual.clone()),
                    format!("expected {expected}, got {actual}"),
                ));
            }
        }
        MatchingRule::Type { .. } => {
            if type_category(expected) != type_category(actual) {
                out.push(Mismatch::new(
                    path,
                    Some(expected.clone()),
                    Some(actual.clone()),
                    format!(
                        "expected a value of type {}, got {} of type {}",
                        type_category(expected),
                        actual,
                        type_category(actual)
                    ),
                ));
            }
        }
        MatchingRule::Regex { regex } => match Regex::new(regex) {
            Ok(pattern) => {
                let text = string_form(actual);
                if !pattern.is_match(&text) {
                    out.push(Mismatch::new(
                        path,
                        Some(Value::from(regex.as_str())),
                        Some(actual.clone()),
                        format!("\"{text}\" does not match pattern \"{regex}\""),
                    ));
                }
            }
            Err(error) => out.push(Mismatch::new(
                path,
                Some(Value::from(regex.as_str())),
                Some(actual.clone()),
                format!("invalid pattern \"{regex}\": {error}"),
            )),
        },
    }
}

const fn type_category(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// String form of a value for regex matching: strings unquoted, everything
/// else in canonical JSON rendering.
fn string_form(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
