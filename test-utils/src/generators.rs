//! Shared proptest generators for contract types.

use covenant_contract::{Headers, RequestSpec};
use proptest::prelude::*;
use serde_json::Value;

/// Generate protocol method verbs.
pub fn method_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("GET".to_string()),
        Just("POST".to_string()),
        Just("PUT".to_string()),
        Just("DELETE".to_string()),
        Just("PATCH".to_string()),
        Just("HEAD".to_string()),
        Just("OPTIONS".to_string()),
    ]
}

/// Generate request paths.
pub fn path_strategy() -> impl Strategy<Value = String> {
    "/[a-z][a-z0-9/-]{2,30}"
}

/// Generate custom (non-framing) header names.
pub fn header_name_strategy() -> impl Strategy<Value = String> {
    "X-[A-Za-z][A-Za-z0-9-]{0,15}"
}

/// Generate header values.
pub fn header_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._/-]{1,30}"
}

/// Generate ordered header maps of custom headers with distinct names.
pub fn headers_strategy(max: usize) -> impl Strategy<Value = Headers> {
    prop::collection::vec((header_name_strategy(), header_value_strategy()), 0..=max).prop_map(
        |pairs| {
            let mut seen = Vec::new();
            pairs
                .into_iter()
                .filter(|(name, _)| {
                    let key = name.to_ascii_lowercase();
                    if seen.contains(&key) {
                        false
                    } else {
                        seen.push(key);
                        true
                    }
                })
                .collect()
        },
    )
}

/// Generate scalar JSON values.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::from),
    ]
}

/// Generate JSON body values: scalars, arrays, and objects up to two levels
/// deep.
pub fn body_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-zA-Z][a-zA-Z0-9]{0,10}", inner, 0..4)
                .prop_map(|map| Value::from(serde_json::Map::from_iter(map))),
        ]
    })
}

/// Generate request specs with a JSON object body and custom headers.
pub fn request_spec_strategy() -> impl Strategy<Value = RequestSpec> {
    (
        method_strategy(),
        path_strategy(),
        headers_strategy(4),
        body_strategy(),
    )
        .prop_map(|(method, path, headers, body)| RequestSpec {
            method,
            path,
            query: None,
            headers: Some(headers),
            body: Some(body),
        })
}
