//! Property-based tests for the contract model.

use covenant_contract::{
    ContractFile, ContractMetadata, Headers, Interaction, MatchingRule, MatchingRules,
    Participant, RequestSpec, ResponseSpec,
};
use proptest::prelude::*;

fn service_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{2,20}"
}

fn method_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("GET".to_string()),
        Just("POST".to_string()),
        Just("PUT".to_string()),
        Just("DELETE".to_string()),
        Just("PATCH".to_string()),
    ]
}

fn path_strategy() -> impl Strategy<Value = String> {
    "/[a-z][a-z0-9/-]{2,30}"
}

fn headers_strategy() -> impl Strategy<Value = Headers> {
    prop::collection::vec(("X-[A-Za-z]{1,10}", "[a-zA-Z0-9 -]{1,20}"), 0..4)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn matching_rule_strategy() -> impl Strategy<Value = MatchingRule> {
    prop_oneof![
        Just(MatchingRule::Equality),
        proptest::option::of(1usize..5).prop_map(|min| MatchingRule::Type { min }),
        "[a-z]{1,5}[+*]?".prop_map(|regex| MatchingRule::Regex { regex }),
    ]
}

fn interaction_strategy() -> impl Strategy<Value = Interaction> {
    (
        "[a-z ]{5,40}",
        proptest::option::of("[a-z ]{3,30}"),
        method_strategy(),
        path_strategy(),
        headers_strategy(),
        (100u16..600),
        proptest::option::of(("\\$\\.body\\.[a-z]{1,8}", matching_rule_strategy())),
    )
        .prop_map(
            |(description, provider_state, method, path, headers, status, rule)| Interaction {
                description,
                provider_state,
                request: RequestSpec {
                    method,
                    path,
                    query: None,
                    headers: Some(headers),
                    body: None,
                },
                response: ResponseSpec {
                    status,
                    headers: None,
                    body: None,
                    matching_rules: rule.map(|(path, rule)| {
                        let mut rules = MatchingRules::new();
                        rules.insert(path, rule);
                        rules
                    }),
                },
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any generated contract survives a JSON round-trip unchanged.
    #[test]
    fn prop_contract_serialization_roundtrip(
        consumer in service_name_strategy(),
        provider in service_name_strategy(),
        interactions in prop::collection::vec(interaction_strategy(), 0..3),
    ) {
        let contract = ContractFile {
            consumer: Participant::new(&consumer),
            provider: Participant::new(&provider),
            interactions,
            metadata: ContractMetadata::default(),
        };

        let json = serde_json::to_string(&contract).unwrap();
        let restored: ContractFile = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(contract, restored);
    }

    /// Header maps keep declaration order and casing through serde.
    #[test]
    fn prop_headers_roundtrip_in_order(headers in headers_strategy()) {
        let json = serde_json::to_string(&headers).unwrap();
        let restored: Headers = serde_json::from_str(&json).unwrap();

        let before: Vec<(&str, &str)> = headers.iter().collect();
        let after: Vec<(&str, &str)> = restored.iter().collect();
        prop_assert_eq!(before, after);
    }

    /// Non-empty participant names always validate; an empty one never does.
    #[test]
    fn prop_validation_requires_names(
        consumer in service_name_strategy(),
        provider in service_name_strategy(),
    ) {
        let valid = ContractFile {
            consumer: Participant::new(&consumer),
            provider: Participant::new(&provider),
            interactions: Vec::new(),
            metadata: ContractMetadata::default(),
        };
        prop_assert!(valid.validate().is_ok());

        let unnamed = ContractFile {
            consumer: Participant::new(""),
            ..valid
        };
        prop_assert!(unnamed.validate().is_err());
    }

    /// Matching rules survive their wire representation.
    #[test]
    fn prop_matching_rule_roundtrip(rule in matching_rule_strategy()) {
        let json = serde_json::to_string(&rule).unwrap();
        prop_assert!(json.contains("\"match\""));

        let restored: MatchingRule = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(rule, restored);
    }
}
