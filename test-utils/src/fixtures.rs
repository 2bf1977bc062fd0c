//! Canned contract files and interactions used across test suites.

use covenant_contract::{
    ContractFile, ContractMetadata, Interaction, Participant, RequestSpec, ResponseSpec,
};
use serde_json::json;

/// A contract between `events-consumer` and `events-api` holding the given
/// interactions.
#[must_use]
pub fn events_contract(interactions: Vec<Interaction>) -> ContractFile {
    ContractFile {
        consumer: Participant::new("events-consumer"),
        provider: Participant::new("events-api"),
        interactions,
        metadata: ContractMetadata::default(),
    }
}

/// A GET /events interaction expecting a JSON event list.
#[must_use]
pub fn events_interaction() -> Interaction {
    Interaction {
        description: "a request to retrieve all events".to_string(),
        provider_state: Some("there are events".to_string()),
        request: RequestSpec {
            method: "GET".to_string(),
            path: "/events".to_string(),
            query: None,
            headers: Some([("Accept", "application/json")].into_iter().collect()),
            body: None,
        },
        response: ResponseSpec {
            status: 200,
            headers: Some(
                [("Content-Type", "application/json; charset=utf-8")]
                    .into_iter()
                    .collect(),
            ),
            body: Some(json!([
                {"eventId": 1, "eventType": "DetailsView"},
                {"eventId": 2, "eventType": "SearchView"}
            ])),
            matching_rules: None,
        },
    }
}

/// A POST /events interaction with a JSON body, a declared charset, and a
/// custom header.
#[must_use]
pub fn post_event_interaction() -> Interaction {
    Interaction {
        description: "a request to create an event".to_string(),
        provider_state: None,
        request: RequestSpec {
            method: "POST".to_string(),
            path: "/events".to_string(),
            query: None,
            headers: Some(
                [
                    ("Content-Type", "application/json; charset=utf-8"),
                    ("X-Custom", "My Custom header"),
                ]
                .into_iter()
                .collect(),
            ),
            body: Some(json!({"Test": "tester", "Testing": 1})),
        },
        response: ResponseSpec {
            status: 201,
            headers: None,
            body: None,
            matching_rules: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_contracts_are_valid() {
        assert!(events_contract(vec![events_interaction()]).validate().is_ok());
        assert!(events_contract(vec![post_event_interaction()]).validate().is_ok());
    }
}
