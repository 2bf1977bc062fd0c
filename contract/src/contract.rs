//! Contract file types.

use crate::headers::Headers;
use crate::matching::MatchingRules;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A consumer-driven contract between two services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractFile {
    /// Consumer participant
    pub consumer: Participant,
    /// Provider participant
    pub provider: Participant,
    /// Recorded interactions, in file order
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    /// Contract metadata
    #[serde(default)]
    pub metadata: ContractMetadata,
}

impl ContractFile {
    /// Check the invariants required before verification may proceed.
    ///
    /// # Errors
    ///
    /// Returns an error if the consumer or provider name is empty.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.consumer.name.trim().is_empty() {
            return Err(ContractError::MissingConsumerName);
        }
        if self.provider.name.trim().is_empty() {
            return Err(ContractError::MissingProviderName);
        }
        Ok(())
    }
}

/// Invalid contract file shape.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContractError {
    /// The consumer participant has no name
    #[error("contract file must name a consumer")]
    MissingConsumerName,

    /// The provider participant has no name
    #[error("contract file must name a provider")]
    MissingProviderName,
}

/// A participant in a contract (consumer or provider).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    /// Participant name
    pub name: String,
}

impl Participant {
    /// Create a new participant.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A recorded interaction: one request and the response the consumer expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interaction {
    /// Interaction description
    pub description: String,
    /// Provider state the interaction depends on (precondition)
    #[serde(rename = "providerState", skip_serializing_if = "Option::is_none")]
    pub provider_state: Option<String>,
    /// Request to replay against the provider
    pub request: RequestSpec,
    /// Expected response
    pub response: ResponseSpec,
}

/// Abstract description of the request to replay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestSpec {
    /// HTTP method verb
    pub method: String,
    /// Request path
    pub path: String,
    /// Query string, without the leading `?`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Request headers, in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
    /// Request body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

/// Expected response, possibly carrying matching rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseSpec {
    /// Expected HTTP status code
    pub status: u16,
    /// Headers the provider must return (it may add more)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
    /// Expected body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Matching rules keyed by body path
    #[serde(rename = "matchingRules", skip_serializing_if = "Option::is_none")]
    pub matching_rules: Option<MatchingRules>,
}

/// Contract metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractMetadata {
    /// Contract specification version
    #[serde(rename = "pactSpecification")]
    pub specification: SpecificationVersion,
}

/// Contract specification version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpecificationVersion {
    /// Version string
    pub version: String,
}

impl Default for ContractMetadata {
    fn default() -> Self {
        Self {
            specification: SpecificationVersion {
                version: "2.0.0".to_string(),
            },
        }
    }
}
