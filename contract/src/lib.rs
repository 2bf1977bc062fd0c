//! Consumer-driven contract data model.
//!
//! Provides the contract file shape shared by the consumer and provider
//! sides: participants, interactions, request/response expectations, an
//! ordered case-insensitive header map, and response matching rules.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod contract;
pub mod headers;
pub mod matching;

pub use contract::{
    ContractError, ContractFile, ContractMetadata, Interaction, Participant, RequestSpec,
    ResponseSpec, SpecificationVersion,
};
pub use headers::Headers;
pub use matching::{MatchingRule, MatchingRules};
