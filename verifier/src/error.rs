//! Error types for the verification engine.

use crate::transport::TransportError;
use covenant_contract::ContractError;
use thiserror::Error;

/// Errors surfaced by a verification run.
///
/// Configuration errors abort a run immediately; structural and transport
/// failures are collected by the reporter and surfaced once, at the end, as
/// [`VerifyError::VerificationFailed`].
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The contract file violates a basic invariant
    #[error("invalid contract file: {0}")]
    InvalidContract(#[from] ContractError),

    /// A request spec names a verb outside the protocol verb set
    #[error("unrecognized request method \"{0}\"")]
    UnknownMethod(String),

    /// An interaction declares a provider state that was never registered
    #[error(
        "provider state \"{0}\" was declared by a consumer but is not registered; \
         supply this provider state"
    )]
    MissingProviderState(String),

    /// The transport could not be constructed
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Aggregate failure carrying every error recorded during the run
    #[error("verification failed with {} error(s):\n{}", .failures.len(), .failures.join("\n"))]
    VerificationFailed {
        /// Every error entry recorded by the reporter, in order
        failures: Vec<String>,
    },
}

impl VerifyError {
    /// Whether this error is a fatal configuration error.
    ///
    /// Configuration errors are never retried and abort the run before (or
    /// mid-way through) the interaction loop; only reachable tear-down hooks
    /// still execute.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidContract(_) | Self::UnknownMethod(_) | Self::MissingProviderState(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(VerifyError::UnknownMethod("FETCH".to_string()).is_configuration());
        assert!(VerifyError::MissingProviderState("there are events".to_string()).is_configuration());
        assert!(
            VerifyError::InvalidContract(ContractError::MissingConsumerName).is_configuration()
        );
        assert!(
            !VerifyError::VerificationFailed {
                failures: vec!["mismatch".to_string()]
            }
            .is_configuration()
        );
    }

    #[test]
    fn test_aggregate_display_enumerates_failures() {
        let err = VerifyError::VerificationFailed {
            failures: vec!["first".to_string(), "second".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("2 error(s)"));
        assert!(message.contains("first"));
        assert!(message.contains("second"));
    }
}
