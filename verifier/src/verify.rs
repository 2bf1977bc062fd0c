//! Verification orchestrator.
//!
//! Drives one contract file against a live provider: validates the file
//! shape, sequences interactions in file order, runs provider-state hooks,
//! replays each request through the transport, and aggregates every recorded
//! error into a single end-of-run failure.
//!
//! Interactions are verified strictly one at a time: state hooks may mutate
//! provider-side fixtures that later interactions depend on.

use crate::compare;
use crate::error::VerifyError;
use crate::report::Reporter;
use crate::request;
use crate::response;
use crate::state::ProviderStateRegistry;
use crate::transport::Transport;
use covenant_contract::{ContractFile, Interaction};
use tracing::instrument;

/// Outcome of a successful verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationSummary {
    /// Consumer name from the contract file
    pub consumer: String,
    /// Provider name from the contract file
    pub provider: String,
    /// Number of interactions verified
    pub interactions: usize,
}

/// Top-level verification driver over a [`Transport`].
#[derive(Debug)]
pub struct ProviderVerifier<T: Transport> {
    transport: T,
}

impl<T: Transport> ProviderVerifier<T> {
    /// Create a verifier over the given transport.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The transport this verifier replays requests through.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Verify every interaction of a contract file against the provider.
    ///
    /// A full run attempts every interaction and every reachable tear-down
    /// hook before reporting: structural mismatches and transport failures
    /// are recorded per interaction and the run continues, so one bad
    /// interaction cannot mask the others. The collected errors surface once,
    /// at the end, as [`VerifyError::VerificationFailed`].
    ///
    /// # Errors
    ///
    /// Configuration errors (invalid contract file, unrecognized method
    /// verb, declared provider state with no registration) abort the run;
    /// the global tear-down hook still executes if it was reachable.
    /// Otherwise, returns the aggregate failure when any error was recorded.
    #[instrument(skip_all, fields(
        consumer = %contract.consumer.name,
        provider = %contract.provider.name,
        interactions = contract.interactions.len(),
    ))]
    pub async fn verify(
        &self,
        contract: &ContractFile,
        states: &ProviderStateRegistry,
    ) -> Result<VerificationSummary, VerifyError> {
        contract.validate()?;

        let summary = VerificationSummary {
            consumer: contract.consumer.name.clone(),
            provider: contract.provider.name.clone(),
            interactions: contract.interactions.len(),
        };
        if contract.interactions.is_empty() {
            return Ok(summary);
        }

        let mut reporter = Reporter::new();

        states.run_set_up();
        let outcome = self
            .verify_interactions(contract, states, &mut reporter)
            .await;
        states.run_tear_down();

        outcome?;
        reporter.into_result()?;
        Ok(summary)
    }

    async fn verify_interactions(
        &self,
        contract: &ContractFile,
        states: &ProviderStateRegistry,
        reporter: &mut Reporter,
    ) -> Result<(), VerifyError> {
        for (index, interaction) in contract.interactions.iter().enumerate() {
            let number = index + 1;

            let state = match &interaction.provider_state {
                Some(name) => Some(
                    states
                        .find(name)
                        .ok_or_else(|| VerifyError::MissingProviderState(name.clone()))?,
                ),
                None => None,
            };

            if let Some(state) = state {
                state.run_set_up();
            }

            reporter.info(format!(
                "{number}) Verifying a contract between {} and {} - {}",
                contract.consumer.name, contract.provider.name, interaction.description
            ));

            let outcome = self.verify_interaction(number, interaction, reporter).await;

            if let Some(state) = state {
                state.run_tear_down();
            }

            outcome?;
        }
        Ok(())
    }

    /// Replay one interaction and record its divergences.
    ///
    /// Returns `Err` only for fatal configuration errors; transport failures
    /// and mismatches become reporter entries.
    async fn verify_interaction(
        &self,
        number: usize,
        interaction: &Interaction,
        reporter: &mut Reporter,
    ) -> Result<(), VerifyError> {
        let wire_request = request::map_request(&interaction.request)?;

        match self.transport.send(wire_request).await {
            Ok(wire_response) => {
                let actual = response::map_response(wire_response);
                for mismatch in compare::compare(&interaction.response, &actual) {
                    reporter.error(format!(
                        "{number}) {}: {mismatch}",
                        interaction.description
                    ));
                }
            }
            Err(error) => {
                reporter.error(format!(
                    "{number}) {}: request failed: {error}",
                    interaction.description
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::WireRequest;
    use crate::response::WireResponse;
    use crate::state::ProviderState;
    use crate::transport::TransportError;
    use covenant_contract::{
        ContractMetadata, Participant, RequestSpec, ResponseSpec,
    };
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned-response transport recording every request it sends.
    #[derive(Debug, Default)]
    struct CannedTransport {
        responses: Mutex<Vec<Result<WireResponse, TransportError>>>,
        sent: Mutex<Vec<WireRequest>>,
    }

    impl CannedTransport {
        fn respond_with(responses: Vec<Result<WireResponse, TransportError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl Transport for CannedTransport {
        async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
            self.sent.lock().unwrap().push(request);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(WireResponse {
                    status: 200,
                    headers: Vec::new(),
                    body: Vec::new(),
                })
            } else {
                responses.remove(0)
            }
        }
    }

    fn ok_response(status: u16, body: serde_json::Value) -> WireResponse {
        WireResponse {
            status,
            headers: vec![(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )],
            body: body.to_string().into_bytes(),
        }
    }

    fn interaction(description: &str, status: u16) -> Interaction {
        Interaction {
            description: description.to_string(),
            provider_state: None,
            request: RequestSpec {
                method: "GET".to_string(),
                path: "/events".to_string(),
                query: None,
                headers: None,
                body: None,
            },
            response: ResponseSpec {
                status,
                headers: None,
                body: None,
                matching_rules: None,
            },
        }
    }

    fn contract(interactions: Vec<Interaction>) -> ContractFile {
        ContractFile {
            consumer: Participant::new("events-consumer"),
            provider: Participant::new("events-api"),
            interactions,
            metadata: ContractMetadata::default(),
        }
    }

    #[tokio::test]
    async fn test_invalid_contract_aborts_before_any_hook() {
        let hook_runs = std::sync::Arc::new(AtomicUsize::new(0));
        let runs = std::sync::Arc::clone(&hook_runs);
        let states = ProviderStateRegistry::new().with_set_up(move || {
            runs.fetch_add(1, Ordering::SeqCst);
        });

        let mut bad = contract(vec![interaction("d", 200)]);
        bad.consumer = Participant::new("");

        let verifier = ProviderVerifier::new(CannedTransport::default());
        let err = verifier.verify(&bad, &states).await.unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(hook_runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_interactions_skip_all_hooks() {
        let hook_runs = std::sync::Arc::new(AtomicUsize::new(0));
        let up = std::sync::Arc::clone(&hook_runs);
        let down = std::sync::Arc::clone(&hook_runs);
        let states = ProviderStateRegistry::new()
            .with_set_up(move || {
                up.fetch_add(1, Ordering::SeqCst);
            })
            .with_tear_down(move || {
                down.fetch_add(1, Ordering::SeqCst);
            });

        let verifier = ProviderVerifier::new(CannedTransport::default());
        let summary = verifier.verify(&contract(Vec::new()), &states).await.unwrap();

        assert_eq!(summary.interactions, 0);
        assert_eq!(hook_runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_passing_run_returns_summary() {
        let transport =
            CannedTransport::respond_with(vec![Ok(ok_response(200, json!(null)))]);
        let verifier = ProviderVerifier::new(transport);

        let summary = verifier
            .verify(&contract(vec![interaction("all events", 200)]), &ProviderStateRegistry::new())
            .await
            .unwrap();

        assert_eq!(summary.consumer, "events-consumer");
        assert_eq!(summary.provider, "events-api");
        assert_eq!(summary.interactions, 1);
    }

    #[tokio::test]
    async fn test_failed_interaction_does_not_stop_the_next_one() {
        let transport = CannedTransport::respond_with(vec![
            Ok(ok_response(500, json!(null))),
            Ok(ok_response(200, json!(null))),
        ]);
        let verifier = ProviderVerifier::new(transport);

        let err = verifier
            .verify(
                &contract(vec![interaction("first", 200), interaction("second", 200)]),
                &ProviderStateRegistry::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(verifier.transport.sent_count(), 2);
        match err {
            VerifyError::VerificationFailed { failures } => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].contains("1) first"));
                assert!(failures[0].contains("expected status 200, got 500"));
            }
            other => panic!("expected aggregate failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_recorded_and_run_continues() {
        let transport = CannedTransport::respond_with(vec![
            Err(TransportError::InvalidHeader {
                name: "broken".to_string(),
            }),
            Ok(ok_response(200, json!(null))),
        ]);
        let verifier = ProviderVerifier::new(transport);

        let err = verifier
            .verify(
                &contract(vec![interaction("unreachable", 200), interaction("fine", 200)]),
                &ProviderStateRegistry::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(verifier.transport.sent_count(), 2);
        match err {
            VerifyError::VerificationFailed { failures } => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].contains("request failed"));
            }
            other => panic!("expected aggregate failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_provider_state_aborts_but_global_teardown_runs() {
        let teardown_runs = std::sync::Arc::new(AtomicUsize::new(0));
        let runs = std::sync::Arc::clone(&teardown_runs);
        let states = ProviderStateRegistry::new().with_tear_down(move || {
            runs.fetch_add(1, Ordering::SeqCst);
        });

        let mut declared = interaction("needs state", 200);
        declared.provider_state = Some("there are events".to_string());

        let verifier = ProviderVerifier::new(CannedTransport::default());
        let err = verifier
            .verify(&contract(vec![declared]), &states)
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::MissingProviderState(ref name) if name == "there are events"));
        assert_eq!(teardown_runs.load(Ordering::SeqCst), 1);
        assert_eq!(verifier.transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_interaction_teardown_runs_even_when_comparison_fails() {
        let lifecycle = std::sync::Arc::new(Mutex::new(Vec::new()));
        let up = std::sync::Arc::clone(&lifecycle);
        let down = std::sync::Arc::clone(&lifecycle);

        let states = ProviderStateRegistry::new().with_state(
            ProviderState::new("there are events")
                .with_set_up(move || up.lock().unwrap().push("set-up"))
                .with_tear_down(move || down.lock().unwrap().push("tear-down")),
        );

        let mut declared = interaction("failing", 200);
        declared.provider_state = Some("there are events".to_string());

        let transport =
            CannedTransport::respond_with(vec![Ok(ok_response(503, json!(null)))]);
        let verifier = ProviderVerifier::new(transport);

        let err = verifier.verify(&contract(vec![declared]), &states).await;
        assert!(err.is_err());
        assert_eq!(
            *lifecycle.lock().unwrap(),
            vec!["set-up", "tear-down"]
        );
    }
}
