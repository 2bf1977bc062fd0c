//! Mock implementations for testing.

use covenant_verifier::{Transport, TransportError, WireRequest, WireResponse};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

/// Recording transport with a queue of canned responses.
///
/// Responses are served in queue order; once the queue drains, every further
/// request receives an empty `200`.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: AsyncMutex<VecDeque<WireResponse>>,
    requests: AsyncMutex<Vec<WireRequest>>,
}

impl MockTransport {
    /// Create a transport that answers every request with an empty `200`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned response.
    pub async fn enqueue(&self, response: WireResponse) {
        self.responses.lock().await.push_back(response);
    }

    /// Queue a JSON response with the given status.
    pub async fn enqueue_json(&self, status: u16, body: &serde_json::Value) {
        self.enqueue(WireResponse {
            status,
            headers: vec![(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )],
            body: body.to_string().into_bytes(),
        })
        .await;
    }

    /// Every request sent through this transport, in order.
    pub async fn sent(&self) -> Vec<WireRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests sent through this transport.
    pub async fn sent_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        self.requests.lock().await.push(request);

        let canned = self.responses.lock().await.pop_front();
        Ok(canned.unwrap_or(WireResponse {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
        }))
    }
}

/// Records hook invocations so tests can assert on lifecycle ordering.
///
/// Hooks are synchronous closures, so the recorder locks a plain mutex.
#[derive(Debug, Default, Clone)]
pub struct HookRecorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl HookRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a hook closure that records the given label when invoked.
    #[must_use]
    pub fn hook(&self, label: &str) -> impl Fn() + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        let label = label.to_string();
        move || {
            events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(label.clone());
        }
    }

    /// Every recorded label, in invocation order.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times the given label was recorded.
    #[must_use]
    pub fn count_of(&self, label: &str) -> usize {
        self.events().iter().filter(|event| *event == label).count()
    }
}
