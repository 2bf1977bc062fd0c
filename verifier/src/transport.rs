//! HTTP transport: the seam between the engine and the live provider.

use crate::request::WireRequest;
use crate::response::WireResponse;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Url};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Transport failures: connection refused, timeouts, TLS errors, malformed
/// request data.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The provider base URL (or a path joined onto it) is not a valid URL
    #[error("invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A mapped header could not be put on the wire
    #[error("invalid header \"{name}\"")]
    InvalidHeader {
        /// The offending header name
        name: String,
    },

    /// The underlying HTTP call failed
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Provider base URL, e.g. `http://localhost:9222`
    pub base_url: String,
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl TransportConfig {
    /// Create a config for the given provider base URL with default timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: "covenant-verifier/0.1".to_string(),
        }
    }

    /// Create a config with a custom request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a config with a custom connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Create a config with a custom user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// A conforming HTTP client: sends a wire request, returns a wire response.
///
/// The engine only depends on this trait; tests substitute recording
/// implementations.
pub trait Transport: Send + Sync {
    /// Send one request and wait for the provider's response.
    fn send(
        &self,
        request: WireRequest,
    ) -> impl Future<Output = Result<WireResponse, TransportError>> + Send;
}

/// Transport backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL does not parse or the client
    /// cannot be constructed (e.g. TLS initialization fails).
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let base_url = Url::parse(&config.base_url)?;
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .build()?;

        Ok(Self { client, base_url })
    }

    fn request_url(&self, request: &WireRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.join(&request.path)?;
        if let Some(query) = &request.query {
            url.set_query(Some(query));
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        let url = self.request_url(&request)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                TransportError::InvalidHeader { name: name.clone() }
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                TransportError::InvalidHeader { name: name.clone() }
            })?;
            headers.append(header_name, header_value);
        }

        debug!(method = %request.method, %url, "sending mapped request");

        let response = self
            .client
            .request(request.method, url)
            .headers(headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(WireResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}
