//! Response mapping: wire response to the abstract model used for comparison.

use crate::content::ContentDescriptor;
use covenant_contract::Headers;
use serde_json::Value;

/// A raw response as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, in wire order
    pub headers: Vec<(String, String)>,
    /// Raw body bytes
    pub body: Vec<u8>,
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// No body bytes
    Empty,
    /// Structured data parsed from a JSON media type
    Json(Value),
    /// Text under a non-structured (or missing) media type
    Text(String),
    /// The body claimed a JSON media type but could not be parsed
    Unparseable {
        /// The media type the transport declared
        media_type: String,
        /// The parse failure
        error: String,
    },
}

/// The abstract response model produced from a wire response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualResponse {
    /// HTTP status code
    pub status: u16,
    /// All response headers, verbatim
    pub headers: Headers,
    /// Decoded body
    pub body: ResponseBody,
}

/// Map a wire response into the abstract response model. Pure.
#[must_use]
pub fn map_response(wire: WireResponse) -> ActualResponse {
    let headers: Headers = wire.headers.into_iter().collect();
    let body = decode_body(&wire.body, ContentDescriptor::from_headers(Some(&headers)));

    ActualResponse {
        status: wire.status,
        headers,
        body,
    }
}

fn decode_body(bytes: &[u8], descriptor: Option<ContentDescriptor>) -> ResponseBody {
    if bytes.is_empty() {
        return ResponseBody::Empty;
    }

    let encoding = descriptor
        .as_ref()
        .and_then(|d| d.encoding)
        .unwrap_or_default();
    let text = encoding.decode(bytes);

    match descriptor {
        Some(descriptor) if descriptor.is_json() => match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(error) => ResponseBody::Unparseable {
                media_type: descriptor.media_type,
                error: error.to_string(),
            },
        },
        _ => ResponseBody::Text(text),
    }
}
