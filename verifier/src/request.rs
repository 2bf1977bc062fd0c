//! Request mapping: abstract request spec to concrete wire request.

use crate::body::BodyContent;
use crate::content;
use crate::error::VerifyError;
use covenant_contract::RequestSpec;
use reqwest::Method;

/// A concrete request ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    /// Protocol method
    pub method: Method,
    /// Request path
    pub path: String,
    /// Query string, without the leading `?`
    pub query: Option<String>,
    /// Outgoing headers, in order: non-framing headers verbatim, then the
    /// recomputed framing headers
    pub headers: Vec<(String, String)>,
    /// Serialized body bytes
    pub body: Vec<u8>,
}

/// Map an abstract request spec to a wire request.
///
/// Non-framing headers are forwarded verbatim, preserving casing and order.
/// `Content-Type` and `Content-Length` are never copied from the spec: both
/// are derived from the mapped body, and a spec-supplied `Content-Length` is
/// always overridden.
///
/// # Errors
///
/// Returns [`VerifyError::UnknownMethod`] for a verb outside the protocol
/// verb set; this is a fatal configuration error.
pub fn map_request(spec: &RequestSpec) -> Result<WireRequest, VerifyError> {
    let method = map_method(&spec.method)?;

    let mut headers: Vec<(String, String)> = Vec::new();
    if let Some(declared) = &spec.headers {
        for (name, value) in declared.iter() {
            if !content::is_framing(name) {
                headers.push((name.to_string(), value.to_string()));
            }
        }
    }

    let body = BodyContent::convert(spec.body.as_ref(), spec.headers.as_ref());
    if let Some(content_type) = body.content_type_header() {
        headers.push(("Content-Type".to_string(), content_type));
        headers.push(("Content-Length".to_string(), body.bytes.len().to_string()));
    }

    Ok(WireRequest {
        method,
        path: spec.path.clone(),
        query: spec.query.clone(),
        headers,
        body: body.bytes,
    })
}

/// Case-sensitive verb lookup.
fn map_method(verb: &str) -> Result<Method, VerifyError> {
    match verb {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        "HEAD" => Ok(Method::HEAD),
        "PATCH" => Ok(Method::PATCH),
        "OPTIONS" => Ok(Method::OPTIONS),
        other => Err(VerifyError::UnknownMethod(other.to_string())),
    }
}
