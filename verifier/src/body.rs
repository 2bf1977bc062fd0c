//! Body content mapping: abstract body value to wire bytes.

use crate::content::{BodyEncoding, ContentDescriptor};
use covenant_contract::Headers;
use serde_json::Value;

/// A mapped request body: bytes plus the content metadata derived for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyContent {
    /// Serialized body bytes
    pub bytes: Vec<u8>,
    /// Media type the bytes were serialized under, absent for an empty body
    pub media_type: Option<String>,
    /// Charset explicitly declared (and recognized) by the interaction
    pub encoding: Option<BodyEncoding>,
}

impl BodyContent {
    /// The mapping of an absent body: no bytes, no content type.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            bytes: Vec::new(),
            media_type: None,
            encoding: None,
        }
    }

    /// Map an abstract body value to wire bytes.
    ///
    /// The interaction's declared `content-type`/`charset` win when present;
    /// otherwise structured values serialize as JSON and scalars as plain
    /// text, both UTF-8. Pure function of its inputs.
    #[must_use]
    pub fn convert(body: Option<&Value>, headers: Option<&Headers>) -> Self {
        let Some(body) = body else {
            return Self::empty();
        };
        if body.is_null() {
            return Self::empty();
        }

        let declared = ContentDescriptor::from_headers(headers);

        let media_type = declared.as_ref().map_or_else(
            || {
                if body.is_object() || body.is_array() {
                    "application/json".to_string()
                } else {
                    "text/plain".to_string()
                }
            },
            |descriptor| descriptor.media_type.clone(),
        );

        let encoding = declared.as_ref().and_then(|descriptor| descriptor.encoding);

        let text = if ContentDescriptor::parse(&media_type).is_json() {
            body.to_string()
        } else {
            scalar_text(body)
        };

        Self {
            bytes: encoding.unwrap_or_default().encode(&text),
            media_type: Some(media_type),
            encoding,
        }
    }

    /// The recomputed `Content-Type` header value, when a body was mapped.
    ///
    /// Carries the mapped charset as a parameter when the interaction
    /// declared one.
    #[must_use]
    pub fn content_type_header(&self) -> Option<String> {
        let media_type = self.media_type.as_ref()?;
        Some(match self.encoding {
            Some(encoding) => format!("{media_type}; charset={}", encoding.charset_name()),
            None => media_type.clone(),
        })
    }
}

/// String form of a scalar body: strings contribute their inner text, other
/// scalars their canonical JSON rendering.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
