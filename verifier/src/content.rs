//! Header classification: content types, charsets, and framing headers.
//!
//! `Content-Type` and `Content-Length` are framing headers: they describe the
//! bytes actually put on the wire, so the request mapper derives them from
//! the mapped body instead of copying whatever the contract declared.

use covenant_contract::Headers;

/// Whether a header name denotes a framing header, in any letter casing.
#[must_use]
pub fn is_framing(name: &str) -> bool {
    name.eq_ignore_ascii_case("content-type") || name.eq_ignore_ascii_case("content-length")
}

/// Character encoding used to turn body text into wire bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    /// UTF-8 (the default)
    #[default]
    Utf8,
    /// UTF-16, little-endian
    Utf16,
}

impl BodyEncoding {
    /// Resolve a recognized charset name; unrecognized names map to `None`.
    #[must_use]
    pub fn from_charset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "utf-16" | "utf16" => Some(Self::Utf16),
            _ => None,
        }
    }

    /// Canonical charset name for the `Content-Type` parameter.
    #[must_use]
    pub const fn charset_name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16 => "utf-16",
        }
    }

    /// Encode text into wire bytes.
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16 => text
                .encode_utf16()
                .flat_map(|unit| unit.to_le_bytes())
                .collect(),
        }
    }

    /// Decode wire bytes into text, replacing invalid sequences.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Utf16 => {
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
        }
    }
}

/// A parsed `Content-Type` header: media type plus optional charset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDescriptor {
    /// Media type, e.g. `application/json`
    pub media_type: String,
    /// Recognized charset, when one was declared
    pub encoding: Option<BodyEncoding>,
}

impl ContentDescriptor {
    /// Parse a `Content-Type` header value.
    ///
    /// Splits on `;`; the first part is the media type, the remaining parts
    /// are scanned for a `charset=` parameter.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut parts = value.split(';');
        let media_type = parts.next().unwrap_or_default().trim().to_string();

        let encoding = parts.find_map(|param| {
            let (key, charset) = param.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("charset") {
                BodyEncoding::from_charset(charset.trim())
            } else {
                None
            }
        });

        Self {
            media_type,
            encoding,
        }
    }

    /// Locate and parse a `content-type` entry in a header map, matching the
    /// name regardless of letter case.
    #[must_use]
    pub fn from_headers(headers: Option<&Headers>) -> Option<Self> {
        headers?.get("content-type").map(Self::parse)
    }

    /// Whether the media type denotes structured JSON data.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.media_type.eq_ignore_ascii_case("application/json")
            || self
                .media_type
                .to_ascii_lowercase()
                .ends_with("+json")
    }
}
