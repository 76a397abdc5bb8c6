//! crates/tutor_core/src/media.rs
//!
//! Parsing and formatting of `data:<mime>;base64,<payload>` URIs.

use base64::{engine::general_purpose::STANDARD, Engine};
use regex::Regex;
use std::sync::LazyLock;

static DATA_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(?P<mime>[\w.+-]+/[\w.+-]+)(?:;[\w.+-]+=[^;,]*)*;base64,(?P<data>[A-Za-z0-9+/=\r\n]+)$")
        .expect("data URI pattern is valid")
});

/// A borrowed view over a base64 data URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime_type: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUri<'a> {
    /// Parses `data:<mime>[;param=value]*;base64,<payload>`. The payload must be non-empty.
    pub fn parse(uri: &'a str) -> Option<Self> {
        let captures = DATA_URI.captures(uri)?;
        Some(Self {
            mime_type: captures.name("mime")?.as_str(),
            payload: captures.name("data")?.as_str(),
        })
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.payload.trim())
    }
}

/// Formats raw bytes as a base64 data URI of the given MIME type.
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Returns whatever follows the first comma of a data URI, or the whole
/// string when there is no comma.
pub fn payload_after_comma(uri: &str) -> &str {
    uri.split_once(',').map(|(_, data)| data).unwrap_or(uri)
}
