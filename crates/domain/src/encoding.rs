//! base64url transport encoding for the `dns` GET parameter (RFC 8484 §4.1).

use crate::errors::DomainError;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

/// Decodes a `dns` parameter. RFC 8484 forbids padding but some clients
/// send it anyway, so both forms are accepted.
pub fn decode_base64url(input: &str) -> Result<Vec<u8>, DomainError> {
    let trimmed = input.trim();
    let result = if trimmed.ends_with('=') {
        URL_SAFE.decode(trimmed)
    } else {
        URL_SAFE_NO_PAD.decode(trimmed)
    };
    result.map_err(|e| DomainError::InvalidQuery(format!("invalid base64url dns parameter: {}", e)))
}

/// Encodes with the URL-safe alphabet and no padding.
pub fn encode_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}
