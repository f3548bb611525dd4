//! JCS (JSON Canonicalization Scheme) helpers.
//!
//! Rekor signs the RFC 8785 form of each entry's SET payload, so the bytes we
//! verify must be reproduced exactly. Input is first parsed with
//! [`parse_strict`](crate::json::parse_strict): duplicate keys have no
//! canonical form and are rejected instead of being "fixed".

use serde_json::Value as JsonValue;

use crate::json::{parse_strict, JsonFormatError};

/// Errors specific to canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanonicalizeError {
    /// The input is not acceptable JSON.
    #[error("canonicalizing JSON: {0}")]
    Parse(#[from] JsonFormatError),

    /// JSON serialization error.
    #[error("JSON serialize error: {message}")]
    Serialize { message: String },
}

/// Convert a JSON value to JCS bytes.
///
/// JCS (RFC 8785) produces deterministic JSON output by:
/// - Sorting object keys lexicographically by UTF-16 code units
/// - No whitespace
/// - Specific number formatting
pub fn to_canonical_jcs_bytes(value: &JsonValue) -> Result<Vec<u8>, CanonicalizeError> {
    serde_jcs::to_vec(value).map_err(|e| CanonicalizeError::Serialize {
        message: e.to_string(),
    })
}

/// Parse raw JSON strictly and return its JCS form.
pub fn canonicalize_json(data: &[u8]) -> Result<Vec<u8>, CanonicalizeError> {
    let value = parse_strict(data)?;
    to_canonical_jcs_bytes(&value)
}
