//! Text encodings for `WebAuthn` binary fields
//!
//! Callers always see binary data (challenges, credential ids, authenticator
//! output) as unpadded base64url. The native backends disagree: one wants
//! padded standard base64, the other the canonical form. Callers hand in
//! challenges as hex. Every conversion between those forms lives here.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

/// Hex strings made of whole bytes, either case, no prefix
static HEX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9a-fA-F]{2})+$").expect("Failed to compile hex pattern")
});

/// Encoding errors raised by the codec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Input is not valid in the expected encoding
    #[error("Invalid {encoding} string")]
    InvalidEncoding { encoding: &'static str },
}

impl CodecError {
    fn invalid(encoding: &'static str) -> Self {
        Self::InvalidEncoding { encoding }
    }
}

/// Strip a leading `0x` from a hex string
#[must_use]
pub fn strip_hex_prefix(hex: &str) -> &str {
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

/// Check that a string (without prefix) is a sequence of hex byte pairs
#[must_use]
pub fn is_valid_hex(hex: &str) -> bool {
    HEX_PATTERN.is_match(hex)
}

/// Convert a hex string, optionally `0x` prefixed, to unpadded base64url
///
/// # Errors
///
/// Returns `CodecError::InvalidEncoding` if the input is not valid hex.
pub fn hex_to_base64url(hex: &str) -> Result<String, CodecError> {
    let bytes = hex_to_bytes(hex)?;
    Ok(bytes_to_base64url(&bytes))
}

/// Decode a hex string, optionally `0x` prefixed
///
/// # Errors
///
/// Returns `CodecError::InvalidEncoding` if the input is not valid hex.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, CodecError> {
    let hex = strip_hex_prefix(hex);
    if !is_valid_hex(hex) {
        return Err(CodecError::invalid("hex"));
    }
    hex::decode(hex).map_err(|_| CodecError::invalid("hex"))
}

/// Lowercase hex, no prefix
#[must_use]
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Re-alphabet a standard base64 string into unpadded base64url
///
/// Already canonical input passes through unchanged.
#[must_use]
pub fn base64_to_base64url(base64: &str) -> String {
    base64
        .chars()
        .filter_map(|c| match c {
            '+' => Some('-'),
            '/' => Some('_'),
            '=' => None,
            other => Some(other),
        })
        .collect()
}

/// Re-alphabet a base64url string into padded standard base64
#[must_use]
pub fn base64url_to_base64(base64url: &str) -> String {
    let mut base64: String = base64url
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let remainder = base64.len() % 4;
    if remainder != 0 {
        base64.extend(std::iter::repeat('=').take(4 - remainder));
    }
    base64
}

#[must_use]
pub fn bytes_to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url
///
/// # Errors
///
/// Returns `CodecError::InvalidEncoding` if the input is not base64url.
pub fn base64url_to_bytes(base64url: &str) -> Result<Vec<u8>, CodecError> {
    URL_SAFE_NO_PAD
        .decode(base64url.trim_end_matches('='))
        .map_err(|_| CodecError::invalid("base64url"))
}

#[must_use]
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode padded standard base64
///
/// # Errors
///
/// Returns `CodecError::InvalidEncoding` if the input is not standard base64.
pub fn base64_to_bytes(base64: &str) -> Result<Vec<u8>, CodecError> {
    STANDARD
        .decode(base64)
        .map_err(|_| CodecError::invalid("base64"))
}
