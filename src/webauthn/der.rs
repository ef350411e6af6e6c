//! DER ECDSA signature decoding
//!
//! Authenticators return ES256 assertions as a DER `ECDSA-Sig-Value`:
//!
//! ```text
//! 0x30 len 0x02 rLen r... 0x02 sLen s...
//! ```
//!
//! Low-level verifiers (on-chain P-256 precompiles and the like) want the raw
//! `r` and `s` integers instead. DER prepends a `0x00` to an integer whose
//! high bit is set; that byte is not part of the value and is removed here.
//!
//! Only the single-byte length form is understood. That is always the case for
//! P-256, where `r` and `s` are at most 33 bytes; anything using the long
//! length form (length byte >= 0x80) is rejected with
//! [`DerError::UnsupportedLength`] rather than decoded.

use serde::{Deserialize, Serialize};

use super::codec::{self, CodecError};

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;
const LONG_LENGTH_FORM: u8 = 0x80;

/// Errors from decoding a DER signature
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DerError {
    #[error("Expected tag 0x{expected:02x} at offset {offset}, found 0x{found:02x}")]
    UnexpectedTag { offset: usize, expected: u8, found: u8 },

    #[error("Length byte 0x{0:02x} uses the multi-byte DER form, which is not supported")]
    UnsupportedLength(u8),

    #[error("Signature truncated: needed {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error(transparent)]
    Encoding(#[from] CodecError),
}

/// Raw ECDSA signature components as lowercase hex, leading zeros stripped
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    pub r: String,
    pub s: String,
}

/// Decode a DER-encoded ECDSA signature into its `r` and `s` components
///
/// # Errors
///
/// Returns a `DerError` if a tag is wrong, a length uses the multi-byte form,
/// or the input is shorter than its declared lengths.
pub fn decode_der_signature(der: &[u8]) -> Result<EcdsaSignature, DerError> {
    expect_tag(der, 0, SEQUENCE_TAG)?;
    read_length(der, 1)?;

    expect_tag(der, 2, INTEGER_TAG)?;
    let r_len = read_length(der, 3)?;
    let r = slice(der, 4, r_len)?;

    expect_tag(der, 4 + r_len, INTEGER_TAG)?;
    let s_len = read_length(der, 5 + r_len)?;
    let s = slice(der, 6 + r_len, s_len)?;

    Ok(EcdsaSignature {
        r: codec::bytes_to_hex(strip_leading_zeros(r)),
        s: codec::bytes_to_hex(strip_leading_zeros(s)),
    })
}

/// Decode a DER signature given as hex (optionally `0x` prefixed)
///
/// # Errors
///
/// Returns `DerError::Encoding` for invalid hex, otherwise as
/// [`decode_der_signature`].
pub fn decode_der_signature_hex(hex: &str) -> Result<EcdsaSignature, DerError> {
    let der = codec::hex_to_bytes(hex)?;
    decode_der_signature(&der)
}

/// Decode a DER signature given as base64url, the form assertion results carry
///
/// # Errors
///
/// Returns `DerError::Encoding` for invalid base64url, otherwise as
/// [`decode_der_signature`].
pub fn decode_der_signature_base64url(signature: &str) -> Result<EcdsaSignature, DerError> {
    let der = codec::base64url_to_bytes(signature)?;
    decode_der_signature(&der)
}

fn byte_at(der: &[u8], offset: usize) -> Result<u8, DerError> {
    der.get(offset).copied().ok_or(DerError::Truncated {
        needed: offset + 1,
        actual: der.len(),
    })
}

fn expect_tag(der: &[u8], offset: usize, expected: u8) -> Result<(), DerError> {
    let found = byte_at(der, offset)?;
    if found != expected {
        return Err(DerError::UnexpectedTag {
            offset,
            expected,
            found,
        });
    }
    Ok(())
}

fn read_length(der: &[u8], offset: usize) -> Result<usize, DerError> {
    let length = byte_at(der, offset)?;
    if length >= LONG_LENGTH_FORM {
        return Err(DerError::UnsupportedLength(length));
    }
    Ok(usize::from(length))
}

fn slice(der: &[u8], start: usize, len: usize) -> Result<&[u8], DerError> {
    der.get(start..start + len).ok_or(DerError::Truncated {
        needed: start + len,
        actual: der.len(),
    })
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first_non_zero = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[first_non_zero..]
}
