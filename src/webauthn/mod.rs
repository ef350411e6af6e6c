//! `WebAuthn` data model and encodings
//!
//! This module holds the platform-independent pieces: the canonical request
//! and result types, the text codec used for every binary field, and the DER
//! signature decoder.

pub mod codec;
pub mod der;
mod types;

// Re-exports for public use
pub use codec::CodecError;
pub use der::{decode_der_signature, DerError, EcdsaSignature};
pub use types::*;
