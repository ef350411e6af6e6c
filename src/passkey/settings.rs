//! Passkey settings
//!
//! Relying-party identity and request defaults. These are deployment values,
//! so they live in configuration rather than in the request builder.

use serde::{Deserialize, Serialize};

use crate::webauthn::{AttestationConveyance, RelyingParty, UserVerificationRequirement};

/// Passkey settings for `WebAuthn` requests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PasskeySettings {
    pub rp_id: String,
    pub rp_name: String,
    /// Advisory ceremony timeout passed to the native layer
    pub timeout_seconds: u64,
    pub user_verification: UserVerificationRequirement,
    pub attestation: AttestationConveyance,
}

impl Default for PasskeySettings {
    fn default() -> Self {
        Self {
            rp_id: "localhost".to_string(),
            rp_name: "Passkey Bridge".to_string(),
            timeout_seconds: 60,
            user_verification: UserVerificationRequirement::Preferred,
            attestation: AttestationConveyance::None,
        }
    }
}

impl PasskeySettings {
    /// The default relying party for registration requests
    #[must_use]
    pub fn relying_party(&self) -> RelyingParty {
        RelyingParty {
            id: self.rp_id.clone(),
            name: self.rp_name.clone(),
        }
    }

    /// Timeout in milliseconds, saturating at `u32::MAX`
    #[must_use]
    pub fn timeout_millis(&self) -> u32 {
        u32::try_from(self.timeout_seconds.saturating_mul(1000)).unwrap_or(u32::MAX)
    }
}
