//! `WebAuthn` core types
//!
//! Canonical request and result shapes exchanged with callers. Field names
//! follow the `WebAuthn` JSON serialization; every binary field is an unpadded
//! base64url string.

use serde::{Deserialize, Serialize};

/// The only credential type defined by `WebAuthn`
pub const PUBLIC_KEY_CREDENTIAL_TYPE: &str = "public-key";

/// COSE algorithm identifier for ES256 (ECDSA P-256 with SHA-256)
pub const COSE_ALG_ES256: i32 = -7;

/// `WebAuthn` relying party information
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RelyingParty {
    pub id: String,   // Domain name (e.g., "example.com")
    pub name: String, // Display name
}

/// `WebAuthn` user entity
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserEntity {
    pub id: String,   // Base64URL-encoded user handle
    pub name: String, // Username (e.g., email)
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// Public key credential parameters
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyCredentialParameters {
    #[serde(rename = "type")]
    pub r#type: String, // Always "public-key"
    pub alg: i32,       // Algorithm identifier (-7 for ES256, -257 for RS256)
}

impl PublicKeyCredentialParameters {
    #[must_use]
    pub fn es256() -> Self {
        Self {
            r#type: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
            alg: COSE_ALG_ES256,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthenticatorAttachment {
    Platform,
    CrossPlatform,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResidentKeyRequirement {
    Discouraged,
    Preferred,
    Required,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserVerificationRequirement {
    Required,
    #[default]
    Preferred,
    Discouraged,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttestationConveyance {
    #[default]
    None,
    Indirect,
    Direct,
    Enterprise,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticatorTransport {
    Usb,
    Ble,
    Nfc,
    Internal,
    Hybrid,
}

/// Authenticator selection criteria
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatorSelectionCriteria {
    #[serde(rename = "authenticatorAttachment")]
    pub authenticator_attachment: AuthenticatorAttachment,
    #[serde(rename = "residentKey")]
    pub resident_key: ResidentKeyRequirement,
    #[serde(rename = "requireResidentKey")]
    pub require_resident_key: bool,
    #[serde(rename = "userVerification")]
    pub user_verification: UserVerificationRequirement,
}

impl Default for AuthenticatorSelectionCriteria {
    /// Platform authenticator, discoverable credential, preferred verification
    fn default() -> Self {
        Self {
            authenticator_attachment: AuthenticatorAttachment::Platform,
            resident_key: ResidentKeyRequirement::Required,
            require_resident_key: true,
            user_verification: UserVerificationRequirement::Preferred,
        }
    }
}

/// Public key credential descriptor
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyCredentialDescriptor {
    #[serde(rename = "type")]
    pub r#type: String, // Always "public-key"
    pub id: String,     // Base64URL-encoded credential ID
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transports: Option<Vec<AuthenticatorTransport>>,
}

impl PublicKeyCredentialDescriptor {
    #[must_use]
    pub fn public_key(id: impl Into<String>, transports: Vec<AuthenticatorTransport>) -> Self {
        Self {
            r#type: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
            id: id.into(),
            transports: Some(transports),
        }
    }
}

/// Canonical registration request (`PublicKeyCredentialCreationOptions`)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegistrationOptions {
    pub challenge: String, // Base64URL-encoded challenge
    pub rp: RelyingParty,
    pub user: UserEntity,
    #[serde(rename = "pubKeyCredParams")]
    pub public_key_params: Vec<PublicKeyCredentialParameters>,
    #[serde(rename = "authenticatorSelection")]
    pub authenticator_selection: AuthenticatorSelectionCriteria,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attestation: Option<AttestationConveyance>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timeout: Option<u32>, // Milliseconds, advisory
    #[serde(
        rename = "excludeCredentials",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub exclude_credentials: Option<Vec<PublicKeyCredentialDescriptor>>,
}

/// Canonical authentication request (`PublicKeyCredentialRequestOptions`)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthenticationOptions {
    pub challenge: String, // Base64URL-encoded challenge
    #[serde(rename = "rpId")]
    pub rp_id: String,
    #[serde(
        rename = "allowCredentials",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub allow_credentials: Option<Vec<PublicKeyCredentialDescriptor>>,
    #[serde(rename = "userVerification")]
    pub user_verification: UserVerificationRequirement,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timeout: Option<u32>,
}

/// Discriminant attached to every normalized result
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CeremonyKind {
    #[serde(rename = "webauthn.create")]
    Create,
    #[serde(rename = "webauthn.get")]
    Get,
}

impl CeremonyKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CeremonyKind::Create => "webauthn.create",
            CeremonyKind::Get => "webauthn.get",
        }
    }
}

/// Normalized registration result
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegistrationResult {
    pub id: String, // Base64URL-encoded credential ID
    #[serde(rename = "rawId")]
    pub raw_id: String, // Always equal to `id`
    #[serde(rename = "type")]
    pub r#type: CeremonyKind,
    pub response: AuthenticatorAttestationResponse,
}

/// Normalized authentication result
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthenticationResult {
    pub id: String,
    #[serde(rename = "rawId")]
    pub raw_id: String,
    #[serde(rename = "type")]
    pub r#type: CeremonyKind,
    pub response: AuthenticatorAssertionResponse,
}

/// Authenticator attestation response during registration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatorAttestationResponse {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String, // Base64URL-encoded client data JSON
    #[serde(rename = "attestationObject")]
    pub attestation_object: String, // Base64URL-encoded attestation object
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transports: Option<Vec<String>>,
}

/// Authenticator assertion response during authentication
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatorAssertionResponse {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: String,
    pub signature: String, // Base64URL-encoded DER signature
    #[serde(rename = "userHandle", skip_serializing_if = "Option::is_none", default)]
    pub user_handle: Option<String>,
}
