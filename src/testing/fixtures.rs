//! Test fixtures providing pre-built test objects
//!
//! Native payloads and the canonical results they normalize to are kept side
//! by side so tests can compare against a known-good value.

use crate::passkey::response::{
    NativeAssertion, NativeAssertionResponse, NativeAttestation, NativeRegistration,
};
use crate::passkey::{PasskeySettings, PasskeyUser, Platform, PlatformInfo};
use crate::settings::Settings;
use crate::webauthn::{
    AuthenticationResult, AuthenticatorAssertionResponse, AuthenticatorAttestationResponse,
    CeremonyKind, RegistrationResult,
};

use super::constants::{
    TEST_CREDENTIAL_ID, TEST_CREDENTIAL_ID_BASE64, TEST_RP_ID, TEST_RP_NAME, TEST_USER_DISPLAY_NAME,
    TEST_USER_ID, TEST_USER_NAME,
};

/// DER signature with a 33-byte `r` (leading zero pad) and a 32-byte `s`
pub const SAMPLE_DER_SIGNATURE_HEX: &str = "3045022100801111111111111111111111111111111111111111111111111111111111111102202222222222222222222222222222222222222222222222222222222222222222";

/// [`SAMPLE_DER_SIGNATURE_HEX`] as unpadded base64url
pub const SAMPLE_DER_SIGNATURE_BASE64URL: &str =
    "MEUCIQCAEREREREREREREREREREREREREREREREREREREREREQIgIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiI";

/// [`SAMPLE_DER_SIGNATURE_HEX`] as padded standard base64
pub const SAMPLE_DER_SIGNATURE_BASE64: &str =
    "MEUCIQCAEREREREREREREREREREREREREREREREREREREREREQIgIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiIiI=";

/// Expected `r` of the sample signature, leading zero removed
pub const SAMPLE_SIGNATURE_R: &str =
    "8011111111111111111111111111111111111111111111111111111111111111";

/// Expected `s` of the sample signature
pub const SAMPLE_SIGNATURE_S: &str =
    "2222222222222222222222222222222222222222222222222222222222222222";

const CREATE_CLIENT_DATA_BASE64: &str = "eyJ0eXBlIjoid2ViYXV0aG4uY3JlYXRlIn0=";
const GET_CLIENT_DATA_BASE64: &str = "eyJ0eXBlIjoid2ViYXV0aG4uZ2V0In0=";
const ATTESTATION_OBJECT_BASE64: &str = "o2NmbXRkbm9uZQ==";
const AUTHENTICATOR_DATA_BASE64: &str = "SZYN5YgO";
const USER_HANDLE_BASE64: &str = "YWxpY2U=";

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// A supported iOS device
    #[must_use]
    pub fn ios() -> PlatformInfo {
        PlatformInfo::new(Platform::Ios, "17.4.1")
    }

    /// A supported Android device
    #[must_use]
    pub fn android() -> PlatformInfo {
        PlatformInfo::new(Platform::Android, "34")
    }

    /// A platform that never supports passkeys
    #[must_use]
    pub fn unsupported() -> PlatformInfo {
        PlatformInfo::new(Platform::from_os_name("linux"), "6.8")
    }

    #[must_use]
    pub fn passkey_settings() -> PasskeySettings {
        PasskeySettings {
            rp_id: TEST_RP_ID.to_string(),
            rp_name: TEST_RP_NAME.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn settings() -> Settings {
        Settings {
            passkey: Self::passkey_settings(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn user() -> PasskeyUser {
        PasskeyUser::new(TEST_USER_ID, TEST_USER_NAME, TEST_USER_DISPLAY_NAME)
    }

    // =========================================================================
    // Authorization-Services payloads
    // =========================================================================

    #[must_use]
    pub fn native_registration() -> NativeRegistration {
        NativeRegistration {
            credential_id: TEST_CREDENTIAL_ID_BASE64.to_string(),
            response: NativeAttestation {
                raw_attestation_object: ATTESTATION_OBJECT_BASE64.to_string(),
                raw_client_data_json: CREATE_CLIENT_DATA_BASE64.to_string(),
            },
        }
    }

    #[must_use]
    pub fn native_assertion() -> NativeAssertion {
        NativeAssertion {
            credential_id: TEST_CREDENTIAL_ID_BASE64.to_string(),
            user_id: USER_HANDLE_BASE64.to_string(),
            response: NativeAssertionResponse {
                raw_authenticator_data: AUTHENTICATOR_DATA_BASE64.to_string(),
                raw_client_data_json: GET_CLIENT_DATA_BASE64.to_string(),
                signature: SAMPLE_DER_SIGNATURE_BASE64.to_string(),
            },
        }
    }

    // =========================================================================
    // Credential-Manager payloads
    // =========================================================================

    /// Registration response JSON as the credential manager reports it
    #[must_use]
    pub fn registration_response_json() -> String {
        serde_json::json!({
            "id": TEST_CREDENTIAL_ID,
            "rawId": TEST_CREDENTIAL_ID,
            "type": "public-key",
            "authenticatorAttachment": "platform",
            "response": {
                "clientDataJSON": CREATE_CLIENT_DATA_BASE64.trim_end_matches('='),
                "attestationObject": ATTESTATION_OBJECT_BASE64.trim_end_matches('='),
            },
            "clientExtensionResults": {}
        })
        .to_string()
    }

    /// Assertion response JSON as the credential manager reports it
    #[must_use]
    pub fn assertion_response_json() -> String {
        serde_json::json!({
            "id": TEST_CREDENTIAL_ID,
            "rawId": TEST_CREDENTIAL_ID,
            "type": "public-key",
            "response": {
                "clientDataJSON": GET_CLIENT_DATA_BASE64.trim_end_matches('='),
                "authenticatorData": AUTHENTICATOR_DATA_BASE64,
                "signature": SAMPLE_DER_SIGNATURE_BASE64URL,
                "userHandle": USER_HANDLE_BASE64.trim_end_matches('='),
            },
            "clientExtensionResults": {}
        })
        .to_string()
    }

    // =========================================================================
    // Canonical results
    // =========================================================================

    /// What either backend's registration payload normalizes to
    #[must_use]
    pub fn registration_result() -> RegistrationResult {
        RegistrationResult {
            id: TEST_CREDENTIAL_ID.to_string(),
            raw_id: TEST_CREDENTIAL_ID.to_string(),
            r#type: CeremonyKind::Create,
            response: AuthenticatorAttestationResponse {
                client_data_json: CREATE_CLIENT_DATA_BASE64.trim_end_matches('=').to_string(),
                attestation_object: ATTESTATION_OBJECT_BASE64.trim_end_matches('=').to_string(),
                transports: None,
            },
        }
    }

    /// What either backend's assertion payload normalizes to
    #[must_use]
    pub fn authentication_result() -> AuthenticationResult {
        AuthenticationResult {
            id: TEST_CREDENTIAL_ID.to_string(),
            raw_id: TEST_CREDENTIAL_ID.to_string(),
            r#type: CeremonyKind::Get,
            response: AuthenticatorAssertionResponse {
                client_data_json: GET_CLIENT_DATA_BASE64.trim_end_matches('=').to_string(),
                authenticator_data: AUTHENTICATOR_DATA_BASE64.to_string(),
                signature: SAMPLE_DER_SIGNATURE_BASE64URL.to_string(),
                user_handle: Some(USER_HANDLE_BASE64.trim_end_matches('=').to_string()),
            },
        }
    }
}
