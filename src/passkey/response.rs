//! Native result normalization
//!
//! Both native layers hand back credentials in their own shape. The
//! functions here produce the canonical [`RegistrationResult`] and
//! [`AuthenticationResult`]: base64url binary fields, `rawId == id`, and the
//! ceremony discriminant in `type`. A binary field that does not decode makes
//! the whole result unusable.

use serde::{Deserialize, Serialize};

use super::errors::PasskeyError;
use crate::webauthn::codec;
use crate::webauthn::{
    AuthenticationResult, AuthenticatorAssertionResponse, AuthenticatorAttestationResponse,
    CeremonyKind, RegistrationResult,
};

// =============================================================================
// Authorization-Services results (padded standard base64)
// =============================================================================

/// Registration result reported by the authorization-services layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeRegistration {
    #[serde(rename = "credentialID")]
    pub credential_id: String,
    pub response: NativeAttestation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeAttestation {
    pub raw_attestation_object: String,
    #[serde(rename = "rawClientDataJSON")]
    pub raw_client_data_json: String,
}

/// Assertion result reported by the authorization-services layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeAssertion {
    #[serde(rename = "credentialID")]
    pub credential_id: String,
    /// User handle stored with the credential; empty when the OS omits it
    #[serde(rename = "userID", default)]
    pub user_id: String,
    pub response: NativeAssertionResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeAssertionResponse {
    pub raw_authenticator_data: String,
    #[serde(rename = "rawClientDataJSON")]
    pub raw_client_data_json: String,
    pub signature: String,
}

/// Normalize an authorization-services registration
///
/// # Errors
///
/// Returns `PasskeyError::RequestFailed` if the credential id or a response
/// field is empty or not base64.
pub fn normalize_native_registration(
    native: &NativeRegistration,
) -> Result<RegistrationResult, PasskeyError> {
    let id = required(&native.credential_id)?;
    Ok(RegistrationResult {
        raw_id: id.clone(),
        id,
        r#type: CeremonyKind::Create,
        response: AuthenticatorAttestationResponse {
            client_data_json: required(&native.response.raw_client_data_json)?,
            attestation_object: required(&native.response.raw_attestation_object)?,
            transports: None,
        },
    })
}

/// Normalize an authorization-services assertion
///
/// # Errors
///
/// Returns `PasskeyError::RequestFailed` if the credential id, the user
/// handle or a response field is not base64, or if a required one is empty.
pub fn normalize_native_assertion(
    native: &NativeAssertion,
) -> Result<AuthenticationResult, PasskeyError> {
    let id = required(&native.credential_id)?;
    Ok(AuthenticationResult {
        raw_id: id.clone(),
        id,
        r#type: CeremonyKind::Get,
        response: AuthenticatorAssertionResponse {
            client_data_json: required(&native.response.raw_client_data_json)?,
            authenticator_data: required(&native.response.raw_authenticator_data)?,
            signature: required(&native.response.signature)?,
            user_handle: optional(&native.user_id)?,
        },
    })
}

// =============================================================================
// Credential-Manager results (WebAuthn response JSON)
// =============================================================================

#[derive(Debug, Deserialize)]
struct JsonRegistration {
    id: String,
    response: JsonAttestation,
}

#[derive(Debug, Deserialize)]
struct JsonAttestation {
    #[serde(rename = "clientDataJSON")]
    client_data_json: String,
    #[serde(rename = "attestationObject")]
    attestation_object: String,
    #[serde(default)]
    transports: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct JsonAssertion {
    id: String,
    response: JsonAssertionResponse,
}

#[derive(Debug, Deserialize)]
struct JsonAssertionResponse {
    #[serde(rename = "clientDataJSON")]
    client_data_json: String,
    #[serde(rename = "authenticatorData")]
    authenticator_data: String,
    signature: String,
    #[serde(rename = "userHandle", default)]
    user_handle: Option<String>,
}

/// Normalize a credential-manager registration response
///
/// Unknown fields (`rawId`, `authenticatorAttachment`, extensions, ...) are
/// ignored; `rawId` is always rebuilt from `id`.
///
/// # Errors
///
/// Returns `PasskeyError::RequestFailed` if the JSON is malformed, a required
/// field is missing or empty, or a binary field is not base64url.
pub fn normalize_json_registration(json: &str) -> Result<RegistrationResult, PasskeyError> {
    let parsed: JsonRegistration = parse(json)?;
    let id = required(&parsed.id)?;
    Ok(RegistrationResult {
        raw_id: id.clone(),
        id,
        r#type: CeremonyKind::Create,
        response: AuthenticatorAttestationResponse {
            client_data_json: required(&parsed.response.client_data_json)?,
            attestation_object: required(&parsed.response.attestation_object)?,
            transports: parsed.response.transports,
        },
    })
}

/// Normalize a credential-manager assertion response
///
/// # Errors
///
/// Returns `PasskeyError::RequestFailed` if the JSON is malformed, a required
/// field is missing or empty, or a binary field is not base64url.
pub fn normalize_json_assertion(json: &str) -> Result<AuthenticationResult, PasskeyError> {
    let parsed: JsonAssertion = parse(json)?;
    let id = required(&parsed.id)?;
    Ok(AuthenticationResult {
        raw_id: id.clone(),
        id,
        r#type: CeremonyKind::Get,
        response: AuthenticatorAssertionResponse {
            client_data_json: required(&parsed.response.client_data_json)?,
            authenticator_data: required(&parsed.response.authenticator_data)?,
            signature: required(&parsed.response.signature)?,
            user_handle: match parsed.response.user_handle.as_deref() {
                Some(value) => optional(value)?,
                None => None,
            },
        },
    })
}

fn parse<'a, T: Deserialize<'a>>(json: &'a str) -> Result<T, PasskeyError> {
    serde_json::from_str(json).map_err(|e| {
        log::debug!("Credential response JSON rejected: {e}");
        PasskeyError::RequestFailed
    })
}

// Accepts either alphabet, padded or not, and returns unpadded base64url
fn required(value: &str) -> Result<String, PasskeyError> {
    if value.is_empty() {
        return Err(PasskeyError::RequestFailed);
    }
    let encoded = codec::base64_to_base64url(value);
    codec::base64url_to_bytes(&encoded).map_err(|e| {
        log::debug!("Credential field is not base64: {e}");
        PasskeyError::RequestFailed
    })?;
    Ok(encoded)
}

fn optional(value: &str) -> Result<Option<String>, PasskeyError> {
    if value.is_empty() {
        return Ok(None);
    }
    required(value).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native_registration() -> NativeRegistration {
        NativeRegistration {
            credential_id: "q+/w==".to_string(),
            response: NativeAttestation {
                raw_attestation_object: "o2NmbXRkbm9uZQ==".to_string(),
                raw_client_data_json: "eyJ0eXBlIjoid2ViYXV0aG4uY3JlYXRlIn0=".to_string(),
            },
        }
    }

    #[test]
    fn test_native_registration_is_reencoded() {
        let result = normalize_native_registration(&native_registration()).unwrap();

        assert_eq!(result.id, "q-_w");
        assert_eq!(result.raw_id, result.id);
        assert_eq!(result.r#type, CeremonyKind::Create);
        assert_eq!(result.response.attestation_object, "o2NmbXRkbm9uZQ");
        assert_eq!(
            result.response.client_data_json,
            "eyJ0eXBlIjoid2ViYXV0aG4uY3JlYXRlIn0"
        );
        assert_eq!(result.response.transports, None);
    }

    #[test]
    fn test_native_registration_deserializes_bridge_payload() {
        let native: NativeRegistration = serde_json::from_str(
            r#"{
                "credentialID": "q+/w==",
                "response": {
                    "rawAttestationObject": "o2NmbXRkbm9uZQ==",
                    "rawClientDataJSON": "eyJ0eXBlIjoid2ViYXV0aG4uY3JlYXRlIn0="
                }
            }"#,
        )
        .unwrap();
        assert_eq!(native, native_registration());
    }

    #[test]
    fn test_native_registration_with_empty_field_fails() {
        let mut native = native_registration();
        native.response.raw_attestation_object.clear();
        assert_eq!(
            normalize_native_registration(&native),
            Err(PasskeyError::RequestFailed)
        );
    }

    #[test]
    fn test_native_registration_with_undecodable_field_fails() {
        let mut native = native_registration();
        native.credential_id = "not base64 at all!".to_string();
        assert_eq!(
            normalize_native_registration(&native),
            Err(PasskeyError::RequestFailed)
        );

        let mut native = native_registration();
        native.response.raw_client_data_json = "e30=%".to_string();
        assert_eq!(
            normalize_native_registration(&native),
            Err(PasskeyError::RequestFailed)
        );
    }

    #[test]
    fn test_native_assertion_with_undecodable_user_handle_fails() {
        let native = NativeAssertion {
            credential_id: "q+/w".to_string(),
            user_id: "alice@wallet".to_string(),
            response: NativeAssertionResponse {
                raw_authenticator_data: "SZYN5YgO".to_string(),
                raw_client_data_json: "e30=".to_string(),
                signature: "MEUCIQ".to_string(),
            },
        };
        assert_eq!(
            normalize_native_assertion(&native),
            Err(PasskeyError::RequestFailed)
        );
    }

    #[test]
    fn test_native_assertion() {
        let native = NativeAssertion {
            credential_id: "q+/w".to_string(),
            user_id: "YWxpY2U=".to_string(),
            response: NativeAssertionResponse {
                raw_authenticator_data: "SZYN5YgO".to_string(),
                raw_client_data_json: "e30=".to_string(),
                signature: "MEUCIQ+/".to_string(),
            },
        };

        let result = normalize_native_assertion(&native).unwrap();
        assert_eq!(result.id, "q-_w");
        assert_eq!(result.raw_id, "q-_w");
        assert_eq!(result.r#type, CeremonyKind::Get);
        assert_eq!(result.response.client_data_json, "e30");
        assert_eq!(result.response.signature, "MEUCIQ-_");
        assert_eq!(result.response.user_handle.as_deref(), Some("YWxpY2U"));
    }

    #[test]
    fn test_native_assertion_without_user_handle() {
        let native: NativeAssertion = serde_json::from_str(
            r#"{
                "credentialID": "q-_w",
                "response": {
                    "rawAuthenticatorData": "SZYN5YgO",
                    "rawClientDataJSON": "e30=",
                    "signature": "MEUCIQ"
                }
            }"#,
        )
        .unwrap();
        let result = normalize_native_assertion(&native).unwrap();
        assert_eq!(result.response.user_handle, None);
    }

    #[test]
    fn test_json_registration_adds_raw_id_and_tolerates_extra_fields() {
        let json = r#"{
            "id": "Y3JlZDE",
            "rawId": "something-else",
            "type": "public-key",
            "authenticatorAttachment": "platform",
            "clientExtensionResults": {},
            "response": {
                "clientDataJSON": "e30",
                "attestationObject": "o2NmbXRkbm9uZQ",
                "transports": ["internal", "hybrid"],
                "publicKeyAlgorithm": -7
            }
        }"#;

        let result = normalize_json_registration(json).unwrap();
        assert_eq!(result.id, "Y3JlZDE");
        assert_eq!(result.raw_id, "Y3JlZDE");
        assert_eq!(result.r#type, CeremonyKind::Create);
        assert_eq!(
            result.response.transports,
            Some(vec!["internal".to_string(), "hybrid".to_string()])
        );
    }

    #[test]
    fn test_json_assertion() {
        let json = r#"{
            "id": "Y3JlZDE",
            "type": "public-key",
            "response": {
                "clientDataJSON": "e30",
                "authenticatorData": "SZYN5YgO",
                "signature": "MEUCIQ",
                "userHandle": "YWxpY2U"
            }
        }"#;

        let result = normalize_json_assertion(json).unwrap();
        assert_eq!(result.raw_id, result.id);
        assert_eq!(result.r#type, CeremonyKind::Get);
        assert_eq!(result.response.signature, "MEUCIQ");
        assert_eq!(result.response.user_handle.as_deref(), Some("YWxpY2U"));
    }

    #[test]
    fn test_json_with_undecodable_field_is_request_failed() {
        assert_eq!(
            normalize_json_registration(
                r#"{"id":"Y3JlZDE","response":{"clientDataJSON":"e30","attestationObject":"%%%"}}"#
            ),
            Err(PasskeyError::RequestFailed)
        );
        assert_eq!(
            normalize_json_registration(
                r#"{"id":"not base64 at all!","response":{"clientDataJSON":"e30","attestationObject":"o2NmbXRkbm9uZQ"}}"#
            ),
            Err(PasskeyError::RequestFailed)
        );
        assert_eq!(
            normalize_json_assertion(
                r#"{"id":"Y3JlZDE","response":{"clientDataJSON":"e30","authenticatorData":"SZYN5YgO","signature":"MEUCIQ","userHandle":"a b"}}"#
            ),
            Err(PasskeyError::RequestFailed)
        );
    }

    #[test]
    fn test_malformed_json_is_request_failed() {
        assert_eq!(
            normalize_json_registration("not json"),
            Err(PasskeyError::RequestFailed)
        );
        assert_eq!(
            normalize_json_registration(r#"{"id": "Y3JlZDE", "response": {}}"#),
            Err(PasskeyError::RequestFailed)
        );
        assert_eq!(
            normalize_json_assertion(r#"{"response": {"clientDataJSON": "e30"}}"#),
            Err(PasskeyError::RequestFailed)
        );
    }
}
