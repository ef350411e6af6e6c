//! Canonical request construction
//!
//! Turns a caller's user, hex challenge and optional overrides into the
//! canonical `WebAuthn` creation/request options. Defaults come from
//! [`PasskeySettings`]; any override that is present replaces the default for
//! its field wholesale. Nested defaults are never merged.

use serde::{Deserialize, Serialize};

use super::errors::PasskeyError;
use super::settings::PasskeySettings;
use crate::webauthn::codec;
use crate::webauthn::{
    AttestationConveyance, AuthenticationOptions, AuthenticatorSelectionCriteria,
    AuthenticatorTransport, PublicKeyCredentialDescriptor, PublicKeyCredentialParameters,
    RegistrationOptions, RelyingParty, UserEntity, UserVerificationRequirement,
};

/// Upper bound on a `WebAuthn` user handle, in bytes
pub const MAX_USER_ID_BYTES: usize = 64;

/// The subject of a new credential, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyUser {
    /// Application user handle; its UTF-8 bytes become `user.id`
    pub id: String,
    pub name: String,
    pub display_name: String,
}

impl PasskeyUser {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_name: display_name.into(),
        }
    }
}

/// Which kind of authenticator the caller expects to hold the credential
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticatorType {
    #[default]
    Auto,
    Local,
    Extern,
    Roaming,
    Both,
}

impl AuthenticatorType {
    /// Transports advertised on allowed credentials for this hint
    #[must_use]
    pub fn transports(self) -> Vec<AuthenticatorTransport> {
        use AuthenticatorTransport::{Ble, Hybrid, Internal, Nfc, Usb};

        match self {
            AuthenticatorType::Local | AuthenticatorType::Auto => vec![Internal],
            AuthenticatorType::Roaming | AuthenticatorType::Extern => vec![Hybrid, Usb, Ble, Nfc],
            AuthenticatorType::Both => vec![Internal, Hybrid, Usb, Ble, Nfc],
        }
    }
}

/// Text form of the credential ids handed to `authenticate`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialIdEncoding {
    /// Already canonical, as returned in a registration result
    #[default]
    Base64Url,
    /// Hex, optionally `0x` prefixed
    Hex,
}

/// Caller overrides for registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateOverrides {
    pub rp: Option<RelyingParty>,
    pub pub_key_cred_params: Option<Vec<PublicKeyCredentialParameters>>,
    pub authenticator_selection: Option<AuthenticatorSelectionCriteria>,
    pub attestation: Option<AttestationConveyance>,
    pub timeout: Option<u32>,
    pub exclude_credentials: Option<Vec<PublicKeyCredentialDescriptor>>,
    /// Use a roaming security key rather than the platform authenticator
    pub with_security_key: bool,
}

/// Caller overrides for authentication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthenticationOverrides {
    pub rp_id: Option<String>,
    pub user_verification: Option<UserVerificationRequirement>,
    pub timeout: Option<u32>,
    pub authenticator_type: AuthenticatorType,
    pub credential_encoding: CredentialIdEncoding,
    pub with_security_key: bool,
}

/// A registration request ready for a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub options: RegistrationOptions,
    pub with_security_key: bool,
}

/// An authentication request ready for a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationRequest {
    pub options: AuthenticationOptions,
    pub with_security_key: bool,
}

/// Builds canonical requests from settings-provided defaults
pub struct RequestBuilder<'a> {
    settings: &'a PasskeySettings,
}

impl<'a> RequestBuilder<'a> {
    #[must_use]
    pub fn new(settings: &'a PasskeySettings) -> Self {
        Self { settings }
    }

    /// Build registration options for a new credential
    ///
    /// # Errors
    ///
    /// Returns `PasskeyError::InvalidChallenge` if the challenge is not hex and
    /// `PasskeyError::InvalidUserId` if the user id is empty or longer than
    /// [`MAX_USER_ID_BYTES`].
    pub fn build_create_request(
        &self,
        user: &PasskeyUser,
        challenge_hex: &str,
        overrides: CreateOverrides,
    ) -> Result<CreateRequest, PasskeyError> {
        let challenge = encode_challenge(challenge_hex)?;
        let user = UserEntity {
            id: encode_user_id(&user.id)?,
            name: user.name.clone(),
            display_name: user.display_name.clone(),
        };

        let options = RegistrationOptions {
            challenge,
            rp: overrides
                .rp
                .unwrap_or_else(|| self.settings.relying_party()),
            user,
            public_key_params: overrides
                .pub_key_cred_params
                .unwrap_or_else(|| vec![PublicKeyCredentialParameters::es256()]),
            authenticator_selection: overrides.authenticator_selection.unwrap_or_else(|| {
                AuthenticatorSelectionCriteria {
                    user_verification: self.settings.user_verification,
                    ..Default::default()
                }
            }),
            attestation: Some(overrides.attestation.unwrap_or(self.settings.attestation)),
            timeout: Some(overrides.timeout.unwrap_or(self.settings.timeout_millis())),
            exclude_credentials: overrides.exclude_credentials,
        };

        Ok(CreateRequest {
            options,
            with_security_key: overrides.with_security_key,
        })
    }

    /// Build authentication options for the given credentials
    ///
    /// An empty credential list leaves `allowCredentials` unset so that any
    /// discoverable credential for the relying party can answer.
    ///
    /// # Errors
    ///
    /// Returns `PasskeyError::InvalidChallenge` if the challenge is not hex, or
    /// if a credential id does not match the declared encoding.
    pub fn build_authentication_request(
        &self,
        credential_ids: &[String],
        challenge_hex: &str,
        overrides: AuthenticationOverrides,
    ) -> Result<AuthenticationRequest, PasskeyError> {
        let challenge = encode_challenge(challenge_hex)?;

        let transports = overrides.authenticator_type.transports();
        let allow_credentials = credential_ids
            .iter()
            .map(|id| {
                let id = encode_credential_id(id, overrides.credential_encoding)?;
                Ok(PublicKeyCredentialDescriptor::public_key(
                    id,
                    transports.clone(),
                ))
            })
            .collect::<Result<Vec<_>, PasskeyError>>()?;

        let options = AuthenticationOptions {
            challenge,
            rp_id: overrides
                .rp_id
                .unwrap_or_else(|| self.settings.rp_id.clone()),
            allow_credentials: (!allow_credentials.is_empty()).then_some(allow_credentials),
            user_verification: overrides
                .user_verification
                .unwrap_or(self.settings.user_verification),
            timeout: Some(overrides.timeout.unwrap_or(self.settings.timeout_millis())),
        };

        Ok(AuthenticationRequest {
            options,
            with_security_key: overrides.with_security_key,
        })
    }
}

fn encode_challenge(challenge_hex: &str) -> Result<String, PasskeyError> {
    codec::hex_to_base64url(challenge_hex).map_err(|_| PasskeyError::InvalidChallenge)
}

fn encode_user_id(user_id: &str) -> Result<String, PasskeyError> {
    if user_id.is_empty() || user_id.len() > MAX_USER_ID_BYTES {
        return Err(PasskeyError::InvalidUserId);
    }
    Ok(codec::bytes_to_base64url(user_id.as_bytes()))
}

// Undecodable credential ids are classified as a bad challenge, matching the
// native layers.
fn encode_credential_id(id: &str, encoding: CredentialIdEncoding) -> Result<String, PasskeyError> {
    match encoding {
        CredentialIdEncoding::Base64Url => codec::base64url_to_bytes(id)
            .map(|_| codec::base64_to_base64url(id))
            .map_err(|_| PasskeyError::InvalidChallenge),
        CredentialIdEncoding::Hex => {
            codec::hex_to_base64url(id).map_err(|_| PasskeyError::InvalidChallenge)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webauthn::{AuthenticatorAttachment, ResidentKeyRequirement, COSE_ALG_ES256};

    fn settings() -> PasskeySettings {
        PasskeySettings {
            rp_id: "wallet.example".to_string(),
            rp_name: "Wallet".to_string(),
            ..Default::default()
        }
    }

    fn alice() -> PasskeyUser {
        PasskeyUser::new("alice", "alice@wallet.example", "Alice")
    }

    #[test]
    fn test_create_request_defaults() {
        let settings = settings();
        let request = RequestBuilder::new(&settings)
            .build_create_request(&alice(), "0xdeadbeef", CreateOverrides::default())
            .unwrap();
        let options = request.options;

        assert_eq!(options.challenge, "3q2-7w");
        assert_eq!(options.rp.id, "wallet.example");
        assert_eq!(options.rp.name, "Wallet");
        assert_eq!(options.user.id, "YWxpY2U");
        assert_eq!(options.user.display_name, "Alice");
        assert_eq!(options.public_key_params.len(), 1);
        assert_eq!(options.public_key_params[0].alg, COSE_ALG_ES256);
        assert_eq!(options.public_key_params[0].r#type, "public-key");

        let selection = options.authenticator_selection;
        assert_eq!(selection.authenticator_attachment, AuthenticatorAttachment::Platform);
        assert_eq!(selection.resident_key, ResidentKeyRequirement::Required);
        assert!(selection.require_resident_key);
        assert_eq!(selection.user_verification, UserVerificationRequirement::Preferred);

        assert_eq!(options.attestation, Some(AttestationConveyance::None));
        assert_eq!(options.timeout, Some(60_000));
        assert_eq!(options.exclude_credentials, None);
        assert!(!request.with_security_key);
    }

    #[test]
    fn test_configured_user_verification_reaches_both_ceremonies() {
        let settings = PasskeySettings {
            user_verification: UserVerificationRequirement::Required,
            ..settings()
        };
        let builder = RequestBuilder::new(&settings);

        let create = builder
            .build_create_request(&alice(), "00", CreateOverrides::default())
            .unwrap();
        let selection = create.options.authenticator_selection;
        assert_eq!(selection.user_verification, UserVerificationRequirement::Required);
        assert_eq!(selection.authenticator_attachment, AuthenticatorAttachment::Platform);
        assert!(selection.require_resident_key);

        let authenticate = builder
            .build_authentication_request(&[], "00", AuthenticationOverrides::default())
            .unwrap();
        assert_eq!(
            authenticate.options.user_verification,
            UserVerificationRequirement::Required
        );
    }

    #[test]
    fn test_create_overrides_replace_whole_fields() {
        let settings = settings();
        let overrides = CreateOverrides {
            authenticator_selection: Some(AuthenticatorSelectionCriteria {
                authenticator_attachment: AuthenticatorAttachment::CrossPlatform,
                resident_key: ResidentKeyRequirement::Discouraged,
                require_resident_key: false,
                user_verification: UserVerificationRequirement::Required,
            }),
            pub_key_cred_params: Some(vec![PublicKeyCredentialParameters {
                r#type: "public-key".to_string(),
                alg: -257,
            }]),
            timeout: Some(5_000),
            with_security_key: true,
            ..Default::default()
        };

        let request = RequestBuilder::new(&settings)
            .build_create_request(&alice(), "deadbeef", overrides)
            .unwrap();
        let options = request.options;

        assert_eq!(
            options.authenticator_selection.resident_key,
            ResidentKeyRequirement::Discouraged
        );
        assert!(!options.authenticator_selection.require_resident_key);
        assert_eq!(options.public_key_params[0].alg, -257);
        assert_eq!(options.timeout, Some(5_000));
        // Untouched fields keep their defaults
        assert_eq!(options.rp.id, "wallet.example");
        assert!(request.with_security_key);
    }

    #[test]
    fn test_create_overrides_deserialize_from_camel_case_json() {
        let overrides: CreateOverrides = serde_json::from_str(
            r#"{ "rp": { "id": "other.example", "name": "Other" }, "attestation": "direct" }"#,
        )
        .unwrap();
        assert_eq!(overrides.rp.unwrap().id, "other.example");
        assert_eq!(overrides.attestation, Some(AttestationConveyance::Direct));
        assert!(overrides.authenticator_selection.is_none());
    }

    #[test]
    fn test_create_rejects_invalid_challenge() {
        let settings = settings();
        let builder = RequestBuilder::new(&settings);
        for challenge in ["", "0x", "abc", "not-hex"] {
            assert_eq!(
                builder.build_create_request(&alice(), challenge, CreateOverrides::default()),
                Err(PasskeyError::InvalidChallenge)
            );
        }
    }

    #[test]
    fn test_create_rejects_invalid_user_id() {
        let settings = settings();
        let builder = RequestBuilder::new(&settings);

        let empty = PasskeyUser::new("", "n", "d");
        assert_eq!(
            builder.build_create_request(&empty, "00", CreateOverrides::default()),
            Err(PasskeyError::InvalidUserId)
        );

        let long = PasskeyUser::new("x".repeat(MAX_USER_ID_BYTES + 1), "n", "d");
        assert_eq!(
            builder.build_create_request(&long, "00", CreateOverrides::default()),
            Err(PasskeyError::InvalidUserId)
        );

        let limit = PasskeyUser::new("x".repeat(MAX_USER_ID_BYTES), "n", "d");
        assert!(builder
            .build_create_request(&limit, "00", CreateOverrides::default())
            .is_ok());
    }

    #[test]
    fn test_authentication_request_defaults() {
        let settings = settings();
        let request = RequestBuilder::new(&settings)
            .build_authentication_request(
                &["Y3JlZDE".to_string()],
                "0xdeadbeef",
                AuthenticationOverrides::default(),
            )
            .unwrap();
        let options = request.options;

        assert_eq!(options.challenge, "3q2-7w");
        assert_eq!(options.rp_id, "wallet.example");
        assert_eq!(options.user_verification, UserVerificationRequirement::Preferred);
        assert_eq!(options.timeout, Some(60_000));

        let allowed = options.allow_credentials.unwrap();
        assert_eq!(allowed.len(), 1);
        assert_eq!(allowed[0].id, "Y3JlZDE");
        assert_eq!(allowed[0].r#type, "public-key");
        assert_eq!(allowed[0].transports, Some(vec![AuthenticatorTransport::Internal]));
    }

    #[test]
    fn test_transports_follow_authenticator_type() {
        use AuthenticatorTransport::{Ble, Hybrid, Internal, Nfc, Usb};

        assert_eq!(AuthenticatorType::Local.transports(), vec![Internal]);
        assert_eq!(AuthenticatorType::Auto.transports(), vec![Internal]);
        assert_eq!(AuthenticatorType::Roaming.transports(), vec![Hybrid, Usb, Ble, Nfc]);
        assert_eq!(AuthenticatorType::Extern.transports(), vec![Hybrid, Usb, Ble, Nfc]);
        assert_eq!(
            AuthenticatorType::Both.transports(),
            vec![Internal, Hybrid, Usb, Ble, Nfc]
        );

        let settings = settings();
        let request = RequestBuilder::new(&settings)
            .build_authentication_request(
                &["Y3JlZDE".to_string(), "Y3JlZDI".to_string()],
                "00",
                AuthenticationOverrides {
                    authenticator_type: AuthenticatorType::Roaming,
                    ..Default::default()
                },
            )
            .unwrap();
        for descriptor in request.options.allow_credentials.unwrap() {
            assert_eq!(descriptor.transports, Some(vec![Hybrid, Usb, Ble, Nfc]));
        }
    }

    #[test]
    fn test_empty_credential_list_leaves_allow_credentials_unset() {
        let settings = settings();
        let request = RequestBuilder::new(&settings)
            .build_authentication_request(&[], "00", AuthenticationOverrides::default())
            .unwrap();
        assert_eq!(request.options.allow_credentials, None);
    }

    #[test]
    fn test_hex_credential_ids_are_converted() {
        let settings = settings();
        let request = RequestBuilder::new(&settings)
            .build_authentication_request(
                &["0xdeadbeef".to_string()],
                "00",
                AuthenticationOverrides {
                    credential_encoding: CredentialIdEncoding::Hex,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(request.options.allow_credentials.unwrap()[0].id, "3q2-7w");
    }

    #[test]
    fn test_malformed_credential_ids_are_rejected() {
        let settings = settings();
        let builder = RequestBuilder::new(&settings);

        let hex = AuthenticationOverrides {
            credential_encoding: CredentialIdEncoding::Hex,
            ..Default::default()
        };
        assert_eq!(
            builder.build_authentication_request(&["cred1".to_string()], "00", hex),
            Err(PasskeyError::InvalidChallenge)
        );

        assert_eq!(
            builder.build_authentication_request(
                &["not base64!".to_string()],
                "00",
                AuthenticationOverrides::default()
            ),
            Err(PasskeyError::InvalidChallenge)
        );
    }

    #[test]
    fn test_authentication_rejects_invalid_challenge() {
        let settings = settings();
        assert_eq!(
            RequestBuilder::new(&settings).build_authentication_request(
                &[],
                "0xdeadbee",
                AuthenticationOverrides::default()
            ),
            Err(PasskeyError::InvalidChallenge)
        );
    }

    #[test]
    fn test_authentication_overrides() {
        let settings = settings();
        let request = RequestBuilder::new(&settings)
            .build_authentication_request(
                &[],
                "00",
                AuthenticationOverrides {
                    rp_id: Some("other.example".to_string()),
                    user_verification: Some(UserVerificationRequirement::Required),
                    timeout: Some(1_000),
                    with_security_key: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(request.options.rp_id, "other.example");
        assert_eq!(
            request.options.user_verification,
            UserVerificationRequirement::Required
        );
        assert_eq!(request.options.timeout, Some(1_000));
        assert!(request.with_security_key);
    }
}
