//! Authorization-Services style backend
//!
//! The native layer takes discrete arguments with every binary value as
//! padded standard base64 and reports results the same way.

use async_trait::async_trait;
use std::sync::Arc;

use super::{malformed_result, native_failure, PasskeyBackend};
use crate::passkey::errors::{NativeErrorSignal, PasskeyError};
use crate::passkey::request::{AuthenticationRequest, CreateRequest};
use crate::passkey::response::{
    normalize_native_assertion, normalize_native_registration, NativeAssertion,
    NativeRegistration,
};
use crate::utils::logging::LoggingHelper;
use crate::webauthn::codec;
use crate::webauthn::{AuthenticationResult, CeremonyKind, RegistrationResult};

/// Arguments for a native registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRegistrationRequest {
    pub rp_id: String,
    pub challenge: String,
    pub display_name: String,
    pub user_id: String,
    pub excluded_credentials: Vec<String>,
    pub security_key: bool,
}

/// Arguments for a native assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationAssertionRequest {
    pub rp_id: String,
    pub challenge: String,
    pub allowed_credentials: Vec<String>,
    pub security_key: bool,
}

/// The native authorization-services ceremony
#[async_trait]
pub trait AuthorizationCeremony: Send + Sync {
    async fn register(
        &self,
        request: AuthorizationRegistrationRequest,
    ) -> Result<NativeRegistration, NativeErrorSignal>;

    async fn authenticate(
        &self,
        request: AuthorizationAssertionRequest,
    ) -> Result<NativeAssertion, NativeErrorSignal>;
}

pub struct AuthorizationServicesBackend {
    ceremony: Arc<dyn AuthorizationCeremony>,
}

impl AuthorizationServicesBackend {
    #[must_use]
    pub fn new(ceremony: Arc<dyn AuthorizationCeremony>) -> Self {
        Self { ceremony }
    }

    fn registration_request(
        request: &CreateRequest,
    ) -> Result<AuthorizationRegistrationRequest, PasskeyError> {
        let options = &request.options;
        let excluded_credentials = options
            .exclude_credentials
            .iter()
            .flatten()
            .map(|descriptor| to_base64(&descriptor.id, PasskeyError::InvalidChallenge))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AuthorizationRegistrationRequest {
            rp_id: options.rp.id.clone(),
            challenge: to_base64(&options.challenge, PasskeyError::InvalidChallenge)?,
            display_name: options.user.display_name.clone(),
            user_id: to_base64(&options.user.id, PasskeyError::InvalidUserId)?,
            excluded_credentials,
            security_key: request.with_security_key,
        })
    }

    fn assertion_request(
        request: &AuthenticationRequest,
    ) -> Result<AuthorizationAssertionRequest, PasskeyError> {
        let options = &request.options;
        let allowed_credentials = options
            .allow_credentials
            .iter()
            .flatten()
            .map(|descriptor| to_base64(&descriptor.id, PasskeyError::InvalidChallenge))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AuthorizationAssertionRequest {
            rp_id: options.rp_id.clone(),
            challenge: to_base64(&options.challenge, PasskeyError::InvalidChallenge)?,
            allowed_credentials,
            security_key: request.with_security_key,
        })
    }
}

#[async_trait]
impl PasskeyBackend for AuthorizationServicesBackend {
    fn name(&self) -> &'static str {
        "authorization-services"
    }

    async fn register(&self, request: &CreateRequest) -> Result<RegistrationResult, PasskeyError> {
        let native_request = Self::registration_request(request)?;
        LoggingHelper::log_ceremony_started(CeremonyKind::Create, self.name());

        let native = self
            .ceremony
            .register(native_request)
            .await
            .map_err(|signal| native_failure(CeremonyKind::Create, &signal))?;

        normalize_native_registration(&native)
            .map_err(|e| malformed_result(CeremonyKind::Create, e))
    }

    async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AuthenticationResult, PasskeyError> {
        let native_request = Self::assertion_request(request)?;
        LoggingHelper::log_ceremony_started(CeremonyKind::Get, self.name());

        let native = self
            .ceremony
            .authenticate(native_request)
            .await
            .map_err(|signal| native_failure(CeremonyKind::Get, &signal))?;

        normalize_native_assertion(&native).map_err(|e| malformed_result(CeremonyKind::Get, e))
    }
}

/// Canonical base64url to the padded base64 the native layer decodes
fn to_base64(value: &str, error: PasskeyError) -> Result<String, PasskeyError> {
    let bytes = codec::base64url_to_bytes(value).map_err(|_| error)?;
    Ok(codec::bytes_to_base64(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passkey::request::{
        AuthenticationOverrides, CreateOverrides, PasskeyUser, RequestBuilder,
    };
    use crate::passkey::PasskeySettings;
    use crate::testing::fixtures::TestFixtures;
    use crate::testing::mock::MockAuthorizationCeremony;
    use crate::webauthn::PublicKeyCredentialDescriptor;

    fn create_request(overrides: CreateOverrides) -> CreateRequest {
        RequestBuilder::new(&PasskeySettings::default())
            .build_create_request(
                &PasskeyUser::new("alice", "alice", "Alice"),
                "0xdeadbeef",
                overrides,
            )
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_passes_padded_base64() {
        let ceremony = Arc::new(MockAuthorizationCeremony::succeeding());
        let backend = AuthorizationServicesBackend::new(ceremony.clone());

        let request = create_request(CreateOverrides {
            exclude_credentials: Some(vec![PublicKeyCredentialDescriptor::public_key(
                "q-_w",
                Vec::new(),
            )]),
            with_security_key: true,
            ..Default::default()
        });
        let result = backend.register(&request).await.unwrap();
        assert_eq!(result.id, result.raw_id);

        let sent = ceremony.last_registration_request().unwrap();
        assert_eq!(sent.rp_id, "localhost");
        assert_eq!(sent.challenge, "3q2+7w==");
        assert_eq!(sent.user_id, "YWxpY2U=");
        assert_eq!(sent.display_name, "Alice");
        assert_eq!(sent.excluded_credentials, vec!["q+/w".to_string()]);
        assert!(sent.security_key);
    }

    #[tokio::test]
    async fn test_authenticate_passes_allowed_credentials() {
        let ceremony = Arc::new(MockAuthorizationCeremony::succeeding());
        let backend = AuthorizationServicesBackend::new(ceremony.clone());

        let request = RequestBuilder::new(&PasskeySettings::default())
            .build_authentication_request(
                &["q-_w".to_string()],
                "deadbeef",
                AuthenticationOverrides::default(),
            )
            .unwrap();
        let result = backend.authenticate(&request).await.unwrap();
        assert_eq!(result.r#type, CeremonyKind::Get);
        assert_eq!(result, TestFixtures::authentication_result());

        let sent = ceremony.last_assertion_request().unwrap();
        assert_eq!(sent.challenge, "3q2+7w==");
        assert_eq!(sent.allowed_credentials, vec!["q+/w".to_string()]);
        assert!(!sent.security_key);
    }

    #[tokio::test]
    async fn test_native_signal_is_mapped() {
        let ceremony = Arc::new(MockAuthorizationCeremony::failing(NativeErrorSignal::Code(
            1001,
        )));
        let backend = AuthorizationServicesBackend::new(ceremony.clone());

        let error = backend
            .register(&create_request(CreateOverrides::default()))
            .await
            .unwrap_err();
        assert_eq!(error, PasskeyError::UserCancelled);
        assert_eq!(ceremony.invocations(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_challenge_never_reaches_native_layer() {
        let ceremony = Arc::new(MockAuthorizationCeremony::succeeding());
        let backend = AuthorizationServicesBackend::new(ceremony.clone());

        let mut request = create_request(CreateOverrides::default());
        request.options.challenge = "not base64url!".to_string();
        assert_eq!(
            backend.register(&request).await,
            Err(PasskeyError::InvalidChallenge)
        );

        let mut request = create_request(CreateOverrides::default());
        request.options.user.id = "%%%".to_string();
        assert_eq!(
            backend.register(&request).await,
            Err(PasskeyError::InvalidUserId)
        );

        assert_eq!(ceremony.invocations(), 0);
    }

    #[tokio::test]
    async fn test_empty_native_result_is_request_failed() {
        let mut registration = TestFixtures::native_registration();
        registration.credential_id.clear();
        let ceremony = Arc::new(MockAuthorizationCeremony::succeeding().with_registration(registration));
        let backend = AuthorizationServicesBackend::new(ceremony);

        assert_eq!(
            backend.register(&create_request(CreateOverrides::default())).await,
            Err(PasskeyError::RequestFailed)
        );
    }
}
