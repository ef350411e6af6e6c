//! Credential-Manager style backend
//!
//! The native layer takes the canonical options serialized as `WebAuthn`
//! JSON and answers with the `WebAuthn` response JSON.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::{malformed_result, native_failure, PasskeyBackend};
use crate::passkey::errors::{NativeErrorSignal, PasskeyError};
use crate::passkey::request::{AuthenticationRequest, CreateRequest};
use crate::passkey::response::{normalize_json_assertion, normalize_json_registration};
use crate::utils::logging::LoggingHelper;
use crate::webauthn::{AuthenticationResult, CeremonyKind, RegistrationResult};

/// The native credential-manager ceremony
#[async_trait]
pub trait CredentialManagerCeremony: Send + Sync {
    async fn create_credential(&self, request_json: String) -> Result<String, NativeErrorSignal>;

    async fn get_credential(&self, request_json: String) -> Result<String, NativeErrorSignal>;
}

/// Backend for the credential-manager layer
///
/// The security-key flag has no counterpart here; the system credential
/// picker offers roaming authenticators on its own.
pub struct CredentialManagerBackend {
    ceremony: Arc<dyn CredentialManagerCeremony>,
}

impl CredentialManagerBackend {
    #[must_use]
    pub fn new(ceremony: Arc<dyn CredentialManagerCeremony>) -> Self {
        Self { ceremony }
    }
}

#[async_trait]
impl PasskeyBackend for CredentialManagerBackend {
    fn name(&self) -> &'static str {
        "credential-manager"
    }

    async fn register(&self, request: &CreateRequest) -> Result<RegistrationResult, PasskeyError> {
        let request_json = to_json(&request.options)?;
        LoggingHelper::log_ceremony_started(CeremonyKind::Create, self.name());

        let response = self
            .ceremony
            .create_credential(request_json)
            .await
            .map_err(|signal| native_failure(CeremonyKind::Create, &signal))?;

        normalize_json_registration(&response)
            .map_err(|e| malformed_result(CeremonyKind::Create, e))
    }

    async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AuthenticationResult, PasskeyError> {
        let request_json = to_json(&request.options)?;
        LoggingHelper::log_ceremony_started(CeremonyKind::Get, self.name());

        let response = self
            .ceremony
            .get_credential(request_json)
            .await
            .map_err(|signal| native_failure(CeremonyKind::Get, &signal))?;

        normalize_json_assertion(&response).map_err(|e| malformed_result(CeremonyKind::Get, e))
    }
}

fn to_json<T: Serialize>(options: &T) -> Result<String, PasskeyError> {
    serde_json::to_string(options).map_err(|e| {
        log::error!("Failed to serialize credential request: {e}");
        PasskeyError::RequestFailed
    })
}
