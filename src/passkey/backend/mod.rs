//! Platform backends
//!
//! A backend owns one native ceremony implementation and translates between
//! the canonical request/result types and what that native layer expects.
//! Native failures are mapped to [`PasskeyError`] here, so nothing above this
//! module sees a raw [`NativeErrorSignal`].

use async_trait::async_trait;

use super::errors::{map_native_error, NativeErrorSignal, PasskeyError};
use super::request::{AuthenticationRequest, CreateRequest};
use crate::utils::logging::LoggingHelper;
use crate::webauthn::{AuthenticationResult, CeremonyKind, RegistrationResult};

mod authorization_services;
mod credential_manager;

pub use authorization_services::{
    AuthorizationAssertionRequest, AuthorizationCeremony, AuthorizationRegistrationRequest,
    AuthorizationServicesBackend,
};
pub use credential_manager::{CredentialManagerBackend, CredentialManagerCeremony};

/// Strategy over the native passkey layers
#[async_trait]
pub trait PasskeyBackend: Send + Sync {
    /// Short backend name for logs and diagnostics
    fn name(&self) -> &'static str;

    /// Run a registration ceremony
    ///
    /// # Errors
    ///
    /// Returns the mapped native failure, an encoding error detected before
    /// the native call, or `PasskeyError::RequestFailed` for an unusable result.
    async fn register(&self, request: &CreateRequest) -> Result<RegistrationResult, PasskeyError>;

    /// Run an authentication ceremony
    ///
    /// # Errors
    ///
    /// Returns the mapped native failure, an encoding error detected before
    /// the native call, or `PasskeyError::RequestFailed` for an unusable result.
    async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AuthenticationResult, PasskeyError>;
}

/// Map and log a native failure
fn native_failure(kind: CeremonyKind, signal: &NativeErrorSignal) -> PasskeyError {
    let error = map_native_error(signal);
    LoggingHelper::log_native_failure(kind, signal, &error);
    error
}

/// Log a result that failed normalization and pass the error through
fn malformed_result(kind: CeremonyKind, error: PasskeyError) -> PasskeyError {
    LoggingHelper::log_malformed_result(kind, &error.to_string());
    error
}
