//! Platform dispatcher
//!
//! [`Passkey`] is the entry point callers hold. It decides once, at build
//! time, which backend serves this platform, then runs every ceremony through
//! the same pipeline: build the canonical request, register the ceremony,
//! invoke the backend, return the normalized result.

use std::sync::Arc;

use super::backend::{
    AuthorizationCeremony, AuthorizationServicesBackend, CredentialManagerBackend,
    CredentialManagerCeremony, PasskeyBackend,
};
use super::errors::PasskeyError;
use super::platform::{Platform, PlatformInfo};
use super::registry::CeremonyRegistry;
use super::request::{AuthenticationOverrides, CreateOverrides, PasskeyUser, RequestBuilder};
use super::settings::PasskeySettings;
use crate::utils::logging::LoggingHelper;
use crate::webauthn::{AuthenticationResult, CeremonyKind, RegistrationResult};

/// Passkey ceremonies for one platform
pub struct Passkey {
    settings: PasskeySettings,
    platform: PlatformInfo,
    backend: Option<Box<dyn PasskeyBackend>>,
    registry: Arc<CeremonyRegistry>,
}

// =============================================================================
// 1. Construction
// =============================================================================

/// Assembles a [`Passkey`] from a platform identity and native ceremonies
pub struct PasskeyBuilder {
    settings: PasskeySettings,
    platform: PlatformInfo,
    authorization_services: Option<Arc<dyn AuthorizationCeremony>>,
    credential_manager: Option<Arc<dyn CredentialManagerCeremony>>,
    registry: Option<Arc<CeremonyRegistry>>,
}

impl PasskeyBuilder {
    #[must_use]
    pub fn new(platform: PlatformInfo) -> Self {
        Self {
            settings: PasskeySettings::default(),
            platform,
            authorization_services: None,
            credential_manager: None,
            registry: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: PasskeySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Native ceremony used on iOS
    #[must_use]
    pub fn with_authorization_services(mut self, ceremony: Arc<dyn AuthorizationCeremony>) -> Self {
        self.authorization_services = Some(ceremony);
        self
    }

    /// Native ceremony used on Android
    #[must_use]
    pub fn with_credential_manager(
        mut self,
        ceremony: Arc<dyn CredentialManagerCeremony>,
    ) -> Self {
        self.credential_manager = Some(ceremony);
        self
    }

    /// Share a ceremony registry between dispatchers
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<CeremonyRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Select the backend and build the dispatcher
    ///
    /// Without a supported platform version, or without the native ceremony
    /// that platform needs, the dispatcher is built in the unsupported state.
    #[must_use]
    pub fn build(self) -> Passkey {
        let backend: Option<Box<dyn PasskeyBackend>> = if self.platform.is_supported() {
            match self.platform.platform {
                Platform::Ios => self.authorization_services.map(|ceremony| {
                    Box::new(AuthorizationServicesBackend::new(ceremony)) as Box<dyn PasskeyBackend>
                }),
                Platform::Android => self.credential_manager.map(|ceremony| {
                    Box::new(CredentialManagerBackend::new(ceremony)) as Box<dyn PasskeyBackend>
                }),
                Platform::Other(_) => None,
            }
        } else {
            None
        };

        LoggingHelper::log_backend_selected(&self.platform, backend.as_ref().map(|b| b.name()));

        Passkey {
            settings: self.settings,
            platform: self.platform,
            backend,
            registry: self.registry.unwrap_or_default(),
        }
    }
}

impl Passkey {
    #[must_use]
    pub fn builder(platform: PlatformInfo) -> PasskeyBuilder {
        PasskeyBuilder::new(platform)
    }
}

// =============================================================================
// 2. Ceremonies
// =============================================================================

impl Passkey {
    /// Whether ceremonies can run here
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.backend.is_some()
    }

    /// Register a new passkey for `user`
    ///
    /// # Errors
    ///
    /// Returns `PasskeyError::NotSupported` before any other work on an
    /// unsupported platform, a validation error for a bad challenge or user
    /// id, or the mapped native failure.
    pub async fn create(
        &self,
        user: &PasskeyUser,
        challenge_hex: &str,
        overrides: CreateOverrides,
    ) -> Result<RegistrationResult, PasskeyError> {
        let backend = self.backend(CeremonyKind::Create)?;

        let request = RequestBuilder::new(&self.settings).build_create_request(
            user,
            challenge_hex,
            overrides,
        )?;
        LoggingHelper::log_request_built(
            CeremonyKind::Create,
            &request.options.challenge,
            request.options.exclude_credentials.as_ref().map_or(0, Vec::len),
        );

        let _ceremony = self.registry.begin(CeremonyKind::Create);
        let result = backend.register(&request).await?;

        LoggingHelper::log_ceremony_completed(CeremonyKind::Create, &result.id);
        Ok(result)
    }

    /// Authenticate with one of `credential_ids`, or any discoverable
    /// credential when the list is empty
    ///
    /// # Errors
    ///
    /// Returns `PasskeyError::NotSupported` before any other work on an
    /// unsupported platform, `PasskeyError::InvalidChallenge` for a bad
    /// challenge or credential id, or the mapped native failure.
    pub async fn authenticate(
        &self,
        credential_ids: &[String],
        challenge_hex: &str,
        overrides: AuthenticationOverrides,
    ) -> Result<AuthenticationResult, PasskeyError> {
        let backend = self.backend(CeremonyKind::Get)?;

        let request = RequestBuilder::new(&self.settings).build_authentication_request(
            credential_ids,
            challenge_hex,
            overrides,
        )?;
        LoggingHelper::log_request_built(
            CeremonyKind::Get,
            &request.options.challenge,
            credential_ids.len(),
        );

        let _ceremony = self.registry.begin(CeremonyKind::Get);
        let result = backend.authenticate(&request).await?;

        LoggingHelper::log_ceremony_completed(CeremonyKind::Get, &result.id);
        Ok(result)
    }

    fn backend(&self, kind: CeremonyKind) -> Result<&dyn PasskeyBackend, PasskeyError> {
        self.backend.as_deref().ok_or_else(|| {
            LoggingHelper::log_unsupported(kind, &self.platform);
            PasskeyError::NotSupported
        })
    }
}

// =============================================================================
// 3. Diagnostics
// =============================================================================

impl Passkey {
    #[must_use]
    pub fn platform(&self) -> &PlatformInfo {
        &self.platform
    }

    #[must_use]
    pub fn settings(&self) -> &PasskeySettings {
        &self.settings
    }

    /// Name of the selected backend, if any
    #[must_use]
    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|backend| backend.name())
    }

    #[must_use]
    pub fn in_flight_ceremonies(&self) -> usize {
        self.registry.in_flight()
    }
}
