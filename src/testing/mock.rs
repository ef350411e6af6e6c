//! Mock native ceremonies
//!
//! Each mock answers with a canned result or a canned failure signal and
//! records every request it receives, so tests can assert both on what was
//! sent and on whether the native layer was reached at all.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::fixtures::TestFixtures;
use crate::passkey::response::{NativeAssertion, NativeRegistration};
use crate::passkey::{
    AuthorizationAssertionRequest, AuthorizationCeremony, AuthorizationRegistrationRequest,
    CredentialManagerCeremony, NativeErrorSignal,
};

fn last<T: Clone>(requests: &Mutex<Vec<T>>) -> Option<T> {
    requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .last()
        .cloned()
}

fn record<T>(requests: &Mutex<Vec<T>>, request: T) {
    requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request);
}

// =============================================================================
// Authorization-Services
// =============================================================================

/// Recording stand-in for the authorization-services layer
pub struct MockAuthorizationCeremony {
    registration: Result<NativeRegistration, NativeErrorSignal>,
    assertion: Result<NativeAssertion, NativeErrorSignal>,
    invocations: AtomicUsize,
    registration_requests: Mutex<Vec<AuthorizationRegistrationRequest>>,
    assertion_requests: Mutex<Vec<AuthorizationAssertionRequest>>,
}

impl MockAuthorizationCeremony {
    /// Succeeds with the fixture payloads
    #[must_use]
    pub fn succeeding() -> Self {
        Self {
            registration: Ok(TestFixtures::native_registration()),
            assertion: Ok(TestFixtures::native_assertion()),
            invocations: AtomicUsize::new(0),
            registration_requests: Mutex::new(Vec::new()),
            assertion_requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every ceremony with `signal`
    #[must_use]
    pub fn failing(signal: NativeErrorSignal) -> Self {
        Self {
            registration: Err(signal.clone()),
            assertion: Err(signal),
            ..Self::succeeding()
        }
    }

    #[must_use]
    pub fn with_registration(mut self, registration: NativeRegistration) -> Self {
        self.registration = Ok(registration);
        self
    }

    #[must_use]
    pub fn with_assertion(mut self, assertion: NativeAssertion) -> Self {
        self.assertion = Ok(assertion);
        self
    }

    /// Number of native calls made so far
    #[must_use]
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn last_registration_request(&self) -> Option<AuthorizationRegistrationRequest> {
        last(&self.registration_requests)
    }

    #[must_use]
    pub fn last_assertion_request(&self) -> Option<AuthorizationAssertionRequest> {
        last(&self.assertion_requests)
    }
}

#[async_trait]
impl AuthorizationCeremony for MockAuthorizationCeremony {
    async fn register(
        &self,
        request: AuthorizationRegistrationRequest,
    ) -> Result<NativeRegistration, NativeErrorSignal> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        record(&self.registration_requests, request);
        self.registration.clone()
    }

    async fn authenticate(
        &self,
        request: AuthorizationAssertionRequest,
    ) -> Result<NativeAssertion, NativeErrorSignal> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        record(&self.assertion_requests, request);
        self.assertion.clone()
    }
}

// =============================================================================
// Credential-Manager
// =============================================================================

/// Recording stand-in for the credential-manager layer
pub struct MockCredentialManagerCeremony {
    create_response: Result<String, NativeErrorSignal>,
    get_response: Result<String, NativeErrorSignal>,
    invocations: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl MockCredentialManagerCeremony {
    /// Succeeds with the fixture response JSON
    #[must_use]
    pub fn succeeding() -> Self {
        Self {
            create_response: Ok(TestFixtures::registration_response_json()),
            get_response: Ok(TestFixtures::assertion_response_json()),
            invocations: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every ceremony with `signal`
    #[must_use]
    pub fn failing(signal: NativeErrorSignal) -> Self {
        Self {
            create_response: Err(signal.clone()),
            get_response: Err(signal),
            ..Self::succeeding()
        }
    }

    #[must_use]
    pub fn with_create_response(mut self, json: impl Into<String>) -> Self {
        self.create_response = Ok(json.into());
        self
    }

    #[must_use]
    pub fn with_get_response(mut self, json: impl Into<String>) -> Self {
        self.get_response = Ok(json.into());
        self
    }

    /// Number of native calls made so far
    #[must_use]
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// The request JSON of the latest call
    #[must_use]
    pub fn last_request(&self) -> Option<String> {
        last(&self.requests)
    }
}

#[async_trait]
impl CredentialManagerCeremony for MockCredentialManagerCeremony {
    async fn create_credential(&self, request_json: String) -> Result<String, NativeErrorSignal> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        record(&self.requests, request_json);
        self.create_response.clone()
    }

    async fn get_credential(&self, request_json: String) -> Result<String, NativeErrorSignal> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        record(&self.requests, request_json);
        self.get_response.clone()
    }
}
