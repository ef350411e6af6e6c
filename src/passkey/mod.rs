//! Passkey ceremonies across native platforms
//!
//! Callers build a [`Passkey`] for their platform, hand it the native
//! ceremony for that platform, and get canonical `WebAuthn` results back
//! regardless of which native layer ran.

// Core settings
mod settings;
pub use settings::PasskeySettings;

// Error taxonomy
mod errors;
pub use errors::{map_native_error, NativeErrorSignal, PasskeyError};

// Request construction and result normalization
pub mod request;
pub mod response;
pub use request::{
    AuthenticationOverrides, AuthenticationRequest, AuthenticatorType, CreateOverrides,
    CreateRequest, CredentialIdEncoding, PasskeyUser, RequestBuilder,
};

// Platform detection and backend dispatch
mod backend;
mod platform;
mod registry;
mod service;
pub use backend::{
    AuthorizationAssertionRequest, AuthorizationCeremony, AuthorizationRegistrationRequest,
    AuthorizationServicesBackend, CredentialManagerBackend, CredentialManagerCeremony,
    PasskeyBackend,
};
pub use platform::{Platform, PlatformInfo};
pub use registry::{CeremonyGuard, CeremonyHandle, CeremonyRecord, CeremonyRegistry};
pub use service::{Passkey, PasskeyBuilder};
