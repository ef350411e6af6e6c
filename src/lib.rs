#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the passkey-bridge crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod passkey;
pub mod settings;
pub mod utils;
pub mod webauthn;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use passkey::{
    AuthenticationOverrides, CreateOverrides, Passkey, PasskeyBuilder, PasskeyError, PasskeyUser,
    Platform, PlatformInfo,
};
pub use settings::Settings;
pub use webauthn::{decode_der_signature, AuthenticationResult, EcdsaSignature, RegistrationResult};
