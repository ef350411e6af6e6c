//! Testing utilities
//!
//! Fixtures and recording mock native ceremonies, shared by unit tests and,
//! behind the `testing` feature, by integration tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use passkey_bridge::testing::{fixtures::TestFixtures, mock::MockAuthorizationCeremony};
//! use passkey_bridge::passkey::Passkey;
//! use std::sync::Arc;
//!
//! let ceremony = Arc::new(MockAuthorizationCeremony::succeeding());
//! let passkey = Passkey::builder(TestFixtures::ios())
//!     .with_authorization_services(ceremony.clone())
//!     .build();
//! assert!(passkey.is_supported());
//! assert_eq!(ceremony.invocations(), 0);
//! ```

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::{MockAuthorizationCeremony, MockCredentialManagerCeremony};

/// Common test constants
pub mod constants {
    /// Relying party used by fixture settings
    pub const TEST_RP_ID: &str = "wallet.example";

    pub const TEST_RP_NAME: &str = "Wallet";

    /// Application user handle; its base64url form is `YWxpY2U`
    pub const TEST_USER_ID: &str = "alice";

    pub const TEST_USER_NAME: &str = "alice@wallet.example";

    pub const TEST_USER_DISPLAY_NAME: &str = "Alice";

    /// Canonical credential id (bytes `ab ef f0`)
    pub const TEST_CREDENTIAL_ID: &str = "q-_w";

    /// The same credential id as the authorization-services layer reports it
    pub const TEST_CREDENTIAL_ID_BASE64: &str = "q+/w";
}
