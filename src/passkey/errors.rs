//! Passkey error taxonomy
//!
//! Native credential ceremonies fail in platform-specific ways: string tags,
//! numeric framework codes, or a code/message pair. Everything is funneled
//! through [`map_native_error`] into one [`PasskeyError`] before it reaches a
//! caller.

use std::fmt;

/// Errors surfaced by passkey operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasskeyError {
    /// Platform or OS version cannot run passkey ceremonies
    #[error("Passkeys are not supported on this device")]
    NotSupported,

    /// Ceremony completed without a usable result
    #[error("The request failed, no credentials were returned")]
    RequestFailed,

    #[error("The user cancelled the request")]
    UserCancelled,

    /// Challenge failed hex validation or backend-side decoding
    #[error("The provided challenge was invalid")]
    InvalidChallenge,

    #[error("The provided userId was invalid")]
    InvalidUserId,

    /// Relying party or app entitlement misconfiguration reported by the OS
    #[error("Your app is not properly configured")]
    NotConfigured,

    /// No credential matched an authentication request
    #[error("No viable credential is available for the user")]
    NoCredentials,

    /// Ceremony was interrupted; the caller may retry
    #[error("The operation was interrupted and may be retried")]
    Interrupted,

    #[error("An unknown error occurred")]
    Unknown,

    /// Unrecognized native signal, preserved for diagnostics
    #[error("Native error: {0}")]
    Native(String),
}

impl PasskeyError {
    /// Stable error code, identical across platforms
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            PasskeyError::NotSupported => "NotSupported",
            PasskeyError::RequestFailed => "RequestFailed",
            PasskeyError::UserCancelled => "UserCancelled",
            PasskeyError::InvalidChallenge => "InvalidChallenge",
            PasskeyError::InvalidUserId => "InvalidUserId",
            PasskeyError::NotConfigured => "NotConfigured",
            PasskeyError::NoCredentials => "NoCredentials",
            PasskeyError::Interrupted => "Interrupted",
            PasskeyError::Unknown => "UnknownError",
            PasskeyError::Native(_) => "NativeError",
        }
    }

    /// Whether repeating the same call may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, PasskeyError::Interrupted)
    }

    /// Look up a taxonomy member by its string tag
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let error = match tag {
            "NotSupported" => PasskeyError::NotSupported,
            "RequestFailed" => PasskeyError::RequestFailed,
            "UserCancelled" => PasskeyError::UserCancelled,
            "InvalidChallenge" => PasskeyError::InvalidChallenge,
            "InvalidUserId" => PasskeyError::InvalidUserId,
            "NotConfigured" | "InvalidRpId" => PasskeyError::NotConfigured,
            "NoCredentials" => PasskeyError::NoCredentials,
            "Interrupted" => PasskeyError::Interrupted,
            "UnknownError" => PasskeyError::Unknown,
            _ => return None,
        };
        Some(error)
    }

    /// Look up a taxonomy member by a numeric native code
    ///
    /// Covers `ASAuthorizationError` codes, the credential-manager bridge's
    /// `106xx` range and the authorization-services bridge's `206xx` range.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        let error = match code {
            1000 | 10605 | 20608 => PasskeyError::Unknown,
            1001 | 10602 | 20603 => PasskeyError::UserCancelled,
            1004 | 20602 => PasskeyError::RequestFailed,
            4004 | 10604 | 20605 | 20607 => PasskeyError::NotConfigured,
            10603 => PasskeyError::Interrupted,
            10606 | 20601 => PasskeyError::NotSupported,
            10607 => PasskeyError::NoCredentials,
            20604 => PasskeyError::InvalidChallenge,
            20606 => PasskeyError::InvalidUserId,
            _ => return None,
        };
        Some(error)
    }
}

/// An opaque failure reported by a native ceremony
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeErrorSignal {
    /// A string tag, possibly rendered as `"Error: <Tag>"`
    Tag(String),
    /// A numeric framework code
    Code(i64),
    /// A bridge-level code with its message
    Coded { code: String, message: String },
}

impl NativeErrorSignal {
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        NativeErrorSignal::Tag(tag.into())
    }
}

impl fmt::Display for NativeErrorSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeErrorSignal::Tag(tag) => write!(f, "{tag}"),
            NativeErrorSignal::Code(code) => write!(f, "{code}"),
            NativeErrorSignal::Coded { code, message } => write!(f, "{code}: {message}"),
        }
    }
}

/// Translate a native signal into exactly one taxonomy member
///
/// Unrecognized signals become `PasskeyError::Native` carrying the raw value,
/// so nothing escapes unmapped.
#[must_use]
pub fn map_native_error(signal: &NativeErrorSignal) -> PasskeyError {
    match signal {
        NativeErrorSignal::Tag(raw) => {
            lookup_tag(raw).unwrap_or_else(|| PasskeyError::Native(raw.clone()))
        }
        NativeErrorSignal::Code(code) => {
            PasskeyError::from_code(*code).unwrap_or_else(|| PasskeyError::Native(code.to_string()))
        }
        NativeErrorSignal::Coded { code, message } => lookup_tag(message)
            .or_else(|| code.trim().parse().ok().and_then(PasskeyError::from_code))
            .unwrap_or_else(|| PasskeyError::Native(message.clone())),
    }
}

/// Rendered rejections look like `"Error: UserCancelled"`, so the second word
/// is tried first, then the first word
fn lookup_tag(raw: &str) -> Option<PasskeyError> {
    let mut words = raw.split_whitespace();
    let first = words.next()?;
    words
        .next()
        .and_then(PasskeyError::from_tag)
        .or_else(|| PasskeyError::from_tag(first))
}
