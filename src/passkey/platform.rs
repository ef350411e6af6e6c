//! Platform identity and passkey support thresholds

use serde::{Deserialize, Serialize};
use std::fmt;

/// iOS gained platform passkeys in 15.0; the major version must exceed this
pub const IOS_MIN_EXCLUSIVE_MAJOR: u32 = 14;

/// Credential Manager passkeys need an API level above Android 9 (28)
pub const ANDROID_MIN_EXCLUSIVE_API_LEVEL: u32 = 28;

/// The runtime platform family
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Other(String),
}

impl Platform {
    /// Derive the platform from an OS name such as `std::env::consts::OS`
    #[must_use]
    pub fn from_os_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        match lower.as_str() {
            "ios" | "iphoneos" | "ipados" => Platform::Ios,
            "android" => Platform::Android,
            _ => Platform::Other(lower),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Ios => write!(f, "ios"),
            Platform::Android => write!(f, "android"),
            Platform::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Platform family plus the OS version string reported by the host
///
/// iOS reports a dotted version (`"17.4.1"`), Android its API level (`"34"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub platform: Platform,
    pub os_version: String,
}

impl PlatformInfo {
    #[must_use]
    pub fn new(platform: Platform, os_version: impl Into<String>) -> Self {
        Self {
            platform,
            os_version: os_version.into(),
        }
    }

    /// The platform this binary was compiled for, with a host-supplied version
    #[must_use]
    pub fn current(os_version: impl Into<String>) -> Self {
        Self::new(Platform::from_os_name(std::env::consts::OS), os_version)
    }

    /// Leading integer of the version string, if any
    #[must_use]
    pub fn major_version(&self) -> Option<u32> {
        self.os_version.trim().split('.').next()?.parse().ok()
    }

    /// Whether passkey ceremonies can run on this platform and version
    #[must_use]
    pub fn is_supported(&self) -> bool {
        let Some(major) = self.major_version() else {
            return false;
        };
        match self.platform {
            Platform::Ios => major > IOS_MIN_EXCLUSIVE_MAJOR,
            Platform::Android => major > ANDROID_MIN_EXCLUSIVE_API_LEVEL,
            Platform::Other(_) => false,
        }
    }
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.platform, self.os_version)
    }
}
