// Centralized ceremony logging so identifiers are always truncated the same way
use log::{debug, info, warn};

use crate::passkey::{NativeErrorSignal, PasskeyError, PlatformInfo};
use crate::webauthn::CeremonyKind;

/// Characters of an identifier kept in log output
const VISIBLE_PREFIX_CHARS: usize = 8;

pub struct LoggingHelper;

impl LoggingHelper {
    /// Shorten a challenge or credential id for log output
    #[must_use]
    pub fn truncate_identifier(value: &str) -> String {
        let mut chars = value.chars();
        let prefix: String = chars.by_ref().take(VISIBLE_PREFIX_CHARS).collect();
        if chars.next().is_some() {
            format!("{prefix}…")
        } else {
            prefix
        }
    }

    /// Log backend selection at construction time
    pub fn log_backend_selected(platform: &PlatformInfo, backend: Option<&str>) {
        match backend {
            Some(name) => info!("✅ Passkeys available on {platform} via {name}"),
            None => info!("❌ Passkeys unavailable on {platform}"),
        }
    }

    /// Log a call rejected because the platform cannot run ceremonies
    pub fn log_unsupported(kind: CeremonyKind, platform: &PlatformInfo) {
        warn!("Rejected {} on unsupported platform {platform}", kind.as_str());
    }

    /// Log a canonical request about to be handed to a backend
    pub fn log_request_built(kind: CeremonyKind, challenge: &str, credential_count: usize) {
        debug!(
            "Built {} request: challenge={}, credentials={credential_count}",
            kind.as_str(),
            Self::truncate_identifier(challenge)
        );
    }

    /// Log ceremony start
    pub fn log_ceremony_started(kind: CeremonyKind, backend: &str) {
        info!("Starting {} ceremony via {backend}", kind.as_str());
    }

    /// Log a normalized result
    pub fn log_ceremony_completed(kind: CeremonyKind, credential_id: &str) {
        info!(
            "Completed {} ceremony for credential {}",
            kind.as_str(),
            Self::truncate_identifier(credential_id)
        );
    }

    /// Log a native failure together with its mapped taxonomy member
    pub fn log_native_failure(kind: CeremonyKind, signal: &NativeErrorSignal, error: &PasskeyError) {
        warn!(
            "Native {} ceremony failed with '{signal}', mapped to {}",
            kind.as_str(),
            error.code()
        );
    }

    /// Log a native result that could not be normalized
    pub fn log_malformed_result(kind: CeremonyKind, reason: &str) {
        warn!("Discarding malformed {} result: {reason}", kind.as_str());
    }
}
