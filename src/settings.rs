//! Application settings
//!
//! Relying-party defaults and logging configuration, layered from
//! `Passkey.toml` and `PASSKEY_*` environment variables by [`Settings::load`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::passkey::PasskeySettings;
use crate::webauthn::UserVerificationRequirement;

/// Name of the settings file looked up in the working and config directories
pub const SETTINGS_FILE: &str = "Passkey.toml";

/// Environment variable naming an extra directory holding `Passkey.toml`
pub const CONFIG_DIR_ENV: &str = "PASSKEY_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub passkey: PasskeySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Errors raised while loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] basic_toml::Error),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl Settings {
    /// Load settings from configuration files and environment variables
    ///
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables
    /// 2. `Passkey.toml` in `PASSKEY_CONFIG_DIR` (if specified and exists)
    /// 3. `Passkey.toml` in the current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);
        Ok(settings)
    }

    /// Parse settings from TOML text, filling missing keys with defaults
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Parse` if the TOML is malformed.
    pub fn from_toml_str(toml: &str) -> Result<Self, SettingsError> {
        Ok(basic_toml::from_str(toml)?)
    }

    /// Read and parse a settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Initialize `env_logger` with the configured level
    ///
    /// `RUST_LOG` is folded into `logging.level` by [`Settings::load`].
    ///
    /// # Errors
    ///
    /// Returns an error if a global logger is already installed.
    pub fn init_logging(&self) -> Result<(), SettingsError> {
        env_logger::Builder::new()
            .parse_filters(&self.logging.level)
            .try_init()?;
        Ok(())
    }

    fn load_base_settings() -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        let default_config_path = PathBuf::from(SETTINGS_FILE);
        if default_config_path.exists() {
            settings = Self::from_file(&default_config_path)?;
            log::info!("Loaded base settings from {}", default_config_path.display());
        }

        if let Ok(config_dir) = std::env::var(CONFIG_DIR_ENV) {
            let config_path = Path::new(&config_dir).join(SETTINGS_FILE);
            if config_path.exists() {
                settings = Self::from_file(&config_path)?;
                log::info!("Overriding settings from {}", config_path.display());
            } else {
                log::info!(
                    "{CONFIG_DIR_ENV} set but no {SETTINGS_FILE} found at: {}",
                    config_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_passkey_env_overrides(&mut settings.passkey);
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            settings.logging.level = log_level;
        }
    }

    fn apply_passkey_env_overrides(passkey: &mut PasskeySettings) {
        if let Ok(rp_id) = std::env::var("PASSKEY_RP_ID") {
            passkey.rp_id = rp_id;
        }
        if let Ok(rp_name) = std::env::var("PASSKEY_RP_NAME") {
            passkey.rp_name = rp_name;
        }
        if let Ok(value) = std::env::var("PASSKEY_TIMEOUT_SECONDS") {
            match value.parse::<u64>() {
                Ok(timeout) => passkey.timeout_seconds = timeout,
                Err(_) => log::warn!("Ignoring invalid PASSKEY_TIMEOUT_SECONDS: {value}"),
            }
        }
        if let Ok(value) = std::env::var("PASSKEY_USER_VERIFICATION") {
            match serde_json::from_value::<UserVerificationRequirement>(
                serde_json::Value::String(value.to_lowercase()),
            ) {
                Ok(requirement) => passkey.user_verification = requirement,
                Err(_) => log::warn!("Ignoring invalid PASSKEY_USER_VERIFICATION: {value}"),
            }
        }
    }
}
