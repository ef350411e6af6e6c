#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use passkey_bridge::passkey::{
    AuthenticationOverrides, CreateOverrides, CredentialIdEncoding, PasskeyUser, Platform,
    PlatformInfo, RequestBuilder,
};
use passkey_bridge::settings::Settings;
use passkey_bridge::webauthn::der::decode_der_signature_hex;

#[derive(Debug, Parser)]
#[command(name = "passkey-bridge")]
#[command(version)]
#[command(about = "Inspect passkey requests and signatures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report whether passkeys are supported on a platform version
    Support { platform: String, version: String },

    /// Decode a DER ECDSA signature given as hex into r and s
    Der { signature: String },

    /// Print the registration options built from settings
    CreateRequest {
        user: String,
        challenge: String,
        #[arg(long)]
        display_name: Option<String>,
    },

    /// Print the authentication options built from settings
    AuthRequest {
        challenge: String,
        credential_ids: Vec<String>,
        /// Credential ids are hex rather than base64url
        #[arg(long)]
        hex_ids: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().context("Failed to load settings")?;
    settings
        .init_logging()
        .context("Failed to initialize logging")?;

    match cli.command {
        Command::Support { platform, version } => {
            let info = PlatformInfo::new(Platform::from_os_name(&platform), version);
            let verdict = if info.is_supported() {
                "supported"
            } else {
                "not supported"
            };
            println!("{info}: passkeys {verdict}");
        }
        Command::Der { signature } => {
            let decoded =
                decode_der_signature_hex(&signature).context("Failed to decode signature")?;
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
        Command::CreateRequest {
            user,
            challenge,
            display_name,
        } => {
            let display_name = display_name.unwrap_or_else(|| user.clone());
            let user = PasskeyUser::new(user.clone(), user, display_name);
            let request = RequestBuilder::new(&settings.passkey)
                .build_create_request(&user, &challenge, CreateOverrides::default())
                .context("Failed to build registration options")?;
            println!("{}", serde_json::to_string_pretty(&request.options)?);
        }
        Command::AuthRequest {
            challenge,
            credential_ids,
            hex_ids,
        } => {
            let overrides = AuthenticationOverrides {
                credential_encoding: if hex_ids {
                    CredentialIdEncoding::Hex
                } else {
                    CredentialIdEncoding::Base64Url
                },
                ..Default::default()
            };
            let request = RequestBuilder::new(&settings.passkey)
                .build_authentication_request(&credential_ids, &challenge, overrides)
                .context("Failed to build authentication options")?;
            println!("{}", serde_json::to_string_pretty(&request.options)?);
        }
    }

    Ok(())
}
