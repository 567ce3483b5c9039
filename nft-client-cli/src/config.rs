//! Persisted client configuration: program id, signer key and network.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use base58::FromBase58;
use ed25519_dalek::SigningKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use nft_client_core::types::Address;

use crate::hex::parse_address;

pub const DEVNET_URL: &str = "https://api.devnet.solana.com";
pub const MAINNET_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid program id: {0}")]
    ProgramId(String),

    #[error("Invalid private key: {0}")]
    PrivateKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "ProgramId")]
    pub program_id: Address,
    /// Base58 keypair (64 bytes) or secret key (32 bytes).
    #[serde(rename = "PrivateKey")]
    pub private_key: String,
    #[serde(rename = "UseDevnet", default = "default_use_devnet")]
    pub use_devnet: bool,
}

fn default_use_devnet() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&json)?;
        config.signing_key()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load `path`, or prompt for the values and write it if it does not exist.
    pub fn load_or_create<R: BufRead, W: Write>(
        path: &Path,
        input: &mut R,
        output: &mut W,
    ) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }
        writeln!(output, "Config file {} not found, creating it...", path.display())?;
        let config = Self::prompt(input, output)?;
        config.save(path)?;
        writeln!(output, "✅ Configuration saved")?;
        info!(path = %path.display(), "created configuration");
        Ok(config)
    }

    /// Ask for each value on `output`, reading answers line by line.
    pub fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Self, ConfigError> {
        let program_id = ask(input, output, "Program ID: ")?;
        let program_id = parse_address(&program_id).map_err(ConfigError::ProgramId)?;
        let private_key = ask(input, output, "Private key (base58): ")?;
        let use_devnet = ask(input, output, "Use devnet (y/n) [y]: ")?;
        let use_devnet = !matches!(use_devnet.to_ascii_lowercase().as_str(), "n" | "no");

        let config = Config {
            program_id,
            private_key,
            use_devnet,
        };
        config.signing_key()?;
        Ok(config)
    }

    pub fn rpc_url(&self) -> &'static str {
        if self.use_devnet {
            DEVNET_URL
        } else {
            MAINNET_URL
        }
    }

    pub fn signing_key(&self) -> Result<SigningKey, ConfigError> {
        let bytes = self
            .private_key
            .trim()
            .from_base58()
            .map_err(|e| ConfigError::PrivateKey(format!("not base58: {:?}", e)))?;
        match bytes.len() {
            64 => {
                let mut keypair = [0u8; 64];
                keypair.copy_from_slice(&bytes);
                SigningKey::from_keypair_bytes(&keypair)
                    .map_err(|e| ConfigError::PrivateKey(e.to_string()))
            }
            32 => {
                let mut secret = [0u8; 32];
                secret.copy_from_slice(&bytes);
                Ok(SigningKey::from_bytes(&secret))
            }
            n => Err(ConfigError::PrivateKey(format!(
                "decoded to {} bytes, expected 32 or 64",
                n
            ))),
        }
    }

    /// The signer's public address.
    pub fn wallet_address(&self) -> Result<Address, ConfigError> {
        Ok(Address::new(self.signing_key()?.verifying_key().to_bytes()))
    }
}

/// Print `prompt` and read one trimmed line. EOF is an error.
pub(crate) fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}
