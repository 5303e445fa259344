// src/config/app.rs
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::defaults::*;
use crate::consts::{AES_BLOCK_SIZE, CONFIG_ENV, DEFAULT_CONFIG_FILE, DES_BLOCK_SIZE};
use crate::enums::{AesMode, DesMode, KeyFormat, KeygenMode, Padding, RsaPadding};
use crate::error::{CryptoError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_stream")]
    pub stream: Stream,
    #[serde(default = "default_defaults")]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stream {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

/// What every `auto` literal resolves to
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub aes_mode: AesMode,
    pub des_mode: DesMode,
    pub padding: Padding,
    pub rsa_padding: RsaPadding,
    pub key_format: KeyFormat,
    pub keygen_mode: KeygenMode,
    #[serde(default = "default_key_bits")]
    pub key_bits: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        default_defaults()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stream: default_stream(),
            defaults: default_defaults(),
        }
    }
}

impl Config {
    /// Non-final chunks must hold whole AES and DES blocks
    pub fn validate(&self) -> Result<()> {
        let chunk = self.stream.chunk_size;
        if chunk == 0 || chunk % AES_BLOCK_SIZE != 0 || chunk % DES_BLOCK_SIZE != 0 {
            return Err(CryptoError::InitFailed(format!(
                "stream.chunk_size {chunk} must be a positive multiple of \
                 {AES_BLOCK_SIZE} and {DES_BLOCK_SIZE}"
            )));
        }
        Ok(())
    }
}

/// Parse and validate a specific TOML file
pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CryptoError::InitFailed(format!("{}: {e}", path.display())))?;
    let conf: Config = toml::from_str(&content)
        .map_err(|e| CryptoError::InitFailed(format!("{}: {e}", path.display())))?;
    conf.validate()?;
    Ok(conf)
}

/// Load config at runtime, falling back to built-in defaults when no file exists
pub fn load() -> Result<Config> {
    let config_path =
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let path = Path::new(&config_path);

    if path.exists() {
        debug!(path = %path.display(), "loading config");
        load_from(path)
    } else {
        warn!("{config_path} not found, using built-in defaults");
        Ok(Config::default())
    }
}
