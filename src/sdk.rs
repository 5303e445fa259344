// src/sdk.rs
//! Init-guarded facade over the [`Registry`]
//!
//! Mirrors a plugin boundary: nothing works until `init()` has built the
//! registry, repeated `init()` calls are no-ops, and `quit()` drops it.

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::rsa::KeyPair;
use crate::error::{CryptoError, Result};
use crate::registry::{KeygenRequest, Output, Registry, Request};

#[derive(Default)]
pub struct CryptoSdk {
    registry: OnceCell<Registry>,
}

impl CryptoSdk {
    pub const fn new() -> Self {
        Self {
            registry: OnceCell::new(),
        }
    }

    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Build the registry once; later calls keep the first one
    pub fn init(&self, config: Config) -> Result<()> {
        if self.registry.get().is_some() {
            debug!("crypto core already loaded");
            return Ok(());
        }
        self.registry
            .get_or_try_init(|| Registry::with_builtins(config))?;
        info!(version = Self::version(), "crypto core loaded");
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.registry.get().is_some()
    }

    pub fn quit(&mut self) {
        if self.registry.take().is_some() {
            info!("crypto core unloaded");
        }
    }

    pub fn registry(&self) -> Result<&Registry> {
        self.registry.get().ok_or(CryptoError::CoreNotLoaded)
    }

    pub fn encrypt(&self, req: &Request<'_>) -> Result<Output> {
        self.registry()?.encrypt(req)
    }

    pub fn decrypt(&self, req: &Request<'_>) -> Result<Output> {
        self.registry()?.decrypt(req)
    }

    pub fn make_key_pair(&self, req: &KeygenRequest<'_>) -> Result<KeyPair> {
        self.registry()?.make_key_pair(req)
    }
}
