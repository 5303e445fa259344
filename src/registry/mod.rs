// src/registry/mod.rs
//! Algorithm registry and dispatch
//!
//! Three lists of named implementations: encrypt-capable, decrypt-capable
//! and key-pair makers. Each name appears at most once per list; a second
//! registration is refused and the first stays active. The registry is
//! built once and only read afterwards, so `&Registry` can be shared across
//! threads freely.

mod aes;
mod base64;
mod des;
mod digest;
mod paths;
mod request;
mod rsa;

use tracing::debug;

use crate::config::Config;
use crate::core::rsa::KeyPair;
use crate::error::{CryptoError, Result};

pub use self::aes::AesCodec;
pub use self::base64::Base64Codec;
pub use self::des::DesCodec;
pub use self::digest::{Md5Digest, Sha256Digest};
pub use self::paths::select_output_fmt;
pub use self::request::{KeygenRequest, Output, Request, Sink, Source};
pub use self::rsa::RsaCodec;

/// An algorithm able to encrypt (or encode / digest)
pub trait Encryptor: Send + Sync {
    fn name(&self) -> &str;

    /// Validate `req` in the algorithm's fixed order, then transform it
    fn encrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output>;
}

/// An algorithm able to decrypt (or decode)
pub trait Decryptor: Send + Sync {
    fn name(&self) -> &str;

    fn decrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output>;
}

/// An algorithm able to generate key pairs
pub trait Keymaker: Send + Sync {
    fn name(&self) -> &str;

    fn make_key_pair(&self, req: &KeygenRequest<'_>, config: &Config) -> Result<KeyPair>;
}

pub struct Registry {
    config: Config,
    encryptors: Vec<Box<dyn Encryptor>>,
    decryptors: Vec<Box<dyn Decryptor>>,
    keymakers: Vec<Box<dyn Keymaker>>,
}

impl Registry {
    /// Empty registry; nothing dispatches until something is registered
    ///
    /// Fails with [`CryptoError::InitFailed`] when `config` does not validate
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            encryptors: Vec::new(),
            decryptors: Vec::new(),
            keymakers: Vec::new(),
        })
    }

    /// Registry holding every built-in algorithm
    pub fn with_builtins(config: Config) -> Result<Self> {
        let mut reg = Self::new(config)?;

        reg.register_encryptor(Box::new(AesCodec))?;
        reg.register_encryptor(Box::new(Base64Codec))?;
        reg.register_encryptor(Box::new(DesCodec))?;
        reg.register_encryptor(Box::new(Md5Digest))?;
        reg.register_encryptor(Box::new(RsaCodec))?;
        reg.register_encryptor(Box::new(Sha256Digest))?;

        reg.register_decryptor(Box::new(AesCodec))?;
        reg.register_decryptor(Box::new(Base64Codec))?;
        reg.register_decryptor(Box::new(DesCodec))?;
        reg.register_decryptor(Box::new(RsaCodec))?;

        reg.register_keymaker(Box::new(RsaCodec))?;

        debug!(
            encryptors = ?reg.encryptor_names(),
            decryptors = ?reg.decryptor_names(),
            keymakers = ?reg.keymaker_names(),
            "registry ready"
        );
        Ok(reg)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn register_encryptor(&mut self, enc: Box<dyn Encryptor>) -> Result<()> {
        if self.encryptors.iter().any(|e| e.name() == enc.name()) {
            return Err(CryptoError::DuplicateAlgorithm(enc.name().to_string()));
        }
        self.encryptors.push(enc);
        Ok(())
    }

    pub fn register_decryptor(&mut self, dec: Box<dyn Decryptor>) -> Result<()> {
        if self.decryptors.iter().any(|d| d.name() == dec.name()) {
            return Err(CryptoError::DuplicateAlgorithm(dec.name().to_string()));
        }
        self.decryptors.push(dec);
        Ok(())
    }

    pub fn register_keymaker(&mut self, km: Box<dyn Keymaker>) -> Result<()> {
        if self.keymakers.iter().any(|k| k.name() == km.name()) {
            return Err(CryptoError::DuplicateAlgorithm(km.name().to_string()));
        }
        self.keymakers.push(km);
        Ok(())
    }

    pub fn encryptor_names(&self) -> Vec<&str> {
        self.encryptors.iter().map(|e| e.name()).collect()
    }

    pub fn decryptor_names(&self) -> Vec<&str> {
        self.decryptors.iter().map(|d| d.name()).collect()
    }

    pub fn keymaker_names(&self) -> Vec<&str> {
        self.keymakers.iter().map(|k| k.name()).collect()
    }

    /// First encryptor whose name matches `req.algo` exactly
    pub fn encrypt(&self, req: &Request<'_>) -> Result<Output> {
        let enc = self
            .encryptors
            .iter()
            .find(|e| e.name() == req.algo)
            .ok_or_else(|| CryptoError::InvalidAlgo(req.algo.to_string()))?;
        debug!(algo = req.algo, mode = req.mode, padding = req.padding, fmt = req.fmt, "dispatch encrypt");
        enc.encrypt(req, &self.config)
    }

    pub fn decrypt(&self, req: &Request<'_>) -> Result<Output> {
        let dec = self
            .decryptors
            .iter()
            .find(|d| d.name() == req.algo)
            .ok_or_else(|| CryptoError::InvalidAlgo(req.algo.to_string()))?;
        debug!(algo = req.algo, mode = req.mode, padding = req.padding, fmt = req.fmt, "dispatch decrypt");
        dec.decrypt(req, &self.config)
    }

    pub fn make_key_pair(&self, req: &KeygenRequest<'_>) -> Result<KeyPair> {
        let km = self
            .keymakers
            .iter()
            .find(|k| k.name() == req.algo)
            .ok_or_else(|| CryptoError::InvalidAlgo(req.algo.to_string()))?;
        debug!(algo = req.algo, bits = req.bits, format = req.format, mode = req.mode, "dispatch keygen");
        km.make_key_pair(req, &self.config)
    }
}
