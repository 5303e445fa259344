// src/core/mod.rs
//! Pure codec engines: padding, stream driver, AES, DES, RSA, at-rest format
//!
//! Nothing in here knows about the registry or config files. Engines take a
//! [`CipherSpec`] (or PEM text for RSA) and return [`EngineError`]s.

pub mod aes;
pub mod des;
pub mod digest;
pub mod format;
pub mod padding;
pub mod rsa;
pub mod stream;

use crate::aliases::{IvMaterial, KeyMaterial};
use crate::enums::Padding;

pub use crate::error::EngineError;

/// Per-call symmetric cipher parameters
///
/// Built fresh for each call from the caller's literals; key and IV are
/// copied into zeroizing buffers and dropped with the spec.
pub struct CipherSpec<M> {
    pub mode: M,
    pub padding: Padding,
    key: KeyMaterial,
    iv: IvMaterial,
}

impl<M: Copy> CipherSpec<M> {
    pub fn new(mode: M, padding: Padding, key: &[u8], iv: &[u8]) -> Self {
        Self {
            mode,
            padding,
            key: KeyMaterial::new(key.to_vec()),
            iv: IvMaterial::new(iv.to_vec()),
        }
    }

    pub fn key(&self) -> &[u8] {
        self.key.expose_secret()
    }

    pub fn iv(&self) -> &[u8] {
        self.iv.expose_secret()
    }
}
