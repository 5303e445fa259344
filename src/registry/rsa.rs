// src/registry/rsa.rs
//! `rsa` entry (key → padding → fmt → input/output) and the `rsa` keymaker
//!
//! RSA has no mode of operation; the mode literal is ignored. The key is
//! the PEM text itself.

use ::rsa::traits::PublicKeyParts;

use super::paths::{self, choice, Plan};
use super::request::{KeygenRequest, Output, Request};
use super::{Decryptor, Encryptor, Keymaker};
use crate::config::Config;
use crate::core::rsa::{self, KeyPair};
use crate::enums::{Algorithm, KeyFormat, KeygenMode, RsaPadding};
use crate::error::{CryptoError, Result};

pub struct RsaCodec;

impl Encryptor for RsaCodec {
    fn name(&self) -> &str {
        Algorithm::Rsa.as_str()
    }

    fn encrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output> {
        let key = rsa::load_public_key(req.key)
            .map_err(|e| CryptoError::InvalidKey(format!("public key: {e}")))?;
        let padding: RsaPadding =
            choice(req.padding, config.defaults.rsa_padding, CryptoError::InvalidPadding)?;
        let style = paths::style(Algorithm::Rsa, req.fmt, req.output.is_file())?;

        let len = paths::check_shape(req)?;
        if !rsa::is_plain_valid(padding, key.size(), len as usize) {
            return Err(paths::unaligned(len, key.size()));
        }

        let transform = rsa::encryptor(req.key, padding).map_err(paths::encrypt_err(Algorithm::Rsa))?;
        paths::encrypt(
            Plan {
                algo: Algorithm::Rsa,
                transform,
                reserve: 0,
                style,
                chunk_size: config.stream.chunk_size,
            },
            req,
        )
    }
}

impl Decryptor for RsaCodec {
    fn name(&self) -> &str {
        Algorithm::Rsa.as_str()
    }

    fn decrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output> {
        rsa::load_private_key(req.key, req.passphrase)
            .map_err(|e| CryptoError::InvalidKey(format!("private key: {e}")))?;
        let padding: RsaPadding =
            choice(req.padding, config.defaults.rsa_padding, CryptoError::InvalidPadding)?;
        let style = paths::style(Algorithm::Rsa, req.fmt, req.input.is_file())?;
        paths::check_shape(req)?;

        let transform = rsa::decryptor(req.key, req.passphrase, padding)
            .map_err(paths::decrypt_err(Algorithm::Rsa))?;
        paths::decrypt(
            Plan {
                algo: Algorithm::Rsa,
                transform,
                reserve: 0,
                style,
                chunk_size: config.stream.chunk_size,
            },
            req,
        )
    }
}

impl Keymaker for RsaCodec {
    fn name(&self) -> &str {
        Algorithm::Rsa.as_str()
    }

    fn make_key_pair(&self, req: &KeygenRequest<'_>, config: &Config) -> Result<KeyPair> {
        let format: KeyFormat = choice(req.format, config.defaults.key_format, CryptoError::InvalidFmt)?;
        let mode: KeygenMode = choice(req.mode, config.defaults.keygen_mode, CryptoError::InvalidMode)?;
        let bits = if req.bits == 0 {
            config.defaults.key_bits
        } else {
            req.bits
        };
        rsa::make_key_pair(bits, format, mode, req.passphrase).map_err(CryptoError::Keygen)
    }
}
