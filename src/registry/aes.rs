// src/registry/aes.rs
//! `aes` entry: mode → key → padding → iv → fmt → input/output

use super::paths::{self, choice, Plan};
use super::request::{Output, Request};
use super::{Decryptor, Encryptor};
use crate::config::Config;
use crate::core::aes;
use crate::core::stream::Direction;
use crate::core::CipherSpec;
use crate::enums::{AesMode, Algorithm, Padding, Style};
use crate::error::{CryptoError, Result};

pub struct AesCodec;

fn validate(
    req: &Request<'_>,
    config: &Config,
    direction: Direction,
) -> Result<(CipherSpec<AesMode>, Style)> {
    let mode: AesMode = choice(req.mode, config.defaults.aes_mode, CryptoError::InvalidMode)?;
    if !aes::is_key_valid(mode, req.key) {
        return Err(CryptoError::InvalidKey(format!(
            "{} bytes is not a valid {mode} key, expected one of {:?}",
            req.key.len(),
            mode.key_lengths()
        )));
    }
    let padding: Padding = choice(req.padding, config.defaults.padding, CryptoError::InvalidPadding)?;
    if !aes::is_iv_valid(mode, req.iv) {
        return Err(CryptoError::InvalidIv(format!(
            "{} bytes is not a valid {mode} iv",
            req.iv.len()
        )));
    }
    let file_side = match direction {
        Direction::Encrypt => req.output.is_file(),
        Direction::Decrypt => req.input.is_file(),
    };
    let style = paths::style(Algorithm::Aes, req.fmt, file_side)?;

    let len = paths::check_shape(req)?;
    if direction == Direction::Encrypt && !aes::is_plain_valid(mode, padding, len as usize) {
        return Err(paths::unaligned(len, mode.block_size()));
    }
    Ok((CipherSpec::new(mode, padding, req.key, req.iv), style))
}

impl Encryptor for AesCodec {
    fn name(&self) -> &str {
        Algorithm::Aes.as_str()
    }

    fn encrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output> {
        let (spec, style) = validate(req, config, Direction::Encrypt)?;
        let transform = aes::encryptor(&spec).map_err(paths::encrypt_err(Algorithm::Aes))?;
        paths::encrypt(
            Plan {
                algo: Algorithm::Aes,
                transform,
                reserve: 0,
                style,
                chunk_size: config.stream.chunk_size,
            },
            req,
        )
    }
}

impl Decryptor for AesCodec {
    fn name(&self) -> &str {
        Algorithm::Aes.as_str()
    }

    fn decrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output> {
        let (spec, style) = validate(req, config, Direction::Decrypt)?;
        let transform = aes::decryptor(&spec).map_err(paths::decrypt_err(Algorithm::Aes))?;
        paths::decrypt(
            Plan {
                algo: Algorithm::Aes,
                transform,
                reserve: aes::decrypt_reserve(spec.mode),
                style,
                chunk_size: config.stream.chunk_size,
            },
            req,
        )
    }
}
