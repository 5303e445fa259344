// src/registry/des.rs
//! `des` entry; the key length picks single, two-key or three-key DES

use super::paths::{self, choice, Plan};
use super::request::{Output, Request};
use super::{Decryptor, Encryptor};
use crate::config::Config;
use crate::consts::DES_BLOCK_SIZE;
use crate::core::des;
use crate::core::stream::Direction;
use crate::core::CipherSpec;
use crate::enums::{Algorithm, DesMode, Padding, Style};
use crate::error::{CryptoError, Result};

pub struct DesCodec;

fn validate(
    req: &Request<'_>,
    config: &Config,
    direction: Direction,
) -> Result<(CipherSpec<DesMode>, Style)> {
    let mode: DesMode = choice(req.mode, config.defaults.des_mode, CryptoError::InvalidMode)?;
    if !des::is_key_valid(req.key) {
        return Err(CryptoError::InvalidKey(format!(
            "{} bytes is not a positive multiple of {DES_BLOCK_SIZE}",
            req.key.len()
        )));
    }
    let padding: Padding = choice(req.padding, config.defaults.padding, CryptoError::InvalidPadding)?;
    if !des::is_iv_valid(mode, req.iv) {
        return Err(CryptoError::InvalidIv(format!(
            "{} bytes is not a valid {mode} iv",
            req.iv.len()
        )));
    }
    let file_side = match direction {
        Direction::Encrypt => req.output.is_file(),
        Direction::Decrypt => req.input.is_file(),
    };
    let style = paths::style(Algorithm::Des, req.fmt, file_side)?;

    let len = paths::check_shape(req)?;
    if direction == Direction::Encrypt && !des::is_plain_valid(padding, len as usize) {
        return Err(paths::unaligned(len, DES_BLOCK_SIZE));
    }
    Ok((CipherSpec::new(mode, padding, req.key, req.iv), style))
}

impl Encryptor for DesCodec {
    fn name(&self) -> &str {
        Algorithm::Des.as_str()
    }

    fn encrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output> {
        let (spec, style) = validate(req, config, Direction::Encrypt)?;
        let transform = des::encryptor(&spec).map_err(paths::encrypt_err(Algorithm::Des))?;
        paths::encrypt(
            Plan {
                algo: Algorithm::Des,
                transform,
                reserve: 0,
                style,
                chunk_size: config.stream.chunk_size,
            },
            req,
        )
    }
}

impl Decryptor for DesCodec {
    fn name(&self) -> &str {
        Algorithm::Des.as_str()
    }

    fn decrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output> {
        let (spec, style) = validate(req, config, Direction::Decrypt)?;
        let transform = des::decryptor(&spec).map_err(paths::decrypt_err(Algorithm::Des))?;
        paths::decrypt(
            Plan {
                algo: Algorithm::Des,
                transform,
                reserve: 0,
                style,
                chunk_size: config.stream.chunk_size,
            },
            req,
        )
    }
}
