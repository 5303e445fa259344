// src/core/aes/mod.rs
//! AES block engine
//!
//! Mode catalog: ecb, cbc, cfb1, cfb8, cfb128 (alias cfb), ofb, ctr, gcm,
//! ccm, xts, wrap, wrap_pad, cbc_hmac_sha1, cbc_hmac_sha256, ocb.
//!
//! The library ciphers never pad on their own; the padding engine runs on
//! the final chunk only, through the shared stream driver. Modes with a
//! trailer (AEAD tag or HMAC) append it after the ciphertext on encrypt and
//! have the driver split it off the end of the input on decrypt.

use std::io::{Read, Write};
use std::path::Path;

use crate::consts::{AES_BLOCK_SIZE, DEFAULT_CHUNK_SIZE};
use crate::core::padding::padded_len;
use crate::core::stream::{self, BlockChain, Chained, Direction, OneShot, Result, Transform};
use crate::core::CipherSpec;
use crate::enums::{AesMode, Padding};
use crate::error::EngineError;

/// Expand `$body` once per AES key size, with `$aes` bound to the cipher type
macro_rules! with_aes {
    ($len:expr, $aes:ident => $body:expr) => {
        match $len {
            16 => {
                type $aes = ::aes::Aes128;
                $body
            }
            24 => {
                type $aes = ::aes::Aes192;
                $body
            }
            32 => {
                type $aes = ::aes::Aes256;
                $body
            }
            n => Err($crate::error::EngineError::KeyLength(n)),
        }
    };
}

pub mod evp;
pub mod gcm;
pub mod modes;
pub mod oneshot;
pub mod wrap;

pub fn is_key_valid(mode: AesMode, key: &[u8]) -> bool {
    mode.key_lengths().contains(&key.len())
}

pub fn is_iv_valid(mode: AesMode, iv: &[u8]) -> bool {
    mode.accepts_iv_len(iv.len())
}

/// `no_padding` plaintext must already fill whole blocks of the mode
pub fn is_plain_valid(mode: AesMode, padding: Padding, len: usize) -> bool {
    !padding.is_none() || len % mode.block_size() == 0
}

/// Upper bound of the ciphertext size for `len` plaintext bytes
pub fn encode_len_reserve(mode: AesMode, padding: Padding, len: usize) -> usize {
    let body = if mode.is_stream_like() {
        len + AES_BLOCK_SIZE
    } else {
        padded_len(padding, AES_BLOCK_SIZE, len)
    };
    // wrap adds one semiblock of ICV
    body + mode.trailer_len() + AES_BLOCK_SIZE / 2
}

pub fn decode_len_reserve(len: usize) -> usize {
    len
}

fn transform(spec: &CipherSpec<AesMode>, direction: Direction) -> Result<Box<dyn Transform>> {
    let (mode, key, iv) = (spec.mode, spec.key(), spec.iv());
    if !is_key_valid(mode, key) {
        return Err(EngineError::KeyLength(key.len()));
    }
    if !is_iv_valid(mode, iv) {
        return Err(EngineError::IvLength(iv.len()));
    }

    let block_size = mode.block_size();
    let chain: Box<dyn BlockChain> = match mode {
        AesMode::Ccm | AesMode::Ocb | AesMode::Xts | AesMode::Wrap | AesMode::WrapPad => {
            let op = oneshot::operation(mode, key, iv, direction)?;
            return Ok(Box::new(OneShot::new(direction, spec.padding, block_size, op)));
        }
        AesMode::Gcm => Box::new(gcm::GcmChain::new(key, iv, direction)?),
        AesMode::CbcHmacSha1 | AesMode::CbcHmacSha256 => {
            Box::new(modes::CbcHmac::new(mode, key, iv, direction)?)
        }
        _ => modes::classic(mode, key, iv, direction)?,
    };
    Ok(Box::new(Chained::new(chain, direction, spec.padding, block_size)))
}

pub fn encryptor(spec: &CipherSpec<AesMode>) -> Result<Box<dyn Transform>> {
    transform(spec, Direction::Encrypt)
}

pub fn decryptor(spec: &CipherSpec<AesMode>) -> Result<Box<dyn Transform>> {
    transform(spec, Direction::Decrypt)
}

/// Trailing bytes the reader must hold back when decrypting
pub fn decrypt_reserve(mode: AesMode) -> usize {
    mode.trailer_len()
}

pub fn encode(src: &[u8], spec: &CipherSpec<AesMode>) -> Result<Vec<u8>> {
    let reserve = encode_len_reserve(spec.mode, spec.padding, src.len());
    stream::drive_vec(encryptor(spec)?, src, DEFAULT_CHUNK_SIZE, 0, reserve)
}

pub fn decode(src: &[u8], spec: &CipherSpec<AesMode>) -> Result<Vec<u8>> {
    stream::drive_vec(
        decryptor(spec)?,
        src,
        DEFAULT_CHUNK_SIZE,
        decrypt_reserve(spec.mode),
        decode_len_reserve(src.len()),
    )
}

pub fn encode_stream<R: Read, W: Write>(
    reader: R,
    writer: W,
    spec: &CipherSpec<AesMode>,
    chunk_size: usize,
) -> Result<u64> {
    stream::drive(encryptor(spec)?, reader, writer, chunk_size, 0)
}

pub fn decode_stream<R: Read, W: Write>(
    reader: R,
    writer: W,
    spec: &CipherSpec<AesMode>,
    chunk_size: usize,
) -> Result<u64> {
    let reserve = decrypt_reserve(spec.mode);
    stream::drive(decryptor(spec)?, reader, writer, chunk_size, reserve)
}

pub fn encode_file(src: &Path, dst: &Path, spec: &CipherSpec<AesMode>, chunk_size: usize) -> Result<u64> {
    stream::drive_file(encryptor(spec)?, src, dst, chunk_size, 0)
}

pub fn decode_file(src: &Path, dst: &Path, spec: &CipherSpec<AesMode>, chunk_size: usize) -> Result<u64> {
    let reserve = decrypt_reserve(spec.mode);
    stream::drive_file(decryptor(spec)?, src, dst, chunk_size, reserve)
}
