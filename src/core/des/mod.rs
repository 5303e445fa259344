// src/core/des/mod.rs
//! DES / 3DES block engine
//!
//! Key material is split into 8-byte sub-keys and run through an EDE
//! schedule (see [`schedule`]). Chaining is done by hand in [`chain`] on top
//! of the raw block primitive. Every entry point goes through the shared
//! lookahead driver, so padding and unpadding happen exactly once, on the
//! final chunk.

pub mod chain;
pub mod schedule;

use std::io::{Read, Write};
use std::path::Path;

use crate::consts::{DEFAULT_CHUNK_SIZE, DES_BLOCK_SIZE};
use crate::core::padding::padded_len;
use crate::core::stream::{self, Chained, Direction, Result, Transform};
use crate::core::CipherSpec;
use crate::enums::{DesMode, Padding};
use crate::error::EngineError;

pub use schedule::{is_key_valid, EdeSchedule};

use chain::DesChain;

/// ECB forbids an IV, every other mode needs a full 8-byte block
pub fn is_iv_valid(mode: DesMode, iv: &[u8]) -> bool {
    match mode {
        DesMode::Ecb => iv.is_empty(),
        _ => iv.len() == DES_BLOCK_SIZE,
    }
}

/// `no_padding` plaintext must already be block aligned
pub fn is_plain_valid(padding: Padding, len: usize) -> bool {
    !padding.is_none() || len % DES_BLOCK_SIZE == 0
}

pub fn encode_len_reserve(padding: Padding, len: usize) -> usize {
    padded_len(padding, DES_BLOCK_SIZE, len)
}

pub fn decode_len_reserve(len: usize) -> usize {
    len
}

fn transform(spec: &CipherSpec<DesMode>, direction: Direction) -> Result<Box<dyn Transform>> {
    let ede = EdeSchedule::new(spec.key())?;
    if !is_iv_valid(spec.mode, spec.iv()) {
        return Err(EngineError::IvLength(spec.iv().len()));
    }

    let iv = match spec.mode {
        DesMode::Ecb => None,
        _ => {
            let mut block = [0u8; DES_BLOCK_SIZE];
            block.copy_from_slice(spec.iv());
            Some(block)
        }
    };

    let chain = DesChain::new(ede, spec.mode, direction, iv);
    Ok(Box::new(Chained::new(
        Box::new(chain),
        direction,
        spec.padding,
        DES_BLOCK_SIZE,
    )))
}

pub fn encryptor(spec: &CipherSpec<DesMode>) -> Result<Box<dyn Transform>> {
    transform(spec, Direction::Encrypt)
}

pub fn decryptor(spec: &CipherSpec<DesMode>) -> Result<Box<dyn Transform>> {
    transform(spec, Direction::Decrypt)
}

pub fn encode(src: &[u8], spec: &CipherSpec<DesMode>) -> Result<Vec<u8>> {
    let reserve = encode_len_reserve(spec.padding, src.len());
    stream::drive_vec(encryptor(spec)?, src, DEFAULT_CHUNK_SIZE, 0, reserve)
}

pub fn decode(src: &[u8], spec: &CipherSpec<DesMode>) -> Result<Vec<u8>> {
    let reserve = decode_len_reserve(src.len());
    stream::drive_vec(decryptor(spec)?, src, DEFAULT_CHUNK_SIZE, 0, reserve)
}

pub fn encode_stream<R: Read, W: Write>(
    reader: R,
    writer: W,
    spec: &CipherSpec<DesMode>,
    chunk_size: usize,
) -> Result<u64> {
    stream::drive(encryptor(spec)?, reader, writer, chunk_size, 0)
}

pub fn decode_stream<R: Read, W: Write>(
    reader: R,
    writer: W,
    spec: &CipherSpec<DesMode>,
    chunk_size: usize,
) -> Result<u64> {
    stream::drive(decryptor(spec)?, reader, writer, chunk_size, 0)
}

pub fn encode_file(src: &Path, dst: &Path, spec: &CipherSpec<DesMode>, chunk_size: usize) -> Result<u64> {
    stream::drive_file(encryptor(spec)?, src, dst, chunk_size, 0)
}

pub fn decode_file(src: &Path, dst: &Path, spec: &CipherSpec<DesMode>, chunk_size: usize) -> Result<u64> {
    stream::drive_file(decryptor(spec)?, src, dst, chunk_size, 0)
}
