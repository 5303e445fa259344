// src/core/rsa/mod.rs
//! RSA codec: PEM loading, chunked encrypt / decrypt, sign / verify, keygen

pub mod codec;
pub mod dek;
pub mod keygen;

use std::io::{Read, Write};
use std::path::Path;

use crate::consts::DEFAULT_CHUNK_SIZE;
use crate::core::stream::{self, Result};
use crate::enums::RsaPadding;

pub use codec::{
    decode_len_reserve, decryptor, encode_len_reserve, encryptor, is_plain_valid,
    load_private_key, load_public_key, max_chunk, sign, verify,
};
pub use keygen::{is_key_pair_bits_valid, is_passphrase_valid, make_key_pair, KeyPair};

pub fn encode(src: &[u8], pem: &[u8], padding: RsaPadding) -> Result<Vec<u8>> {
    let reserve = encode_len_reserve(pem, padding, src.len());
    stream::drive_vec(encryptor(pem, padding)?, src, DEFAULT_CHUNK_SIZE, 0, reserve)
}

pub fn decode(src: &[u8], pem: &[u8], passphrase: Option<&str>, padding: RsaPadding) -> Result<Vec<u8>> {
    let transform = decryptor(pem, passphrase, padding)?;
    stream::drive_vec(transform, src, DEFAULT_CHUNK_SIZE, 0, src.len())
}

pub fn encode_stream<R: Read, W: Write>(
    reader: R,
    writer: W,
    pem: &[u8],
    padding: RsaPadding,
    chunk_size: usize,
) -> Result<u64> {
    stream::drive(encryptor(pem, padding)?, reader, writer, chunk_size, 0)
}

pub fn decode_stream<R: Read, W: Write>(
    reader: R,
    writer: W,
    pem: &[u8],
    passphrase: Option<&str>,
    padding: RsaPadding,
    chunk_size: usize,
) -> Result<u64> {
    let transform = decryptor(pem, passphrase, padding)?;
    stream::drive(transform, reader, writer, chunk_size, 0)
}

pub fn encode_file(src: &Path, dst: &Path, pem: &[u8], padding: RsaPadding, chunk_size: usize) -> Result<u64> {
    stream::drive_file(encryptor(pem, padding)?, src, dst, chunk_size, 0)
}

pub fn decode_file(
    src: &Path,
    dst: &Path,
    pem: &[u8],
    passphrase: Option<&str>,
    padding: RsaPadding,
    chunk_size: usize,
) -> Result<u64> {
    let transform = decryptor(pem, passphrase, padding)?;
    stream::drive_file(transform, src, dst, chunk_size, 0)
}
