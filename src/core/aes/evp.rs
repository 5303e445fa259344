// src/core/aes/evp.rs
//! Whole-buffer AES as OpenSSL's EVP layer applies it
//!
//! ECB and CBC pad with PKCS#7 and reject a bad pad on decrypt. CFB128 and
//! OFB run over the raw length with no padding. Used for encrypted PEM
//! bodies, where the whole document is already in memory.

use ::aes::cipher::{KeyIvInit, StreamCipher};

use crate::consts::AES_BLOCK_SIZE;
use crate::core::aes::modes;
use crate::core::padding::{pad, unpad};
use crate::core::stream::{BlockChain, Direction, Result};
use crate::enums::{AesMode, Padding};
use crate::error::EngineError;

pub fn encrypt(mode: AesMode, key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut buf = data.to_vec();
    match mode {
        AesMode::Ecb | AesMode::Cbc => {
            pad(Padding::Pkcs7, AES_BLOCK_SIZE, &mut buf)?;
            modes::classic(mode, key, iv, Direction::Encrypt)?.apply(&mut buf)?;
        }
        AesMode::Cfb128 | AesMode::Ofb => keystream(mode, key, iv, Direction::Encrypt, &mut buf)?,
        _ => return Err(EngineError::Unsupported("AES mode without an EVP form")),
    }
    Ok(buf)
}

/// Fails with [`EngineError::BadPassphrase`] when the PKCS#7 pad is wrong
pub fn decrypt(mode: AesMode, key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut buf = data.to_vec();
    match mode {
        AesMode::Ecb | AesMode::Cbc => {
            modes::classic(mode, key, iv, Direction::Decrypt)?.apply(&mut buf)?;
            if !unpad(Padding::Pkcs7, AES_BLOCK_SIZE, &mut buf) {
                return Err(EngineError::BadPassphrase);
            }
        }
        AesMode::Cfb128 | AesMode::Ofb => keystream(mode, key, iv, Direction::Decrypt, &mut buf)?,
        _ => return Err(EngineError::Unsupported("AES mode without an EVP form")),
    }
    Ok(buf)
}

fn keystream(mode: AesMode, key: &[u8], iv: &[u8], direction: Direction, buf: &mut [u8]) -> Result<()> {
    let bad_iv = |_| EngineError::IvLength(iv.len());
    with_aes!(key.len(), A => {
        match (mode, direction) {
            (AesMode::Ofb, _) => ofb::Ofb::<A>::new_from_slices(key, iv)
                .map_err(bad_iv)?
                .apply_keystream(buf),
            (_, Direction::Encrypt) => cfb_mode::BufEncryptor::<A>::new_from_slices(key, iv)
                .map_err(bad_iv)?
                .encrypt(buf),
            (_, Direction::Decrypt) => cfb_mode::BufDecryptor::<A>::new_from_slices(key, iv)
                .map_err(bad_iv)?
                .decrypt(buf),
        }
        Ok(())
    })
}
