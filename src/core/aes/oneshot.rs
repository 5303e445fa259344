// src/core/aes/oneshot.rs
//! Whole-message AES modes: ccm, ocb, xts, wrap, wrap_pad
//!
//! These primitives cannot emit output before the end of the message, so
//! they run behind [`OneShot`](crate::core::stream::OneShot), which buffers
//! the stream and hands over the complete (padded) payload at once.

use ::aes::cipher::consts::{U10, U11, U12, U13, U16, U7, U8, U9};
use ::aes::cipher::generic_array::GenericArray;
use ::aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use ccm::aead::Aead;
use ccm::Ccm;
use ocb3::Ocb3;
use xts_mode::Xts128;

use crate::aliases::{IvMaterial, KeyMaterial};
use crate::consts::{AEAD_TAG_SIZE, AES_BLOCK_SIZE};
use crate::core::aes::wrap;
use crate::core::stream::{Direction, Result};
use crate::enums::AesMode;
use crate::error::EngineError;

fn seal<C: Aead + KeyInit>(key: &[u8], nonce: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(key).map_err(|_| EngineError::KeyLength(key.len()))?;
    cipher
        .encrypt(GenericArray::from_slice(nonce), data)
        .map_err(|_| EngineError::Primitive("AEAD seal failed"))
}

fn open<C: Aead + KeyInit>(key: &[u8], nonce: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(key).map_err(|_| EngineError::KeyLength(key.len()))?;
    cipher
        .decrypt(GenericArray::from_slice(nonce), data)
        .map_err(|_| EngineError::TagMismatch)
}

macro_rules! ccm_nonce {
    ($aes:ty, $f:ident, $key:expr, $nonce:expr, $data:expr) => {
        match $nonce.len() {
            7 => $f::<Ccm<$aes, U16, U7>>($key, $nonce, $data),
            8 => $f::<Ccm<$aes, U16, U8>>($key, $nonce, $data),
            9 => $f::<Ccm<$aes, U16, U9>>($key, $nonce, $data),
            10 => $f::<Ccm<$aes, U16, U10>>($key, $nonce, $data),
            11 => $f::<Ccm<$aes, U16, U11>>($key, $nonce, $data),
            12 => $f::<Ccm<$aes, U16, U12>>($key, $nonce, $data),
            13 => $f::<Ccm<$aes, U16, U13>>($key, $nonce, $data),
            n => Err(EngineError::IvLength(n)),
        }
    };
}

fn aead(mode: AesMode, direction: Direction, key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    with_aes!(key.len(), A => {
        match (mode, direction) {
            (AesMode::Ccm, Direction::Encrypt) => ccm_nonce!(A, seal, key, iv, data),
            (AesMode::Ccm, Direction::Decrypt) => ccm_nonce!(A, open, key, iv, data),
            (_, Direction::Encrypt) => seal::<Ocb3<A>>(key, iv, data),
            (_, Direction::Decrypt) => open::<Ocb3<A>>(key, iv, data),
        }
    })
}

/// The whole message is one XTS data unit with the IV as its tweak
fn xts(direction: Direction, key: &[u8], iv: &[u8], mut data: Vec<u8>) -> Result<Vec<u8>> {
    let tweak: [u8; AES_BLOCK_SIZE] = iv.try_into().map_err(|_| EngineError::IvLength(iv.len()))?;
    if data.is_empty() {
        return Ok(data);
    }
    if data.len() < AES_BLOCK_SIZE {
        return Err(EngineError::Unaligned {
            len: data.len(),
            block: AES_BLOCK_SIZE,
        });
    }

    let half = key.len() / 2;
    with_aes!(half, A => {
        let k1 = A::new_from_slice(&key[..half]).map_err(|_| EngineError::KeyLength(key.len()))?;
        let k2 = A::new_from_slice(&key[half..]).map_err(|_| EngineError::KeyLength(key.len()))?;
        let xts = Xts128::<A>::new(k1, k2);
        match direction {
            Direction::Encrypt => xts.encrypt_sector(&mut data, tweak),
            Direction::Decrypt => xts.decrypt_sector(&mut data, tweak),
        }
        Ok(data)
    })
}

fn key_wrap(mode: AesMode, direction: Direction, key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let icv = (!iv.is_empty()).then_some(iv);
    with_aes!(key.len(), A => {
        let cipher = A::new_from_slice(key).map_err(|_| EngineError::KeyLength(key.len()))?;
        let enc = |b: &mut [u8; AES_BLOCK_SIZE]| cipher.encrypt_block(GenericArray::from_mut_slice(b));
        let dec = |b: &mut [u8; AES_BLOCK_SIZE]| cipher.decrypt_block(GenericArray::from_mut_slice(b));
        match (mode, direction) {
            (AesMode::Wrap, Direction::Encrypt) => wrap::wrap(&enc, icv, data),
            (AesMode::Wrap, Direction::Decrypt) => wrap::unwrap(&dec, icv, data),
            (_, Direction::Encrypt) => wrap::wrap_pad(&enc, icv, data),
            (_, Direction::Decrypt) => wrap::unwrap_pad(&dec, icv, data),
        }
    })
}

/// Build the deferred operation for a whole-message mode
///
/// On decrypt `trailer` holds the captured AEAD tag; the key and IV are
/// copied so the closure owns everything it needs.
pub fn operation(
    mode: AesMode,
    key: &[u8],
    iv: &[u8],
    direction: Direction,
) -> Result<Box<dyn FnOnce(Vec<u8>, &[u8]) -> Result<Vec<u8>>>> {
    let key = KeyMaterial::new(key.to_vec());
    let iv = IvMaterial::new(iv.to_vec());

    let op = move |data: Vec<u8>, trailer: &[u8]| -> Result<Vec<u8>> {
        let (key, iv) = (key.expose_secret(), iv.expose_secret());
        match mode {
            AesMode::Ccm | AesMode::Ocb => match direction {
                Direction::Encrypt => aead(mode, direction, key, iv, &data),
                Direction::Decrypt => {
                    if trailer.len() != AEAD_TAG_SIZE {
                        return Err(EngineError::Truncated(AEAD_TAG_SIZE));
                    }
                    let mut sealed = data;
                    sealed.extend_from_slice(trailer);
                    aead(mode, direction, key, iv, &sealed)
                }
            },
            AesMode::Xts => xts(direction, key, iv, data),
            AesMode::Wrap | AesMode::WrapPad => key_wrap(mode, direction, key, iv, &data),
            _ => Err(EngineError::Unsupported("not a whole-message AES mode")),
        }
    };
    Ok(Box::new(op))
}
