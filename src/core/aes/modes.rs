// src/core/aes/modes.rs
//! Classic streaming modes plus CBC-HMAC, as in-place [`BlockChain`]s

use ::aes::cipher::generic_array::GenericArray;
use ::aes::cipher::{
    BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, KeyInit, KeyIvInit,
    StreamCipher,
};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

use crate::consts::AES_BLOCK_SIZE;
use crate::core::padding::check_aligned;
use crate::core::stream::{BlockChain, Direction, Result};
use crate::enums::AesMode;
use crate::error::EngineError;

type Block = GenericArray<u8, ::aes::cipher::consts::U16>;

/// Closure-backed chain with no trailer
struct FnChain<F>(F);

impl<F: FnMut(&mut [u8]) -> Result<()>> BlockChain for FnChain<F> {
    fn apply(&mut self, buf: &mut [u8]) -> Result<()> {
        (self.0)(buf)
    }
}

fn boxed<F>(f: F) -> Box<dyn BlockChain>
where
    F: FnMut(&mut [u8]) -> Result<()> + 'static,
{
    Box::new(FnChain(f))
}

fn for_blocks(buf: &mut [u8], mut f: impl FnMut(&mut Block)) -> Result<()> {
    check_aligned(buf.len(), AES_BLOCK_SIZE)?;
    for chunk in buf.chunks_exact_mut(AES_BLOCK_SIZE) {
        f(GenericArray::from_mut_slice(chunk));
    }
    Ok(())
}

fn bad_key(key: &[u8]) -> EngineError {
    EngineError::KeyLength(key.len())
}

fn bad_iv(iv: &[u8]) -> EngineError {
    EngineError::IvLength(iv.len())
}

/// Shift a 128-bit register left by one bit, feeding `bit` in at the bottom
fn shift_in_bit(reg: &mut [u8; AES_BLOCK_SIZE], bit: u8) {
    for i in 0..AES_BLOCK_SIZE - 1 {
        reg[i] = (reg[i] << 1) | (reg[i + 1] >> 7);
    }
    reg[AES_BLOCK_SIZE - 1] = (reg[AES_BLOCK_SIZE - 1] << 1) | (bit & 1);
}

/// ecb / cbc / cfb1 / cfb8 / cfb128 / ofb / ctr
pub fn classic(
    mode: AesMode,
    key: &[u8],
    iv: &[u8],
    direction: Direction,
) -> Result<Box<dyn BlockChain>> {
    with_aes!(key.len(), A => {
        let encrypt = direction == Direction::Encrypt;
        let chain = match mode {
            AesMode::Ecb => {
                let c = A::new_from_slice(key).map_err(|_| bad_key(key))?;
                boxed(move |buf: &mut [u8]| {
                    for_blocks(buf, |b| {
                        if encrypt {
                            c.encrypt_block(b)
                        } else {
                            c.decrypt_block(b)
                        }
                    })
                })
            }
            AesMode::Cbc if encrypt => {
                let mut e = cbc::Encryptor::<A>::new_from_slices(key, iv).map_err(|_| bad_iv(iv))?;
                boxed(move |buf: &mut [u8]| for_blocks(buf, |b| e.encrypt_block_mut(b)))
            }
            AesMode::Cbc => {
                let mut d = cbc::Decryptor::<A>::new_from_slices(key, iv).map_err(|_| bad_iv(iv))?;
                boxed(move |buf: &mut [u8]| for_blocks(buf, |b| d.decrypt_block_mut(b)))
            }
            AesMode::Cfb128 if encrypt => {
                let mut e =
                    cfb_mode::Encryptor::<A>::new_from_slices(key, iv).map_err(|_| bad_iv(iv))?;
                boxed(move |buf: &mut [u8]| for_blocks(buf, |b| e.encrypt_block_mut(b)))
            }
            AesMode::Cfb128 => {
                let mut d =
                    cfb_mode::Decryptor::<A>::new_from_slices(key, iv).map_err(|_| bad_iv(iv))?;
                boxed(move |buf: &mut [u8]| for_blocks(buf, |b| d.decrypt_block_mut(b)))
            }
            AesMode::Cfb8 if encrypt => {
                let mut e = cfb8::Encryptor::<A>::new_from_slices(key, iv).map_err(|_| bad_iv(iv))?;
                boxed(move |buf: &mut [u8]| {
                    for byte in buf.chunks_exact_mut(1) {
                        e.encrypt_block_mut(GenericArray::from_mut_slice(byte));
                    }
                    Ok(())
                })
            }
            AesMode::Cfb8 => {
                let mut d = cfb8::Decryptor::<A>::new_from_slices(key, iv).map_err(|_| bad_iv(iv))?;
                boxed(move |buf: &mut [u8]| {
                    for byte in buf.chunks_exact_mut(1) {
                        d.decrypt_block_mut(GenericArray::from_mut_slice(byte));
                    }
                    Ok(())
                })
            }
            AesMode::Cfb1 => {
                let c = A::new_from_slice(key).map_err(|_| bad_key(key))?;
                let mut reg: [u8; AES_BLOCK_SIZE] = iv.try_into().map_err(|_| bad_iv(iv))?;
                boxed(move |buf: &mut [u8]| {
                    for byte in buf.iter_mut() {
                        let mut out = 0u8;
                        for bit in (0..8).rev() {
                            let mut ks = Block::clone_from_slice(&reg);
                            c.encrypt_block(&mut ks);
                            let input = (*byte >> bit) & 1;
                            let output = input ^ (ks[0] >> 7);
                            shift_in_bit(&mut reg, if encrypt { output } else { input });
                            out |= output << bit;
                        }
                        *byte = out;
                    }
                    Ok(())
                })
            }
            AesMode::Ofb => {
                let mut s = ofb::Ofb::<A>::new_from_slices(key, iv).map_err(|_| bad_iv(iv))?;
                boxed(move |buf: &mut [u8]| {
                    s.apply_keystream(buf);
                    Ok(())
                })
            }
            AesMode::Ctr => {
                let mut s = ctr::Ctr128BE::<A>::new_from_slices(key, iv).map_err(|_| bad_iv(iv))?;
                boxed(move |buf: &mut [u8]| {
                    s.apply_keystream(buf);
                    Ok(())
                })
            }
            _ => return Err(EngineError::Unsupported("not a streaming AES mode")),
        };
        Ok(chain)
    })
}

enum MacState {
    Sha1(Hmac<Sha1>),
    Sha256(Hmac<Sha256>),
}

impl MacState {
    fn new(mode: AesMode, key: &[u8]) -> Result<Self> {
        let state = match mode {
            AesMode::CbcHmacSha1 => {
                MacState::Sha1(<Hmac<Sha1> as Mac>::new_from_slice(key).map_err(|_| bad_key(key))?)
            }
            _ => MacState::Sha256(
                <Hmac<Sha256> as Mac>::new_from_slice(key).map_err(|_| bad_key(key))?,
            ),
        };
        Ok(state)
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            MacState::Sha1(m) => m.update(data),
            MacState::Sha256(m) => m.update(data),
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            MacState::Sha1(m) => m.finalize().into_bytes().to_vec(),
            MacState::Sha256(m) => m.finalize().into_bytes().to_vec(),
        }
    }

    fn verify(self, tag: &[u8]) -> Result<()> {
        let ok = match self {
            MacState::Sha1(m) => m.verify_slice(tag).is_ok(),
            MacState::Sha256(m) => m.verify_slice(tag).is_ok(),
        };
        if ok {
            Ok(())
        } else {
            Err(EngineError::TagMismatch)
        }
    }
}

/// CBC encrypt-then-MAC; the HMAC covers IV and ciphertext
pub struct CbcHmac {
    cbc: Box<dyn BlockChain>,
    mac: MacState,
    direction: Direction,
    tag_len: usize,
}

impl CbcHmac {
    pub fn new(mode: AesMode, key: &[u8], iv: &[u8], direction: Direction) -> Result<Self> {
        let cbc = classic(AesMode::Cbc, key, iv, direction)?;
        let mut mac = MacState::new(mode, key)?;
        mac.update(iv);
        Ok(Self {
            cbc,
            mac,
            direction,
            tag_len: mode.trailer_len(),
        })
    }
}

impl BlockChain for CbcHmac {
    fn apply(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.direction {
            Direction::Encrypt => {
                self.cbc.apply(buf)?;
                self.mac.update(buf);
            }
            Direction::Decrypt => {
                self.mac.update(buf);
                self.cbc.apply(buf)?;
            }
        }
        Ok(())
    }

    fn seal(self: Box<Self>) -> Result<Vec<u8>> {
        Ok(self.mac.finalize())
    }

    fn verify(self: Box<Self>, trailer: &[u8]) -> Result<()> {
        if trailer.len() != self.tag_len {
            return Err(EngineError::Truncated(self.tag_len));
        }
        self.mac.verify(trailer)
    }
}
