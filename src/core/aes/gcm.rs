// src/core/aes/gcm.rs
//! Streaming AES-GCM built from GHASH and a 32-bit counter
//!
//! Supports any IV length of at least one byte: 96-bit IVs take the fast
//! path `IV || 0^31 || 1`, everything else is GHASHed into J0 (SP 800-38D).
//! No associated data is used. The 16-byte tag is appended on encrypt and
//! checked in constant time on decrypt.

use ::aes::cipher::generic_array::GenericArray;
use ::aes::cipher::{BlockEncrypt, KeyInit, KeyIvInit, StreamCipher};
use ghash::universal_hash::UniversalHash;
use ghash::GHash;
use subtle::ConstantTimeEq;

use crate::consts::{AEAD_TAG_SIZE, AES_BLOCK_SIZE};
use crate::core::stream::{BlockChain, Direction, Result};
use crate::error::EngineError;

type Block = GenericArray<u8, ::aes::cipher::consts::U16>;

const FAST_PATH_IV_LEN: usize = 12;

pub struct GcmChain {
    keystream: Box<dyn FnMut(&mut [u8])>,
    ghash: GHash,
    /// E(K, J0)
    tag_mask: Block,
    cipher_len: u64,
    direction: Direction,
}

impl GcmChain {
    pub fn new(key: &[u8], iv: &[u8], direction: Direction) -> Result<Self> {
        if iv.is_empty() {
            return Err(EngineError::IvLength(0));
        }

        with_aes!(key.len(), A => {
            let cipher = A::new_from_slice(key).map_err(|_| EngineError::KeyLength(key.len()))?;

            let mut h = Block::default();
            cipher.encrypt_block(&mut h);

            let j0 = derive_j0(&h, iv);
            let mut tag_mask = j0;
            cipher.encrypt_block(&mut tag_mask);

            let mut ctr = ctr::Ctr32BE::<A>::new_from_slices(key, &inc32(j0))
                .map_err(|_| EngineError::IvLength(iv.len()))?;

            Ok(Self {
                keystream: Box::new(move |buf: &mut [u8]| ctr.apply_keystream(buf)),
                ghash: GHash::new(&h),
                tag_mask,
                cipher_len: 0,
                direction,
            })
        })
    }

    fn tag(self) -> Block {
        let mut ghash = self.ghash;
        ghash.update(&[length_block(0, self.cipher_len)]);
        let mut tag = ghash.finalize();
        for (t, m) in tag.iter_mut().zip(self.tag_mask.iter()) {
            *t ^= m;
        }
        tag
    }
}

impl BlockChain for GcmChain {
    fn apply(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.direction == Direction::Decrypt {
            self.ghash.update_padded(buf);
        }
        (self.keystream)(buf);
        if self.direction == Direction::Encrypt {
            self.ghash.update_padded(buf);
        }
        self.cipher_len += buf.len() as u64;
        Ok(())
    }

    fn seal(self: Box<Self>) -> Result<Vec<u8>> {
        Ok(self.tag().to_vec())
    }

    fn verify(self: Box<Self>, trailer: &[u8]) -> Result<()> {
        if trailer.len() != AEAD_TAG_SIZE {
            return Err(EngineError::Truncated(AEAD_TAG_SIZE));
        }
        let expected = self.tag();
        if bool::from(expected.as_slice().ct_eq(trailer)) {
            Ok(())
        } else {
            Err(EngineError::TagMismatch)
        }
    }
}

fn derive_j0(h: &Block, iv: &[u8]) -> Block {
    if iv.len() == FAST_PATH_IV_LEN {
        let mut j0 = Block::default();
        j0[..FAST_PATH_IV_LEN].copy_from_slice(iv);
        j0[AES_BLOCK_SIZE - 1] = 1;
        return j0;
    }

    let mut ghash = GHash::new(h);
    ghash.update_padded(iv);
    ghash.update(&[length_block(0, iv.len() as u64)]);
    ghash.finalize()
}

/// `[len(A)]64 || [len(C)]64`, both in bits
fn length_block(aad_bytes: u64, data_bytes: u64) -> Block {
    let mut block = Block::default();
    block[..8].copy_from_slice(&(aad_bytes * 8).to_be_bytes());
    block[8..].copy_from_slice(&(data_bytes * 8).to_be_bytes());
    block
}

fn inc32(mut block: Block) -> Block {
    let mut ctr = [0u8; 4];
    ctr.copy_from_slice(&block[AES_BLOCK_SIZE - 4..]);
    let next = u32::from_be_bytes(ctr).wrapping_add(1);
    block[AES_BLOCK_SIZE - 4..].copy_from_slice(&next.to_be_bytes());
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inc32_wraps_only_the_low_word() {
        let mut block = Block::default();
        block[11] = 0x07;
        block[12..].copy_from_slice(&[0xff; 4]);
        let next = inc32(block);
        assert_eq!(next[11], 0x07);
        assert_eq!(&next[12..], &[0, 0, 0, 0]);
    }

    #[test]
    fn empty_plaintext_tag_matches_nist_case_1() {
        let chain = Box::new(GcmChain::new(&[0u8; 16], &[0u8; 12], Direction::Encrypt).unwrap());
        let tag = chain.seal().unwrap();
        assert_eq!(hex::encode(tag), "58e2fccefa7e3061367f1d57a4e7455a");
    }
}
