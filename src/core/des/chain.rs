// src/core/des/chain.rs
//! Hand-rolled ECB / CBC / CFB / OFB / CTR chaining over an EDE schedule

use crate::consts::DES_BLOCK_SIZE;
use crate::core::des::schedule::{Block, EdeSchedule};
use crate::core::padding::check_aligned;
use crate::core::stream::{BlockChain, Direction, Result};
use crate::enums::DesMode;

/// Chaining state for one call
pub struct DesChain {
    ede: EdeSchedule,
    mode: DesMode,
    direction: Direction,
    /// previous ciphertext (cbc, cfb), running output (ofb) or counter (ctr)
    register: Block,
}

impl DesChain {
    pub fn new(ede: EdeSchedule, mode: DesMode, direction: Direction, iv: Option<Block>) -> Self {
        Self {
            ede,
            mode,
            direction,
            register: iv.unwrap_or([0u8; DES_BLOCK_SIZE]),
        }
    }

    fn keystream(&self, input: &Block) -> Block {
        let mut ks = *input;
        self.ede.encrypt_block(&mut ks);
        ks
    }

    fn process(&mut self, block: &mut Block) {
        match (self.mode, self.direction) {
            (DesMode::Ecb, Direction::Encrypt) => self.ede.encrypt_block(block),
            (DesMode::Ecb, Direction::Decrypt) => self.ede.decrypt_block(block),
            (DesMode::Cbc, Direction::Encrypt) => {
                xor(block, &self.register);
                self.ede.encrypt_block(block);
                self.register = *block;
            }
            (DesMode::Cbc, Direction::Decrypt) => {
                let cipher = *block;
                self.ede.decrypt_block(block);
                xor(block, &self.register);
                self.register = cipher;
            }
            (DesMode::Cfb, Direction::Encrypt) => {
                let ks = self.keystream(&self.register);
                xor(block, &ks);
                self.register = *block;
            }
            (DesMode::Cfb, Direction::Decrypt) => {
                let ks = self.keystream(&self.register);
                self.register = *block;
                xor(block, &ks);
            }
            (DesMode::Ofb, _) => {
                self.register = self.keystream(&self.register);
                xor(block, &self.register);
            }
            (DesMode::Ctr, _) => {
                let ks = self.keystream(&self.register);
                xor(block, &ks);
                increment_be(&mut self.register);
            }
        }
    }
}

impl BlockChain for DesChain {
    fn apply(&mut self, buf: &mut [u8]) -> Result<()> {
        check_aligned(buf.len(), DES_BLOCK_SIZE)?;
        for chunk in buf.chunks_exact_mut(DES_BLOCK_SIZE) {
            let mut block = [0u8; DES_BLOCK_SIZE];
            block.copy_from_slice(chunk);
            self.process(&mut block);
            chunk.copy_from_slice(&block);
        }
        Ok(())
    }
}

fn xor(block: &mut Block, other: &Block) {
    for (b, o) in block.iter_mut().zip(other) {
        *b ^= o;
    }
}

/// 64-bit big-endian increment with byte-wise carry
pub(crate) fn increment_be(counter: &mut Block) {
    for byte in counter.iter_mut().rev() {
        let (next, carry) = byte.overflowing_add(1);
        *byte = next;
        if !carry {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_carries_across_bytes() {
        let mut c = [0, 0, 0, 0, 0, 0, 0x01, 0xff];
        increment_be(&mut c);
        assert_eq!(c, [0, 0, 0, 0, 0, 0, 0x02, 0x00]);

        let mut wrap = [0xff; 8];
        increment_be(&mut wrap);
        assert_eq!(wrap, [0; 8]);
    }

    #[test]
    fn ofb_is_its_own_inverse() {
        let iv = *b"abcdefgh";
        let mut enc = DesChain::new(
            EdeSchedule::new(b"12345678").unwrap(),
            DesMode::Ofb,
            Direction::Encrypt,
            Some(iv),
        );
        let mut dec = DesChain::new(
            EdeSchedule::new(b"12345678").unwrap(),
            DesMode::Ofb,
            Direction::Decrypt,
            Some(iv),
        );
        let mut buf = *b"sixteen byte msg";
        enc.apply(&mut buf).unwrap();
        assert_ne!(&buf, b"sixteen byte msg");
        dec.apply(&mut buf).unwrap();
        assert_eq!(&buf, b"sixteen byte msg");
    }
}
