// src/core/des/schedule.rs
//! Multi-key EDE schedule over the raw DES block primitive
//!
//! N sub-keys are applied alternately encrypt, decrypt, encrypt, ... by
//! index parity. Decryption walks the keys backwards with each operation
//! swapped. Two sub-keys are expanded to K1 K2 K1 (two-key triple DES).

use des::cipher::generic_array::GenericArray;
use des::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use des::Des;

use crate::consts::DES_BLOCK_SIZE;
use crate::error::EngineError;

pub type Block = [u8; DES_BLOCK_SIZE];

pub struct EdeSchedule {
    keys: Vec<Des>,
}

impl EdeSchedule {
    pub fn new(key: &[u8]) -> Result<Self, EngineError> {
        if !is_key_valid(key) {
            return Err(EngineError::KeyLength(key.len()));
        }

        let mut keys = key
            .chunks_exact(DES_BLOCK_SIZE)
            .map(Des::new_from_slice)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| EngineError::KeyLength(key.len()))?;

        if keys.len() == 2 {
            let k1 = Des::new_from_slice(&key[..DES_BLOCK_SIZE])
                .map_err(|_| EngineError::KeyLength(key.len()))?;
            keys.push(k1);
        }
        Ok(Self { keys })
    }

    /// Number of sub-keys after two-key expansion
    pub fn rounds(&self) -> usize {
        self.keys.len()
    }

    pub fn encrypt_block(&self, block: &mut Block) {
        let block = GenericArray::from_mut_slice(block);
        for (i, key) in self.keys.iter().enumerate() {
            if i % 2 == 0 {
                key.encrypt_block(block);
            } else {
                key.decrypt_block(block);
            }
        }
    }

    pub fn decrypt_block(&self, block: &mut Block) {
        let block = GenericArray::from_mut_slice(block);
        for (i, key) in self.keys.iter().enumerate().rev() {
            if i % 2 == 0 {
                key.decrypt_block(block);
            } else {
                key.encrypt_block(block);
            }
        }
    }
}

/// Key length must be a positive multiple of the 8-byte sub-key size
pub fn is_key_valid(key: &[u8]) -> bool {
    !key.is_empty() && key.len() % DES_BLOCK_SIZE == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_keys_expand_to_three_rounds() {
        let ede = EdeSchedule::new(b"12345678abcdefgh").unwrap();
        assert_eq!(ede.rounds(), 3);
        assert_eq!(EdeSchedule::new(b"12345678").unwrap().rounds(), 1);
        assert_eq!(EdeSchedule::new(&[1u8; 32]).unwrap().rounds(), 4);
    }

    #[test]
    fn repeated_key_ede_collapses_to_single_des() {
        let single = EdeSchedule::new(b"12345678").unwrap();
        let triple = EdeSchedule::new(b"123456781234567812345678").unwrap();
        let mut a = *b"plaintxt";
        let mut b = a;
        single.encrypt_block(&mut a);
        triple.encrypt_block(&mut b);
        assert_eq!(a, b);
        triple.decrypt_block(&mut b);
        assert_eq!(&b, b"plaintxt");
    }

    #[test]
    fn partial_sub_key_is_rejected() {
        assert!(EdeSchedule::new(b"1234567").is_err());
        assert!(EdeSchedule::new(b"").is_err());
    }
}
