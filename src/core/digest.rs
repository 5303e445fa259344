// src/core/digest.rs
//! One-way md5 / sha256 as streaming transforms

use md5::Md5;
use sha2::{Digest, Sha256};

use crate::core::stream::{Result, Transform};

/// Streaming hash; emits the digest once, on the final chunk
pub struct DigestTransform<D> {
    hasher: D,
    /// emit lowercase hex text instead of raw bytes
    hex: bool,
}

impl<D: Digest> Transform for DigestTransform<D> {
    fn update(&mut self, data: &[u8], _out: &mut Vec<u8>) -> Result<()> {
        self.hasher.update(data);
        Ok(())
    }

    fn finish(self: Box<Self>, data: &[u8], _trailer: &[u8], out: &mut Vec<u8>) -> Result<()> {
        let DigestTransform { mut hasher, hex } = *self;
        hasher.update(data);
        let digest = hasher.finalize();
        if hex {
            out.extend_from_slice(hex::encode(digest).as_bytes());
        } else {
            out.extend_from_slice(&digest);
        }
        Ok(())
    }
}

/// md5 as lowercase hex text
pub fn md5() -> Box<dyn Transform> {
    Box::new(DigestTransform {
        hasher: Md5::new(),
        hex: true,
    })
}

/// sha256 as the raw 32-byte digest
pub fn sha256() -> Box<dyn Transform> {
    Box::new(DigestTransform {
        hasher: Sha256::new(),
        hex: false,
    })
}
