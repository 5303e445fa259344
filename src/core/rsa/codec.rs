// src/core/rsa/codec.rs
//! PEM key loading and chunked RSA transforms
//!
//! Payloads longer than one modulus are split into `k - overhead` byte
//! chunks (k = modulus bytes) and each chunk is one RSA operation. This is
//! plain chunked RSA; there is no session key.

use ::rsa::hazmat::{rsa_decrypt, rsa_encrypt};
use ::rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use ::rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use ::rsa::traits::PublicKeyParts;
use ::rsa::{BigUint, Oaep, Pkcs1v15Encrypt, Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey};
use rand::rngs::OsRng;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::rsa::dek;
use crate::core::stream::{Result, Transform};
use crate::enums::RsaPadding;
use crate::error::EngineError;

fn pem_str(pem: &[u8]) -> Result<&str> {
    std::str::from_utf8(pem).map_err(|_| EngineError::KeyNotRecognised)
}

/// SubjectPublicKeyInfo first, then PKCS#1 `RSA PUBLIC KEY`
pub fn load_public_key(pem: &[u8]) -> Result<RsaPublicKey> {
    let pem = pem_str(pem)?;
    if let Ok(key) = RsaPublicKey::from_public_key_pem(pem) {
        return Ok(key);
    }
    RsaPublicKey::from_pkcs1_pem(pem).map_err(|_| EngineError::KeyNotRecognised)
}

/// PKCS#1 `RSA PRIVATE KEY` (plain or `DEK-Info` encrypted) first, then
/// PKCS#8 (plain or encrypted)
pub fn load_private_key(pem: &[u8], passphrase: Option<&str>) -> Result<RsaPrivateKey> {
    let pem = pem_str(pem)?;
    if dek::is_encrypted(pem) {
        let pass = passphrase.ok_or(EngineError::KeyNotRecognised)?;
        let der = dek::decrypt_pem(pem, pass.as_bytes())?;
        return RsaPrivateKey::from_pkcs1_der(der.expose_secret())
            .map_err(|_| EngineError::BadPassphrase);
    }
    if let Ok(key) = RsaPrivateKey::from_pkcs1_pem(pem) {
        return Ok(key);
    }
    if let Ok(key) = RsaPrivateKey::from_pkcs8_pem(pem) {
        return Ok(key);
    }
    match passphrase {
        Some(pass) => Ok(RsaPrivateKey::from_pkcs8_encrypted_pem(pem, pass)?),
        None => Err(EngineError::KeyNotRecognised),
    }
}

/// Largest plaintext one RSA operation can take under `padding`
pub fn max_chunk(padding: RsaPadding, modulus_bytes: usize) -> usize {
    modulus_bytes.saturating_sub(padding.overhead())
}

/// `no_padding` payloads must fill whole modulus-sized blocks
pub fn is_plain_valid(padding: RsaPadding, modulus_bytes: usize, len: usize) -> bool {
    match padding {
        RsaPadding::NoPadding => modulus_bytes > 0 && len % modulus_bytes == 0,
        _ => true,
    }
}

/// Ciphertext upper bound; 0 when the key does not load
pub fn encode_len_reserve(pem: &[u8], padding: RsaPadding, len: usize) -> usize {
    let Ok(key) = load_public_key(pem) else {
        return 0;
    };
    let k = key.size();
    let chunk = max_chunk(padding, k);
    if chunk == 0 {
        return 0;
    }
    len.div_ceil(chunk).max(1) * k
}

/// Plaintext upper bound; 0 when the key does not load
pub fn decode_len_reserve(pem: &[u8], passphrase: Option<&str>, len: usize) -> usize {
    match load_private_key(pem, passphrase) {
        Ok(_) => len,
        Err(_) => 0,
    }
}

fn left_pad(value: BigUint, width: usize) -> Result<Vec<u8>> {
    let bytes = value.to_bytes_be();
    if bytes.len() > width {
        return Err(EngineError::Primitive("RSA output wider than modulus"));
    }
    let mut out = vec![0u8; width - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}

fn representative(block: &[u8], n: &BigUint) -> Result<BigUint> {
    let m = BigUint::from_bytes_be(block);
    if &m >= n {
        return Err(EngineError::Primitive("message representative out of range"));
    }
    Ok(m)
}

enum RsaOp {
    Encrypt(RsaPublicKey),
    Decrypt(RsaPrivateKey),
}

impl RsaOp {
    fn modulus_bytes(&self) -> usize {
        match self {
            RsaOp::Encrypt(k) => k.size(),
            RsaOp::Decrypt(k) => k.size(),
        }
    }

    fn apply(&self, padding: RsaPadding, block: &[u8]) -> Result<Vec<u8>> {
        let out = match (self, padding) {
            (RsaOp::Encrypt(key), RsaPadding::Pkcs1) => {
                key.encrypt(&mut OsRng, Pkcs1v15Encrypt, block)?
            }
            (RsaOp::Encrypt(key), RsaPadding::Pkcs1Oaep) => {
                key.encrypt(&mut OsRng, Oaep::new::<Sha1>(), block)?
            }
            (RsaOp::Encrypt(key), RsaPadding::NoPadding) => {
                let m = representative(block, key.n())?;
                left_pad(rsa_encrypt(key, &m)?, key.size())?
            }
            (RsaOp::Decrypt(key), RsaPadding::Pkcs1) => key.decrypt(Pkcs1v15Encrypt, block)?,
            (RsaOp::Decrypt(key), RsaPadding::Pkcs1Oaep) => {
                key.decrypt(Oaep::new::<Sha1>(), block)?
            }
            (RsaOp::Decrypt(key), RsaPadding::NoPadding) => {
                let c = representative(block, key.n())?;
                left_pad(rsa_decrypt(Some(&mut OsRng), key, &c)?, key.size())?
            }
            (_, RsaPadding::X931 | RsaPadding::Pkcs1Pss) => {
                return Err(EngineError::Unsupported("signature-only RSA padding"))
            }
        };
        Ok(out)
    }
}

/// Chunked RSA as a streaming [`Transform`]
pub struct RsaChunker {
    op: RsaOp,
    padding: RsaPadding,
    chunk: usize,
    carry: Vec<u8>,
}

impl RsaChunker {
    fn new(op: RsaOp, padding: RsaPadding) -> Result<Self> {
        if matches!(padding, RsaPadding::X931 | RsaPadding::Pkcs1Pss) {
            return Err(EngineError::Unsupported("signature-only RSA padding"));
        }
        let k = op.modulus_bytes();
        let chunk = match op {
            RsaOp::Encrypt(_) => max_chunk(padding, k),
            RsaOp::Decrypt(_) => k,
        };
        if chunk == 0 {
            return Err(EngineError::Unsupported("modulus too small for padding"));
        }
        debug!(modulus_bytes = k, chunk, padding = padding.as_str(), "rsa chunker ready");
        Ok(Self {
            op,
            padding,
            chunk,
            carry: Vec::new(),
        })
    }

    fn drain_full(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let full = self.carry.len() / self.chunk * self.chunk;
        for block in self.carry[..full].chunks(self.chunk) {
            out.extend_from_slice(&self.op.apply(self.padding, block)?);
        }
        self.carry.drain(..full);
        Ok(())
    }
}

impl Transform for RsaChunker {
    fn update(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<()> {
        self.carry.extend_from_slice(data);
        self.drain_full(out)
    }

    fn finish(mut self: Box<Self>, data: &[u8], _trailer: &[u8], out: &mut Vec<u8>) -> Result<()> {
        self.carry.extend_from_slice(data);
        self.drain_full(out)?;
        if self.carry.is_empty() {
            return Ok(());
        }
        if matches!(self.op, RsaOp::Decrypt(_)) || self.padding == RsaPadding::NoPadding {
            return Err(EngineError::Unaligned {
                len: self.carry.len(),
                block: self.chunk,
            });
        }
        out.extend_from_slice(&self.op.apply(self.padding, &self.carry)?);
        Ok(())
    }
}

pub fn encryptor(pem: &[u8], padding: RsaPadding) -> Result<Box<dyn Transform>> {
    let key = load_public_key(pem)?;
    Ok(Box::new(RsaChunker::new(RsaOp::Encrypt(key), padding)?))
}

pub fn decryptor(
    pem: &[u8],
    passphrase: Option<&str>,
    padding: RsaPadding,
) -> Result<Box<dyn Transform>> {
    let key = load_private_key(pem, passphrase)?;
    Ok(Box::new(RsaChunker::new(RsaOp::Decrypt(key), padding)?))
}

/// Sign `message` with the private key
///
/// pkcs1 applies type-1 padding over the raw bytes, no_padding is the bare
/// private-key operation, pkcs1_pss signs the SHA-256 of `message`.
pub fn sign(
    pem: &[u8],
    passphrase: Option<&str>,
    padding: RsaPadding,
    message: &[u8],
) -> Result<Vec<u8>> {
    let key = load_private_key(pem, passphrase)?;
    let sig = match padding {
        RsaPadding::Pkcs1 => key.sign(Pkcs1v15Sign::new_unprefixed(), message)?,
        RsaPadding::Pkcs1Pss => {
            let digest = Sha256::digest(message);
            key.sign_with_rng(&mut OsRng, Pss::new::<Sha256>(), &digest)?
        }
        RsaPadding::NoPadding => {
            let m = representative(message, key.n())?;
            left_pad(rsa_decrypt(Some(&mut OsRng), &key, &m)?, key.size())?
        }
        _ => return Err(EngineError::Unsupported("RSA signature padding")),
    };
    Ok(sig)
}

/// Check `signature` over `message` with the public key
pub fn verify(pem: &[u8], padding: RsaPadding, message: &[u8], signature: &[u8]) -> Result<bool> {
    let key = load_public_key(pem)?;
    let ok = match padding {
        RsaPadding::Pkcs1 => key
            .verify(Pkcs1v15Sign::new_unprefixed(), message, signature)
            .is_ok(),
        RsaPadding::Pkcs1Pss => {
            let digest = Sha256::digest(message);
            key.verify(Pss::new::<Sha256>(), &digest, signature).is_ok()
        }
        RsaPadding::NoPadding => {
            let s = representative(signature, key.n())?;
            let recovered = left_pad(rsa_encrypt(&key, &s)?, key.size())?;
            let mut expected = vec![0u8; key.size().saturating_sub(message.len())];
            expected.extend_from_slice(message);
            recovered == expected
        }
        _ => return Err(EngineError::Unsupported("RSA signature padding")),
    };
    Ok(ok)
}
