// src/core/rsa/keygen.rs
//! RSA key-pair generation
//!
//! Public exponent is fixed at 65537. Keys are emitted as SPKI + PKCS#8
//! (`x509`) or as PKCS#1 on both sides (`pkcs1`). A protected private key is
//! encrypted with exactly the cipher its mode names:
//!
//! - `x509`: encrypted PKCS#8 (PBES2, PBKDF2-SHA256, AES-{128,192,256}-CBC).
//!   PBES2 has no CFB / OFB scheme here, so only the `_cbc` modes apply.
//! - `pkcs1`: traditional `RSA PRIVATE KEY` with a `DEK-Info` header, for
//!   the `_cbc`, `_cfb` and `_ofb` modes.
//!
//! The `_ecb` modes are refused for both formats; neither encoding has a
//! place for an ECB cipher.

use ::rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use ::rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use ::rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use pkcs8::pkcs5::pbes2;
use pkcs8::PrivateKeyInfo;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::info;

use crate::aliases::{Passphrase, PrivatePem};
use crate::consts::{PRIVATE_KEY_KDF_ITERATIONS, RSA_KEY_BITS, RSA_PUBLIC_EXPONENT};
use crate::core::rsa::dek::{self, DekCipher};
use crate::core::stream::Result;
use crate::enums::{AesMode, KeyFormat, KeygenMode};
use crate::error::EngineError;

const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";

/// Freshly generated PEM pair
#[derive(Debug)]
pub struct KeyPair {
    pub public_pem: String,
    pub private_pem: PrivatePem,
}

pub fn is_key_pair_bits_valid(bits: usize) -> bool {
    RSA_KEY_BITS.contains(&bits)
}

/// Per-cipher passphrase floor; unprotected keys accept anything
pub fn is_passphrase_valid(mode: KeygenMode, passphrase: Option<&Passphrase>) -> bool {
    match (mode, passphrase) {
        (KeygenMode::None, _) => true,
        (_, None) => false,
        (m, Some(p)) => p.expose_secret().len() >= m.min_passphrase_len(),
    }
}

pub fn make_key_pair(
    bits: usize,
    format: KeyFormat,
    mode: KeygenMode,
    passphrase: Option<&Passphrase>,
) -> Result<KeyPair> {
    if !is_key_pair_bits_valid(bits) {
        return Err(EngineError::KeyBits(bits));
    }
    if !is_passphrase_valid(mode, passphrase) {
        return Err(EngineError::WeakPassphrase(mode.min_passphrase_len()));
    }

    let cipher = protection(format, mode)?;

    let exp = BigUint::from(RSA_PUBLIC_EXPONENT);
    let private = RsaPrivateKey::new_with_exp(&mut OsRng, bits, &exp)?;
    let public = RsaPublicKey::from(&private);

    let public_pem = match format {
        KeyFormat::X509 => public.to_public_key_pem(LineEnding::LF)?,
        KeyFormat::Pkcs1 => public.to_pkcs1_pem(LineEnding::LF)?,
    };

    let private_pem = match (cipher, passphrase) {
        (Some((aes_bits, chaining)), Some(pass)) => {
            protect(&private, format, aes_bits, chaining, pass)?
        }
        _ => match format {
            KeyFormat::X509 => private.to_pkcs8_pem(LineEnding::LF)?.to_string(),
            KeyFormat::Pkcs1 => private.to_pkcs1_pem(LineEnding::LF)?.to_string(),
        },
    };

    info!(bits, format = format.as_str(), mode = mode.as_str(), "generated RSA key pair");
    Ok(KeyPair {
        public_pem,
        private_pem: PrivatePem::new(private_pem),
    })
}

/// AES key size and chaining mode protecting the private key, if any
///
/// Refuses combinations the chosen format cannot encode instead of
/// substituting another cipher.
pub fn protection(format: KeyFormat, mode: KeygenMode) -> Result<Option<(usize, AesMode)>> {
    let (Some(bits), Some(chaining)) = (mode.aes_bits(), mode.chaining()) else {
        return Ok(None);
    };
    match (format, chaining) {
        (_, AesMode::Ecb) => Err(EngineError::Unsupported("ECB cannot protect a PEM private key")),
        (KeyFormat::X509, AesMode::Cbc) | (KeyFormat::Pkcs1, _) => Ok(Some((bits, chaining))),
        (KeyFormat::X509, _) => Err(EngineError::Unsupported("PKCS#8 protection takes AES-CBC only")),
    }
}

fn protect(
    private: &RsaPrivateKey,
    format: KeyFormat,
    aes_bits: usize,
    chaining: AesMode,
    pass: &Passphrase,
) -> Result<String> {
    match format {
        KeyFormat::Pkcs1 => {
            let der = private.to_pkcs1_der()?;
            let cipher = DekCipher::new(aes_bits, chaining)?;
            dek::encrypt_pem(der.as_bytes(), cipher, pass.expose_secret().as_bytes())
        }
        KeyFormat::X509 => protect_pkcs8(private, aes_bits, pass),
    }
}

/// Encrypted PKCS#8 under PBES2 with AES-`aes_bits`-CBC
fn protect_pkcs8(private: &RsaPrivateKey, aes_bits: usize, pass: &Passphrase) -> Result<String> {
    let mut salt = [0u8; 16];
    let mut iv = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let kdf = pbes2::Pbkdf2Params::hmac_with_sha256(PRIVATE_KEY_KDF_ITERATIONS, &salt)
        .map_err(|_| EngineError::Primitive("PBKDF2 parameters rejected"))?;
    let encryption = match aes_bits {
        128 => pbes2::EncryptionScheme::Aes128Cbc { iv: &iv },
        192 => pbes2::EncryptionScheme::Aes192Cbc { iv: &iv },
        _ => pbes2::EncryptionScheme::Aes256Cbc { iv: &iv },
    };
    let params = pbes2::Parameters {
        kdf: kdf.into(),
        encryption,
    };

    let der = private.to_pkcs8_der()?;
    let info = PrivateKeyInfo::try_from(der.as_bytes())?;
    let encrypted = info.encrypt_with_params(params, pass.expose_secret().as_bytes())?;
    let pem = encrypted
        .to_pem(ENCRYPTED_PRIVATE_KEY_LABEL, LineEnding::LF)
        .map_err(pkcs8::Error::from)?;
    Ok(pem.to_string())
}
