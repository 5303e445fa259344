// src/error.rs
//! Public error types for the entire crate
//!
//! [`CryptoError`] is what every registry / SDK call returns. Engine-level
//! failures ([`EngineError`]) and at-rest encoding failures ([`FormatError`])
//! are wrapped into it by the dispatch layer so callers always see the
//! algorithm and direction that failed.

use std::path::PathBuf;

use thiserror::Error;

use crate::consts::*;
use crate::enums::Algorithm;

/// Why an input was refused before any cryptographic work ran
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputFault {
    #[error("input file `{0}` does not exist")]
    NotFound(PathBuf),

    #[error("input `{0}` is not a regular file")]
    NotAFile(PathBuf),

    #[error("input of {len} bytes is not a multiple of the {block}-byte block")]
    Unaligned { len: usize, block: usize },
}

/// Failures raised by the cipher engines themselves
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data of {len} bytes is not a multiple of the {block}-byte block")]
    Unaligned { len: usize, block: usize },

    #[error("authentication tag mismatch")]
    TagMismatch,

    #[error("ciphertext shorter than its {0}-byte trailer")]
    Truncated(usize),

    #[error("invalid key length {0}")]
    KeyLength(usize),

    #[error("invalid iv length {0}")]
    IvLength(usize),

    #[error("{0}")]
    Primitive(&'static str),

    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    #[error("RSA operation failed: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("PKCS#1 encoding failed: {0}")]
    Pkcs1(#[from] rsa::pkcs1::Error),

    #[error("PKCS#8 encoding failed: {0}")]
    Pkcs8(#[from] pkcs8::Error),

    #[error("SubjectPublicKeyInfo encoding failed: {0}")]
    Spki(#[from] pkcs8::spki::Error),

    #[error("key is not valid PEM for any supported encoding")]
    KeyNotRecognised,

    #[error("wrong passphrase for the protected private key")]
    BadPassphrase,

    #[error("chunk size must be positive")]
    ZeroChunk,

    #[error("passphrase shorter than {0} bytes")]
    WeakPassphrase(usize),

    #[error("unsupported modulus size {0}")]
    KeyBits(usize),
}

/// Failures raised by the at-rest hex / base64 encoder
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("style `{0}` not found")]
    StyleNotFound(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Symbolic error category, stable across code renumbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CoreNotLoaded,
    InitFailed,
    DuplicateAlgorithm,
    InvalidFmt,
    InvalidInput,
    InvalidOutput,
    InvalidAlgo,
    InvalidKey,
    InvalidPadding,
    InvalidIv,
    InvalidMode,
    EncryptFailed,
    DecryptFailed,
    KeygenFailed,
    FormatFailed,
    UnformatFailed,
}

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("crypto core not loaded")]
    CoreNotLoaded,

    #[error("crypto core init failed: {0}")]
    InitFailed(String),

    #[error("algorithm `{0}` is already registered")]
    DuplicateAlgorithm(String),

    #[error("invalid format `{0}`")]
    InvalidFmt(String),

    #[error("invalid input: {0}")]
    InvalidInput(InputFault),

    #[error("invalid output `{0}`")]
    InvalidOutput(PathBuf),

    #[error("invalid algorithm `{0}`")]
    InvalidAlgo(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid padding `{0}`")]
    InvalidPadding(String),

    #[error("invalid iv: {0}")]
    InvalidIv(String),

    #[error("invalid mode `{0}`")]
    InvalidMode(String),

    #[error("{algo} encrypt failed: {source}")]
    Encrypt {
        algo: Algorithm,
        #[source]
        source: EngineError,
    },

    #[error("{algo} decrypt failed: {source}")]
    Decrypt {
        algo: Algorithm,
        #[source]
        source: EngineError,
    },

    #[error("key pair generation failed: {0}")]
    Keygen(#[source] EngineError),

    #[error("format failed: {0}")]
    Format(#[source] FormatError),

    #[error("unformat failed: {0}")]
    Unformat(#[source] FormatError),
}

pub type Result<T> = std::result::Result<T, CryptoError>;

impl CryptoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CryptoError::CoreNotLoaded => ErrorKind::CoreNotLoaded,
            CryptoError::InitFailed(_) => ErrorKind::InitFailed,
            CryptoError::DuplicateAlgorithm(_) => ErrorKind::DuplicateAlgorithm,
            CryptoError::InvalidFmt(_) => ErrorKind::InvalidFmt,
            CryptoError::InvalidInput(_) => ErrorKind::InvalidInput,
            CryptoError::InvalidOutput(_) => ErrorKind::InvalidOutput,
            CryptoError::InvalidAlgo(_) => ErrorKind::InvalidAlgo,
            CryptoError::InvalidKey(_) => ErrorKind::InvalidKey,
            CryptoError::InvalidPadding(_) => ErrorKind::InvalidPadding,
            CryptoError::InvalidIv(_) => ErrorKind::InvalidIv,
            CryptoError::InvalidMode(_) => ErrorKind::InvalidMode,
            CryptoError::Encrypt { .. } => ErrorKind::EncryptFailed,
            CryptoError::Decrypt { .. } => ErrorKind::DecryptFailed,
            CryptoError::Keygen(_) => ErrorKind::KeygenFailed,
            CryptoError::Format(_) => ErrorKind::FormatFailed,
            CryptoError::Unformat(_) => ErrorKind::UnformatFailed,
        }
    }

    /// Numeric code, grouped by range per concern
    pub fn code(&self) -> i32 {
        match self {
            CryptoError::CoreNotLoaded => ERR_CORE_BASE + 2,
            CryptoError::InitFailed(_) => ERR_CORE_BASE + 5,
            CryptoError::DuplicateAlgorithm(_) => ERR_CORE_BASE + 1,
            CryptoError::InvalidFmt(_) => ERR_PARAM_BASE + 1,
            CryptoError::InvalidInput(_) => ERR_PARAM_BASE + 2,
            CryptoError::InvalidOutput(_) => ERR_PARAM_BASE + 3,
            CryptoError::InvalidAlgo(_) => ERR_PARAM_BASE + 4,
            CryptoError::InvalidKey(_) => ERR_PARAM_BASE + 5,
            CryptoError::InvalidPadding(_) => ERR_PARAM_BASE + 6,
            CryptoError::InvalidIv(_) => ERR_PARAM_BASE + 7,
            CryptoError::InvalidMode(_) => ERR_PARAM_BASE + 8,
            CryptoError::Encrypt { algo, .. } => ERR_ENCRYPT_BASE + algo_offset(*algo),
            CryptoError::Decrypt { algo, .. } => ERR_DECRYPT_BASE + algo_offset(*algo),
            CryptoError::Keygen(_) => ERR_KEYGEN_BASE + 1,
            CryptoError::Format(e) => ERR_FORMAT_BASE + format_offset(e),
            CryptoError::Unformat(e) => ERR_UNFORMAT_BASE + format_offset(e),
        }
    }

    /// Whether the error is an "invalid choice" the CLI should list options for
    pub fn is_invalid_choice(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidAlgo
                | ErrorKind::InvalidMode
                | ErrorKind::InvalidPadding
                | ErrorKind::InvalidFmt
        )
    }
}

fn algo_offset(algo: Algorithm) -> i32 {
    match algo {
        Algorithm::Aes => 1,
        Algorithm::Base64 => 2,
        Algorithm::Des => 3,
        Algorithm::Md5 => 4,
        Algorithm::Sha256 => 5,
        Algorithm::Rsa => 6,
    }
}

fn format_offset(err: &FormatError) -> i32 {
    match err {
        FormatError::Io(_) => 1,
        FormatError::StyleNotFound(_) => 2,
        FormatError::InvalidTarget(_) => 3,
        FormatError::Hex(_) => 4,
        FormatError::Base64(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_fall_in_their_ranges() {
        let enc = CryptoError::Encrypt {
            algo: Algorithm::Rsa,
            source: EngineError::TagMismatch,
        };
        assert_eq!(enc.code(), 206);
        assert_eq!(CryptoError::InvalidMode("x".into()).code(), 108);
        assert_eq!(
            CryptoError::Unformat(FormatError::StyleNotFound("x".into())).code(),
            602
        );
        assert_eq!(CryptoError::CoreNotLoaded.kind(), ErrorKind::CoreNotLoaded);
    }
}
