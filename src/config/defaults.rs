// src/config/defaults.rs
use crate::config::app::{Defaults, Stream};
use crate::consts::DEFAULT_CHUNK_SIZE;
use crate::enums::{AesMode, DesMode, KeyFormat, KeygenMode, Padding, RsaPadding};

pub const DEFAULT_KEY_BITS: usize = 2048;

pub fn default_stream() -> Stream {
    Stream {
        chunk_size: DEFAULT_CHUNK_SIZE,
    }
}

pub fn default_defaults() -> Defaults {
    Defaults {
        aes_mode: AesMode::Ecb,
        des_mode: DesMode::Ecb,
        padding: Padding::Pkcs7,
        rsa_padding: RsaPadding::Pkcs1,
        key_format: KeyFormat::X509,
        keygen_mode: KeygenMode::None,
        key_bits: DEFAULT_KEY_BITS,
    }
}

pub fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

pub fn default_key_bits() -> usize {
    DEFAULT_KEY_BITS
}
