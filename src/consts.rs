// src/consts.rs
//! Shared constants: block geometry, tag sizes, RSA overheads and error code bases

/// AES block size in bytes
pub const AES_BLOCK_SIZE: usize = 16;

/// DES / 3DES block size in bytes (also the sub-key size)
pub const DES_BLOCK_SIZE: usize = 8;

/// Tag appended by the AEAD modes (gcm, ccm, ocb)
pub const AEAD_TAG_SIZE: usize = 16;

/// HMAC-SHA1 / HMAC-SHA256 trailer sizes for the cbc_hmac modes
pub const HMAC_SHA1_SIZE: usize = 20;
pub const HMAC_SHA256_SIZE: usize = 32;

/// Default read size for stream / file transforms
// must stay a multiple of both block sizes
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Bytes reserved by PKCS#1 v1.5 encryption padding
pub const RSA_PKCS1_OVERHEAD: usize = 11;

/// Bytes reserved by OAEP with SHA-1 (2 * hash_len + 2)
pub const RSA_OAEP_SHA1_OVERHEAD: usize = 2 * 20 + 2;

/// Public exponent used for every generated key pair
pub const RSA_PUBLIC_EXPONENT: u64 = 65537;

/// Legal modulus sizes for key-pair generation
pub const RSA_KEY_BITS: [usize; 5] = [512, 1024, 2048, 3072, 4096];

/// PBKDF2 rounds used when protecting a generated private key
pub const PRIVATE_KEY_KDF_ITERATIONS: u32 = 2048;

/// Minimum passphrase length for DES/AES protected private keys
pub const MIN_BLOCK_CIPHER_PASSPHRASE: usize = 8;

/// Minimum passphrase length for every other protection cipher
pub const MIN_OTHER_PASSPHRASE: usize = 4;

/// Default config file name, overridable with `CRYPTO_CODEC_CONFIG`
pub const DEFAULT_CONFIG_FILE: &str = "crypto-codec.toml";

/// Env var pointing at an alternative config file
pub const CONFIG_ENV: &str = "CRYPTO_CODEC_CONFIG";

/// Numeric error code bases, one range per concern
pub const ERR_CORE_BASE: i32 = 0;
pub const ERR_PARAM_BASE: i32 = 100;
pub const ERR_ENCRYPT_BASE: i32 = 200;
pub const ERR_DECRYPT_BASE: i32 = 300;
pub const ERR_KEYGEN_BASE: i32 = 400;
pub const ERR_FORMAT_BASE: i32 = 500;
pub const ERR_UNFORMAT_BASE: i32 = 600;
