// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the user-visible choices: algorithm, cipher mode,
//! padding scheme, at-rest style and key-pair options. Every enum parses
//! from the exact literal the call contract uses and can list its valid
//! spellings for "invalid choice" messages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{AEAD_TAG_SIZE, AES_BLOCK_SIZE, HMAC_SHA1_SIZE, HMAC_SHA256_SIZE};
use crate::consts::{MIN_BLOCK_CIPHER_PASSPHRASE, MIN_OTHER_PASSPHRASE, RSA_OAEP_SHA1_OVERHEAD};
use crate::consts::RSA_PKCS1_OVERHEAD;

/// Error returned when a literal is not one of an enum's spellings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChoice(pub String);

impl fmt::Display for UnknownChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown choice `{}`", self.0)
    }
}

impl std::error::Error for UnknownChoice {}

macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $lit:literal $(| $alias:literal)*),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $lit $(, alias = $alias)*)]
                $variant,
            )+
        }

        impl $name {
            /// Every canonical spelling, in declaration order
            pub const NAMES: &'static [&'static str] = &[$($lit),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $lit,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($lit $(| $alias)* => Ok($name::$variant),)+
                    other => Err(UnknownChoice(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

literal_enum! {
    /// Registered algorithm names
    Algorithm {
        Aes => "aes",
        Base64 => "base64",
        Des => "des",
        Md5 => "md5",
        Rsa => "rsa",
        Sha256 => "sha256",
    }
}

literal_enum! {
    /// AES modes of operation
    AesMode {
        Ecb => "ecb",
        Cbc => "cbc",
        Cfb1 => "cfb1",
        Cfb8 => "cfb8",
        Cfb128 => "cfb128" | "cfb",
        Ofb => "ofb",
        Ctr => "ctr",
        Gcm => "gcm",
        Ccm => "ccm",
        Xts => "xts",
        Wrap => "wrap",
        WrapPad => "wrap_pad",
        CbcHmacSha1 => "cbc_hmac_sha1",
        CbcHmacSha256 => "cbc_hmac_sha256",
        Ocb => "ocb",
    }
}

impl AesMode {
    /// Literal spellings accepted for the mode argument, aliases included
    pub const ACCEPTED: &'static [&'static str] = &[
        "ecb",
        "cbc",
        "cfb1",
        "cfb8",
        "cfb128",
        "cfb",
        "ofb",
        "ctr",
        "gcm",
        "ccm",
        "xts",
        "wrap",
        "wrap_pad",
        "cbc_hmac_sha1",
        "cbc_hmac_sha256",
        "ocb",
    ];

    /// Unit the padding engine aligns plaintext to
    pub fn block_size(&self) -> usize {
        match self {
            AesMode::Cfb1 | AesMode::Cfb8 => 1,
            _ => AES_BLOCK_SIZE,
        }
    }

    /// Whether the mode processes single bytes (reserve = len + 16)
    pub fn is_stream_like(&self) -> bool {
        self.block_size() == 1
    }

    pub fn is_aead(&self) -> bool {
        matches!(self, AesMode::Gcm | AesMode::Ccm | AesMode::Ocb)
    }

    /// Bytes appended after the raw ciphertext
    pub fn trailer_len(&self) -> usize {
        match self {
            AesMode::Gcm | AesMode::Ccm | AesMode::Ocb => AEAD_TAG_SIZE,
            AesMode::CbcHmacSha1 => HMAC_SHA1_SIZE,
            AesMode::CbcHmacSha256 => HMAC_SHA256_SIZE,
            _ => 0,
        }
    }

    /// Legal key lengths in bytes
    pub fn key_lengths(&self) -> &'static [usize] {
        match self {
            AesMode::Xts => &[32, 64],
            AesMode::CbcHmacSha1 | AesMode::CbcHmacSha256 => &[16, 32],
            _ => &[16, 24, 32],
        }
    }

    /// Whether a given IV length is legal for this mode
    pub fn accepts_iv_len(&self, len: usize) -> bool {
        match self {
            AesMode::Ecb => len == 0,
            AesMode::Gcm => len >= 1,
            AesMode::Ccm => (7..=13).contains(&len),
            AesMode::Ocb => len == 12,
            AesMode::Wrap => len == 0 || len == 8,
            AesMode::WrapPad => len == 0 || len == 4,
            _ => len == AES_BLOCK_SIZE,
        }
    }
}

literal_enum! {
    /// DES / 3DES modes of operation
    DesMode {
        Ecb => "ecb",
        Cbc => "cbc",
        Cfb => "cfb",
        Ofb => "ofb",
        Ctr => "ctr",
    }
}

literal_enum! {
    /// Block-cipher padding schemes
    Padding {
        Pkcs5 => "pkcs5",
        Pkcs7 => "pkcs7",
        Zero => "zero",
        Iso10126 => "iso10126",
        AnsiX923 => "ansix923",
        IsoIec7816_4 => "iso_iec_7816_4",
        None => "none" | "no_padding",
    }
}

impl Padding {
    pub const ACCEPTED: &'static [&'static str] = &[
        "pkcs5",
        "pkcs7",
        "zero",
        "iso10126",
        "ansix923",
        "iso_iec_7816_4",
        "none",
        "no_padding",
    ];

    pub fn is_none(&self) -> bool {
        matches!(self, Padding::None)
    }
}

literal_enum! {
    /// RSA padding schemes
    RsaPadding {
        Pkcs1 => "pkcs1",
        NoPadding => "no_padding",
        Pkcs1Oaep => "pkcs1_oaep",
        X931 => "x931",
        Pkcs1Pss => "pkcs1_pss",
    }
}

impl RsaPadding {
    /// Bytes of each modulus-sized block the padding consumes
    pub fn overhead(&self) -> usize {
        match self {
            RsaPadding::Pkcs1 => RSA_PKCS1_OVERHEAD,
            RsaPadding::Pkcs1Oaep => RSA_OAEP_SHA1_OVERHEAD,
            RsaPadding::NoPadding => 0,
            // signature-only schemes; mirrors the OpenSSL reservations
            RsaPadding::X931 => 2,
            RsaPadding::Pkcs1Pss => RSA_PKCS1_OVERHEAD,
        }
    }
}

literal_enum! {
    /// At-rest text encodings
    Style {
        Hex => "hex",
        Base64 => "base64",
        None => "none" | "",
    }
}

literal_enum! {
    /// Encoding of generated key pairs
    KeyFormat {
        X509 => "x509",
        Pkcs1 => "pkcs1",
    }
}

literal_enum! {
    /// Cipher protecting a generated private key
    KeygenMode {
        None => "none",
        Aes128Ecb => "aes_128_ecb",
        Aes192Ecb => "aes_192_ecb",
        Aes256Ecb => "aes_256_ecb",
        Aes128Cbc => "aes_128_cbc",
        Aes192Cbc => "aes_192_cbc",
        Aes256Cbc => "aes_256_cbc",
        Aes128Cfb => "aes_128_cfb",
        Aes192Cfb => "aes_192_cfb",
        Aes256Cfb => "aes_256_cfb",
        Aes128Ofb => "aes_128_ofb",
        Aes192Ofb => "aes_192_ofb",
        Aes256Ofb => "aes_256_ofb",
    }
}

impl KeygenMode {
    /// AES key size (bits) of the protection cipher, `None` when unprotected
    pub fn aes_bits(&self) -> Option<usize> {
        let name = self.as_str();
        if name.starts_with("aes_128") {
            Some(128)
        } else if name.starts_with("aes_192") {
            Some(192)
        } else if name.starts_with("aes_256") {
            Some(256)
        } else {
            None
        }
    }

    /// AES chaining mode of the protection cipher
    pub fn chaining(&self) -> Option<AesMode> {
        let name = self.as_str();
        if name.ends_with("_ecb") {
            Some(AesMode::Ecb)
        } else if name.ends_with("_cbc") {
            Some(AesMode::Cbc)
        } else if name.ends_with("_cfb") {
            Some(AesMode::Cfb128)
        } else if name.ends_with("_ofb") {
            Some(AesMode::Ofb)
        } else {
            None
        }
    }

    /// Shortest passphrase the protection cipher accepts
    pub fn min_passphrase_len(&self) -> usize {
        let name = self.as_str();
        if name.starts_with("aes_") || name.starts_with("des") {
            MIN_BLOCK_CIPHER_PASSPHRASE
        } else {
            MIN_OTHER_PASSPHRASE
        }
    }
}

/// Literal that asks for the configured default
pub const AUTO: &str = "auto";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_parse_to_canonical_variant() {
        assert_eq!("cfb".parse::<AesMode>().unwrap(), AesMode::Cfb128);
        assert_eq!("no_padding".parse::<Padding>().unwrap(), Padding::None);
        assert_eq!("".parse::<Style>().unwrap(), Style::None);
        assert!("auto".parse::<AesMode>().is_err());
    }

    #[test]
    fn keygen_mode_passphrase_floor() {
        assert_eq!(KeygenMode::Aes192Cfb.min_passphrase_len(), 8);
        assert_eq!(KeygenMode::None.min_passphrase_len(), 4);
        assert_eq!(KeygenMode::Aes128Ofb.aes_bits(), Some(128));
        assert_eq!(KeygenMode::None.aes_bits(), None);
    }

    #[test]
    fn keygen_mode_names_its_cipher() {
        assert_eq!(KeygenMode::Aes192Ecb.chaining(), Some(AesMode::Ecb));
        assert_eq!(KeygenMode::Aes256Cbc.chaining(), Some(AesMode::Cbc));
        assert_eq!(KeygenMode::Aes128Cfb.chaining(), Some(AesMode::Cfb128));
        assert_eq!(KeygenMode::Aes192Ofb.chaining(), Some(AesMode::Ofb));
        assert_eq!(KeygenMode::Aes192Ofb.aes_bits(), Some(192));
        assert_eq!(KeygenMode::None.chaining(), None);
    }
}
