// src/registry/digest.rs
//! One-way `md5` and `sha256` entries (encrypt only)

use super::paths::{self, Plan};
use super::request::{Output, Request};
use super::Encryptor;
use crate::config::Config;
use crate::core::digest;
use crate::enums::{Algorithm, Style};
use crate::error::Result;

/// Lowercase hex text; fmt is checked but never applied
pub struct Md5Digest;

/// Raw 32-byte digest, wrapped by the at-rest format
pub struct Sha256Digest;

impl Encryptor for Md5Digest {
    fn name(&self) -> &str {
        Algorithm::Md5.as_str()
    }

    fn encrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output> {
        paths::style(Algorithm::Md5, req.fmt, req.output.is_file())?;
        paths::check_shape(req)?;
        paths::encrypt(
            Plan {
                algo: Algorithm::Md5,
                transform: digest::md5(),
                reserve: 0,
                style: Style::None,
                chunk_size: config.stream.chunk_size,
            },
            req,
        )
    }
}

impl Encryptor for Sha256Digest {
    fn name(&self) -> &str {
        Algorithm::Sha256.as_str()
    }

    fn encrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output> {
        let style = paths::style(Algorithm::Sha256, req.fmt, req.output.is_file())?;
        paths::check_shape(req)?;
        paths::encrypt(
            Plan {
                algo: Algorithm::Sha256,
                transform: digest::sha256(),
                reserve: 0,
                style,
                chunk_size: config.stream.chunk_size,
            },
            req,
        )
    }
}
