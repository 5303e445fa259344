// src/registry/base64.rs
//! `base64` entry: encrypt encodes, decrypt decodes
//!
//! Output is already text, so the fmt literal is checked but never applied.

use super::paths::{self, Plan};
use super::request::{Output, Request};
use super::{Decryptor, Encryptor};
use crate::config::Config;
use crate::core::format::Base64Transform;
use crate::core::stream::Direction;
use crate::enums::{Algorithm, Style};
use crate::error::Result;

pub struct Base64Codec;

fn plan(req: &Request<'_>, config: &Config, direction: Direction) -> Result<Plan> {
    paths::style(Algorithm::Base64, req.fmt, false)?;
    paths::check_shape(req)?;
    Ok(Plan {
        algo: Algorithm::Base64,
        transform: Box::new(Base64Transform::new(direction)),
        reserve: 0,
        style: Style::None,
        chunk_size: config.stream.chunk_size,
    })
}

impl Encryptor for Base64Codec {
    fn name(&self) -> &str {
        Algorithm::Base64.as_str()
    }

    fn encrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output> {
        paths::encrypt(plan(req, config, Direction::Encrypt)?, req)
    }
}

impl Decryptor for Base64Codec {
    fn name(&self) -> &str {
        Algorithm::Base64.as_str()
    }

    fn decrypt(&self, req: &Request<'_>, config: &Config) -> Result<Output> {
        paths::decrypt(plan(req, config, Direction::Decrypt)?, req)
    }
}
