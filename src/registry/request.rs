// src/registry/request.rs
//! Call payloads for the registry: where bytes come from, where they go

use std::path::{Path, PathBuf};

use crate::aliases::Passphrase;
use crate::enums::AUTO;

/// Input of one call
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Memory(&'a [u8]),
    File(&'a Path),
}

/// Destination of one call
#[derive(Debug, Clone, Copy)]
pub enum Sink<'a> {
    Memory,
    File(&'a Path),
}

impl Sink<'_> {
    pub fn is_file(&self) -> bool {
        matches!(self, Sink::File(_))
    }
}

impl Source<'_> {
    pub fn is_file(&self) -> bool {
        matches!(self, Source::File(_))
    }
}

/// Result of a successful call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Memory(Vec<u8>),
    File(PathBuf),
}

impl Output {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Output::Memory(b) => Some(b),
            Output::File(_) => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Output::Memory(b) => Some(b),
            Output::File(_) => None,
        }
    }
}

/// One encrypt / decrypt call, built from the caller's literals
///
/// Every choice starts out as `auto` (resolved through the config defaults);
/// key and IV start empty and the output goes to memory.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub algo: &'a str,
    pub mode: &'a str,
    pub key: &'a [u8],
    pub padding: &'a str,
    pub iv: &'a [u8],
    pub fmt: &'a str,
    /// Unlocks an encrypted private key (RSA decrypt only)
    pub passphrase: Option<&'a str>,
    pub input: Source<'a>,
    pub output: Sink<'a>,
}

impl<'a> Request<'a> {
    pub fn new(algo: &'a str, input: Source<'a>) -> Self {
        Self {
            algo,
            mode: AUTO,
            key: &[],
            padding: AUTO,
            iv: &[],
            fmt: AUTO,
            passphrase: None,
            input,
            output: Sink::Memory,
        }
    }

    pub fn memory(algo: &'a str, data: &'a [u8]) -> Self {
        Self::new(algo, Source::Memory(data))
    }

    pub fn file(algo: &'a str, path: &'a Path) -> Self {
        Self::new(algo, Source::File(path))
    }

    pub fn mode(mut self, mode: &'a str) -> Self {
        self.mode = mode;
        self
    }

    pub fn key(mut self, key: &'a [u8]) -> Self {
        self.key = key;
        self
    }

    pub fn padding(mut self, padding: &'a str) -> Self {
        self.padding = padding;
        self
    }

    pub fn iv(mut self, iv: &'a [u8]) -> Self {
        self.iv = iv;
        self
    }

    pub fn fmt(mut self, fmt: &'a str) -> Self {
        self.fmt = fmt;
        self
    }

    pub fn passphrase(mut self, passphrase: &'a str) -> Self {
        self.passphrase = Some(passphrase);
        self
    }

    pub fn to_file(mut self, path: &'a Path) -> Self {
        self.output = Sink::File(path);
        self
    }
}

/// One key-pair generation call
#[derive(Clone, Copy)]
pub struct KeygenRequest<'a> {
    pub algo: &'a str,
    /// Modulus size; 0 means the configured default
    pub bits: usize,
    pub format: &'a str,
    pub mode: &'a str,
    pub passphrase: Option<&'a Passphrase>,
}

impl<'a> KeygenRequest<'a> {
    pub fn new(algo: &'a str) -> Self {
        Self {
            algo,
            bits: 0,
            format: AUTO,
            mode: AUTO,
            passphrase: None,
        }
    }

    pub fn bits(mut self, bits: usize) -> Self {
        self.bits = bits;
        self
    }

    pub fn format(mut self, format: &'a str) -> Self {
        self.format = format;
        self
    }

    pub fn mode(mut self, mode: &'a str) -> Self {
        self.mode = mode;
        self
    }

    pub fn passphrase(mut self, passphrase: &'a Passphrase) -> Self {
        self.passphrase = Some(passphrase);
        self
    }
}
