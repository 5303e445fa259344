// src/registry/paths.rs
//! Shared validation helpers and the four transform paths
//!
//! memory→memory, memory→file, file→memory and file→file all run the same
//! [`Transform`] through the stream driver; only the reader and writer
//! differ. Encrypt applies the at-rest format after the transform, decrypt
//! removes it before.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Cursor, Read};
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

use super::request::{Output, Request, Sink, Source};
use crate::core::format::{self, same_file};
use crate::core::stream::{self, Transform};
use crate::enums::{Algorithm, Style, AUTO};
use crate::error::{CryptoError, EngineError, FormatError, InputFault, Result};

/// Default at-rest format for a call
///
/// base64 and md5 already produce text, so they never get wrapped. Every
/// other algorithm writes raw bytes to files and base64 to memory unless
/// the caller asked for something explicit.
pub fn select_output_fmt<'a>(algo: Algorithm, requested: &'a str, to_file: bool) -> &'a str {
    match algo {
        Algorithm::Base64 | Algorithm::Md5 => "none",
        _ if to_file => "none",
        _ if requested == AUTO || requested.is_empty() => "base64",
        _ => requested,
    }
}

/// Parse a literal, mapping `auto` (or empty) to the configured default
pub(crate) fn choice<T: FromStr>(
    value: &str,
    default: T,
    invalid: fn(String) -> CryptoError,
) -> Result<T> {
    if value == AUTO || value.is_empty() {
        return Ok(default);
    }
    value.parse().map_err(|_| invalid(value.to_string()))
}

/// At-rest style for a call; `auto` follows [`select_output_fmt`]
///
/// `file_side` is whether the formatted side of the call (output on
/// encrypt, input on decrypt) is a file.
pub(crate) fn style(algo: Algorithm, fmt: &str, file_side: bool) -> Result<Style> {
    let literal = if fmt == AUTO {
        select_output_fmt(algo, fmt, file_side)
    } else {
        fmt
    };
    literal
        .parse()
        .map_err(|_| CryptoError::InvalidFmt(fmt.to_string()))
}

/// Check input then output shape; returns the input length
pub(crate) fn check_shape(req: &Request<'_>) -> Result<u64> {
    let len = match req.input {
        Source::Memory(data) => data.len() as u64,
        Source::File(src) => {
            if !src.exists() {
                return Err(CryptoError::InvalidInput(InputFault::NotFound(src.into())));
            }
            if !src.is_file() {
                return Err(CryptoError::InvalidInput(InputFault::NotAFile(src.into())));
            }
            fs::metadata(src)
                .map_err(|_| CryptoError::InvalidInput(InputFault::NotFound(src.into())))?
                .len()
        }
    };

    if let Sink::File(dst) = req.output {
        if dst.is_dir() || dst.is_symlink() {
            return Err(CryptoError::InvalidOutput(dst.into()));
        }
        // the destination is truncated before the source is read
        if let Source::File(src) = req.input {
            if same_file(src, dst) {
                return Err(CryptoError::InvalidOutput(dst.into()));
            }
        }
    }
    Ok(len)
}

/// Alignment fault for a plaintext the `none` padding cannot take
pub(crate) fn unaligned(len: u64, block: usize) -> CryptoError {
    CryptoError::InvalidInput(InputFault::Unaligned {
        len: len as usize,
        block,
    })
}

pub(crate) fn encrypt_err(algo: Algorithm) -> impl Fn(EngineError) -> CryptoError + Copy {
    move |source| CryptoError::Encrypt { algo, source }
}

pub(crate) fn decrypt_err(algo: Algorithm) -> impl Fn(EngineError) -> CryptoError + Copy {
    move |source| CryptoError::Decrypt { algo, source }
}

/// A validated transform, ready to run
pub(crate) struct Plan {
    pub algo: Algorithm,
    pub transform: Box<dyn Transform>,
    /// Trailing bytes handed to `finish` separately (tag / MAC)
    pub reserve: usize,
    pub style: Style,
    pub chunk_size: usize,
}

fn path_name(req: &Request<'_>) -> &'static str {
    match (req.input.is_file(), req.output.is_file()) {
        (false, false) => "memory->memory",
        (false, true) => "memory->file",
        (true, false) => "file->memory",
        (true, true) => "file->file",
    }
}

fn pump<R: Read>(
    plan_transform: Box<dyn Transform>,
    reader: R,
    sink: Sink<'_>,
    chunk_size: usize,
    reserve: usize,
    fail: impl Fn(EngineError) -> CryptoError,
) -> Result<Output> {
    match sink {
        Sink::Memory => {
            let mut out = Vec::new();
            stream::drive(plan_transform, reader, &mut out, chunk_size, reserve).map_err(&fail)?;
            Ok(Output::Memory(out))
        }
        Sink::File(dst) => {
            let writer = BufWriter::new(File::create(dst).map_err(|e| fail(e.into()))?);
            if let Err(e) = stream::drive(plan_transform, reader, writer, chunk_size, reserve) {
                warn!(dst = %dst.display(), error = %e, "transform failed, destination left partially written");
                return Err(fail(e));
            }
            Ok(Output::File(dst.to_path_buf()))
        }
    }
}

fn open(src: &Path, fail: impl Fn(EngineError) -> CryptoError) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(src).map_err(|e| fail(e.into()))?))
}

/// Run an encrypt plan, then wrap the result in its at-rest style
pub(crate) fn encrypt(plan: Plan, req: &Request<'_>) -> Result<Output> {
    let Plan {
        algo,
        transform,
        reserve,
        style,
        chunk_size,
    } = plan;
    let fail = encrypt_err(algo);
    debug!(algo = %algo, path = path_name(req), style = style.as_str(), "encrypt");

    let raw = match req.input {
        Source::Memory(data) => pump(transform, Cursor::new(data), req.output, chunk_size, reserve, fail)?,
        Source::File(src) => pump(transform, open(src, fail)?, req.output, chunk_size, reserve, fail)?,
    };

    match raw {
        Output::Memory(bytes) => Ok(Output::Memory(format::encode(&bytes, style))),
        Output::File(dst) => {
            format::format_file(&dst, &dst, style.as_str()).map_err(CryptoError::Format)?;
            Ok(Output::File(dst))
        }
    }
}

/// Strip the at-rest style from the input, then run a decrypt plan
pub(crate) fn decrypt(plan: Plan, req: &Request<'_>) -> Result<Output> {
    let Plan {
        algo,
        transform,
        reserve,
        style,
        chunk_size,
    } = plan;
    let fail = decrypt_err(algo);
    debug!(algo = %algo, path = path_name(req), style = style.as_str(), "decrypt");

    match req.input {
        Source::Memory(data) => {
            let raw = format::decode(data, style).map_err(CryptoError::Unformat)?;
            pump(transform, Cursor::new(raw), req.output, chunk_size, reserve, fail)
        }
        Source::File(src) if style == Style::None => {
            pump(transform, open(src, fail)?, req.output, chunk_size, reserve, fail)
        }
        Source::File(src) => {
            let staged = tempfile::Builder::new()
                .prefix("crypto-codec-unformat-")
                .tempfile()
                .map_err(|e| CryptoError::Unformat(FormatError::Io(e)))?;
            format::unformat_file(src, staged.path(), style.as_str())
                .map_err(CryptoError::Unformat)?;
            let reader = BufReader::new(
                staged
                    .reopen()
                    .map_err(|e| CryptoError::Unformat(FormatError::Io(e)))?,
            );
            pump(transform, reader, req.output, chunk_size, reserve, fail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_fmt_defaults() {
        assert_eq!(select_output_fmt(Algorithm::Aes, "auto", false), "base64");
        assert_eq!(select_output_fmt(Algorithm::Aes, "hex", false), "hex");
        assert_eq!(select_output_fmt(Algorithm::Rsa, "hex", true), "none");
        assert_eq!(select_output_fmt(Algorithm::Md5, "hex", false), "none");
        assert_eq!(select_output_fmt(Algorithm::Base64, "auto", false), "none");
    }

    #[test]
    fn auto_choice_takes_default() {
        let got: Style = choice("auto", Style::Hex, CryptoError::InvalidFmt).unwrap();
        assert_eq!(got, Style::Hex);
        assert!(choice::<Style>("rot13", Style::Hex, CryptoError::InvalidFmt).is_err());
    }
}
