// src/core/format.rs
//! At-rest text encoding of ciphertext: hex, base64 or none
//!
//! Hex is written upper-case and read in either case. Base64 is the
//! standard alphabet with padding. ASCII whitespace is ignored when
//! decoding, so hand-edited or line-wrapped files still unformat.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::read::DecoderReader;
use base64::write::EncoderWriter;
use base64::Engine;
use tracing::debug;

use crate::consts::DEFAULT_CHUNK_SIZE;
use crate::core::stream::{self, Direction, Transform};
use crate::enums::Style;
use crate::error::{EngineError, FormatError};

pub type Result<T> = std::result::Result<T, FormatError>;

/// Parse a style literal; `""` and `none` mean identity
pub fn parse_style(fmt: &str) -> Result<Style> {
    fmt.parse()
        .map_err(|_| FormatError::StyleNotFound(fmt.to_string()))
}

pub fn encode(src: &[u8], style: Style) -> Vec<u8> {
    match style {
        Style::Hex => hex::encode_upper(src).into_bytes(),
        Style::Base64 => STANDARD.encode(src).into_bytes(),
        Style::None => src.to_vec(),
    }
}

pub fn decode(src: &[u8], style: Style) -> Result<Vec<u8>> {
    if style == Style::None {
        return Ok(src.to_vec());
    }
    let text: Vec<u8> = src
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    match style {
        Style::Hex => Ok(hex::decode(text)?),
        Style::Base64 => Ok(STANDARD.decode(text)?),
        Style::None => Ok(text),
    }
}

/// Memory form of `format`
pub fn format(src: &[u8], fmt: &str) -> Result<Vec<u8>> {
    Ok(encode(src, parse_style(fmt)?))
}

/// Memory form of `unformat`
pub fn unformat(src: &[u8], fmt: &str) -> Result<Vec<u8>> {
    decode(src, parse_style(fmt)?)
}

/// Encode the file at `src` into `dst`; `src == dst` rewrites in place
pub fn format_file(src: &Path, dst: &Path, fmt: &str) -> Result<()> {
    let style = parse_style(fmt)?;
    debug!(src = %src.display(), dst = %dst.display(), style = style.as_str(), "format file");
    through_files(src, dst, style, |reader, writer| match style {
        Style::Hex => encode_hex_stream(reader, writer),
        Style::Base64 => encode_base64_stream(reader, writer),
        Style::None => copy_stream(reader, writer),
    })
}

/// Decode the file at `src` into `dst`; `src == dst` rewrites in place
pub fn unformat_file(src: &Path, dst: &Path, fmt: &str) -> Result<()> {
    let style = parse_style(fmt)?;
    debug!(src = %src.display(), dst = %dst.display(), style = style.as_str(), "unformat file");
    through_files(src, dst, style, |reader, writer| match style {
        Style::Hex => decode_hex_stream(SkipWhitespace(reader), writer),
        Style::Base64 => decode_base64_stream(SkipWhitespace(reader), writer),
        Style::None => copy_stream(reader, writer),
    })
}

type FileReader = BufReader<File>;
type FileWriter = BufWriter<File>;

fn through_files<F>(src: &Path, dst: &Path, style: Style, op: F) -> Result<()>
where
    F: FnOnce(FileReader, FileWriter) -> Result<()>,
{
    if !src.is_file() {
        return Err(FormatError::InvalidTarget(src.display().to_string()));
    }
    let in_place = same_file(src, dst);

    if style == Style::None {
        if !in_place {
            fs::copy(src, dst)?;
        }
        return Ok(());
    }

    if !in_place {
        let reader = BufReader::new(File::open(src)?);
        let writer = BufWriter::new(File::create(dst)?);
        return op(reader, writer);
    }

    // reading and writing the same path: work from a sibling copy
    let dir = match src.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let staged = tempfile::Builder::new()
        .prefix(".crypto-codec-fmt-")
        .tempfile_in(dir)?;
    fs::copy(src, staged.path())?;

    let reader = BufReader::new(staged.reopen()?);
    let writer = BufWriter::new(File::create(dst)?);
    op(reader, writer)?;
    staged.close()?;
    Ok(())
}

pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn copy_stream<R: Read, W: Write>(mut reader: R, mut writer: W) -> Result<()> {
    io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn encode_hex_stream<R: Read, W: Write>(mut reader: R, mut writer: W) -> Result<()> {
    let mut buf = vec![0u8; DEFAULT_CHUNK_SIZE];
    loop {
        let n = read_some(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(hex::encode_upper(&buf[..n]).as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn decode_hex_stream<R: Read, W: Write>(mut reader: R, mut writer: W) -> Result<()> {
    let mut buf = vec![0u8; DEFAULT_CHUNK_SIZE];
    let mut carry: Vec<u8> = Vec::with_capacity(DEFAULT_CHUNK_SIZE + 1);
    loop {
        let n = read_some(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        carry.extend_from_slice(&buf[..n]);
        let even = carry.len() & !1;
        writer.write_all(&hex::decode(&carry[..even])?)?;
        carry.drain(..even);
    }
    if !carry.is_empty() {
        return Err(hex::FromHexError::OddLength.into());
    }
    writer.flush()?;
    Ok(())
}

fn encode_base64_stream<R: Read, W: Write>(mut reader: R, writer: W) -> Result<()> {
    let mut encoder = EncoderWriter::new(writer, &STANDARD);
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?.flush()?;
    Ok(())
}

fn decode_base64_stream<R: Read, W: Write>(reader: R, mut writer: W) -> Result<()> {
    let mut decoder = DecoderReader::new(reader, &STANDARD);
    io::copy(&mut decoder, &mut writer).map_err(base64_io_error)?;
    writer.flush()?;
    Ok(())
}

/// Surface the decoder's own error instead of a wrapped IO error
fn base64_io_error(err: io::Error) -> FormatError {
    let decode = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<base64::DecodeError>())
        .cloned();
    match decode {
        Some(e) => FormatError::Base64(e),
        None => FormatError::Io(err),
    }
}

fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

/// Reader adapter dropping ASCII whitespace
struct SkipWhitespace<R>(R);

impl<R: Read> Read for SkipWhitespace<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.0.read(buf)?;
            if n == 0 {
                return Ok(0);
            }
            let mut kept = 0;
            for i in 0..n {
                if !buf[i].is_ascii_whitespace() {
                    buf[kept] = buf[i];
                    kept += 1;
                }
            }
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}

/// base64 as a streaming [`Transform`], for the `base64` algorithm
///
/// Encoding works in 3-byte groups and decoding in 4-character groups;
/// whatever does not fill a group waits in `carry` for the next chunk.
pub struct Base64Transform {
    direction: Direction,
    carry: Vec<u8>,
}

impl Base64Transform {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            carry: Vec::new(),
        }
    }

    fn group(&self) -> usize {
        match self.direction {
            Direction::Encrypt => 3,
            Direction::Decrypt => 4,
        }
    }

    fn emit(&self, data: &[u8], out: &mut Vec<u8>) -> stream::Result<()> {
        match self.direction {
            Direction::Encrypt => out.extend_from_slice(STANDARD.encode(data).as_bytes()),
            Direction::Decrypt => {
                let plain = STANDARD
                    .decode(data)
                    .map_err(|_| EngineError::Primitive("invalid base64 input"))?;
                out.extend_from_slice(&plain);
            }
        }
        Ok(())
    }
}

impl Transform for Base64Transform {
    fn update(&mut self, data: &[u8], out: &mut Vec<u8>) -> stream::Result<()> {
        match self.direction {
            Direction::Encrypt => self.carry.extend_from_slice(data),
            Direction::Decrypt => self
                .carry
                .extend(data.iter().copied().filter(|b| !b.is_ascii_whitespace())),
        }
        let whole = self.carry.len() / self.group() * self.group();
        let ready: Vec<u8> = self.carry.drain(..whole).collect();
        self.emit(&ready, out)
    }

    fn finish(mut self: Box<Self>, data: &[u8], _trailer: &[u8], out: &mut Vec<u8>) -> stream::Result<()> {
        self.update(data, out)?;
        let rest = std::mem::take(&mut self.carry);
        self.emit(&rest, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_upper_on_write_and_case_blind_on_read() {
        assert_eq!(format(&[0xab, 0x01], "hex").unwrap(), b"AB01");
        assert_eq!(unformat(b"ab01", "hex").unwrap(), vec![0xab, 0x01]);
    }

    #[test]
    fn whitespace_is_ignored_on_read() {
        let mut out = Vec::new();
        decode_base64_stream(SkipWhitespace(&b"aGVs\nbG8=\n"[..]), &mut out).unwrap();
        assert_eq!(out, b"hello");
    }

    #[test]
    fn odd_hex_stream_is_rejected() {
        let mut out = Vec::new();
        let err = decode_hex_stream(&b"ABC"[..], &mut out).unwrap_err();
        assert!(matches!(err, FormatError::Hex(_)));
    }

    #[test]
    fn base64_transform_matches_one_shot_across_chunks() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let encoded = stream::drive_vec(
            Box::new(Base64Transform::new(Direction::Encrypt)),
            &data,
            64,
            0,
            0,
        )
        .unwrap();
        assert_eq!(encoded, STANDARD.encode(&data).into_bytes());
        let decoded = stream::drive_vec(
            Box::new(Base64Transform::new(Direction::Decrypt)),
            &encoded,
            64,
            0,
            0,
        )
        .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn unknown_style_is_not_found() {
        assert!(matches!(
            format(b"x", "rot13"),
            Err(FormatError::StyleNotFound(s)) if s == "rot13"
        ));
    }
}
