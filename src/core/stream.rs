// src/core/stream.rs
//! Chunked stream driver with one-chunk lookahead
//!
//! Every engine is expressed as a [`Transform`]: non-final chunks go through
//! `update`, the final chunk (and any trailing tag captured by the reader)
//! through `finish`. The reader decides which chunk is final by holding back
//! `chunk_size + reserve + 1` bytes, so no engine ever has to peek and rewind.
//!
//! Output of each chunk is written as soon as it is produced. A failure in a
//! later chunk therefore leaves earlier output in the destination.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use tracing::warn;

use crate::core::padding::{check_aligned, pad, unpad};
use crate::enums::Padding;
use crate::error::EngineError;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// One slice of the input, flagged when it is the final one
#[derive(Debug, Default)]
pub struct Chunk {
    pub data: Vec<u8>,
    pub last: bool,
    /// The reserved tail of the stream, only set on the final chunk
    pub trailer: Vec<u8>,
}

/// Reader that always knows whether the chunk it hands out is the last
pub struct LookaheadReader<R> {
    inner: R,
    chunk_size: usize,
    reserve: usize,
    buf: Vec<u8>,
    eof: bool,
}

impl<R: Read> LookaheadReader<R> {
    /// A zero `chunk_size` would never make progress and is rejected
    pub fn new(inner: R, chunk_size: usize, reserve: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(EngineError::ZeroChunk);
        }
        Ok(Self {
            inner,
            chunk_size,
            reserve,
            buf: Vec::with_capacity(chunk_size + reserve + 1),
            eof: false,
        })
    }

    pub fn next_chunk(&mut self) -> io::Result<Chunk> {
        let want = self.chunk_size + self.reserve + 1;
        while !self.eof && self.buf.len() < want {
            let start = self.buf.len();
            self.buf.resize(want, 0);
            match self.inner.read(&mut self.buf[start..]) {
                Ok(0) => {
                    self.buf.truncate(start);
                    self.eof = true;
                }
                Ok(n) => self.buf.truncate(start + n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => self.buf.truncate(start),
                Err(e) => {
                    self.buf.truncate(start);
                    return Err(e);
                }
            }
        }

        if self.buf.len() >= want {
            let data = self.buf.drain(..self.chunk_size).collect();
            return Ok(Chunk {
                data,
                last: false,
                trailer: Vec::new(),
            });
        }

        let mut data = std::mem::take(&mut self.buf);
        let split = data.len().saturating_sub(self.reserve);
        let trailer = data.split_off(split);
        Ok(Chunk {
            data,
            last: true,
            trailer,
        })
    }
}

/// A streaming encrypt / decrypt / encode step
pub trait Transform {
    /// Consume a non-final chunk, appending whatever output is ready
    fn update(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<()>;

    /// Consume the final chunk and the reserved trailer, flushing everything
    fn finish(self: Box<Self>, data: &[u8], trailer: &[u8], out: &mut Vec<u8>) -> Result<()>;
}

/// Pump `reader` through `transform` into `writer`
///
/// `reserve` is the number of trailing bytes handed to `finish` separately
/// (the AEAD tag on decrypt). Returns the number of bytes written.
pub fn drive<R: Read, W: Write>(
    mut transform: Box<dyn Transform>,
    reader: R,
    mut writer: W,
    chunk_size: usize,
    reserve: usize,
) -> Result<u64> {
    let mut chunks = LookaheadReader::new(reader, chunk_size, reserve)?;
    let mut out = Vec::with_capacity(chunk_size + 64);
    let mut written = 0u64;

    loop {
        let chunk = chunks.next_chunk()?;
        out.clear();

        if !chunk.last {
            transform.update(&chunk.data, &mut out)?;
            writer.write_all(&out)?;
            written += out.len() as u64;
            continue;
        }

        transform.finish(&chunk.data, &chunk.trailer, &mut out)?;
        writer.write_all(&out)?;
        writer.flush()?;
        written += out.len() as u64;
        return Ok(written);
    }
}

/// Memory-to-memory convenience over [`drive`]
pub fn drive_vec(
    transform: Box<dyn Transform>,
    input: &[u8],
    chunk_size: usize,
    reserve: usize,
    capacity: usize,
) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(capacity);
    drive(transform, Cursor::new(input), &mut out, chunk_size, reserve)?;
    Ok(out)
}

/// File-to-file convenience over [`drive`]
///
/// The destination is created (or truncated) before the first chunk is
/// read and is not removed if the transform fails part way.
pub fn drive_file(
    transform: Box<dyn Transform>,
    src: &Path,
    dst: &Path,
    chunk_size: usize,
    reserve: usize,
) -> Result<u64> {
    let input = BufReader::new(File::open(src)?);
    let output = BufWriter::new(File::create(dst)?);
    drive(transform, input, output, chunk_size, reserve)
}

/// Strip padding from final plaintext, keeping it as-is when the pad is bad
pub fn unpad_lenient(padding: Padding, block_size: usize, buf: &mut Vec<u8>) {
    if !unpad(padding, block_size, buf) {
        warn!(
            padding = padding.as_str(),
            len = buf.len(),
            "inconsistent padding, output left unmodified"
        );
    }
}

/// A chaining mode that works in place on block-aligned bytes
///
/// State (previous ciphertext, counter, running MAC) lives in the
/// implementor across calls.
pub trait BlockChain {
    fn apply(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Trailer appended after the final ciphertext
    fn seal(self: Box<Self>) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    /// Check the trailer captured from the end of the ciphertext
    fn verify(self: Box<Self>, trailer: &[u8]) -> Result<()> {
        if trailer.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Primitive("unexpected trailer"))
        }
    }
}

/// Padding-aware [`Transform`] over an in-place [`BlockChain`]
pub struct Chained {
    chain: Box<dyn BlockChain>,
    direction: Direction,
    padding: Padding,
    block_size: usize,
}

impl Chained {
    pub fn new(
        chain: Box<dyn BlockChain>,
        direction: Direction,
        padding: Padding,
        block_size: usize,
    ) -> Self {
        Self {
            chain,
            direction,
            padding,
            block_size,
        }
    }
}

impl Transform for Chained {
    fn update(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<()> {
        // chunk sizes are block multiples, so only the final chunk can be ragged
        let start = out.len();
        out.extend_from_slice(data);
        self.chain.apply(&mut out[start..])
    }

    fn finish(self: Box<Self>, data: &[u8], trailer: &[u8], out: &mut Vec<u8>) -> Result<()> {
        let Chained {
            mut chain,
            direction,
            padding,
            block_size,
        } = *self;
        let mut buf = data.to_vec();

        match direction {
            Direction::Encrypt => {
                pad(padding, block_size, &mut buf)?;
                chain.apply(&mut buf)?;
                out.extend_from_slice(&buf);
                out.extend_from_slice(&chain.seal()?);
            }
            Direction::Decrypt => {
                check_aligned(buf.len(), block_size)?;
                chain.apply(&mut buf)?;
                chain.verify(trailer)?;
                unpad_lenient(padding, block_size, &mut buf);
                out.extend_from_slice(&buf);
            }
        }
        Ok(())
    }
}

type OneShotOp = Box<dyn FnOnce(Vec<u8>, &[u8]) -> Result<Vec<u8>>>;

/// Buffers the whole message for primitives that cannot stream
pub struct OneShot {
    buf: Vec<u8>,
    direction: Direction,
    padding: Padding,
    block_size: usize,
    op: OneShotOp,
}

impl OneShot {
    pub fn new(direction: Direction, padding: Padding, block_size: usize, op: OneShotOp) -> Self {
        Self {
            buf: Vec::new(),
            direction,
            padding,
            block_size,
            op,
        }
    }
}

impl Transform for OneShot {
    fn update(&mut self, data: &[u8], _out: &mut Vec<u8>) -> Result<()> {
        self.buf.extend_from_slice(data);
        Ok(())
    }

    fn finish(self: Box<Self>, data: &[u8], trailer: &[u8], out: &mut Vec<u8>) -> Result<()> {
        let OneShot {
            mut buf,
            direction,
            padding,
            block_size,
            op,
        } = *self;
        buf.extend_from_slice(data);

        match direction {
            Direction::Encrypt => {
                pad(padding, block_size, &mut buf)?;
                out.extend_from_slice(&op(buf, trailer)?);
            }
            Direction::Decrypt => {
                let mut plain = op(buf, trailer)?;
                unpad_lenient(padding, block_size, &mut plain);
                out.extend_from_slice(&plain);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8], chunk: usize, reserve: usize) -> Vec<Chunk> {
        let mut reader = LookaheadReader::new(Cursor::new(input.to_vec()), chunk, reserve).unwrap();
        let mut chunks = Vec::new();
        loop {
            let c = reader.next_chunk().unwrap();
            let last = c.last;
            chunks.push(c);
            if last {
                return chunks;
            }
        }
    }

    #[test]
    fn exact_multiple_keeps_final_chunk_non_empty() {
        let chunks = collect(&[7u8; 32], 16, 0);
        assert_eq!(chunks.len(), 2);
        assert!(!chunks[0].last);
        assert_eq!(chunks[1].data.len(), 16);
        assert!(chunks[1].last);
    }

    #[test]
    fn reserve_is_split_off_as_trailer() {
        let input: Vec<u8> = (0..40).collect();
        let chunks = collect(&input, 16, 16);
        let last = chunks.last().unwrap();
        assert_eq!(last.trailer, (24..40).collect::<Vec<u8>>());
        let body: Vec<u8> = chunks.iter().flat_map(|c| c.data.clone()).collect();
        assert_eq!(body, (0..24).collect::<Vec<u8>>());
    }

    struct Passthrough;

    impl Transform for Passthrough {
        fn update(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<()> {
            out.extend_from_slice(data);
            Ok(())
        }

        fn finish(self: Box<Self>, data: &[u8], trailer: &[u8], out: &mut Vec<u8>) -> Result<()> {
            out.extend_from_slice(data);
            out.extend_from_slice(trailer);
            Ok(())
        }
    }

    #[test]
    fn zero_chunk_size_fails_instead_of_spinning() {
        assert!(matches!(
            LookaheadReader::new(Cursor::new(vec![1u8; 8]), 0, 0),
            Err(EngineError::ZeroChunk)
        ));
        assert!(matches!(
            drive_vec(Box::new(Passthrough), b"some input", 0, 0, 16),
            Err(EngineError::ZeroChunk)
        ));
        assert_eq!(drive_vec(Box::new(Passthrough), b"some input", 1, 0, 16).unwrap(), b"some input");
    }

    #[test]
    fn empty_input_yields_one_empty_final_chunk() {
        let chunks = collect(&[], 16, 4);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].last && chunks[0].data.is_empty() && chunks[0].trailer.is_empty());
    }
}
