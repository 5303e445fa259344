// src/core/aes/wrap.rs
//! AES key wrap (RFC 3394) and key wrap with padding (RFC 5649)
//!
//! Written against a bare 16-byte block function so one implementation
//! serves all three key sizes.

use subtle::ConstantTimeEq;

use crate::consts::AES_BLOCK_SIZE;
use crate::error::EngineError;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Default ICV of RFC 3394 §2.2.3.1
pub const DEFAULT_ICV: [u8; 8] = [0xA6; 8];

/// Constant half of the RFC 5649 alternative ICV
pub const DEFAULT_PAD_ICV: [u8; 4] = [0xA6, 0x59, 0x59, 0xA6];

const SEMIBLOCK: usize = 8;
const ROUNDS: u64 = 6;

type BlockFn<'a> = &'a dyn Fn(&mut [u8; AES_BLOCK_SIZE]);

fn xor_counter(a: &mut [u8; SEMIBLOCK], t: u64) {
    for (x, y) in a.iter_mut().zip(t.to_be_bytes()) {
        *x ^= y;
    }
}

fn wrap_core(encrypt: BlockFn<'_>, icv: [u8; SEMIBLOCK], plain: &[u8]) -> Vec<u8> {
    let n = plain.len() / SEMIBLOCK;
    let mut a = icv;
    let mut r: Vec<[u8; SEMIBLOCK]> = plain
        .chunks_exact(SEMIBLOCK)
        .map(|c| {
            let mut s = [0u8; SEMIBLOCK];
            s.copy_from_slice(c);
            s
        })
        .collect();

    let mut b = [0u8; AES_BLOCK_SIZE];
    for j in 0..ROUNDS {
        for (i, ri) in r.iter_mut().enumerate() {
            b[..SEMIBLOCK].copy_from_slice(&a);
            b[SEMIBLOCK..].copy_from_slice(ri);
            encrypt(&mut b);
            a.copy_from_slice(&b[..SEMIBLOCK]);
            xor_counter(&mut a, n as u64 * j + i as u64 + 1);
            ri.copy_from_slice(&b[SEMIBLOCK..]);
        }
    }

    let mut out = Vec::with_capacity(plain.len() + SEMIBLOCK);
    out.extend_from_slice(&a);
    r.iter().for_each(|s| out.extend_from_slice(s));
    out
}

fn unwrap_core(decrypt: BlockFn<'_>, wrapped: &[u8]) -> ([u8; SEMIBLOCK], Vec<u8>) {
    let n = wrapped.len() / SEMIBLOCK - 1;
    let mut a = [0u8; SEMIBLOCK];
    a.copy_from_slice(&wrapped[..SEMIBLOCK]);
    let mut r: Vec<[u8; SEMIBLOCK]> = wrapped[SEMIBLOCK..]
        .chunks_exact(SEMIBLOCK)
        .map(|c| {
            let mut s = [0u8; SEMIBLOCK];
            s.copy_from_slice(c);
            s
        })
        .collect();

    let mut b = [0u8; AES_BLOCK_SIZE];
    for j in (0..ROUNDS).rev() {
        for (i, ri) in r.iter_mut().enumerate().rev() {
            xor_counter(&mut a, n as u64 * j + i as u64 + 1);
            b[..SEMIBLOCK].copy_from_slice(&a);
            b[SEMIBLOCK..].copy_from_slice(ri);
            decrypt(&mut b);
            a.copy_from_slice(&b[..SEMIBLOCK]);
            ri.copy_from_slice(&b[SEMIBLOCK..]);
        }
    }

    (a, r.concat())
}

/// RFC 3394 wrap; input must be at least two 64-bit semiblocks
pub fn wrap(encrypt: BlockFn<'_>, icv: Option<&[u8]>, plain: &[u8]) -> Result<Vec<u8>> {
    if plain.len() < 2 * SEMIBLOCK || plain.len() % SEMIBLOCK != 0 {
        return Err(EngineError::Unaligned {
            len: plain.len(),
            block: SEMIBLOCK,
        });
    }
    Ok(wrap_core(encrypt, icv_or_default(icv)?, plain))
}

pub fn unwrap(decrypt: BlockFn<'_>, icv: Option<&[u8]>, wrapped: &[u8]) -> Result<Vec<u8>> {
    if wrapped.len() < 3 * SEMIBLOCK || wrapped.len() % SEMIBLOCK != 0 {
        return Err(EngineError::Unaligned {
            len: wrapped.len(),
            block: SEMIBLOCK,
        });
    }
    let expected = icv_or_default(icv)?;
    let (a, plain) = unwrap_core(decrypt, wrapped);
    if bool::from(a.ct_eq(&expected)) {
        Ok(plain)
    } else {
        Err(EngineError::TagMismatch)
    }
}

/// RFC 5649 wrap with padding; any non-empty input length
pub fn wrap_pad(encrypt: BlockFn<'_>, icv: Option<&[u8]>, plain: &[u8]) -> Result<Vec<u8>> {
    if plain.is_empty() {
        return Err(EngineError::Primitive("key wrap needs a non-empty input"));
    }
    let mli = u32::try_from(plain.len())
        .map_err(|_| EngineError::Primitive("key wrap input too long"))?;

    let mut aiv = [0u8; SEMIBLOCK];
    aiv[..4].copy_from_slice(&pad_icv_or_default(icv)?);
    aiv[4..].copy_from_slice(&mli.to_be_bytes());

    let mut padded = plain.to_vec();
    padded.resize(plain.len().div_ceil(SEMIBLOCK) * SEMIBLOCK, 0);

    if padded.len() == SEMIBLOCK {
        let mut b = [0u8; AES_BLOCK_SIZE];
        b[..SEMIBLOCK].copy_from_slice(&aiv);
        b[SEMIBLOCK..].copy_from_slice(&padded);
        encrypt(&mut b);
        return Ok(b.to_vec());
    }
    Ok(wrap_core(encrypt, aiv, &padded))
}

pub fn unwrap_pad(decrypt: BlockFn<'_>, icv: Option<&[u8]>, wrapped: &[u8]) -> Result<Vec<u8>> {
    if wrapped.len() < 2 * SEMIBLOCK || wrapped.len() % SEMIBLOCK != 0 {
        return Err(EngineError::Unaligned {
            len: wrapped.len(),
            block: SEMIBLOCK,
        });
    }

    let (a, mut plain) = if wrapped.len() == AES_BLOCK_SIZE {
        let mut b = [0u8; AES_BLOCK_SIZE];
        b.copy_from_slice(wrapped);
        decrypt(&mut b);
        let mut a = [0u8; SEMIBLOCK];
        a.copy_from_slice(&b[..SEMIBLOCK]);
        (a, b[SEMIBLOCK..].to_vec())
    } else {
        unwrap_core(decrypt, wrapped)
    };

    let expected = pad_icv_or_default(icv)?;
    let mli = u32::from_be_bytes([a[4], a[5], a[6], a[7]]) as usize;
    let icv_ok: bool = a[..4].ct_eq(&expected).into();
    let len_ok = mli <= plain.len() && mli + SEMIBLOCK > plain.len();
    if !icv_ok || !len_ok || plain[mli.min(plain.len())..].iter().any(|&z| z != 0) {
        return Err(EngineError::TagMismatch);
    }
    plain.truncate(mli);
    Ok(plain)
}

fn icv_or_default(icv: Option<&[u8]>) -> Result<[u8; SEMIBLOCK]> {
    match icv {
        None => Ok(DEFAULT_ICV),
        Some(v) => v.try_into().map_err(|_| EngineError::IvLength(v.len())),
    }
}

fn pad_icv_or_default(icv: Option<&[u8]>) -> Result<[u8; 4]> {
    match icv {
        None => Ok(DEFAULT_PAD_ICV),
        Some(v) => v.try_into().map_err(|_| EngineError::IvLength(v.len())),
    }
}
