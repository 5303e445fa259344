// src/core/padding.rs
//! Byte-exact pad / unpad for the block-cipher padding schemes
//!
//! Padding is always applied when enabled, so block-aligned input gains a
//! whole extra block. Unpadding is lenient: an inconsistent pad leaves the
//! buffer untouched and reports `false` instead of failing.

use rand::RngCore;

use crate::enums::Padding;
use crate::error::EngineError;

const ISO7816_MARKER: u8 = 0x80;

/// Extend `data` in place to a multiple of `block_size`
pub fn pad(padding: Padding, block_size: usize, data: &mut Vec<u8>) -> Result<(), EngineError> {
    if padding.is_none() {
        return check_aligned(data.len(), block_size);
    }

    let pad_len = block_size - data.len() % block_size;
    let start = data.len();
    match padding {
        Padding::Pkcs5 | Padding::Pkcs7 => data.resize(start + pad_len, pad_len as u8),
        Padding::Zero => data.resize(start + pad_len, 0),
        Padding::Iso10126 => {
            data.resize(start + pad_len, 0);
            rand::thread_rng().fill_bytes(&mut data[start..start + pad_len - 1]);
            data[start + pad_len - 1] = pad_len as u8;
        }
        Padding::AnsiX923 => {
            data.resize(start + pad_len, 0);
            data[start + pad_len - 1] = pad_len as u8;
        }
        Padding::IsoIec7816_4 => {
            data.push(ISO7816_MARKER);
            data.resize(start + pad_len, 0);
        }
        Padding::None => {}
    }
    Ok(())
}

/// Strip padding from the final plaintext in place
///
/// Returns `false` when the pad bytes are inconsistent; the buffer is then
/// left exactly as decrypted.
pub fn unpad(padding: Padding, block_size: usize, data: &mut Vec<u8>) -> bool {
    let Some(&last) = data.last() else {
        return padding.is_none() || padding == Padding::Zero;
    };
    let len = data.len();

    match padding {
        Padding::None => true,
        Padding::Zero => {
            let keep = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            data.truncate(keep);
            true
        }
        Padding::Pkcs5 | Padding::Pkcs7 => {
            let n = last as usize;
            if n == 0 || n > block_size || n > len {
                return false;
            }
            if data[len - n..].iter().any(|&b| b != last) {
                return false;
            }
            data.truncate(len - n);
            true
        }
        Padding::Iso10126 => {
            let n = last as usize;
            if n == 0 || n > block_size || n > len {
                return false;
            }
            data.truncate(len - n);
            true
        }
        Padding::AnsiX923 => {
            let n = last as usize;
            if n == 0 || n > block_size || n > len {
                return false;
            }
            if data[len - n..len - 1].iter().any(|&b| b != 0) {
                return false;
            }
            data.truncate(len - n);
            true
        }
        Padding::IsoIec7816_4 => {
            let floor = len.saturating_sub(block_size);
            match data[floor..].iter().rposition(|&b| b != 0) {
                Some(i) if data[floor + i] == ISO7816_MARKER => {
                    data.truncate(floor + i);
                    true
                }
                _ => false,
            }
        }
    }
}

/// `no_padding` contract: plaintext must already be block aligned
pub fn check_aligned(len: usize, block_size: usize) -> Result<(), EngineError> {
    if len % block_size != 0 {
        return Err(EngineError::Unaligned {
            len,
            block: block_size,
        });
    }
    Ok(())
}

/// Size of `len` plaintext bytes once padded
pub fn padded_len(padding: Padding, block_size: usize, len: usize) -> usize {
    if padding.is_none() {
        len
    } else {
        (len / block_size + 1) * block_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso7816_unpad_scans_past_zero_fill() {
        let mut data = b"abc\x80\0\0\0\0".to_vec();
        assert!(unpad(Padding::IsoIec7816_4, 8, &mut data));
        assert_eq!(data, b"abc");
    }

    #[test]
    fn empty_buffer_unpads_only_for_lenient_schemes() {
        let mut empty = Vec::new();
        assert!(unpad(Padding::Zero, 8, &mut empty));
        assert!(!unpad(Padding::Pkcs7, 8, &mut empty));
    }
}
