// tests/padding_tests.rs
use crypto_codec::core::padding::{pad, padded_len, unpad};
use crypto_codec::{EngineError, Padding};

const SCHEMES: [Padding; 6] = [
    Padding::Pkcs5,
    Padding::Pkcs7,
    Padding::Zero,
    Padding::Iso10126,
    Padding::AnsiX923,
    Padding::IsoIec7816_4,
];

#[test]
fn every_scheme_pads_to_block_and_unpads_back() {
    for scheme in SCHEMES {
        for len in 0..=24 {
            let original: Vec<u8> = (1..=len as u8).collect();
            let mut buf = original.clone();
            pad(scheme, 8, &mut buf).unwrap();
            assert_eq!(buf.len() % 8, 0, "{scheme} len {len}");
            assert_eq!(buf.len(), padded_len(scheme, 8, len), "{scheme} len {len}");
            assert!(buf.len() > original.len(), "{scheme} always adds bytes");
            assert!(unpad(scheme, 8, &mut buf), "{scheme} len {len}");
            assert_eq!(buf, original, "{scheme} len {len}");
        }
    }
}

#[test]
fn pkcs7_aligned_input_gains_a_full_block() {
    let mut buf = vec![0x41; 16];
    pad(Padding::Pkcs7, 16, &mut buf).unwrap();
    assert_eq!(buf.len(), 32);
    assert!(buf[16..].iter().all(|&b| b == 16));
}

#[test]
fn exact_pad_bytes() {
    let mut ansi = b"abcde".to_vec();
    pad(Padding::AnsiX923, 8, &mut ansi).unwrap();
    assert_eq!(ansi, b"abcde\0\0\x03");

    let mut iso = b"abcde".to_vec();
    pad(Padding::IsoIec7816_4, 8, &mut iso).unwrap();
    assert_eq!(iso, b"abcde\x80\0\0");

    let mut zero = b"abcde".to_vec();
    pad(Padding::Zero, 8, &mut zero).unwrap();
    assert_eq!(zero, b"abcde\0\0\0");

    let mut random = b"abcde".to_vec();
    pad(Padding::Iso10126, 8, &mut random).unwrap();
    assert_eq!(random[..5], *b"abcde");
    assert_eq!(random[7], 3);
}

#[test]
fn none_rejects_unaligned_and_is_identity_otherwise() {
    let mut short = b"hello world".to_vec();
    let err = pad(Padding::None, 8, &mut short).unwrap_err();
    assert!(matches!(err, EngineError::Unaligned { len: 11, block: 8 }));

    let mut aligned = b"12345678".to_vec();
    pad(Padding::None, 8, &mut aligned).unwrap();
    assert_eq!(aligned, b"12345678");
    assert!(unpad(Padding::None, 8, &mut aligned));
    assert_eq!(aligned, b"12345678");
}

#[test]
fn inconsistent_pkcs7_is_left_untouched() {
    let mut buf = b"abcdef\x02\x03".to_vec();
    assert!(!unpad(Padding::Pkcs7, 8, &mut buf));
    assert_eq!(buf, b"abcdef\x02\x03");

    let mut oversized = b"abcdefg\x09".to_vec();
    assert!(!unpad(Padding::Pkcs5, 8, &mut oversized));
    assert_eq!(oversized.len(), 8);
}

#[test]
fn ansix923_checks_zero_fill_but_iso10126_does_not() {
    let mut ansi = b"abcde\x01\0\x03".to_vec();
    assert!(!unpad(Padding::AnsiX923, 8, &mut ansi));

    let mut iso = b"abcde\x01\x7f\x03".to_vec();
    assert!(unpad(Padding::Iso10126, 8, &mut iso));
    assert_eq!(iso, b"abcde");
}

#[test]
fn zero_unpad_eats_trailing_plaintext_zeros() {
    let mut buf = b"ab\0".to_vec();
    pad(Padding::Zero, 8, &mut buf).unwrap();
    assert!(unpad(Padding::Zero, 8, &mut buf));
    assert_eq!(buf, b"ab");
}
