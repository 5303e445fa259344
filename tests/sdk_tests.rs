// tests/sdk_tests.rs
mod common;

use crypto_codec::config::{load_from, Stream};
use crypto_codec::{AesMode, Config, CryptoSdk, ErrorKind, KeygenRequest, Padding, Request};

#[test]
fn nothing_works_before_init() {
    let sdk = CryptoSdk::new();
    assert!(!sdk.is_loaded());

    let err = sdk.encrypt(&Request::memory("base64", b"x")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CoreNotLoaded);
    assert_eq!(err.code(), 2);
    assert!(sdk.decrypt(&Request::memory("base64", b"eA==")).is_err());
    assert!(sdk.make_key_pair(&KeygenRequest::new("rsa")).is_err());
}

#[test]
fn init_is_idempotent_and_quit_unloads() {
    common::setup();
    let mut sdk = CryptoSdk::default();
    sdk.init(Config::default()).unwrap();
    sdk.init(Config::default()).unwrap();
    assert!(sdk.is_loaded());
    assert_eq!(sdk.registry().unwrap().encryptor_names().len(), 6);

    let out = sdk.encrypt(&Request::memory("base64", b"x")).unwrap();
    assert_eq!(out.as_bytes(), Some(&b"eA=="[..]));

    sdk.quit();
    assert!(!sdk.is_loaded());
    assert_eq!(
        sdk.encrypt(&Request::memory("base64", b"x")).unwrap_err().kind(),
        ErrorKind::CoreNotLoaded
    );

    // a second quit is harmless and init works again
    sdk.quit();
    sdk.init(Config::default()).unwrap();
    assert!(sdk.is_loaded());
}

#[test]
fn init_refuses_a_chunk_size_that_splits_blocks() {
    let sdk = CryptoSdk::new();
    let config = Config {
        stream: Stream { chunk_size: 12 },
        ..Config::default()
    };
    assert_eq!(sdk.init(config).unwrap_err().kind(), ErrorKind::InitFailed);
    assert!(!sdk.is_loaded());
    sdk.init(Config::default()).unwrap();
    assert!(sdk.is_loaded());
}

#[test]
fn version_is_the_package_version() {
    assert_eq!(CryptoSdk::version(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn config_file_sets_auto_defaults() {
    let dir = common::scratch();
    let path = common::write_file(
        dir.path(),
        "crypto-codec.toml",
        b"[stream]\nchunk_size = 1024\n\n[defaults]\naes_mode = \"cbc\"\npadding = \"ansix923\"\n",
    );
    let config = load_from(&path).unwrap();
    assert_eq!(config.stream.chunk_size, 1024);
    assert_eq!(config.defaults.aes_mode, AesMode::Cbc);
    assert_eq!(config.defaults.padding, Padding::AnsiX923);

    let sdk = CryptoSdk::new();
    sdk.init(config).unwrap();

    // auto mode is now cbc, so an empty iv is rejected
    let err = sdk
        .encrypt(&Request::memory("aes", b"x").key(b"0123456789abcdef"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidIv);

    let explicit = Request::memory("aes", b"hello")
        .key(b"0123456789abcdef")
        .iv(b"fedcba9876543210")
        .fmt("hex");
    let ct = sdk.encrypt(&explicit).unwrap().into_bytes().unwrap();
    let back = sdk
        .decrypt(&Request::memory("aes", &ct).key(b"0123456789abcdef").iv(b"fedcba9876543210").fmt("hex"))
        .unwrap();
    assert_eq!(back.into_bytes().unwrap(), b"hello");
}

#[test]
fn bad_config_fails_init_codes() {
    let dir = common::scratch();
    let path = common::write_file(dir.path(), "bad.toml", b"[stream]\nchunk_size = 100\n");
    let err = load_from(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InitFailed);
    assert_eq!(err.code(), 5);

    let path = common::write_file(dir.path(), "typo.toml", b"[defaults]\naes_mode = \"cbc2\"\n");
    assert_eq!(load_from(&path).unwrap_err().kind(), ErrorKind::InitFailed);

    let missing = dir.path().join("absent.toml");
    assert_eq!(load_from(&missing).unwrap_err().kind(), ErrorKind::InitFailed);
}
