// tests/common.rs
//! Shared test utilities: logging setup and scratch files
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize test-friendly logging
/// Call once at the start of any test that needs logs
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer()) // works in `cargo test`
        .with(EnvFilter::from_default_env()) // respects RUST_LOG=
        .try_init()
        .ok(); // idempotent, safe to call multiple times
}

/// Fresh scratch directory, removed on drop
pub fn scratch() -> TempDir {
    tempfile::Builder::new()
        .prefix("crypto-codec-test-")
        .tempdir()
        .expect("create scratch dir")
}

/// Write `data` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("write scratch file");
    path
}

/// Deterministic non-trivial payload that never ends in a zero byte
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 251) as u8 + 1).collect()
}
