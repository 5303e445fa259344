// src/lib.rs
//! crypto-codec: AES / DES / RSA codec engine
//!
//! Features:
//! - AES in 15 modes, including GCM / CCM / OCB tags and key wrap
//! - Single, two-key and three-key DES with hand-written chaining
//! - Chunked RSA with PEM loading, signing and key-pair generation
//! - Six padding schemes applied on the final chunk of a stream
//! - Hex / base64 at-rest encoding for memory and files
//! - A name-keyed registry that validates before any work runs

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod enums;
pub mod error;
pub mod registry;
pub mod sdk;

// Re-export everything users need at the crate root
pub use config::load as load_config;
pub use config::Config;
pub use core::rsa::KeyPair;
pub use core::CipherSpec;
pub use enums::{Algorithm, AesMode, DesMode, KeyFormat, KeygenMode, Padding, RsaPadding, Style};
pub use error::{CryptoError, EngineError, ErrorKind, FormatError, InputFault, Result};
pub use registry::{select_output_fmt, KeygenRequest, Output, Registry, Request, Sink, Source};
pub use sdk::CryptoSdk;
