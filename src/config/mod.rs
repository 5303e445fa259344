// src/config/mod.rs
//! Configuration system for crypto-codec
//!
//! TOML file + env override, with built-in defaults. Loaded once by the
//! caller and handed to the registry by value.

pub use app::{load, load_from, Config, Defaults, Stream};

mod app;
mod defaults;
