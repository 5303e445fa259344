// src/aliases.rs
//! Secret-holding byte and string types built on secure-gate
//!
//! Key bytes and passphrases live only for the duration of one call and are
//! zeroized on drop. Nothing in the crate caches them.

pub use secure_gate::dynamic_alias;

// Raw symmetric key bytes (AES, DES sub-keys, XTS double keys)
dynamic_alias!(KeyMaterial, Vec<u8>);

// Initialisation vector / nonce / wrap ICV
dynamic_alias!(IvMaterial, Vec<u8>);

// Passphrase protecting a generated private key
dynamic_alias!(Passphrase, String);

// PEM text of a generated private key
dynamic_alias!(PrivatePem, String);
