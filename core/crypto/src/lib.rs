//! Symmetric encryption and hashing for sealkit.
//!
//! This module provides:
//! - SHA-256 / SHA-512 digests of bytes and encoded text
//! - Phrase-based key derivation (single-pass SHA-256, or opt-in Argon2id)
//! - AES-CBC envelopes with a random IV prepended to the ciphertext
//! - Opt-in AES-256-GCM envelopes for authenticated encryption
//!
//! # Security Notes
//! - CBC envelopes carry no authentication tag; tampering is not detected
//! - Key material is zeroized on drop and never retained between calls
//! - No plaintext or key material is ever logged

pub mod aead;
pub mod algorithm;
pub mod cbc;
pub mod config;
pub mod digest;
pub mod engine;
pub mod kdf;
pub mod keys;

pub use algorithm::{HashAlgorithm, SymmetricAlgorithm};
pub use config::CryptoConfig;
pub use digest::{digest, digest_base64, digest_text, digest_text_base64, Digest};
pub use engine::{
    decrypt, decrypt_text, decrypt_with_phrase, encrypt, encrypt_text, encrypt_with_phrase,
};
pub use kdf::{
    derive_key, derive_key_stretched, derive_key_with, KdfParams, KdfScheme, DEFAULT_SALT,
};
pub use keys::{AesKeySize, CipherKey, Salt};
pub use sealkit_common::{Error, Result, TextEncoding};
