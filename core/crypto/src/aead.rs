//! Authenticated encryption using AES-256-GCM.
//!
//! Opt-in alternative to the CBC envelope. The 16-byte tag makes any change
//! to the envelope, or a wrong key, fail decryption.
//!
//! Envelope format: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use sealkit_common::{Error, Result};

use crate::keys::KEY_LENGTH;

/// Nonce size for AES-GCM (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// Encrypt plaintext using AES-256-GCM.
///
/// # Preconditions
/// - `key` must be exactly KEY_LENGTH bytes
/// - `plaintext` must not be empty
///
/// # Postconditions
/// - Returns nonce || ciphertext || tag
/// - The nonce is randomly generated
/// - The envelope length is plaintext length + NONCE_SIZE + TAG_SIZE
///
/// # Errors
/// - `InvalidInput` if the plaintext is empty or the key length is incorrect
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    if plaintext.is_empty() {
        return Err(Error::InvalidInput("Plaintext cannot be empty".to_string()));
    }
    let cipher = cipher(key)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))?;

    // Prepend nonce to ciphertext
    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Decrypt an envelope produced by [`encrypt`].
///
/// # Errors
/// - `InvalidInput` if the envelope is empty or the key length is incorrect
/// - `MalformedEnvelope` if the envelope cannot hold a nonce, a tag and one byte
/// - `DecryptionFailed` if authentication fails
pub fn decrypt(key: &[u8], envelope: &[u8]) -> Result<Vec<u8>> {
    if envelope.is_empty() {
        return Err(Error::InvalidInput("Envelope cannot be empty".to_string()));
    }
    if envelope.len() <= NONCE_SIZE + TAG_SIZE {
        return Err(Error::MalformedEnvelope(format!(
            "envelope does not contain a nonce, ciphertext and tag; length {}",
            envelope.len()
        )));
    }
    let cipher = cipher(key)?;

    let (nonce_bytes, encrypted) = envelope.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, encrypted)
        .map_err(|_| Error::DecryptionFailed)
}

fn cipher(key: &[u8]) -> Result<Aes256Gcm> {
    if key.len() != KEY_LENGTH {
        return Err(Error::InvalidInput(format!(
            "Invalid key length: expected {}, got {}",
            KEY_LENGTH,
            key.len()
        )));
    }
    Aes256Gcm::new_from_slice(key).map_err(|e| Error::InvalidInput(e.to_string()))
}
