//! AES-CBC envelopes.
//!
//! Envelope format: `iv (16 bytes) || AES-CBC/PKCS7 ciphertext`.
//!
//! The AES variant (128/192/256) follows the key length. There is no
//! authentication tag: a modified envelope whose padding still checks out
//! decrypts to garbage without an error. Use [`crate::aead`] when integrity
//! matters.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use sealkit_common::{Error, Result};

use crate::keys::AesKeySize;

/// Initialization vector size (128 bits).
pub const IV_SIZE: usize = 16;

/// AES block size.
pub const BLOCK_SIZE: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes192CbcDec = cbc::Decryptor<Aes192>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Ciphertext length for `len` plaintext bytes under PKCS7.
///
/// A full final block still gains a whole block of padding.
pub fn padded_len(len: usize) -> usize {
    (len / BLOCK_SIZE + 1) * BLOCK_SIZE
}

/// Encrypt `plaintext` under a fresh random IV.
///
/// # Preconditions
/// - `key` must be 16, 24 or 32 bytes
/// - `plaintext` must not be empty
///
/// # Postconditions
/// - Returns `iv || ciphertext`, of length `IV_SIZE + padded_len(plaintext.len())`
///
/// # Errors
/// - `InvalidInput` for empty plaintext, empty key or an illegal key length
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    encrypt_with_iv(key, &iv, plaintext)
}

/// Encrypt `plaintext` under a caller-chosen IV.
///
/// # Warning
/// Reusing an IV under the same key leaks whether two messages share a
/// prefix. Only use this for reproducing known vectors.
pub fn encrypt_with_iv(key: &[u8], iv: &[u8; IV_SIZE], plaintext: &[u8]) -> Result<Vec<u8>> {
    if plaintext.is_empty() {
        return Err(Error::InvalidInput("Plaintext cannot be empty".to_string()));
    }
    let size = AesKeySize::from_len(key.len())?;

    let ciphertext = match size {
        AesKeySize::Aes128 => Aes128CbcEnc::new_from_slices(key, iv)
            .map_err(invalid_length)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        AesKeySize::Aes192 => Aes192CbcEnc::new_from_slices(key, iv)
            .map_err(invalid_length)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        AesKeySize::Aes256 => Aes256CbcEnc::new_from_slices(key, iv)
            .map_err(invalid_length)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
    };

    let mut envelope = Vec::with_capacity(IV_SIZE + ciphertext.len());
    envelope.extend_from_slice(iv);
    envelope.extend_from_slice(&ciphertext);
    Ok(envelope)
}

/// Decrypt an envelope produced by [`encrypt`].
///
/// # Errors
/// - `InvalidInput` for an empty envelope, empty key or illegal key length
/// - `MalformedEnvelope` if the envelope is not longer than the IV
/// - `DecryptionFailed` on a bad block length or bad padding
pub fn decrypt(key: &[u8], envelope: &[u8]) -> Result<Vec<u8>> {
    if envelope.is_empty() {
        return Err(Error::InvalidInput("Envelope cannot be empty".to_string()));
    }
    if envelope.len() <= IV_SIZE {
        return Err(Error::MalformedEnvelope(format!(
            "envelope does not contain an initialization vector and ciphertext; length {}",
            envelope.len()
        )));
    }
    let size = AesKeySize::from_len(key.len())?;

    let (iv, body) = envelope.split_at(IV_SIZE);

    match size {
        AesKeySize::Aes128 => {
            decrypt_body(Aes128CbcDec::new_from_slices(key, iv).map_err(invalid_length)?, body)
        }
        AesKeySize::Aes192 => {
            decrypt_body(Aes192CbcDec::new_from_slices(key, iv).map_err(invalid_length)?, body)
        }
        AesKeySize::Aes256 => {
            decrypt_body(Aes256CbcDec::new_from_slices(key, iv).map_err(invalid_length)?, body)
        }
    }
}

/// Decrypt in a zeroizing copy of `body`, so rejected padding never leaves
/// decrypted blocks behind.
fn decrypt_body<D: BlockDecryptMut>(decryptor: D, body: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Zeroizing::new(body.to_vec());
    let plaintext = decryptor
        .decrypt_padded_mut::<Pkcs7>(&mut buf)
        .map_err(|_| Error::DecryptionFailed)?;
    Ok(plaintext.to_vec())
}

fn invalid_length(e: cbc::cipher::InvalidLength) -> Error {
    Error::InvalidInput(format!("Invalid key or IV length: {}", e))
}
