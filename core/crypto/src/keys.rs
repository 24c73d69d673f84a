//! Key types with secure memory handling.
//!
//! All key types zeroize their memory on drop. Keys are borrowed by the
//! cipher engine for the duration of a call and never retained.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use sealkit_common::{Error, Result};

/// Length of derived keys in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Length of stretched-KDF salts in bytes.
pub const SALT_LENGTH: usize = 32;

/// AES variant selected by key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesKeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl AesKeySize {
    /// Infer the variant from a key length in bytes.
    ///
    /// # Errors
    /// - `InvalidInput` for any length other than 16, 24 or 32
    pub fn from_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            0 => Err(Error::InvalidInput("Key cannot be empty".to_string())),
            other => Err(Error::InvalidInput(format!(
                "Invalid key length: expected 16, 24 or 32 bytes, got {}",
                other
            ))),
        }
    }

    /// Key length in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Key length in bits.
    pub fn bits(self) -> usize {
        self.byte_len() * 8
    }
}

/// AES key material.
///
/// The length is validated on construction, so a `CipherKey` always holds
/// 16, 24 or 32 bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey {
    key: Vec<u8>,
}

impl CipherKey {
    /// Copy a key from raw bytes.
    ///
    /// # Errors
    /// - `InvalidInput` if `key` is empty or not 16, 24 or 32 bytes long
    pub fn from_slice(key: &[u8]) -> Result<Self> {
        AesKeySize::from_len(key.len())?;
        Ok(Self { key: key.to_vec() })
    }

    /// Wrap a 256-bit key.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        let mut key = key;
        let owned = key.to_vec();
        key.zeroize();
        Self { key: owned }
    }

    /// Generate a random key of the given size.
    pub fn generate(size: AesKeySize) -> Self {
        let mut key = vec![0u8; size.byte_len()];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// AES variant this key selects.
    pub fn size(&self) -> AesKeySize {
        match self.key.len() {
            16 => AesKeySize::Aes128,
            24 => AesKeySize::Aes192,
            _ => AesKeySize::Aes256,
        }
    }
}

impl AsRef<[u8]> for CipherKey {
    fn as_ref(&self) -> &[u8] {
        &self.key
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherKey([REDACTED; {} bits])", self.size().bits())
    }
}

/// Salt for the stretched key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt(pub [u8; SALT_LENGTH]);

impl Salt {
    /// Generate a random salt.
    pub fn generate() -> Self {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut salt);
        Self(salt)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice of exactly [`SALT_LENGTH`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let salt: [u8; SALT_LENGTH] = bytes.try_into().map_err(|_| {
            Error::InvalidInput(format!(
                "Invalid salt length: expected {}, got {}",
                SALT_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(salt))
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}
