//! Algorithm identifiers.
//!
//! Numeric tags are stable: `0` is reserved for "unset" in both tables and is
//! never a usable algorithm.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use sealkit_common::{Error, Result};

/// Symmetric ciphers understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SymmetricAlgorithm {
    /// Unset. Rejected by every operation.
    None = 0,
    /// AES in CBC mode with PKCS7 padding and a prepended random IV.
    /// The AES variant follows the key length.
    Aes256 = 2,
    /// AES-256-GCM. Authenticated; opt-in only.
    Aes256Gcm = 6,
}

impl SymmetricAlgorithm {
    const ALL: [Self; 3] = [Self::None, Self::Aes256, Self::Aes256Gcm];

    /// Numeric tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Symbolic name.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Aes256 => "Aes256",
            Self::Aes256Gcm => "Aes256Gcm",
        }
    }

    /// Map of every variant name to its numeric tag.
    pub fn table() -> BTreeMap<&'static str, u8> {
        Self::ALL.iter().map(|a| (a.name(), a.tag())).collect()
    }
}

impl TryFrom<u8> for SymmetricAlgorithm {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.tag() == tag)
            .ok_or_else(|| Error::unsupported("symmetric algorithm lookup", format!("tag {}", tag)))
    }
}

impl FromStr for SymmetricAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::unsupported("symmetric algorithm lookup", s))
    }
}

impl fmt::Display for SymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hash functions understood by the digest engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HashAlgorithm {
    /// Unset. Rejected by every operation.
    None = 0,
    /// SHA-256, 32-byte output.
    Sha256 = 3,
    /// SHA-512, 64-byte output.
    Sha512 = 5,
}

impl HashAlgorithm {
    const ALL: [Self; 3] = [Self::None, Self::Sha256, Self::Sha512];

    /// Numeric tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Symbolic name.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Sha256 => "Sha256",
            Self::Sha512 => "Sha512",
        }
    }

    /// Digest length in bytes, or `None` for the unset variant.
    pub fn output_len(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::Sha256 => Some(32),
            Self::Sha512 => Some(64),
        }
    }

    /// Map of every variant name to its numeric tag.
    pub fn table() -> BTreeMap<&'static str, u8> {
        Self::ALL.iter().map(|a| (a.name(), a.tag())).collect()
    }
}

impl TryFrom<u8> for HashAlgorithm {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.tag() == tag)
            .ok_or_else(|| Error::unsupported("hash algorithm lookup", format!("tag {}", tag)))
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::unsupported("hash algorithm lookup", s))
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
