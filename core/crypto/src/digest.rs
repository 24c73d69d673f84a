//! One-way hashing with SHA-256 and SHA-512.
//!
//! Digests are unsalted and unkeyed. Empty input is rejected rather than
//! hashed, so `digest(Sha256, b"")` is an error, not the empty-string hash.

use sha2::{Digest as _, Sha256, Sha512};
use subtle::ConstantTimeEq;

use sealkit_common::util::base64_encode;
use sealkit_common::{Error, Result, TextEncoding};

use crate::algorithm::HashAlgorithm;

/// Output of a hash function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    algorithm: HashAlgorithm,
    bytes: Vec<u8>,
}

impl Digest {
    /// Algorithm that produced this digest.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Digest length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; digests have a fixed, non-zero length.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 text.
    pub fn to_base64(&self) -> String {
        base64_encode(&self.bytes)
    }

    /// Lowercase hex text.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Consume into the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Hash `bytes` with `algorithm`.
///
/// # Errors
/// - `InvalidInput` if `bytes` is empty
/// - `Unsupported` for [`HashAlgorithm::None`]
pub fn digest(algorithm: HashAlgorithm, bytes: &[u8]) -> Result<Digest> {
    let bytes = match algorithm {
        HashAlgorithm::Sha256 => sha256(bytes)?.to_vec(),
        HashAlgorithm::Sha512 => sha512(bytes)?.to_vec(),
        HashAlgorithm::None => return Err(Error::unsupported("digest", algorithm)),
    };
    Ok(Digest { algorithm, bytes })
}

/// Hash `text` after encoding it with `encoding`.
///
/// The encoding changes the digest: the same text hashed as UTF-16LE and as
/// UTF-8 yields different values.
pub fn digest_text(algorithm: HashAlgorithm, text: &str, encoding: TextEncoding) -> Result<Digest> {
    if text.is_empty() {
        return Err(Error::InvalidInput("Text to hash cannot be empty".to_string()));
    }
    if algorithm == HashAlgorithm::None {
        return Err(Error::unsupported("digest", algorithm));
    }
    digest(algorithm, &encoding.encode(text))
}

/// Base64 digest of `bytes`.
pub fn digest_base64(algorithm: HashAlgorithm, bytes: &[u8]) -> Result<String> {
    digest(algorithm, bytes).map(|d| d.to_base64())
}

/// Base64 digest of `text`.
pub fn digest_text_base64(
    algorithm: HashAlgorithm,
    text: &str,
    encoding: TextEncoding,
) -> Result<String> {
    digest_text(algorithm, text, encoding).map(|d| d.to_base64())
}

/// SHA-256 of non-empty `bytes`.
pub fn sha256(bytes: &[u8]) -> Result<[u8; 32]> {
    if bytes.is_empty() {
        return Err(Error::InvalidInput("Bytes to hash cannot be empty".to_string()));
    }
    Ok(Sha256::digest(bytes).into())
}

/// SHA-512 of non-empty `bytes`.
pub fn sha512(bytes: &[u8]) -> Result<[u8; 64]> {
    if bytes.is_empty() {
        return Err(Error::InvalidInput("Bytes to hash cannot be empty".to_string()));
    }
    Ok(Sha512::digest(bytes).into())
}

/// Check `bytes` against an expected digest in constant time.
pub fn verify(algorithm: HashAlgorithm, bytes: &[u8], expected: &[u8]) -> Result<bool> {
    let actual = digest(algorithm, bytes)?;
    Ok(actual.as_bytes().ct_eq(expected).into())
}
