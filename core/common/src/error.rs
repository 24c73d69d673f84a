//! Common error types for sealkit.

use thiserror::Error;

/// Top-level error type for sealkit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input provided (empty plaintext, key, phrase or hash input,
    /// illegal key length).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested algorithm is not supported by the operation.
    #[error("Algorithm not supported in {operation}: {algorithm}")]
    Unsupported {
        operation: &'static str,
        algorithm: String,
    },

    /// Envelope is too short to carry an initialization vector and a block.
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Decryption failed. Wrong key, wrong IV and corrupted ciphertext are
    /// indistinguishable here.
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Text was not valid base64.
    #[error("Format error: {0}")]
    Format(String),

    /// Bytes could not be decoded in the requested text encoding.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Cryptographic primitive failed for a reason other than decryption.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bounded read exceeded its limit.
    #[error("Stream exceeds limit of {limit} bytes")]
    LimitExceeded { limit: u64 },
}

impl Error {
    /// Shorthand for [`Error::Unsupported`].
    pub fn unsupported(operation: &'static str, algorithm: impl ToString) -> Self {
        Self::Unsupported {
            operation,
            algorithm: algorithm.to_string(),
        }
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
