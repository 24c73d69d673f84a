//! Common utilities and types shared across sealkit modules.
//!
//! This module provides the error type, text encodings, sensitive buffers
//! and the small helpers that sit at the boundary of the cryptographic core.

pub mod encoding;
pub mod error;
pub mod sensitive;
pub mod util;

pub use encoding::TextEncoding;
pub use error::{Error, Result};
pub use sensitive::SensitiveBytes;
