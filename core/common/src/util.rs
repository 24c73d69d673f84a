//! Boundary helpers: base64, dictionary access, log-safe text and bounded reads.

use std::borrow::{Borrow, Cow};
use std::collections::HashMap;
use std::hash::Hash;
use std::io::Read;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{Error, Result, TextEncoding};

/// Longest message, in characters, that [`truncate_for_log`] lets through.
pub const LOG_ENTRY_LIMIT: usize = 31_800;

/// Suffix appended to truncated log messages.
pub const TRUNCATION_SUFFIX: &str = " ... Entry truncated";

/// Largest limit accepted by [`read_to_end_bounded`] (2 GiB - 1).
pub const MAX_READ_LIMIT: u64 = i32::MAX as u64;

/// Encode bytes as standard, padded base64. Empty input yields an empty string.
pub fn base64_encode(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }
    STANDARD.encode(bytes)
}

/// Decode standard, padded base64.
///
/// # Errors
/// - `InvalidInput` if `text` is empty
/// - `Format` if `text` is not valid base64
pub fn base64_decode(text: &str) -> Result<Vec<u8>> {
    if text.is_empty() {
        return Err(Error::InvalidInput("Base64 text cannot be empty".to_string()));
    }
    STANDARD
        .decode(text.trim())
        .map_err(|e| Error::Format(format!("Invalid base64: {}", e)))
}

/// Encode `text` with `encoding` and return it as base64.
pub fn text_to_base64(text: &str, encoding: TextEncoding) -> String {
    if text.is_empty() {
        return String::new();
    }
    base64_encode(&encoding.encode(text))
}

/// Decode base64 and interpret the bytes as `encoding` text.
pub fn base64_to_text(encoded: &str, encoding: TextEncoding) -> Result<String> {
    let bytes = base64_decode(encoded)?;
    encoding.decode(&bytes)
}

/// Look up `key`, falling back to `default` when the key is absent or `None`.
pub fn get_or_default<K, Q, V>(map: &HashMap<K, V>, key: Option<&Q>, default: V) -> V
where
    K: Borrow<Q> + Hash + Eq,
    Q: Hash + Eq + ?Sized,
    V: Clone,
{
    key.and_then(|k| map.get(k)).cloned().unwrap_or(default)
}

/// Insert `value` under `key`, replacing any existing entry.
pub fn insert_or_replace<K: Hash + Eq, V>(map: &mut HashMap<K, V>, key: K, value: V) {
    map.insert(key, value);
}

/// Cap a message at [`LOG_ENTRY_LIMIT`] characters for log sinks with a size limit.
pub fn truncate_for_log(message: &str) -> Cow<'_, str> {
    if message.trim().is_empty() {
        return Cow::Borrowed(message);
    }
    match message.char_indices().nth(LOG_ENTRY_LIMIT) {
        None => Cow::Borrowed(message),
        Some((cut, _)) => Cow::Owned(format!("{}{}", &message[..cut], TRUNCATION_SUFFIX)),
    }
}

/// Read `reader` to the end into memory, refusing streams larger than `limit`.
///
/// # Errors
/// - `InvalidInput` if `limit` exceeds [`MAX_READ_LIMIT`]
/// - `LimitExceeded` if the stream holds more than `limit` bytes
/// - `Io` on read failure
pub fn read_to_end_bounded<R: Read>(reader: R, limit: u64) -> Result<Vec<u8>> {
    if limit > MAX_READ_LIMIT {
        return Err(Error::InvalidInput(format!(
            "Read limit {} exceeds maximum of {} bytes; use a streaming reader instead",
            limit, MAX_READ_LIMIT
        )));
    }

    let mut buffer = Vec::new();
    reader.take(limit + 1).read_to_end(&mut buffer)?;

    if buffer.len() as u64 > limit {
        return Err(Error::LimitExceeded { limit });
    }
    Ok(buffer)
}
