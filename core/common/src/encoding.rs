//! Character encodings used to turn text into bytes and back.
//!
//! The default is UTF-16 little-endian. Existing envelopes and digests were
//! produced from UTF-16LE text, so switching the default would silently change
//! every derived key and every text digest.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::{Error, Result};

/// Text encoding applied at the text/byte boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// UTF-16, little-endian, no byte order mark.
    #[default]
    Utf16Le,
    /// UTF-8.
    Utf8,
}

impl TextEncoding {
    /// Encode `text` into bytes.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Self::Utf8 => text.as_bytes().to_vec(),
        }
    }

    /// Decode `bytes` into text.
    ///
    /// # Errors
    /// - Odd-length input for UTF-16LE
    /// - Invalid code units or unpaired surrogates
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(Error::Encoding(format!(
                        "UTF-16 input has odd length {}",
                        bytes.len()
                    )));
                }
                String::from_utf16(&utf16_units(bytes))
                    .map_err(|e| Error::Encoding(e.to_string()))
            }
            Self::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|e| Error::Encoding(e.to_string())),
        }
    }

    /// Decode `bytes` into text, replacing anything undecodable with U+FFFD.
    ///
    /// A trailing odd byte in UTF-16LE input becomes one replacement character.
    pub fn decode_lossy(&self, bytes: &[u8]) -> String {
        match self {
            Self::Utf16Le => {
                let mut text = String::from_utf16_lossy(&utf16_units(bytes));
                if bytes.len() % 2 != 0 {
                    text.push(char::REPLACEMENT_CHARACTER);
                }
                text
            }
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf16Le => "utf16le",
            Self::Utf8 => "utf8",
        }
    }
}

fn utf16_units(bytes: &[u8]) -> Zeroizing<Vec<u16>> {
    Zeroizing::new(
        bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect(),
    )
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf16le" | "utf-16le" | "utf16" | "utf-16" | "unicode" => Ok(Self::Utf16Le),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            other => Err(Error::InvalidInput(format!("Unknown text encoding: {}", other))),
        }
    }
}
