//! Runtime configuration for phrase-based operations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use sealkit_common::{Error, Result, TextEncoding};

use crate::kdf::{KdfScheme, DEFAULT_SALT};

/// Settings shared by phrase-based encryption and key derivation.
///
/// The defaults reproduce the legacy behaviour exactly: [`DEFAULT_SALT`],
/// UTF-16LE text and a single SHA-256 pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Salt substituted when a caller omits one.
    pub default_salt: String,
    /// Encoding for phrases, salts and text payloads.
    pub encoding: TextEncoding,
    /// Key derivation scheme.
    pub kdf: KdfScheme,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            default_salt: DEFAULT_SALT.to_string(),
            encoding: TextEncoding::Utf16Le,
            kdf: KdfScheme::Legacy,
        }
    }
}

impl CryptoConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::InvalidInput(format!("Invalid configuration: {}", e)))
    }

    fn validate(&self) -> Result<()> {
        if self.default_salt.is_empty() {
            return Err(Error::InvalidInput("default_salt cannot be empty".to_string()));
        }
        Ok(())
    }
}
