//! Key derivation from a shared phrase.
//!
//! The default scheme is a single SHA-256 pass over `phrase || salt`. It is
//! not a password hash: there is no stretching, and omitting the salt falls
//! back to [`DEFAULT_SALT`], which every caller shares. Envelopes produced
//! under this scheme can only be opened by reproducing it exactly.
//!
//! Argon2id is available as an opt-in scheme through [`KdfScheme::Argon2id`].
//! Keys derived that way are not interchangeable with legacy keys.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use sealkit_common::{Error, Result, TextEncoding};

use crate::config::CryptoConfig;
use crate::digest::sha256;
use crate::keys::{CipherKey, Salt, KEY_LENGTH};

/// Salt used when the caller supplies none.
///
/// Shared by every caller that omits a salt, so phrases derived with it are
/// only as strong as the phrase itself.
pub const DEFAULT_SALT: &str = "SNJRDNRLS^43uygé&%¿bsakeô24ffs";

/// How a phrase is turned into a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "lowercase")]
pub enum KdfScheme {
    /// Single SHA-256 pass over `phrase || salt`.
    #[default]
    Legacy,
    /// Argon2id over the encoded phrase, salted with SHA-256 of the salt text.
    Argon2id(KdfParams),
}

/// Parameters for Argon2id key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB (e.g., 65536 = 64 MiB).
    pub memory_cost: u32,
    /// Number of iterations.
    pub time_cost: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl KdfParams {
    /// Create parameters suitable for interactive use.
    pub fn interactive() -> Self {
        Self {
            memory_cost: 65536, // 64 MiB
            time_cost: 3,
            parallelism: 4,
        }
    }

    /// Create parameters suitable for sensitive data.
    pub fn sensitive() -> Self {
        Self {
            memory_cost: 262144, // 256 MiB
            time_cost: 4,
            parallelism: 4,
        }
    }

    /// Create moderate parameters for constrained devices.
    pub fn moderate() -> Self {
        Self {
            memory_cost: 32768, // 32 MiB
            time_cost: 3,
            parallelism: 2,
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "interactive" => Ok(Self::interactive()),
            "moderate" => Ok(Self::moderate()),
            "sensitive" => Ok(Self::sensitive()),
            other => Err(Error::InvalidInput(format!(
                "Unknown KDF strength '{}': use interactive, moderate or sensitive",
                other
            ))),
        }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Append `salt` to `phrase`, substituting [`DEFAULT_SALT`] for a missing or
/// empty salt.
pub fn salted_phrase(phrase: &str, salt: Option<&str>) -> Result<Zeroizing<String>> {
    salted_phrase_with_default(phrase, salt, DEFAULT_SALT)
}

/// Append `salt` to `phrase`, substituting `default_salt` for a missing or
/// empty salt.
///
/// # Errors
/// - `InvalidInput` if `phrase` is empty
pub fn salted_phrase_with_default(
    phrase: &str,
    salt: Option<&str>,
    default_salt: &str,
) -> Result<Zeroizing<String>> {
    if phrase.is_empty() {
        return Err(Error::InvalidInput("Phrase cannot be empty".to_string()));
    }
    let salt = salt.filter(|s| !s.is_empty()).unwrap_or(default_salt);

    let mut salted = Zeroizing::new(String::with_capacity(phrase.len() + salt.len()));
    salted.push_str(phrase);
    salted.push_str(salt);
    Ok(salted)
}

/// Derive a 256-bit key: `SHA-256(encode(phrase || salt))`.
///
/// # Errors
/// - `InvalidInput` if `phrase` is empty
pub fn derive_key(phrase: &str, salt: Option<&str>, encoding: TextEncoding) -> Result<CipherKey> {
    let salted = salted_phrase(phrase, salt)?;
    legacy_key(&salted, encoding)
}

/// Derive a key according to `config`.
///
/// Uses `config.default_salt` when `salt` is missing or empty, encodes with
/// `config.encoding` and applies `config.kdf`.
pub fn derive_key_with(
    config: &CryptoConfig,
    phrase: &str,
    salt: Option<&str>,
) -> Result<CipherKey> {
    match &config.kdf {
        KdfScheme::Legacy => {
            let salted = salted_phrase_with_default(phrase, salt, &config.default_salt)?;
            legacy_key(&salted, config.encoding)
        }
        KdfScheme::Argon2id(params) => {
            if phrase.is_empty() {
                return Err(Error::InvalidInput("Phrase cannot be empty".to_string()));
            }
            let salt_text = salt
                .filter(|s| !s.is_empty())
                .unwrap_or(config.default_salt.as_str());
            let salt = Salt::from_bytes(sha256(&config.encoding.encode(salt_text))?);
            let phrase_bytes = Zeroizing::new(config.encoding.encode(phrase));
            derive_key_stretched(&phrase_bytes, &salt, params)
        }
    }
}

fn legacy_key(salted: &str, encoding: TextEncoding) -> Result<CipherKey> {
    let bytes = Zeroizing::new(encoding.encode(salted));
    Ok(CipherKey::from_bytes(sha256(&bytes)?))
}

/// Derive a 256-bit key from `phrase` and `salt` using Argon2id.
///
/// # Errors
/// - `InvalidInput` if `phrase` is empty
/// - `Crypto` if the Argon2id parameters are invalid
pub fn derive_key_stretched(phrase: &[u8], salt: &Salt, params: &KdfParams) -> Result<CipherKey> {
    if phrase.is_empty() {
        return Err(Error::InvalidInput("Phrase cannot be empty".to_string()));
    }

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_LENGTH),
    )
    .map_err(|e| Error::Crypto(format!("Invalid KDF parameters: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key_bytes = Zeroizing::new([0u8; KEY_LENGTH]);
    argon2
        .hash_password_into(phrase, salt.as_bytes(), &mut key_bytes[..])
        .map_err(|e| Error::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(CipherKey::from_bytes(*key_bytes))
}

/// Check that `phrase` derives `expected` under the stretched scheme.
///
/// Comparison is constant-time.
pub fn verify_phrase(
    phrase: &[u8],
    salt: &Salt,
    params: &KdfParams,
    expected: &CipherKey,
) -> Result<bool> {
    let derived = derive_key_stretched(phrase, salt, params)?;
    Ok(derived.as_bytes().ct_eq(expected.as_bytes()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> KdfParams {
        KdfParams {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_salted_phrase_concatenates() {
        let salted = salted_phrase("hello", Some("world")).unwrap();
        assert_eq!(salted.as_str(), "helloworld");
    }

    #[test]
    fn test_salted_phrase_default_salt() {
        let expected = format!("hello{}", DEFAULT_SALT);
        assert_eq!(salted_phrase("hello", None).unwrap().as_str(), expected);
        assert_eq!(salted_phrase("hello", Some("")).unwrap().as_str(), expected);
    }

    #[test]
    fn test_empty_phrase_fails() {
        assert!(matches!(salted_phrase("", Some("salt")), Err(Error::InvalidInput(_))));
        assert!(matches!(
            derive_key("", None, TextEncoding::Utf8),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_derive_key_is_sha256_of_salted_text() {
        let key = derive_key("hello", Some("world"), TextEncoding::Utf8).unwrap();
        assert_eq!(key.as_bytes(), sha256(b"helloworld").unwrap());

        let key16 = derive_key("hello", Some("world"), TextEncoding::Utf16Le).unwrap();
        let utf16 = TextEncoding::Utf16Le.encode("helloworld");
        assert_eq!(key16.as_bytes(), sha256(&utf16).unwrap());
    }

    #[test]
    fn test_derive_key_deterministic() {
        let key1 = derive_key("phrase", Some("salt"), TextEncoding::Utf16Le).unwrap();
        let key2 = derive_key("phrase", Some("salt"), TextEncoding::Utf16Le).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert_eq!(key1.as_bytes().len(), KEY_LENGTH);
    }

    #[test]
    fn test_empty_salt_equals_default_salt() {
        let empty = derive_key("phrase", Some(""), TextEncoding::Utf16Le).unwrap();
        let default = derive_key("phrase", Some(DEFAULT_SALT), TextEncoding::Utf16Le).unwrap();
        assert_eq!(empty.as_bytes(), default.as_bytes());
    }

    #[test]
    fn test_derive_key_with_configured_default_salt() {
        let config = CryptoConfig {
            default_salt: "site-pepper".to_string(),
            ..CryptoConfig::default()
        };
        let key = derive_key_with(&config, "phrase", None).unwrap();
        let expected = derive_key("phrase", Some("site-pepper"), config.encoding).unwrap();
        assert_eq!(key.as_bytes(), expected.as_bytes());
    }

    #[test]
    fn test_derive_key_with_argon2id() {
        let config = CryptoConfig {
            kdf: KdfScheme::Argon2id(fast_params()),
            ..CryptoConfig::default()
        };
        let key1 = derive_key_with(&config, "phrase", Some("salt")).unwrap();
        let key2 = derive_key_with(&config, "phrase", Some("salt")).unwrap();
        let legacy = derive_key("phrase", Some("salt"), config.encoding).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert_ne!(key1.as_bytes(), legacy.as_bytes());
        assert!(derive_key_with(&config, "", None).is_err());
    }

    #[test]
    fn test_stretched_different_salt() {
        let salt1 = Salt::from_bytes([1u8; 32]);
        let salt2 = Salt::from_bytes([2u8; 32]);

        let key1 = derive_key_stretched(b"password", &salt1, &fast_params()).unwrap();
        let key2 = derive_key_stretched(b"password", &salt2, &fast_params()).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_stretched_invalid_params() {
        let params = KdfParams {
            memory_cost: 1,
            time_cost: 0,
            parallelism: 0,
        };
        let result = derive_key_stretched(b"password", &Salt::generate(), &params);
        assert!(matches!(result, Err(Error::Crypto(_))));
    }

    #[test]
    fn test_verify_phrase() {
        let salt = Salt::from_bytes([99u8; 32]);
        let key = derive_key_stretched(b"secure-phrase", &salt, &fast_params()).unwrap();

        assert!(verify_phrase(b"secure-phrase", &salt, &fast_params(), &key).unwrap());
        assert!(!verify_phrase(b"wrong-phrase", &salt, &fast_params(), &key).unwrap());
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(KdfParams::preset("moderate").unwrap(), KdfParams::moderate());
        assert!(KdfParams::preset("extreme").is_err());
    }
}
