//! Stateless entry points for symmetric encryption.
//!
//! Every function validates its inputs before touching a cipher, dispatches
//! on the algorithm once, and returns either a complete result or an error.
//! Nothing is cached between calls.

use zeroize::Zeroizing;

use sealkit_common::util::{base64_decode, base64_encode};
use sealkit_common::{Error, Result, TextEncoding};

use crate::algorithm::SymmetricAlgorithm;
use crate::config::CryptoConfig;
use crate::kdf::derive_key_with;
use crate::{aead, cbc};

/// Encrypt `plaintext` with `key`, returning the envelope bytes.
///
/// # Errors
/// - `Unsupported` for [`SymmetricAlgorithm::None`]
/// - `InvalidInput` for empty plaintext or an unusable key
pub fn encrypt(algorithm: SymmetricAlgorithm, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    match algorithm {
        SymmetricAlgorithm::Aes256 => cbc::encrypt(key, plaintext),
        SymmetricAlgorithm::Aes256Gcm => aead::encrypt(key, plaintext),
        SymmetricAlgorithm::None => Err(Error::unsupported("encrypt", algorithm)),
    }
}

/// Decrypt envelope bytes with `key`.
///
/// # Errors
/// - `Unsupported` for [`SymmetricAlgorithm::None`]
/// - `InvalidInput` for an empty envelope or unusable key
/// - `MalformedEnvelope` for an envelope too short to hold its IV or nonce
/// - `DecryptionFailed` when the cipher rejects the envelope
pub fn decrypt(algorithm: SymmetricAlgorithm, envelope: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    match algorithm {
        SymmetricAlgorithm::Aes256 => cbc::decrypt(key, envelope),
        SymmetricAlgorithm::Aes256Gcm => aead::decrypt(key, envelope),
        SymmetricAlgorithm::None => Err(Error::unsupported("decrypt", algorithm)),
    }
}

/// Encrypt `plaintext` text and return the envelope as base64.
pub fn encrypt_text(
    algorithm: SymmetricAlgorithm,
    plaintext: &str,
    key: &[u8],
    encoding: TextEncoding,
) -> Result<String> {
    if algorithm == SymmetricAlgorithm::None {
        return Err(Error::unsupported("encrypt", algorithm));
    }
    if plaintext.is_empty() {
        return Err(Error::InvalidInput("Plaintext cannot be empty".to_string()));
    }
    let bytes = Zeroizing::new(encoding.encode(plaintext));
    let envelope = encrypt(algorithm, &bytes, key)?;
    Ok(base64_encode(&envelope))
}

/// Decrypt a base64 envelope and decode the plaintext with `encoding`.
///
/// Undecodable plaintext is not an error: it comes back with U+FFFD in place
/// of the bad units, the same as any other CBC garbage.
///
/// # Errors
/// - `Format` if `envelope` is not valid base64
/// - everything [`decrypt`] returns
pub fn decrypt_text(
    algorithm: SymmetricAlgorithm,
    envelope: &str,
    key: &[u8],
    encoding: TextEncoding,
) -> Result<String> {
    if algorithm == SymmetricAlgorithm::None {
        return Err(Error::unsupported("decrypt", algorithm));
    }
    let envelope = base64_decode(envelope)?;
    let plaintext = Zeroizing::new(decrypt(algorithm, &envelope, key)?);
    Ok(encoding.decode_lossy(&plaintext))
}

/// Derive a key from `phrase` and `salt`, then encrypt `plaintext` text.
///
/// The salt is not stored in the envelope; the same salt must be supplied to
/// [`decrypt_with_phrase`].
pub fn encrypt_with_phrase(
    config: &CryptoConfig,
    algorithm: SymmetricAlgorithm,
    plaintext: &str,
    phrase: &str,
    salt: Option<&str>,
) -> Result<String> {
    if algorithm == SymmetricAlgorithm::None {
        return Err(Error::unsupported("encrypt", algorithm));
    }
    let key = derive_key_with(config, phrase, salt)?;
    encrypt_text(algorithm, plaintext, key.as_bytes(), config.encoding)
}

/// Derive a key from `phrase` and `salt`, then decrypt a base64 envelope.
pub fn decrypt_with_phrase(
    config: &CryptoConfig,
    algorithm: SymmetricAlgorithm,
    envelope: &str,
    phrase: &str,
    salt: Option<&str>,
) -> Result<String> {
    if algorithm == SymmetricAlgorithm::None {
        return Err(Error::unsupported("decrypt", algorithm));
    }
    let key = derive_key_with(config, phrase, salt)?;
    decrypt_text(algorithm, envelope, key.as_bytes(), config.encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbc::{padded_len, IV_SIZE};
    use crate::digest::sha256;
    use crate::kdf::{derive_key, KdfParams, KdfScheme};
    use proptest::prelude::*;

    fn hello_world_key() -> [u8; 32] {
        sha256(b"helloworld").unwrap()
    }

    #[test]
    fn test_attack_at_dawn() {
        let key = hello_world_key();
        let envelope =
            encrypt_text(SymmetricAlgorithm::Aes256, "attack at dawn", &key, TextEncoding::Utf8)
                .unwrap();
        let plaintext =
            decrypt_text(SymmetricAlgorithm::Aes256, &envelope, &key, TextEncoding::Utf8).unwrap();
        assert_eq!(plaintext, "attack at dawn");
    }

    #[test]
    fn test_text_default_encoding_roundtrip() {
        let key = hello_world_key();
        let enc = TextEncoding::default();
        let envelope = encrypt_text(SymmetricAlgorithm::Aes256, "héllo wörld", &key, enc).unwrap();

        // 11 chars as UTF-16LE = 22 bytes, padded to 32
        assert_eq!(base64_decode(&envelope).unwrap().len(), IV_SIZE + 32);
        assert_eq!(
            decrypt_text(SymmetricAlgorithm::Aes256, &envelope, &key, enc).unwrap(),
            "héllo wörld"
        );
    }

    #[test]
    fn test_phrase_roundtrip() {
        let config = CryptoConfig::default();
        let envelope = encrypt_with_phrase(
            &config,
            SymmetricAlgorithm::Aes256,
            "attack at dawn",
            "hello",
            Some("world"),
        )
        .unwrap();

        let plaintext = decrypt_with_phrase(
            &config,
            SymmetricAlgorithm::Aes256,
            &envelope,
            "hello",
            Some("world"),
        )
        .unwrap();
        assert_eq!(plaintext, "attack at dawn");

        // Phrase path and explicit derived key are interchangeable.
        let key = derive_key("hello", Some("world"), config.encoding).unwrap();
        let direct =
            decrypt_text(SymmetricAlgorithm::Aes256, &envelope, key.as_bytes(), config.encoding)
                .unwrap();
        assert_eq!(direct, "attack at dawn");
    }

    #[test]
    fn test_phrase_wrong_salt_never_matches() {
        let config = CryptoConfig::default();
        let envelope = encrypt_with_phrase(
            &config,
            SymmetricAlgorithm::Aes256,
            "attack at dawn",
            "hello",
            Some("world"),
        )
        .unwrap();

        let result = decrypt_with_phrase(
            &config,
            SymmetricAlgorithm::Aes256,
            &envelope,
            "hello",
            Some("mars"),
        );
        match result {
            Ok(text) => assert_ne!(text, "attack at dawn"),
            Err(e) => assert!(matches!(e, Error::DecryptionFailed)),
        }
    }

    #[test]
    fn test_phrase_default_salt() {
        let config = CryptoConfig::default();
        let envelope =
            encrypt_with_phrase(&config, SymmetricAlgorithm::Aes256, "msg", "phrase", None)
                .unwrap();
        let plaintext = decrypt_with_phrase(
            &config,
            SymmetricAlgorithm::Aes256,
            &envelope,
            "phrase",
            Some(crate::kdf::DEFAULT_SALT),
        )
        .unwrap();
        assert_eq!(plaintext, "msg");
    }

    #[test]
    fn test_phrase_argon2id_with_gcm() {
        let config = CryptoConfig {
            kdf: KdfScheme::Argon2id(KdfParams {
                memory_cost: 1024,
                time_cost: 1,
                parallelism: 1,
            }),
            ..CryptoConfig::default()
        };
        let envelope =
            encrypt_with_phrase(&config, SymmetricAlgorithm::Aes256Gcm, "v2", "phrase", None)
                .unwrap();
        let plaintext =
            decrypt_with_phrase(&config, SymmetricAlgorithm::Aes256Gcm, &envelope, "phrase", None)
                .unwrap();
        assert_eq!(plaintext, "v2");

        let wrong =
            decrypt_with_phrase(&config, SymmetricAlgorithm::Aes256Gcm, &envelope, "other", None);
        assert!(matches!(wrong, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_none_algorithm_unsupported() {
        let key = hello_world_key();
        let config = CryptoConfig::default();

        let errors = [
            encrypt(SymmetricAlgorithm::None, b"data", &key).unwrap_err(),
            decrypt(SymmetricAlgorithm::None, &[0u8; 32], &key).unwrap_err(),
            encrypt_text(SymmetricAlgorithm::None, "data", &key, TextEncoding::Utf8).unwrap_err(),
            decrypt_text(SymmetricAlgorithm::None, "AAAA", &key, TextEncoding::Utf8).unwrap_err(),
            encrypt_with_phrase(&config, SymmetricAlgorithm::None, "d", "p", None).unwrap_err(),
            decrypt_with_phrase(&config, SymmetricAlgorithm::None, "AAAA", "p", None).unwrap_err(),
        ];
        for err in errors {
            assert!(matches!(err, Error::Unsupported { .. }));
            assert!(err.to_string().contains("None"));
        }
    }

    #[test]
    fn test_empty_plaintext_rejected() {
        let key = hello_world_key();
        assert!(matches!(
            encrypt(SymmetricAlgorithm::Aes256, b"", &key),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            encrypt_text(SymmetricAlgorithm::Aes256, "", &key, TextEncoding::Utf16Le),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_tampered_text_decrypts_to_garbage() {
        let key = hello_world_key();
        let enc = TextEncoding::Utf16Le;
        let envelope = encrypt_text(SymmetricAlgorithm::Aes256, "ab", &key, enc).unwrap();

        // Turn the first UTF-16 unit into a lone surrogate via the IV.
        let mut raw = base64_decode(&envelope).unwrap();
        raw[1] ^= 0xD8;
        let tampered = base64_encode(&raw);

        let text = decrypt_text(SymmetricAlgorithm::Aes256, &tampered, &key, enc).unwrap();
        assert_eq!(text, "\u{FFFD}b");
    }

    #[test]
    fn test_exact_iv_envelope_is_malformed() {
        // Envelope length is checked before the key, so any key gives the same error.
        for key in [&[][..], &[7u8; 20][..], &hello_world_key()[..]] {
            let result = decrypt(SymmetricAlgorithm::Aes256, &[0u8; IV_SIZE], key);
            assert!(matches!(result, Err(Error::MalformedEnvelope(_))));
        }
    }

    #[test]
    fn test_bad_base64_is_format_error() {
        let key = hello_world_key();
        let result =
            decrypt_text(SymmetricAlgorithm::Aes256, "%%% not base64", &key, TextEncoding::Utf8);
        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn test_concurrent_calls() {
        let key = hello_world_key();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let message = format!("message {}", i);
                    let envelope =
                        encrypt(SymmetricAlgorithm::Aes256, message.as_bytes(), &key).unwrap();
                    let plaintext = decrypt(SymmetricAlgorithm::Aes256, &envelope, &key).unwrap();
                    assert_eq!(plaintext, message.as_bytes());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            plaintext in proptest::collection::vec(any::<u8>(), 1..512),
            key in prop_oneof![
                proptest::collection::vec(any::<u8>(), 16),
                proptest::collection::vec(any::<u8>(), 24),
                proptest::collection::vec(any::<u8>(), 32),
            ],
        ) {
            let envelope = encrypt(SymmetricAlgorithm::Aes256, &plaintext, &key).unwrap();
            prop_assert_eq!(envelope.len(), IV_SIZE + padded_len(plaintext.len()));
            prop_assert!(envelope.len() > IV_SIZE);
            let decrypted = decrypt(SymmetricAlgorithm::Aes256, &envelope, &key).unwrap();
            prop_assert_eq!(decrypted, plaintext);
        }

        #[test]
        fn prop_gcm_roundtrip(
            plaintext in proptest::collection::vec(any::<u8>(), 1..512),
            key in proptest::collection::vec(any::<u8>(), 32),
        ) {
            let envelope = encrypt(SymmetricAlgorithm::Aes256Gcm, &plaintext, &key).unwrap();
            let decrypted = decrypt(SymmetricAlgorithm::Aes256Gcm, &envelope, &key).unwrap();
            prop_assert_eq!(decrypted, plaintext);
        }

        #[test]
        fn prop_phrase_roundtrip(
            text in "\\PC{1,64}",
            phrase in "\\PC{1,32}",
            salt in "\\PC{0,16}",
        ) {
            let config = CryptoConfig::default();
            let envelope = encrypt_with_phrase(
                &config, SymmetricAlgorithm::Aes256, &text, &phrase, Some(salt.as_str()),
            ).unwrap();
            let decrypted = decrypt_with_phrase(
                &config, SymmetricAlgorithm::Aes256, &envelope, &phrase, Some(salt.as_str()),
            ).unwrap();
            prop_assert_eq!(decrypted, text);
        }
    }
}
