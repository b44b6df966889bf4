//! AES-256-GCM seal and open over a 128-bit IV with a detached 128-bit tag.
//!
//! **Nonce policy:** every [`seal`] draws a fresh random IV from the OS CSPRNG.
//! GCM IV reuse under one key breaks both confidentiality and authentication,
//! so callers must never supply their own IV.

use aes_gcm::{
    aead::{consts::U16, rand_core::RngCore, AeadInPlace, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Nonce, Tag,
};
use common::SecretError;
use thiserror::Error;

use super::envelope::{Envelope, IV_LEN, TAG_LEN};
use crate::key::{KeyBytes, KEY_LEN};

/// AES-256-GCM with a 16-byte IV.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// AES-GCM encryption or decryption failed.
    #[error("aead operation failed")]
    AeadFailure,

    /// The envelope string does not match the expected format.
    #[error("invalid envelope format")]
    InvalidFormat,
}

impl From<CipherError> for SecretError {
    fn from(err: CipherError) -> Self {
        SecretError::Encryption(err.to_string())
    }
}

/// Encrypt `plaintext` under `key` with a fresh random IV.
///
/// # Errors
///
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error (should be
/// unreachable with a valid key).
pub fn seal(plaintext: &[u8], key: &KeyBytes) -> Result<Envelope, CipherError> {
    let cipher = build_cipher(key)?;

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
        .map_err(|_| CipherError::AeadFailure)?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);

    Ok(Envelope {
        iv,
        tag: tag_bytes,
        ciphertext: buffer,
    })
}

/// Decrypt and authenticate an [`Envelope`].
///
/// # Errors
///
/// Returns [`CipherError::AeadFailure`] if authentication fails (wrong key,
/// tampered tag or ciphertext).
pub fn open(envelope: &Envelope, key: &KeyBytes) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;
    let mut buffer = envelope.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            Nonce::<U16>::from_slice(&envelope.iv),
            b"",
            &mut buffer,
            Tag::<U16>::from_slice(&envelope.tag),
        )
        .map_err(|_| CipherError::AeadFailure)?;
    Ok(buffer)
}

fn build_cipher(key: &KeyBytes) -> Result<Aes256Gcm16, CipherError> {
    Aes256Gcm16::new_from_slice(key.as_bytes()).map_err(|_| CipherError::InvalidKeyLength)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_key() -> KeyBytes {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        KeyBytes::new(key)
    }

    #[test]
    fn seal_open_round_trip() {
        let key = random_key();
        let envelope = seal(b"sk_live_abc123xyz", &key).unwrap();
        assert_eq!(open(&envelope, &key).unwrap(), b"sk_live_abc123xyz");
    }

    #[test]
    fn ciphertext_length_matches_plaintext() {
        let key = random_key();
        let envelope = seal(b"twelve bytes", &key).unwrap();
        assert_eq!(envelope.ciphertext.len(), 12);
    }

    #[test]
    fn iv_is_fresh_per_seal() {
        let key = random_key();
        let a = seal(b"same", &key).unwrap();
        let b = seal(b"same", &key).unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails_open() {
        let envelope = seal(b"secret", &random_key()).unwrap();
        assert_eq!(open(&envelope, &random_key()), Err(CipherError::AeadFailure));
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let key = random_key();
        let mut envelope = seal(b"tamper me", &key).unwrap();
        envelope.ciphertext[0] ^= 0xFF;
        assert_eq!(open(&envelope, &key), Err(CipherError::AeadFailure));
    }

    #[test]
    fn tampered_tag_fails_auth() {
        let key = random_key();
        let mut envelope = seal(b"tamper me", &key).unwrap();
        envelope.tag[TAG_LEN - 1] ^= 0x01;
        assert_eq!(open(&envelope, &key), Err(CipherError::AeadFailure));
    }

    #[test]
    fn cipher_error_maps_to_encryption_error() {
        let err: SecretError = CipherError::AeadFailure.into();
        assert_eq!(err.code(), "encryption_error");
        assert!(!err.is_fatal());
    }
}
