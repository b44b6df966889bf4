//! [`SecretCodec`]: the encrypt-on-write, lenient-decrypt-on-read entry point.
//!
//! Writes are strict: absent or empty input stays absent, anything else is
//! sealed or the call fails. Reads never fail: a value that is not a
//! decryptable envelope is returned exactly as stored.

use common::protocol::SecretView;
use common::SecretError;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::cipher::{self, CipherError};
use super::envelope::{is_encrypted, is_well_formed, Envelope};
use crate::config::Config;
use crate::key::{KeyError, KeyProvider, KeySource};
use crate::mask::mask;

/// Outcome of reading a stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// The value was a valid envelope and authenticated under the current key.
    Decrypted(String),
    /// The value is not envelope-shaped; it is legacy plaintext.
    Legacy(&'a str),
    /// The value is envelope-shaped but could not be opened (tag mismatch,
    /// wrong key, undecodable fields, non-UTF-8 plaintext, or no usable key).
    Unauthenticated(&'a str),
}

impl Decoded<'_> {
    /// Returns `true` for [`Decoded::Decrypted`].
    pub fn is_decrypted(&self) -> bool {
        matches!(self, Decoded::Decrypted(_))
    }

    /// The value to hand back to the caller: the plaintext when decrypted,
    /// otherwise the stored string unchanged.
    pub fn into_plaintext(self) -> String {
        match self {
            Decoded::Decrypted(plaintext) => plaintext,
            Decoded::Legacy(stored) | Decoded::Unauthenticated(stored) => stored.to_owned(),
        }
    }
}

/// Reasons a well-formed envelope could not be opened.
#[derive(Debug, Error)]
enum OpenError {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error("decrypted value is not valid UTF-8")]
    Utf8,
}

/// Encrypts and decrypts secret strings for storage.
///
/// Stateless apart from the key source; safe to share across threads.
#[derive(Debug, Clone)]
pub struct SecretCodec<K = KeyProvider> {
    keys: K,
}

impl SecretCodec<KeyProvider> {
    /// Build a codec from loaded configuration, resolving the key once so a
    /// misconfigured deployment fails at startup instead of on first write.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::Configuration`] if no usable key can be resolved.
    pub fn from_config(cfg: &Config) -> Result<Self, SecretError> {
        let provider = cfg.key_provider();
        provider.key()?;
        info!(
            explicit_key = provider.has_explicit_key(),
            production = provider.mode().is_production(),
            "secret codec initialised"
        );
        Ok(Self::new(provider))
    }
}

impl<K: KeySource> SecretCodec<K> {
    /// Create a codec over any [`KeySource`].
    pub fn new(keys: K) -> Self {
        Self { keys }
    }

    /// Seal `plaintext` into an envelope string.
    ///
    /// Absent or empty input returns `Ok(None)`: empty secrets are stored as
    /// absent, never as an encrypted empty string.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::Configuration`] if the key cannot be resolved and
    /// [`SecretError::Encryption`] if the cipher fails. The caller must not
    /// store the plaintext instead.
    pub fn encrypt(&self, plaintext: Option<&str>) -> Result<Option<String>, SecretError> {
        let Some(plaintext) = plaintext.filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        let key = self.keys.key()?;
        let envelope = cipher::seal(plaintext.as_bytes(), &key)?;
        Ok(Some(envelope.to_string()))
    }

    /// Recover the plaintext of a stored value.
    ///
    /// Absent or empty input returns `None`. Anything that cannot be decrypted
    /// is returned unchanged; this never fails.
    pub fn decrypt(&self, stored: Option<&str>) -> Option<String> {
        let stored = stored.filter(|s| !s.is_empty())?;
        Some(self.decode(stored).into_plaintext())
    }

    /// Classify and, where possible, decrypt a stored value.
    pub fn decode<'a>(&self, stored: &'a str) -> Decoded<'a> {
        if !is_well_formed(stored) {
            debug!("stored value is not an envelope; treating as legacy plaintext");
            return Decoded::Legacy(stored);
        }
        match self.open(stored) {
            Ok(plaintext) => Decoded::Decrypted(plaintext),
            Err(e) => {
                warn!(error = %e, "envelope could not be opened; returning stored value unchanged");
                Decoded::Unauthenticated(stored)
            }
        }
    }

    /// Encrypt a legacy plaintext value so it can be written back.
    ///
    /// Returns `Ok(None)` for absent or empty values and for anything already
    /// envelope-shaped, including envelopes that fail authentication.
    ///
    /// # Errors
    ///
    /// Same as [`SecretCodec::encrypt`].
    pub fn reseal_legacy(&self, stored: Option<&str>) -> Result<Option<String>, SecretError> {
        match stored {
            Some(value) if !value.is_empty() && !is_well_formed(value) => self.encrypt(Some(value)),
            _ => Ok(None),
        }
    }

    /// Display-safe view of a stored value for admin surfaces.
    ///
    /// The mask is computed over the plaintext when the value decrypts, and
    /// over the stored text otherwise.
    pub fn view(&self, stored: Option<&str>) -> SecretView {
        let masked = match stored.filter(|s| !s.is_empty()) {
            Some(value) => mask(Some(&self.decode(value).into_plaintext())),
            None => mask(None),
        };
        SecretView {
            masked,
            encrypted: is_encrypted(stored),
        }
    }

    fn open(&self, stored: &str) -> Result<String, OpenError> {
        let envelope: Envelope = stored.parse()?;
        let key = self.keys.key()?;
        let plaintext = cipher::open(&envelope, &key)?;
        String::from_utf8(plaintext).map_err(|_| OpenError::Utf8)
    }
}
