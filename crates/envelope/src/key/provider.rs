//! [`KeyProvider`]: the environment-driven key policy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sha2::digest::generic_array::GenericArray;
use sha2::{Digest, Sha256};
use tracing::warn;

use super::{KeyBytes, KeyError, KeySource, KEY_HEX_LEN};

/// Fallback secret hashed into a key when neither `STORE_ENCRYPTION_KEY` nor
/// `APP_SECRET` is configured outside production.
pub const DEVELOPMENT_FALLBACK_SECRET: &str = "secret-envelope-development-only";

/// Execution mode, used to choose between key derivation and a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// No safe default key exists; an explicit key is mandatory.
    Production,
    /// Anything else. A derived key is acceptable (with a warning).
    Development,
}

impl ExecutionMode {
    /// Interpret an `APP_ENV` value. Only `production` (any case) selects
    /// [`ExecutionMode::Production`].
    pub fn from_app_env(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            ExecutionMode::Production
        } else {
            ExecutionMode::Development
        }
    }

    /// Returns `true` for [`ExecutionMode::Production`].
    pub fn is_production(self) -> bool {
        self == ExecutionMode::Production
    }
}

/// Resolves the envelope key from configured values.
///
/// The policy is re-evaluated on every call; nothing is cached. The
/// insecure-derivation warning is emitted once per provider, shared by clones.
#[derive(Clone)]
pub struct KeyProvider {
    explicit_key: Option<String>,
    fallback_secret: Option<String>,
    mode: ExecutionMode,
    derived_key_warned: Arc<AtomicBool>,
}

impl KeyProvider {
    /// Create a provider. Empty or whitespace-only values count as absent.
    pub fn new(
        explicit_key: Option<String>,
        fallback_secret: Option<String>,
        mode: ExecutionMode,
    ) -> Self {
        Self {
            explicit_key: non_blank(explicit_key),
            fallback_secret: non_blank(fallback_secret),
            mode,
            derived_key_warned: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The execution mode this provider was built for.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Returns `true` if an explicit key is configured.
    pub fn has_explicit_key(&self) -> bool {
        self.explicit_key.is_some()
    }
}

impl KeySource for KeyProvider {
    fn key(&self) -> Result<KeyBytes, KeyError> {
        if let Some(hex_key) = &self.explicit_key {
            return parse_hex_key(hex_key);
        }
        if self.mode.is_production() {
            return Err(KeyError::MissingInProduction);
        }

        let (secret, source) = match self.fallback_secret.as_deref() {
            Some(secret) => (secret, "APP_SECRET"),
            None => (DEVELOPMENT_FALLBACK_SECRET, "the built-in development secret"),
        };
        if !self.derived_key_warned.swap(true, Ordering::Relaxed) {
            warn!(
                "STORE_ENCRYPTION_KEY is not set; deriving the secret store key from {source}. \
                 This is insecure and must not be used in production"
            );
        }
        Ok(derive_key(secret))
    }
}

impl std::fmt::Debug for KeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyProvider")
            .field("explicit_key", &self.explicit_key.as_ref().map(|_| "[REDACTED]"))
            .field("fallback_secret", &self.fallback_secret.as_ref().map(|_| "[REDACTED]"))
            .field("mode", &self.mode)
            .finish()
    }
}

/// Decode an explicitly configured key. Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`KeyError::InvalidLength`] unless the value is exactly
/// [`KEY_HEX_LEN`] characters, and [`KeyError::InvalidHex`] if it is not hex.
pub fn parse_hex_key(value: &str) -> Result<KeyBytes, KeyError> {
    let value = value.trim();
    if value.len() != KEY_HEX_LEN {
        return Err(KeyError::InvalidLength(value.chars().count()));
    }
    let mut key = KeyBytes::zeroed();
    hex::decode_to_slice(value, &mut key.as_mut_bytes()[..]).map_err(|_| KeyError::InvalidHex)?;
    Ok(key)
}

/// SHA-256 of the fallback secret, written straight into the key buffer.
fn derive_key(secret: &str) -> KeyBytes {
    let mut key = KeyBytes::zeroed();
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize_into(GenericArray::from_mut_slice(&mut key.as_mut_bytes()[..]));
    key
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
