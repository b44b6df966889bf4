//! Key resolution for envelope encryption.
//!
//! # Policy
//!
//! Evaluated in order on every [`KeySource::key`] call:
//!
//! 1. `STORE_ENCRYPTION_KEY` is set: it must be exactly 64 hex characters
//!    (32 bytes), otherwise resolution fails with [`KeyError`].
//! 2. Non-production mode: the key is the SHA-256 digest of `APP_SECRET`
//!    (or a built-in development default). A warning is logged once per process.
//! 3. Production mode with no explicit key: resolution fails. There is no
//!    safe default in production.
//!
//! # Security invariants
//!
//! - Key material is never written to disk, logged, or included in traces.
//! - [`KeyBytes`] zeroes its buffer when dropped.

pub mod provider;

pub use provider::{ExecutionMode, KeyProvider};

use common::SecretError;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Hex length of an explicitly configured key.
pub const KEY_HEX_LEN: usize = KEY_LEN * 2;

/// Errors produced while resolving key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The configured key is not exactly [`KEY_HEX_LEN`] characters long.
    #[error("STORE_ENCRYPTION_KEY must be {KEY_HEX_LEN} hex characters ({KEY_LEN} bytes), got {0} characters")]
    InvalidLength(usize),

    /// The configured key has the right length but is not valid hex.
    #[error("STORE_ENCRYPTION_KEY must contain only hexadecimal characters")]
    InvalidHex,

    /// Production mode is active and no explicit key is configured.
    #[error("STORE_ENCRYPTION_KEY is required in production")]
    MissingInProduction,
}

impl From<KeyError> for SecretError {
    fn from(err: KeyError) -> Self {
        SecretError::Configuration(err.to_string())
    }
}

/// Fixed-size buffer holding exactly [`KEY_LEN`] bytes of key material.
///
/// Memory is overwritten with zeroes on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyBytes(Box<[u8; KEY_LEN]>);

impl KeyBytes {
    /// Wrap raw key bytes. The caller's copy is zeroed.
    pub fn new(mut bytes: [u8; KEY_LEN]) -> Self {
        let key = Self(Box::new(bytes));
        bytes.zeroize();
        key
    }

    /// An all-zero buffer to be filled in place, so no key bytes live on the stack.
    pub(crate) fn zeroed() -> Self {
        Self(Box::new([0u8; KEY_LEN]))
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; KEY_LEN] {
        &mut self.0
    }
}

impl std::fmt::Debug for KeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyBytes([REDACTED])")
    }
}

/// Source of the symmetric key used for every envelope operation.
///
/// [`KeyProvider`] implements the environment policy. Other sources (a KMS,
/// a test fixture) can be plugged into [`crate::SecretCodec`] through this trait.
#[cfg_attr(test, mockall::automock)]
pub trait KeySource {
    /// Resolve the current key.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] when no usable key can be produced.
    fn key(&self) -> Result<KeyBytes, KeyError>;
}
