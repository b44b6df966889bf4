//! Common error types shared across crates.

use thiserror::Error;

/// Top-level error type for secret protection operations.
///
/// Only the write path and key resolution produce errors. Reads never fail;
/// undecryptable values are returned unchanged.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Key material is unusable (wrong length, not hex) or absent in production.
    /// Not retried; the dependent operation or startup path must stop.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The cipher failed while sealing a value. Callers must not fall back to
    /// storing the plaintext.
    #[error("encryption failure: {0}")]
    Encryption(String),
}

impl SecretError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            SecretError::Configuration(_) => "configuration_error",
            SecretError::Encryption(_) => "encryption_error",
        }
    }

    /// Returns `true` when the error must halt startup rather than a single call.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SecretError::Configuration(_))
    }
}
