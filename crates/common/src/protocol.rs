//! Serialisable types handed to display and admin surfaces.
//!
//! None of these types ever carry plaintext secrets or key material.

use serde::{Deserialize, Serialize};

use crate::error::SecretError;

// ---------------------------------------------------------------------------
// Secret display
// ---------------------------------------------------------------------------

/// Display-safe description of a stored secret value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretView {
    /// Partially redacted form of the secret, safe to show to a human.
    pub masked: String,
    /// Whether the stored value is a well-formed encrypted envelope.
    pub encrypted: bool,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error body for surfaces that report a failed write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"encryption_error"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&SecretError> for ErrorResponse {
    fn from(err: &SecretError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}
