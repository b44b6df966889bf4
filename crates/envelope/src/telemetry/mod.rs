//! Structured logging setup.
//!
//! # Telemetry invariants
//!
//! - **No plaintext secrets, envelopes, or key material** may appear in any
//!   log field. Use [`crate::mask`] when a secret must be referenced.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   overrides it when set.

pub mod init;

pub use init::init;
