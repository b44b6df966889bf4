//! `secret-envelope`: protects third-party credentials at rest.
//!
//! Plaintext secrets are sealed into a self-describing text envelope
//! (`IV_HEX:TAG_HEX:CIPHERTEXT_HEX`, AES-256-GCM) suitable for an opaque text
//! column. Reads are lenient: anything that is not a decryptable envelope is
//! returned unchanged, so values stored before encryption was introduced keep
//! working.
//!
//! ```no_run
//! use secret_envelope::{config::Config, SecretCodec};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::from_env()?;
//! let codec = SecretCodec::from_config(&cfg)?;
//!
//! let stored = codec.encrypt(Some("sk_live_abc123xyz"))?;
//! assert_eq!(codec.decrypt(stored.as_deref()).as_deref(), Some("sk_live_abc123xyz"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod key;
pub mod mask;
pub mod telemetry;

pub use common::SecretError;
pub use crypto::codec::{Decoded, SecretCodec};
pub use crypto::envelope::is_encrypted;
pub use key::{KeyProvider, KeySource};
pub use mask::mask;
