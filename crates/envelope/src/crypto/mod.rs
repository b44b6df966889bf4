//! AES-256-GCM envelope encryption for secrets at rest.
//!
//! # Envelope format
//!
//! ```text
//! <hex(iv)>:<hex(tag)>:<hex(ciphertext)>
//! ```
//!
//! - `iv`: 16 random bytes, fresh for every seal.
//! - `tag`: 16-byte GCM authentication tag.
//! - `ciphertext`: same length as the UTF-8 plaintext (GCM is a CTR-class mode).
//!
//! Anything that does not match this shape is legacy plaintext.

pub mod cipher;
pub mod codec;
pub mod envelope;

pub use envelope::{is_encrypted, is_well_formed, Envelope};
