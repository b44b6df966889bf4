//! Error taxonomy and display types shared by `secret-envelope` and the
//! layers that consume it (persistence, admin surfaces).

pub mod error;
pub mod protocol;

pub use error::SecretError;
