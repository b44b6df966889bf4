//! Display-safe partial redaction of secrets.
//!
//! Masking never touches key material and is a pure function of its input.

pub mod redact;

pub use redact::redact_fields;

/// Placeholder returned for absent, empty, or short values.
pub const MASK: &str = "***";

/// Values of this many characters or fewer are masked entirely.
pub const MIN_REVEAL_LEN: usize = 6;

const PREFIX_CHARS: usize = 4;
const SUFFIX_CHARS: usize = 1;

/// Mask a secret for display: `sk_live_abc123xyz` becomes `sk_l***z`.
///
/// Absent, empty, and short (≤ [`MIN_REVEAL_LEN`] characters) values become
/// [`MASK`]. Lengths are counted in characters, not bytes.
pub fn mask(value: Option<&str>) -> String {
    let Some(value) = value else {
        return MASK.to_owned();
    };
    let len = value.chars().count();
    if len <= MIN_REVEAL_LEN {
        return MASK.to_owned();
    }
    let prefix: String = value.chars().take(PREFIX_CHARS).collect();
    let suffix: String = value.chars().skip(len - SUFFIX_CHARS).collect();
    format!("{prefix}{MASK}{suffix}")
}
