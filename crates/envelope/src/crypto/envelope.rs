//! The [`Envelope`] type and the structural check that separates envelopes
//! from legacy plaintext.

use std::fmt;
use std::str::FromStr;

use super::cipher::CipherError;

/// Byte length of the per-envelope IV (128 bits).
pub const IV_LEN: usize = 16;

/// Byte length of the GCM authentication tag (128 bits).
pub const TAG_LEN: usize = 16;

/// Hex length of the IV field.
pub const IV_HEX_LEN: usize = IV_LEN * 2;

/// Hex length of the tag field.
pub const TAG_HEX_LEN: usize = TAG_LEN * 2;

/// Field separator.
pub const SEPARATOR: char = ':';

/// A parsed envelope.
///
/// The string representation is `<hex(iv)>:<hex(tag)>:<hex(ciphertext)>`,
/// lower-case on output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw IV bytes.
    pub iv: [u8; IV_LEN],
    /// Raw authentication tag bytes.
    pub tag: [u8; TAG_LEN],
    /// Raw ciphertext bytes, without the tag.
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            hex::encode(self.iv),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext),
        )
    }
}

impl FromStr for Envelope {
    type Err = CipherError;

    /// Parse an envelope string.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidFormat`] if the string fails
    /// [`is_well_formed`] or a field does not decode to whole bytes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (iv_hex, tag_hex, ciphertext_hex) = split_fields(s).ok_or(CipherError::InvalidFormat)?;

        let mut iv = [0u8; IV_LEN];
        hex::decode_to_slice(iv_hex, &mut iv).map_err(|_| CipherError::InvalidFormat)?;
        let mut tag = [0u8; TAG_LEN];
        hex::decode_to_slice(tag_hex, &mut tag).map_err(|_| CipherError::InvalidFormat)?;
        let ciphertext = hex::decode(ciphertext_hex).map_err(|_| CipherError::InvalidFormat)?;

        Ok(Self { iv, tag, ciphertext })
    }
}

/// Structural check: exactly three `:`-separated fields, the first two of the
/// fixed hex lengths, all three non-empty hex.
///
/// Does not decrypt and does not verify the tag; a well-formed string can
/// still fail authentication.
pub fn is_well_formed(text: &str) -> bool {
    split_fields(text).is_some()
}

/// [`is_well_formed`] over an optional stored value. Absent values are not
/// encrypted.
pub fn is_encrypted(stored: Option<&str>) -> bool {
    stored.is_some_and(is_well_formed)
}

fn split_fields(text: &str) -> Option<(&str, &str, &str)> {
    let mut fields = text.split(SEPARATOR);
    let iv = fields.next()?;
    let tag = fields.next()?;
    let ciphertext = fields.next()?;
    if fields.next().is_some() {
        return None;
    }
    if iv.len() != IV_HEX_LEN || tag.len() != TAG_HEX_LEN {
        return None;
    }
    if ![iv, tag, ciphertext].iter().all(|f| is_hex(f)) {
        return None;
    }
    Some((iv, tag, ciphertext))
}

fn is_hex(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_hexdigit())
}
