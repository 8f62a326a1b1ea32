//! Byte normalization shared by the snippet winnower and the HPSM generator.
//!
//! Only ASCII digits and letters count as content. Everything else, including
//! whitespace, punctuation and any byte outside `'0'..='z'`, is dropped so that
//! formatting changes do not move the fingerprint.

/// Map a source byte to its canonical content byte.
///
/// Digits and lowercase letters pass through unchanged, uppercase letters are
/// folded to lowercase. Every other byte returns `None`.
#[inline]
pub fn normalize(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' | b'a'..=b'z' => Some(byte),
        b'A'..=b'Z' => Some(byte + 32),
        _ => None,
    }
}
