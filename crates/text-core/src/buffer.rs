//! Immutable UTF-16 text buffers.
//!
//! A [`TextBuffer`] owns an ordered sequence of UTF-16 code units and never
//! changes after construction; every transformation returns a new buffer.
//! Internally the units sit behind an `Arc`, so `clone()` is cheap and
//! concurrent read-only access from multiple threads is safe, while
//! [`TextBuffer::copy`] produces an independently-owned buffer for callers
//! that want value semantics made explicit.
//!
//! A buffer is allowed to hold lone surrogates (they can be produced
//! deliberately via [`TextBuffer::from_codepoints`] or arrive in decoded
//! UTF-16 data); the operations that require well-formed data report
//! [`TextError::InvalidUtf16`] with the offending index instead of guessing.

use std::sync::Arc;

use crate::classify::{self, units_to_string_lossy};
use crate::error::TextError;

/// An immutable sequence of UTF-16 code units.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TextBuffer {
    units: Arc<[u16]>,
}

impl TextBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self { units: Arc::from([]) }
    }

    /// Creates a buffer from a string slice.
    pub fn from_str(text: &str) -> Self {
        let units: Vec<u16> = text.encode_utf16().collect();
        Self { units: units.into() }
    }

    /// Creates a buffer from raw UTF-16 code units. The units are taken as-is
    /// and may contain lone surrogates.
    pub fn from_units(units: Vec<u16>) -> Self {
        Self { units: units.into() }
    }

    /// Creates a buffer from a sequence of Unicode codepoints.
    ///
    /// Codepoints above U+FFFF are encoded as surrogate pairs. Surrogate
    /// code-point values (U+D800..=U+DFFF) are accepted and stored as single
    /// units, which allows deliberately ill-formed buffers to be built for
    /// repair and testing. Values above U+10FFFF are rejected.
    pub fn from_codepoints(codepoints: &[u32]) -> Result<Self, TextError> {
        let mut units = Vec::with_capacity(codepoints.len());
        for &codepoint in codepoints {
            if let Some((high, low)) = classify::pair_for_codepoint(codepoint) {
                units.push(high);
                units.push(low);
            } else if codepoint <= 0xFFFF {
                units.push(codepoint as u16);
            } else {
                return Err(TextError::InvalidCodepoint { codepoint });
            }
        }
        Ok(Self { units: units.into() })
    }

    /// Decodes UTF-8 bytes into a buffer.
    ///
    /// With `lossy = false`, the first invalid byte is reported via
    /// [`TextError::InvalidUtf8`] and no buffer is produced. With
    /// `lossy = true`, invalid sequences decode to U+FFFD.
    pub fn from_utf8(bytes: &[u8], lossy: bool) -> Result<Self, TextError> {
        if lossy {
            return Ok(Self::from_str(&String::from_utf8_lossy(bytes)));
        }
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Self::from_str(text)),
            Err(err) => Err(TextError::InvalidUtf8 { index: err.valid_up_to() + 1 }),
        }
    }

    /// The number of UTF-16 code units in the buffer.
    ///
    /// This counts storage units, not characters: a surrogate pair counts as
    /// two. See [`TextBuffer::character_count`] for codepoint and
    /// composed-character counting.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if the buffer holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The raw code units.
    pub fn units(&self) -> &[u16] {
        &self.units
    }

    /// Returns an independently-owned copy of this buffer.
    ///
    /// `clone()` shares storage (safe, since buffers are immutable); `copy()`
    /// duplicates it.
    pub fn copy(&self) -> Self {
        Self { units: self.units.to_vec().into() }
    }

    /// Concatenates two buffers into a new one.
    pub fn concat(&self, other: &TextBuffer) -> Self {
        let mut units = Vec::with_capacity(self.units.len() + other.units.len());
        units.extend_from_slice(&self.units);
        units.extend_from_slice(&other.units);
        Self { units: units.into() }
    }

    /// Decodes the buffer to a `String`, replacing lone surrogates with
    /// U+FFFD.
    pub fn to_string_lossy(&self) -> String {
        units_to_string_lossy(&self.units)
    }

    /// Decodes the buffer to a `String`, reporting the 1-based index of the
    /// first lone surrogate if the buffer is ill-formed.
    pub fn to_utf8_string(&self) -> Result<String, TextError> {
        let mut out = String::with_capacity(self.units.len());
        let mut consumed = 0;
        for decoded in char::decode_utf16(self.units.iter().copied()) {
            match decoded {
                Ok(ch) => {
                    out.push(ch);
                    consumed += ch.len_utf16();
                }
                Err(_) => return Err(TextError::InvalidUtf16 { index: consumed + 1 }),
            }
        }
        Ok(out)
    }

    /// Encodes the buffer as UTF-8 bytes; errors like
    /// [`TextBuffer::to_utf8_string`] on ill-formed data.
    pub fn to_utf8_bytes(&self) -> Result<Vec<u8>, TextError> {
        Ok(self.to_utf8_string()?.into_bytes())
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TextBuffer({:?})", self.to_string_lossy())
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_roundtrip() {
        for text in ["", "hello", "héllo wörld", "日本語", "a𝄞b👍🏽c"] {
            let buffer = TextBuffer::from_utf8(text.as_bytes(), false).unwrap();
            assert_eq!(buffer.to_utf8_string().unwrap(), text);
            assert_eq!(buffer.len(), text.encode_utf16().count());
        }
    }

    #[test]
    fn test_from_utf8_strict_rejects_invalid() {
        let err = TextBuffer::from_utf8(&[0x61, 0xFF, 0x62], false).unwrap_err();
        assert_eq!(err, TextError::InvalidUtf8 { index: 2 });
    }

    #[test]
    fn test_from_utf8_lossy_replaces() {
        let buffer = TextBuffer::from_utf8(&[0x61, 0xFF, 0x62], true).unwrap();
        assert_eq!(buffer.to_string_lossy(), "a\u{FFFD}b");
    }

    #[test]
    fn test_from_codepoints() {
        let buffer = TextBuffer::from_codepoints(&[0x41, 0x1F600, 0xD800]).unwrap();
        assert_eq!(buffer.units(), &[0x41, 0xD83D, 0xDE00, 0xD800]);
        assert_eq!(
            TextBuffer::from_codepoints(&[0x110000]),
            Err(TextError::InvalidCodepoint { codepoint: 0x110000 })
        );
    }

    #[test]
    fn test_to_utf8_string_reports_lone_surrogate() {
        let buffer = TextBuffer::from_units(vec![0x61, 0x62, 0xDC00, 0x63]);
        assert_eq!(
            buffer.to_utf8_string(),
            Err(TextError::InvalidUtf16 { index: 3 })
        );
    }

    #[test]
    fn test_copy_is_independent_and_equal() {
        let buffer = TextBuffer::from_str("copy me");
        let copy = buffer.copy();
        assert_eq!(buffer, copy);
        assert!(!Arc::ptr_eq(&buffer.units, &copy.units));
    }

    #[test]
    fn test_concat() {
        let a = TextBuffer::from_str("foo");
        let b = TextBuffer::from_str("𝄞bar");
        assert_eq!(a.concat(&b).to_string_lossy(), "foo𝄞bar");
    }
}
