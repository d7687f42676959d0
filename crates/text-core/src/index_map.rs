//! Byte ↔ UTF-16 index correspondence.
//!
//! The regex engine searches UTF-8 text with byte offsets, while buffers and
//! the public character operations speak UTF-16 code units. A [`ByteUnitMap`]
//! records, for every UTF-16 unit of a text, the byte offset at which that
//! unit begins in the UTF-8 rendition of the same text: one byte for
//! U+0000..=U+007F, two for U+0080..=U+07FF, three for the rest of the BMP,
//! and four per astral codepoint with +2 credited to each surrogate half. A
//! lone surrogate is credited three bytes, the width of the U+FFFD it renders
//! as, so the map always agrees with the string the engine actually searches.
//!
//! The map is strictly increasing, starts at 0, carries one entry per unit
//! plus a trailing sentinel equal to the byte length, and is built once per
//! byte-oriented match or substitution call; it is never persisted on a
//! buffer.
//!
//! Byte-to-unit resolution snaps forward: a byte offset that lands inside a
//! character resolves to the next mapped offset, never backward. This is a
//! deliberate lossy adjustment and applies to range starts and ends alike.
//!
//! This module also hosts the 1-based, inclusive, negative-from-end index
//! resolution helpers used by every public operation.

use crate::error::TextError;

/// Correspondence table between UTF-16 unit offsets and UTF-8 byte offsets.
#[derive(Debug, Clone)]
pub struct ByteUnitMap {
    /// `unit_to_byte[k]` = byte offset where unit `k` begins; the final entry
    /// is the total byte length.
    unit_to_byte: Vec<usize>,
}

impl ByteUnitMap {
    /// Builds the map for `text` in a single pass over its characters.
    pub fn new(text: &str) -> Self {
        let mut unit_to_byte = Vec::with_capacity(text.len() + 1);
        for (byte, ch) in text.char_indices() {
            unit_to_byte.push(byte);
            if ch.len_utf16() == 2 {
                unit_to_byte.push(byte + 2);
            }
        }
        unit_to_byte.push(text.len());
        Self { unit_to_byte }
    }

    /// Number of UTF-16 units covered by the map.
    pub fn unit_count(&self) -> usize {
        self.unit_to_byte.len() - 1
    }

    /// Total byte length of the mapped text.
    pub fn byte_len(&self) -> usize {
        self.unit_to_byte.last().copied().unwrap_or(0)
    }

    /// Byte offset at which unit `unit` begins. `unit` may be the one-past-end
    /// position, which maps to the byte length.
    pub fn byte_at(&self, unit: usize) -> usize {
        self.unit_to_byte.get(unit).copied().unwrap_or_else(|| self.byte_len())
    }

    /// Smallest unit offset whose byte offset is `>= byte` (forward snap).
    pub fn unit_ceil(&self, byte: usize) -> usize {
        let clamped = byte.min(self.byte_len());
        match self.unit_to_byte.binary_search(&clamped) {
            Ok(unit) | Err(unit) => unit,
        }
    }
}

/// Resolves a 1-based, possibly negative index against `len`.
///
/// Negative values count back from the end (`-1` is the last position). The
/// resolved value must land in `[1, len]`; anything else is an argument
/// error, reported before any work is done.
pub(crate) fn resolve_index(index: i64, len: usize) -> Result<usize, TextError> {
    let resolved = if index < 0 { len as i64 + index + 1 } else { index };
    if resolved < 1 || resolved > len as i64 {
        return Err(TextError::IndexOutOfRange { index, len });
    }
    Ok(resolved as usize)
}

/// Like [`resolve_index`], but additionally admits the one-past-end position
/// `len + 1`, which is a valid place to start a search or address the end
/// cursor.
pub(crate) fn resolve_start(index: i64, len: usize) -> Result<usize, TextError> {
    let resolved = if index < 0 { len as i64 + index + 1 } else { index };
    if resolved < 1 || resolved > len as i64 + 1 {
        return Err(TextError::IndexOutOfRange { index, len });
    }
    Ok(resolved as usize)
}

/// Resolves an optional 1-based inclusive `[i, j]` pair (defaults `1` and
/// `len`) to a 0-based half-open span.
///
/// An inverted pair (`i > j` after resolution) yields the empty span at `i`,
/// matching the host convention where `sub(3, 2)` is empty rather than an
/// error. On an empty sequence the defaults resolve to the empty span, while
/// explicit indices are range errors.
pub(crate) fn resolve_span(
    i: Option<i64>,
    j: Option<i64>,
    len: usize,
) -> Result<(usize, usize), TextError> {
    if len == 0 && i.is_none() && j.is_none() {
        return Ok((0, 0));
    }
    let start = resolve_index(i.unwrap_or(1), len)? - 1;
    let end = match j {
        Some(j) => resolve_index(j, len)?,
        None => len,
    };
    if end < start { Ok((start, start)) } else { Ok((start, end)) }
}
