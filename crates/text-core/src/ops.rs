//! Character-level operations over [`TextBuffer`].
//!
//! Every operation here is 1-based, inclusive, and negative-aware, and is
//! explicit about which of the three length notions it works in: UTF-16 code
//! units (a surrogate pair counts as two), Unicode codepoints (a pair counts
//! as one), or composed character sequences (a base plus its combining marks
//! counts as one). Operations taking a `composed` flag switch between the
//! latter two.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use crate::buffer::TextBuffer;
use crate::classify;
use crate::error::TextError;
use crate::index_map;
use crate::locale::{CanonicalLocaleServices, CompareOptions, Locale, LocaleServices};

impl TextBuffer {
    /// Counts characters in the 1-based inclusive range `[i, j]` (defaults:
    /// the whole buffer): composed character sequences when `composed`,
    /// codepoints otherwise.
    ///
    /// An isolated surrogate, or a surrogate pair or composed sequence that
    /// begins or ends outside the range, is reported as
    /// [`TextError::InvalidUtf16`] with the offending 1-based index so the
    /// caller can locate and repair the source data.
    pub fn character_count(
        &self,
        composed: bool,
        i: Option<i64>,
        j: Option<i64>,
    ) -> Result<usize, TextError> {
        let (start, end) = index_map::resolve_span(i, j, self.len())?;
        let units = self.units();
        let mut k = start;
        let mut codepoints = 0;
        while k < end {
            let unit = units[k];
            if classify::is_low_surrogate(unit) {
                return Err(TextError::InvalidUtf16 { index: k + 1 });
            }
            if classify::is_high_surrogate(unit) {
                if k + 1 < end && classify::is_low_surrogate(units[k + 1]) {
                    k += 2;
                } else {
                    return Err(TextError::InvalidUtf16 { index: k + 1 });
                }
            } else {
                k += 1;
            }
            codepoints += 1;
        }
        if !composed {
            return Ok(codepoints);
        }
        let (cluster_start, cluster_end) = classify::composed_range_units(units, start, end);
        if cluster_start != start {
            return Err(TextError::InvalidUtf16 { index: start + 1 });
        }
        if cluster_end != end {
            return Err(TextError::InvalidUtf16 { index: end });
        }
        Ok(classify::grapheme_unit_bounds(&units[start..end]).len() - 1)
    }

    /// The smallest 1-based inclusive range covering `[i, j]` that neither
    /// begins nor ends inside a surrogate pair or composed character
    /// sequence.
    ///
    /// Unlike [`TextBuffer::sub`], the indices are not clamped; an
    /// out-of-range index is an error.
    pub fn composed_character_range(&self, i: i64, j: i64) -> Result<(i64, i64), TextError> {
        let start = index_map::resolve_index(i, self.len())? - 1;
        let end = index_map::resolve_index(j, self.len())?;
        let (cluster_start, cluster_end) =
            classify::composed_range_units(self.units(), start, end.max(start));
        Ok((cluster_start as i64 + 1, cluster_end as i64))
    }

    /// Raw slice by unit index. Negative indices resolve from the end; the
    /// documented clamping policy then applies: `i < 1` clamps to `1` and
    /// `j > len` clamps to `len`, and an inverted range yields the empty
    /// buffer. A start beyond the end of the buffer is not covered by the
    /// clamp and is an error.
    ///
    /// This slices by storage unit and may split a surrogate pair or
    /// composed sequence; pre-adjust with
    /// [`TextBuffer::composed_character_range`] to keep sequences whole.
    pub fn sub(&self, i: i64, j: Option<i64>) -> Result<TextBuffer, TextError> {
        let len = self.len() as i64;
        let mut start = if i < 0 { len + i + 1 } else { i };
        let mut end = match j {
            Some(j) if j < 0 => len + j + 1,
            Some(j) => j,
            None => len,
        };
        start = start.max(1);
        if start > len {
            return Err(TextError::IndexOutOfRange { index: i, len: self.len() });
        }
        end = end.min(len);
        if start > end {
            return Ok(TextBuffer::new());
        }
        Ok(TextBuffer::from_units(self.units()[(start - 1) as usize..end as usize].to_vec()))
    }

    /// The raw code units in the 1-based inclusive range `[i, j]`
    /// (`j` defaults to `i`). Out-of-range indices are errors, never
    /// clamped.
    pub fn unit_character(&self, i: i64, j: Option<i64>) -> Result<Vec<u16>, TextError> {
        let start = index_map::resolve_index(i, self.len())?;
        let end = index_map::resolve_index(j.unwrap_or(i), self.len())?;
        if end < start {
            return Ok(Vec::new());
        }
        Ok(self.units()[start - 1..end].to_vec())
    }

    /// Decodes the codepoints beginning at each position of `[i, j]`
    /// (defaults: `i = 1`, `j = i`), consuming surrogate pairs as a unit.
    ///
    /// A position holding a lone low surrogate, or a high surrogate without
    /// its partner, is reported as [`TextError::InvalidUtf16`]. A pair whose
    /// high half is the last position in range is consumed whole.
    pub fn codepoint(&self, i: Option<i64>, j: Option<i64>) -> Result<Vec<u32>, TextError> {
        let first = i.unwrap_or(1);
        let start = index_map::resolve_index(first, self.len())?;
        let end = match j {
            Some(j) => index_map::resolve_index(j, self.len())?,
            None => start,
        };
        if end < start {
            return Ok(Vec::new());
        }
        let units = self.units();
        let mut out = Vec::new();
        let mut k = start - 1;
        while k < end {
            let unit = units[k];
            if classify::is_low_surrogate(unit) {
                return Err(TextError::InvalidUtf16 { index: k + 1 });
            }
            if classify::is_high_surrogate(unit) {
                match units.get(k + 1).copied().and_then(|low| classify::codepoint_for_pair(unit, low)) {
                    Some(codepoint) => {
                        out.push(codepoint);
                        k += 2;
                    }
                    None => return Err(TextError::InvalidUtf16 { index: k + 1 }),
                }
            } else {
                out.push(unit as u32);
                k += 1;
            }
        }
        Ok(out)
    }

    /// The 1-based unit index of the character `n` characters after (or,
    /// negative `n`, before) position `i`.
    ///
    /// `n = 0` snaps `i` to the start of its own character. For any other
    /// `n`, `i` must sit on a character boundary
    /// ([`TextError::MidCharacter`] otherwise). `i` defaults to `1` for
    /// `n >= 0` and to the end cursor for `n < 0`; the end cursor
    /// (`len + 1`) is both a valid `i` and a valid result. Walking past
    /// either end of the buffer yields `Ok(None)`.
    pub fn offset(&self, composed: bool, n: i64, i: Option<i64>) -> Result<Option<i64>, TextError> {
        let len = self.len();
        let default_start = if n < 0 { len as i64 + 1 } else { 1 };
        let position = index_map::resolve_start(i.unwrap_or(default_start), len)? - 1;
        let bounds = if composed {
            classify::grapheme_unit_bounds(self.units())
        } else {
            classify::codepoint_unit_bounds(self.units())
        };
        let idx = match bounds.binary_search(&position) {
            Ok(idx) => idx,
            Err(idx) => {
                if n != 0 {
                    return Err(TextError::MidCharacter { index: position + 1 });
                }
                idx - 1
            }
        };
        if n == 0 {
            return Ok(Some(bounds[idx] as i64 + 1));
        }
        let target = idx as i64 + n;
        if target < 0 || target >= bounds.len() as i64 {
            return Ok(None);
        }
        Ok(Some(bounds[target as usize] as i64 + 1))
    }

    /// Reverses by composed character sequence, never by raw unit, so
    /// surrogate pairs and combining sequences stay intact and contiguous.
    pub fn reverse(&self) -> TextBuffer {
        let units = self.units();
        let bounds = classify::grapheme_unit_bounds(units);
        let mut out = Vec::with_capacity(units.len());
        for window in bounds.windows(2).rev() {
            out.extend_from_slice(&units[window[0]..window[1]]);
        }
        TextBuffer::from_units(out)
    }

    /// Uppercases under `locale` using the canonical locale services.
    pub fn uppercase(&self, locale: &Locale) -> TextBuffer {
        self.uppercase_with(&CanonicalLocaleServices, locale)
    }

    /// Uppercases through an explicit [`LocaleServices`] implementation.
    pub fn uppercase_with(&self, services: &dyn LocaleServices, locale: &Locale) -> TextBuffer {
        TextBuffer::from_str(&services.uppercase(&self.to_string_lossy(), locale))
    }

    /// Lowercases under `locale` using the canonical locale services.
    pub fn lowercase(&self, locale: &Locale) -> TextBuffer {
        self.lowercase_with(&CanonicalLocaleServices, locale)
    }

    /// Lowercases through an explicit [`LocaleServices`] implementation.
    pub fn lowercase_with(&self, services: &dyn LocaleServices, locale: &Locale) -> TextBuffer {
        TextBuffer::from_str(&services.lowercase(&self.to_string_lossy(), locale))
    }

    /// Titlecases the first letter of each word and lowercases the rest.
    pub fn capitalized(&self, locale: &Locale) -> TextBuffer {
        self.capitalized_with(&CanonicalLocaleServices, locale)
    }

    /// Capitalizes through an explicit [`LocaleServices`] implementation.
    pub fn capitalized_with(&self, services: &dyn LocaleServices, locale: &Locale) -> TextBuffer {
        TextBuffer::from_str(&services.capitalized(&self.to_string_lossy(), locale))
    }

    /// Three-way comparison under `options` and `locale` using the canonical
    /// locale services.
    pub fn compare(&self, other: &TextBuffer, options: CompareOptions, locale: &Locale) -> Ordering {
        self.compare_with(&CanonicalLocaleServices, other, options, locale)
    }

    /// Compares through an explicit [`LocaleServices`] implementation.
    pub fn compare_with(
        &self,
        services: &dyn LocaleServices,
        other: &TextBuffer,
        options: CompareOptions,
        locale: &Locale,
    ) -> Ordering {
        services.compare(&self.to_string_lossy(), &other.to_string_lossy(), options, locale)
    }

    /// The canonical (or, with `compatibility`, compatibility) composed form
    /// of the buffer: NFC or NFKC.
    ///
    /// Requires a well-formed buffer; a lone surrogate is reported with its
    /// 1-based index.
    pub fn unicode_composition(&self, compatibility: bool) -> Result<TextBuffer, TextError> {
        let text = self.to_utf8_string()?;
        let composed: String =
            if compatibility { text.nfkc().collect() } else { text.nfc().collect() };
        Ok(TextBuffer::from_str(&composed))
    }

    /// The canonical (or compatibility) decomposed form of the buffer: NFD
    /// or NFKD. Requires a well-formed buffer.
    pub fn unicode_decomposition(&self, compatibility: bool) -> Result<TextBuffer, TextError> {
        let text = self.to_utf8_string()?;
        let decomposed: String =
            if compatibility { text.nfkd().collect() } else { text.nfd().collect() };
        Ok(TextBuffer::from_str(&decomposed))
    }
}
