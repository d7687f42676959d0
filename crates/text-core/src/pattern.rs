//! The regular-expression adaptation layer.
//!
//! [`Pattern`] wraps a compiled Unicode-aware regex together with its
//! compile-time option flags and derived capture count. Compilation happens
//! once and either yields an immutable, reusable pattern or reports the
//! engine's own diagnostic; matching never fails at match time for syntax
//! reasons.
//!
//! Matching accepts either index space ([`TextInput`]): a raw byte string
//! (assumed UTF-8, addressed by 1-based byte offsets) or a
//! [`TextBuffer`](crate::TextBuffer) (addressed by 1-based UTF-16 unit
//! offsets). The adapter renders the input to UTF-8 once per call, builds a
//! [`ByteUnitMap`] alongside, and translates every range it reports back into
//! the caller's own index space. This module does not reimplement regex
//! execution; leftmost-first and greediness semantics are the engine's.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::buffer::TextBuffer;
use crate::error::TextError;
use crate::index_map::{self, ByteUnitMap};

/// Compile-time pattern option flags.
///
/// Each flag maps onto the corresponding engine option; `ignore_metacharacters`
/// escapes the pattern before compilation so it matches literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternOptions {
    /// Match letters without regard to case.
    pub case_insensitive: bool,
    /// Ignore whitespace and `#`-comments in the pattern.
    pub allow_comments_and_whitespace: bool,
    /// `^` and `$` match at line boundaries, not only text boundaries.
    pub anchors_match_lines: bool,
    /// `.` also matches line separators.
    pub dot_matches_line_separators: bool,
    /// Treat the whole pattern as a literal string.
    pub ignore_metacharacters: bool,
    /// Advisory: word boundaries follow the Unicode word definition. The
    /// underlying engine applies Unicode word boundaries unconditionally, so
    /// this flag changes nothing and exists for option-set compatibility.
    pub use_unicode_word_boundaries: bool,
    /// Only `\n` terminates a line; when unset, `\r\n` is also treated as a
    /// single line terminator for the line-anchor flags.
    pub use_unix_line_separators: bool,
}

/// Per-call match option flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    /// Only report a match that begins exactly at the search range start.
    pub anchored: bool,
    /// `^`/`$` match only at the true boundaries of the whole text, not at
    /// the boundaries of the supplied search range.
    pub without_anchoring_bounds: bool,
    /// Advisory: the engine has no lookaround, so there is nothing for a
    /// transparent bound to reveal; accepted for option-set compatibility.
    pub with_transparent_bounds: bool,
}

/// Pattern compilation errors.
#[derive(Debug)]
pub enum PatternError {
    /// The pattern failed to compile; carries the engine's diagnostic.
    Compile(regex::Error),
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compile(err) => write!(f, "invalid pattern: {}", err),
        }
    }
}

impl std::error::Error for PatternError {}

/// A 1-based inclusive range in the caller's index space.
///
/// An empty match at position `p` is reported as `(p, p - 1)`, so
/// `end < start` encodes emptiness without a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    /// Inclusive 1-based start.
    pub start: i64,
    /// Inclusive 1-based end.
    pub end: i64,
}

impl MatchRange {
    /// Length of the range in the caller's units.
    pub fn len(&self) -> usize {
        if self.end < self.start { 0 } else { (self.end - self.start + 1) as usize }
    }

    /// Returns `true` for an empty (zero-width) range.
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// One successful application of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The whole match (capture position 0).
    pub range: MatchRange,
    /// Declared capture groups 1..N in declaration order; `None` for a group
    /// that did not participate in the match.
    pub captures: Vec<Option<MatchRange>>,
}

/// The caller's text, in one of the two supported index spaces.
#[derive(Debug, Clone, Copy)]
pub enum TextInput<'a> {
    /// A raw byte string assumed to be valid UTF-8; all indices in and out
    /// are 1-based byte offsets.
    Bytes(&'a [u8]),
    /// A UTF-16 buffer; all indices in and out are 1-based unit offsets.
    Buffer(&'a TextBuffer),
}

impl TextInput<'_> {
    /// Length in the caller's own units, available before any mapping work.
    pub fn len(&self) -> usize {
        match self {
            TextInput::Bytes(bytes) => bytes.len(),
            TextInput::Buffer(buffer) => buffer.len(),
        }
    }

    /// Returns `true` for empty input.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which index space match results are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexSpace {
    Bytes,
    Units,
}

/// The UTF-8 rendition of a [`TextInput`] plus its correspondence map,
/// built once per match or substitution call.
pub(crate) struct Rendition {
    pub(crate) text: String,
    pub(crate) map: ByteUnitMap,
    pub(crate) space: IndexSpace,
}

/// A match expressed in byte offsets of a [`Rendition`].
pub(crate) struct RawMatch {
    pub(crate) range: Range<usize>,
    pub(crate) groups: Vec<Option<Range<usize>>>,
}

impl RawMatch {
    fn from_captures(caps: &regex::Captures<'_>, base: usize, capture_count: usize) -> Self {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        Self {
            range: whole.start + base..whole.end + base,
            groups: (1..=capture_count)
                .map(|k| caps.get(k).map(|m| m.start() + base..m.end() + base))
                .collect(),
        }
    }
}

impl Rendition {
    pub(crate) fn from_input(input: TextInput<'_>) -> Result<Self, TextError> {
        match input {
            TextInput::Bytes(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|err| TextError::InvalidUtf8 { index: err.valid_up_to() + 1 })?
                    .to_string();
                let map = ByteUnitMap::new(&text);
                Ok(Self { text, map, space: IndexSpace::Bytes })
            }
            TextInput::Buffer(buffer) => {
                let text = buffer.to_string_lossy();
                let map = ByteUnitMap::new(&text);
                Ok(Self { text, map, space: IndexSpace::Units })
            }
        }
    }

    /// Translates a 0-based caller-space offset to a byte offset in `text`,
    /// snapped forward to the next character boundary when it lands inside a
    /// multi-byte character or surrogate pair.
    pub(crate) fn caller_offset_to_byte(&self, offset: usize) -> usize {
        let mut byte = match self.space {
            IndexSpace::Bytes => offset.min(self.text.len()),
            IndexSpace::Units => self.map.byte_at(offset),
        };
        while !self.text.is_char_boundary(byte) {
            byte += 1;
        }
        byte
    }

    fn to_caller_range(&self, range: &Range<usize>) -> MatchRange {
        match self.space {
            IndexSpace::Bytes => MatchRange {
                start: range.start as i64 + 1,
                end: range.end as i64,
            },
            IndexSpace::Units => MatchRange {
                start: self.map.unit_ceil(range.start) as i64 + 1,
                end: self.map.unit_ceil(range.end) as i64,
            },
        }
    }

    pub(crate) fn to_match_result(&self, raw: &RawMatch) -> MatchResult {
        MatchResult {
            range: self.to_caller_range(&raw.range),
            captures: raw
                .groups
                .iter()
                .map(|g| g.as_ref().map(|r| self.to_caller_range(r)))
                .collect(),
        }
    }
}

/// Finds the next non-overlapping match at or after `*cursor` and advances
/// the cursor: to the match end, or one whole character past the match start
/// when the match was empty, so zero-width matches always make progress.
pub(crate) fn next_raw_match(
    regex: &Regex,
    text: &str,
    cursor: &mut usize,
    capture_count: usize,
) -> Option<RawMatch> {
    if *cursor > text.len() {
        return None;
    }
    let caps = regex.captures_at(text, *cursor)?;
    let raw = RawMatch::from_captures(&caps, 0, capture_count);
    if raw.range.is_empty() {
        let mut next = raw.range.start + 1;
        while next < text.len() && !text.is_char_boundary(next) {
            next += 1;
        }
        *cursor = next;
    } else {
        *cursor = raw.range.end;
    }
    Some(raw)
}

/// An immutable compiled pattern: regex, option flags, and capture count.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    source: String,
    options: PatternOptions,
    capture_count: usize,
}

impl Pattern {
    /// Compiles `source` under `options`.
    ///
    /// Compilation never partially succeeds: either a reusable [`Pattern`] is
    /// produced, or the engine's diagnostic is reported and no pattern
    /// exists. Syntax problems are never deferred to match time.
    pub fn compile(source: &str, options: PatternOptions) -> Result<Self, PatternError> {
        let pattern = if options.ignore_metacharacters {
            regex::escape(source)
        } else {
            source.to_string()
        };
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(options.case_insensitive)
            .ignore_whitespace(options.allow_comments_and_whitespace)
            .multi_line(options.anchors_match_lines)
            .dot_matches_new_line(options.dot_matches_line_separators)
            .crlf(!options.use_unix_line_separators)
            .build()
            .map_err(PatternError::Compile)?;
        let capture_count = regex.captures_len() - 1;
        Ok(Self { regex, source: source.to_string(), options, capture_count })
    }

    /// The pattern text as supplied to [`Pattern::compile`].
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The options the pattern was compiled with.
    pub fn options(&self) -> PatternOptions {
        self.options
    }

    /// Number of declared capture groups (position 0, the whole match, is not
    /// counted).
    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Finds the first match within the 1-based inclusive range `[i, j]`
    /// (defaults: the whole input). Returns `Ok(None)` when nothing matches.
    ///
    /// The range is validated in the caller's index space before any mapping
    /// work happens; byte offsets that land inside a character are snapped
    /// forward to the next character.
    pub fn first_match(
        &self,
        input: TextInput<'_>,
        i: Option<i64>,
        j: Option<i64>,
        options: MatchOptions,
    ) -> Result<Option<MatchResult>, TextError> {
        // Indices are validated against the caller-space length before any
        // mapping work happens.
        let len = input.len();
        let start = index_map::resolve_start(i.unwrap_or(1), len)? - 1;
        let end = match j {
            Some(j) => index_map::resolve_index(j, len)?,
            None => len,
        };
        let rendition = Rendition::from_input(input)?;
        let byte_start = rendition.caller_offset_to_byte(start);
        let byte_end = rendition.caller_offset_to_byte(end.max(start));
        let raw = self.raw_search(&rendition.text, byte_start, byte_end, options);
        Ok(raw.map(|m| rendition.to_match_result(&m)))
    }

    /// Returns a lazy iterator over non-overlapping matches scanning strictly
    /// left to right from 1-based position `i` (default 1).
    ///
    /// Each search resumes just past the previous match, or one character
    /// past its start when the previous match was empty, so the sequence is
    /// always finite.
    pub fn match_iter(
        &self,
        input: TextInput<'_>,
        i: Option<i64>,
    ) -> Result<Matches<'_>, TextError> {
        let start = index_map::resolve_start(i.unwrap_or(1), input.len())? - 1;
        let rendition = Rendition::from_input(input)?;
        let cursor = rendition.caller_offset_to_byte(start);
        Ok(Matches { pattern: self, rendition, cursor, done: false })
    }

    fn raw_search(
        &self,
        text: &str,
        start: usize,
        end: usize,
        options: MatchOptions,
    ) -> Option<RawMatch> {
        let end = end.max(start);
        let raw = if options.without_anchoring_bounds {
            // `captures_at` keeps surrounding context, so `^` matches only at
            // the true start of the text rather than at the range boundary.
            let caps = self.regex.captures_at(&text[..end], start)?;
            RawMatch::from_captures(&caps, 0, self.capture_count)
        } else {
            let caps = self.regex.captures(&text[start..end])?;
            RawMatch::from_captures(&caps, start, self.capture_count)
        };
        if options.anchored && raw.range.start != start {
            return None;
        }
        Some(raw)
    }
}

/// Iterator state for [`Pattern::match_iter`]: a linear cursor that is
/// terminal at end-of-text or first failed search.
pub struct Matches<'p> {
    pattern: &'p Pattern,
    rendition: Rendition,
    cursor: usize,
    done: bool,
}

impl Iterator for Matches<'_> {
    type Item = MatchResult;

    fn next(&mut self) -> Option<MatchResult> {
        if self.done {
            return None;
        }
        match next_raw_match(
            self.pattern.regex(),
            &self.rendition.text,
            &mut self.cursor,
            self.pattern.capture_count,
        ) {
            Some(raw) => Some(self.rendition.to_match_result(&raw)),
            None => {
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(source: &str) -> Pattern {
        Pattern::compile(source, PatternOptions::default()).unwrap()
    }

    #[test]
    fn test_compile_error_reports_diagnostic() {
        let err = Pattern::compile("(unclosed", PatternOptions::default()).unwrap_err();
        assert!(matches!(err, PatternError::Compile(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_capture_count() {
        assert_eq!(plain("abc").capture_count(), 0);
        assert_eq!(plain("(a)(b(c))").capture_count(), 3);
    }

    #[test]
    fn test_ignore_metacharacters_matches_literally() {
        let pattern = Pattern::compile(
            "a.c",
            PatternOptions { ignore_metacharacters: true, ..Default::default() },
        )
        .unwrap();
        let buffer = TextBuffer::from_str("abc a.c");
        let m = pattern
            .first_match(TextInput::Buffer(&buffer), None, None, MatchOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!((m.range.start, m.range.end), (5, 7));
    }

    #[test]
    fn test_empty_match_progress_terminates() {
        let pattern = plain("x*");
        let buffer = TextBuffer::from_str("axa");
        let ranges: Vec<(i64, i64)> = pattern
            .match_iter(TextInput::Buffer(&buffer), None)
            .unwrap()
            .map(|m| (m.range.start, m.range.end))
            .collect();
        // empty at 1, "x" at 2, empty at 3, empty at end
        assert_eq!(ranges, [(1, 0), (2, 2), (3, 2), (4, 3)]);
    }

    #[test]
    fn test_anchoring_bounds_default_vs_without() {
        let pattern = plain("^b");
        let buffer = TextBuffer::from_str("ab");
        let anchored_to_range = pattern
            .first_match(TextInput::Buffer(&buffer), Some(2), None, MatchOptions::default())
            .unwrap();
        assert!(anchored_to_range.is_some());
        let true_bounds_only = pattern
            .first_match(
                TextInput::Buffer(&buffer),
                Some(2),
                None,
                MatchOptions { without_anchoring_bounds: true, ..Default::default() },
            )
            .unwrap();
        assert!(true_bounds_only.is_none());
    }

    #[test]
    fn test_anchored_requires_match_at_range_start() {
        let pattern = plain("b+");
        let buffer = TextBuffer::from_str("abbb");
        let options = MatchOptions { anchored: true, ..Default::default() };
        assert!(
            pattern
                .first_match(TextInput::Buffer(&buffer), None, None, options)
                .unwrap()
                .is_none()
        );
        assert!(
            pattern
                .first_match(TextInput::Buffer(&buffer), Some(2), None, options)
                .unwrap()
                .is_some()
        );
    }
}
