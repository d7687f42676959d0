//! Error types shared by the buffer, index, and substitution layers.
//!
//! Pattern compilation has its own error type ([`crate::pattern::PatternError`])
//! because it wraps the regex engine's native diagnostic; everything else that
//! can go wrong in this crate is a `TextError`.

/// Errors produced by buffer construction, indexing, and substitution.
///
/// All indices reported here are 1-based, matching the public API convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// An index fell outside `[1, length]` after negative-index resolution.
    IndexOutOfRange {
        /// The index as supplied by the caller (possibly negative).
        index: i64,
        /// The length of the indexed sequence.
        len: usize,
    },
    /// An isolated surrogate was found where a full codepoint was required.
    InvalidUtf16 {
        /// 1-based code-unit index of the offending surrogate.
        index: usize,
    },
    /// A byte sequence claimed to be UTF-8 was not.
    InvalidUtf8 {
        /// 1-based index of the first byte that is not valid UTF-8.
        index: usize,
    },
    /// A codepoint value above U+10FFFF.
    InvalidCodepoint {
        /// The offending value.
        codepoint: u32,
    },
    /// An index that must sit on a character boundary landed inside a
    /// surrogate pair or composed character sequence.
    MidCharacter {
        /// 1-based code-unit index supplied by the caller.
        index: usize,
    },
    /// A replacement callback reported failure; the whole substitution is
    /// aborted and no partial result is produced.
    Callback(String),
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range [1, {}]", index, len)
            }
            TextError::InvalidUtf16 { index } => {
                write!(f, "isolated surrogate at code-unit index {}", index)
            }
            TextError::InvalidUtf8 { index } => {
                write!(f, "invalid UTF-8 at byte index {}", index)
            }
            TextError::InvalidCodepoint { codepoint } => {
                write!(f, "invalid Unicode codepoint U+{:X}", codepoint)
            }
            TextError::MidCharacter { index } => {
                write!(f, "index {} is not on a character boundary", index)
            }
            TextError::Callback(msg) => {
                write!(f, "replacement callback failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for TextError {}
