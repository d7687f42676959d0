#![warn(missing_docs)]
//! UTF-16 text core with byte/code-unit index mapping and regex adaptation.
//!
//! # Overview
//!
//! `text-core` is a headless Unicode text kernel focused on one genuinely
//! hard problem: translating between byte offsets (the native index space of
//! an 8-bit host string) and UTF-16 code-unit offsets (the index space of
//! composed-character and surrogate-pair semantics) around a regular
//! expression engine, while preserving 1-based, inclusive, negative-from-end
//! indexing throughout find, match, and substitute operations.
//!
//! # Core Features
//!
//! - **Immutable UTF-16 buffers**: value semantics, cheap clones, safe
//!   concurrent reads
//! - **Index correspondence**: per-unit byte-offset map with documented
//!   forward snapping for mid-character indices
//! - **Pattern adaptation**: compile-once patterns over a Unicode regex
//!   engine, with first-match, iterative-match, and capture extraction in
//!   the caller's own index space
//! - **Substitution**: template, lookup-table, and callback directives with
//!   cumulative offset bookkeeping and a replacement count
//! - **Character operations**: length, substring, offset, reverse, codepoint
//!   and case operations that distinguish UTF-16 units from codepoints from
//!   composed character sequences
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Substitution Engine                        │  ← rewrite + offset tracking
//! ├─────────────────────────────────────────────┤
//! │  Pattern Engine Adapter                     │  ← regex + index translation
//! ├─────────────────────────────────────────────┤
//! │  Index Correspondence Map                   │  ← bytes ↔ UTF-16 units
//! ├─────────────────────────────────────────────┤
//! │  Surrogate / Composed-Character Classifier  │  ← boundaries
//! ├─────────────────────────────────────────────┤
//! │  UTF-16 Text Buffer                         │  ← immutable storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use text_core::{Pattern, PatternOptions, Replacement, TextBuffer, TextInput, substitute};
//!
//! let pattern = Pattern::compile(r"(\w+)\s*(\w+)", PatternOptions::default()).unwrap();
//! let text = TextBuffer::from_str("hello world from Lua");
//!
//! let (out, count) = substitute(
//!     &pattern,
//!     TextInput::Buffer(&text),
//!     Replacement::Template("$2 $1".to_string()),
//!     None,
//! )
//! .unwrap();
//!
//! assert_eq!(count, 2);
//! assert_eq!(out.into_buffer().unwrap().to_string_lossy(), "world hello Lua from");
//! ```
//!
//! # Index Convention
//!
//! All public indices are 1-based and inclusive; negative values count back
//! from the end (`-1` is the last position). Indices are validated before
//! any work happens, and out-of-range indices are errors except where a
//! clamping policy is documented (`sub`). Match results are reported in the
//! caller's own index space: byte offsets for [`TextInput::Bytes`], UTF-16
//! unit offsets for [`TextInput::Buffer`].
//!
//! # Module Description
//!
//! - [`buffer`] - immutable UTF-16 text buffers
//! - [`classify`] - surrogate predicates and composed-character ranges
//! - [`index_map`] - byte ↔ UTF-16 unit correspondence
//! - [`pattern`] - pattern compilation and matching
//! - [`substitute`] - template/table/callback substitution
//! - [`ops`] - character-level buffer operations
//! - [`locale`] - locale modes, comparison options, case/collation seam
//!
//! # Concurrency
//!
//! All operations are synchronous and run to completion. Buffers and
//! patterns are immutable after construction, so sharing them across threads
//! for reading is safe; shared ownership keeps a buffer alive while any
//! reader holds it.

pub mod buffer;
pub mod classify;
pub mod error;
pub mod index_map;
pub mod locale;
pub mod ops;
pub mod pattern;
pub mod substitute;

pub use buffer::TextBuffer;
pub use error::TextError;
pub use index_map::ByteUnitMap;
pub use locale::{CanonicalLocaleServices, CompareOptions, Locale, LocaleServices};
pub use pattern::{
    MatchOptions, MatchRange, MatchResult, Matches, Pattern, PatternError, PatternOptions,
    TextInput,
};
pub use substitute::{MatchCaptures, Replacement, SubstituteOutput, substitute};
