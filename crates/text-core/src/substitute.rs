//! Global substitution with template, lookup-table, and callback directives.
//!
//! Matches are enumerated over the *original* text exactly as
//! [`Pattern::match_iter`](crate::Pattern::match_iter) enumerates them, while
//! replacements are applied to a mutable working copy. A running offset
//! (units inserted minus units removed) shifts each original-space match
//! range before it indexes into the working copy, which is required because
//! earlier replacements may already have changed the working copy's length.
//!
//! The replacement directive is a closed sum resolved once at the API
//! boundary; a directive that declines (lookup miss, callback returning
//! `None`) leaves the match untouched and does not count it as replaced. A
//! callback that reports an error aborts the whole substitution with no
//! partial result.

use std::collections::HashMap;

use crate::buffer::TextBuffer;
use crate::error::TextError;
use crate::pattern::{IndexSpace, Pattern, RawMatch, Rendition, TextInput, next_raw_match};

/// The captured texts handed to a replacement callback: the whole match plus
/// each declared group in declaration order (`None` for a group that did not
/// participate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCaptures {
    /// Text of the whole match.
    pub whole: String,
    /// Texts of the declared capture groups.
    pub groups: Vec<Option<String>>,
}

/// How each match is rewritten.
pub enum Replacement<'r> {
    /// A literal template; `$n` expands to capture `n` (`$0` is the whole
    /// match), `\$` is a literal dollar sign, and a `$` not followed by a
    /// digit stands for itself.
    Template(String),
    /// Key → replacement lookup. The key is the first capture when the
    /// pattern declares captures, the whole match otherwise; a missing key
    /// leaves the match unreplaced.
    Lookup(HashMap<String, String>),
    /// Invoked once per match with the ordered captures. `Ok(None)` leaves
    /// the match unreplaced; `Err` aborts the whole substitution.
    Callback(&'r mut dyn FnMut(&MatchCaptures) -> Result<Option<String>, String>),
}

/// Substitution output, mirroring the input's index space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstituteOutput {
    /// Byte string in, byte string out.
    Bytes(Vec<u8>),
    /// Buffer in, buffer out.
    Buffer(TextBuffer),
}

impl SubstituteOutput {
    /// The output as bytes, for byte-string inputs.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Buffer(_) => None,
        }
    }

    /// The output as a buffer, for buffer inputs.
    pub fn into_buffer(self) -> Option<TextBuffer> {
        match self {
            Self::Buffer(buffer) => Some(buffer),
            Self::Bytes(_) => None,
        }
    }
}

/// Replaces up to `max_count` (default: all) non-overlapping matches of
/// `pattern` in `input`, returning the new text and the number of matches
/// actually replaced.
pub fn substitute(
    pattern: &Pattern,
    input: TextInput<'_>,
    mut replacement: Replacement<'_>,
    max_count: Option<usize>,
) -> Result<(SubstituteOutput, usize), TextError> {
    let rendition = Rendition::from_input(input)?;
    // The working copy starts as the original units; matching always reads
    // the untouched rendition, so only the splice targets shift.
    let mut working: Vec<u16> = match input {
        TextInput::Buffer(buffer) => buffer.units().to_vec(),
        TextInput::Bytes(_) => rendition.text.encode_utf16().collect(),
    };
    let mut offset: isize = 0;
    let mut count = 0;
    let mut cursor = 0;

    while max_count.is_none_or(|max| count < max) {
        let Some(raw) =
            next_raw_match(pattern.regex(), &rendition.text, &mut cursor, pattern.capture_count())
        else {
            break;
        };
        let Some(replaced) = evaluate(&mut replacement, pattern, &rendition.text, &raw)? else {
            continue;
        };
        let unit_start = rendition.map.unit_ceil(raw.range.start);
        let unit_end = rendition.map.unit_ceil(raw.range.end);
        let replaced_units: Vec<u16> = replaced.encode_utf16().collect();
        let shifted_start = (unit_start as isize + offset) as usize;
        let shifted_end = (unit_end as isize + offset) as usize;
        offset += replaced_units.len() as isize - (unit_end - unit_start) as isize;
        working.splice(shifted_start..shifted_end, replaced_units);
        count += 1;
    }

    let output = match rendition.space {
        IndexSpace::Units => SubstituteOutput::Buffer(TextBuffer::from_units(working)),
        IndexSpace::Bytes => SubstituteOutput::Bytes(String::from_utf16_lossy(&working).into_bytes()),
    };
    Ok((output, count))
}

/// Evaluates the directive for one match. `Ok(None)` means "leave the match
/// as it is".
fn evaluate(
    replacement: &mut Replacement<'_>,
    pattern: &Pattern,
    text: &str,
    raw: &RawMatch,
) -> Result<Option<String>, TextError> {
    match replacement {
        Replacement::Template(template) => Ok(Some(expand_template(template, text, raw))),
        Replacement::Lookup(table) => {
            let key = if pattern.capture_count() > 0 {
                raw.groups
                    .first()
                    .and_then(|g| g.as_ref())
                    .map(|r| &text[r.clone()])
                    .unwrap_or("")
            } else {
                &text[raw.range.clone()]
            };
            Ok(table.get(key).cloned())
        }
        Replacement::Callback(callback) => {
            let captures = MatchCaptures {
                whole: text[raw.range.clone()].to_string(),
                groups: raw
                    .groups
                    .iter()
                    .map(|g| g.as_ref().map(|r| text[r.clone()].to_string()))
                    .collect(),
            };
            callback(&captures).map_err(TextError::Callback)
        }
    }
}

/// Expands `$n` backreferences against the original captured substrings.
///
/// `$0` is the whole match; a group number beyond the declared count, or a
/// group that did not participate, expands to the empty string. `\$` yields
/// a literal `$` and suppresses expansion of a following digit; a `$` not
/// followed by a digit is literal.
fn expand_template(template: &str, text: &str, raw: &RawMatch) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'$') => {
                chars.next();
                out.push('$');
            }
            '$' => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if digits.is_empty() {
                    out.push('$');
                } else if let Ok(n) = digits.parse::<usize>() {
                    if n == 0 {
                        out.push_str(&text[raw.range.clone()]);
                    } else if let Some(Some(range)) = raw.groups.get(n - 1) {
                        out.push_str(&text[range.clone()]);
                    }
                }
            }
            _ => out.push(ch),
        }
    }
    out
}
