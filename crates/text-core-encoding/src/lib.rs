#![warn(missing_docs)]
//! Encoding collaborator for `text-core`.
//!
//! Decodes byte strings in a named source encoding into
//! [`TextBuffer`](text_core::TextBuffer)s, and encodes buffers back to bytes.
//! Both directions take a `lossy` flag: strict mode produces either a
//! faithful result or an error carrying the offending position — never a
//! partial or garbled result — while lossy mode substitutes U+FFFD inbound
//! and `?` outbound. Strict encoding additionally verifies losslessness by
//! encode-then-decode-then-compare.
//!
//! The encoding set is the closed list a Rust implementation expresses
//! directly: the UTF families plus the common single-byte tables. The long
//! tail of legacy encodings is out of scope.

use text_core::TextBuffer;

mod tables;

/// A named byte encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8.
    Utf8,
    /// UTF-16 with BOM detection on decode (little-endian assumed without a
    /// BOM); encodes little-endian with a BOM.
    Utf16,
    /// UTF-16LE, no BOM handling.
    Utf16LittleEndian,
    /// UTF-16BE, no BOM handling.
    Utf16BigEndian,
    /// 7-bit ASCII.
    Ascii,
    /// ISO 8859-1 (Latin-1).
    IsoLatin1,
    /// Windows code page 1252.
    WindowsCP1252,
    /// Mac OS Roman.
    MacRoman,
}

impl Encoding {
    /// The canonical name used by [`Encoding::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16 => "UTF-16",
            Encoding::Utf16LittleEndian => "UTF-16LE",
            Encoding::Utf16BigEndian => "UTF-16BE",
            Encoding::Ascii => "US-ASCII",
            Encoding::IsoLatin1 => "ISO-8859-1",
            Encoding::WindowsCP1252 => "windows-1252",
            Encoding::MacRoman => "macintosh",
        }
    }

    /// Resolves a name to an encoding, case-insensitively and accepting the
    /// common aliases.
    pub fn from_name(name: &str) -> Option<Encoding> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Encoding::Utf8),
            "utf-16" | "utf16" => Some(Encoding::Utf16),
            "utf-16le" | "utf16le" => Some(Encoding::Utf16LittleEndian),
            "utf-16be" | "utf16be" => Some(Encoding::Utf16BigEndian),
            "us-ascii" | "ascii" => Some(Encoding::Ascii),
            "iso-8859-1" | "latin1" | "iso_8859-1" => Some(Encoding::IsoLatin1),
            "windows-1252" | "cp1252" => Some(Encoding::WindowsCP1252),
            "macintosh" | "mac-roman" | "macroman" => Some(Encoding::MacRoman),
            _ => None,
        }
    }
}

/// Encoding and decoding failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The bytes cannot be decoded in the requested encoding.
    Undecodable {
        /// 1-based index of the first offending byte.
        byte_index: usize,
    },
    /// The buffer cannot be represented in the requested encoding without
    /// loss, and losslessness was required.
    Unrepresentable {
        /// 1-based index of the first offending UTF-16 unit.
        unit_index: usize,
    },
    /// [`Encoding::from_name`] did not recognize the name.
    UnknownEncoding(String),
}

impl std::fmt::Display for EncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingError::Undecodable { byte_index } => {
                write!(f, "undecodable input at byte index {}", byte_index)
            }
            EncodingError::Unrepresentable { unit_index } => {
                write!(f, "unrepresentable text at code-unit index {}", unit_index)
            }
            EncodingError::UnknownEncoding(name) => {
                write!(f, "unknown encoding: {}", name)
            }
        }
    }
}

impl std::error::Error for EncodingError {}

/// Decodes `bytes` as `encoding` into a buffer.
///
/// In strict mode (`lossy = false`) the first undecodable byte is reported
/// and no buffer is produced; in lossy mode it decodes to U+FFFD.
pub fn decode(bytes: &[u8], encoding: Encoding, lossy: bool) -> Result<TextBuffer, EncodingError> {
    match encoding {
        Encoding::Utf8 => {
            if lossy {
                Ok(TextBuffer::from_str(&String::from_utf8_lossy(bytes)))
            } else {
                match std::str::from_utf8(bytes) {
                    Ok(text) => Ok(TextBuffer::from_str(text)),
                    Err(err) => Err(EncodingError::Undecodable { byte_index: err.valid_up_to() + 1 }),
                }
            }
        }
        Encoding::Utf16 => {
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                decode_utf16_units(&bytes[2..], true, lossy, 2)
            } else if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
                decode_utf16_units(&bytes[2..], false, lossy, 2)
            } else {
                decode_utf16_units(bytes, false, lossy, 0)
            }
        }
        Encoding::Utf16LittleEndian => decode_utf16_units(bytes, false, lossy, 0),
        Encoding::Utf16BigEndian => decode_utf16_units(bytes, true, lossy, 0),
        Encoding::Ascii => {
            let mut units = Vec::with_capacity(bytes.len());
            for (k, &byte) in bytes.iter().enumerate() {
                if byte < 0x80 {
                    units.push(byte as u16);
                } else if lossy {
                    units.push(0xFFFD);
                } else {
                    return Err(EncodingError::Undecodable { byte_index: k + 1 });
                }
            }
            Ok(TextBuffer::from_units(units))
        }
        Encoding::IsoLatin1 => {
            Ok(TextBuffer::from_units(bytes.iter().map(|&b| b as u16).collect()))
        }
        Encoding::WindowsCP1252 => Ok(TextBuffer::from_units(
            bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => tables::CP1252_80_9F[(b - 0x80) as usize],
                    _ => b as u16,
                })
                .collect(),
        )),
        Encoding::MacRoman => Ok(TextBuffer::from_units(
            bytes
                .iter()
                .map(|&b| {
                    if b < 0x80 { b as u16 } else { tables::MAC_ROMAN_HIGH[(b - 0x80) as usize] }
                })
                .collect(),
        )),
    }
}

/// Encodes `buffer` as `encoding`.
///
/// In strict mode the first unrepresentable unit is reported, the conversion
/// is verified by decoding the produced bytes back and comparing, and no
/// partial output is ever returned. In lossy mode unrepresentable units
/// become `?`.
pub fn encode(buffer: &TextBuffer, encoding: Encoding, lossy: bool) -> Result<Vec<u8>, EncodingError> {
    let bytes = match encoding {
        Encoding::Utf8 => match buffer.to_utf8_bytes() {
            Ok(bytes) => bytes,
            Err(_) if !lossy => {
                return Err(EncodingError::Unrepresentable {
                    unit_index: first_lone_surrogate(buffer).unwrap_or(1),
                });
            }
            Err(_) => buffer.to_string_lossy().into_bytes(),
        },
        Encoding::Utf16 => {
            let mut bytes = Vec::with_capacity(buffer.len() * 2 + 2);
            bytes.extend_from_slice(&[0xFF, 0xFE]);
            for &unit in buffer.units() {
                bytes.extend_from_slice(&unit.to_le_bytes());
            }
            bytes
        }
        Encoding::Utf16LittleEndian => {
            buffer.units().iter().flat_map(|u| u.to_le_bytes()).collect()
        }
        Encoding::Utf16BigEndian => {
            buffer.units().iter().flat_map(|u| u.to_be_bytes()).collect()
        }
        Encoding::Ascii => encode_single_byte(buffer, lossy, |unit| {
            if unit < 0x80 { Some(unit as u8) } else { None }
        })?,
        Encoding::IsoLatin1 => encode_single_byte(buffer, lossy, |unit| {
            if unit < 0x100 { Some(unit as u8) } else { None }
        })?,
        Encoding::WindowsCP1252 => encode_single_byte(buffer, lossy, |unit| {
            if unit < 0x80 {
                return Some(unit as u8);
            }
            // The 0x80..=0x9F byte range is table-mapped (including the C1
            // controls the table passes through); 0xA0..=0xFF is direct.
            tables::CP1252_80_9F
                .iter()
                .position(|&mapped| mapped == unit)
                .map(|k| (k as u8) + 0x80)
                .or(if (0xA0..=0xFF).contains(&unit) { Some(unit as u8) } else { None })
        })?,
        Encoding::MacRoman => encode_single_byte(buffer, lossy, |unit| {
            if unit < 0x80 {
                Some(unit as u8)
            } else {
                tables::MAC_ROMAN_HIGH
                    .iter()
                    .position(|&mapped| mapped == unit)
                    .map(|k| (k as u8) + 0x80)
            }
        })?,
    };
    if !lossy && !roundtrips(&bytes, encoding, buffer) {
        return Err(EncodingError::Unrepresentable { unit_index: 1 });
    }
    Ok(bytes)
}

fn decode_utf16_units(
    bytes: &[u8],
    big_endian: bool,
    lossy: bool,
    consumed: usize,
) -> Result<TextBuffer, EncodingError> {
    if bytes.len() % 2 != 0 && !lossy {
        return Err(EncodingError::Undecodable { byte_index: consumed + bytes.len() });
    }
    let units = bytes
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            if big_endian { u16::from_be_bytes(pair) } else { u16::from_le_bytes(pair) }
        })
        .collect();
    Ok(TextBuffer::from_units(units))
}

fn encode_single_byte(
    buffer: &TextBuffer,
    lossy: bool,
    to_byte: impl Fn(u16) -> Option<u8>,
) -> Result<Vec<u8>, EncodingError> {
    let mut bytes = Vec::with_capacity(buffer.len());
    for (k, &unit) in buffer.units().iter().enumerate() {
        match to_byte(unit) {
            Some(byte) => bytes.push(byte),
            None if lossy => bytes.push(b'?'),
            None => return Err(EncodingError::Unrepresentable { unit_index: k + 1 }),
        }
    }
    Ok(bytes)
}

/// Losslessness check: decode the produced bytes back (leniently) and compare
/// against the source buffer.
fn roundtrips(bytes: &[u8], encoding: Encoding, buffer: &TextBuffer) -> bool {
    decode(bytes, encoding, true).map(|decoded| decoded == *buffer).unwrap_or(false)
}

fn first_lone_surrogate(buffer: &TextBuffer) -> Option<usize> {
    buffer.to_utf8_string().err().and_then(|err| match err {
        text_core::TextError::InvalidUtf16 { index } => Some(index),
        _ => None,
    })
}
