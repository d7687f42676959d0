use std::cmp::Ordering;

use text_core::{CompareOptions, Locale, TextBuffer, TextError};

#[test]
fn test_len_counts_units_not_characters() {
    let buffer = TextBuffer::from_str("a𝄞b");
    assert_eq!(buffer.len(), 4);
    assert_eq!(buffer.character_count(false, None, None), Ok(3));
    assert_eq!(buffer.character_count(true, None, None), Ok(3));
}

#[test]
fn test_character_count_composed_vs_codepoints() {
    // "e" + combining acute + "x": three codepoints, two composed characters
    let buffer = TextBuffer::from_str("e\u{301}x");
    assert_eq!(buffer.character_count(false, None, None), Ok(3));
    assert_eq!(buffer.character_count(true, None, None), Ok(2));
}

#[test]
fn test_character_count_reports_lone_surrogate() {
    let buffer = TextBuffer::from_units(vec![0x61, 0xD800]);
    assert_eq!(
        buffer.character_count(false, None, None),
        Err(TextError::InvalidUtf16 { index: 2 })
    );
}

#[test]
fn test_character_count_range_straddling_pair_is_invalid() {
    // [i, j] = [1, 2] cuts the pair in "a𝄞" after its high half.
    let buffer = TextBuffer::from_str("a𝄞");
    assert_eq!(
        buffer.character_count(false, Some(1), Some(2)),
        Err(TextError::InvalidUtf16 { index: 2 })
    );
    assert_eq!(buffer.character_count(false, Some(1), Some(3)), Ok(2));
}

#[test]
fn test_character_count_range_straddling_cluster_is_invalid_when_composed() {
    // Composed counting rejects a range that ends between "e" and its mark.
    let buffer = TextBuffer::from_str("e\u{301}x");
    assert_eq!(
        buffer.character_count(true, Some(1), Some(1)),
        Err(TextError::InvalidUtf16 { index: 1 })
    );
    // Codepoint counting is happy with the same range.
    assert_eq!(buffer.character_count(false, Some(1), Some(1)), Ok(1));
}

#[test]
fn test_sub_clamps_and_may_split_pairs() {
    let buffer = TextBuffer::from_str("a𝄞b");
    assert_eq!(buffer.sub(2, Some(10)).unwrap().to_string_lossy(), "𝄞b");
    assert_eq!(buffer.sub(-1, None).unwrap().to_string_lossy(), "b");
    assert_eq!(buffer.sub(-9, Some(1)).unwrap().to_string_lossy(), "a");
    assert_eq!(buffer.sub(3, Some(2)).unwrap().len(), 0);
    // Raw unit slicing splits the pair; the documented caveat, not a bug.
    let split = buffer.sub(2, Some(2)).unwrap();
    assert_eq!(split.units(), &[0xD834]);
}

#[test]
fn test_sub_start_beyond_end_is_an_error() {
    let buffer = TextBuffer::from_str("a𝄞b");
    assert_eq!(
        buffer.sub(5, None),
        Err(TextError::IndexOutOfRange { index: 5, len: 4 })
    );
}

#[test]
fn test_unit_character_is_strict_about_range() {
    let buffer = TextBuffer::from_str("a𝄞");
    assert_eq!(buffer.unit_character(2, Some(3)), Ok(vec![0xD834, 0xDD1E]));
    assert_eq!(
        buffer.unit_character(4, None),
        Err(TextError::IndexOutOfRange { index: 4, len: 3 })
    );
}

#[test]
fn test_codepoint_consumes_pairs_and_rejects_lone_low() {
    let buffer = TextBuffer::from_str("a𝄞b");
    assert_eq!(buffer.codepoint(Some(2), None), Ok(vec![0x1D11E]));
    assert_eq!(buffer.codepoint(Some(1), Some(4)), Ok(vec![0x61, 0x1D11E, 0x62]));
    // Index 3 is the low half of the pair.
    assert_eq!(
        buffer.codepoint(Some(3), None),
        Err(TextError::InvalidUtf16 { index: 3 })
    );
}

#[test]
fn test_codepoint_out_of_range_errors() {
    let buffer = TextBuffer::from_str("ab");
    assert_eq!(
        buffer.codepoint(Some(3), None),
        Err(TextError::IndexOutOfRange { index: 3, len: 2 })
    );
}

#[test]
fn test_offset_walks_codepoints() {
    // units: a=1, pair=2..3, b=4; end cursor = 5
    let buffer = TextBuffer::from_str("a𝄞b");
    assert_eq!(buffer.offset(false, 1, Some(1)), Ok(Some(2)));
    assert_eq!(buffer.offset(false, 2, Some(1)), Ok(Some(4)));
    assert_eq!(buffer.offset(false, 3, Some(1)), Ok(Some(5)));
    assert_eq!(buffer.offset(false, 4, Some(1)), Ok(None));
    assert_eq!(buffer.offset(false, -1, None), Ok(Some(4)));
    assert_eq!(buffer.offset(false, -3, None), Ok(Some(1)));
    assert_eq!(buffer.offset(false, -4, None), Ok(None));
}

#[test]
fn test_offset_zero_snaps_to_character_start() {
    let buffer = TextBuffer::from_str("a𝄞b");
    assert_eq!(buffer.offset(false, 0, Some(3)), Ok(Some(2)));
    assert_eq!(buffer.offset(false, 0, Some(2)), Ok(Some(2)));
}

#[test]
fn test_offset_rejects_mid_character_start_for_nonzero_n() {
    let buffer = TextBuffer::from_str("a𝄞b");
    assert_eq!(
        buffer.offset(false, 1, Some(3)),
        Err(TextError::MidCharacter { index: 3 })
    );
}

#[test]
fn test_offset_composed_treats_cluster_as_one() {
    // clusters: "e"+mark = units 1..2, "x" = unit 3
    let buffer = TextBuffer::from_str("e\u{301}x");
    assert_eq!(buffer.offset(true, 1, Some(1)), Ok(Some(3)));
    assert_eq!(buffer.offset(false, 1, Some(1)), Ok(Some(2)));
}

#[test]
fn test_composed_character_range_covers_and_is_idempotent() {
    let buffer = TextBuffer::from_str("e\u{301}𝄞x");
    let (start, end) = buffer.composed_character_range(2, 3).unwrap();
    assert!(start <= 2 && end >= 3);
    assert_eq!(buffer.composed_character_range(start, end), Ok((start, end)));
    assert_eq!(buffer.composed_character_range(1, 1), Ok((1, 2)));
    assert_eq!(
        buffer.composed_character_range(9, 9),
        Err(TextError::IndexOutOfRange { index: 9, len: 5 })
    );
}

#[test]
fn test_reverse_preserves_pairs_and_clusters() {
    assert_eq!(TextBuffer::from_str("a𝄞b").reverse().to_string_lossy(), "b𝄞a");
    assert_eq!(
        TextBuffer::from_str("ae\u{301}").reverse().to_string_lossy(),
        "e\u{301}a"
    );
}

#[test]
fn test_reverse_is_an_involution() {
    for text in ["", "plain", "a𝄞b", "e\u{301}x👍🏽", "日本語"] {
        let buffer = TextBuffer::from_str(text);
        assert_eq!(buffer.reverse().reverse(), buffer);
    }
}

#[test]
fn test_reverse_keeps_lone_surrogates() {
    let buffer = TextBuffer::from_units(vec![0x61, 0xD800]);
    assert_eq!(buffer.reverse().units(), &[0xD800, 0x61]);
}

#[test]
fn test_case_operations() {
    let buffer = TextBuffer::from_str("mixed CASE straße");
    assert_eq!(
        buffer.uppercase(&Locale::Canonical).to_string_lossy(),
        "MIXED CASE STRASSE"
    );
    assert_eq!(
        buffer.lowercase(&Locale::Canonical).to_string_lossy(),
        "mixed case straße"
    );
    assert_eq!(
        buffer.capitalized(&Locale::Canonical).to_string_lossy(),
        "Mixed Case Straße"
    );
}

#[test]
fn test_compare_standard_composite() {
    let options = CompareOptions::standard();
    let a = TextBuffer::from_str("File9");
    let b = TextBuffer::from_str("file10");
    assert_eq!(a.compare(&b, options, &Locale::Canonical), Ordering::Less);
    let same = TextBuffer::from_str("file9");
    assert_ne!(a.compare(&same, options, &Locale::Canonical), Ordering::Equal);
    assert_eq!(
        a.compare(&a.copy(), options, &Locale::Canonical),
        Ordering::Equal
    );
}

#[test]
fn test_normalization_forms() {
    let decomposed = TextBuffer::from_str("e\u{301}");
    let composed = decomposed.unicode_composition(false).unwrap();
    assert_eq!(composed.to_string_lossy(), "\u{E9}");
    assert_eq!(
        composed.unicode_decomposition(false).unwrap().to_string_lossy(),
        "e\u{301}"
    );
    // Compatibility mapping folds the ligature.
    let ligature = TextBuffer::from_str("ﬁn");
    assert_eq!(
        ligature.unicode_composition(true).unwrap().to_string_lossy(),
        "fin"
    );
}

#[test]
fn test_normalization_requires_well_formed_buffer() {
    let buffer = TextBuffer::from_units(vec![0xDC00]);
    assert_eq!(
        buffer.unicode_composition(false),
        Err(TextError::InvalidUtf16 { index: 1 })
    );
}
