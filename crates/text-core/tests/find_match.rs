use text_core::{
    MatchOptions, Pattern, PatternOptions, TextBuffer, TextError, TextInput,
};

fn compile(source: &str) -> Pattern {
    Pattern::compile(source, PatternOptions::default()).unwrap()
}

#[test]
fn test_first_match_in_unit_space() {
    // "𝄞" occupies units 2..3, so "b" sits at unit 4.
    let buffer = TextBuffer::from_str("a𝄞b");
    let m = compile("b")
        .first_match(TextInput::Buffer(&buffer), None, None, MatchOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!((m.range.start, m.range.end), (4, 4));
}

#[test]
fn test_first_match_in_byte_space() {
    // "𝄞" occupies bytes 2..5, so "b" sits at byte 6.
    let m = compile("b")
        .first_match(TextInput::Bytes("a𝄞b".as_bytes()), None, None, MatchOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!((m.range.start, m.range.end), (6, 6));
}

#[test]
fn test_capture_ranges_translate_to_caller_space() {
    let buffer = TextBuffer::from_str("x𝄞ab");
    let m = compile("(𝄞)(a)")
        .first_match(TextInput::Buffer(&buffer), None, None, MatchOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!((m.range.start, m.range.end), (2, 4));
    assert_eq!(m.captures.len(), 2);
    let g1 = m.captures[0].unwrap();
    let g2 = m.captures[1].unwrap();
    assert_eq!((g1.start, g1.end), (2, 3));
    assert_eq!((g2.start, g2.end), (4, 4));
}

#[test]
fn test_unmatched_optional_capture_is_absent() {
    let buffer = TextBuffer::from_str("b");
    let m = compile("(a)|(b)")
        .first_match(TextInput::Buffer(&buffer), None, None, MatchOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(m.captures[0], None);
    assert!(m.captures[1].is_some());
}

#[test]
fn test_negative_indices_resolve_from_end() {
    let buffer = TextBuffer::from_str("abcabc");
    let m = compile("abc")
        .first_match(TextInput::Buffer(&buffer), Some(-3), None, MatchOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!((m.range.start, m.range.end), (4, 6));
}

#[test]
fn test_out_of_range_index_errors_before_matching() {
    let buffer = TextBuffer::from_str("abc");
    let err = compile("a")
        .first_match(TextInput::Buffer(&buffer), Some(5), None, MatchOptions::default())
        .unwrap_err();
    assert_eq!(err, TextError::IndexOutOfRange { index: 5, len: 3 });

    let err = compile("a")
        .first_match(TextInput::Buffer(&buffer), None, Some(-9), MatchOptions::default())
        .unwrap_err();
    assert_eq!(err, TextError::IndexOutOfRange { index: -9, len: 3 });
}

#[test]
fn test_byte_input_must_be_utf8() {
    let err = compile("a")
        .first_match(TextInput::Bytes(&[0x61, 0xC0, 0x61]), None, None, MatchOptions::default())
        .unwrap_err();
    assert_eq!(err, TextError::InvalidUtf8 { index: 2 });
}

#[test]
fn test_byte_index_inside_character_snaps_forward() {
    // Byte 2 lands inside "日" (bytes 1..4); the search starts at "x" instead.
    let bytes = "a日x日".as_bytes();
    let m = compile("[x日]")
        .first_match(TextInput::Bytes(bytes), Some(3), None, MatchOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!((m.range.start, m.range.end), (5, 5));
}

#[test]
fn test_case_insensitive_option() {
    let pattern = Pattern::compile(
        "hello",
        PatternOptions { case_insensitive: true, ..Default::default() },
    )
    .unwrap();
    let buffer = TextBuffer::from_str("say HELLO");
    let m = pattern
        .first_match(TextInput::Buffer(&buffer), None, None, MatchOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!((m.range.start, m.range.end), (5, 9));
}

#[test]
fn test_anchors_match_lines_option() {
    let pattern = Pattern::compile(
        "^b$",
        PatternOptions { anchors_match_lines: true, ..Default::default() },
    )
    .unwrap();
    let buffer = TextBuffer::from_str("a\nb\nc");
    let m = pattern
        .first_match(TextInput::Buffer(&buffer), None, None, MatchOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!((m.range.start, m.range.end), (3, 3));
}

#[test]
fn test_match_iter_is_ordered_and_non_overlapping() {
    let buffer = TextBuffer::from_str("aa aa aa");
    let pattern = compile("aa");
    let ranges: Vec<(i64, i64)> = pattern
        .match_iter(TextInput::Buffer(&buffer), None)
        .unwrap()
        .map(|m| (m.range.start, m.range.end))
        .collect();
    assert_eq!(ranges, [(1, 2), (4, 5), (7, 8)]);
    let mut previous_end = 0;
    for (start, end) in ranges {
        assert!(start > previous_end);
        previous_end = end;
    }
}

#[test]
fn test_match_iter_from_start_index() {
    let buffer = TextBuffer::from_str("aaa");
    let pattern = compile("a");
    let found: Vec<i64> = pattern
        .match_iter(TextInput::Buffer(&buffer), Some(2))
        .unwrap()
        .map(|m| m.range.start)
        .collect();
    assert_eq!(found, [2, 3]);
}

#[test]
fn test_empty_pattern_on_empty_buffer() {
    let buffer = TextBuffer::new();
    let m = compile("")
        .first_match(TextInput::Buffer(&buffer), None, None, MatchOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!((m.range.start, m.range.end), (1, 0));
    assert!(m.range.is_empty());
}
