//! Find/replace example
//!
//! Demonstrates pattern matching and the three substitution directives.

use std::collections::HashMap;

use text_core::{
    MatchCaptures, MatchOptions, Pattern, PatternOptions, Replacement, TextBuffer, TextInput,
    substitute,
};

fn main() {
    let text = TextBuffer::from_str("hello world from Lua");
    let pattern = Pattern::compile(r"(\w+)\s*(\w+)", PatternOptions::default()).unwrap();

    // First match, with captures reported in UTF-16 unit space.
    let m = pattern
        .first_match(TextInput::Buffer(&text), None, None, MatchOptions::default())
        .unwrap()
        .unwrap();
    println!("whole match: [{}, {}]", m.range.start, m.range.end);
    for (k, capture) in m.captures.iter().enumerate() {
        match capture {
            Some(range) => println!("  capture {}: [{}, {}]", k + 1, range.start, range.end),
            None => println!("  capture {}: absent", k + 1),
        }
    }

    // Template substitution with $n backreferences.
    let (swapped, count) = substitute(
        &pattern,
        TextInput::Buffer(&text),
        Replacement::Template("$2 $1".to_string()),
        None,
    )
    .unwrap();
    println!("template: {:?} ({} replacements)", swapped.into_buffer().unwrap().to_string_lossy(), count);

    // Lookup-table substitution keyed by the first capture.
    let word = Pattern::compile(r"(\w+)", PatternOptions::default()).unwrap();
    let table: HashMap<String, String> = [
        ("hello".to_string(), "bonjour".to_string()),
        ("world".to_string(), "monde".to_string()),
    ]
    .into();
    let (translated, count) =
        substitute(&word, TextInput::Buffer(&text), Replacement::Lookup(table), None).unwrap();
    println!("lookup: {:?} ({} replacements)", translated.into_buffer().unwrap().to_string_lossy(), count);

    // Callback substitution.
    let mut shout = |caps: &MatchCaptures| -> Result<Option<String>, String> {
        Ok(Some(caps.whole.to_uppercase()))
    };
    let (shouted, _) =
        substitute(&word, TextInput::Buffer(&text), Replacement::Callback(&mut shout), Some(2))
            .unwrap();
    println!("callback: {:?}", shouted.into_buffer().unwrap().to_string_lossy());
}
