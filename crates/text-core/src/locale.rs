//! Locale-mode selection and the case/collation collaborator seam.
//!
//! Case mapping and collation are delegated to a [`LocaleServices`]
//! implementation. The shipped [`CanonicalLocaleServices`] applies canonical
//! (non-localized) Unicode rules and treats the system and named-locale modes
//! as canonical; a host that has real locale data plugs in its own
//! implementation behind the same trait.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use unicode_segmentation::UnicodeSegmentation;

/// Which locale rules a case or comparison operation should follow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Locale {
    /// Canonical, non-localized Unicode rules.
    #[default]
    Canonical,
    /// The system locale.
    System,
    /// An explicit locale identifier such as `"tr_TR"`.
    Named(String),
}

/// String comparison option flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompareOptions {
    /// Fold letter case before comparing.
    pub case_insensitive: bool,
    /// Compare code units exactly, skipping canonical normalization.
    pub literal: bool,
    /// Compare runs of ASCII digits by numeric value, so `"file9"` sorts
    /// before `"file10"`.
    pub numeric: bool,
    /// Ignore combining marks, so `"é"` compares equal to `"e"`.
    pub diacritic_insensitive: bool,
    /// Fold halfwidth and fullwidth compatibility forms, so `"Ａ"` compares
    /// equal to `"A"`.
    pub width_insensitive: bool,
    /// When everything else says equal but the inputs differ literally,
    /// fall back to literal ordering instead of reporting equality.
    pub forced_ordering: bool,
}

impl CompareOptions {
    /// The convenience composite used for user-visible lists: case
    /// insensitive, numeric, width insensitive, forced ordering.
    pub fn standard() -> Self {
        Self {
            case_insensitive: true,
            numeric: true,
            width_insensitive: true,
            forced_ordering: true,
            ..Default::default()
        }
    }
}

/// The external collaborator interface for case mapping and collation.
pub trait LocaleServices {
    /// Uppercases `text` under `locale`.
    fn uppercase(&self, text: &str, locale: &Locale) -> String;
    /// Lowercases `text` under `locale`.
    fn lowercase(&self, text: &str, locale: &Locale) -> String;
    /// Titlecases the first letter of each word and lowercases the rest.
    fn capitalized(&self, text: &str, locale: &Locale) -> String;
    /// Three-way comparison under `options` and `locale`.
    fn compare(&self, a: &str, b: &str, options: CompareOptions, locale: &Locale) -> Ordering;
}

/// Canonical (non-localized) implementation of [`LocaleServices`]; the
/// system and named-locale modes fall back to canonical rules here.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalLocaleServices;

impl LocaleServices for CanonicalLocaleServices {
    fn uppercase(&self, text: &str, _locale: &Locale) -> String {
        text.to_uppercase()
    }

    fn lowercase(&self, text: &str, _locale: &Locale) -> String {
        text.to_lowercase()
    }

    fn capitalized(&self, text: &str, _locale: &Locale) -> String {
        let mut out = String::with_capacity(text.len());
        for word in text.split_word_bounds() {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) if first.is_alphanumeric() => {
                    out.push_str(&titlecase_first(first));
                    out.push_str(&chars.as_str().to_lowercase());
                }
                _ => out.push_str(word),
            }
        }
        out
    }

    fn compare(&self, a: &str, b: &str, options: CompareOptions, _locale: &Locale) -> Ordering {
        let folded_a = fold_for_compare(a, options);
        let folded_b = fold_for_compare(b, options);
        let ordering = if options.numeric {
            numeric_compare(&folded_a, &folded_b)
        } else {
            folded_a.cmp(&folded_b)
        };
        if ordering == Ordering::Equal && options.forced_ordering {
            a.cmp(b)
        } else {
            ordering
        }
    }
}

/// Titlecase for a single leading character. Differs from uppercase for the
/// Latin digraphs and sharp s, which titlecase to mixed-case forms.
fn titlecase_first(ch: char) -> String {
    match ch {
        '\u{01C7}' | '\u{01C9}' => "\u{01C8}".to_string(), // Lj
        '\u{01CA}' | '\u{01CC}' => "\u{01CB}".to_string(), // Nj
        '\u{01F1}' | '\u{01F3}' => "\u{01F2}".to_string(), // Dz
        '\u{00DF}' => "Ss".to_string(),
        _ => ch.to_uppercase().to_string(),
    }
}

fn fold_for_compare(text: &str, options: CompareOptions) -> String {
    let mut folded: String = if options.literal {
        text.to_string()
    } else {
        text.nfc().collect()
    };
    if options.diacritic_insensitive {
        folded = folded.nfd().filter(|ch| !is_combining_mark(*ch)).collect();
    }
    if options.width_insensitive {
        let mut out = String::with_capacity(folded.len());
        for ch in folded.chars() {
            // NFKC maps the Halfwidth and Fullwidth Forms block back onto the
            // ordinary characters; other compatibility mappings are left alone.
            if ('\u{FF00}'..='\u{FFEF}').contains(&ch) {
                out.extend(std::iter::once(ch).nfkc());
            } else {
                out.push(ch);
            }
        }
        folded = out;
    }
    if options.case_insensitive {
        folded = folded.to_lowercase();
    }
    folded
}

/// Compares with ASCII digit runs ordered by numeric value; non-digit
/// stretches compare character by character.
fn numeric_compare(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();
    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = take_digit_run(&mut ca);
                let run_b = take_digit_run(&mut cb);
                let ordering = compare_digit_runs(&run_a, &run_b);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                ca.next();
                cb.next();
            }
        }
    }
}

fn take_digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_digit() {
            run.push(ch);
            chars.next();
        } else {
            break;
        }
    }
    run
}

/// Compares two ASCII digit runs by numeric value without parsing into a
/// fixed-width integer: strip leading zeros, then longer wins, then
/// digit-by-digit.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
