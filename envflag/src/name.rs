//! Casing conversions between field identifiers, flag names and environment
//! keys.
//!
//! Canonical field names are built by concatenating `UpperCamelCase`
//! identifiers (`Nested` + `Float`), so word boundaries survive only as case
//! changes. Both conversions recover those boundaries the same way and differ
//! only in the separator and the case of the output:
//!
//! ```rust
//! use envflag::name::{to_kebab_case, to_upper_snake_case};
//!
//! assert_eq!(to_kebab_case("HTTPRequest"), "http-request");
//! assert_eq!(to_upper_snake_case("NestedFloat"), "NESTED_FLOAT");
//! ```

const KEBAB_SEPARATOR: char = '-';
const SNAKE_SEPARATOR: char = '_';

/// Converts `name` into a `kebab-case` command-line flag name.
///
/// Underscores in the input become hyphens, so the result never contains
/// `_`. Input already in kebab case is returned unchanged.
#[must_use]
pub fn to_kebab_case(name: &str) -> String {
    split_words(name, KEBAB_SEPARATOR).to_lowercase()
}

/// Converts `name` into an `UPPER_SNAKE_CASE` environment variable key.
///
/// Hyphens in the input become underscores, so the result never contains
/// `-`. Input already in upper snake case is returned unchanged.
#[must_use]
pub fn to_upper_snake_case(name: &str) -> String {
    split_words(name, SNAKE_SEPARATOR).to_uppercase()
}

const fn is_separator(c: char) -> bool {
    matches!(c, KEBAB_SEPARATOR | SNAKE_SEPARATOR)
}

fn split_words(name: &str, separator: char) -> String {
    let chars: Vec<char> = name
        .chars()
        .map(|c| if is_separator(c) { separator } else { c })
        .collect();
    let words = mark_capitalised_words(&chars, separator);
    mark_case_transitions(&words, separator)
        .into_iter()
        .collect()
}

/// Length of a capitalised word (`[A-Z][a-z]+`) at the start of `chars`, or
/// zero when none begins there.
fn capitalised_word_len(chars: &[char]) -> usize {
    let Some((first, tail)) = chars.split_first() else {
        return 0;
    };
    if !first.is_ascii_uppercase() {
        return 0;
    }
    match tail.iter().take_while(|c| c.is_ascii_lowercase()).count() {
        0 => 0,
        lower => lower + 1,
    }
}

/// Separates any character from a capitalised word that follows it.
///
/// Scans left to right without overlap: once a character and its following
/// word are emitted, scanning resumes after the word.
fn mark_capitalised_words(chars: &[char], separator: char) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() + 4);
    let mut rest = chars;
    while let Some((&c, tail)) = rest.split_first() {
        out.push(c);
        let word = capitalised_word_len(tail);
        if word == 0 {
            rest = tail;
            continue;
        }
        if !is_separator(c) {
            out.push(separator);
        }
        let (captured, remaining) = tail.split_at(word);
        out.extend_from_slice(captured);
        rest = remaining;
    }
    out
}

/// Separates a lowercase letter or digit from an uppercase letter that
/// immediately follows it.
fn mark_case_transitions(chars: &[char], separator: char) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() + 4);
    let mut iter = chars.iter().copied().peekable();
    while let Some(c) = iter.next() {
        out.push(c);
        if !(c.is_ascii_lowercase() || c.is_ascii_digit()) {
            continue;
        }
        if let Some(next) = iter.next_if(char::is_ascii_uppercase) {
            out.push(separator);
            out.push(next);
        }
    }
    out
}
