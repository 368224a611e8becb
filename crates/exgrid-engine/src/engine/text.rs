//! Header-name normalization helpers.
//!
//! Pure string functions used to turn free-form header text such as
//! `"Net Revenue (USD)"` into identifiers like `"netRevenue"`.

use regex::Regex;
use std::sync::LazyLock;

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?\([^)]+\)").expect("parenthetical pattern is valid"));
static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(_|-)+").expect("separator pattern is valid"));

/// Remove parentheses together with their contents and one leading space.
pub fn strip_parentheticals(input: &str) -> String {
    PARENTHETICAL.replace_all(input, "").into_owned()
}

/// Remove every ASCII punctuation character.
pub fn strip_punctuation(input: &str) -> String {
    input.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Convert to lower camel case ("total_net-sales" -> "totalNetSales").
///
/// Inputs of at most one character are returned unchanged.
pub fn to_identifier_case(input: &str) -> String {
    if input.chars().count() <= 1 {
        return input.to_string();
    }

    let spaced = SEPARATOR_RUN.replace_all(input, " ");
    let joined: String = title_case(&spaced)
        .chars()
        .filter(|c| *c != ' ' && *c != '\n')
        .collect();

    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_letter = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}
