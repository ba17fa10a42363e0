// src/utils/text.rs

//! Text normalization helpers for feed fields.

use std::sync::OnceLock;

use regex::Regex;

static NON_DIGITS: OnceLock<Regex> = OnceLock::new();

/// Remove every non-digit character.
///
/// `"3-кімнатна"` becomes `"3"`. A value with no digits at all becomes
/// the empty string, matching the original stripping behavior.
pub fn strip_non_digits(s: &str) -> String {
    let re = NON_DIGITS.get_or_init(|| Regex::new("[^0-9]").expect("static pattern"));
    re.replace_all(s, "").into_owned()
}

/// Uppercase the first character, leaving the rest untouched.
///
/// Fallback for category/type values missing from the translation table;
/// inputs are already lower-cased at that point.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Replace spaces with underscores so the value works as a hashtag.
pub fn underscored(s: &str) -> String {
    s.replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_unit_suffixes() {
        assert_eq!(strip_non_digits("3-кімнатна"), "3");
        assert_eq!(strip_non_digits("54 м²"), "54");
        assert_eq!(strip_non_digits("сот"), "");
    }

    #[test]
    fn capitalizes_cyrillic() {
        assert_eq!(capitalize_first("сад"), "Сад");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn underscores_spaces() {
        assert_eq!(underscored("Великий Фонтан"), "Великий_Фонтан");
    }
}
