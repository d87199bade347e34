//! Text normalization helpers used when turning messages into features.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PUNCTUATIONS: Regex = Regex::new(r"[.^,@!?$\-]").unwrap();
    static ref PUNCTUATIONS_AND_NEWLINE: Regex = Regex::new(r"[.^,@!?$\-\n]|\r\n").unwrap();
    // at least 8 digits and nothing else, so short codes are not numeric senders
    static ref NUMERIC: Regex = Regex::new(r"^[0-9]{8,}$").unwrap();
    // anything but letters, digits, underscores and spaces
    static ref LETTERS_AND_DIGITS: Regex = Regex::new(r"[^\w ]|_'").unwrap();
}

/// True if `msisdn` is a numeric sender of at least 8 digits. Anything else is an
/// alphanumeric or short-code sender.
pub fn is_numeric_msisdn(msisdn: &str) -> bool {
    NUMERIC.is_match(msisdn)
}

/// True if `word` has both digits and non-digit characters. Digits mixed only with
/// special characters count as alphanumeric too.
pub fn is_alphanumeric_word(word: &str) -> bool {
    let has_digits = word.chars().any(|c| c.is_ascii_digit());
    let has_non_digits = word.chars().any(|c| !c.is_ascii_digit());
    has_digits && has_non_digits
}

/// True if `word` contains a character other than a letter, a digit or an apostrophe.
///
/// The last character is not inspected, so a single trailing special character
/// (`"hello!"`) is accepted.
pub fn has_special_characters(word: &str) -> bool {
    let count = word.chars().count();
    word.chars()
        .take(count.saturating_sub(1))
        .any(|c| !c.is_alphanumeric() && c != '\'')
}

pub fn remove_punctuations(text: &str) -> String {
    PUNCTUATIONS.replace_all(text, "").into_owned()
}

pub fn remove_punctuations_and_newline(text: &str) -> String {
    PUNCTUATIONS_AND_NEWLINE.replace_all(text, "").into_owned()
}

pub fn keep_letters_and_digits(text: &str) -> String {
    LETTERS_AND_DIGITS.replace_all(text, "").into_owned()
}

/// Splits a message into lower-case words without punctuation, dropping numeric msisdns.
pub fn tokenize(text: &str) -> Vec<String> {
    remove_punctuations(&text.to_lowercase())
        .split_whitespace()
        .filter(|word| !is_numeric_msisdn(word))
        .map(str::to_string)
        .collect()
}
