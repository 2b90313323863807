//! Escaping of configuration values for use as the replacement operand of a
//! `s/pattern/replacement/flags` substitution.
//!
//! The order of the steps is fixed: backslashes first, then ampersands, then
//! the delimiter. Later steps introduce backslashes of their own, which must
//! not be doubled by the first step.

/// Default delimiter of a substitution expression.
pub const DEFAULT_DELIMITER: char = '/';

/// Escapes `value` for a substitution expression delimited by `/`.
///
/// # Example
/// ```
/// use setupgen::escape::escape_for_substitution;
///
/// assert_eq!(escape_for_substitution(r"a&b/c\d"), r"a\&b\/c\\d");
/// ```
pub fn escape_for_substitution(value: &str) -> String {
    escape_with_delimiter(value, DEFAULT_DELIMITER)
}

/// Escapes `value` for a substitution expression using `delimiter`.
///
/// Only `\`, `&` and the delimiter are touched; every other character passes
/// through unchanged.
pub fn escape_with_delimiter(value: &str, delimiter: char) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\\' {
            escaped.push_str("\\\\");
        } else {
            escaped.push(ch);
        }
    }

    let escaped = escaped.replace('&', "\\&");

    if delimiter == '\\' || delimiter == '&' {
        return escaped;
    }
    let mut with_delimiter = String::with_capacity(escaped.len());
    for ch in escaped.chars() {
        if ch == delimiter {
            with_delimiter.push('\\');
        }
        with_delimiter.push(ch);
    }
    with_delimiter
}
