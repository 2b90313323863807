//! Line-oriented `s/pattern/replacement/flags` substitutions.
//!
//! The pattern is literal text. In the replacement operand `&` stands for the
//! matched text and a backslash makes the next character literal, so `\&`,
//! `\\` and an escaped delimiter all insert themselves. Values coming from a
//! configuration document reach an expression only through
//! [`crate::escape::escape_with_delimiter`].

use crate::error::{Error, Result};
use crate::escape::{escape_with_delimiter, DEFAULT_DELIMITER};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Matched,
}

/// A compiled substitution expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pattern: String,
    replacement: Vec<Piece>,
    global: bool,
}

impl Substitution {
    /// Parses an expression such as `s/{NAME}/value/g`.
    ///
    /// The character following `s` is the delimiter. The only supported flag
    /// is `g`.
    ///
    /// # Errors
    /// * `Error::SubstitutionError` if the expression is not of the form
    ///   `s<d>pattern<d>replacement<d>flags`, the pattern is empty, an
    ///   unknown flag is given or the replacement ends in a lone backslash
    pub fn parse(expr: &str) -> Result<Self> {
        let mut chars = expr.chars();
        if chars.next() != Some('s') {
            return Err(Error::SubstitutionError(format!(
                "expression must start with 's': {expr}"
            )));
        }
        let delimiter = chars.next().ok_or_else(|| {
            Error::SubstitutionError(format!("missing delimiter: {expr}"))
        })?;
        if delimiter == '\\' || delimiter.is_alphanumeric() || delimiter == '\n' {
            return Err(Error::SubstitutionError(format!(
                "invalid delimiter '{delimiter}'"
            )));
        }

        let fields = split_fields(chars.as_str(), delimiter);
        let [pattern, replacement, flags] = fields.as_slice() else {
            return Err(Error::SubstitutionError(format!(
                "expected 3 fields separated by '{delimiter}': {expr}"
            )));
        };

        let pattern = unescape(pattern);
        if pattern.is_empty() {
            return Err(Error::SubstitutionError("empty pattern".to_string()));
        }

        let mut global = false;
        for flag in flags.chars() {
            match flag {
                'g' => global = true,
                other => {
                    return Err(Error::SubstitutionError(format!("unknown flag '{other}'")))
                }
            }
        }

        Ok(Self { pattern, replacement: compile_replacement(replacement)?, global })
    }

    /// Builds the global substitution of the `{NAME}` token by `value`.
    ///
    /// The value is escaped once here and the compiled operand is reused for
    /// every line the substitution is applied to.
    pub fn for_placeholder(name: &str, value: &str) -> Result<Self> {
        let token = format!("{{{name}}}");
        let expr = format!(
            "s{d}{}{d}{}{d}g",
            escape_with_delimiter(&token, DEFAULT_DELIMITER),
            escape_with_delimiter(value, DEFAULT_DELIMITER),
            d = DEFAULT_DELIMITER
        );
        Self::parse(&expr)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Produces the replacement text for one occurrence of the pattern.
    pub fn replacement_for(&self, matched: &str) -> String {
        let mut out = String::new();
        for piece in &self.replacement {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Matched => out.push_str(matched),
            }
        }
        out
    }

    /// Applies the substitution to a single line.
    pub fn apply(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut rest = line;
        while let Some(pos) = rest.find(&self.pattern) {
            out.push_str(&rest[..pos]);
            out.push_str(&self.replacement_for(&self.pattern));
            rest = &rest[pos + self.pattern.len()..];
            if !self.global {
                break;
            }
        }
        out.push_str(rest);
        out
    }
}

/// Splits at unescaped delimiters. Escape sequences are kept intact.
fn split_fields(body: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            current.push(ch);
            if let Some(next) = chars.next() {
                current.push(next);
            }
        } else if ch == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn compile_replacement(raw: &str) -> Result<Vec<Piece>> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(next) => literal.push(next),
                None => {
                    return Err(Error::SubstitutionError(
                        "replacement ends with a lone backslash".to_string(),
                    ))
                }
            },
            '&' => {
                if !literal.is_empty() {
                    pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                }
                pieces.push(Piece::Matched);
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let sub = Substitution::parse("s/foo/bar/g").unwrap();
        assert_eq!(sub.pattern(), "foo");
        assert!(sub.is_global());
        assert_eq!(sub.apply("foo foo"), "bar bar");
    }

    #[test]
    fn test_without_global_flag_only_first_occurrence() {
        let sub = Substitution::parse("s/foo/bar/").unwrap();
        assert_eq!(sub.apply("foo foo"), "bar foo");
    }

    #[test]
    fn test_unescaped_ampersand_inserts_match() {
        let sub = Substitution::parse("s/cat/[&]/g").unwrap();
        assert_eq!(sub.apply("a cat"), "a [cat]");
    }

    #[test]
    fn test_escaped_specials_are_literal() {
        let sub = Substitution::parse(r"s/x/a\&b\/c\\d/g").unwrap();
        assert_eq!(sub.apply("x"), r"a&b/c\d");
    }

    #[test]
    fn test_unescaped_delimiter_in_value_breaks_expression() {
        assert!(Substitution::parse("s/x/a/b/g").is_err());
    }

    #[test]
    fn test_custom_delimiter() {
        let sub = Substitution::parse("s|x|a/b|g").unwrap();
        assert_eq!(sub.apply("x"), "a/b");
    }

    #[test]
    fn test_rejects_malformed_expressions() {
        assert!(Substitution::parse("").is_err());
        assert!(Substitution::parse("y/a/b/").is_err());
        assert!(Substitution::parse("s//b/g").is_err());
        assert!(Substitution::parse("s/a/b/q").is_err());
        assert!(Substitution::parse("s/a/b\\").is_err());
    }

    #[test]
    fn test_placeholder_round_trip() {
        let values = [
            "plain",
            "my-project&name/with\\chars",
            r"\\&&//",
            "",
            "ends with \\",
            "pipes | and `ticks` <x> 'q' \"dq\"",
        ];
        for value in values {
            let sub = Substitution::for_placeholder("PROJECT_NAME", value).unwrap();
            assert_eq!(sub.apply("{PROJECT_NAME}"), value, "value: {value:?}");
        }
    }
}
