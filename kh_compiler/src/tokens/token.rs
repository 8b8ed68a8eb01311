//! Token kinds and text classification

use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const KEYWORDS: &[&str] = &[
    "whole",
    "fraction",
    "truth",
    "character",
    "while",
    "if",
    "else",
    "end",
    "say",
];

/// Keywords that introduce a variable declaration
pub const TYPE_KEYWORDS: &[&str] = &["whole", "fraction", "truth", "character"];

pub const BOOLEAN_LITERALS: &[&str] = &["yes", "no"];

/// Assignment arrow, matched before `-`
pub const ASSIGNMENT_OPERATOR: &str = "->";

/// Arithmetic and logical operators, longest first
pub const OPERATORS: &[&str] = &["&&", "||", "+", "-", "*", "/", "%", "^"];

pub const LOGICAL_OPERATORS: &[&str] = &["&&", "||"];

/// Comparison operators, two-character forms first
pub const COMPARISON_OPERATORS: &[&str] = &["<=", ">=", "==", "!=", "<", ">"];

pub const PUNCTUATION: &[char] = &['{', '}', '(', ')', ';', ',', ':'];

/// Maximum fractional digits a numeric constant may carry
pub const MAX_FRACTION_DIGITS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Constant,
    Literal,
    BooleanConstant,
    Operator,
    ComparisonOperator,
    AssignmentOperator,
    Punctuation,
    Unknown,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "Keyword",
            TokenKind::Identifier => "Identifier",
            TokenKind::Constant => "Constant",
            TokenKind::Literal => "Literal",
            TokenKind::BooleanConstant => "Boolean Constant",
            TokenKind::Operator => "Operator",
            TokenKind::ComparisonOperator => "Comparison Operator",
            TokenKind::AssignmentOperator => "Assignment Operator",
            TokenKind::Punctuation => "Punctuation",
            TokenKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified token with its location in the comment-stripped source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    #[serde(skip)]
    pub span: Span,
}

impl Token {
    /// Build a token, deriving its kind from the text
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        let text = text.into();
        let kind = classify(&text);
        Self { text, kind, span }
    }

    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    pub fn is_type_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword && TYPE_KEYWORDS.contains(&self.text.as_str())
    }

    pub fn is_logical_operator(&self) -> bool {
        LOGICAL_OPERATORS.contains(&self.text.as_str())
    }

    pub fn line(&self) -> u32 {
        self.span.start.line
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.text, self.kind)
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Assign exactly one kind; the first matching class wins
pub fn classify(text: &str) -> TokenKind {
    if is_keyword(text) {
        TokenKind::Keyword
    } else if is_identifier(text) {
        TokenKind::Identifier
    } else if is_numeric_constant(text) {
        TokenKind::Constant
    } else if is_quoted_literal(text) {
        TokenKind::Literal
    } else if OPERATORS.contains(&text) {
        TokenKind::Operator
    } else if COMPARISON_OPERATORS.contains(&text) {
        TokenKind::ComparisonOperator
    } else if text == ASSIGNMENT_OPERATOR {
        TokenKind::AssignmentOperator
    } else if is_punctuation(text) {
        TokenKind::Punctuation
    } else {
        TokenKind::Unknown
    }
}

pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

pub fn is_type_keyword(text: &str) -> bool {
    TYPE_KEYWORDS.contains(&text)
}

/// Lowercase word shape: `[a-z_][a-z0-9_]*`
pub fn is_lowercase_word(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first == '_' => chars
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
        _ => false,
    }
}

/// Lowercase word that is not a keyword. `yes` and `no` qualify: the
/// identifier class is tried before the boolean one.
pub fn is_identifier(text: &str) -> bool {
    is_lowercase_word(text) && !is_keyword(text)
}

/// `yes` or `no`, whatever kind the token was given
pub fn is_boolean_literal(text: &str) -> bool {
    BOOLEAN_LITERALS.contains(&text)
}

pub fn is_numeric_constant(text: &str) -> bool {
    !text.is_empty() && number_length(text) == text.len()
}

/// `digits[.digits]`; the initializer grammar places no cap on fraction length
pub fn is_plain_number(text: &str) -> bool {
    match text.split_once('.') {
        Some((whole, fraction)) => is_digits(whole) && is_digits(fraction),
        None => is_digits(text),
    }
}

/// Double-quoted string or single-character quoted literal
pub fn is_quoted_literal(text: &str) -> bool {
    is_string_literal(text) || is_char_literal(text)
}

pub fn is_string_literal(text: &str) -> bool {
    text.len() >= 2
        && text.starts_with('"')
        && text.ends_with('"')
        && !text[1..text.len() - 1].contains('"')
}

pub fn is_char_literal(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(
        (chars.next(), chars.next(), chars.next(), chars.next()),
        (Some('\''), Some(c), Some('\''), None) if c != '\''
    )
}

fn is_punctuation(text: &str) -> bool {
    let mut chars = text.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if PUNCTUATION.contains(&c))
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// NUMERIC CONSTANT GRAMMAR
// ============================================================================

fn digit_run_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    end
}

/// Extend past `.` followed by one to five digits, if present
fn fraction_end(bytes: &[u8], at: usize) -> usize {
    if bytes.get(at) != Some(&b'.') {
        return at;
    }
    let digits = digit_run_end(bytes, at + 1) - (at + 1);
    if digits == 0 {
        at
    } else {
        at + 1 + digits.min(MAX_FRACTION_DIGITS)
    }
}

/// Byte length of the numeric constant at the start of `text`, or 0.
///
/// Grammar: `digits [. 1-5 digits] [^ digits [. 1-5 digits]]`, matched
/// greedily. Extra fraction digits are left for the next token.
pub fn number_length(text: &str) -> usize {
    let bytes = text.as_bytes();

    let mut end = digit_run_end(bytes, 0);
    if end == 0 {
        return 0;
    }
    end = fraction_end(bytes, end);

    if bytes.get(end) == Some(&b'^') {
        let exponent_end = digit_run_end(bytes, end + 1);
        if exponent_end > end + 1 {
            end = fraction_end(bytes, exponent_end);
        }
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_order() {
        assert_eq!(classify("whole"), TokenKind::Keyword);
        assert_eq!(classify("say"), TokenKind::Keyword);
        assert_eq!(classify("x"), TokenKind::Identifier);
        assert_eq!(classify("num1"), TokenKind::Identifier);
        assert_eq!(classify("_tmp"), TokenKind::Identifier);
        assert_eq!(classify("10"), TokenKind::Constant);
        assert_eq!(classify("3.14159"), TokenKind::Constant);
        assert_eq!(classify("2^8"), TokenKind::Constant);
        assert_eq!(classify("\"hi there\""), TokenKind::Literal);
        assert_eq!(classify("'a'"), TokenKind::Literal);
        assert_eq!(classify("yes"), TokenKind::Identifier);
        assert_eq!(classify("no"), TokenKind::Identifier);
        assert_eq!(classify("%"), TokenKind::Operator);
        assert_eq!(classify("&&"), TokenKind::Operator);
        assert_eq!(classify(">="), TokenKind::ComparisonOperator);
        assert_eq!(classify("->"), TokenKind::AssignmentOperator);
        assert_eq!(classify(";"), TokenKind::Punctuation);
        assert_eq!(classify("="), TokenKind::Unknown);
        assert_eq!(classify("MyVar"), TokenKind::Unknown);
    }

    #[test]
    fn test_uppercase_words_are_not_identifiers() {
        assert!(!is_identifier("X"));
        assert!(!is_identifier("MyVar"));
        assert!(!is_identifier("1num"));
        assert!(!is_identifier("while"));
        assert!(is_identifier("yes"));
        assert!(is_boolean_literal("no"));
    }

    #[test]
    fn test_number_length() {
        assert_eq!(number_length("42;"), 2);
        assert_eq!(number_length("3.14)"), 4);
        assert_eq!(number_length("1.123456"), 7);
        assert_eq!(number_length("2^3.5"), 5);
        assert_eq!(number_length("7."), 1);
        assert_eq!(number_length("7^"), 1);
        assert_eq!(number_length("x1"), 0);
    }

    #[test]
    fn test_literal_shapes() {
        assert!(is_string_literal("\"\""));
        assert!(!is_string_literal("\"a\"b\""));
        assert!(is_char_literal("'z'"));
        assert!(!is_char_literal("''"));
        assert!(!is_char_literal("'ab'"));
        assert!(is_plain_number("12.500001"));
        assert!(!is_plain_number("12."));
        assert!(!is_plain_number("2^3"));
    }

    #[test]
    fn test_token_helpers() {
        let token = Token::new("fraction", Span::default());
        assert!(token.is_type_keyword());
        assert_eq!(token.to_string(), "fraction -> Keyword");

        let token = Token::new("say", Span::default());
        assert!(!token.is_type_keyword());

        assert!(Token::new("||", Span::default()).is_logical_operator());
    }
}
