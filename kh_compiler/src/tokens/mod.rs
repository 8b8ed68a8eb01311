//! Token model for the KH language
//!
//! A [`Token`] pairs its source text with exactly one [`TokenKind`], derived
//! from the text alone by [`classify`]. The lexer produces a [`TokenStream`]
//! once; every later stage reads it without modification.
//!
//! Kinds, in classification priority:
//!
//! - `Keyword`: `whole fraction truth character while if else end say`
//! - `Identifier`: lowercase words `[a-z_][a-z0-9_]*` other than keywords
//! - `Constant`: numbers such as `10`, `3.14159`, `2^8`
//! - `Literal`: `"strings"` and `'c'` characters
//! - `BooleanConstant`: `yes`, `no` (shadowed by `Identifier`, which is tried first)
//! - `Operator`: `+ - * / % ^ && ||`
//! - `ComparisonOperator`: `<= >= == != < >`
//! - `AssignmentOperator`: `->`
//! - `Punctuation`: `{ } ( ) ; , :`

pub mod token;
pub mod token_stream;

pub use token::{
    classify, is_boolean_literal, is_identifier, is_keyword, is_numeric_constant, is_plain_number,
    is_quoted_literal, is_type_keyword, number_length, Token, TokenKind,
};
pub use token_stream::{TokenCursor, TokenStream};
