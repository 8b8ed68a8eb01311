use crate::logging::codes;
use serde::Serialize;

/// First structural problem found in an `if`/`else` chain.
///
/// Positions are token indices into the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum SyntaxError {
    #[error("Expected '(' after `if` at token {position}")]
    MissingOpenParen { position: usize },

    #[error("Expected ')' after condition at token {position}")]
    MissingCloseParen { position: usize },

    #[error("Invalid condition '{condition}' in `if` statement at token {position}")]
    InvalidCondition { condition: String, position: usize },

    #[error("Expected '{{' after `if` condition at token {position}")]
    MissingOpenBrace { position: usize },

    #[error("Unmatched '{{' opened at token {position} in if-else block")]
    UnmatchedBrace { position: usize },

    #[error("Expected '{{' or `if` after `else` at token {position}")]
    InvalidElse { position: usize },
}

impl SyntaxError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SyntaxError::MissingOpenParen { .. } => codes::conditional::MISSING_OPEN_PAREN,
            SyntaxError::MissingCloseParen { .. } => codes::conditional::MISSING_CLOSE_PAREN,
            SyntaxError::InvalidCondition { .. } => codes::conditional::INVALID_CONDITION,
            SyntaxError::MissingOpenBrace { .. } => codes::conditional::MISSING_OPEN_BRACE,
            SyntaxError::UnmatchedBrace { .. } => codes::conditional::UNMATCHED_BRACE,
            SyntaxError::InvalidElse { .. } => codes::conditional::INVALID_ELSE,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            SyntaxError::MissingOpenParen { position }
            | SyntaxError::MissingCloseParen { position }
            | SyntaxError::InvalidCondition { position, .. }
            | SyntaxError::MissingOpenBrace { position }
            | SyntaxError::UnmatchedBrace { position }
            | SyntaxError::InvalidElse { position } => *position,
        }
    }

    /// What the validator was looking for
    pub fn expected(&self) -> &'static str {
        match self {
            SyntaxError::MissingOpenParen { .. } => "(",
            SyntaxError::MissingCloseParen { .. } => ")",
            SyntaxError::InvalidCondition { .. } => "boolean condition",
            SyntaxError::MissingOpenBrace { .. } => "{",
            SyntaxError::UnmatchedBrace { .. } => "}",
            SyntaxError::InvalidElse { .. } => "{ or if",
        }
    }
}
