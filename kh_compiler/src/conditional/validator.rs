use super::error::SyntaxError;
use crate::tokens::{is_boolean_literal, is_plain_number, Token, TokenCursor, TokenKind, TokenStream};
use serde::Serialize;

/// Outcome of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConditionalValidation {
    /// `if` statements fully checked, `else if` links included
    pub if_statements: usize,
    pub error: Option<SyntaxError>,
}

impl ConditionalValidation {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Forward-only scan for `if` chains.
///
/// Block bodies are skipped by brace counting, so an `if` nested inside a
/// block is not checked.
pub struct ConditionalValidator<'a> {
    cursor: TokenCursor<'a>,
    if_statements: usize,
}

impl<'a> ConditionalValidator<'a> {
    pub fn new(stream: &'a TokenStream) -> Self {
        Self {
            cursor: stream.cursor(),
            if_statements: 0,
        }
    }

    pub fn validate(mut self) -> ConditionalValidation {
        let error = self.run().err();
        ConditionalValidation {
            if_statements: self.if_statements,
            error,
        }
    }

    fn run(&mut self) -> Result<(), SyntaxError> {
        while !self.cursor.is_at_end() {
            if self.cursor.advance_if("if") {
                self.if_statement()?;
            } else {
                self.cursor.advance();
            }
        }
        Ok(())
    }

    fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Starts just past the `if` token
    fn if_statement(&mut self) -> Result<(), SyntaxError> {
        if !self.cursor.advance_if("(") {
            return Err(SyntaxError::MissingOpenParen {
                position: self.position(),
            });
        }

        let start = self.position();
        while !self.cursor.is_at_end() && !self.cursor.check(")") {
            self.cursor.advance();
        }
        if !self.cursor.check(")") {
            return Err(SyntaxError::MissingCloseParen {
                position: self.position(),
            });
        }

        let condition = self.cursor.since(start);
        if !is_boolean_condition(condition) {
            return Err(SyntaxError::InvalidCondition {
                condition: join_texts(condition),
                position: self.position(),
            });
        }

        self.cursor.advance();
        if !self.cursor.check("{") {
            return Err(SyntaxError::MissingOpenBrace {
                position: self.position(),
            });
        }
        self.block()?;
        self.if_statements += 1;

        if self.cursor.advance_if("else") {
            if self.cursor.advance_if("if") {
                self.if_statement()?;
            } else if self.cursor.check("{") {
                self.block()?;
            } else {
                return Err(SyntaxError::InvalidElse {
                    position: self.position(),
                });
            }
        }

        Ok(())
    }

    /// Starts on `{`; ends just past the matching `}`
    fn block(&mut self) -> Result<(), SyntaxError> {
        let opened = self.position();
        let mut depth = 1usize;
        self.cursor.advance();

        while depth > 0 {
            match self.cursor.advance() {
                Some(token) if token.is("{") => depth += 1,
                Some(token) if token.is("}") => depth -= 1,
                Some(_) => {}
                None => return Err(SyntaxError::UnmatchedBrace { position: opened }),
            }
        }

        Ok(())
    }
}

fn join_texts(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_identifier(token: &Token) -> bool {
    token.kind == TokenKind::Identifier
}

/// Plain decimal constant; `2^8` is a constant but not comparable here
fn is_number(token: &Token) -> bool {
    token.kind == TokenKind::Constant && is_plain_number(&token.text)
}

fn is_comparison(token: &Token) -> bool {
    token.kind == TokenKind::ComparisonOperator
}

/// One comparison or a bare identifier
fn is_atom(tokens: &[Token]) -> bool {
    match tokens {
        [single] => is_identifier(single),
        [left, op, right] if is_comparison(op) => {
            (is_identifier(left)
                && (is_number(right) || is_boolean_literal(&right.text)))
                || (is_number(left) && is_number(right))
        }
        _ => false,
    }
}

/// Atoms joined by `&&` or `||`
pub fn is_boolean_condition(tokens: &[Token]) -> bool {
    if tokens.is_empty() {
        return false;
    }
    tokens
        .split(|t| t.is_logical_operator())
        .all(is_atom)
}
