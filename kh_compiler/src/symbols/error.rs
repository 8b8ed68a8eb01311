//! Per-declaration symbol diagnostics
//!
//! None of these abort the build: a failed initializer stores `ERROR` and the
//! walk continues with the next declaration.

use crate::expression::ExpressionError;
use crate::logging::codes;
use crate::utils::Span;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("Invalid arithmetic expression for '{name}' at line {line}: {source}")]
    Expression {
        name: String,
        line: u32,
        #[source]
        source: ExpressionError,
    },

    #[error("Invalid assignment in '{expression}' for '{name}' at line {line}")]
    Declaration {
        name: String,
        expression: String,
        line: u32,
    },

    #[error("Unmatched '}}' at token {index}: no open scope to close")]
    ScopeUnderflow { index: usize, span: Span },
}

impl SymbolError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SymbolError::Expression { .. } => codes::symbols::EXPRESSION_ERROR,
            SymbolError::Declaration { .. } => codes::symbols::DECLARATION_ERROR,
            SymbolError::ScopeUnderflow { .. } => codes::symbols::SCOPE_UNDERFLOW,
        }
    }

    pub fn is_scope_underflow(&self) -> bool {
        matches!(self, SymbolError::ScopeUnderflow { .. })
    }
}
