use crate::logging::codes;

/// Arithmetic initializer failures; the declaration stores `ERROR`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    #[error("Invalid arithmetic expression: '{expression}'")]
    NotArithmetic { expression: String },

    #[error("Mismatched parentheses in '{expression}'")]
    MismatchedParentheses { expression: String },

    #[error("Operator '{operator}' is missing an operand in '{expression}'")]
    MissingOperand { operator: char, expression: String },

    #[error("Invalid operand '{operand}' in '{expression}'")]
    InvalidOperand { operand: String, expression: String },

    #[error("Operands left without an operator in '{expression}'")]
    DanglingOperands { expression: String },

    #[error("Expression '{expression}' does not evaluate to a finite number")]
    NonFiniteResult { expression: String },
}

impl ExpressionError {
    pub fn error_code(&self) -> crate::logging::Code {
        codes::symbols::EXPRESSION_ERROR
    }

    /// The initializer text that failed
    pub fn expression(&self) -> &str {
        match self {
            ExpressionError::NotArithmetic { expression }
            | ExpressionError::MismatchedParentheses { expression }
            | ExpressionError::MissingOperand { expression, .. }
            | ExpressionError::InvalidOperand { expression, .. }
            | ExpressionError::DanglingOperands { expression }
            | ExpressionError::NonFiniteResult { expression } => expression,
        }
    }
}
