//! `if`/`else` structure validation
//!
//! Runs over the token stream independently of the symbol table. Each `if`
//! must be followed by a parenthesized condition and a brace-balanced block,
//! optionally chained with `else if` or closed with `else { ... }`. A
//! condition is a bare identifier, `identifier <cmp> number|yes|no`,
//! `number <cmp> number`, or several of these joined by `&&` / `||`.
//! Validation stops at the first syntax error.

pub mod error;
pub mod validator;

use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_error, log_success};

pub use error::SyntaxError;
pub use validator::{is_boolean_condition, ConditionalValidation, ConditionalValidator};

pub fn validate_conditionals(stream: &TokenStream) -> ConditionalValidation {
    let validation = ConditionalValidator::new(stream).validate();

    match &validation.error {
        Some(error) => {
            let span = stream.get(error.position()).map(|t| t.span);
            log_error!(error.error_code(), &error.to_string(),
                span = span,
                "expected" => error.expected(),
                "position" => error.position()
            );
        }
        None => {
            log_success!(codes::success::CONDITIONAL_VALIDATION_PASSED,
                "Conditional validation passed",
                "if_statements" => validation.if_statements
            );
        }
    }

    validation
}

pub fn validate_conditional_codes() -> Result<(), String> {
    let conditional_codes = [
        codes::conditional::MISSING_OPEN_PAREN,
        codes::conditional::MISSING_CLOSE_PAREN,
        codes::conditional::INVALID_CONDITION,
        codes::conditional::MISSING_OPEN_BRACE,
        codes::conditional::UNMATCHED_BRACE,
        codes::conditional::INVALID_ELSE,
        codes::success::CONDITIONAL_VALIDATION_PASSED,
    ];

    for code in &conditional_codes {
        if !codes::is_registered(*code) {
            return Err(format!(
                "Conditional error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;

    #[test]
    fn test_validate_conditionals() {
        let stream = tokenize("if (a && b) { say a; }").unwrap();
        assert!(validate_conditionals(&stream).is_valid());

        let stream = tokenize("if (a) {").unwrap();
        let validation = validate_conditionals(&stream);
        assert_eq!(validation.error.map(|e| e.expected()), Some("}"));
    }

    #[test]
    fn test_codes_registered() {
        assert!(validate_conditional_codes().is_ok());
    }
}
