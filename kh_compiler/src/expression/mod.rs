//! Arithmetic initializer evaluation
//!
//! Infix text is split on `( ) + - * / % ^`, converted to postfix with the
//! shunting-yard algorithm and evaluated on a stack. Precedence is `^` over
//! `* / %` over `+ -`. Every operator result is rounded half away from zero
//! to five places before it is pushed back, so rounding compounds the same
//! way on every run.

pub mod error;
pub mod evaluator;
pub mod rounding;

pub use error::ExpressionError;
pub use evaluator::{evaluate, is_arithmetic};
pub use rounding::{format_value, round_half_up, DECIMAL_PLACES};

/// Evaluate and render with exactly five fractional digits
pub fn evaluate_to_string(expression: &str) -> Result<String, ExpressionError> {
    evaluate(expression).map(format_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_to_string() {
        assert_eq!(evaluate_to_string("10-3*2").as_deref(), Ok("4.00000"));
        assert!(evaluate_to_string("((").is_err());
    }
}
