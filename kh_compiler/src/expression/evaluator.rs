use super::error::ExpressionError;
use super::rounding::round_half_up;
use crate::tokens::is_plain_number;

const OPERATOR_CHARS: &[char] = &['+', '-', '*', '/', '%', '^'];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Item {
    Number(f64),
    Operator(char),
    Open,
    Close,
}

/// Binding strength; equal strengths pop, so every operator is left-associative
fn precedence(operator: char) -> u8 {
    match operator {
        '^' => 3,
        '*' | '/' | '%' => 2,
        _ => 1,
    }
}

/// True when the text has a digit and an arithmetic operator or parenthesis
pub fn is_arithmetic(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .any(|c| OPERATOR_CHARS.contains(&c) || c == '(' || c == ')')
}

/// Evaluate an infix expression, rounding each intermediate result to five
/// decimal places
pub fn evaluate(expression: &str) -> Result<f64, ExpressionError> {
    let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();

    if !is_arithmetic(&compact) {
        return Err(ExpressionError::NotArithmetic {
            expression: compact,
        });
    }

    let items = split(&compact)?;
    let postfix = to_postfix(items, &compact)?;
    let value = evaluate_postfix(&postfix, &compact)?;
    Ok(round_half_up(value))
}

fn split(expression: &str) -> Result<Vec<Item>, ExpressionError> {
    let mut items = Vec::new();
    let mut operand = String::new();

    for c in expression.chars() {
        let delimiter = match c {
            '(' => Some(Item::Open),
            ')' => Some(Item::Close),
            c if OPERATOR_CHARS.contains(&c) => Some(Item::Operator(c)),
            _ => None,
        };

        match delimiter {
            Some(item) => {
                if !operand.is_empty() {
                    items.push(parse_operand(&operand, expression)?);
                    operand.clear();
                }
                items.push(item);
            }
            None => operand.push(c),
        }
    }

    if !operand.is_empty() {
        items.push(parse_operand(&operand, expression)?);
    }

    Ok(items)
}

fn parse_operand(text: &str, expression: &str) -> Result<Item, ExpressionError> {
    let invalid = || ExpressionError::InvalidOperand {
        operand: text.to_string(),
        expression: expression.to_string(),
    };

    if !is_plain_number(text) {
        return Err(invalid());
    }
    text.parse::<f64>().map(Item::Number).map_err(|_| invalid())
}

/// Shunting-yard conversion
fn to_postfix(items: Vec<Item>, expression: &str) -> Result<Vec<Item>, ExpressionError> {
    let mismatched = || ExpressionError::MismatchedParentheses {
        expression: expression.to_string(),
    };

    let mut output = Vec::with_capacity(items.len());
    let mut stack: Vec<Item> = Vec::new();

    for item in items {
        match item {
            Item::Number(_) => output.push(item),
            Item::Open => stack.push(item),
            Item::Close => loop {
                match stack.pop() {
                    Some(Item::Open) => break,
                    Some(top) => output.push(top),
                    None => return Err(mismatched()),
                }
            },
            Item::Operator(incoming) => {
                while let Some(Item::Operator(top)) = stack.last() {
                    if precedence(*top) < precedence(incoming) {
                        break;
                    }
                    output.push(Item::Operator(*top));
                    stack.pop();
                }
                stack.push(item);
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top == Item::Open {
            return Err(mismatched());
        }
        output.push(top);
    }

    Ok(output)
}

fn evaluate_postfix(postfix: &[Item], expression: &str) -> Result<f64, ExpressionError> {
    let mut stack: Vec<f64> = Vec::new();

    for item in postfix {
        match *item {
            Item::Number(value) => stack.push(value),
            Item::Operator(operator) => {
                let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
                    return Err(ExpressionError::MissingOperand {
                        operator,
                        expression: expression.to_string(),
                    });
                };

                let result = apply(operator, a, b);
                if !result.is_finite() {
                    return Err(ExpressionError::NonFiniteResult {
                        expression: expression.to_string(),
                    });
                }
                stack.push(round_half_up(result));
            }
            Item::Open | Item::Close => {
                return Err(ExpressionError::MismatchedParentheses {
                    expression: expression.to_string(),
                });
            }
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        _ => Err(ExpressionError::DanglingOperands {
            expression: expression.to_string(),
        }),
    }
}

fn apply(operator: char, a: f64, b: f64) -> f64 {
    match operator {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        '/' => a / b,
        '%' => a % b,
        _ => a.powf(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::format_value;
    use assert_matches::assert_matches;

    fn eval(text: &str) -> String {
        format_value(evaluate(text).unwrap())
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("10 - 3 * 2"), "4.00000");
        assert_eq!(eval("2+3*4^2"), "50.00000");
        assert_eq!(eval("(10-3)*2"), "14.00000");
        assert_eq!(eval("17%5+1"), "3.00000");
    }

    #[test]
    fn test_rounding_per_step() {
        assert_eq!(eval("1/3"), "0.33333");
        // 1/3 is stored as 0.33333 before the multiplication
        assert_eq!(eval("1/3*3"), "0.99999");
        assert_eq!(eval("2.5/2"), "1.25000");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(eval("10-4-3"), "3.00000");
        assert_eq!(eval("2^3^2"), "64.00000");
        assert_eq!(eval("8/4/2"), "1.00000");
    }

    #[test]
    fn test_is_arithmetic() {
        assert!(is_arithmetic("1+2"));
        assert!(is_arithmetic("(5)"));
        assert!(is_arithmetic("x+1"));
        assert!(!is_arithmetic("42"));
        assert!(!is_arithmetic("a+b"));
    }

    #[test]
    fn test_malformed_expressions() {
        assert_matches!(evaluate("(1+2"), Err(ExpressionError::MismatchedParentheses { .. }));
        assert_matches!(evaluate("1+2)"), Err(ExpressionError::MismatchedParentheses { .. }));
        assert_matches!(evaluate("-5"), Err(ExpressionError::MissingOperand { operator: '-', .. }));
        assert_matches!(evaluate("2(3)"), Err(ExpressionError::DanglingOperands { .. }));
        assert_matches!(evaluate("x+1"),
            Err(ExpressionError::InvalidOperand { operand, .. }) if operand == "x");
        assert_matches!(evaluate("1/0"), Err(ExpressionError::NonFiniteResult { .. }));
        assert_matches!(evaluate("5%0"), Err(ExpressionError::NonFiniteResult { .. }));
        assert_matches!(evaluate("7"), Err(ExpressionError::NotArithmetic { .. }));
    }

    #[test]
    fn test_error_keeps_expression() {
        let err = evaluate("1 + (2").unwrap_err();
        assert_eq!(err.expression(), "1+(2");
        assert_eq!(err.to_string(), "Mismatched parentheses in '1+(2'");
    }
}
