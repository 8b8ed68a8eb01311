use super::error::SymbolError;
use super::table::{SymbolEntry, SymbolTable, SymbolValue, GLOBAL_SCOPE};
use crate::expression::{evaluate_to_string, format_value, is_arithmetic};
use crate::tokens::token::{is_boolean_literal, is_quoted_literal};
use crate::tokens::{is_plain_number, Token, TokenKind, TokenStream};

/// First memory label handed out
pub const FIRST_MEMORY_LABEL: u32 = 1000;

/// Table plus every diagnostic raised while building it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTableResult {
    pub table: SymbolTable,
    pub diagnostics: Vec<SymbolError>,
}

impl SymbolTableResult {
    pub fn has_scope_underflow(&self) -> bool {
        self.diagnostics.iter().any(SymbolError::is_scope_underflow)
    }
}

/// Single-use walker; the scope stack and label counter live only for one build
pub struct SymbolTableBuilder {
    scopes: Vec<String>,
    next_label: u32,
    result: SymbolTableResult,
}

impl Default for SymbolTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTableBuilder {
    pub fn new() -> Self {
        Self {
            scopes: vec![GLOBAL_SCOPE.to_string()],
            next_label: FIRST_MEMORY_LABEL,
            result: SymbolTableResult::default(),
        }
    }

    pub fn build(mut self, stream: &TokenStream) -> SymbolTableResult {
        let tokens = stream.tokens();

        for (index, token) in tokens.iter().enumerate() {
            let scope = self.current_scope().to_string();

            if token.is("{") {
                self.scopes.push(format!("local_{}", index));
            } else if token.is("}") {
                self.close_scope(index, token);
            }

            if token.is_type_keyword() {
                if let Some(name) = tokens
                    .get(index + 1)
                    .filter(|next| next.kind == TokenKind::Identifier)
                {
                    self.declare(token, name, scope, &tokens[index + 2..]);
                }
            }
        }

        self.result
    }

    fn current_scope(&self) -> &str {
        self.scopes.last().map_or(GLOBAL_SCOPE, String::as_str)
    }

    fn close_scope(&mut self, index: usize, token: &Token) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        } else {
            self.result.diagnostics.push(SymbolError::ScopeUnderflow {
                index,
                span: token.span,
            });
        }
    }

    fn declare(&mut self, keyword: &Token, name: &Token, scope: String, rest: &[Token]) {
        let expression = initializer_text(rest);
        let line = name.line();

        let value = match resolve_value(&expression) {
            Ok(text) => SymbolValue::Resolved(text),
            Err(reason) => {
                self.result.diagnostics.push(reason.into_error(&name.text, &expression, line));
                SymbolValue::Error
            }
        };

        let memory_label = format!("M{}", self.next_label);
        self.next_label += 1;

        self.result.table.insert(SymbolEntry {
            name: name.text.clone(),
            declared_type: keyword.text.clone(),
            scope,
            value,
            memory_label,
            declaration_line: line,
        });
    }
}

/// Token texts after `->` up to the terminating `;`, concatenated
fn initializer_text(rest: &[Token]) -> String {
    rest.iter()
        .take_while(|token| !token.is(";"))
        .skip_while(|token| !token.is("->"))
        .skip(1)
        .map(|token| token.text.as_str())
        .collect()
}

enum Unresolved {
    Expression(crate::expression::ExpressionError),
    NotALiteral,
}

impl Unresolved {
    fn into_error(self, name: &str, expression: &str, line: u32) -> SymbolError {
        match self {
            Unresolved::Expression(source) => SymbolError::Expression {
                name: name.to_string(),
                line,
                source,
            },
            Unresolved::NotALiteral => SymbolError::Declaration {
                name: name.to_string(),
                expression: expression.to_string(),
                line,
            },
        }
    }
}

fn resolve_value(expression: &str) -> Result<String, Unresolved> {
    if is_arithmetic(expression) {
        return evaluate_to_string(expression).map_err(Unresolved::Expression);
    }

    if is_plain_number(expression) {
        if expression.contains('.') {
            let value: f64 = expression.parse().map_err(|_| Unresolved::NotALiteral)?;
            return Ok(format_value(value));
        }
        return Ok(expression.to_string());
    }

    if is_quoted_literal(expression) || is_boolean_literal(expression) {
        return Ok(expression.to_string());
    }

    Err(Unresolved::NotALiteral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    fn build(source: &str) -> SymbolTableResult {
        SymbolTableBuilder::new().build(&tokenize(source).unwrap())
    }

    fn value_of(result: &SymbolTableResult, name: &str) -> String {
        result
            .table
            .get(name)
            .map(|e| e.value.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_global_and_local_scopes() {
        let result = build("whole x -> 10; { whole y -> 2; }");
        let x = result.table.get("x").unwrap();
        let y = result.table.get("y").unwrap();

        assert_eq!(x.scope, "global");
        assert_eq!(x.memory_label, "M1000");
        assert_eq!(y.scope, "local_5");
        assert_eq!(y.memory_label, "M1001");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_scope_restored_after_block() {
        let result = build("{ } whole a -> 1; { { whole b -> 2; } whole c -> 3; }");
        assert_eq!(result.table.get("a").unwrap().scope, "global");
        assert_eq!(result.table.get("b").unwrap().scope, "local_8");
        assert_eq!(result.table.get("c").unwrap().scope, "local_7");
    }

    #[test]
    fn test_value_resolution() {
        let result = build(concat!(
            "whole a -> 10 - 3 * 2;\n",
            "fraction b -> 1 / 3;\n",
            "fraction c -> 3.1415926;\n",
            "whole d -> 42;\n",
            "character e -> 'k';\n",
            "truth f -> yes;\n",
            "character g -> \"hello\";\n",
        ));
        assert_eq!(value_of(&result, "a"), "4.00000");
        assert_eq!(value_of(&result, "b"), "0.33333");
        assert_eq!(value_of(&result, "c"), "3.14159");
        assert_eq!(value_of(&result, "d"), "42");
        assert_eq!(value_of(&result, "e"), "'k'");
        assert_eq!(value_of(&result, "f"), "yes");
        assert_eq!(value_of(&result, "g"), "\"hello\"");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_initializers_store_error() {
        let result = build("whole a -> x;\nwhole b -> (1 + 2;\nwhole c;\nwhole d -> 1;");
        assert_eq!(value_of(&result, "a"), "ERROR");
        assert_eq!(value_of(&result, "b"), "ERROR");
        assert_eq!(value_of(&result, "c"), "ERROR");
        assert_eq!(value_of(&result, "d"), "1");
        assert_eq!(result.table.error_count(), 3);

        assert_matches!(&result.diagnostics[0],
            SymbolError::Declaration { name, expression, line: 1 } if name == "a" && expression == "x");
        assert_matches!(&result.diagnostics[1], SymbolError::Expression { line: 2, .. });
        assert_matches!(&result.diagnostics[2],
            SymbolError::Declaration { expression, .. } if expression.is_empty());

        // labels are assigned even to failed declarations
        assert_eq!(result.table.get("d").unwrap().memory_label, "M1003");
    }

    #[test]
    fn test_only_type_keywords_declare() {
        let result = build("say x; while y; whole z -> 1;");
        assert_eq!(result.table.len(), 1);
        assert!(result.table.contains("z"));
        assert_eq!(result.table.get("z").unwrap().memory_label, "M1000");
    }

    #[test]
    fn test_redeclaration_overwrites() {
        let result = build("whole x -> 1;\nwhole x -> 2;");
        assert_eq!(result.table.len(), 1);
        let x = result.table.get("x").unwrap();
        assert_eq!(x.value.to_string(), "2");
        assert_eq!(x.memory_label, "M1001");
        assert_eq!(x.declaration_line, 2);
    }

    #[test]
    fn test_declaration_at_end_of_stream_is_recorded() {
        let result = build("whole a -> 1;\nwhole x");
        let x = result.table.get("x").unwrap();
        assert_eq!(x.value, SymbolValue::Error);
        assert_eq!(x.memory_label, "M1001");
        assert_matches!(&result.diagnostics[..],
            [SymbolError::Declaration { name, expression, line: 2 }] if name == "x" && expression.is_empty());
    }

    #[test]
    fn test_boolean_words_can_be_declared() {
        let result = build("truth yes -> no;");
        let entry = result.table.get("yes").unwrap();
        assert_eq!(entry.declared_type, "truth");
        assert_eq!(value_of(&result, "yes"), "no");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_scope_underflow_recorded() {
        let result = build("} whole x -> 1;");
        assert!(result.has_scope_underflow());
        assert_matches!(result.diagnostics[0], SymbolError::ScopeUnderflow { index: 0, .. });
        assert_eq!(result.table.get("x").unwrap().scope, "global");
    }
}
