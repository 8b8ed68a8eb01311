//! Symbol table construction
//!
//! Walks the token stream once. A type keyword (`whole fraction truth
//! character`) directly followed by an identifier declares that identifier in
//! the innermost open scope; `{` opens `local_<token index>` and `}` closes it.
//! Initializers are resolved to literal text, evaluated arithmetic, or `ERROR`.
//! Every declaration receives the next memory label starting at `M1000`,
//! whether or not its initializer resolved.

pub mod builder;
pub mod error;
pub mod table;

use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_success, log_warning};

pub use builder::{SymbolTableBuilder, SymbolTableResult, FIRST_MEMORY_LABEL};
pub use error::SymbolError;
pub use table::{SymbolEntry, SymbolTable, SymbolValue, GLOBAL_SCOPE};

/// Build the symbol table, logging each diagnostic as a warning
pub fn build_symbol_table(stream: &TokenStream) -> SymbolTableResult {
    let result = SymbolTableBuilder::new().build(stream);

    for diagnostic in &result.diagnostics {
        let span = match diagnostic {
            SymbolError::ScopeUnderflow { span, .. } => Some(*span),
            _ => None,
        };
        log_warning!(diagnostic.error_code(), &diagnostic.to_string(), span = span);
    }

    log_success!(codes::success::SYMBOL_TABLE_COMPLETE, "Symbol table constructed",
        "symbols" => result.table.len(),
        "errors" => result.table.error_count(),
        "diagnostics" => result.diagnostics.len()
    );

    result
}

pub fn validate_symbol_codes() -> Result<(), String> {
    let symbol_codes = [
        codes::symbols::EXPRESSION_ERROR,
        codes::symbols::DECLARATION_ERROR,
        codes::symbols::SCOPE_UNDERFLOW,
        codes::success::SYMBOL_TABLE_COMPLETE,
    ];

    match symbol_codes.iter().find(|code| !codes::is_registered(**code)) {
        Some(code) => Err(format!(
            "Symbol error code {} not found in metadata registry",
            code.as_str()
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;

    #[test]
    fn test_build_symbol_table() {
        let stream = tokenize("whole x -> 1 + 1; truth t -> maybe;").unwrap();
        let result = build_symbol_table(&stream);
        assert_eq!(result.table.len(), 2);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].error_code(),
            codes::symbols::DECLARATION_ERROR
        );
    }

    #[test]
    fn test_codes_registered() {
        assert!(validate_symbol_codes().is_ok());
    }
}
