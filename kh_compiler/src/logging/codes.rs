//! Diagnostic codes and their classification
//!
//! Every code the compiler can emit is declared here together with its
//! behavioral metadata. Stages map their error variants onto these codes.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a diagnostic code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

pub mod lexical {
    use super::Code;

    pub const INVALID_TOKEN: Code = Code::new("E020");
    pub const TOO_MANY_TOKENS: Code = Code::new("E022");
    pub const TOKEN_TOO_LONG: Code = Code::new("E023");
    pub const LEXICAL_ANALYSIS_FAILED: Code = Code::new("E024");
}

/// Token automaton construction and re-validation
pub mod automaton {
    use super::Code;

    pub const STATE_LIMIT_EXCEEDED: Code = Code::new("E030");
    pub const TOKEN_REJECTED: Code = Code::new("E031");
}

/// Declaration values and scope tracking
pub mod symbols {
    use super::Code;

    pub const EXPRESSION_ERROR: Code = Code::new("E050");
    pub const DECLARATION_ERROR: Code = Code::new("E051");
    pub const SCOPE_UNDERFLOW: Code = Code::new("E052");
}

/// Conditional block structure
pub mod conditional {
    use super::Code;

    pub const MISSING_OPEN_PAREN: Code = Code::new("E060");
    pub const MISSING_CLOSE_PAREN: Code = Code::new("E061");
    pub const INVALID_CONDITION: Code = Code::new("E062");
    pub const MISSING_OPEN_BRACE: Code = Code::new("E063");
    pub const UNMATCHED_BRACE: Code = Code::new("E064");
    pub const INVALID_ELSE: Code = Code::new("E065");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const AUTOMATON_CONSTRUCTION_COMPLETE: Code = Code::new("I030");
    pub const DETERMINIZATION_COMPLETE: Code = Code::new("I031");
    pub const TOKEN_VALIDATION_COMPLETE: Code = Code::new("I032");
    pub const SYMBOL_TABLE_COMPLETE: Code = Code::new("I050");
    pub const CONDITIONAL_VALIDATION_PASSED: Code = Code::new("I060");
    pub const PIPELINE_COMPLETE: Code = Code::new("I090");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

use Severity::{Critical, High, Low, Medium};

/// (code, category, severity, recoverable, requires_halt, description, action)
type RegistryRow = (
    &'static str,
    &'static str,
    Severity,
    bool,
    bool,
    &'static str,
    &'static str,
);

const REGISTRY_ROWS: &[RegistryRow] = &[
    // System
    ("ERR001", "System", Critical, false, true,
        "Critical internal error", "File a bug report with the input that triggered it"),
    ("ERR002", "System", Critical, false, true,
        "System initialization failure", "Check logging configuration and environment"),
    ("ERR003", "System", High, false, true,
        "Runtime configuration could not be loaded", "Fix the preferences TOML file"),
    // File processing
    ("E005", "FileProcessing", High, false, true,
        "Source file not found", "Check the path passed on the command line"),
    ("E006", "FileProcessing", Medium, false, true,
        "Source file does not carry the .kh extension", "Rename the file or disable require_kh_extension"),
    ("E007", "FileProcessing", High, false, true,
        "Source file exceeds the compile-time size limit", "Split the program or raise max_file_size"),
    ("E008", "FileProcessing", Medium, false, true,
        "Source file is empty", "Provide a non-empty program"),
    ("E009", "FileProcessing", High, false, true,
        "Permission denied reading the source file", "Check file permissions"),
    ("E010", "FileProcessing", High, false, true,
        "Source file is not valid UTF-8", "Re-save the program as UTF-8"),
    ("E011", "FileProcessing", High, false, true,
        "I/O error while reading the source file", "Retry or check the storage device"),
    ("E012", "FileProcessing", Medium, false, true,
        "Path does not refer to a regular file", "Pass a file path, not a directory"),
    ("E013", "FileProcessing", Medium, false, true,
        "Source file exceeds the compile-time line limit", "Split the program or raise max_line_count"),
    // Lexical
    ("E020", "Lexical", High, false, true,
        "Text that matches no token class", "Use lowercase identifiers and supported operators"),
    ("E022", "Lexical", High, false, true,
        "Token count exceeds the compile-time limit", "Split the program or raise max_token_count"),
    ("E023", "Lexical", Medium, false, true,
        "Token longer than the compile-time limit", "Shorten the literal or identifier"),
    ("E024", "Lexical", High, false, true,
        "Lexical analysis failed", "Fix the invalid tokens listed above"),
    // Automaton
    ("E030", "Automaton", High, false, true,
        "Token automaton exceeds the compile-time state limit", "Reduce distinct token spellings or raise max_states"),
    ("E031", "Automaton", High, true, false,
        "Token rejected by the automaton built from the token stream", "Report this as a lexer bug"),
    // Symbols
    ("E050", "Symbols", Medium, true, false,
        "Malformed arithmetic initializer", "Balance operators, operands and parentheses"),
    ("E051", "Symbols", Medium, true, false,
        "Initializer is neither a literal nor an arithmetic expression", "Assign a literal or a numeric expression"),
    ("E052", "Symbols", High, true, false,
        "Closing brace without a matching opening brace", "Remove the extra '}'"),
    // Conditional
    ("E060", "Conditional", High, false, true,
        "Missing '(' after if", "Wrap the condition in parentheses"),
    ("E061", "Conditional", High, false, true,
        "Missing ')' after condition", "Close the condition with ')'"),
    ("E062", "Conditional", High, false, true,
        "Condition does not match a supported shape", "Use a variable, a comparison or a logical pair"),
    ("E063", "Conditional", High, false, true,
        "Missing '{' after if condition", "Open the block with '{'"),
    ("E064", "Conditional", High, false, true,
        "Block opened with '{' is never closed", "Add the missing '}'"),
    ("E065", "Conditional", High, false, true,
        "else must be followed by if or '{'", "Open the else block with '{'"),
    // Success
    ("I004", "Success", Low, true, false,
        "System initialization completed", "Ready for processing"),
    ("I006", "Success", Low, true, false,
        "File read and validated", "Continue to lexical analysis"),
    ("I020", "Success", Low, true, false,
        "Tokenization completed", "Continue to automaton construction"),
    ("I030", "Success", Low, true, false,
        "Token automaton constructed", "Continue to determinization"),
    ("I031", "Success", Low, true, false,
        "Subset construction completed", "Continue to token validation"),
    ("I032", "Success", Low, true, false,
        "Every token re-validated", "Continue to symbol table"),
    ("I050", "Success", Low, true, false,
        "Symbol table populated", "Continue to conditional validation"),
    ("I060", "Success", Low, true, false,
        "Conditional blocks validated", "Compilation front end complete"),
    ("I090", "Success", Low, true, false,
        "Pipeline completed", "Inspect the report"),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ROWS
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code,
                        ErrorMetadata {
                            code,
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn is_registered(code: Code) -> bool {
    get_error_registry().contains_key(code.as_str())
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_has_no_duplicate_codes() {
        let unique: HashSet<_> = REGISTRY_ROWS.iter().map(|row| row.0).collect();
        assert_eq!(unique.len(), REGISTRY_ROWS.len());
    }

    #[test]
    fn test_stage_codes_are_registered() {
        for code in [
            lexical::INVALID_TOKEN,
            automaton::TOKEN_REJECTED,
            symbols::SCOPE_UNDERFLOW,
            conditional::INVALID_ELSE,
            success::PIPELINE_COMPLETE,
        ] {
            assert!(is_registered(code), "{} missing", code);
        }
    }

    #[test]
    fn test_classification_lookups() {
        assert_eq!(get_category("E020"), "Lexical");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("E020"));
        assert!(is_recoverable("E050"));
        assert!(!requires_halt("E051"));
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert_eq!(get_severity("E999"), Severity::Medium);
    }
}
