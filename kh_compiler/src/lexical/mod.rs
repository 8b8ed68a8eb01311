//! Lexical analysis for KH source
//!
//! Comments are stripped first (line structure preserved), then each line is
//! scanned left to right. At every position the token classes are tried in
//! priority order; text that no class matches is reported as an invalid token
//! together with its line and running token index. All errors of a run are
//! collected before failing, and a failed run yields no tokens.
//!
//! Compile-time limits: `MAX_TOKEN_COUNT` and `MAX_TOKEN_LENGTH`.

pub mod analyzer;
pub mod comments;

use crate::config::compile_time::lexical::{MAX_TOKEN_COUNT, MAX_TOKEN_LENGTH};
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::TokenStream;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalErrors, LexicalMetrics};
pub use comments::{strip_comments, StrippedSource};

/// Tokenize with default preferences
pub fn tokenize(source: &str) -> Result<TokenStream, LexicalErrors> {
    LexicalAnalyzer::new().tokenize(source)
}

pub fn tokenize_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> Result<TokenStream, LexicalErrors> {
    LexicalAnalyzer::with_preferences(preferences).tokenize(source)
}

/// Check that every lexical code is registered and the limits are usable
pub fn validate_tokenization() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::INVALID_TOKEN,
        codes::lexical::TOO_MANY_TOKENS,
        codes::lexical::TOKEN_TOO_LONG,
        codes::lexical::LEXICAL_ANALYSIS_FAILED,
    ];

    for code in &lexical_codes {
        if !codes::is_registered(*code) {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_TOKEN_COUNT == 0 {
        return Err("MAX_TOKEN_COUNT cannot be zero".to_string());
    }
    if MAX_TOKEN_LENGTH == 0 {
        return Err("MAX_TOKEN_LENGTH cannot be zero".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tokenization() {
        assert!(validate_tokenization().is_ok());
    }

    #[test]
    fn test_module_api() {
        let stream = tokenize("say 1;").unwrap();
        assert_eq!(stream.len(), 3);

        let preferences = LexicalPreferences {
            collect_detailed_metrics: false,
            include_position_in_errors: true,
        };
        let err = tokenize_with_preferences("SAY", preferences).unwrap_err();
        assert_eq!(err.errors()[0].error_code(), codes::lexical::INVALID_TOKEN);
    }
}
