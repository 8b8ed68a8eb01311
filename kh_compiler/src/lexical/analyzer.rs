use crate::config::compile_time::lexical::{MAX_TOKEN_COUNT, MAX_TOKEN_LENGTH};
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::token::{
    is_lowercase_word, number_length, ASSIGNMENT_OPERATOR, COMPARISON_OPERATORS, OPERATORS,
    PUNCTUATION,
};
use crate::tokens::{Token, TokenKind, TokenStream};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::comments::strip_comments;

/// Lexical errors with error code mapping
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid token '{token}' at line {line}, token {index}")]
    InvalidToken {
        token: String,
        line: u32,
        index: usize,
        span: Span,
    },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },

    #[error("Token too long at line {line}: {length} characters (max {MAX_TOKEN_LENGTH})")]
    TokenTooLong { length: usize, line: u32 },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidToken { .. } => codes::lexical::INVALID_TOKEN,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::TokenTooLong { .. } => codes::lexical::TOKEN_TOO_LONG,
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            LexerError::InvalidToken { line, .. }
            | LexerError::TokenTooLong { line, .. } => Some(*line),
            LexerError::TooManyTokens { .. } => None,
        }
    }

    fn span(&self) -> Option<Span> {
        match self {
            LexerError::InvalidToken { span, .. } => Some(*span),
            _ => None,
        }
    }
}

/// Every lexical error from one run, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalErrors {
    errors: Vec<LexerError>,
}

impl LexicalErrors {
    pub fn new(errors: Vec<LexerError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[LexerError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LexerError> {
        self.errors.iter()
    }
}

impl fmt::Display for LexicalErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexical analysis failed with {} error(s)",
            self.errors.len()
        )?;
        for error in &self.errors {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for LexicalErrors {}

/// Counters gathered during one tokenization
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub lines_scanned: usize,
    pub line_comments: usize,
    pub block_comments: usize,
    pub invalid_tokens: usize,
    /// Per-kind counts, only collected when detailed metrics are enabled
    pub tokens_by_kind: BTreeMap<TokenKind, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;
        if preferences.collect_detailed_metrics {
            *self.tokens_by_kind.entry(token.kind).or_insert(0) += 1;
        }
    }

    pub fn comments_stripped(&self) -> usize {
        self.line_comments + self.block_comments
    }
}

/// Line-oriented scanner over comment-stripped source
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences: LexicalPreferences::default(),
        }
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Metrics of the most recent run
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Tokenize source text. No tokens are returned if any error occurred.
    pub fn tokenize(&mut self, source: &str) -> Result<TokenStream, LexicalErrors> {
        self.metrics = LexicalMetrics::default();

        let stripped = strip_comments(source);
        self.metrics.line_comments = stripped.line_comments;
        self.metrics.block_comments = stripped.block_comments;

        log_debug!("Starting lexical analysis",
            "bytes" => source.len(),
            "comments_stripped" => stripped.comment_count(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        let mut line_start = Position::start();

        for line in stripped.text.split('\n') {
            self.metrics.lines_scanned += 1;
            let limit_reached = self.scan_line(line, line_start, &mut tokens, &mut errors);
            if limit_reached {
                break;
            }
            line_start = Position::new(
                line_start.offset + line.len() + 1,
                line_start.line + 1,
                1,
            );
        }

        if !errors.is_empty() {
            self.metrics.invalid_tokens = errors
                .iter()
                .filter(|e| matches!(e, LexerError::InvalidToken { .. }))
                .count();
            for error in &errors {
                self.report(error);
            }
            log_error!(codes::lexical::LEXICAL_ANALYSIS_FAILED,
                "Lexical analysis failed due to invalid tokens",
                "error_count" => errors.len()
            );
            return Err(LexicalErrors::new(errors));
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => tokens.len(),
            "lines" => self.metrics.lines_scanned
        );

        Ok(TokenStream::new(tokens))
    }

    /// Scan one line; returns true once the token limit stops the run
    fn scan_line(
        &mut self,
        line: &str,
        line_start: Position,
        tokens: &mut Vec<Token>,
        errors: &mut Vec<LexerError>,
    ) -> bool {
        let mut pos = 0;
        let mut gap_start = 0;

        while pos < line.len() {
            let Some(len) = match_at(line, pos) else {
                pos += line[pos..].chars().next().map_or(1, char::len_utf8);
                continue;
            };

            self.flush_gap(line, line_start, gap_start, pos, tokens.len(), errors);

            if tokens.len() >= MAX_TOKEN_COUNT {
                errors.push(LexerError::TooManyTokens {
                    count: tokens.len() + 1,
                });
                return true;
            }

            let text = &line[pos..pos + len];
            let start = position_in_line(line, line_start, pos);
            if len > MAX_TOKEN_LENGTH {
                errors.push(LexerError::TokenTooLong {
                    length: len,
                    line: start.line,
                });
            }

            let token = Token::new(text, Span::covering(start, text));
            self.metrics.record_token(&token, &self.preferences);
            tokens.push(token);

            pos += len;
            gap_start = pos;
        }

        self.flush_gap(line, line_start, gap_start, line.len(), tokens.len(), errors);
        false
    }

    /// Unmatched text between two matches is an invalid token
    fn flush_gap(
        &self,
        line: &str,
        line_start: Position,
        from: usize,
        to: usize,
        emitted: usize,
        errors: &mut Vec<LexerError>,
    ) {
        let gap = &line[from..to];
        let trimmed = gap.trim();
        if trimmed.is_empty() {
            return;
        }

        let leading = gap.len() - gap.trim_start().len();
        let start = position_in_line(line, line_start, from + leading);
        errors.push(LexerError::InvalidToken {
            token: trimmed.to_string(),
            line: start.line,
            index: emitted + 1,
            span: Span::covering(start, trimmed),
        });
    }

    fn report(&self, error: &LexerError) {
        let span = if self.preferences.include_position_in_errors {
            error.span()
        } else {
            None
        };
        log_error!(error.error_code(), &error.to_string(), span = span);
    }
}

fn position_in_line(line: &str, line_start: Position, byte: usize) -> Position {
    let columns = line[..byte].chars().count() as u32;
    Position::new(line_start.offset + byte, line_start.line, 1 + columns)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Length of the token starting at byte `pos`, trying each class in priority order
fn match_at(line: &str, pos: usize) -> Option<usize> {
    let rest = &line[pos..];
    let first = rest.chars().next()?;

    // Keywords, identifiers and booleans: a whole word, all lowercase
    let at_boundary = line[..pos].chars().next_back().map_or(true, |c| !is_word_char(c));
    if at_boundary && (first.is_ascii_lowercase() || first == '_') {
        let word_len = rest.find(|c| !is_word_char(c)).unwrap_or(rest.len());
        if is_lowercase_word(&rest[..word_len]) {
            return Some(word_len);
        }
    }

    let number = number_length(rest);
    if number > 0 {
        return Some(number);
    }

    if rest.starts_with(ASSIGNMENT_OPERATOR) {
        return Some(ASSIGNMENT_OPERATOR.len());
    }

    if let Some(op) = OPERATORS
        .iter()
        .chain(COMPARISON_OPERATORS)
        .find(|op| rest.starts_with(**op))
    {
        return Some(op.len());
    }

    match first {
        '"' => rest[1..].find('"').map(|close| close + 2),
        '\'' => {
            let mut chars = rest.chars();
            chars.next();
            match (chars.next(), chars.next()) {
                (Some(c), Some('\'')) if c != '\'' => Some(2 + c.len_utf8()),
                _ => None,
            }
        }
        c if PUNCTUATION.contains(&c) => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn texts(source: &str) -> Vec<String> {
        LexicalAnalyzer::new()
            .tokenize(source)
            .unwrap()
            .texts()
            .map(str::to_string)
            .collect()
    }

    fn errors(source: &str) -> Vec<LexerError> {
        LexicalAnalyzer::new()
            .tokenize(source)
            .unwrap_err()
            .errors()
            .to_vec()
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            texts("whole x -> 10;"),
            ["whole", "x", "->", "10", ";"]
        );
        assert_eq!(
            texts("fraction f->3.14159+2^8;"),
            ["fraction", "f", "->", "3.14159", "+", "2^8", ";"]
        );
    }

    #[test]
    fn test_token_kinds() {
        let stream = LexicalAnalyzer::new()
            .tokenize("truth t -> yes; if (t && u) { say \"hi\"; } c -> 'a';")
            .unwrap();
        let kinds: Vec<TokenKind> = stream.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::Keyword);
        assert_eq!(kinds[1], TokenKind::Identifier);
        assert_eq!(kinds[2], TokenKind::AssignmentOperator);
        assert_eq!(kinds[3], TokenKind::Identifier);
        assert_eq!(kinds[8], TokenKind::Operator);
        assert!(stream.iter().any(|t| t.text == "\"hi\"" && t.kind == TokenKind::Literal));
        assert!(stream.iter().any(|t| t.text == "'a'" && t.kind == TokenKind::Literal));
    }

    #[test]
    fn test_lowercase_identifiers_accepted() {
        assert_eq!(texts("x num1 _tmp"), ["x", "num1", "_tmp"]);
        assert_eq!(texts("ifx"), ["ifx"]);
    }

    #[test]
    fn test_uppercase_and_digit_led_words_rejected() {
        let errs = errors("X MyVar");
        assert_eq!(errs.len(), 1);
        assert_matches!(&errs[0], LexerError::InvalidToken { token, line: 1, index: 1, .. }
            if token == "X MyVar");

        let errs = errors("whole 1num -> 2;");
        assert_matches!(&errs[0], LexerError::InvalidToken { token, index: 3, .. }
            if token == "num");
    }

    #[test]
    fn test_error_line_and_index() {
        let errs = errors("whole x -> 1;\nwhole Y -> 2;\n");
        assert_eq!(errs.len(), 1);
        assert_matches!(&errs[0], LexerError::InvalidToken { token, line: 2, index: 7, span }
            if token == "Y" && span.start.column == 7);
        assert_eq!(
            errs[0].to_string(),
            "Invalid token 'Y' at line 2, token 7"
        );
    }

    #[test]
    fn test_all_errors_collected() {
        let errs = errors("A;\nB;\nc = 1;");
        assert_eq!(errs.len(), 3);
        assert_eq!(
            errs.iter().map(|e| e.line()).collect::<Vec<_>>(),
            [Some(1), Some(2), Some(3)]
        );
        assert_matches!(&errs[2], LexerError::InvalidToken { token, .. } if token == "=");
    }

    #[test]
    fn test_comments_and_lines() {
        let mut analyzer = LexicalAnalyzer::new();
        let stream = analyzer
            .tokenize("/* header\n spans */ whole x -> 1; // trailing\nsay x;")
            .unwrap();
        assert_eq!(stream.len(), 8);
        assert_eq!(stream.get(0).map(|t| t.line()), Some(2));
        assert_eq!(stream.get(5).map(|t| t.line()), Some(3));

        let metrics = analyzer.metrics();
        assert_eq!(metrics.comments_stripped(), 2);
        assert_eq!(metrics.lines_scanned, 3);
        assert_eq!(metrics.total_tokens, 8);
        assert_eq!(metrics.tokens_by_kind.get(&TokenKind::Keyword), Some(&2));
    }

    #[test]
    fn test_unclosed_block_opener_scans_as_operators() {
        assert_eq!(
            texts("whole x -> 4 /* 2;"),
            ["whole", "x", "->", "4", "/", "*", "2", ";"]
        );
    }

    #[test]
    fn test_unclosed_quote_is_invalid() {
        let errs = errors("say \"open;");
        assert_eq!(errs.len(), 1);
        assert_matches!(&errs[0], LexerError::InvalidToken { token, index: 2, .. } if token == "\"");
    }

    #[test]
    fn test_metrics_without_detail() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: false,
            include_position_in_errors: false,
        };
        let mut analyzer = LexicalAnalyzer::with_preferences(preferences);
        analyzer.tokenize("say 1;").unwrap();
        assert_eq!(analyzer.metrics().total_tokens, 3);
        assert!(analyzer.metrics().tokens_by_kind.is_empty());
    }

    #[test]
    fn test_errors_display() {
        let err = LexicalAnalyzer::new().tokenize("Q").unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err.to_string().contains("1 error(s)"));
        assert!(err.to_string().contains("Invalid token 'Q'"));
    }
}
