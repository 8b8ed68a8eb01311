mod error;
mod info;
pub mod output;
mod result;
mod validation;

pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo, PIPELINE_STAGES};
pub use output::PipelineOutput;
pub use result::{PipelineResult, StageDurations};
pub use validation::validate_pipeline;

use crate::automaton::TokenAutomata;
use crate::config::runtime::{LexicalPreferences, RuntimeConfig};
use crate::file_processor::FileProcessor;
use crate::lexical::{strip_comments, LexicalAnalyzer};
use crate::logging::{self, codes};
use crate::utils::SourceMap;
use crate::{log_info, log_performance};
use std::path::PathBuf;
use std::time::Instant;

/// Run every stage over in-memory source text (lexical -> automaton -> token
/// validation -> symbols -> conditionals)
pub fn process_source(source: &str) -> Result<PipelineResult, PipelineError> {
    process_source_with_preferences(source, LexicalPreferences::default())
}

pub fn process_source_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> Result<PipelineResult, PipelineError> {
    let start = Instant::now();
    let mut durations = StageDurations::default();

    // Stage 1: lexical analysis; a failed run hands nothing downstream
    let stage = Instant::now();
    let mut analyzer = LexicalAnalyzer::with_preferences(preferences);
    let stream = analyzer.tokenize(source)?;
    let lexical_metrics = analyzer.metrics().clone();
    durations.lexical = stage.elapsed();
    log_performance!(codes::success::TOKENIZATION_COMPLETE, "Lexical stage timing",
        duration = durations.lexical, "tokens" => stream.len());

    // Stage 2: trie NFA and its determinized form
    let stage = Instant::now();
    let automata = TokenAutomata::build(&stream)?;
    durations.automaton = stage.elapsed();
    log_performance!(codes::success::DETERMINIZATION_COMPLETE, "Automaton stage timing",
        duration = durations.automaton, "dfa_states" => automata.dfa.state_count());

    // Stage 3: re-check each token against the DFA
    let stage = Instant::now();
    let validation = automata.validate(&stream);
    durations.token_validation = stage.elapsed();

    // Stage 4: symbol table, independent of the verdicts
    let stage = Instant::now();
    let symbols = crate::symbols::build_symbol_table(&stream);
    durations.symbols = stage.elapsed();

    // Stage 5: conditional structure
    let stage = Instant::now();
    let conditional = crate::conditional::validate_conditionals(&stream);
    durations.conditional = stage.elapsed();

    durations.total = start.elapsed();

    let result = PipelineResult {
        stream,
        lexical_metrics,
        automata,
        validation,
        symbols,
        conditional,
        source_map: SourceMap::new(strip_comments(source).text),
        file_metadata: None,
        durations,
    };
    result.log_completion();

    Ok(result)
}

/// Read and process one file with default preferences
pub fn process_file(file_path: &str) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(file_path, &RuntimeConfig::default())
}

pub fn process_file_with_config(
    file_path: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    logging::with_file_context(PathBuf::from(file_path), 0, || {
        log_info!("Starting KH compilation pipeline", "file" => file_path);

        let file_result =
            FileProcessor::from_preferences(&config.file_processor).process_file(file_path)?;

        let mut result =
            process_source_with_preferences(&file_result.source, config.lexical.clone())?;
        result.file_metadata = Some(file_result.metadata);
        result.durations.total += file_result.duration;

        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolValue;
    use assert_matches::assert_matches;

    const PROGRAM: &str = "\
// demo program
whole x -> 10 - 3 * 2;
fraction ratio -> 1 / 3;
/* block
   comment */
truth ready -> yes;
{
    whole y -> 2;
}
if (x > 5) { say x; } else { say 0; }
";

    #[test]
    fn test_validate_pipeline() {
        assert!(validate_pipeline().is_ok());
    }

    #[test]
    fn test_process_source_runs_every_stage() {
        let result = process_source(PROGRAM).unwrap();

        assert!(result.success());
        assert!(result.validation.all_accepted());
        assert_eq!(result.validation.verdicts.len(), result.stream.len());
        assert_eq!(result.lexical_metrics.comments_stripped(), 2);

        let x = result.symbols.table.get("x").unwrap();
        assert_eq!(x.value, SymbolValue::Resolved("4.00000".to_string()));
        assert_eq!(x.memory_label, "M1000");
        assert_eq!(x.declaration_line, 2);

        let y = result.symbols.table.get("y").unwrap();
        assert!(y.scope.starts_with("local_"));
        assert_eq!(y.memory_label, "M1003");

        assert_eq!(result.conditional.if_statements, 1);
        assert!(result.file_metadata.is_none());
        assert_eq!(result.source_map.get_line(2), Some("whole x -> 10 - 3 * 2;"));
    }

    #[test]
    fn test_lexical_failure_aborts() {
        let error = process_source("whole MyVar -> 1;\nwhole 1num -> 2;").unwrap_err();
        assert_matches!(error, PipelineError::LexicalAnalysis(ref errors) if errors.len() == 2);
        assert_eq!(error.error_code(), codes::lexical::LEXICAL_ANALYSIS_FAILED);
    }

    #[test]
    fn test_conditional_error_is_not_fatal() {
        let result = process_source("whole x -> 1;\nif x > 5) { }").unwrap();
        assert!(!result.success());
        assert!(result.symbols.table.contains("x"));
        assert_eq!(
            result.conditional.error.as_ref().map(|e| e.position()),
            Some(6)
        );
    }

    #[test]
    fn test_unclosed_block_opener_is_not_fatal() {
        let result = process_source("whole x -> 4 /* 2;").unwrap();
        assert_eq!(
            result.stream.texts().collect::<Vec<_>>(),
            ["whole", "x", "->", "4", "/", "*", "2", ";"]
        );
        assert_eq!(result.lexical_metrics.comments_stripped(), 0);
        assert!(result.symbols.table.contains("x"));
    }

    #[test]
    fn test_boolean_words_follow_identifier_priority() {
        let result = process_source("truth yes -> no;\nif (yes) { say 1; }").unwrap();
        assert!(result.success());
        assert_eq!(result.stream.get(1).map(|t| t.kind), Some(crate::tokens::TokenKind::Identifier));
        assert!(result.symbols.table.contains("yes"));
        assert!(result.conditional.is_valid());
    }

    #[test]
    fn test_scope_underflow_marks_failure() {
        let result = process_source("} whole x -> 1;").unwrap();
        assert!(result.symbols.has_scope_underflow());
        assert!(!result.success());
    }

    #[test]
    fn test_output_is_deterministic() {
        let first = process_source(PROGRAM).unwrap().output().to_json().unwrap();
        let second = process_source(PROGRAM).unwrap().output().to_json().unwrap();
        assert_eq!(first, second);
        assert!(first.contains("\"memory_label\": \"M1000\""));
        assert!(first.contains("\"success\": true"));
    }

    #[test]
    fn test_process_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.kh");
        std::fs::write(&path, PROGRAM).unwrap();

        let result = process_file(path.to_str().unwrap()).unwrap();
        assert!(result.success());
        let metadata = result.file_metadata.unwrap();
        assert!(metadata.is_kh_file());
        assert_eq!(metadata.line_count, PROGRAM.lines().count());
    }

    #[test]
    fn test_process_file_with_config_enforces_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.txt");
        std::fs::write(&path, "say x;").unwrap();

        let mut config = RuntimeConfig::default();
        config.file_processor.require_kh_extension = true;

        let error = process_file_with_config(path.to_str().unwrap(), &config).unwrap_err();
        assert_matches!(error, PipelineError::FileProcessing(_));
        assert_eq!(error.error_code(), codes::file_processing::INVALID_EXTENSION);
    }

    #[test]
    fn test_configuration_error_code() {
        let error = PipelineError::from(crate::config::ConfigError::Parse {
            message: "bad".to_string(),
        });
        assert_eq!(error.error_code(), codes::system::CONFIGURATION_ERROR);
        assert!(error.to_string().starts_with("Configuration failed"));
    }
}
