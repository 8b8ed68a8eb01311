use super::output::PipelineOutput;
use crate::automaton::{TokenAutomata, TokenValidation};
use crate::conditional::ConditionalValidation;
use crate::file_processor::FileMetadata;
use crate::lexical::LexicalMetrics;
use crate::symbols::SymbolTableResult;
use crate::tokens::TokenStream;
use crate::utils::SourceMap;
use std::time::Duration;

/// Wall-clock time spent in each stage
#[derive(Debug, Clone, Copy, Default)]
pub struct StageDurations {
    pub lexical: Duration,
    pub automaton: Duration,
    pub token_validation: Duration,
    pub symbols: Duration,
    pub conditional: Duration,
    pub total: Duration,
}

/// Every stage's output for one source document
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub stream: TokenStream,
    pub lexical_metrics: LexicalMetrics,
    pub automata: TokenAutomata,
    pub validation: TokenValidation,
    pub symbols: SymbolTableResult,
    pub conditional: ConditionalValidation,
    /// Comment-stripped source; token spans index into it
    pub source_map: SourceMap,
    /// Present when the source came from a file
    pub file_metadata: Option<FileMetadata>,
    pub durations: StageDurations,
}

impl PipelineResult {
    /// Non-fatal stage failures still make the run unsuccessful
    pub fn success(&self) -> bool {
        self.validation.all_accepted()
            && self.conditional.is_valid()
            && !self.symbols.has_scope_underflow()
    }

    pub fn output(&self) -> PipelineOutput {
        PipelineOutput::from_result(self)
    }

    pub fn log_completion(&self) {
        let duration_ms = format!("{:.2}", self.durations.total.as_secs_f64() * 1000.0);
        if self.success() {
            crate::log_success!(
                crate::logging::codes::success::PIPELINE_COMPLETE,
                "KH pipeline completed successfully",
                "tokens" => self.stream.len(),
                "symbols" => self.symbols.table.len(),
                "duration_ms" => duration_ms
            );
        } else {
            crate::log_info!("KH pipeline completed with failures",
                "rejected_tokens" => self.validation.rejected,
                "conditional_valid" => self.conditional.is_valid(),
                "scope_underflow" => self.symbols.has_scope_underflow(),
                "duration_ms" => duration_ms
            );
        }
    }
}
