use super::result::PipelineResult;
use crate::automaton::{AutomatonSummary, TokenValidation};
use crate::conditional::ConditionalValidation;
use crate::lexical::LexicalMetrics;
use crate::symbols::SymbolTable;
use crate::tokens::Token;
use serde::Serialize;

/// Serializable view of a run.
///
/// Carries no timestamps or durations, so identical input serializes to
/// identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOutput {
    pub success: bool,
    pub tokens: Vec<Token>,
    pub lexical_metrics: LexicalMetrics,
    pub nfa: AutomatonSummary,
    pub dfa: AutomatonSummary,
    pub validation: TokenValidation,
    pub symbols: SymbolTable,
    /// Symbol table diagnostics, rendered
    pub symbol_diagnostics: Vec<String>,
    pub conditional: ConditionalValidation,
}

impl PipelineOutput {
    pub fn from_result(result: &PipelineResult) -> Self {
        Self {
            success: result.success(),
            tokens: result.stream.tokens().to_vec(),
            lexical_metrics: result.lexical_metrics.clone(),
            nfa: result.automata.nfa.summary(),
            dfa: result.automata.dfa.summary(),
            validation: result.validation.clone(),
            symbols: result.symbols.table.clone(),
            symbol_diagnostics: result
                .symbols
                .diagnostics
                .iter()
                .map(ToString::to_string)
                .collect(),
            conditional: result.conditional.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
