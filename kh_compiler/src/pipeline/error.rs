use crate::automaton::AutomatonError;
use crate::config::ConfigError;
use crate::file_processor::FileProcessorError;
use crate::lexical::LexicalErrors;
use crate::logging::codes;

/// Failures that stop the pipeline before every stage has run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("{0}")]
    LexicalAnalysis(#[from] LexicalErrors),

    #[error("Automaton construction failed: {0}")]
    Automaton(#[from] AutomatonError),

    #[error("Configuration failed: {0}")]
    Configuration(#[from] ConfigError),
}

impl PipelineError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PipelineError::FileProcessing(e) => e.error_code(),
            PipelineError::LexicalAnalysis(_) => codes::lexical::LEXICAL_ANALYSIS_FAILED,
            PipelineError::Automaton(e) => e.error_code(),
            PipelineError::Configuration(_) => codes::system::CONFIGURATION_ERROR,
        }
    }
}
