use crate::config::compile_time::{automaton, file_processing, lexical};
use crate::file_processor::KH_EXTENSION;

/// Stage names in execution order
pub const PIPELINE_STAGES: &[&str] = &[
    "file processing",
    "lexical analysis",
    "automaton construction",
    "token validation",
    "symbol table",
    "conditional validation",
];

#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub stages: Vec<&'static str>,
    pub max_file_size: u64,
    pub max_line_count: usize,
    pub max_token_count: usize,
    pub max_states: usize,
    pub extension: &'static str,
    pub build_profile: &'static str,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "KH Compiler Pipeline:\n\
             - Stages: {}\n\
             - Max File Size: {} bytes\n\
             - Max Lines: {}\n\
             - Max Tokens: {}\n\
             - Max Automaton States: {}\n\
             - Source Extension: .{}\n\
             - Build Profile: {}",
            self.stages.join(" -> "),
            self.max_file_size,
            self.max_line_count,
            self.max_token_count,
            self.max_states,
            self.extension,
            self.build_profile
        )
    }
}

pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        stages: PIPELINE_STAGES.to_vec(),
        max_file_size: file_processing::MAX_FILE_SIZE,
        max_line_count: file_processing::MAX_LINE_COUNT,
        max_token_count: lexical::MAX_TOKEN_COUNT,
        max_states: automaton::MAX_STATES,
        extension: KH_EXTENSION,
        build_profile: crate::config::build_info::profile(),
    }
}
