// Internal modules
pub mod automaton;
pub mod conditional;
pub mod config;
pub mod expression;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod symbols;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use pipeline::output::PipelineOutput;
pub use pipeline::{PipelineError, PipelineResult};
