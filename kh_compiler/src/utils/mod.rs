//! Shared source-location types for the KH compiler stages.

pub mod span;

pub use span::{Position, SourceMap, Span};
