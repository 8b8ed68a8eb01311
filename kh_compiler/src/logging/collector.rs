//! Per-file diagnostic collection with cargo-style output

use super::codes;
use super::events::LogEvent;
use crate::config::compile_time::logging::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

// ============================================================================
// FILE PROCESSING CONTEXT
// ============================================================================

#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// PROCESSING SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

// ============================================================================
// ERROR COLLECTOR
// ============================================================================

/// Thread-safe collector of error and warning events, grouped by file
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    file_contexts: Mutex<BTreeMap<PathBuf, FileProcessingContext>>,
    processing_start: Instant,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            file_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    /// Record an event for a file. Past the per-file cap a single overflow
    /// warning is appended and further events are dropped.
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = lock(&self.file_events);
        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(
                codes::system::INTERNAL_ERROR,
                &format!(
                    "Too many diagnostics for file (limit: {})",
                    MAX_LOG_EVENTS_PER_FILE
                ),
            ));
        }
    }

    pub fn record_file_context(&self, context: FileProcessingContext) {
        lock(&self.file_contexts).insert(context.file_path.clone(), context);
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        lock(&self.file_events).clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = lock(&self.file_events);
        let contexts = lock(&self.file_contexts);

        let mut summary = ProcessingSummary {
            total_processing_time: self.processing_start.elapsed(),
            ..ProcessingSummary::default()
        };

        // Files with a context but no recorded events compiled cleanly
        for file_path in contexts.keys() {
            if !events.contains_key(file_path) {
                summary.successful_files += 1;
            }
        }

        for file_events in events.values() {
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();

            if errors > 0 {
                summary.failed_files += 1;
            } else if warnings > 0 {
                summary.files_with_warnings += 1;
            } else {
                summary.successful_files += 1;
            }

            summary.total_errors += errors;
            summary.total_warnings += warnings;
        }

        summary.total_files =
            summary.successful_files + summary.failed_files + summary.files_with_warnings;
        summary
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CARGO-STYLE FORMATTING
// ============================================================================

fn span_suffix(file_path: &Path, event: &LogEvent) -> String {
    event
        .span
        .as_ref()
        .map(|s| {
            format!(
                "\n  --> {}:{}:{}",
                file_path.display(),
                s.start().line,
                s.start().column
            )
        })
        .unwrap_or_default()
}

fn push_context(output: &mut String, event: &LogEvent) {
    for (key, value) in &event.context {
        if key != "file" && key != "file_id" {
            output.push_str(&format!("  = {}: {}\n", key, value));
        }
    }
}

pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        if events.is_empty() {
            continue;
        }

        output.push_str(&format!("Checking {}...\n", file_path.display()));

        for event in events.iter().filter(|e| e.is_error()) {
            output.push_str(&format!(
                "error[{}]: {}{}\n",
                event.code,
                event.message,
                span_suffix(file_path, event)
            ));
            output.push_str(&format!(
                "  = severity: {}, category: {}\n",
                event.severity(),
                event.category()
            ));
            push_context(&mut output, event);

            let action = event.recommended_action();
            if action != "No specific action available" {
                output.push_str(&format!("  = help: {}\n", action));
            }
        }

        for event in events.iter().filter(|e| e.is_warning()) {
            output.push_str(&format!(
                "warning[{}]: {}{}\n",
                event.code,
                event.message,
                span_suffix(file_path, event)
            ));
            push_context(&mut output, event);
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.has_errors() {
        output.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }
    if summary.has_warnings() {
        output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_error_collector_basic() {
        let collector = ErrorCollector::new();
        let file_path = PathBuf::from("code.kh");

        collector.record_event(
            &file_path,
            LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "Test error"),
        );

        let all = collector.get_all_file_events();
        assert_eq!(all.get(&file_path).map(Vec::len), Some(1));
        assert!(all[&file_path][0].is_error());
    }

    #[test]
    fn test_processing_summary() {
        let collector = ErrorCollector::new();
        let clean = PathBuf::from("clean.kh");
        let broken = PathBuf::from("broken.kh");
        let noisy = PathBuf::from("noisy.kh");

        collector.record_file_context(FileProcessingContext::new(clean, 0));
        collector.record_event(
            &broken,
            LogEvent::error(codes::lexical::INVALID_TOKEN, "Error"),
        );
        collector.record_event(
            &noisy,
            LogEvent::warning(codes::symbols::DECLARATION_ERROR, "Warning"),
        );

        let summary = collector.get_summary();
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.successful_files, 1);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.files_with_warnings, 1);
        assert_eq!(summary.total_errors, 1);
        assert_eq!(summary.total_warnings, 1);
    }

    #[test]
    fn test_per_file_cap_adds_single_overflow_notice() {
        let collector = ErrorCollector::new();
        let file_path = PathBuf::from("many.kh");

        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 10 {
            collector.record_event(
                &file_path,
                LogEvent::warning(codes::symbols::EXPRESSION_ERROR, "bad"),
            );
        }

        let events = collector
            .get_all_file_events()
            .remove(&file_path)
            .unwrap_or_default();
        assert_eq!(events.len(), MAX_LOG_EVENTS_PER_FILE + 1);
        assert!(events
            .last()
            .map(|e| e.message.starts_with("Too many diagnostics"))
            .unwrap_or(false));
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let file_path = PathBuf::from("code.kh");
        let span = Span::covering(Position::new(6, 1, 7), "MyVar");

        collector.record_event(
            &file_path,
            LogEvent::error(codes::lexical::INVALID_TOKEN, "Invalid token 'MyVar'")
                .with_span(span)
                .with_context("token_index", "2")
                .with_context("file", "code.kh"),
        );

        let output = format_cargo_style_errors(&collector);
        assert!(output.contains("Checking code.kh..."));
        assert!(output.contains("error[E020]: Invalid token 'MyVar'"));
        assert!(output.contains("--> code.kh:1:7"));
        assert!(output.contains("= token_index: 2"));
        assert!(!output.contains("= file:"));
        assert!(output.contains("Total errors: 1"));
    }
}
