//! Source file loading
//!
//! Size and line-count caps are compile-time limits; the `.kh` extension
//! requirement and timing output are runtime preferences.

mod processor;

use crate::logging::codes;
pub use processor::{
    FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError, KH_EXTENSION,
};

/// Process a file with default settings
pub fn process_file(file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

/// Check at startup that every file processing code is registered
pub fn validate_file_processor_codes() -> Result<(), String> {
    let file_codes = [
        codes::file_processing::FILE_NOT_FOUND,
        codes::file_processing::INVALID_EXTENSION,
        codes::file_processing::FILE_TOO_LARGE,
        codes::file_processing::EMPTY_FILE,
        codes::file_processing::PERMISSION_DENIED,
        codes::file_processing::INVALID_ENCODING,
        codes::file_processing::IO_ERROR,
        codes::file_processing::INVALID_PATH,
        codes::file_processing::TOO_MANY_LINES,
        codes::success::FILE_PROCESSING_SUCCESS,
    ];

    match file_codes.iter().find(|code| !codes::is_registered(**code)) {
        Some(code) => Err(format!(
            "File processor error code {} not found in metadata registry",
            code.as_str()
        )),
        None => Ok(()),
    }
}
