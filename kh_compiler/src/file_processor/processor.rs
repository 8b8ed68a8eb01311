use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Extension KH sources conventionally carry
pub const KH_EXTENSION: &str = "kh";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .kh, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::EmptyFile => codes::file_processing::EMPTY_FILE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            FileProcessorError::TooManyLines { .. } => codes::file_processing::TOO_MANY_LINES,
        }
    }

    fn from_io(error: std::io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            ErrorKind::NotFound => FileProcessorError::FileNotFound { path },
            ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied { path },
            ErrorKind::InvalidData => FileProcessorError::InvalidEncoding { path },
            _ => FileProcessorError::IoError {
                message: format!("'{}': {}", path, error),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Canonical path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    /// Filled in once the contents have been read
    pub line_count: usize,
}

impl FileMetadata {
    pub fn is_kh_file(&self) -> bool {
        self.extension.as_deref() == Some(KH_EXTENSION)
    }

    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }

    pub fn human_readable_size(&self) -> String {
        human_readable(self.size)
    }
}

fn human_readable(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut scaled = size as f64;
    let mut unit = 0;

    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", size, UNITS[0])
    } else {
        format!("{:.2} {}", scaled, UNITS[unit])
    }
}

#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub duration: Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }
}

/// Reads one source file after checking it against the compile-time limits
#[derive(Debug, Clone)]
pub struct FileProcessor {
    require_kh_extension: bool,
    enable_performance_logging: bool,
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            require_kh_extension: false,
            enable_performance_logging: true,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_kh_extension: prefs.require_kh_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_kh_extension_required(mut self, required: bool) -> Self {
        self.require_kh_extension = required;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    pub fn process_file(&self, file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
        let start = Instant::now();
        log_debug!("Starting file processing", "file" => file_path);

        let outcome = self.read_checked(file_path, start);
        match &outcome {
            Ok(result) => self.log_processing_success(result, file_path),
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(), "file" => file_path);
            }
        }
        outcome
    }

    fn read_checked(
        &self,
        file_path: &str,
        start: Instant,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let path = validate_path(file_path)?;
        let mut metadata = collect_metadata(&path)?;
        self.validate_metadata(&metadata)?;

        let source = fs::read_to_string(&path).map_err(|e| FileProcessorError::from_io(e, &path))?;

        let line_count = source.lines().count();
        if line_count > MAX_LINE_COUNT {
            return Err(FileProcessorError::TooManyLines {
                lines: line_count,
                max_lines: MAX_LINE_COUNT,
            });
        }
        metadata.line_count = line_count;

        Ok(FileProcessingResult {
            source,
            metadata,
            duration: start.elapsed(),
        })
    }

    fn validate_metadata(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            });
        }

        if metadata.size == 0 {
            return Err(FileProcessorError::EmptyFile);
        }

        if self.require_kh_extension && !metadata.is_kh_file() {
            return Err(FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            });
        }

        if !metadata.is_kh_file() {
            log_debug!("Processing file without .kh extension",
                "extension" => metadata.extension.as_deref().unwrap_or("none"));
        }

        Ok(())
    }

    fn log_processing_success(&self, result: &FileProcessingResult, file_path: &str) {
        let duration_ms = format!("{:.2}", result.duration.as_secs_f64() * 1000.0);

        if self.enable_performance_logging {
            log_success!(codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully with performance metrics",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "size_human" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "chars" => result.char_count(),
                "duration_ms" => duration_ms,
                "is_large_file" => result.metadata.is_large_file()
            );
        } else {
            log_success!(codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully",
                "file" => file_path,
                "lines" => result.metadata.line_count
            );
        }
    }
}

fn validate_path(file_path: &str) -> Result<PathBuf, FileProcessorError> {
    if file_path.trim().is_empty() {
        return Err(FileProcessorError::InvalidPath {
            path: file_path.to_string(),
        });
    }

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(FileProcessorError::FileNotFound {
            path: file_path.to_string(),
        });
    }
    if !path.is_file() {
        return Err(FileProcessorError::InvalidPath {
            path: file_path.to_string(),
        });
    }

    path.canonicalize()
        .map_err(|e| FileProcessorError::from_io(e, path))
}

fn collect_metadata(path: &Path) -> Result<FileMetadata, FileProcessorError> {
    let meta = fs::metadata(path).map_err(|e| FileProcessorError::from_io(e, path))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    Ok(FileMetadata {
        path: path.to_path_buf(),
        size: meta.len(),
        extension,
        line_count: 0,
    })
}
