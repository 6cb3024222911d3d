//! Input report validation and opening

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, READ_BUFFER_SIZE,
};
use crate::config::runtime::ConversionPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_info, log_success, log_warning};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Input file errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .xml, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty: {path}")]
    EmptyFile { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::EmptyFile { .. } => codes::file_processing::EMPTY_FILE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }
}

/// Metadata collected while validating an input report
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Lowercased file extension (if any)
    pub extension: Option<String>,
    pub is_xml_file: bool,
    pub modified: Option<std::time::SystemTime>,
}

impl FileMetadata {
    /// Get file size in human-readable format
    pub fn human_readable_size(&self) -> String {
        human_readable(self.size)
    }

    /// Reports above the threshold get a progress hint in the logs
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

pub(crate) fn human_readable(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// A validated report, opened for buffered reading
#[derive(Debug)]
pub struct OpenedInput {
    pub reader: BufReader<File>,
    pub metadata: FileMetadata,
}

/// Validates input reports against compile-time limits and runtime preferences
#[derive(Debug, Clone)]
pub struct InputFileProcessor {
    pub require_xml_extension: bool,
    pub enable_performance_logging: bool,
}

impl Default for InputFileProcessor {
    fn default() -> Self {
        Self {
            require_xml_extension: false,
            enable_performance_logging: true,
        }
    }
}

impl InputFileProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preferences(prefs: &ConversionPreferences) -> Self {
        Self {
            require_xml_extension: prefs.require_xml_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_xml_extension_required(mut self, required: bool) -> Self {
        self.require_xml_extension = required;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Validate a report path and open it for streaming
    pub fn open(&self, file_path: &Path) -> Result<OpenedInput, FileProcessorError> {
        let display = file_path.display().to_string();
        log_debug!("Validating input report", "file" => display);

        let path = self.validate_path(file_path)?;
        let metadata = self.get_metadata(&path)?;
        self.validate_file(&metadata, &display)?;

        let file = File::open(&path).map_err(|e| {
            let error = match e.kind() {
                std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                    path: display.clone(),
                },
                _ => FileProcessorError::IoError {
                    message: format!("Failed to open '{}': {}", display, e),
                },
            };
            log_error!(error.error_code(), "Failed to open input report",
                "path" => display,
                "io_error" => e);
            error
        })?;

        if self.enable_performance_logging {
            log_success!(
                codes::success::FILE_VALIDATION_PASSED,
                "Input report validated",
                "file" => display,
                "size_bytes" => metadata.size,
                "size_human" => metadata.human_readable_size(),
                "is_large_file" => metadata.is_large_file()
            );
        } else {
            log_success!(
                codes::success::FILE_VALIDATION_PASSED,
                "Input report validated",
                "file" => display
            );
        }

        if metadata.is_large_file() {
            log_info!("Large report; conversion may take a while",
                "size_human" => metadata.human_readable_size());
        }

        Ok(OpenedInput {
            reader: BufReader::with_capacity(READ_BUFFER_SIZE, file),
            metadata,
        })
    }

    fn validate_path(&self, file_path: &Path) -> Result<PathBuf, FileProcessorError> {
        let display = file_path.display().to_string();

        if display.is_empty() {
            let error = FileProcessorError::InvalidPath { path: display };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        if !file_path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: display.clone(),
            };
            log_error!(error.error_code(), "File not found", "path" => display);
            return Err(error);
        }

        if !file_path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: display.clone(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => display);
            return Err(error);
        }

        file_path.canonicalize().map_err(|e| {
            let error = FileProcessorError::IoError {
                message: format!("Failed to resolve path '{}': {}", display, e),
            };
            log_error!(error.error_code(), "Failed to canonicalize path",
                "path" => display,
                "io_error" => e);
            error
        })
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let path_str = path.display().to_string();
            let error = match e.kind() {
                std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                    path: path_str.clone(),
                },
                _ => FileProcessorError::IoError {
                    message: format!("Failed to read metadata for '{}': {}", path_str, e),
                },
            };
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path_str,
                "io_error" => e);
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_xml_file = extension.as_deref() == Some("xml");

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            is_xml_file,
            modified: metadata.modified().ok(),
        })
    }

    fn validate_file(
        &self,
        metadata: &FileMetadata,
        file_path: &str,
    ) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds compile-time maximum size limit",
                "file" => file_path,
                "size_human" => metadata.human_readable_size(),
                "limit_human" => human_readable(MAX_FILE_SIZE));
            return Err(error);
        }

        if metadata.size == 0 {
            let error = FileProcessorError::EmptyFile {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "File is empty", "file" => file_path);
            return Err(error);
        }

        if !metadata.is_xml_file {
            if self.require_xml_extension {
                let error = FileProcessorError::InvalidExtension {
                    extension: metadata.extension.clone(),
                };
                log_error!(error.error_code(), "Input report must have .xml extension",
                    "file" => file_path,
                    "extension" => metadata.extension.as_deref().unwrap_or("none"));
                return Err(error);
            }
            log_warning!("Input report does not have .xml extension",
                "file" => file_path);
        }

        Ok(())
    }
}
