//! Input report validation with compile-time limits and global logging integration

mod processor;

pub use processor::{FileMetadata, FileProcessorError, InputFileProcessor, OpenedInput};

use crate::config::runtime::ConversionPreferences;
use std::path::Path;

/// Validate and open a report with default settings
pub fn open_input(path: &Path) -> Result<OpenedInput, FileProcessorError> {
    InputFileProcessor::new().open(path)
}

/// Validate and open a report honoring runtime preferences
pub fn open_input_with_preferences(
    path: &Path,
    prefs: &ConversionPreferences,
) -> Result<OpenedInput, FileProcessorError> {
    InputFileProcessor::from_preferences(prefs).open(path)
}

/// Get the compile-time maximum report size
pub fn get_max_file_size() -> u64 {
    InputFileProcessor::max_file_size()
}
