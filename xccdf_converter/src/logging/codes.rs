//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Input file error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// XML event stream error codes
pub mod stream {
    use super::Code;

    pub const MALFORMED_XML: Code = Code::new("E020");
    pub const NESTING_TOO_DEEP: Code = Code::new("E021");
    pub const UNBOUND_PREFIX: Code = Code::new("E022");
}

/// Tag interpreter error codes
pub mod interpreter {
    use super::Code;

    pub const STRUCTURAL_MISMATCH: Code = Code::new("E040");
    pub const MISSING_REQUIRED_FIELD: Code = Code::new("E041");
    pub const MISSING_ATTRIBUTE: Code = Code::new("E042");
    pub const STREAM_EXHAUSTED: Code = Code::new("E043");
    pub const RECORD_LIMIT_EXCEEDED: Code = Code::new("E044");
}

/// Output rendering and writing error codes
pub mod output {
    use super::Code;

    pub const SERIALIZATION_FAILED: Code = Code::new("E060");
    pub const UNSUPPORTED_ENCODING: Code = Code::new("E061");
    pub const UNMAPPABLE_CHARACTER: Code = Code::new("E062");
    pub const WRITE_FAILED: Code = Code::new("E063");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_VALIDATION_PASSED: Code = Code::new("I007");
    pub const DOCUMENT_INTERPRETED: Code = Code::new("I020");
    pub const OUTPUT_WRITTEN: Code = Code::new("I040");
    pub const CONVERSION_COMPLETE: Code = Code::new("I041");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const REGISTERED_CODES: &[ErrorMetadata] = &[
    // System errors
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal system error",
        "Contact system administrator or file bug report",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "System initialization failure",
        "Check logging configuration and environment",
    ),
    // Input file errors
    ErrorMetadata::new(
        "E005",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Input report not found at specified path",
        "Check file path and ensure the report exists",
    ),
    ErrorMetadata::new(
        "E006",
        "FileProcessing",
        Severity::Low,
        true,
        false,
        "Input report does not have .xml extension",
        "Rename the report or disable the extension requirement",
    ),
    ErrorMetadata::new(
        "E007",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Input report exceeds maximum size limit",
        "Split the scan or convert on a host with a larger limit build",
    ),
    ErrorMetadata::new(
        "E008",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Input report is empty",
        "Re-run the scan and make sure results were written",
    ),
    ErrorMetadata::new(
        "E009",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Permission denied accessing file",
        "Check file permissions and user access rights",
    ),
    ErrorMetadata::new(
        "E011",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "I/O error reading input",
        "Check disk health and file system state",
    ),
    ErrorMetadata::new(
        "E012",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Invalid input path",
        "Provide a path to a regular file",
    ),
    // Stream errors
    ErrorMetadata::new(
        "E020",
        "Stream",
        Severity::High,
        false,
        true,
        "Input is not well-formed XML",
        "Validate the report with an XML linter",
    ),
    ErrorMetadata::new(
        "E021",
        "Stream",
        Severity::High,
        false,
        true,
        "Element nesting exceeds the configured depth limit",
        "Verify the input is a genuine scan report",
    ),
    ErrorMetadata::new(
        "E022",
        "Stream",
        Severity::High,
        false,
        true,
        "Namespace prefix used without declaration",
        "Declare the prefix or regenerate the report",
    ),
    // Interpreter errors
    ErrorMetadata::new(
        "E040",
        "Interpreter",
        Severity::Critical,
        false,
        true,
        "Root element is not in the XCCDF 1.2 namespace",
        "Convert an XCCDF 1.2 result document",
    ),
    ErrorMetadata::new(
        "E041",
        "Interpreter",
        Severity::High,
        false,
        true,
        "TestResult is missing a required field",
        "Ensure the scan recorded target, identity and profile",
    ),
    ErrorMetadata::new(
        "E042",
        "Interpreter",
        Severity::High,
        false,
        true,
        "Element is missing a required attribute",
        "Regenerate the report with a conforming scanner",
    ),
    ErrorMetadata::new(
        "E043",
        "Interpreter",
        Severity::High,
        false,
        true,
        "Input ended before an open element was closed",
        "The report is truncated; re-run the scan",
    ),
    ErrorMetadata::new(
        "E044",
        "Interpreter",
        Severity::High,
        false,
        true,
        "Document exceeds the record limit",
        "Split the scan into smaller reports",
    ),
    // Output errors
    ErrorMetadata::new(
        "E060",
        "Output",
        Severity::High,
        false,
        true,
        "JSON serialization failed",
        "File bug report with the offending input",
    ),
    ErrorMetadata::new(
        "E061",
        "Output",
        Severity::Medium,
        true,
        true,
        "Requested output encoding is not supported",
        "Use a WHATWG encoding label such as utf-8 or windows-1252",
    ),
    ErrorMetadata::new(
        "E062",
        "Output",
        Severity::Medium,
        true,
        true,
        "Output contains characters the encoding cannot represent",
        "Choose utf-8 or enable non-ASCII escaping",
    ),
    ErrorMetadata::new(
        "E063",
        "Output",
        Severity::High,
        false,
        true,
        "Failed to write the output file",
        "Check that the destination directory exists and is writable",
    ),
    // Success codes
    ErrorMetadata::new(
        "I004",
        "System",
        Severity::Low,
        true,
        false,
        "System initialization completed",
        "Continue",
    ),
    ErrorMetadata::new(
        "I007",
        "FileProcessing",
        Severity::Low,
        true,
        false,
        "Input report validated",
        "Continue to interpretation",
    ),
    ErrorMetadata::new(
        "I020",
        "Interpreter",
        Severity::Low,
        true,
        false,
        "Result document assembled",
        "Continue to output",
    ),
    ErrorMetadata::new(
        "I040",
        "Output",
        Severity::Low,
        true,
        false,
        "JSON document written",
        "Continue",
    ),
    ErrorMetadata::new(
        "I041",
        "Pipeline",
        Severity::Low,
        true,
        false,
        "Conversion completed",
        "Continue",
    ),
];

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTERED_CODES
            .iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
