//! JSON rendering and output encoding
//!
//! The document is rendered and encoded fully in memory; the output file is
//! only created once both steps have succeeded.

mod encode;
mod formatter;

pub use encode::{encode_text, resolve_encoding, OutputEncoding};
pub use formatter::AsciiFormatter;

use crate::config::runtime::ConversionPreferences;
use crate::logging::{codes, Code};
use crate::{log_error, log_success};
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};
use std::fs;
use std::path::Path;

/// Output stage errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization failed: {message}")]
    Serialization { message: String },

    #[error("Unsupported output encoding: {label}")]
    UnsupportedEncoding { label: String },

    #[error("Character {character:?} cannot be encoded as {encoding}")]
    UnmappableCharacter { character: char, encoding: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

impl OutputError {
    pub fn error_code(&self) -> Code {
        match self {
            OutputError::Serialization { .. } => codes::output::SERIALIZATION_FAILED,
            OutputError::UnsupportedEncoding { .. } => codes::output::UNSUPPORTED_ENCODING,
            OutputError::UnmappableCharacter { .. } => codes::output::UNMAPPABLE_CHARACTER,
            OutputError::Write { .. } => codes::output::WRITE_FAILED,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

/// How the result document is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Two-space indentation when true, no whitespace otherwise
    pub pretty: bool,
    pub encoding: String,
    /// Write non-ASCII characters as `\uXXXX` escapes
    pub escape_non_ascii: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            encoding: "utf-8".to_string(),
            escape_non_ascii: false,
        }
    }
}

impl From<&ConversionPreferences> for OutputOptions {
    fn from(prefs: &ConversionPreferences) -> Self {
        Self {
            pretty: prefs.pretty,
            encoding: prefs.encoding.clone(),
            escape_non_ascii: prefs.escape_non_ascii,
        }
    }
}

fn serialize_with<T, F>(value: &T, formatter: F) -> Result<String, OutputError>
where
    T: Serialize + ?Sized,
    F: Formatter,
{
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| OutputError::Serialization {
            message: e.to_string(),
        })?;
    String::from_utf8(buffer).map_err(|e| OutputError::Serialization {
        message: e.to_string(),
    })
}

/// Render a value as JSON text
pub fn render_json<T: Serialize + ?Sized>(
    value: &T,
    pretty: bool,
    escape_non_ascii: bool,
) -> Result<String, OutputError> {
    match (pretty, escape_non_ascii) {
        (true, false) => serialize_with(value, PrettyFormatter::new()),
        (true, true) => serialize_with(value, AsciiFormatter::new(PrettyFormatter::new())),
        (false, false) => serialize_with(value, CompactFormatter),
        (false, true) => serialize_with(value, AsciiFormatter::new(CompactFormatter)),
    }
}

/// Render and encode a value without touching the filesystem
pub fn render_bytes<T: Serialize + ?Sized>(
    value: &T,
    options: &OutputOptions,
) -> Result<Vec<u8>, OutputError> {
    let text = render_json(value, options.pretty, options.escape_non_ascii)?;
    encode_text(&text, &options.encoding)
}

/// Write a value as JSON to `path`, returning the number of bytes written
pub fn write_document<T: Serialize + ?Sized>(
    value: &T,
    path: &Path,
    options: &OutputOptions,
) -> Result<u64, OutputError> {
    let bytes = render_bytes(value, options)?;

    fs::write(path, &bytes).map_err(|e| {
        let error = OutputError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        log_error!(error.error_code(), "Failed to write output",
            "path" => path.display(),
            "error" => e
        );
        error
    })?;

    log_success!(
        codes::success::OUTPUT_WRITTEN,
        "Output written",
        "path" => path.display(),
        "bytes" => bytes.len(),
        "encoding" => options.encoding
    );

    Ok(bytes.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_pretty_and_compact_layout() {
        let value = json!({ "a": [1, 2], "b": "x" });

        assert_eq!(
            render_json(&value, false, false).unwrap(),
            r#"{"a":[1,2],"b":"x"}"#
        );
        assert_eq!(
            render_json(&value, true, false).unwrap(),
            "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": \"x\"\n}"
        );
    }

    #[test]
    fn test_ascii_escaping() {
        let value = json!({ "host": "caf\u{e9}", "note": "\u{1f600}" });

        let compact = render_json(&value, false, true).unwrap();
        assert!(compact.is_ascii());
        assert!(compact.contains(r#""caf\u00e9""#));
        assert!(compact.contains(r#""\ud83d\ude00""#));

        let parsed: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_ascii_escaping_keeps_pretty_layout() {
        let value = json!({ "k": "\u{e9}" });
        assert_eq!(
            render_json(&value, true, true).unwrap(),
            "{\n  \"k\": \"\\u00e9\"\n}"
        );
    }

    #[test]
    fn test_write_document_reports_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let options = OutputOptions {
            pretty: false,
            ..OutputOptions::default()
        };

        let written = write_document(&json!({ "x": 1 }), &path, &options).unwrap();
        assert_eq!(written, 7);
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"x":1}"#);
    }

    #[test]
    fn test_encoding_failure_leaves_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let options = OutputOptions {
            encoding: "no-such-encoding".to_string(),
            ..OutputOptions::default()
        };

        assert_matches!(
            write_document(&json!({ "x": 1 }), &path, &options),
            Err(OutputError::UnsupportedEncoding { .. })
        );
        assert!(!path.exists());
    }

    #[test]
    fn test_write_into_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");

        let error = write_document(&json!({}), &path, &OutputOptions::default()).unwrap_err();
        assert_matches!(error, OutputError::Write { .. });
        assert_eq!(error.error_code(), codes::output::WRITE_FAILED);
    }

    #[test]
    fn test_options_from_preferences() {
        let prefs = ConversionPreferences::new("latin1", false).with_escape_non_ascii(true);
        let options = OutputOptions::from(&prefs);

        assert!(!options.pretty);
        assert!(options.escape_non_ascii);
        assert_eq!(options.encoding, "latin1");
    }
}
