mod error;
mod result;
mod validation;

pub use error::PipelineError;
pub use result::ConversionResult;
pub use validation::validate_pipeline;

use crate::config::runtime::ConversionPreferences;
use crate::document::Benchmark;
use crate::logging;
use crate::output::{render_bytes, write_document, OutputOptions};
use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

/// Convert a report file (file -> events -> document -> JSON file)
pub fn convert(
    input: &Path,
    output: &Path,
    encoding: &str,
    pretty: bool,
) -> Result<ConversionResult, PipelineError> {
    let prefs = ConversionPreferences::new(encoding, pretty);
    convert_with_preferences(input, output, &prefs)
}

/// Convert a report file honoring runtime preferences
///
/// Nothing is written unless the whole document was built and rendered.
pub fn convert_with_preferences(
    input: &Path,
    output: &Path,
    prefs: &ConversionPreferences,
) -> Result<ConversionResult, PipelineError> {
    let start_time = Instant::now();

    logging::with_file_context(input.to_path_buf(), 0, || {
        crate::log_info!("Starting XCCDF conversion",
            "input" => input.display(),
            "output" => output.display(),
            "encoding" => prefs.encoding,
            "pretty" => prefs.pretty
        );

        // Stage 1: input validation
        let opened = crate::file_processor::open_input_with_preferences(input, prefs)?;

        // Stage 2: single-pass interpretation
        let document = crate::interpreter::build_document(opened.reader).map_err(|e| {
            crate::log_error!(e.error_code(), "Failed to interpret report",
                position = e.position(),
                "error" => e);
            e
        })?;

        // Stage 3: render, encode and write
        let bytes_written = write_document(&document, output, &OutputOptions::from(prefs))?;

        let result = ConversionResult {
            input_metadata: Some(opened.metadata),
            profile_count: document.profiles.len(),
            selection_count: document.selection_count(),
            rule_count: document.rules.len(),
            result_count: document.results.len(),
            has_score: document.score.is_some(),
            bytes_written,
            encoding: prefs.encoding.clone(),
            processing_duration: start_time.elapsed(),
        };

        if prefs.enable_performance_logging {
            result.log_success(&input.display().to_string(), &output.display().to_string());
        }

        Ok(result)
    })
}

/// Convert an in-memory report, returning the encoded JSON bytes
pub fn convert_reader<R: BufRead>(
    reader: R,
    prefs: &ConversionPreferences,
) -> Result<Vec<u8>, PipelineError> {
    let document = crate::interpreter::build_document(reader)?;
    Ok(render_bytes(&document, &OutputOptions::from(prefs))?)
}

/// Validate and interpret a report file without writing anything
pub fn build_document_from_file(input: &Path) -> Result<Benchmark, PipelineError> {
    logging::with_file_context(input.to_path_buf(), 0, || {
        let opened = crate::file_processor::open_input(input)?;
        Ok(crate::interpreter::build_document(opened.reader)?)
    })
}
