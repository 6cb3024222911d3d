// Internal modules
#[macro_use]
pub mod logging;
pub mod config;
pub mod document;
pub mod file_processor;
pub mod interpreter;
pub mod output;
pub mod pipeline;
pub mod stream;
pub mod tags;

// Re-export key types for library consumers
pub use config::runtime::{ConversionPreferences, RuntimeConfig};
pub use document::{Benchmark, Rule, RuleResult, Selection};
pub use interpreter::{build_document, InterpreterError};
pub use output::{OutputError, OutputOptions};
pub use pipeline::{
    build_document_from_file, convert, convert_reader, convert_with_preferences,
    ConversionResult, PipelineError,
};
pub use tags::{XccdfTag, XCCDF_NAMESPACE};
