use crate::file_processor::FileProcessorError;
use crate::interpreter::InterpreterError;
use crate::logging::{codes, Code};
use crate::output::OutputError;

/// Conversion pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Interpretation failed: {0}")]
    Interpretation(#[from] InterpreterError),

    #[error("Output failed: {0}")]
    Output(#[from] OutputError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::FileProcessing(e) => e.error_code(),
            PipelineError::Interpretation(e) => e.error_code(),
            PipelineError::Output(e) => e.error_code(),
        }
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    /// Byte offset into the input, when the failure came from the tokenizer
    pub fn position(&self) -> Option<u64> {
        match self {
            PipelineError::Interpretation(e) => e.position(),
            _ => None,
        }
    }
}
