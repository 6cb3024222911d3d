use crate::logging::{codes, Code};
use crate::stream::StreamError;

pub type InterpreterResult<T> = Result<T, InterpreterError>;

/// Fatal conditions raised while assembling the result document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpreterError {
    #[error("Structural mismatch: {message}")]
    StructuralMismatch { message: String },

    #[error("TestResult is missing required field '{field}'")]
    MissingRequiredField { field: &'static str },

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Input ended before {element} was closed")]
    StreamExhausted { element: String },

    #[error("Document exceeds the limit of {max} {limit}")]
    LimitExceeded { limit: &'static str, max: usize },

    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl InterpreterError {
    pub fn error_code(&self) -> Code {
        match self {
            InterpreterError::StructuralMismatch { .. } => codes::interpreter::STRUCTURAL_MISMATCH,
            InterpreterError::MissingRequiredField { .. } => {
                codes::interpreter::MISSING_REQUIRED_FIELD
            }
            InterpreterError::MissingAttribute { .. } => codes::interpreter::MISSING_ATTRIBUTE,
            InterpreterError::StreamExhausted { .. } => codes::interpreter::STREAM_EXHAUSTED,
            InterpreterError::LimitExceeded { .. } => codes::interpreter::RECORD_LIMIT_EXCEEDED,
            InterpreterError::Stream(e) => e.error_code(),
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    /// Input byte offset, for errors raised by the tokenizer
    pub fn position(&self) -> Option<u64> {
        match self {
            InterpreterError::Stream(e) => Some(e.position()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_errors_keep_their_code() {
        let error: InterpreterError = StreamError::Xml {
            message: "bad".to_string(),
            position: 7,
        }
        .into();

        assert_eq!(error.error_code(), codes::stream::MALFORMED_XML);
        assert_eq!(error.position(), Some(7));
    }

    #[test]
    fn test_interpreter_error_codes() {
        let error = InterpreterError::MissingRequiredField { field: "target" };
        assert_eq!(error.error_code().as_str(), "E041");
        assert!(error.requires_halt());
        assert_eq!(error.position(), None);
        assert_eq!(
            error.to_string(),
            "TestResult is missing required field 'target'"
        );
    }
}
