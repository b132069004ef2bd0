//! Pipeline error types

use crate::document::DocumentError;
use crate::structure::ViewParseError;
use thiserror::Error;

/// Errors crossing the per-view pipeline boundary
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// The view document could not be loaded
    #[error("Document stage failed: {0}")]
    Document(#[from] DocumentError),

    /// The structural walk failed
    #[error("Structure stage failed: {0}")]
    Structure(#[from] ViewParseError),

    /// Pipeline-level failure
    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: impl Into<String>) -> Self {
        Self::Pipeline {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_pipeline_error_creation() {
        let error = PipelineError::pipeline_error("Test error");
        assert_matches!(error, PipelineError::Pipeline { ref message } if message == "Test error");
    }

    #[test]
    fn test_document_error_converts() {
        let error: PipelineError = DocumentError::Empty.into();
        assert_matches!(error, PipelineError::Document(DocumentError::Empty));
        assert!(error.to_string().contains("Document stage failed"));
    }
}
