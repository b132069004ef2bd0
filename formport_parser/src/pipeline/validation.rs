//! Pipeline self-checks
//!
//! Validates that the subsystems the pipeline composes are internally
//! consistent before any view is processed.

use super::PipelineError;
use crate::config::constants::compile_time;
use crate::logging::codes;

/// Validate the pipeline composition and its supporting tables
pub fn validate_pipeline() -> Result<(), PipelineError> {
    // Every code the pipeline emits must carry metadata
    for code in [
        codes::document::MALFORMED_MARKUP,
        codes::structure::UNRESOLVED_TEMPLATE_MODE,
        codes::dynamics::MISSING_TEMPLATE,
        codes::columns::COLUMN_LIMIT_EXCEEDED,
        codes::pipeline::VIEW_FAILED,
    ] {
        if codes::get_metadata(code.as_str()).is_none() {
            return Err(PipelineError::pipeline_error(format!(
                "Missing metadata for code {}",
                code
            )));
        }
    }

    // The condition pattern set must be compilable; touching one forces the
    // lazy set to build
    if crate::dynamics::extract_condition_field("my:probe = 1").is_none() {
        return Err(PipelineError::pipeline_error(
            "Condition pattern set failed its probe expression",
        ));
    }

    // Limit sanity
    if compile_time::structure::LABEL_LOOKBACK_CAPACITY == 0
        || compile_time::structure::MAX_WALK_DEPTH == 0
        || compile_time::batch_processing::MAX_BATCH_THREADS == 0
    {
        return Err(PipelineError::pipeline_error(
            "A compile-time limit is configured to zero",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pipeline() {
        assert!(validate_pipeline().is_ok());
    }
}
