//! Error types for the structural walk
//!
//! Structural ambiguity is never an error: every naming and classification
//! decision has a fallback chain. The variants here cover internal invariant
//! breaks only; resource limits are enforced by truncation plus logging, not
//! by failing the view.

use thiserror::Error;

/// Result type for structural parse operations
pub type ParseResult<T> = Result<T, ViewParseError>;

/// Errors surfaced by the structural walk
#[derive(Debug, Clone, Error)]
pub enum ViewParseError {
    /// The document root was not an element tree the walk can descend
    #[error("View has no walkable root element")]
    NoRootElement,

    /// Internal walker invariant violated
    #[error("Internal structural parse error: {message}")]
    Internal { message: String },
}

impl ViewParseError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
