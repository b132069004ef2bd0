//! View document loading
//!
//! A view is an XSLT/HTML hybrid document produced by the form designer. It
//! is well-formed XML, so it is loaded into a read-only `roxmltree` tree that
//! the structural walk and the dynamic-section scan both descend. A true XML
//! parse failure is the only unrecoverable per-view condition; it is surfaced
//! to the per-view caller, never past it.

pub mod attrs;

use crate::config::constants::compile_time::document::*;
use crate::logging::codes;
use crate::utils::DocPos;
use crate::{log_debug, log_success};
use roxmltree::{Document, Node};
use thiserror::Error;

/// The XSLT namespace used by the template/apply-templates machinery
pub const XSL_NS: &str = "http://www.w3.org/1999/XSL/Transform";

/// The form designer's vendor namespace carrying binding and control markers
pub const XD_NS: &str = "http://schemas.microsoft.com/office/infopath/2003";

/// Result type for document loading operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors raised at the view-document boundary
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    /// The view source is empty or whitespace-only
    #[error("View document is empty")]
    Empty,

    /// The view source exceeds the compile-time size limit
    #[error("View document too large: {size} bytes exceeds limit of {limit}")]
    TooLarge { size: usize, limit: usize },

    /// The view source is not well-formed XML
    #[error("View markup is not well-formed: {message}")]
    Malformed { message: String },

    /// The view file could not be read
    #[error("View file could not be read: {message}")]
    Io { message: String },
}

impl DocumentError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// The logging code this error reports under
    pub fn code(&self) -> crate::logging::Code {
        match self {
            Self::Empty => codes::document::EMPTY_DOCUMENT,
            Self::TooLarge { .. } => codes::document::DOCUMENT_TOO_LARGE,
            Self::Malformed { .. } => codes::document::MALFORMED_MARKUP,
            Self::Io { .. } => codes::document::IO_ERROR,
        }
    }
}

/// Shape statistics for a loaded view document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub elements: usize,
    pub attributes: usize,
    pub max_depth: usize,
}

/// Parse one view source into an element tree.
///
/// The returned document borrows `source`; per-view callers own the source
/// string for the duration of both passes over the tree.
pub fn parse_view_source(source: &str) -> DocumentResult<Document<'_>> {
    if source.trim().is_empty() {
        return Err(DocumentError::Empty);
    }

    if source.len() > MAX_DOCUMENT_SIZE {
        return Err(DocumentError::TooLarge {
            size: source.len(),
            limit: MAX_DOCUMENT_SIZE,
        });
    }

    let doc = Document::parse(source).map_err(|e| DocumentError::malformed(e.to_string()))?;

    let stats = document_stats(&doc);
    log_success!(codes::success::DOCUMENT_LOADED, "View document loaded",
        "elements" => stats.elements,
        "attributes" => stats.attributes,
        "max_depth" => stats.max_depth
    );

    Ok(doc)
}

/// Compute element/attribute counts and maximum nesting depth
pub fn document_stats(doc: &Document) -> DocumentStats {
    let mut stats = DocumentStats::default();

    for node in doc.descendants().filter(Node::is_element) {
        stats.elements += 1;
        stats.attributes += node.attributes().count();

        let depth = node.ancestors().count().min(MAX_STATS_DEPTH);
        if depth > stats.max_depth {
            stats.max_depth = depth;
        }
    }

    log_debug!("Document stats computed",
        "elements" => stats.elements,
        "max_depth" => stats.max_depth
    );

    stats
}

/// The source position of a node, for diagnostics
pub fn node_pos(node: Node) -> DocPos {
    let pos = node.document().text_pos_at(node.range().start);
    DocPos::new(pos.row, pos.col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_minimal_view() {
        let doc = parse_view_source("<root><child/></root>").unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "root");
    }

    #[test]
    fn test_empty_source_rejected() {
        assert_matches!(parse_view_source("   \n  "), Err(DocumentError::Empty));
    }

    #[test]
    fn test_malformed_source_rejected() {
        let result = parse_view_source("<root><unclosed></root>");
        assert_matches!(result, Err(DocumentError::Malformed { .. }));
    }

    #[test]
    fn test_stats_counts_elements_and_depth() {
        let doc = parse_view_source(r#"<a x="1"><b><c y="2" z="3"/></b><b/></a>"#).unwrap();
        let stats = document_stats(&doc);
        assert_eq!(stats.elements, 4);
        assert_eq!(stats.attributes, 3);
        assert!(stats.max_depth >= 3);
    }

    #[test]
    fn test_node_pos_points_into_source() {
        let doc = parse_view_source("<a>\n  <b/>\n</a>").unwrap();
        let b = doc
            .descendants()
            .find(|n| n.has_tag_name("b"))
            .expect("b element");
        let pos = node_pos(b);
        assert_eq!(pos.line, 2);
    }
}
