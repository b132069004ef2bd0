//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and
//! classification functions. Code constants and their behavioral metadata
//! live together in this module.

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

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// View document loading error codes
pub mod document {
    use super::Code;

    pub const EMPTY_DOCUMENT: Code = Code::new("E005");
    pub const DOCUMENT_TOO_LARGE: Code = Code::new("E006");
    pub const MALFORMED_MARKUP: Code = Code::new("E007");
    pub const IO_ERROR: Code = Code::new("E008");
    pub const INVALID_PATH: Code = Code::new("E009");
}

/// Structural parse error codes
pub mod structure {
    use super::Code;

    pub const WALK_DEPTH_EXCEEDED: Code = Code::new("E020");
    pub const CONTROL_LIMIT_EXCEEDED: Code = Code::new("E021");
    pub const SECTION_LIMIT_EXCEEDED: Code = Code::new("E022");
    pub const UNRESOLVED_TEMPLATE_MODE: Code = Code::new("E023");
    pub const EXPANSION_REENTRY_BLOCKED: Code = Code::new("E024");
    pub const EXPANSION_LIMIT_EXCEEDED: Code = Code::new("E025");
    pub const DUPLICATE_CONTROL_ID: Code = Code::new("E026");
    pub const NAME_TRUNCATED: Code = Code::new("E027");
}

/// Label pass error codes
pub mod labels {
    use super::Code;

    pub const LABEL_TARGET_NOT_FOUND: Code = Code::new("E040");
}

/// Dynamic section extraction error codes
pub mod dynamics {
    use super::Code;

    pub const MISSING_TEMPLATE: Code = Code::new("E060");
    pub const CONDITION_UNPARSEABLE: Code = Code::new("E061");
    pub const MEMBER_LIMIT_EXCEEDED: Code = Code::new("E062");
    pub const SECTION_LIMIT_EXCEEDED: Code = Code::new("E063");
}

/// Data column consolidation error codes
pub mod columns {
    use super::Code;

    pub const COLUMN_LIMIT_EXCEEDED: Code = Code::new("E080");
    pub const OPTION_LIMIT_EXCEEDED: Code = Code::new("E081");
}

/// Pipeline error codes
pub mod pipeline {
    use super::Code;

    pub const VIEW_FAILED: Code = Code::new("E100");
    pub const STAGE_FAILURE: Code = Code::new("E101");
}

/// Batch processing error codes
pub mod batch {
    use super::Code;

    pub const DIRECTORY_NOT_FOUND: Code = Code::new("E120");
    pub const NO_VIEWS_FOUND: Code = Code::new("E121");
    pub const WORKER_FAILURE: Code = Code::new("E122");
    pub const FILE_LIMIT_REACHED: Code = Code::new("E123");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const DOCUMENT_LOADED: Code = Code::new("I002");
    pub const STRUCTURE_PARSE_COMPLETE: Code = Code::new("I003");
    pub const LABEL_PASS_COMPLETE: Code = Code::new("I004");
    pub const DYNAMICS_EXTRACTION_COMPLETE: Code = Code::new("I005");
    pub const CONSOLIDATION_COMPLETE: Code = Code::new("I006");
    pub const VIEW_PROCESSING_SUCCESS: Code = Code::new("I007");
    pub const FORM_PROCESSING_SUCCESS: Code = Code::new("I008");
    pub const BATCH_PROCESSING_SUCCESS: Code = Code::new("I009");
}

// ============================================================================
// METADATA TABLE
// ============================================================================

static METADATA: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn meta(
    code: &'static str,
    category: &'static str,
    severity: Severity,
    recoverable: bool,
    requires_halt: bool,
    description: &'static str,
    recommended_action: &'static str,
) -> (&'static str, ErrorMetadata) {
    (
        code,
        ErrorMetadata {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        },
    )
}

fn metadata_table() -> &'static HashMap<&'static str, ErrorMetadata> {
    METADATA.get_or_init(|| {
        HashMap::from([
            meta(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Internal parser error",
                "Report the failing view document",
            ),
            meta(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "Global subsystem initialization failed",
                "Check preference configuration before retrying",
            ),
            meta(
                "E005",
                "Document",
                Severity::Medium,
                true,
                false,
                "View document is empty",
                "Verify the container extraction produced this view",
            ),
            meta(
                "E006",
                "Document",
                Severity::High,
                true,
                false,
                "View document exceeds the size limit",
                "Raise no limits; split or inspect the source form",
            ),
            meta(
                "E007",
                "Document",
                Severity::High,
                true,
                false,
                "View markup is not well-formed",
                "The view contributes zero controls; inspect the source",
            ),
            meta(
                "E008",
                "Document",
                Severity::Medium,
                true,
                false,
                "View file could not be read",
                "Check file permissions and encoding",
            ),
            meta(
                "E009",
                "Document",
                Severity::Medium,
                true,
                false,
                "View path is not usable",
                "Check the discovery directory configuration",
            ),
            meta(
                "E020",
                "Structure",
                Severity::High,
                true,
                false,
                "Element nesting exceeded the walk depth limit",
                "Deeper content is skipped; inspect the view for pathological nesting",
            ),
            meta(
                "E021",
                "Structure",
                Severity::High,
                true,
                false,
                "Control capture limit reached for this view",
                "Remaining controls are dropped; split the view",
            ),
            meta(
                "E022",
                "Structure",
                Severity::High,
                true,
                false,
                "Section scope limit reached for this view",
                "Remaining sections are flattened",
            ),
            meta(
                "E023",
                "Structure",
                Severity::Low,
                true,
                false,
                "apply-templates references a mode with no matching template",
                "The call site is skipped",
            ),
            meta(
                "E024",
                "Structure",
                Severity::Low,
                true,
                false,
                "Template expansion re-entry blocked",
                "No action needed; the guard prevents duplicate expansion",
            ),
            meta(
                "E025",
                "Structure",
                Severity::Medium,
                true,
                false,
                "Template expansion limit reached for this view",
                "Further template calls are skipped",
            ),
            meta(
                "E026",
                "Structure",
                Severity::Low,
                true,
                false,
                "Duplicate control id resolved by the dedup policy",
                "No action needed unless the surviving occurrence is wrong",
            ),
            meta(
                "E027",
                "Structure",
                Severity::Low,
                true,
                false,
                "Derived name exceeded the length limit and was truncated",
                "No action needed",
            ),
            meta(
                "E040",
                "Labels",
                Severity::Low,
                true,
                false,
                "Standalone label found no data control to associate",
                "The label is kept unassociated",
            ),
            meta(
                "E060",
                "Dynamics",
                Severity::Low,
                true,
                false,
                "Conditional template mode could not be resolved",
                "The dynamic section is skipped",
            ),
            meta(
                "E061",
                "Dynamics",
                Severity::Low,
                true,
                false,
                "Condition expression matched no known pattern",
                "The section is recorded without a condition field",
            ),
            meta(
                "E062",
                "Dynamics",
                Severity::Medium,
                true,
                false,
                "Member collection limit reached for a dynamic section",
                "Remaining members are dropped",
            ),
            meta(
                "E063",
                "Dynamics",
                Severity::Medium,
                true,
                false,
                "Dynamic section limit reached for this view",
                "Remaining conditional templates are skipped",
            ),
            meta(
                "E080",
                "Columns",
                Severity::High,
                true,
                false,
                "Consolidated column limit reached",
                "Remaining controls are not consolidated",
            ),
            meta(
                "E081",
                "Columns",
                Severity::Low,
                true,
                false,
                "Choice option limit reached for a column",
                "Remaining options are dropped",
            ),
            meta(
                "E100",
                "Pipeline",
                Severity::Medium,
                true,
                false,
                "A view failed to process and contributes zero controls",
                "Inspect the per-view error detail",
            ),
            meta(
                "E101",
                "Pipeline",
                Severity::High,
                true,
                false,
                "A pipeline stage failed",
                "Inspect the wrapped stage error",
            ),
            meta(
                "E120",
                "Batch",
                Severity::Medium,
                true,
                false,
                "Batch directory does not exist",
                "Check the input path",
            ),
            meta(
                "E121",
                "Batch",
                Severity::Low,
                true,
                false,
                "No view files found in the batch directory",
                "Check the discovery extension filter",
            ),
            meta(
                "E122",
                "Batch",
                Severity::High,
                false,
                false,
                "A batch worker thread failed",
                "Re-run sequentially to isolate the failing view",
            ),
            meta(
                "E123",
                "Batch",
                Severity::Low,
                true,
                false,
                "Batch file limit reached; remaining files skipped",
                "Raise max_files or split the input",
            ),
        ])
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    metadata_table().get(code)
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code).map_or("Unknown error", |m| m.description)
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map_or("Unknown", |m| m.category)
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code).map_or(Severity::Low, |m| m.severity)
}

pub fn get_action(code: &str) -> &'static str {
    get_metadata(code).map_or("No specific action available", |m| m.recommended_action)
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).map_or(true, |m| m.recoverable)
}

pub fn requires_halt(code: &str) -> bool {
    get_metadata(code).map_or(false, |m| m.requires_halt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(system::INTERNAL_ERROR.as_str(), "ERR001");
        assert_eq!(format!("{}", document::MALFORMED_MARKUP), "E007");
    }

    #[test]
    fn test_metadata_lookup() {
        assert_eq!(get_category("E007"), "Document");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("ERR001"));
        assert!(!requires_halt("E023"));
        assert!(is_recoverable("E026"));
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert!(is_recoverable("E999"));
    }

    #[test]
    fn test_every_error_code_has_metadata() {
        for code in [
            "ERR001", "ERR002", "E005", "E006", "E007", "E008", "E009", "E020", "E021", "E022",
            "E023", "E024", "E025", "E026", "E027", "E040", "E060", "E061", "E062", "E063", "E080",
            "E081",
            "E100", "E101", "E120", "E121", "E122", "E123",
        ] {
            assert!(get_metadata(code).is_some(), "missing metadata for {}", code);
        }
    }
}
