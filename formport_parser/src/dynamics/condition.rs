//! Condition expression parsing
//!
//! Test expressions on conditional fragments are matched against a small
//! fixed pattern set; anything the set cannot place yields no field rather
//! than an error. The patterns are heuristic seeds tuned on observed
//! designer output.

use crate::config::constants::compile_time::dynamics::MAX_CONDITION_LENGTH;
use crate::log_debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// `field =` / `field !=` comparisons, namespace prefix tolerated
static FIELD_COMPARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[A-Za-z_][\w.-]*:)?([A-Za-z_][\w.-]*)\s*!?=").expect("valid regex")
});

/// Parent-relative field references (`../field`)
static PARENT_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.\./(?:[A-Za-z_][\w.-]*:)?([A-Za-z_][\w.-]*)").expect("valid regex")
});

/// Negated references (`not(...field...)`)
static NOT_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"not\(\s*(?:\.\./)?(?:[A-Za-z_][\w.-]*:)?([A-Za-z_][\w.-]*)").expect("valid regex")
});

/// Boolean coercions (`boolean(field)`)
static BOOLEAN_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"boolean\(\s*(?:\.\./)?(?:[A-Za-z_][\w.-]*:)?([A-Za-z_][\w.-]*)\s*\)")
        .expect("valid regex")
});

/// Any prefixed field name, as a last resort
static ANY_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][\w.-]*:([A-Za-z_][\w.-]*)").expect("valid regex"));

/// The first quoted literal inside a `contains(...)` call
static CONTAINS_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"contains\([^)]*?["']([^"']+)["']"#).expect("valid regex"));

/// A parsed condition expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCondition {
    pub field: Option<String>,
    pub value: Option<String>,
    pub parent_relative: bool,
}

/// Parse a test expression against the fixed pattern set
pub fn parse_condition(test: &str) -> ParsedCondition {
    if test.len() > MAX_CONDITION_LENGTH {
        log_debug!("Condition expression exceeds length limit; not parsed",
            "length" => test.len()
        );
        return ParsedCondition {
            parent_relative: test.contains("../"),
            ..Default::default()
        };
    }

    ParsedCondition {
        field: extract_condition_field(test),
        value: extract_condition_value(test),
        parent_relative: test.contains("../"),
    }
}

/// The condition field, by fixed pattern priority
pub fn extract_condition_field(test: &str) -> Option<String> {
    for pattern in [
        &*FIELD_COMPARE,
        &*PARENT_FIELD,
        &*NOT_FIELD,
        &*BOOLEAN_FIELD,
        &*ANY_FIELD,
    ] {
        if let Some(captures) = pattern.captures(test) {
            if let Some(field) = captures.get(1) {
                return Some(field.as_str().to_string());
            }
        }
    }
    None
}

/// The first quoted literal inside a `contains(...)` call, when present
pub fn extract_condition_value(test: &str) -> Option<String> {
    CONTAINS_LITERAL
        .captures(test)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_comparison() {
        let parsed = parse_condition(r#"my:showDetails = "1""#);
        assert_eq!(parsed.field.as_deref(), Some("showDetails"));
        assert!(parsed.value.is_none());
        assert!(!parsed.parent_relative);
    }

    #[test]
    fn test_inequality_comparison() {
        let parsed = parse_condition("my:status != 'Closed'");
        assert_eq!(parsed.field.as_deref(), Some("status"));
    }

    #[test]
    fn test_parent_relative_reference() {
        let parsed = parse_condition("../my:isRoundTrip = 1");
        assert_eq!(parsed.field.as_deref(), Some("isRoundTrip"));
        assert!(parsed.parent_relative);
    }

    #[test]
    fn test_negation() {
        let parsed = parse_condition("not(my:approved)");
        assert_eq!(parsed.field.as_deref(), Some("approved"));
    }

    #[test]
    fn test_boolean_coercion() {
        let parsed = parse_condition("boolean(my:hasAttachment)");
        assert_eq!(parsed.field.as_deref(), Some("hasAttachment"));
    }

    #[test]
    fn test_contains_with_literal() {
        let parsed = parse_condition(r#"contains(my:categories, "Travel")"#);
        assert_eq!(parsed.field.as_deref(), Some("categories"));
        assert_eq!(parsed.value.as_deref(), Some("Travel"));
    }

    #[test]
    fn test_unparseable_expression() {
        let parsed = parse_condition("position() mod 2");
        assert!(parsed.field.is_none());
        assert!(parsed.value.is_none());
    }

    #[test]
    fn test_function_call_does_not_eat_field() {
        let parsed = parse_condition("string-length(my:name) = 0");
        assert_eq!(parsed.field.as_deref(), Some("name"));
    }

    #[test]
    fn test_oversized_expression_skipped() {
        let oversized = format!("my:a = {}", "x".repeat(MAX_CONDITION_LENGTH + 10));
        let parsed = parse_condition(&oversized);
        assert!(parsed.field.is_none());
    }
}
