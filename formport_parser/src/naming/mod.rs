//! Name derivation and uniquification
//!
//! Nothing in a view is guaranteed to carry a name. Every naming decision in
//! the parser runs through the fallback chains here and finally through the
//! per-view registry, which guarantees uniqueness with `_2`/`_3` suffixes.
//!
//! The pluralization suffix table and the control-id scope override table are
//! heuristic seeds tuned on observed sample forms, not general rules; every
//! application is logged at debug level so forms that depend on them are
//! visible.

use crate::config::constants::compile_time::structure::MAX_NAME_LENGTH;
use crate::log_debug;
use crate::utils::text::{capitalize, sanitize_identifier};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Path predicates (`[1]`, `[@attr='x']`) stripped before leaf extraction
static PATH_PREDICATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));

/// Known collection-suffix tokens on a parent path segment
const COLLECTION_SUFFIXES: [&str; 5] = ["list", "items", "collection", "rows", "set"];

/// Seeded control-id scope overrides: control ids observed to belong to a
/// specific repeating scope that markup shape alone cannot place.
static CTRL_SCOPE_OVERRIDES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("CTRL23", "Trips")]));

// ============================================================================
// NAME REGISTRY
// ============================================================================

/// Per-view used-name registry.
///
/// `claim` returns the base name when free and a `_2`/`_3`-suffixed variant
/// otherwise. Comparison is case-insensitive so `Items` and `items` cannot
/// coexist as distinct scope names.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a unique name derived from `base`
    pub fn claim(&mut self, base: &str) -> String {
        let mut candidate = normalize_name(base);
        if candidate.is_empty() {
            candidate = "Unnamed".to_string();
        }

        if self.used.insert(candidate.to_ascii_lowercase()) {
            return candidate;
        }

        let mut ordinal = 2usize;
        loop {
            let suffixed = format!("{}_{}", candidate, ordinal);
            if self.used.insert(suffixed.to_ascii_lowercase()) {
                log_debug!("Name collision resolved",
                    "base" => candidate,
                    "claimed" => suffixed
                );
                return suffixed;
            }
            ordinal += 1;
        }
    }

    /// Whether a name (case-insensitively) has been claimed
    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Sanitize and cap a raw name candidate
fn normalize_name(base: &str) -> String {
    let mut name = sanitize_identifier(base);
    if name.len() > MAX_NAME_LENGTH {
        name.truncate(MAX_NAME_LENGTH);
        while name.ends_with('_') {
            name.pop();
        }
    }
    name
}

// ============================================================================
// BINDING PATH DERIVATION
// ============================================================================

/// Strip a `ns:` prefix from one path segment
pub fn strip_ns_prefix(segment: &str) -> &str {
    segment.rsplit(':').next().unwrap_or(segment)
}

/// Split a binding path into cleaned segments, dropping `.`/`..` and
/// predicate noise
pub fn path_segments(path: &str) -> Vec<String> {
    let cleaned = PATH_PREDICATE.replace_all(path, "");
    cleaned
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "." && *s != ".." && !s.starts_with('@'))
        .map(|s| strip_ns_prefix(s).to_string())
        .collect()
}

/// The last meaningful segment of a binding path, prefix-stripped
pub fn binding_leaf(path: &str) -> Option<String> {
    path_segments(path).pop()
}

// ============================================================================
// COLLECTION HEURISTIC
// ============================================================================

/// A select path recognized as introducing a repetition context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMatch {
    /// The last meaningful segment, capitalized (`Item`)
    pub local_name: String,
    /// The parent segment that triggered the match, capitalized (`Items`)
    pub parent_name: String,
}

/// Whether a word reads as an English plural
pub fn is_plural(word: &str) -> bool {
    let lowered = word.to_ascii_lowercase();
    lowered.len() > 2
        && (lowered.ends_with("ies") || lowered.ends_with("es") || lowered.ends_with('s'))
        && !lowered.ends_with("ss")
}

/// Reduce an English plural to its singular form (seed rules only)
pub fn singularize(word: &str) -> String {
    let lowered = word.to_ascii_lowercase();
    if lowered.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if (lowered.ends_with("sses")
        || lowered.ends_with("xes")
        || lowered.ends_with("ches")
        || lowered.ends_with("shes"))
        && word.len() > 2
    {
        word[..word.len() - 2].to_string()
    } else if lowered.ends_with('s') && !lowered.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Whether a segment carries a known collection suffix
fn has_collection_suffix(segment: &str) -> bool {
    let lowered = segment.to_ascii_lowercase();
    COLLECTION_SUFFIXES.iter().any(|s| lowered.ends_with(s))
}

/// Test a template-call select path against the collection heuristic:
/// the parent segment is plural, carries a collection suffix, or equals the
/// leaf segment.
pub fn collection_match(select: &str) -> Option<CollectionMatch> {
    let segments = path_segments(select);
    if segments.len() < 2 {
        return None;
    }

    let leaf = &segments[segments.len() - 1];
    let parent = &segments[segments.len() - 2];

    let is_collection =
        is_plural(parent) || has_collection_suffix(parent) || parent.eq_ignore_ascii_case(leaf);

    if !is_collection {
        return None;
    }

    log_debug!("Collection heuristic matched",
        "select" => select,
        "parent" => parent,
        "leaf" => leaf
    );

    Some(CollectionMatch {
        local_name: capitalize(leaf),
        parent_name: capitalize(parent),
    })
}

/// Compose a repeating scope display name: parent-prefixed when nested,
/// parent-path-prefixed otherwise.
pub fn compose_scope_name(outer_display: Option<&str>, parent_name: &str, local_name: &str) -> String {
    match outer_display {
        Some(outer) => format!("{}_{}", outer, local_name),
        None => format!("{}_{}", parent_name, local_name),
    }
}

// ============================================================================
// SYNTHESIZED FALLBACK NAMES
// ============================================================================

/// Synthesized name for a repeating scope with no derivable name
pub fn synthesized_repeating_name(kind_label: &str, ordinal: usize) -> String {
    format!("{}_Repeating{}", kind_label, ordinal)
}

/// Synthesized name for a cosmetic section with no derivable name
pub fn synthesized_section_name(ordinal: usize) -> String {
    format!("Section{}", ordinal)
}

/// Synthesized name for a control with no binding, label, or id
pub fn synthesized_control_name(kind_label: &str, ordinal: usize) -> String {
    format!("{}_{}", kind_label, ordinal)
}

// ============================================================================
// CONTROL-ID SCOPE OVERRIDES
// ============================================================================

/// Look up a seeded scope override for a control id, consulting the built-in
/// table and the runtime extras
pub fn ctrl_scope_override<'a>(
    ctrl_id: &str,
    extras: &'a HashMap<String, String>,
) -> Option<&'a str> {
    if let Some(name) = extras.get(ctrl_id) {
        return Some(name.as_str());
    }
    CTRL_SCOPE_OVERRIDES.get(ctrl_id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_uniquifies() {
        let mut registry = NameRegistry::new();
        assert_eq!(registry.claim("Items"), "Items");
        assert_eq!(registry.claim("Items"), "Items_2");
        assert_eq!(registry.claim("items"), "items_3");
        assert_eq!(registry.claim("Other"), "Other");
        assert!(registry.is_used("ITEMS_2"));
    }

    #[test]
    fn test_registry_empty_base() {
        let mut registry = NameRegistry::new();
        assert_eq!(registry.claim("  "), "Unnamed");
        assert_eq!(registry.claim(""), "Unnamed_2");
    }

    #[test]
    fn test_registry_caps_length() {
        let mut registry = NameRegistry::new();
        let long = "x".repeat(MAX_NAME_LENGTH + 50);
        let claimed = registry.claim(&long);
        assert_eq!(claimed.len(), MAX_NAME_LENGTH);
    }

    #[test]
    fn test_binding_leaf() {
        assert_eq!(
            binding_leaf("my:group1/my:field2"),
            Some("field2".to_string())
        );
        assert_eq!(binding_leaf("my:single"), Some("single".to_string()));
        assert_eq!(binding_leaf("../my:parent"), Some("parent".to_string()));
        assert_eq!(
            binding_leaf("my:items[1]/my:item"),
            Some("item".to_string())
        );
        assert_eq!(binding_leaf(""), None);
    }

    #[test]
    fn test_plural_detection() {
        assert!(is_plural("items"));
        assert!(is_plural("expenses"));
        assert!(is_plural("categories"));
        assert!(!is_plural("address")); // double-s is not a plural marker
        assert!(!is_plural("item"));
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("expenses"), "expense");
        assert_eq!(singularize("items"), "item");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("item"), "item");
    }

    #[test]
    fn test_collection_match_plural_parent() {
        let matched = collection_match("my:items/my:item").unwrap();
        assert_eq!(matched.local_name, "Item");
        assert_eq!(matched.parent_name, "Items");
    }

    #[test]
    fn test_collection_match_suffix_and_same() {
        assert!(collection_match("my:expenseList/my:expense").is_some());
        assert!(collection_match("my:entry/my:entry").is_some());
        assert!(collection_match("my:group/my:field").is_none());
        assert!(collection_match("my:leafOnly").is_none());
    }

    #[test]
    fn test_compose_scope_name() {
        assert_eq!(compose_scope_name(None, "Items", "Item"), "Items_Item");
        assert_eq!(
            compose_scope_name(Some("Expenses"), "Items", "Item"),
            "Expenses_Item"
        );
    }

    #[test]
    fn test_synthesized_names() {
        assert_eq!(synthesized_repeating_name("Section", 1), "Section_Repeating1");
        assert_eq!(synthesized_repeating_name("Table", 3), "Table_Repeating3");
        assert_eq!(synthesized_section_name(2), "Section2");
        assert_eq!(synthesized_control_name("TextField", 7), "TextField_7");
    }

    #[test]
    fn test_scope_override_lookup() {
        let extras = HashMap::from([("CTRL99".to_string(), "Expenses".to_string())]);
        assert_eq!(ctrl_scope_override("CTRL23", &extras), Some("Trips"));
        assert_eq!(ctrl_scope_override("CTRL99", &extras), Some("Expenses"));
        assert_eq!(ctrl_scope_override("CTRL1", &extras), None);
    }
}
