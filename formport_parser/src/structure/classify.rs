//! Element classification for the structural walk
//!
//! Exactly one classification is consumed per element, in fixed priority
//! order; the first match wins. The classifier is a pure function of the
//! node — context-dependent behavior (flattening inside repeating scopes,
//! conditional-fragment promotion) belongs to the dispatcher.

use crate::config::constants::compile_time::structure::{MAX_CAPTION_LENGTH, WIDE_CELL_COLSPAN};
use crate::document::attrs::{
    binding, class_tokens, colspan, ctrl_id, extended_type, has_class_token, is_xsl, own_text,
    style, tag, xsl_local,
};
use crate::document::attrs::has_heavy_top_border;
use crate::utils::is_caption_shaped;
use roxmltree::Node;

/// The closed set of element classifications, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementClass {
    /// Repeating-section container: scope push, recurse, pop
    RepeatingContainer,
    /// `xsl:template` with a mode attribute: template-indirection body
    ModalTemplate,
    /// `xsl:apply-templates` with a mode attribute: resolve and inline
    TemplateCall,
    /// Caption-shaped text fragment: lookback entry, no control emitted
    Caption,
    /// Row-break indicator: advance row, reset column, descend
    RowBreak,
    /// Layout placeholder: descend transparently, no scope
    LayoutPlaceholder,
    /// Plain (non-repeating) section container
    SectionContainer,
    /// Repeating table: synthetic control plus scoped template-row drill
    RepeatingTable,
    /// Everything else: attempt control extraction, else descend
    Candidate,
}

impl ElementClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RepeatingContainer => "RepeatingContainer",
            Self::ModalTemplate => "ModalTemplate",
            Self::TemplateCall => "TemplateCall",
            Self::Caption => "Caption",
            Self::RowBreak => "RowBreak",
            Self::LayoutPlaceholder => "LayoutPlaceholder",
            Self::SectionContainer => "SectionContainer",
            Self::RepeatingTable => "RepeatingTable",
            Self::Candidate => "Candidate",
        }
    }
}

/// Tags that qualify as bare formatting elements for caption detection
const FORMATTING_TAGS: [&str; 13] = [
    "span", "font", "strong", "b", "em", "u", "i", "label", "h1", "h2", "h3", "h4", "h5",
];

/// Classify one element. First match wins; `Candidate` is the only
/// classification that can fail downstream and fall through to plain
/// descent.
pub fn classify(node: Node) -> ElementClass {
    if is_repeating_container(node) {
        return ElementClass::RepeatingContainer;
    }
    if is_xsl(node, "template") && node.attribute("mode").is_some() {
        return ElementClass::ModalTemplate;
    }
    if is_xsl(node, "apply-templates") && node.attribute("mode").is_some() {
        return ElementClass::TemplateCall;
    }
    if is_caption_fragment(node) {
        return ElementClass::Caption;
    }
    if is_row_break(node) {
        return ElementClass::RowBreak;
    }
    if is_layout_placeholder(node) {
        return ElementClass::LayoutPlaceholder;
    }
    if is_section_container(node) {
        return ElementClass::SectionContainer;
    }
    if is_repeating_table(node) {
        return ElementClass::RepeatingTable;
    }
    ElementClass::Candidate
}

/// Repeating-section container: a class marker, an explicit type attribute,
/// or a wrapper whose only element child is an `apply-templates` with a
/// descending select path (contains a `/`). XSLT elements themselves never
/// qualify.
fn is_repeating_container(node: Node) -> bool {
    if xsl_local(node).is_some() {
        return false;
    }
    if has_class_token(node, "xdRepeatingSection") {
        return true;
    }
    if extended_type(node) == Some("RepeatingSection") {
        return true;
    }

    let mut element_children = node.children().filter(Node::is_element);
    let (first, second) = (element_children.next(), element_children.next());
    match (first, second) {
        (Some(only), None) => {
            is_xsl(only, "apply-templates")
                && only
                    .attribute("select")
                    .is_some_and(|select| select.contains('/'))
        }
        _ => false,
    }
}

/// Caption-shaped text in a bare formatting element: short, non-colon
/// terminated, no element children, no control markers.
fn is_caption_fragment(node: Node) -> bool {
    if !FORMATTING_TAGS.contains(&tag(node).as_str()) {
        return false;
    }
    if binding(node).is_some() || extended_type(node).is_some() || ctrl_id(node).is_some() {
        return false;
    }
    if node.children().any(|c| c.is_element()) {
        return false;
    }
    is_caption_shaped(&own_text(node), MAX_CAPTION_LENGTH)
}

/// Row-break indicators that are not themselves containers: table rows,
/// horizontal rules, wide-colspan cells, heavy top borders, header/title-row
/// classes.
fn is_row_break(node: Node) -> bool {
    let t = tag(node);
    if t == "tr" || t == "hr" {
        return true;
    }
    if (t == "td" || t == "th") && colspan(node).is_some_and(|c| c >= WIDE_CELL_COLSPAN) {
        return true;
    }
    if style(node).is_some_and(has_heavy_top_border) {
        return true;
    }
    class_tokens(node).any(|token| {
        token == "xdTableHeader"
            || token == "xdTitleRow"
            || token.ends_with("HeaderRow")
            || token.ends_with("TitleRow")
    })
}

/// Insert-new-item affordances and similar placeholders the walk descends
/// through without creating a scope
fn is_layout_placeholder(node: Node) -> bool {
    if has_class_token(node, "optionalPlaceholder") {
        return true;
    }
    crate::document::attrs::vendor_attr(node, "action")
        .is_some_and(|a| a.starts_with("xCollection::") || a.starts_with("xOptional::"))
}

/// Plain section container (cosmetic grouping)
fn is_section_container(node: Node) -> bool {
    if xsl_local(node).is_some() {
        return false;
    }
    has_class_token(node, "xdSection") || extended_type(node) == Some("Section")
}

/// Repeating table: class/type marker, or a `tbody` driven by a `for-each`
fn is_repeating_table(node: Node) -> bool {
    if has_class_token(node, "xdRepeatingTable") || extended_type(node) == Some("RepeatingTable") {
        return true;
    }
    tag(node) == "tbody" && node.children().any(|child| is_xsl(child, "for-each"))
}
