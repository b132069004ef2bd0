//! Vendor attribute and class-token access for view elements
//!
//! The designer encodes the implicit form model in `class` tokens
//! (`xdTextBox`, `xdRepeatingSection`, ...), an extended-control-type
//! attribute (`xctname`), a binding path, and a stable per-control id. None
//! of these are guaranteed present; every accessor returns an Option and the
//! callers carry the fallback chains.

use super::{XD_NS, XSL_NS};
use roxmltree::Node;

/// If the node is an XSLT element, its local name
pub fn xsl_local<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    if node.is_element() && node.tag_name().namespace() == Some(XSL_NS) {
        Some(node.tag_name().name())
    } else {
        None
    }
}

/// Whether the node is a specific XSLT element (`template`, `apply-templates`,
/// `if`, `for-each`, ...)
pub fn is_xsl(node: Node, local: &str) -> bool {
    xsl_local(node) == Some(local)
}

/// The element's local tag name lowercased, for HTML tag checks
pub fn tag(node: Node) -> String {
    node.tag_name().name().to_ascii_lowercase()
}

/// Iterate the whitespace-separated tokens of the `class` attribute
pub fn class_tokens<'a>(node: Node<'a, '_>) -> impl Iterator<Item = &'a str> {
    node.attribute("class")
        .unwrap_or_default()
        .split_whitespace()
}

/// Whether the `class` attribute contains the exact token
pub fn has_class_token(node: Node, token: &str) -> bool {
    class_tokens(node).any(|t| t == token)
}

/// A vendor attribute by local name, preferring the vendor namespace but
/// accepting an un-namespaced spelling
pub fn vendor_attr<'a>(node: Node<'a, '_>, local: &str) -> Option<&'a str> {
    node.attribute((XD_NS, local)).or_else(|| {
        node.attributes()
            .find(|a| a.name() == local)
            .map(|a| a.value())
    })
}

/// The control's binding path (`my:group/my:field`)
pub fn binding<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    vendor_attr(node, "binding").filter(|v| !v.trim().is_empty())
}

/// The control's stable id
pub fn ctrl_id<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    vendor_attr(node, "CtrlId").filter(|v| !v.trim().is_empty())
}

/// The extended control type (`PlainText`, `DropDown`, `RepeatingSection`, ...)
pub fn extended_type<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    vendor_attr(node, "xctname").filter(|v| !v.trim().is_empty())
}

/// The element's `title` attribute, used as a label source
pub fn title<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute("title").filter(|v| !v.trim().is_empty())
}

/// The element's inline `style` attribute
pub fn style<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute("style")
}

/// A numeric `colspan`, when present and parseable
pub fn colspan(node: Node) -> Option<usize> {
    node.attribute("colspan").and_then(|v| v.trim().parse().ok())
}

/// Direct text children only, whitespace-collapsed
pub fn own_text(node: Node) -> String {
    let mut out = String::new();
    for child in node.children() {
        if child.is_text() {
            out.push_str(child.text().unwrap_or_default());
            out.push(' ');
        }
    }
    crate::utils::collapse_whitespace(&out)
}

/// All descendant text, whitespace-collapsed
pub fn element_text(node: Node) -> String {
    let mut out = String::new();
    for desc in node.descendants() {
        if desc.is_text() {
            out.push_str(desc.text().unwrap_or_default());
            out.push(' ');
        }
    }
    crate::utils::collapse_whitespace(&out)
}

/// Whether an inline style draws a heavy top border (a visual row separator)
pub fn has_heavy_top_border(style_value: &str) -> bool {
    let lowered = style_value.to_ascii_lowercase();
    let Some(idx) = lowered.find("border-top") else {
        return false;
    };
    let fragment = &lowered[idx..lowered[idx..].find(';').map_or(lowered.len(), |e| idx + e)];
    ["2pt", "3pt", "4pt", "medium", "thick"]
        .iter()
        .any(|w| fragment.contains(w))
}
