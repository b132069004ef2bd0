//! Pass 3: Dynamic Section Extraction
//!
//! An independent scan of the raw view document. For every moded
//! `apply-templates`, the referenced template's first `xsl:if` is read as a
//! conditional-visibility fragment: its test expression yields the condition
//! field and value, and every stable control id inside the fragment becomes
//! a member. Unresolvable references are skipped and logged, never raised.

pub mod condition;

pub use condition::{extract_condition_field, extract_condition_value, parse_condition};

use crate::config::constants::compile_time::dynamics::*;
use crate::config::runtime::DynamicsPreferences;
use crate::document::attrs::{ctrl_id, is_xsl, own_text};
use crate::logging::codes;
use crate::model::DynamicSection;
use crate::structure::{classify, ElementClass};
use crate::{log_debug, log_error, log_info, log_success, log_warning};
use indexmap::IndexMap;
use roxmltree::{Document, Node};
use std::collections::HashSet;

/// Module version
pub const VERSION: &str = "1.0.0";

/// Pass number
pub const PASS_NUMBER: u8 = 3;

/// The per-view visibility index: condition field to member control ids
pub type VisibilityMap = IndexMap<String, Vec<String>>;

/// Extract every dynamic section of one view, plus the folded visibility map
pub fn extract_dynamic_sections(
    doc: &Document,
    prefs: &DynamicsPreferences,
) -> (Vec<DynamicSection>, VisibilityMap) {
    log_info!("Starting Pass 3: Dynamic section extraction");

    let mut sections = Vec::new();
    let mut seen_modes = HashSet::new();

    for call in doc
        .descendants()
        .filter(|n| is_xsl(*n, "apply-templates") && n.attribute("mode").is_some())
    {
        if sections.len() >= MAX_DYNAMIC_SECTIONS {
            log_error!(codes::dynamics::SECTION_LIMIT_EXCEEDED,
                "Dynamic section limit reached; remaining calls skipped",
                "limit" => MAX_DYNAMIC_SECTIONS
            );
            break;
        }

        let mode = call.attribute("mode").unwrap_or_default();
        if !seen_modes.insert(mode.to_string()) {
            continue;
        }

        let Some(template) = find_template(doc, mode) else {
            if prefs.skip_unresolved_templates {
                log_warning!("Conditional template mode could not be resolved; skipped",
                    "mode" => mode
                );
            } else {
                log_error!(codes::dynamics::MISSING_TEMPLATE,
                    "Conditional template mode could not be resolved; skipped",
                    "mode" => mode
                );
            }
            continue;
        };

        let Some(fragment) = template.descendants().find(|n| is_xsl(*n, "if")) else {
            continue;
        };

        let test = fragment.attribute("test").unwrap_or_default();
        let parsed = parse_condition(test);
        if prefs.log_condition_details {
            log_debug!("Condition parsed",
                "mode" => mode,
                "test" => test,
                "field" => parsed.field.as_deref().unwrap_or("")
            );
        }
        if parsed.field.is_none() {
            log_error!(codes::dynamics::CONDITION_UNPARSEABLE,
                "Condition expression matched no known pattern",
                "mode" => mode,
                "test" => test
            );
        }

        let member_control_ids = collect_member_ids(fragment);

        sections.push(DynamicSection {
            mode: mode.to_string(),
            ctrl_id: first_ctrl_id(fragment),
            caption: fragment_caption(fragment),
            condition_text: test.to_string(),
            condition_field: parsed.field.unwrap_or_default(),
            condition_value: parsed.value,
            member_control_ids,
        });
    }

    let visibility = fold_visibility(&sections);

    log_success!(codes::success::DYNAMICS_EXTRACTION_COMPLETE,
        "Dynamic section extraction completed",
        "sections" => sections.len(),
        "condition_fields" => visibility.len()
    );

    (sections, visibility)
}

/// Fold dynamic sections into a `condition_field -> union(member ids)` map
pub fn fold_visibility(sections: &[DynamicSection]) -> VisibilityMap {
    let mut map = VisibilityMap::new();
    for section in sections {
        if section.condition_field.is_empty() {
            continue;
        }
        let members = map.entry(section.condition_field.clone()).or_default();
        for id in &section.member_control_ids {
            if !members.contains(id) {
                members.push(id.clone());
            }
        }
    }
    map
}

/// Merge one view's visibility map into the form-wide index (union of
/// member lists per field)
pub fn merge_visibility(form_map: &mut VisibilityMap, view_map: VisibilityMap) {
    for (field, members) in view_map {
        let entry = form_map.entry(field).or_default();
        for id in members {
            if !entry.contains(&id) {
                entry.push(id);
            }
        }
    }
}

fn find_template<'a, 'input>(doc: &'a Document<'input>, mode: &str) -> Option<Node<'a, 'input>> {
    doc.descendants()
        .find(|n| is_xsl(*n, "template") && n.attribute("mode") == Some(mode))
}

/// Every stable control id inside the fragment, in document order
fn collect_member_ids(fragment: Node) -> Vec<String> {
    let mut members = Vec::new();
    for node in fragment.descendants().filter(Node::is_element) {
        if members.len() >= MAX_MEMBERS_PER_SECTION {
            log_error!(codes::dynamics::MEMBER_LIMIT_EXCEEDED,
                "Member collection limit reached for a dynamic section",
                "limit" => MAX_MEMBERS_PER_SECTION
            );
            break;
        }
        if let Some(id) = ctrl_id(node) {
            if !members.iter().any(|m| m == id) {
                members.push(id.to_string());
            }
        }
    }
    members
}

/// The first stable id inside the fragment, used as the section's anchor
fn first_ctrl_id(fragment: Node) -> Option<String> {
    fragment
        .descendants()
        .filter(Node::is_element)
        .find_map(|n| ctrl_id(n).map(str::to_string))
}

/// The first caption-shaped text fragment inside the conditional content
fn fragment_caption(fragment: Node) -> Option<String> {
    fragment
        .descendants()
        .filter(|d| d.is_element() && *d != fragment)
        .find(|d| classify(*d) == ElementClass::Caption)
        .map(own_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns:xd="http://schemas.microsoft.com/office/infopath/2003" xmlns:xsl="http://www.w3.org/1999/XSL/Transform" xmlns:my="http://example.com/my""#;

    fn extract(body: &str) -> (Vec<DynamicSection>, VisibilityMap) {
        let xml = format!("<html {}><body>{}</body></html>", NS, body);
        let doc = Document::parse(&xml).unwrap();
        extract_dynamic_sections(&doc, &DynamicsPreferences::default())
    }

    const CONDITIONAL_VIEW: &str = r#"
        <xsl:apply-templates select="my:details" mode="_5"/>
        <xsl:template match="my:details" mode="_5">
          <xsl:if test="contains(my:tripType, &quot;RoundTrip&quot;)">
            <span>Return Trip</span>
            <div class="xdSection" xd:CtrlId="CTRL30">
              <span class="xdTextBox" xd:CtrlId="CTRL31" xd:binding="my:details/my:returnDate"/>
              <span class="xdTextBox" xd:CtrlId="CTRL32" xd:binding="my:details/my:returnCity"/>
            </div>
          </xsl:if>
        </xsl:template>
    "#;

    #[test]
    fn test_conditional_fragment_extracted() {
        let (sections, _) = extract(CONDITIONAL_VIEW);
        assert_eq!(sections.len(), 1);

        let section = &sections[0];
        assert_eq!(section.mode, "_5");
        assert_eq!(section.condition_field, "tripType");
        assert_eq!(section.condition_value.as_deref(), Some("RoundTrip"));
        assert_eq!(section.ctrl_id.as_deref(), Some("CTRL30"));
        assert_eq!(section.caption.as_deref(), Some("Return Trip"));
        assert_eq!(
            section.member_control_ids,
            vec!["CTRL30", "CTRL31", "CTRL32"]
        );
    }

    #[test]
    fn test_visibility_map_folds_members() {
        let (_, visibility) = extract(CONDITIONAL_VIEW);
        assert_eq!(visibility.len(), 1);
        assert_eq!(
            visibility.get("tripType").unwrap(),
            &vec![
                "CTRL30".to_string(),
                "CTRL31".to_string(),
                "CTRL32".to_string()
            ]
        );
    }

    #[test]
    fn test_missing_template_is_skipped() {
        let (sections, visibility) = extract(
            r#"<xsl:apply-templates select="my:a" mode="_gone"/>"#,
        );
        assert!(sections.is_empty());
        assert!(visibility.is_empty());
    }

    #[test]
    fn test_template_without_conditional_contributes_nothing() {
        let (sections, _) = extract(
            r#"<xsl:apply-templates select="my:a" mode="_plain"/>
               <xsl:template match="my:a" mode="_plain">
                 <span class="xdTextBox" xd:CtrlId="CTRL40" xd:binding="my:a/my:b"/>
               </xsl:template>"#,
        );
        assert!(sections.is_empty());
    }

    #[test]
    fn test_duplicate_mode_references_collapse() {
        let body = format!(
            r#"<xsl:apply-templates select="my:d" mode="_5"/>{}"#,
            CONDITIONAL_VIEW
        );
        let (sections, _) = extract(&body);
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn test_merge_visibility_unions_across_views() {
        let mut form_map = VisibilityMap::new();
        form_map.insert(
            "tripType".to_string(),
            vec!["CTRL1".to_string(), "CTRL2".to_string()],
        );

        let mut view_map = VisibilityMap::new();
        view_map.insert(
            "tripType".to_string(),
            vec!["CTRL2".to_string(), "CTRL3".to_string()],
        );
        view_map.insert("approved".to_string(), vec!["CTRL9".to_string()]);

        merge_visibility(&mut form_map, view_map);

        assert_eq!(
            form_map.get("tripType").unwrap(),
            &vec![
                "CTRL1".to_string(),
                "CTRL2".to_string(),
                "CTRL3".to_string()
            ]
        );
        assert_eq!(form_map.get("approved").unwrap(), &vec!["CTRL9".to_string()]);
    }
}
