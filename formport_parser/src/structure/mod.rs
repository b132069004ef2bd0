//! Pass 1: View Structural Parsing
//!
//! Walks one view document and produces a typed, deduplicated,
//! uniquely-named model of controls and sections with full repetition
//! context. Deterministic for a given input; all traversal state lives in a
//! per-view `ParserState`, so independent views parse on independent
//! workers.

pub mod classify;
pub mod error;
pub mod parser;
pub mod state;

// Re-export main types
pub use classify::{classify, ElementClass};
pub use error::{ParseResult, ViewParseError};
pub use parser::ViewParser;
pub use state::{ExpansionKey, LabelCandidate, ParserState, WalkContext};

use crate::config::runtime::StructurePreferences;
use crate::logging::codes;
use crate::model::{Control, SectionScope};
use crate::{log_info, log_success};
use roxmltree::Document;

/// Module version
pub const VERSION: &str = "1.0.0";

/// Pass number
pub const PASS_NUMBER: u8 = 1;

/// Parse one view document into `(controls, sections)`
pub fn parse_view(
    doc: &Document,
    prefs: &StructurePreferences,
) -> ParseResult<(Vec<Control>, Vec<SectionScope>)> {
    log_info!("Starting Pass 1: Structural parse");

    let (controls, sections) = ViewParser::new(doc, prefs).run()?;

    log_success!(codes::success::STRUCTURE_PARSE_COMPLETE,
        "Structural parse completed",
        "controls" => controls.len(),
        "sections" => sections.len()
    );

    Ok((controls, sections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionKind;
    use std::collections::HashSet;

    const NS: &str = r#"xmlns:xd="http://schemas.microsoft.com/office/infopath/2003" xmlns:xsl="http://www.w3.org/1999/XSL/Transform" xmlns:my="http://example.com/my""#;

    fn view_xml(body: &str) -> String {
        format!("<html {}><body>{}</body></html>", NS, body)
    }

    fn parse_body(body: &str) -> (Vec<Control>, Vec<SectionScope>) {
        let xml = view_xml(body);
        let doc = Document::parse(&xml).unwrap();
        parse_view(&doc, &StructurePreferences::default()).unwrap()
    }

    const MIXED_VIEW: &str = r#"
        <span>Header</span>
        <table>
          <tr><td colspan="1"><span class="xdTextBox" xd:CtrlId="CTRL1" xd:binding="my:form/my:name"/></td></tr>
          <tr><td><select xd:CtrlId="CTRL2" xd:binding="my:form/my:priority">
            <option value="A">Option A</option>
          </select></td></tr>
        </table>
        <div class="xdRepeatingSection xdRepeating" xd:CtrlId="CTRL3" xd:binding="my:form/my:trips">
          <span class="xdDTPicker" xd:CtrlId="CTRL4" xd:binding="my:trips/my:departure"/>
          <div class="xdRepeatingSection" xd:binding="my:trips/my:legs">
            <span class="xdTextBox" xd:CtrlId="CTRL5" xd:binding="my:legs/my:airport"/>
          </div>
        </div>
        <div class="xdSection" xd:binding="my:form/my:summary">
          <input type="checkbox" xd:CtrlId="CTRL6" xd:binding="my:summary/my:approved"/>
        </div>
    "#;

    #[test]
    fn test_doc_indexes_unique_and_increasing_in_capture_order() {
        let (controls, _) = parse_body(MIXED_VIEW);
        assert!(!controls.is_empty());

        let mut seen = HashSet::new();
        for control in &controls {
            assert!(seen.insert(control.doc_index), "doc_index reused");
        }
        for pair in controls.windows(2) {
            assert!(pair[0].doc_index < pair[1].doc_index);
        }
    }

    #[test]
    fn test_section_names_unique_within_view() {
        let (_, sections) = parse_body(MIXED_VIEW);
        let mut names = HashSet::new();
        for section in &sections {
            assert!(
                names.insert(section.name.to_ascii_lowercase()),
                "duplicate section name {}",
                section.name
            );
        }
    }

    #[test]
    fn test_nested_scope_display_name_composition() {
        let (controls, _) = parse_body(MIXED_VIEW);
        let inner = controls
            .iter()
            .find(|c| c.id.as_deref() == Some("CTRL5"))
            .expect("nested control");
        // depth 2: the inner scope's composed name is outer + "_" + local
        assert_eq!(
            inner.repeating.repeating_section_name.as_deref(),
            Some("Trips_Legs")
        );

        let outer = controls
            .iter()
            .find(|c| c.id.as_deref() == Some("CTRL4"))
            .expect("outer control");
        assert_eq!(
            outer.repeating.repeating_section_name.as_deref(),
            Some("Trips")
        );
    }

    #[test]
    fn test_orthogonal_membership() {
        let (controls, _) = parse_body(MIXED_VIEW);
        let approved = controls
            .iter()
            .find(|c| c.id.as_deref() == Some("CTRL6"))
            .unwrap();
        assert_eq!(
            approved.section.parent_section.as_deref(),
            Some("Summary")
        );
        assert!(!approved.repeating.is_repeating);
    }

    #[test]
    fn test_idempotence() {
        let xml = view_xml(MIXED_VIEW);
        let doc1 = Document::parse(&xml).unwrap();
        let doc2 = Document::parse(&xml).unwrap();
        let prefs = StructurePreferences::default();

        let first = parse_view(&doc1, &prefs).unwrap();
        let second = parse_view(&doc2, &prefs).unwrap();

        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }

    #[test]
    fn test_repeating_sections_recorded_as_repeating_kind() {
        let (_, sections) = parse_body(MIXED_VIEW);
        let repeating: Vec<_> = sections
            .iter()
            .filter(|s| s.kind == SectionKind::Repeating)
            .collect();
        assert_eq!(repeating.len(), 2);
        let cosmetic: Vec<_> = sections
            .iter()
            .filter(|s| s.kind == SectionKind::Cosmetic)
            .collect();
        assert_eq!(cosmetic.len(), 1);
        assert_eq!(cosmetic[0].name, "Summary");
    }

    #[test]
    fn test_collection_scope_created_once_for_recursive_select() {
        // An apply-templates over my:items/my:item with no active
        // repeating scope creates the Items_Item scope exactly once even
        // when the select recurses
        let (_, sections) = parse_body(
            r#"<xsl:apply-templates select="my:items/my:item" mode="_r"/>
               <xsl:template match="my:item" mode="_r">
                 <span class="xdTextBox" xd:binding="my:item/my:name" xd:CtrlId="CTRL7"/>
                 <xsl:apply-templates select="my:items/my:item" mode="_r"/>
               </xsl:template>"#,
        );
        let item_scopes = sections
            .iter()
            .filter(|s| s.name.starts_with("Items_Item"))
            .count();
        assert_eq!(item_scopes, 1);
    }

    #[test]
    fn test_empty_view_contributes_nothing() {
        let (controls, sections) = parse_body("");
        assert!(controls.is_empty());
        assert!(sections.is_empty());
    }
}
