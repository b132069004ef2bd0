//! The recursive structural walker
//!
//! Walks one view document and produces the ordered control list plus the
//! section snapshots. Dispatch is a single `match` over the closed element
//! classification; each matched branch owns the recursion into its children,
//! so exactly one classification is consumed per element.

use crate::config::constants::compile_time::structure::*;
use crate::config::runtime::StructurePreferences;
use crate::document::attrs::{
    binding, colspan, ctrl_id, element_text, extended_type, is_xsl, own_text, tag, title,
};
use crate::document::node_pos;
use crate::dynamics::condition::parse_condition;
use crate::logging::codes;
use crate::model::{
    ChoiceOption, Control, ControlKind, ControlOrigin, RepeatingKind, RepeatingMembership,
    RepeatingScope, SectionKind, SectionMembership, SectionScope,
};
use crate::naming::{
    self, binding_leaf, collection_match, compose_scope_name, ctrl_scope_override,
    synthesized_control_name, synthesized_repeating_name, synthesized_section_name,
};
use crate::structure::classify::{classify, ElementClass};
use crate::structure::error::{ParseResult, ViewParseError};
use crate::structure::state::{ExpansionKey, LabelCandidate, ParserState, WalkContext};
use crate::utils::text::{capitalize, sanitize_identifier};
use crate::utils::GridPos;
use crate::{log_debug, log_error};
use roxmltree::{Document, Node};

/// Classid marker of the contact-selector control
const PEOPLE_PICKER_CLASSID: &str = "61e40d31-993d-4777-8fa0-19ca59b6d0bb";

/// Tags whose text-only content is captured as a standalone label control
const LABEL_TAGS: [&str; 16] = [
    "span", "font", "strong", "b", "em", "u", "i", "label", "td", "th", "div", "h1", "h2", "h3",
    "h4", "h5",
];

pub struct ViewParser<'a, 'input> {
    doc: &'a Document<'input>,
    prefs: &'a StructurePreferences,
    state: ParserState,
}

impl<'a, 'input> ViewParser<'a, 'input> {
    pub fn new(doc: &'a Document<'input>, prefs: &'a StructurePreferences) -> Self {
        Self {
            doc,
            prefs,
            state: ParserState::new(),
        }
    }

    /// Walk the whole document and return `(controls, sections)`
    pub fn run(mut self) -> ParseResult<(Vec<Control>, Vec<SectionScope>)> {
        let root = self.doc.root_element();
        if !root.is_element() {
            return Err(ViewParseError::NoRootElement);
        }

        let ctx = WalkContext::default();
        self.walk_children(root, &ctx)?;

        Ok((self.state.controls, self.state.sections))
    }

    // ── Dispatch ────────────────────────────────────────────────────────

    fn walk_children(&mut self, node: Node, ctx: &WalkContext) -> ParseResult<()> {
        for child in node.children().filter(|n| n.is_element()) {
            self.walk(child, ctx)?;
        }
        Ok(())
    }

    fn walk(&mut self, node: Node, ctx: &WalkContext) -> ParseResult<()> {
        if ctx.depth >= MAX_WALK_DEPTH {
            log_error!(codes::structure::WALK_DEPTH_EXCEEDED,
                "Walk depth limit reached; deeper content skipped",
                pos = node_pos(node),
                "depth" => ctx.depth
            );
            return Ok(());
        }

        // Conditional fragments are part of template-indirection handling
        if ctx.origin == ControlOrigin::TemplateExpansion && is_xsl(node, "if") {
            return self.conditional_fragment(node, ctx);
        }

        let class = classify(node);
        if self.prefs.log_classification_details {
            log_debug!("Element classified",
                "tag" => tag(node),
                "class" => class.as_str()
            );
        }

        match class {
            ElementClass::RepeatingContainer => self.repeating_container(node, ctx),
            ElementClass::ModalTemplate => self.template_definition(node, ctx),
            ElementClass::TemplateCall => self.template_call(node, ctx),
            ElementClass::Caption => {
                self.state.push_lookback(LabelCandidate {
                    text: own_text(node),
                    row: self.state.row,
                    col: self.state.col,
                });
                Ok(())
            }
            ElementClass::RowBreak => {
                self.state.advance_row();
                self.walk_children(node, &ctx.deeper())
            }
            ElementClass::LayoutPlaceholder => self.walk_children(node, &ctx.deeper()),
            ElementClass::SectionContainer => self.section_container(node, ctx),
            ElementClass::RepeatingTable => self.repeating_table(node, ctx),
            ElementClass::Candidate => match self.try_extract_control(node, ctx) {
                Some(control) => {
                    self.capture(control, ctx);
                    Ok(())
                }
                None => self.walk_children(node, &ctx.deeper()),
            },
        }
    }

    // ── Containers ──────────────────────────────────────────────────────

    /// Rule 1: repeating-section container
    fn repeating_container(&mut self, node: Node, ctx: &WalkContext) -> ParseResult<()> {
        let bind = binding(node)
            .map(str::to_string)
            .or_else(|| child_apply_templates_select(node))
            .unwrap_or_default();
        let id = ctrl_id(node).map(str::to_string);

        let local = self.repeating_local_name(node, id.as_deref(), &bind, "Section");
        let display = match ctx.current_repeating() {
            Some(outer) => format!("{}_{}", outer.display_name, local),
            None => local,
        };
        let claimed = self.state.names.claim(&display);

        self.state.advance_row();
        let section_idx = self.state.open_section(
            SectionScope::new(claimed.clone(), SectionKind::Repeating, self.state.row)
                .with_ctrl_id(id),
        );

        let scope = RepeatingScope {
            name: claimed,
            binding: bind,
            kind: RepeatingKind::Section,
            display_name: display,
            depth: ctx.repeating.len() + 1,
        };

        self.walk_children(node, &ctx.with_repeating(scope))?;

        self.state.close_section(section_idx);
        self.state.advance_row();
        Ok(())
    }

    /// Rule 7: plain section container, flattened when it is pure layout
    /// inside an active repeating scope
    fn section_container(&mut self, node: Node, ctx: &WalkContext) -> ParseResult<()> {
        let inside_conditional = node.parent().is_some_and(|p| is_xsl(p, "if"));
        if ctx.current_repeating().is_some() && !inside_conditional {
            log_debug!("Section container flattened inside repeating scope",
                "scope" => ctx.current_repeating().map(|s| s.display_name.as_str()).unwrap_or("")
            );
            return self.walk_children(node, &ctx.deeper());
        }

        let id = ctrl_id(node).map(str::to_string);
        let base = binding(node)
            .and_then(|b| binding_leaf(b))
            .map(|leaf| capitalize(&leaf))
            .or_else(|| {
                self.state
                    .take_caption_for_row(self.state.row)
                    .map(|c| sanitize_identifier(&c.text))
            })
            .or_else(|| id.clone())
            .unwrap_or_else(|| {
                let ordinal = self.state.next_section_ordinal();
                synthesized_section_name(ordinal)
            });
        let claimed = self.state.names.claim(&base);

        self.state.advance_row();
        let section_idx = self.state.open_section(
            SectionScope::new(claimed.clone(), SectionKind::Cosmetic, self.state.row)
                .with_ctrl_id(id),
        );

        self.walk_children(node, &ctx.with_section(claimed, SectionKind::Cosmetic))?;

        self.state.close_section(section_idx);
        self.state.advance_row();
        Ok(())
    }

    /// Rule 8: repeating table — synthetic control, then one template row
    /// drilled under the new scope
    fn repeating_table(&mut self, node: Node, ctx: &WalkContext) -> ParseResult<()> {
        let body = if tag(node) == "tbody" {
            node
        } else {
            node.children()
                .find(|c| c.is_element() && tag(*c) == "tbody")
                .unwrap_or(node)
        };
        let for_each = body
            .descendants()
            .find(|d| is_xsl(*d, "for-each"));
        let bind = for_each
            .and_then(|f| f.attribute("select"))
            .or_else(|| binding(node))
            .unwrap_or_default()
            .to_string();

        let base = self
            .state
            .take_recent_caption()
            .map(|c| sanitize_identifier(&c.text))
            .filter(|s| !s.is_empty())
            .or_else(|| title(node).map(sanitize_identifier))
            .or_else(|| header_text(node).map(|t| sanitize_identifier(&t)))
            .or_else(|| binding_leaf(&bind).map(|leaf| capitalize(&naming::singularize(&leaf))))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                let ordinal = self.state.next_repeating_ordinal();
                synthesized_repeating_name("Table", ordinal)
            });

        let display = match ctx.current_repeating() {
            Some(outer) => format!("{}_{}", outer.display_name, base),
            None => base,
        };
        let claimed = self.state.names.claim(&display);

        // The synthetic table control is captured before the scope opens, so
        // it is tagged with the surrounding context, not its own scope
        let mut table_control = self.build_control(node, ControlKind::RepeatingTable, ctx);
        table_control.name = claimed.clone();
        table_control.binding_path = bind.clone();
        self.capture(table_control, ctx);

        self.state.advance_row();
        let section_idx = self.state.open_section(
            SectionScope::new(claimed.clone(), SectionKind::Repeating, self.state.row)
                .with_ctrl_id(ctrl_id(node).map(str::to_string)),
        );

        let scope = RepeatingScope {
            name: claimed,
            binding: bind,
            kind: RepeatingKind::Table,
            display_name: display,
            depth: ctx.repeating.len() + 1,
        };
        let row_ctx = ctx.with_repeating(scope);

        // One template row only: the for-each body when present, otherwise
        // the first body row
        if let Some(for_each) = for_each {
            self.walk_children(for_each, &row_ctx)?;
        } else if let Some(row) = body.children().find(|c| c.is_element() && tag(*c) == "tr") {
            self.walk(row, &row_ctx)?;
        }

        self.state.close_section(section_idx);
        self.state.advance_row();
        Ok(())
    }

    /// Derive the local name for a repeating container
    fn repeating_local_name(
        &mut self,
        _node: Node,
        id: Option<&str>,
        bind: &str,
        kind_label: &str,
    ) -> String {
        if self.prefs.apply_scope_overrides {
            if let Some(forced) =
                id.and_then(|i| ctrl_scope_override(i, &self.prefs.extra_scope_overrides))
            {
                log_debug!("Scope override applied",
                    "ctrl_id" => id.unwrap_or(""),
                    "scope" => forced
                );
                return forced.to_string();
            }
        }

        binding_leaf(bind)
            .map(|leaf| capitalize(&leaf))
            .or_else(|| {
                self.state
                    .take_caption_for_row(self.state.row)
                    .map(|c| sanitize_identifier(&c.text))
                    .filter(|s| !s.is_empty())
            })
            .or_else(|| id.map(str::to_string))
            .unwrap_or_else(|| {
                let ordinal = self.state.next_repeating_ordinal();
                synthesized_repeating_name(kind_label, ordinal)
            })
    }

    // ── Template indirection ────────────────────────────────────────────

    /// Rule 2: a moded template encountered in document order. Its body is
    /// walked as template-sourced content; the dedup policy reconciles
    /// controls that also surface through an `apply-templates` expansion.
    fn template_definition(&mut self, node: Node, ctx: &WalkContext) -> ParseResult<()> {
        let mode = node.attribute("mode").unwrap_or_default().to_string();

        // A body already inlined at its call site would only contribute
        // duplicate controls and duplicate scopes here
        if self.state.was_mode_expanded(&mode) {
            log_debug!("Template definition already expanded at a call site", "mode" => mode);
            return Ok(());
        }
        self.state.mark_mode_expanded(&mode);

        let key = ExpansionKey {
            mode,
            select: node.attribute("match").unwrap_or_default().to_string(),
            repeating_path: ctx.repeating_path(),
            section_path: ctx.section_path(),
        };

        if !self.state.begin_expansion(key.clone()) {
            log_debug!("Template definition re-entry blocked", "mode" => key.mode);
            return Ok(());
        }

        let body_ctx = ctx.deeper().with_origin(ControlOrigin::TemplateExpansion);
        let result = self.walk_children(node, &body_ctx);

        self.state.end_expansion(&key);
        result
    }

    /// Rule 3: a moded `apply-templates` call. The referenced template is
    /// resolved by scanning the document and its body is walked as if
    /// inlined at the call site.
    fn template_call(&mut self, node: Node, ctx: &WalkContext) -> ParseResult<()> {
        let mode = node.attribute("mode").unwrap_or_default().to_string();
        let select = node.attribute("select").unwrap_or_default().to_string();

        let Some(template) = find_template(self.doc, &mode) else {
            log_error!(codes::structure::UNRESOLVED_TEMPLATE_MODE,
                "apply-templates references an unknown mode; call skipped",
                pos = node_pos(node),
                "mode" => mode,
                "select" => select
            );
            return Ok(());
        };

        if self.state.expansions >= MAX_TEMPLATE_EXPANSIONS {
            log_error!(codes::structure::EXPANSION_LIMIT_EXCEEDED,
                "Template expansion limit reached; further calls skipped",
                "limit" => MAX_TEMPLATE_EXPANSIONS
            );
            return Ok(());
        }

        let key = ExpansionKey {
            mode: mode.clone(),
            select: select.clone(),
            repeating_path: ctx.repeating_path(),
            section_path: ctx.section_path(),
        };
        if !self.state.begin_expansion(key.clone()) {
            log_debug!("Template expansion re-entry blocked",
                "mode" => mode,
                "select" => select
            );
            return Ok(());
        }
        self.state.mark_mode_expanded(&mode);

        // The collection heuristic may introduce a repetition context for
        // this call, unless the select is the scope we are already in
        let already_in_scope = ctx
            .current_repeating()
            .is_some_and(|scope| scope.binding == select);

        let result = match collection_match(&select) {
            Some(matched) if !already_in_scope => {
                let display = compose_scope_name(
                    ctx.current_repeating().map(|s| s.display_name.as_str()),
                    &matched.parent_name,
                    &matched.local_name,
                );
                let claimed = self.state.names.claim(&display);

                self.state.advance_row();
                let section_idx = self.state.open_section(SectionScope::new(
                    claimed.clone(),
                    SectionKind::Repeating,
                    self.state.row,
                ));

                let scope = RepeatingScope {
                    name: claimed,
                    binding: select.clone(),
                    kind: RepeatingKind::Section,
                    display_name: display,
                    depth: ctx.repeating.len() + 1,
                };
                let body_ctx = ctx
                    .with_repeating(scope)
                    .with_origin(ControlOrigin::TemplateExpansion);

                let walked = self.walk_children(template, &body_ctx);
                self.state.close_section(section_idx);
                self.state.advance_row();
                walked
            }
            _ => {
                let body_ctx = ctx.deeper().with_origin(ControlOrigin::TemplateExpansion);
                self.walk_children(template, &body_ctx)
            }
        };

        self.state.end_expansion(&key);
        result
    }

    /// `xsl:if` inside template-sourced content: promote to a conditional
    /// section when the fragment wraps a section container, and skip
    /// fragments that belong to an unentered repeating ancestor context.
    fn conditional_fragment(&mut self, node: Node, ctx: &WalkContext) -> ParseResult<()> {
        let test = node.attribute("test").unwrap_or_default().to_string();

        if test.contains("../") && ctx.repeating.is_empty() {
            log_debug!("Conditional fragment for a repeating ancestor skipped at top level",
                "test" => test
            );
            return Ok(());
        }

        let container = node.descendants().find(|d| {
            d.is_element() && *d != node && classify(*d) == ElementClass::SectionContainer
        });

        let Some(container) = container else {
            return self.walk_children(node, &ctx.deeper());
        };

        let condition = parse_condition(&test);
        let base = fragment_caption(node)
            .map(|c| sanitize_identifier(&c))
            .or_else(|| condition.field.clone())
            .or_else(|| ctrl_id(container).map(str::to_string))
            .or_else(|| enclosing_template_mode(node))
            .unwrap_or_else(|| {
                let ordinal = self.state.next_section_ordinal();
                synthesized_section_name(ordinal)
            });
        let claimed = self.state.names.claim(&base);

        self.state.advance_row();
        let section_idx = self.state.open_section(
            SectionScope::new(claimed.clone(), SectionKind::Conditional, self.state.row)
                .with_ctrl_id(ctrl_id(container).map(str::to_string)),
        );

        let body_ctx = ctx.with_section(claimed, SectionKind::Conditional);
        for child in node.children().filter(|n| n.is_element()) {
            if child == container {
                // The container is represented by the conditional scope
                // itself; descend into its content directly
                self.walk_children(child, &body_ctx)?;
            } else {
                self.walk(child, &body_ctx)?;
            }
        }

        self.state.close_section(section_idx);
        self.state.advance_row();
        Ok(())
    }

    // ── Control extraction (rule 9) ─────────────────────────────────────

    /// Attempt control extraction in fixed priority order; `None` falls
    /// through to plain descent.
    fn try_extract_control(&mut self, node: Node, ctx: &WalkContext) -> Option<Control> {
        let t = tag(node);
        let bound = binding(node).is_some();

        // (a) bound inline element with a recognized class marker
        if bound {
            if let Some(kind) = kind_from_classes(node) {
                let mut control = self.build_control(node, kind, ctx);
                if kind.has_options() {
                    control.choice_options = extract_options(node);
                }
                return Some(control);
            }
        }

        // (b) label-only element: text content, no binding, no type marker
        if !bound && extended_type(node).is_none() && LABEL_TAGS.contains(&t.as_str()) {
            let text = own_text(node);
            if !text.is_empty() && !node.children().any(|c| c.is_element()) {
                let mut control = self.build_control(node, ControlKind::Label, ctx);
                control.label = text.clone();
                control.name = sanitize_identifier(&text);
                return Some(control);
            }
        }

        // (c) extended-control-type attribute, excluding structural names
        if let Some(xct) = extended_type(node) {
            if !ControlKind::is_structural_type_name(xct) {
                let kind = ControlKind::from_extended_type(xct).unwrap_or(ControlKind::Generic);
                let mut control = self.build_control(node, kind, ctx);
                if kind.has_options() {
                    control.choice_options = extract_options(node);
                }
                return Some(control);
            }
        }

        // (d) native form elements
        match t.as_str() {
            "input" => {
                let kind = match node.attribute("type").unwrap_or("text") {
                    "checkbox" => ControlKind::CheckBox,
                    "radio" => ControlKind::OptionButton,
                    "button" | "submit" => ControlKind::Button,
                    "hidden" => return None,
                    _ => ControlKind::TextField,
                };
                let mut control = self.build_control(node, kind, ctx);
                if kind == ControlKind::OptionButton {
                    if let Some(value) = node.attribute("value") {
                        let mut option = ChoiceOption::new(value, value, 0);
                        option.is_default = node.attribute("checked").is_some();
                        control.choice_options.push(option);
                    }
                }
                return Some(control);
            }
            "select" => {
                let mut control = self.build_control(node, ControlKind::DropDown, ctx);
                control.choice_options = extract_options(node);
                return Some(control);
            }
            "textarea" => {
                return Some(self.build_control(node, ControlKind::TextField, ctx));
            }
            // (e) embedded objects, classified by classid
            "object" | "embed" => {
                let classid = node.attribute("classid").unwrap_or_default();
                let kind = if classid
                    .to_ascii_lowercase()
                    .contains(PEOPLE_PICKER_CLASSID)
                {
                    ControlKind::PeoplePicker
                } else {
                    ControlKind::ActiveX
                };
                return Some(self.build_control(node, kind, ctx));
            }
            _ => {}
        }

        // (f) any other bound element
        if bound {
            return Some(self.build_control(node, ControlKind::Generic, ctx));
        }

        None
    }

    /// Assemble a control from an element, before capture assigns its index
    /// and grid position
    fn build_control(&mut self, node: Node, kind: ControlKind, _ctx: &WalkContext) -> Control {
        let mut control = Control::new(String::new(), kind);
        control.id = ctrl_id(node).map(str::to_string);
        control.binding_path = binding(node).unwrap_or_default().to_string();
        control.column_span = colspan(node).unwrap_or(1);
        control.row_span = node
            .attribute("rowspan")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);

        if let Some(t) = title(node) {
            control.label = t.to_string();
        }

        for attr in node.attributes() {
            control
                .properties
                .insert(attr.name().to_string(), attr.value().to_string());
        }

        control
    }

    /// Capture a control: naming fallback chain, membership tagging, dedup,
    /// index and grid assignment.
    fn capture(&mut self, mut control: Control, ctx: &WalkContext) {
        if !self.state.control_capacity_left() {
            return;
        }

        // Label backfill from the lookback neighborhood
        if control.label.is_empty()
            && control.kind != ControlKind::Label
            && self.prefs.label_from_lookback
        {
            if let Some(caption) = self.state.take_caption_for_row(self.state.row) {
                control.label = caption.text;
            }
        }

        // Naming fallback chain: binding leaf, label text, stable id,
        // synthesized Type_ordinal
        if control.name.is_empty() {
            control.name = binding_leaf(&control.binding_path)
                .or_else(|| {
                    let candidate = sanitize_identifier(&control.label);
                    (!candidate.is_empty()).then_some(candidate)
                })
                .or_else(|| control.id.clone())
                .unwrap_or_else(|| {
                    let ordinal = self.state.next_control_ordinal(control.kind);
                    synthesized_control_name(control.kind.as_str(), ordinal)
                });
        }

        // Membership tagging: the innermost entry of each stack wins
        if let Some((section_name, section_kind)) = ctx.current_section() {
            control.section = SectionMembership {
                parent_section: Some(section_name.clone()),
                section_kind: Some(*section_kind),
            };
        }
        if let Some(scope) = ctx.current_repeating() {
            control.repeating = RepeatingMembership {
                is_repeating: true,
                repeating_section_name: Some(scope.display_name.clone()),
                repeating_section_binding: Some(scope.binding.clone()),
            };
        }

        // Seeded override: a control id known to belong to a repeating scope
        // that markup shape alone cannot place
        if self.prefs.apply_scope_overrides {
            if let Some(forced) = control
                .id
                .as_deref()
                .and_then(|id| ctrl_scope_override(id, &self.prefs.extra_scope_overrides))
            {
                log_debug!("Control scope override applied",
                    "ctrl_id" => control.id.as_deref().unwrap_or(""),
                    "scope" => forced
                );
                control.repeating.is_repeating = true;
                control.repeating.repeating_section_name = Some(forced.to_string());
            }
        }

        control.origin = ctx.origin;

        // Dedup by stable id: skip only same-origin same-binding repeats,
        // and let a main-flow occurrence supersede a template placeholder
        if let Some(id) = control.id.clone() {
            if let Some(existing_idx) = self.state.seen_index(&id) {
                let existing = &self.state.controls[existing_idx];
                let same_origin = existing.origin == control.origin;
                let same_binding = existing.binding_path == control.binding_path;
                let superseding = control.origin == ControlOrigin::MainFlow
                    && (existing.origin == ControlOrigin::TemplateExpansion
                        || existing.is_underspecified());

                if same_origin && same_binding && !superseding {
                    log_debug!("Duplicate control occurrence skipped",
                        "ctrl_id" => id,
                        "binding" => control.binding_path
                    );
                    return;
                }

                if superseding && same_binding {
                    // The placeholder slot keeps its capture index so list
                    // order stays stable; everything else comes from the
                    // main-flow occurrence
                    control.doc_index = existing.doc_index;
                    control.grid = GridPos::new(self.state.row, self.state.col);
                    self.state.col += 1;
                    log_debug!("Template placeholder superseded by main-flow occurrence",
                        "ctrl_id" => id
                    );
                    self.state.controls[existing_idx] = control;
                    return;
                }
                // Different binding or origin: both occurrences are kept
            }
        }

        control.doc_index = self.state.next_doc_index();
        control.grid = GridPos::new(self.state.row, self.state.col);
        self.state.col += 1;

        let index = self.state.controls.len();
        if let Some(id) = control.id.clone() {
            self.state.record_seen(id, index);
        }
        self.state.controls.push(control);
    }
}

// ── Free helpers ────────────────────────────────────────────────────────

/// Find the template for a mode by scanning the whole document
fn find_template<'a, 'input>(doc: &'a Document<'input>, mode: &str) -> Option<Node<'a, 'input>> {
    doc.descendants()
        .find(|n| is_xsl(*n, "template") && n.attribute("mode") == Some(mode))
}

/// The select of a direct child `apply-templates`, for containers detected
/// by their call site
fn child_apply_templates_select(node: Node) -> Option<String> {
    node.children()
        .find(|c| is_xsl(*c, "apply-templates"))
        .and_then(|c| c.attribute("select"))
        .map(str::to_string)
}

/// First caption-shaped fragment inside a conditional fragment
fn fragment_caption(node: Node) -> Option<String> {
    node.descendants()
        .filter(|d| d.is_element() && *d != node)
        .find(|d| classify(*d) == ElementClass::Caption)
        .map(own_text)
}

/// The mode of the nearest enclosing template definition
fn enclosing_template_mode(node: Node) -> Option<String> {
    node.ancestors()
        .find(|a| is_xsl(*a, "template"))
        .and_then(|t| t.attribute("mode"))
        .map(str::to_string)
}

/// Header text of a table, for repeating-table naming
fn header_text(node: Node) -> Option<String> {
    let thead = node
        .descendants()
        .find(|d| d.is_element() && tag(*d) == "thead")?;
    let text = element_text(thead);
    (!text.is_empty() && text.len() <= MAX_CAPTION_LENGTH).then_some(text)
}

/// First class token that maps to a control kind
fn kind_from_classes(node: Node) -> Option<ControlKind> {
    crate::document::attrs::class_tokens(node).find_map(ControlKind::from_class_token)
}

/// Extract choice options from `option` children, in document order
fn extract_options(node: Node) -> Vec<ChoiceOption> {
    let mut options = Vec::new();
    for (order, option_node) in node
        .descendants()
        .filter(|d| d.is_element() && tag(*d) == "option")
        .enumerate()
    {
        if options.len() >= crate::config::constants::compile_time::columns::MAX_CHOICE_OPTIONS {
            crate::log_error!(
                codes::columns::OPTION_LIMIT_EXCEEDED,
                "Choice option limit reached; remaining options dropped"
            );
            break;
        }
        let display = element_text(option_node);
        let value = option_node
            .attribute("value")
            .map(str::to_string)
            .unwrap_or_else(|| display.clone());
        let mut option = ChoiceOption::new(value, display, order);
        option.is_default = option_node.attribute("selected").is_some();
        options.push(option);
    }
    options
}
