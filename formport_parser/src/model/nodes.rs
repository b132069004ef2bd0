//! Model node definitions for the view parser passes
//!
//! Design principles:
//! - Capture-order tracking: every control carries a unique `doc_index`
//! - Grid positions are assigned once, at capture time, and never mutated
//! - Serde compatible: full serialization support for downstream consumers

use crate::utils::GridPos;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// === CONTROL CLASSIFICATION ===

/// Where a control surfaced during the walk. The dedup policy needs to
/// distinguish occurrences inlined out of a moded template from occurrences
/// in the unconditioned main flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlOrigin {
    MainFlow,
    TemplateExpansion,
}

impl Default for ControlOrigin {
    fn default() -> Self {
        Self::MainFlow
    }
}

/// The kind of a captured control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    TextField,
    RichText,
    DropDown,
    ListBox,
    DatePicker,
    CheckBox,
    OptionButton,
    ExpressionBox,
    PeoplePicker,
    FileAttachment,
    InlineImage,
    Hyperlink,
    Button,
    RepeatingTable,
    RepeatingSection,
    Section,
    Label,
    ActiveX,
    Generic,
}

impl ControlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextField => "TextField",
            Self::RichText => "RichText",
            Self::DropDown => "DropDown",
            Self::ListBox => "ListBox",
            Self::DatePicker => "DatePicker",
            Self::CheckBox => "CheckBox",
            Self::OptionButton => "OptionButton",
            Self::ExpressionBox => "ExpressionBox",
            Self::PeoplePicker => "PeoplePicker",
            Self::FileAttachment => "FileAttachment",
            Self::InlineImage => "InlineImage",
            Self::Hyperlink => "Hyperlink",
            Self::Button => "Button",
            Self::RepeatingTable => "RepeatingTable",
            Self::RepeatingSection => "RepeatingSection",
            Self::Section => "Section",
            Self::Label => "Label",
            Self::ActiveX => "ActiveX",
            Self::Generic => "Generic",
        }
    }

    /// Map an extended-control-type attribute value to a kind
    pub fn from_extended_type(s: &str) -> Option<Self> {
        match s {
            "PlainText" => Some(Self::TextField),
            "RichText" => Some(Self::RichText),
            "DropDown" | "dropdown" | "ComboBox" => Some(Self::DropDown),
            "ListBox" => Some(Self::ListBox),
            "DTPicker" => Some(Self::DatePicker),
            "CheckBox" => Some(Self::CheckBox),
            "OptionButton" => Some(Self::OptionButton),
            "ExpressionBox" => Some(Self::ExpressionBox),
            "PeoplePicker" | "ContactSelector" => Some(Self::PeoplePicker),
            "FileAttachment" => Some(Self::FileAttachment),
            "InlineImage" | "Image" => Some(Self::InlineImage),
            "Hyperlink" => Some(Self::Hyperlink),
            "Button" => Some(Self::Button),
            "Section" => Some(Self::Section),
            "RepeatingSection" => Some(Self::RepeatingSection),
            "RepeatingTable" => Some(Self::RepeatingTable),
            _ => None,
        }
    }

    /// Map a designer class token (`xdTextBox`, ...) to a kind
    pub fn from_class_token(token: &str) -> Option<Self> {
        match token {
            "xdTextBox" => Some(Self::TextField),
            "xdRichTextBox" => Some(Self::RichText),
            "xdComboBox" => Some(Self::DropDown),
            "xdListBox" => Some(Self::ListBox),
            "xdDTPicker" | "xdDTText" => Some(Self::DatePicker),
            "xdBehavior_Boolean" => Some(Self::CheckBox),
            "xdExpressionBox" => Some(Self::ExpressionBox),
            _ => None,
        }
    }

    /// Whether an extended-type name denotes structure rather than a control
    pub fn is_structural_type_name(s: &str) -> bool {
        matches!(s, "Section" | "RepeatingSection" | "RepeatingTable")
    }

    /// Whether this kind contributes a data column during consolidation
    pub fn is_data(&self) -> bool {
        !matches!(
            self,
            Self::Label
                | Self::Section
                | Self::RepeatingSection
                | Self::RepeatingTable
                | Self::Button
                | Self::ExpressionBox
        )
    }

    /// Whether this kind carries choice options
    pub fn has_options(&self) -> bool {
        matches!(self, Self::DropDown | Self::ListBox | Self::OptionButton)
    }

    /// The logical data type of the column this control produces
    pub fn column_type(&self) -> &'static str {
        match self {
            Self::RichText => "Note",
            Self::DropDown | Self::ListBox | Self::OptionButton => "Choice",
            Self::DatePicker => "DateTime",
            Self::CheckBox => "Boolean",
            Self::PeoplePicker => "Person",
            Self::FileAttachment => "Attachment",
            Self::InlineImage => "Image",
            Self::Hyperlink => "Hyperlink",
            _ => "Text",
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// === CHOICE OPTIONS ===

/// One selectable option of a dropdown/listbox/radio control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub display_text: String,
    pub is_default: bool,
    pub order: usize,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, display_text: impl Into<String>, order: usize) -> Self {
        Self {
            value: value.into(),
            display_text: display_text.into(),
            is_default: false,
            order,
        }
    }
}

// === SECTION AND REPEATING SCOPES ===

/// The flavor of a section scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Cosmetic,
    Repeating,
    Conditional,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosmetic => "Cosmetic",
            Self::Repeating => "Repeating",
            Self::Conditional => "Conditional",
        }
    }
}

/// The flavor of a repeating scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatingKind {
    Section,
    Table,
}

impl RepeatingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section => "Section",
            Self::Table => "Table",
        }
    }
}

/// A section scope snapshot. Pushed on container entry, the `end_row` filled
/// in on exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionScope {
    pub name: String,
    pub kind: SectionKind,
    pub ctrl_id: Option<String>,
    pub start_row: usize,
    pub end_row: Option<usize>,
}

impl SectionScope {
    pub fn new(name: impl Into<String>, kind: SectionKind, start_row: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            ctrl_id: None,
            start_row,
            end_row: None,
        }
    }

    pub fn with_ctrl_id(mut self, ctrl_id: Option<String>) -> Self {
        self.ctrl_id = ctrl_id;
        self
    }
}

/// A repeating scope stack entry. Nested scopes compose their display name
/// as `parent.display_name + "_" + local_name`; the innermost entry always
/// wins when tagging a captured control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatingScope {
    pub name: String,
    pub binding: String,
    pub kind: RepeatingKind,
    pub display_name: String,
    pub depth: usize,
}

// === CONTROL ===

/// Cosmetic-section membership of a control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMembership {
    pub parent_section: Option<String>,
    pub section_kind: Option<SectionKind>,
}

/// Repetition membership of a control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatingMembership {
    pub is_repeating: bool,
    pub repeating_section_name: Option<String>,
    pub repeating_section_binding: Option<String>,
}

/// One captured control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    /// Stable per-control id from the source markup, when present
    pub id: Option<String>,
    pub name: String,
    pub kind: ControlKind,
    pub label: String,
    pub binding_path: String,
    /// Monotonic capture order, unique within a view
    pub doc_index: usize,
    /// Layout grid position, assigned once at capture time
    pub grid: GridPos,
    pub column_span: usize,
    pub row_span: usize,
    pub section: SectionMembership,
    pub repeating: RepeatingMembership,
    pub merged_into_parent: bool,
    pub is_multiline_label: bool,
    pub associated_label_id: Option<String>,
    pub associated_control_id: Option<String>,
    /// Raw source attributes in document order
    pub properties: IndexMap<String, String>,
    pub choice_options: Vec<ChoiceOption>,
    pub origin: ControlOrigin,
}

impl Control {
    pub fn new(name: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            label: String::new(),
            binding_path: String::new(),
            doc_index: 0,
            grid: GridPos::default(),
            column_span: 1,
            row_span: 1,
            section: SectionMembership::default(),
            repeating: RepeatingMembership::default(),
            merged_into_parent: false,
            is_multiline_label: false,
            associated_label_id: None,
            associated_control_id: None,
            properties: IndexMap::new(),
            choice_options: Vec::new(),
            origin: ControlOrigin::MainFlow,
        }
    }

    /// The identifier other controls reference this one by: the stable
    /// source id when present, the derived name otherwise
    pub fn reference_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// Whether this control still emits (merged labels become non-emitting
    /// placeholders, not deletions)
    pub fn is_emitting(&self) -> bool {
        !self.merged_into_parent
    }

    /// Whether this occurrence carries so little information that a later
    /// occurrence with the same id may supersede it
    pub fn is_underspecified(&self) -> bool {
        self.binding_path.is_empty() && self.label.is_empty() && self.choice_options.is_empty()
    }

    /// Whether this control is an unassociated standalone label
    pub fn is_unbound_label(&self) -> bool {
        self.kind == ControlKind::Label && self.binding_path.is_empty()
    }
}

// === VIEW MODEL ===

/// The parse result for one view: ordered controls plus section snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub name: String,
    pub controls: Vec<Control>,
    pub sections: Vec<SectionScope>,
}

impl ViewModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controls: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    pub fn emitting_controls(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter().filter(|c| c.is_emitting())
    }

    pub fn find_control_by_id(&self, id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.id.as_deref() == Some(id))
    }
}

// === DYNAMIC SECTIONS ===

/// A conditional-visibility fragment extracted from a moded template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicSection {
    pub mode: String,
    pub ctrl_id: Option<String>,
    pub caption: Option<String>,
    pub condition_text: String,
    pub condition_field: String,
    pub condition_value: Option<String>,
    pub member_control_ids: Vec<String>,
}

// === DATA COLUMNS ===

/// The final aggregate unit: one logical data column, uniquely keyed by
/// `(column_name, owning_name)` across all views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataColumn {
    pub column_name: String,
    pub column_type: String,
    pub owning_name: Option<String>,
    pub is_repeating: bool,
    pub is_conditional: bool,
    pub conditional_on_field: Option<String>,
    pub display_name: String,
    pub valid_values: Vec<ChoiceOption>,
    pub default_value: Option<String>,
}

// === FORM MODEL ===

/// The form-level aggregate consumed by downstream generators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormModel {
    pub views: Vec<ViewModel>,
    pub dynamic_sections: Vec<DynamicSection>,
    pub conditional_visibility: IndexMap<String, Vec<String>>,
    pub data: Vec<DataColumn>,
}

impl FormModel {
    pub fn total_controls(&self) -> usize {
        self.views.iter().map(ViewModel::control_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mappings() {
        assert_eq!(
            ControlKind::from_extended_type("PlainText"),
            Some(ControlKind::TextField)
        );
        assert_eq!(
            ControlKind::from_class_token("xdDTPicker"),
            Some(ControlKind::DatePicker)
        );
        assert_eq!(ControlKind::from_extended_type("NoSuchType"), None);
        assert!(ControlKind::is_structural_type_name("RepeatingSection"));
        assert!(!ControlKind::is_structural_type_name("PlainText"));
    }

    #[test]
    fn test_data_kinds() {
        assert!(ControlKind::TextField.is_data());
        assert!(ControlKind::PeoplePicker.is_data());
        assert!(!ControlKind::Label.is_data());
        assert!(!ControlKind::RepeatingTable.is_data());
        assert!(!ControlKind::Button.is_data());
    }

    #[test]
    fn test_column_types() {
        assert_eq!(ControlKind::CheckBox.column_type(), "Boolean");
        assert_eq!(ControlKind::DropDown.column_type(), "Choice");
        assert_eq!(ControlKind::Generic.column_type(), "Text");
    }

    #[test]
    fn test_control_reference_id() {
        let mut control = Control::new("Category", ControlKind::TextField);
        assert_eq!(control.reference_id(), "Category");
        control.id = Some("CTRL3".to_string());
        assert_eq!(control.reference_id(), "CTRL3");
    }

    #[test]
    fn test_underspecified_detection() {
        let mut control = Control::new("x", ControlKind::Generic);
        assert!(control.is_underspecified());
        control.binding_path = "my:field".to_string();
        assert!(!control.is_underspecified());
    }

    #[test]
    fn test_view_model_queries() {
        let mut view = ViewModel::new("main");
        let mut a = Control::new("a", ControlKind::Label);
        a.merged_into_parent = true;
        let mut b = Control::new("b", ControlKind::TextField);
        b.id = Some("CTRL1".to_string());
        view.controls.push(a);
        view.controls.push(b);

        assert_eq!(view.control_count(), 2);
        assert_eq!(view.emitting_controls().count(), 1);
        assert!(view.find_control_by_id("CTRL1").is_some());
        assert!(view.find_control_by_id("CTRL9").is_none());
    }
}
