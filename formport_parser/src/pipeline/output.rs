//! Export payload for downstream generators
//!
//! The serialized form model is the only surface the SQL/K2/Nintex writers
//! read; they never call back into the parser.

use crate::model::FormModel;
use serde::{Deserialize, Serialize};

/// Summary counters included alongside the model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportSummary {
    pub view_count: usize,
    pub control_count: usize,
    pub dynamic_section_count: usize,
    pub column_count: usize,
    pub conditional_field_count: usize,
}

/// The complete export payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormModelExport {
    pub summary: ExportSummary,
    #[serde(flatten)]
    pub model: FormModel,
}

impl FormModelExport {
    pub fn new(model: FormModel) -> Self {
        let summary = ExportSummary {
            view_count: model.views.len(),
            control_count: model.total_controls(),
            dynamic_section_count: model.dynamic_sections.len(),
            column_count: model.data.len(),
            conditional_field_count: model.conditional_visibility.len(),
        };
        Self { summary, model }
    }

    /// Serialize for downstream consumption
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize human-readably
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Control, ControlKind, ViewModel};

    fn sample_model() -> FormModel {
        let mut view = ViewModel::new("main");
        let mut control = Control::new("city", ControlKind::TextField);
        control.binding_path = "my:trip/my:city".to_string();
        view.controls.push(control);

        FormModel {
            views: vec![view],
            ..Default::default()
        }
    }

    #[test]
    fn test_export_summary_counts() {
        let export = FormModelExport::new(sample_model());
        assert_eq!(export.summary.view_count, 1);
        assert_eq!(export.summary.control_count, 1);
        assert_eq!(export.summary.column_count, 0);
    }

    #[test]
    fn test_export_round_trips_through_json() {
        let export = FormModelExport::new(sample_model());
        let json = export.to_json().unwrap();
        assert!(json.contains("\"views\""));
        assert!(json.contains("\"summary\""));

        let parsed: FormModelExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model.views[0].name, "main");
        assert_eq!(parsed.model.views[0].controls[0].kind, ControlKind::TextField);
    }
}
