//! Pipeline statistics

use crate::model::FormModel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Aggregate statistics for one form-processing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    pub views_processed: usize,
    pub views_failed: usize,
    pub total_controls: usize,
    pub total_sections: usize,
    pub total_dynamic_sections: usize,
    pub total_columns: usize,
    pub controls_by_kind: IndexMap<String, usize>,
    #[serde(skip)]
    pub total_duration: Duration,
}

impl PipelineStats {
    /// Compute statistics from a finished form model
    pub fn from_model(model: &FormModel, views_failed: usize, total_duration: Duration) -> Self {
        let mut controls_by_kind: IndexMap<String, usize> = IndexMap::new();
        for view in &model.views {
            for control in &view.controls {
                *controls_by_kind
                    .entry(control.kind.as_str().to_string())
                    .or_insert(0) += 1;
            }
        }

        Self {
            views_processed: model.views.len(),
            views_failed,
            total_controls: model.total_controls(),
            total_sections: model.views.iter().map(|v| v.sections.len()).sum(),
            total_dynamic_sections: model.dynamic_sections.len(),
            total_columns: model.data.len(),
            controls_by_kind,
            total_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Control, ControlKind, ViewModel};

    #[test]
    fn test_stats_from_model() {
        let mut view = ViewModel::new("v1");
        view.controls.push(Control::new("a", ControlKind::TextField));
        view.controls.push(Control::new("b", ControlKind::TextField));
        view.controls.push(Control::new("c", ControlKind::Label));

        let model = FormModel {
            views: vec![view],
            ..Default::default()
        };

        let stats = PipelineStats::from_model(&model, 1, Duration::from_millis(5));
        assert_eq!(stats.views_processed, 1);
        assert_eq!(stats.views_failed, 1);
        assert_eq!(stats.total_controls, 3);
        assert_eq!(stats.controls_by_kind.get("TextField"), Some(&2));
        assert_eq!(stats.controls_by_kind.get("Label"), Some(&1));
    }
}
