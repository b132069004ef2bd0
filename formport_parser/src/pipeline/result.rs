//! Pipeline result types

use super::stats::PipelineStats;
use super::PipelineError;
use crate::dynamics::VisibilityMap;
use crate::logging::codes;
use crate::model::{DynamicSection, FormModel, ViewModel};
use crate::log_success;
use std::time::Duration;

/// The output of processing one view through all per-view passes
#[derive(Debug, Clone)]
pub struct ViewParseOutput {
    pub view: ViewModel,
    pub dynamic_sections: Vec<DynamicSection>,
    pub visibility: VisibilityMap,
    pub duration: Duration,
}

impl ViewParseOutput {
    pub fn control_count(&self) -> usize {
        self.view.control_count()
    }

    pub fn log_success(&self) {
        log_success!(codes::success::VIEW_PROCESSING_SUCCESS,
            "View processed",
            "view" => self.view.name,
            "controls" => self.view.control_count(),
            "sections" => self.view.sections.len(),
            "dynamic_sections" => self.dynamic_sections.len(),
            "duration_ms" => self.duration.as_secs_f64() * 1000.0
        );
    }
}

/// The output of processing a whole form: the aggregate model plus per-view
/// failures (a failed view contributes zero controls, never a form failure)
#[derive(Debug)]
pub struct FormParseResult {
    pub model: FormModel,
    pub failed_views: Vec<(String, PipelineError)>,
    pub stats: PipelineStats,
}

impl FormParseResult {
    pub fn is_fully_successful(&self) -> bool {
        self.failed_views.is_empty()
    }

    pub fn log_success(&self) {
        log_success!(codes::success::FORM_PROCESSING_SUCCESS,
            "Form processed",
            "views" => self.stats.views_processed,
            "failed_views" => self.stats.views_failed,
            "controls" => self.stats.total_controls,
            "columns" => self.stats.total_columns,
            "duration_ms" => self.stats.total_duration.as_secs_f64() * 1000.0
        );
    }
}
