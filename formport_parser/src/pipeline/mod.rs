//! Per-view and per-form pipeline orchestration
//!
//! A view flows through document load, the structural walk, the label
//! passes, and the dynamic-section scan. A form folds every view's output
//! and finishes with the cross-view column consolidation. No error from a
//! single view propagates past the per-view boundary: a failed view is
//! logged and contributes zero controls.

mod error;
mod info;
pub mod output;
mod result;
mod stats;
mod validation;

// Re-export public types
pub use error::PipelineError;
pub use info::{get_pipeline_info, PassInfo, PipelineInfo};
pub use output::FormModelExport;
pub use result::{FormParseResult, ViewParseOutput};
pub use stats::PipelineStats;
pub use validation::validate_pipeline;

use crate::config::runtime::PreferenceProfile;
use crate::dynamics::merge_visibility;
use crate::logging::{self, codes};
use crate::model::{FormModel, ViewModel};
use crate::{log_error, log_info};
use std::time::Instant;

/// Process one view through the complete per-view pipeline
/// (document -> structure -> labels -> dynamics)
pub fn process_view(view_name: &str, source: &str) -> Result<ViewParseOutput, PipelineError> {
    process_view_with_preferences(view_name, source, &PreferenceProfile::default())
}

/// Process one view with custom preferences
pub fn process_view_with_preferences(
    view_name: &str,
    source: &str,
    prefs: &PreferenceProfile,
) -> Result<ViewParseOutput, PipelineError> {
    let start_time = Instant::now();

    logging::with_view_context(view_name.to_string(), 0, || {
        log_info!("Starting view processing pipeline", "view" => view_name);

        // Stage 1: document load
        let doc = crate::document::parse_view_source(source).map_err(|e| {
            log_error!(e.code(), "View document failed to load", "view" => view_name);
            e
        })?;

        // Stage 2: structural parse
        let (mut controls, sections) =
            crate::structure::parse_view(&doc, &prefs.structure)?;

        // Stage 3: label passes, in place
        crate::labels::run_label_passes(&mut controls);

        // Stage 4: dynamic-section scan over the same raw document
        let (dynamic_sections, visibility) =
            crate::dynamics::extract_dynamic_sections(&doc, &prefs.dynamics);

        let output = ViewParseOutput {
            view: ViewModel {
                name: view_name.to_string(),
                controls,
                sections,
            },
            dynamic_sections,
            visibility,
            duration: start_time.elapsed(),
        };
        output.log_success();

        Ok(output)
    })
}

/// Process all views of a form and produce the aggregate model.
///
/// Per-view failures are collected, never propagated: the failed view is
/// present in the model with zero controls.
pub fn process_form(views: &[(String, String)]) -> FormParseResult {
    process_form_with_preferences(views, &PreferenceProfile::default())
}

/// Process all views of a form with custom preferences
pub fn process_form_with_preferences(
    views: &[(String, String)],
    prefs: &PreferenceProfile,
) -> FormParseResult {
    let start_time = Instant::now();
    log_info!("Starting form processing pipeline", "views" => views.len());

    let mut model = FormModel::default();
    let mut failed_views = Vec::new();

    for (view_name, source) in views {
        match process_view_with_preferences(view_name, source, prefs) {
            Ok(output) => {
                model.views.push(output.view);
                model.dynamic_sections.extend(output.dynamic_sections);
                merge_visibility(&mut model.conditional_visibility, output.visibility);
            }
            Err(error) => {
                log_error!(codes::pipeline::VIEW_FAILED,
                    "View failed and contributes zero controls",
                    "view" => view_name,
                    "error" => error
                );
                model.views.push(ViewModel::new(view_name.clone()));
                failed_views.push((view_name.clone(), error));
            }
        }
    }

    // The one true synchronization point: consolidation observes all views
    model.data = crate::columns::consolidate(&model.views, &model.conditional_visibility);

    let stats = PipelineStats::from_model(&model, failed_views.len(), start_time.elapsed());
    let result = FormParseResult {
        model,
        failed_views,
        stats,
    };
    result.log_success();
    result
}
