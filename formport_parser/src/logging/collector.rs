//! Error collector for batch view processing with cargo-style output
//!
//! Provides organized error collection and reporting for parallel view
//! processing.

use super::events::LogEvent;
use crate::config::constants::compile_time::logging::*;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// ============================================================================
// VIEW PROCESSING CONTEXT
// ============================================================================

/// Context information for view processing
#[derive(Debug, Clone)]
pub struct ViewProcessingContext {
    pub view_name: String,
    pub view_id: usize,
    pub start_time: Instant,
}

impl ViewProcessingContext {
    pub fn new(view_name: String, view_id: usize) -> Self {
        Self {
            view_name,
            view_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// PROCESSING SUMMARY
// ============================================================================

/// Summary of batch processing results
#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_views: usize,
    pub views_with_errors: usize,
    pub views_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl ProcessingSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

// ============================================================================
// ERROR COLLECTOR
// ============================================================================

/// Thread-safe error collector for batch processing
pub struct ErrorCollector {
    /// Events organized by view name for cargo-style output
    view_events: Mutex<BTreeMap<String, Vec<LogEvent>>>,
    /// Total retained event count across all views
    total_events: Mutex<usize>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            view_events: Mutex::new(BTreeMap::new()),
            total_events: Mutex::new(0),
        }
    }

    /// Register a view so it appears in the summary even with zero events
    pub fn record_view_context(&self, context: ViewProcessingContext) {
        self.view_events
            .lock()
            .unwrap()
            .entry(context.view_name)
            .or_default();
    }

    /// Record an event against a view, bounded by the retention limits
    pub fn record_event(&self, view_name: &str, event: LogEvent) {
        let mut total = self.total_events.lock().unwrap();
        if *total >= MAX_ERROR_COLLECTION {
            return;
        }

        let mut events = self.view_events.lock().unwrap();
        let bucket = events.entry(view_name.to_string()).or_default();
        if bucket.len() >= MAX_EVENTS_PER_VIEW {
            return;
        }

        bucket.push(event);
        *total += 1;
    }

    /// Get all recorded events for a view
    pub fn get_view_errors(&self, view_name: &str) -> Vec<LogEvent> {
        self.view_events
            .lock()
            .unwrap()
            .get(view_name)
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    /// Summarize everything recorded so far
    pub fn get_summary(&self) -> ProcessingSummary {
        let events = self.view_events.lock().unwrap();
        let mut summary = ProcessingSummary::new();
        summary.total_views = events.len();

        for bucket in events.values() {
            let errors = bucket.iter().filter(|e| e.is_error()).count();
            let warnings = bucket.iter().filter(|e| e.is_warning()).count();
            if errors > 0 {
                summary.views_with_errors += 1;
            }
            if warnings > 0 {
                summary.views_with_warnings += 1;
            }
            summary.total_errors += errors;
            summary.total_warnings += warnings;
        }

        summary
    }

    /// Capacity usage: (current, max, fraction)
    pub fn get_capacity_info(&self) -> (usize, usize, f64) {
        let current = *self.total_events.lock().unwrap();
        (
            current,
            MAX_ERROR_COLLECTION,
            current as f64 / MAX_ERROR_COLLECTION as f64,
        )
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.view_events.lock().unwrap().clear();
        *self.total_events.lock().unwrap() = 0;
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Format collected errors the way cargo reports per-file diagnostics:
/// grouped by view, errors first, with a trailing summary line.
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    {
        let events = collector.view_events.lock().unwrap();
        for (view_name, bucket) in events.iter() {
            let errors: Vec<_> = bucket.iter().filter(|e| e.is_error()).collect();
            let warnings: Vec<_> = bucket.iter().filter(|e| e.is_warning()).collect();

            if errors.is_empty() && warnings.is_empty() {
                continue;
            }

            output.push_str(&format!("view `{}`:\n", view_name));
            for event in errors.iter().chain(warnings.iter()) {
                output.push_str(&format!("  {}\n", event.format()));
            }
        }
    }

    let summary = collector.get_summary();
    output.push_str(&format!(
        "{} view(s): {} error(s), {} warning(s)\n",
        summary.total_views, summary.total_errors, summary.total_warnings
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_record_and_summarize() {
        let collector = ErrorCollector::new();
        collector.record_view_context(ViewProcessingContext::new("view1".to_string(), 0));
        collector.record_event(
            "view1",
            LogEvent::error(codes::document::MALFORMED_MARKUP, "bad"),
        );
        collector.record_event("view1", LogEvent::warning("odd"));
        collector.record_view_context(ViewProcessingContext::new("view2".to_string(), 1));

        let summary = collector.get_summary();
        assert_eq!(summary.total_views, 2);
        assert_eq!(summary.views_with_errors, 1);
        assert_eq!(summary.total_errors, 1);
        assert_eq!(summary.total_warnings, 1);
    }

    #[test]
    fn test_get_view_errors_filters_non_errors() {
        let collector = ErrorCollector::new();
        collector.record_event("v", LogEvent::warning("w"));
        collector.record_event("v", LogEvent::error(codes::system::INTERNAL_ERROR, "e"));

        let errors = collector.get_view_errors("v");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_error());
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        collector.record_event(
            "expense_view",
            LogEvent::error(codes::dynamics::MISSING_TEMPLATE, "no template"),
        );

        let output = format_cargo_style_errors(&collector);
        assert!(output.contains("view `expense_view`:"));
        assert!(output.contains("E060"));
        assert!(output.contains("1 error(s)"));
    }

    #[test]
    fn test_clear_resets_capacity() {
        let collector = ErrorCollector::new();
        collector.record_event("v", LogEvent::warning("w"));
        assert_eq!(collector.get_capacity_info().0, 1);
        collector.clear();
        assert_eq!(collector.get_capacity_info().0, 0);
        assert_eq!(collector.get_summary().total_views, 0);
    }
}
