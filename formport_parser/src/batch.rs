//! Batch processing for extracted view files
//!
//! Discovers view documents in a directory and runs the per-view pipeline
//! sequentially or across worker threads. Per-view parsing shares no mutable
//! state, so workers each own their traversal state and meet at a join
//! barrier before the cross-view consolidation runs.

use crate::config::constants::compile_time::batch_processing::*;
use crate::config::runtime::{BatchPreferences, PreferenceProfile};
use crate::dynamics::merge_visibility;
use crate::logging::codes;
use crate::model::{FormModel, ViewModel};
use crate::pipeline::{self, FormParseResult, PipelineError, PipelineStats, ViewParseOutput};
use crate::{log_error, log_info, log_success, log_warning};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;
use thiserror::Error;

/// View file extensions recognized during discovery
const VIEW_EXTENSIONS: [&str; 2] = ["xsl", "xslt"];

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    pub max_files: Option<usize>,
    pub progress_reporting: bool,
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from_preferences(&BatchPreferences::default())
    }
}

impl BatchConfig {
    pub fn from_preferences(prefs: &BatchPreferences) -> Self {
        let auto_threads = thread::available_parallelism()
            .map(|n| n.get().min(8))
            .unwrap_or(4);
        Self {
            max_threads: match prefs.max_threads {
                0 => auto_threads,
                n => n.min(MAX_BATCH_THREADS),
            },
            recursive: prefs.recursive,
            max_files: None,
            progress_reporting: prefs.progress_reporting,
            fail_fast: prefs.fail_fast,
        }
    }
}

/// Batch error taxonomy
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Batch directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Batch directory unreadable: {path}: {message}")]
    DirectoryUnreadable { path: PathBuf, message: String },
}

/// Batch processing results
#[derive(Debug)]
pub struct BatchResults {
    pub form: FormParseResult,
    pub files_discovered: usize,
    pub files_processed: usize,
}

impl BatchResults {
    pub fn success_count(&self) -> usize {
        self.files_processed - self.form.failed_views.len()
    }

    pub fn failure_count(&self) -> usize {
        self.form.failed_views.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.success_count() as f64 / self.files_processed as f64
        }
    }
}

// ============================================================================
// DISCOVERY
// ============================================================================

/// Discover view files under a directory, bounded by the file limits
pub fn discover_view_files(dir: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let limit = config
        .max_files
        .unwrap_or(MAX_BATCH_FILES)
        .min(MAX_BATCH_FILES);
    let mut files = Vec::new();
    collect_files(dir, config.recursive, limit, &mut files)?;
    files.sort();

    if files.len() >= limit {
        log_warning!("Batch file limit reached; remaining files skipped",
            "limit" => limit
        );
    }

    Ok(files)
}

fn collect_files(
    dir: &Path,
    recursive: bool,
    limit: usize,
    files: &mut Vec<PathBuf>,
) -> Result<(), BatchError> {
    let entries = fs::read_dir(dir).map_err(|e| BatchError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    for entry in entries.flatten() {
        if files.len() >= limit {
            return Ok(());
        }
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_files(&path, recursive, limit, files)?;
            }
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| VIEW_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        {
            files.push(path);
        }
    }

    Ok(())
}

// ============================================================================
// PROCESSING
// ============================================================================

/// Process every view file in a directory into one form model
pub fn process_directory(dir: &Path, config: &BatchConfig) -> Result<BatchResults, BatchError> {
    process_directory_with_preferences(dir, config, &PreferenceProfile::default())
}

/// Process a directory with custom preferences
pub fn process_directory_with_preferences(
    dir: &Path,
    config: &BatchConfig,
    prefs: &PreferenceProfile,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let files = discover_view_files(dir, config)?;

    log_info!("Starting batch processing",
        "directory" => dir.display(),
        "files" => files.len(),
        "threads" => config.max_threads
    );

    if files.is_empty() {
        log_error!(codes::batch::NO_VIEWS_FOUND,
            "No view files found in the batch directory",
            "directory" => dir.display()
        );
    }

    // Read sources up front; a read failure fails only that view
    let mut views: Vec<(String, Result<String, PipelineError>)> = Vec::new();
    for path in &files {
        let name = view_name_for(path);
        let source = fs::read_to_string(path).map_err(|e| {
            PipelineError::from(crate::document::DocumentError::io(e.to_string()))
        });
        views.push((name, source));
    }

    let outputs = if config.max_threads <= 1 || views.len() <= 1 {
        process_sequential(&views, config, prefs)
    } else {
        process_parallel(&views, config, prefs)
    };

    // Join barrier crossed: fold outputs in discovery order, then
    // consolidate once over everything
    let mut model = FormModel::default();
    let mut failed_views = Vec::new();
    for (name, outcome) in outputs {
        match outcome {
            Some(Ok(output)) => {
                model.views.push(output.view);
                model.dynamic_sections.extend(output.dynamic_sections);
                merge_visibility(&mut model.conditional_visibility, output.visibility);
            }
            Some(Err(error)) => {
                log_error!(codes::pipeline::VIEW_FAILED,
                    "View failed and contributes zero controls",
                    "view" => name,
                    "error" => error
                );
                model.views.push(ViewModel::new(name.clone()));
                failed_views.push((name, error));
            }
            // fail_fast stopped the batch before this view ran
            None => {}
        }
    }

    model.data = crate::columns::consolidate(&model.views, &model.conditional_visibility);

    let files_processed = model.views.len();
    let stats = PipelineStats::from_model(&model, failed_views.len(), start_time.elapsed());
    let form = FormParseResult {
        model,
        failed_views,
        stats,
    };

    log_success!(codes::success::BATCH_PROCESSING_SUCCESS,
        "Batch processing completed",
        "files" => files.len(),
        "processed" => files_processed,
        "failed" => form.failed_views.len()
    );

    Ok(BatchResults {
        form,
        files_discovered: files.len(),
        files_processed,
    })
}

type ViewOutcome = Option<Result<ViewParseOutput, PipelineError>>;

fn process_sequential(
    views: &[(String, Result<String, PipelineError>)],
    config: &BatchConfig,
    prefs: &PreferenceProfile,
) -> Vec<(String, ViewOutcome)> {
    let mut outputs = Vec::with_capacity(views.len());
    let mut stopped = false;

    for (name, source) in views {
        if stopped {
            outputs.push((name.clone(), None));
            continue;
        }
        if config.progress_reporting {
            log_info!("Processing view", "view" => name);
        }
        let outcome = process_one(name, source, prefs);
        if config.fail_fast && matches!(outcome, Some(Err(_))) {
            stopped = true;
        }
        outputs.push((name.clone(), outcome));
    }

    outputs
}

fn process_parallel(
    views: &[(String, Result<String, PipelineError>)],
    config: &BatchConfig,
    prefs: &PreferenceProfile,
) -> Vec<(String, ViewOutcome)> {
    let thread_count = config.max_threads.min(views.len()).max(1);
    let mut outcomes: Vec<(String, ViewOutcome)> =
        views.iter().map(|(name, _)| (name.clone(), None)).collect();

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(thread_count);

        for worker in 0..thread_count {
            let handle = scope.spawn(move || {
                let mut results: Vec<(usize, ViewOutcome)> = Vec::new();
                // Strided assignment: each worker owns every Nth view and
                // its own per-view parser state
                let mut idx = worker;
                while idx < views.len() {
                    let (name, source) = &views[idx];
                    results.push((idx, process_one(name, source, prefs)));
                    idx += thread_count;
                }
                results
            });
            handles.push(handle);
        }

        for handle in handles {
            match handle.join() {
                Ok(results) => {
                    for (idx, outcome) in results {
                        outcomes[idx].1 = outcome;
                    }
                }
                Err(_) => {
                    log_error!(codes::batch::WORKER_FAILURE,
                        "A batch worker thread failed; its views are reported as failures"
                    );
                }
            }
        }
    });

    // A crashed worker leaves its views unprocessed; report them as failures
    for (name, outcome) in outcomes.iter_mut() {
        if outcome.is_none() {
            *outcome = Some(Err(PipelineError::pipeline_error(format!(
                "Worker thread failed before processing view {}",
                name
            ))));
        }
    }

    outcomes
}

fn process_one(
    name: &str,
    source: &Result<String, PipelineError>,
    prefs: &PreferenceProfile,
) -> ViewOutcome {
    match source {
        Ok(text) => Some(pipeline::process_view_with_preferences(name, text, prefs)),
        Err(error) => Some(Err(error.clone())),
    }
}

fn view_name_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("view")
        .to_string()
}
