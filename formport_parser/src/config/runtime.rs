// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructurePreferences {
    /// Whether to log every classification decision at debug level
    pub log_classification_details: bool,

    /// Whether the seeded control-id scope override table is consulted
    pub apply_scope_overrides: bool,

    /// Additional control-id to repeating-scope-name overrides, merged over
    /// the built-in seed table
    pub extra_scope_overrides: HashMap<String, String>,

    /// Whether captured controls without a title pick up a caption from the
    /// lookback queue on the same grid row
    pub label_from_lookback: bool,
}

impl Default for StructurePreferences {
    fn default() -> Self {
        Self {
            log_classification_details: env_bool("FORMPORT_LOG_CLASSIFICATION", false),
            apply_scope_overrides: env_bool("FORMPORT_APPLY_SCOPE_OVERRIDES", true),
            extra_scope_overrides: HashMap::new(),
            label_from_lookback: env_bool("FORMPORT_LABEL_FROM_LOOKBACK", true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsPreferences {
    /// Whether to log each parsed condition expression at debug level
    pub log_condition_details: bool,

    /// Whether an unresolved template mode is reported as a warning; false
    /// reports it as an error event (the call is skipped either way)
    pub skip_unresolved_templates: bool,
}

impl Default for DynamicsPreferences {
    fn default() -> Self {
        Self {
            log_condition_details: env_bool("FORMPORT_LOG_CONDITIONS", false),
            skip_unresolved_templates: env_bool("FORMPORT_SKIP_UNRESOLVED_TEMPLATES", true),
        }
    }
}

/// Runtime log level selection, convertible into the event level used by the
/// logging subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn to_events_log_level(self) -> crate::logging::LogLevel {
        match self {
            LogLevel::Error => crate::logging::LogLevel::Error,
            LogLevel::Warning => crate::logging::LogLevel::Warning,
            LogLevel::Info => crate::logging::LogLevel::Info,
            LogLevel::Debug => crate::logging::LogLevel::Debug,
        }
    }

    fn from_env(name: &str, default: Self) -> Self {
        match env::var(name).ok().as_deref() {
            Some("error") => LogLevel::Error,
            Some("warning") | Some("warn") => LogLevel::Warning,
            Some("info") => LogLevel::Info,
            Some("debug") => LogLevel::Debug,
            _ => default,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Minimum level emitted by the global logger
    pub min_log_level: LogLevel,

    /// Whether events are emitted as JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Whether console output is enabled at all
    pub enable_console_logging: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: LogLevel::from_env("FORMPORT_LOG_LEVEL", LogLevel::Info),
            use_structured_logging: env_bool("FORMPORT_STRUCTURED_LOGGING", false),
            enable_console_logging: env_bool("FORMPORT_CONSOLE_LOGGING", true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchPreferences {
    /// Worker thread count for parallel view processing (0 = auto)
    pub max_threads: usize,

    /// Whether directory discovery descends into subdirectories
    pub recursive: bool,

    /// Whether per-view progress is reported as info events
    pub progress_reporting: bool,

    /// Whether the first failed view aborts the remainder of the batch
    pub fail_fast: bool,
}

impl Default for BatchPreferences {
    fn default() -> Self {
        Self {
            max_threads: env::var("FORMPORT_BATCH_THREADS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            recursive: env_bool("FORMPORT_BATCH_RECURSIVE", true),
            progress_reporting: env_bool("FORMPORT_BATCH_PROGRESS", true),
            fail_fast: env_bool("FORMPORT_BATCH_FAIL_FAST", false),
        }
    }
}

/// A complete preference profile, loadable from a TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceProfile {
    pub structure: StructurePreferences,
    pub dynamics: DynamicsPreferences,
    pub logging: LoggingPreferences,
    pub batch: BatchPreferences,
}

/// Load a preference profile from a TOML file.
///
/// Missing sections fall back to their env-aware defaults, so a profile file
/// only needs to name the preferences it changes.
pub fn load_preferences_from_toml(path: &Path) -> Result<PreferenceProfile, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read preference profile {}: {}", path.display(), e))?;
    toml::from_str(&text)
        .map_err(|e| format!("Invalid preference profile {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let profile = PreferenceProfile::default();
        assert!(profile.structure.apply_scope_overrides);
        assert!(profile.dynamics.skip_unresolved_templates);
        assert!(profile.batch.recursive);
    }

    #[test]
    fn test_profile_from_partial_toml() {
        let profile: PreferenceProfile = toml::from_str(
            r#"
            [structure]
            log_classification_details = true

            [structure.extra_scope_overrides]
            CTRL99 = "Expenses"

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(profile.structure.log_classification_details);
        assert_eq!(
            profile.structure.extra_scope_overrides.get("CTRL99"),
            Some(&"Expenses".to_string())
        );
        assert_eq!(profile.logging.min_log_level, LogLevel::Debug);
        // Untouched sections keep defaults
        assert!(profile.batch.recursive);
        assert!(profile.dynamics.skip_unresolved_templates);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(&path, "[dynamics]\nlog_condition_details = true\n").unwrap();

        let profile = load_preferences_from_toml(&path).unwrap();
        assert!(profile.dynamics.log_condition_details);

        let missing = load_preferences_from_toml(&dir.path().join("nope.toml"));
        assert!(missing.is_err());
    }
}
