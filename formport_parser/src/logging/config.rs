//! Configuration access for logging
//!
//! Bridges the runtime logging preferences into the level and format
//! decisions the service and macros make on every event.

use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

// ============================================================================
// RUNTIME PREFERENCES STORAGE
// ============================================================================

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    validate_preferences(&preferences)?;

    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())?;

    Ok(())
}

/// Get runtime preferences (with fallback to defaults)
fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

/// Validate runtime preferences for internal consistency
fn validate_preferences(preferences: &LoggingPreferences) -> Result<(), String> {
    if preferences.use_structured_logging && !preferences.enable_console_logging {
        return Err(
            "Structured logging requires console output to be enabled".to_string(),
        );
    }
    Ok(())
}

/// Validate the active configuration (used during global initialization)
pub fn validate_config() -> Result<(), String> {
    validate_preferences(&get_runtime_preferences())
}

// ============================================================================
// CONFIGURATION ACCESS FUNCTIONS
// ============================================================================

/// Get minimum log level (user preference)
pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

/// Check if structured logging is enabled (user preference)
pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

/// Check if console logging is enabled (user preference)
pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

/// Human-readable summary of the active logging configuration
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();
    format!(
        "Logging: min_level={:?}, structured={}, console={}",
        preferences.min_log_level,
        preferences.use_structured_logging,
        preferences.enable_console_logging
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::LogLevel;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_preferences(&LoggingPreferences::default()).is_ok());
    }

    #[test]
    fn test_structured_without_console_rejected() {
        let preferences = LoggingPreferences {
            min_log_level: LogLevel::Info,
            use_structured_logging: true,
            enable_console_logging: false,
        };
        assert!(validate_preferences(&preferences).is_err());
    }

    #[test]
    fn test_config_summary_mentions_level() {
        assert!(get_config_summary().contains("min_level"));
    }
}
