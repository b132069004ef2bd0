//! Configuration module for the FormPort view parser
//!
//! Compile-time limits live in `constants`; user-tunable preferences live in
//! `runtime` and can be overridden from environment variables or a TOML
//! profile file.

pub mod constants;
pub mod runtime;

pub use runtime::{
    load_preferences_from_toml, BatchPreferences, DynamicsPreferences, LoggingPreferences,
    PreferenceProfile, StructurePreferences,
};
