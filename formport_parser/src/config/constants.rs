//! Compile-time limits for the view parser passes
//!
//! These bounds cap resource usage on adversarial or degenerate view
//! documents. They are constants, not preferences: runtime configuration
//! cannot raise them.

pub mod compile_time {
    pub mod document {
        /// Maximum view document size accepted for parsing (10MB)
        pub const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

        /// Maximum element nesting depth tolerated when computing document stats
        pub const MAX_STATS_DEPTH: usize = 512;
    }

    pub mod structure {
        /// Maximum recursion depth for the structural walk
        pub const MAX_WALK_DEPTH: usize = 128;

        /// Maximum controls captured from a single view
        pub const MAX_CONTROLS_PER_VIEW: usize = 10_000;

        /// Maximum section scopes recorded for a single view
        pub const MAX_SECTIONS_PER_VIEW: usize = 1_000;

        /// Capacity of the caption lookback queue
        pub const LABEL_LOOKBACK_CAPACITY: usize = 5;

        /// Maximum template expansions performed for a single view
        pub const MAX_TEMPLATE_EXPANSIONS: usize = 500;

        /// Maximum length accepted for a derived or synthesized name
        pub const MAX_NAME_LENGTH: usize = 128;

        /// Maximum text length treated as a caption candidate
        pub const MAX_CAPTION_LENGTH: usize = 60;

        /// Column-span width at or above which a cell is a row-break indicator
        pub const WIDE_CELL_COLSPAN: usize = 3;
    }

    pub mod dynamics {
        /// Maximum dynamic sections extracted from a single view
        pub const MAX_DYNAMIC_SECTIONS: usize = 500;

        /// Maximum member control ids collected per dynamic section
        pub const MAX_MEMBERS_PER_SECTION: usize = 2_000;

        /// Maximum condition expression length fed to the pattern set
        pub const MAX_CONDITION_LENGTH: usize = 2_000;
    }

    pub mod columns {
        /// Maximum data columns in the consolidated output
        pub const MAX_DATA_COLUMNS: usize = 20_000;

        /// Maximum choice options retained per column
        pub const MAX_CHOICE_OPTIONS: usize = 500;
    }

    pub mod batch_processing {
        /// Maximum views processed in a single batch
        pub const MAX_BATCH_FILES: usize = 1_000;

        /// Maximum worker threads for parallel view parsing
        pub const MAX_BATCH_THREADS: usize = 16;
    }

    pub mod logging {
        /// Maximum events retained per view by the error collector
        pub const MAX_EVENTS_PER_VIEW: usize = 500;

        /// Maximum total events retained by the error collector
        pub const MAX_ERROR_COLLECTION: usize = 10_000;
    }
}
