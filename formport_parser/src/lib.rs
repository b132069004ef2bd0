// Internal modules
pub mod batch;
pub mod columns;
pub mod config;
pub mod document;
pub mod dynamics;
pub mod labels;
#[macro_use]
pub mod logging;
pub mod model;
pub mod naming;
pub mod pipeline;
pub mod structure;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use model::{
    Control, ControlKind, DataColumn, DynamicSection, FormModel, SectionScope, ViewModel,
};
pub use pipeline::{FormModelExport, FormParseResult, PipelineError, PipelineStats};

// Re-export pipeline entry points for embedding consumers
pub use batch::process_directory;
pub use pipeline::{process_form, process_view};
