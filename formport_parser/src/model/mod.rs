//! Typed output model of the view parser
//!
//! These nodes are what the structural walk, the label passes, the dynamic
//! section extractor, and the consolidator produce; downstream migration
//! generators read this structure only and never call back into the parser.

pub mod nodes;

pub use nodes::{
    ChoiceOption, Control, ControlKind, ControlOrigin, DataColumn, DynamicSection, FormModel,
    RepeatingKind, RepeatingMembership, RepeatingScope, SectionKind, SectionMembership,
    SectionScope, ViewModel,
};
