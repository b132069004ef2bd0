//! Pass 2: Label Resolution
//!
//! Two in-place post-passes over one view's ordered control list: linking
//! standalone labels to the nearest following data control, then merging
//! adjacent label fragments that render one wrapped caption.

pub mod association;
pub mod multiline;

pub use association::associate_labels;
pub use multiline::merge_multiline_labels;

use crate::logging::codes;
use crate::model::Control;
use crate::{log_info, log_success};

/// Module version
pub const VERSION: &str = "1.0.0";

/// Pass number
pub const PASS_NUMBER: u8 = 2;

/// Run both label passes over a view's control list
pub fn run_label_passes(controls: &mut [Control]) {
    log_info!("Starting Pass 2: Label resolution", "controls" => controls.len());

    let associated = associate_labels(controls);
    let merged = merge_multiline_labels(controls);

    log_success!(codes::success::LABEL_PASS_COMPLETE,
        "Label passes completed",
        "associated" => associated,
        "merged" => merged
    );
}
