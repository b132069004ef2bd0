//! Pipeline composition metadata

use serde::Serialize;

/// One pass of the pipeline
#[derive(Debug, Clone, Serialize)]
pub struct PassInfo {
    pub number: u8,
    pub name: &'static str,
    pub version: &'static str,
}

/// Static description of the pipeline composition
#[derive(Debug, Clone, Serialize)]
pub struct PipelineInfo {
    pub crate_version: &'static str,
    pub passes: Vec<PassInfo>,
}

/// Describe the pipeline's passes in execution order
pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        crate_version: env!("CARGO_PKG_VERSION"),
        passes: vec![
            PassInfo {
                number: crate::structure::PASS_NUMBER,
                name: "structure",
                version: crate::structure::VERSION,
            },
            PassInfo {
                number: crate::labels::PASS_NUMBER,
                name: "labels",
                version: crate::labels::VERSION,
            },
            PassInfo {
                number: crate::dynamics::PASS_NUMBER,
                name: "dynamics",
                version: crate::dynamics::VERSION,
            },
            PassInfo {
                number: crate::columns::PASS_NUMBER,
                name: "columns",
                version: crate::columns::VERSION,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passes_are_ordered() {
        let info = get_pipeline_info();
        assert_eq!(info.passes.len(), 4);
        for pair in info.passes.windows(2) {
            assert!(pair[0].number < pair[1].number);
        }
    }
}
