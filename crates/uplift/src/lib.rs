#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/uplift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod pipeline;
pub mod registry;

// Re-export stage crates
pub use uplift_features as features;
pub use uplift_prep as prep;

pub use config::PipelineConfig;
pub use pipeline::{PipelineOutput, build_training_table, run_pipeline};
pub use registry::{StageInfo, available_stages, get_stage_info, list_stage_names};
pub use uplift_prep::{Result, UpliftError};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
