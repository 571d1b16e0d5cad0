#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/uplift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod quantile;

pub use builder::{FeatureBuilder, FeatureBuilderConfig, first_markdown_flag, lagged};
pub use quantile::{bin_expr, quantile_edges, strict_edges};
