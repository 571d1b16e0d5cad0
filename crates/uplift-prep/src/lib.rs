#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/uplift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod completer;
pub mod daily;
pub mod error;
pub mod merger;
pub mod stage;

pub use completer::{DateCompleter, DateCompleterConfig};
pub use daily::{DailyAggregator, DailyAggregatorConfig};
pub use error::{Result, UpliftError};
pub use merger::{Merger, MergerConfig};
pub use stage::{Stage, ensure_columns};
