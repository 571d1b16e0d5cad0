//! Integration module for the CLI.
//!
//! Everything that touches the filesystem lives here; the pipeline crates
//! only see loaded `DataFrame`s.

pub(crate) mod tables;
