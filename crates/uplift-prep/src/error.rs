//! Error types for pipeline stages.

use thiserror::Error;

/// Result type for pipeline stages.
pub type Result<T> = std::result::Result<T, UpliftError>;

/// Errors that can occur while building the training table.
#[derive(Debug, Error)]
pub enum UpliftError {
    /// A required column is absent from an input table
    #[error("Schema error: column '{column}' not found in {table} table")]
    Schema {
        /// Logical name of the table that was checked
        table: String,
        /// Name of the missing column
        column: String,
    },

    /// Quantile binning could not produce distinct bin edges
    #[error(
        "Cannot split discount into {quantiles} quantile bins: only {distinct_edges} distinct edges"
    )]
    DegenerateQuantiles {
        /// Number of bins requested
        quantiles: usize,
        /// Number of distinct edges that were found
        distinct_edges: usize,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

impl UpliftError {
    /// Build a schema error for `column` missing from `table`.
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Schema {
            table: table.into(),
            column: column.into(),
        }
    }
}
