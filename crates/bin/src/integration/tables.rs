//! CSV table loading and writing.
//!
//! Reads the raw sales and product tables, parses dates, and persists the
//! pipeline's output tables.

use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uplift::{PipelineConfig, PipelineOutput, UpliftError};

/// Error type for CLI table operations.
#[derive(Debug, thiserror::Error)]
pub(crate) enum TableError {
    /// Pipeline error.
    #[error(transparent)]
    Pipeline(#[from] UpliftError),
    /// Polars DataFrame error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    /// Filesystem error.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Configuration parse error.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Read a CSV file with a header row, parsing date-like columns.
pub(crate) fn read_table(path: &Path) -> Result<DataFrame, TableError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "Loaded table");
    Ok(df)
}

/// Write `df` as CSV, creating parent directories as needed.
pub(crate) fn write_table(df: &mut DataFrame, path: &Path) -> Result<(), TableError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| TableError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut file = File::create(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;

    info!(path = %path.display(), rows = df.height(), "Wrote table");
    Ok(())
}

/// Load a pipeline configuration from a JSON file, or the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<PipelineConfig, TableError> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let json = fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(PipelineConfig::from_json(&json)?)
}

/// Persist the merged, daily and completed tables under `dir`.
pub(crate) fn write_intermediates(output: &mut PipelineOutput, dir: &Path) -> Result<(), TableError> {
    write_table(&mut output.merged, &dir.join("merged.csv"))?;
    write_table(&mut output.daily, &dir.join("daily.csv"))?;
    write_table(&mut output.completed, &dir.join("completed.csv"))?;
    Ok(())
}

/// Split a comma separated flag value into trimmed, non-empty names.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
