//! Stage abstraction shared by every transform in the pipeline.
//!
//! Each stage is a stateless transform from one or more `DataFrame`s to a new
//! `DataFrame`. Configuration lives in a plain serde struct so that a whole
//! pipeline can be described in one JSON document.

use crate::error::{Result, UpliftError};
use polars::prelude::*;

/// A single transform of the training-table pipeline.
pub trait Stage {
    /// Stage configuration type
    type Config;

    /// Unique stage name
    fn name(&self) -> &str;

    /// Columns the primary input table must carry
    fn required_columns(&self) -> Vec<&str>;

    /// Construct the stage from a configuration
    fn with_config(config: Self::Config) -> Self;

    /// Borrow the stage configuration
    fn config(&self) -> &Self::Config;
}

/// Fail with a schema error if any of `columns` is absent from `df`.
///
/// `table` names the input in the error message.
pub fn ensure_columns<S: AsRef<str>>(df: &DataFrame, table: &str, columns: &[S]) -> Result<()> {
    for column in columns {
        let name = column.as_ref();
        if df.get_column_index(name).is_none() {
            return Err(UpliftError::missing_column(table, name));
        }
    }
    Ok(())
}

/// Round half to even at `decimals` places.
///
/// The value is scaled by `10^decimals`, rounded to the nearest integer with
/// ties going to the even neighbour, and scaled back.
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}

/// Expression rounding a float column half to even at `decimals` places.
pub fn round_expr(expr: Expr, decimals: u32) -> Expr {
    expr.cast(DataType::Float64).apply(
        move |c: Column| {
            let s = c.as_materialized_series();
            Ok(Some(
                s.f64()?
                    .apply_values(|v| round_half_even(v, decimals))
                    .into_series()
                    .into(),
            ))
        },
        GetOutput::from_type(DataType::Float64),
    )
}
