//! Quantile binning
//!
//! Splits a float distribution into equal-frequency bins labelled `1..=q`.
//! Edges use linear interpolation between order statistics; bins are closed
//! on the right and the lowest edge belongs to the first bin.

use polars::prelude::*;
use uplift_prep::{Result, UpliftError};

/// Compute `quantiles + 1` edges over the non-null values of `column`.
///
/// Returns `None` when there are no values to bin.
pub fn quantile_edges(frame: LazyFrame, column: &str, quantiles: usize) -> Result<Option<Vec<f64>>> {
    if quantiles == 0 {
        return Ok(None);
    }

    let values = col(column).cast(DataType::Float64);
    let edges = frame
        .select(
            (0..=quantiles)
                .map(|k| {
                    values
                        .clone()
                        .quantile(lit(k as f64 / quantiles as f64), QuantileMethod::Linear)
                        .alias(format!("edge_{k}"))
                })
                .collect::<Vec<_>>(),
        )
        .collect()?;

    let mut out = Vec::with_capacity(quantiles + 1);
    for edge in edges.get_columns() {
        match edge.f64()?.get(0) {
            Some(value) => out.push(value),
            None => return Ok(None),
        }
    }
    Ok(Some(out))
}

/// Compute bin edges and fail if they do not split into `quantiles` bins.
pub fn strict_edges(frame: LazyFrame, column: &str, quantiles: usize) -> Result<Option<Vec<f64>>> {
    let Some(edges) = quantile_edges(frame, column, quantiles)? else {
        return Ok(None);
    };

    let distinct_edges = 1 + edges.windows(2).filter(|w| w[0] < w[1]).count();
    if distinct_edges != edges.len() {
        return Err(UpliftError::DegenerateQuantiles {
            quantiles,
            distinct_edges,
        });
    }
    Ok(Some(edges))
}

/// Expression labelling `expr` with its bin (`1..=edges.len() - 1`).
///
/// Nulls stay null.
pub fn bin_expr(expr: Expr, edges: &[f64]) -> Expr {
    let bins = edges.len().saturating_sub(1).max(1);
    let mut labelled = lit(bins as i64);
    for k in (1..bins).rev() {
        labelled = when(expr.clone().lt_eq(lit(edges[k])))
            .then(lit(k as i64))
            .otherwise(labelled);
    }
    when(expr.is_null())
        .then(lit(NULL).cast(DataType::Int64))
        .otherwise(labelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn frame(values: &[Option<f64>]) -> LazyFrame {
        df! { "discount" => values }.unwrap().lazy()
    }

    #[test]
    fn test_quartile_edges_linear() {
        let values = [Some(0.4), Some(0.0), Some(0.2), None, Some(0.1), Some(0.3)];
        let edges = quantile_edges(frame(&values), "discount", 4).unwrap().unwrap();
        let expected = [0.0, 0.1, 0.2, 0.3, 0.4];
        assert_eq!(edges.len(), expected.len());
        for (e, x) in edges.iter().zip(expected) {
            assert_relative_eq!(*e, x, epsilon = 1e-12);
        }

        let values = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let edges = quantile_edges(frame(&values), "discount", 4).unwrap().unwrap();
        assert_relative_eq!(edges[1], 1.75, epsilon = 1e-12);
        assert_relative_eq!(edges[2], 2.5, epsilon = 1e-12);
        assert_relative_eq!(edges[3], 3.25, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_values_have_no_edges() {
        let all_null = frame(&[None, None]);
        assert!(quantile_edges(all_null.clone(), "discount", 4).unwrap().is_none());
        assert!(strict_edges(all_null, "discount", 4).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_edges_fail_closed() {
        let values = [Some(0.0), Some(0.0), Some(0.0), Some(0.0), Some(0.0), Some(0.5)];
        let err = strict_edges(frame(&values), "discount", 4).unwrap_err();
        match err {
            UpliftError::DegenerateQuantiles {
                quantiles,
                distinct_edges,
            } => {
                assert_eq!(quantiles, 4);
                assert_eq!(distinct_edges, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    #[case(1.0, Some(1))]
    #[case(1.75, Some(1))]
    #[case(2.0, Some(2))]
    #[case(2.5, Some(2))]
    #[case(3.0, Some(3))]
    #[case(3.5, Some(4))]
    #[case(4.0, Some(4))]
    fn test_bin_expr_labels(#[case] value: f64, #[case] expected: Option<i64>) {
        let edges = [1.0, 1.75, 2.5, 3.25, 4.0];
        let out = frame(&[Some(value)])
            .with_column(bin_expr(col("discount"), &edges).alias("bin"))
            .collect()
            .unwrap();

        assert_eq!(out.column("bin").unwrap().i64().unwrap().get(0), expected);
    }

    #[test]
    fn test_bin_expr_keeps_nulls() {
        let edges = [1.0, 1.75, 2.5, 3.25, 4.0];
        let out = frame(&[Some(1.0), None, Some(4.0)])
            .with_column(bin_expr(col("discount"), &edges).alias("bin"))
            .collect()
            .unwrap();
        let bins: Vec<Option<i64>> = out.column("bin").unwrap().i64().unwrap().into_iter().collect();

        assert_eq!(bins, vec![Some(1), None, Some(4)]);
    }
}
