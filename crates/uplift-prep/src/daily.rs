//! Daily Aggregator
//!
//! Derives a unit price and a discount fraction for every transaction and
//! rolls transactions up to one row per grouping key.
//!
//! - `price = gross_amount / purchases` when `purchases > 0`, otherwise null
//! - `discount = 1 - net_amount / gross_amount` when `gross_amount > 0`,
//!   otherwise `0.0`
//!
//! Both are rounded per row, averaged per group (nulls skipped), then rounded
//! again. Purchases are summed.

use crate::error::Result;
use crate::stage::{Stage, ensure_columns, round_expr};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

/// Configuration for the DailyAggregator stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyAggregatorConfig {
    /// Grouping key (default: article, date, week)
    pub group_columns: Vec<String>,
    /// Decimal places kept for price and discount (default: 2)
    pub decimals: u32,
}

impl Default for DailyAggregatorConfig {
    fn default() -> Self {
        Self {
            group_columns: vec!["article".into(), "date".into(), "week".into()],
            decimals: 2,
        }
    }
}

/// DailyAggregator turns transactions into one row per grouping key
#[derive(Debug)]
pub struct DailyAggregator {
    config: DailyAggregatorConfig,
}

impl DailyAggregator {
    /// Aggregate merged transactions by the configured grouping key.
    ///
    /// Rows with a null in any grouping column are not aggregated. The output
    /// carries the grouping columns plus `purchases`, `price` and `discount`,
    /// sorted by the grouping key.
    pub fn aggregate(&self, merged: &DataFrame) -> Result<DataFrame> {
        let _span = info_span!("daily_aggregator").entered();
        ensure_columns(merged, "merged", &self.required_columns())?;

        let decimals = self.config.decimals;
        let keys: Vec<Expr> = self.config.group_columns.iter().map(|c| col(c.as_str())).collect();

        let complete_key = self
            .config
            .group_columns
            .iter()
            .map(|c| col(c.as_str()).is_not_null())
            .reduce(|acc, e| acc.and(e))
            .unwrap_or_else(|| lit(true));

        let daily = merged
            .clone()
            .lazy()
            .with_columns([
                round_expr(
                    when(col("purchases").gt(lit(0)))
                        .then(
                            col("gross_amount").cast(DataType::Float64)
                                / col("purchases").cast(DataType::Float64),
                        )
                        .otherwise(lit(NULL).cast(DataType::Float64)),
                    decimals,
                )
                .alias("price"),
                round_expr(
                    when(col("gross_amount").gt(lit(0)))
                        .then(
                            lit(1.0)
                                - col("net_amount").cast(DataType::Float64)
                                    / col("gross_amount").cast(DataType::Float64),
                        )
                        .otherwise(lit(0.0)),
                    decimals,
                )
                .alias("discount"),
            ])
            .filter(complete_key)
            .group_by(keys.clone())
            .agg([
                col("purchases").sum().alias("purchases"),
                col("price").mean().alias("price"),
                col("discount").mean().alias("discount"),
            ])
            .with_columns([
                round_expr(col("price"), decimals).alias("price"),
                round_expr(col("discount"), decimals).alias("discount"),
            ])
            .sort_by_exprs(keys, SortMultipleOptions::default())
            .collect()?;

        debug!(
            merged_rows = merged.height(),
            daily_rows = daily.height(),
            "Aggregated transactions"
        );

        Ok(daily)
    }
}

impl Stage for DailyAggregator {
    type Config = DailyAggregatorConfig;

    fn name(&self) -> &str {
        "daily_aggregator"
    }

    fn required_columns(&self) -> Vec<&str> {
        let mut cols: Vec<&str> = self.config.group_columns.iter().map(String::as_str).collect();
        cols.extend(["purchases", "net_amount", "gross_amount"]);
        cols
    }

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for DailyAggregator {
    fn default() -> Self {
        Self::with_config(DailyAggregatorConfig::default())
    }
}
