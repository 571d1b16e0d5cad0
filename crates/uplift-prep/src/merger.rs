//! Sales / Catalog Merger
//!
//! Joins the raw sales log to the product catalog through the parent article
//! id and buckets every transaction into a promotional week.
//!
//! Weeks are global: distinct dates are dense-ranked in ascending order, the
//! zero-based rank is integer-divided by `days_per_week`, and the result is
//! rendered as `"week" + n`. Equal dates always share a week.

use crate::error::Result;
use crate::stage::{Stage, ensure_columns};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

/// Configuration for the Merger stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergerConfig {
    /// Divisor mapping a variant id to its parent article (default: 1000)
    pub parent_divisor: i64,
    /// Number of distinct dates per week bucket (default: 7)
    pub days_per_week: i64,
    /// Label prefix of the week bucket (default: "week")
    pub week_prefix: String,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            parent_divisor: 1000,
            days_per_week: 7,
            week_prefix: "week".to_string(),
        }
    }
}

/// Merger joins sales to products and assigns week buckets
#[derive(Debug)]
pub struct Merger {
    config: MergerConfig,
}

impl Merger {
    /// Product table columns the merge needs
    pub const PRODUCT_COLUMNS: &'static [&'static str] = &["article"];

    /// Merge the sales log with the product catalog.
    ///
    /// Drops sales rows missing `net_amount` or `gross_amount`, derives
    /// `variant_parent`, left-joins the catalog on `variant_parent = article`,
    /// sorts by `date` (stable) and appends the `week` label.
    pub fn merge(&self, sales: &DataFrame, products: &DataFrame) -> Result<DataFrame> {
        let _span = info_span!("merger").entered();
        ensure_columns(sales, "sales", &self.required_columns())?;
        ensure_columns(products, "products", Self::PRODUCT_COLUMNS)?;

        let divisor = self.config.parent_divisor;
        let days = self.config.days_per_week;
        let prefix = self.config.week_prefix.as_str();

        let catalog = products
            .clone()
            .lazy()
            .with_column(col("article").cast(DataType::Int64).alias("variant_parent"));

        let merged = sales
            .clone()
            .lazy()
            .filter(
                col("net_amount")
                    .is_not_null()
                    .and(col("gross_amount").is_not_null()),
            )
            .with_columns([
                col("date").cast(DataType::Date).alias("date"),
                col("variant")
                    .cast(DataType::Int64)
                    .floor_div(lit(divisor))
                    .alias("variant_parent"),
            ])
            .join(
                catalog,
                [col("variant_parent")],
                [col("variant_parent")],
                JoinArgs::new(JoinType::Left),
            )
            .sort(
                ["date"],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .with_column(
                concat_str(
                    [
                        lit(prefix),
                        week_index(col("date"), days).cast(DataType::String),
                    ],
                    "",
                    false,
                )
                .alias("week"),
            )
            .collect()?;

        debug!(
            sales_rows = sales.height(),
            merged_rows = merged.height(),
            "Merged sales with catalog"
        );

        Ok(merged)
    }
}

/// Zero-based week index of each date: `(dense_rank - 1) // days`.
pub fn week_index(date: Expr, days: i64) -> Expr {
    (date
        .rank(
            RankOptions {
                method: RankMethod::Dense,
                descending: false,
            },
            None,
        )
        .cast(DataType::Int64)
        - lit(1i64))
    .floor_div(lit(days))
}

impl Stage for Merger {
    type Config = MergerConfig;

    fn name(&self) -> &str {
        "merger"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec!["date", "variant", "net_amount", "gross_amount", "purchases"]
    }

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::with_config(MergerConfig::default())
    }
}
